//! [`SpatialStore`] implementation over a `PostGIS` connection.

use std::sync::Arc;

use async_trait::async_trait;
use street_card::{SpatialStore, StoreError};
use street_card_models::{Fact, GeoPoint, Neighborhood, NearbyQuery, PoiCandidate, StreetSegment};
use switchy_database::Database;

use crate::queries;

/// Spatial store backed by the `street_segment`, `neighborhood`, `poi`,
/// and `fact` tables.
pub struct PostgisStore {
    db: Arc<dyn Database>,
}

impl PostgisStore {
    /// Wraps a database connection.
    #[must_use]
    pub fn new(db: Arc<dyn Database>) -> Self {
        Self { db }
    }

    /// Returns the underlying connection.
    #[must_use]
    pub fn database(&self) -> &dyn Database {
        self.db.as_ref()
    }
}

#[async_trait]
impl SpatialStore for PostgisStore {
    async fn nearest_street(
        &self,
        point: GeoPoint,
        radius_m: u32,
    ) -> Result<Option<StreetSegment>, StoreError> {
        queries::nearest_street(self.database(), point, radius_m)
            .await
            .map_err(|e| {
                log::error!("Street snap query failed: {e}");
                e.into()
            })
    }

    async fn containing_neighborhood(
        &self,
        point: GeoPoint,
    ) -> Result<Option<Neighborhood>, StoreError> {
        queries::containing_neighborhood(self.database(), point)
            .await
            .map_err(|e| {
                log::error!("Neighborhood query failed: {e}");
                e.into()
            })
    }

    async fn nearby_pois(&self, query: &NearbyQuery) -> Result<Vec<PoiCandidate>, StoreError> {
        queries::nearby_pois(self.database(), query)
            .await
            .map_err(|e| {
                log::error!("Nearby POI query failed: {e}");
                e.into()
            })
    }

    async fn best_fact(&self, street_code: &str) -> Result<Option<Fact>, StoreError> {
        queries::best_fact(self.database(), street_code)
            .await
            .map_err(|e| {
                log::error!("Fact lookup for street code {street_code} failed: {e}");
                e.into()
            })
    }
}
