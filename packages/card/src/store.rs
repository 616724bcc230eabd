//! The spatial data store collaborator.
//!
//! The composer never computes geometry itself. Every distance,
//! containment, and radius check is delegated to an implementation of
//! [`SpatialStore`], typically backed by `PostGIS`.

use async_trait::async_trait;
use street_card_models::{Fact, GeoPoint, Neighborhood, NearbyQuery, PoiCandidate, StreetSegment};

use crate::StoreError;

/// Read-only spatial queries needed to compose a card.
///
/// Implementations must scope connections per call and release them on
/// every exit path, including failures.
#[async_trait]
pub trait SpatialStore: Send + Sync {
    /// Returns the street segment nearest to `point` within `radius_m`
    /// meters, or `None` if no segment is that close.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the store cannot be queried.
    async fn nearest_street(
        &self,
        point: GeoPoint,
        radius_m: u32,
    ) -> Result<Option<StreetSegment>, StoreError>;

    /// Returns the neighborhood polygon containing `point`, if any.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the store cannot be queried.
    async fn containing_neighborhood(
        &self,
        point: GeoPoint,
    ) -> Result<Option<Neighborhood>, StoreError>;

    /// Returns up to `query.limit` POIs within `query.radius_m`, ordered by
    /// `rank_score * query.rank_weight - distance_m` descending.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the store cannot be queried.
    async fn nearby_pois(&self, query: &NearbyQuery) -> Result<Vec<PoiCandidate>, StoreError>;

    /// Returns the highest-confidence, most recently updated fact for a
    /// street code.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the store cannot be queried.
    async fn best_fact(&self, street_code: &str) -> Result<Option<Fact>, StoreError>;
}
