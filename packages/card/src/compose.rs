//! Card composition and the narrative fallback chain.
//!
//! The street snap, neighborhood, and POI lookups are independent and run
//! concurrently. The fact lookup depends on the street classification and
//! runs afterwards, only for named streets with a street code.
//!
//! Narrative text is chosen by the first source that succeeds:
//!
//! 1. The best fact for a [`CardMode::NamedStreet`] street.
//! 2. A generic line about the containing neighborhood.
//! 3. Nothing.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use street_card_models::{
    Card, CardMode, CardSource, Fact, Fix, Neighborhood, NearbyQuery, PoiItem, StreetSegment,
};

use crate::classify::classify;
use crate::nearby::{RANK_SCORE_WEIGHT, rank_nearby};
use crate::{CardConfig, CardError, SpatialStore};

/// Label used when a fact has no source label of its own.
const FALLBACK_SOURCE_LABEL: &str = "source";

/// Where a card's narrative text came from.
#[derive(Debug, Clone, PartialEq)]
enum Narrative {
    Fact(Fact),
    Neighborhood(String),
    None,
}

impl Narrative {
    const fn kind(&self) -> &'static str {
        match self {
            Self::Fact(_) => "fact",
            Self::Neighborhood(_) => "neighborhood",
            Self::None => "none",
        }
    }
}

/// Synthesized narrative for a fix with no fact.
#[must_use]
pub fn neighborhood_narrative(name: &str) -> String {
    format!("You're in {name}. Check nearby landmarks for context.")
}

/// Composes street cards from a [`SpatialStore`].
///
/// Holds no per-request state; one composer is shared by every request.
pub struct CardComposer {
    store: Arc<dyn SpatialStore>,
    config: CardConfig,
}

impl CardComposer {
    /// Creates a composer over `store`.
    #[must_use]
    pub fn new(store: Arc<dyn SpatialStore>, config: CardConfig) -> Self {
        Self { store, config }
    }

    /// Returns the composer's configuration.
    #[must_use]
    pub const fn config(&self) -> &CardConfig {
        &self.config
    }

    /// Composes the card for `fix`.
    ///
    /// Missing streets, neighborhoods, POIs, or facts degrade the card;
    /// they are not errors. A fix with no street in range yields a
    /// [`CardMode::Near`] card.
    ///
    /// # Errors
    ///
    /// * [`CardError::InvalidInput`] if the fix is out of range; no query
    ///   is issued.
    /// * [`CardError::CollaboratorUnavailable`] if any store query fails.
    pub async fn compose(&self, fix: &Fix) -> Result<Card, CardError> {
        validate_fix(fix)?;

        let point = fix.point();
        let snap_radius_m = self.config.snap.plan(fix.accuracy_m);
        let nearby_query = NearbyQuery {
            point,
            radius_m: self.config.poi.radius_m,
            limit: self.config.poi.limit,
            rank_weight: RANK_SCORE_WEIGHT,
        };

        log::debug!(
            "Composing card at ({}, {}) acc={} snap_radius={snap_radius_m}m",
            fix.latitude,
            fix.longitude,
            fix.accuracy_m,
        );

        let (street, neighborhood, candidates) = futures::try_join!(
            self.store.nearest_street(point, snap_radius_m),
            self.store.containing_neighborhood(point),
            self.store.nearby_pois(&nearby_query),
        )?;

        let mode = classify(street.as_ref().and_then(|s| s.primary_name.as_deref()));
        let narrative = self.narrative(mode, street.as_ref(), neighborhood.as_ref()).await?;

        log::debug!(
            "Card mode={mode} narrative={} pois={}",
            narrative.kind(),
            candidates.len()
        );

        let nearby = rank_nearby(
            candidates,
            nearby_query.rank_weight,
            usize::try_from(nearby_query.limit).unwrap_or(usize::MAX),
        );

        Ok(assemble(mode, street, neighborhood, narrative, nearby))
    }

    /// Composes the card for `fix`, giving up when `cancel` completes.
    ///
    /// Outstanding store queries are dropped as soon as `cancel` fires.
    ///
    /// # Errors
    ///
    /// Returns [`CardError::Cancelled`] if `cancel` completes first, or
    /// any error from [`Self::compose`].
    pub async fn compose_until<F>(&self, fix: &Fix, cancel: F) -> Result<Card, CardError>
    where
        F: Future<Output = ()> + Send,
    {
        tokio::select! {
            result = self.compose(fix) => result,
            () = cancel => {
                log::debug!("Card composition cancelled by caller");
                Err(CardError::Cancelled)
            }
        }
    }

    /// Composes the card for `fix` within `timeout`.
    ///
    /// # Errors
    ///
    /// Returns [`CardError::Timeout`] if the deadline elapses, or any error
    /// from [`Self::compose`].
    pub async fn compose_within(&self, fix: &Fix, timeout: Duration) -> Result<Card, CardError> {
        tokio::time::timeout(timeout, self.compose(fix))
            .await
            .map_err(|_| CardError::Timeout {
                elapsed_ms: u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX),
            })?
    }

    /// Composes the card for `fix` within the configured query timeout.
    ///
    /// # Errors
    ///
    /// See [`Self::compose_within`].
    pub async fn compose_with_deadline(&self, fix: &Fix) -> Result<Card, CardError> {
        self.compose_within(fix, self.config.query_timeout()).await
    }

    async fn narrative(
        &self,
        mode: CardMode,
        street: Option<&StreetSegment>,
        neighborhood: Option<&Neighborhood>,
    ) -> Result<Narrative, CardError> {
        let street_code = street
            .and_then(|s| s.street_code.as_deref())
            .filter(|code| !code.trim().is_empty());

        if mode == CardMode::NamedStreet
            && let Some(code) = street_code
            && let Some(fact) = self.store.best_fact(code).await?
        {
            return Ok(Narrative::Fact(fact));
        }

        Ok(neighborhood.map_or(Narrative::None, |n| Narrative::Neighborhood(n.name.clone())))
    }
}

fn assemble(
    mode: CardMode,
    street: Option<StreetSegment>,
    neighborhood: Option<Neighborhood>,
    narrative: Narrative,
    nearby: Vec<PoiItem>,
) -> Card {
    let (did_you_know, sources, fact_confidence) = match narrative {
        Narrative::Fact(fact) => {
            let source = CardSource {
                label: fact
                    .source_label
                    .filter(|label| !label.trim().is_empty())
                    .unwrap_or_else(|| FALLBACK_SOURCE_LABEL.to_string()),
                url: fact.source_url,
            };
            (Some(fact.text), vec![source], Some(fact.confidence))
        }
        Narrative::Neighborhood(name) => (Some(neighborhood_narrative(&name)), vec![], None),
        Narrative::None => (None, vec![], None),
    };

    // A blank name is no name; the snapped segment's borough and distance
    // still describe the fix.
    let (canonical_street, borough, snap_distance_m) = street.map_or((None, None, None), |s| {
        (
            s.primary_name.filter(|name| !name.trim().is_empty()),
            s.borough,
            Some(s.snap_distance_m),
        )
    });

    Card {
        canonical_street,
        borough,
        neighborhood: neighborhood.map(|n| n.name),
        mode,
        snap_distance_m,
        did_you_know,
        sources,
        fact_confidence,
        nearby,
    }
}

/// Rejects fixes that cannot be searched.
///
/// Negative accuracy is accepted; the radius planner clamps it.
fn validate_fix(fix: &Fix) -> Result<(), CardError> {
    if !fix.latitude.is_finite() || !(-90.0..=90.0).contains(&fix.latitude) {
        return Err(CardError::InvalidInput {
            field: "lat",
            message: format!("{} is not a latitude in [-90, 90]", fix.latitude),
        });
    }
    if !fix.longitude.is_finite() || !(-180.0..=180.0).contains(&fix.longitude) {
        return Err(CardError::InvalidInput {
            field: "lon",
            message: format!("{} is not a longitude in [-180, 180]", fix.longitude),
        });
    }
    if !fix.accuracy_m.is_finite() {
        return Err(CardError::InvalidInput {
            field: "acc",
            message: format!("{} is not a finite accuracy", fix.accuracy_m),
        });
    }
    Ok(())
}
