//! Relevance-weighted ordering of nearby points of interest.
//!
//! "Nearby" is not pure distance: a highly ranked POI 500 m away beats a
//! barely ranked one 50 m away. The composite score is
//! `rank_score * weight - distance_m`, highest first.

use std::cmp::Ordering;

use street_card_models::{PoiCandidate, PoiItem};

/// Weight applied to `rank_score` in the composite score.
pub const RANK_SCORE_WEIGHT: f64 = 1000.0;

/// Default maximum number of POIs on a card.
pub const DEFAULT_POI_LIMIT: u32 = 8;

/// Computes the composite score of a candidate.
#[must_use]
pub fn composite_score(candidate: &PoiCandidate, rank_weight: f64) -> f64 {
    candidate.rank_score.mul_add(rank_weight, -candidate.distance_m)
}

/// Orders two candidates best-first.
///
/// Equal scores fall back to the closer candidate, then to the name, so the
/// order never depends on store row order.
fn compare(a: &PoiCandidate, b: &PoiCandidate, rank_weight: f64) -> Ordering {
    composite_score(b, rank_weight)
        .total_cmp(&composite_score(a, rank_weight))
        .then_with(|| a.distance_m.total_cmp(&b.distance_m))
        .then_with(|| a.name.cmp(&b.name))
}

/// Sorts candidates best-first and keeps at most `limit` of them.
#[must_use]
pub fn rank_nearby(mut candidates: Vec<PoiCandidate>, rank_weight: f64, limit: usize) -> Vec<PoiItem> {
    candidates.sort_by(|a, b| compare(a, b, rank_weight));
    candidates.truncate(limit);
    candidates.into_iter().map(PoiItem::from).collect()
}
