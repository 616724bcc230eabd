#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Domain types for resolving a GPS fix into a street card.
//!
//! These types describe the inputs to card composition ([`Fix`]), the rows
//! returned by the spatial data store ([`StreetSegment`], [`Neighborhood`],
//! [`PoiCandidate`], [`Fact`]), and the composed output ([`Card`]). They
//! are distinct from the HTTP response types in
//! `street_card_server_models`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// How the resolved street was classified.
///
/// Only [`CardMode::NamedStreet`] cards ever carry a street fact.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum CardMode {
    /// The street has a proper name (e.g. "Broadway").
    NamedStreet,
    /// The street is a numbered or lettered designation (e.g. "E 14 St").
    NumberedStreet,
    /// No street was resolved within the snap radius.
    Near,
}

/// A point in WGS84 coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    /// Longitude in degrees.
    pub longitude: f64,
    /// Latitude in degrees.
    pub latitude: f64,
}

/// A single reported GPS position.
///
/// The accuracy is caller-reported and untrusted; it only influences the
/// street snap radius.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Fix {
    /// Latitude in degrees (WGS84).
    pub latitude: f64,
    /// Longitude in degrees (WGS84).
    pub longitude: f64,
    /// Horizontal accuracy radius in meters.
    pub accuracy_m: f64,
}

impl Fix {
    /// Creates a new fix.
    #[must_use]
    pub const fn new(latitude: f64, longitude: f64, accuracy_m: f64) -> Self {
        Self {
            latitude,
            longitude,
            accuracy_m,
        }
    }

    /// Returns the position of this fix.
    #[must_use]
    pub const fn point(&self) -> GeoPoint {
        GeoPoint {
            longitude: self.longitude,
            latitude: self.latitude,
        }
    }
}

/// The nearest street segment to a fix.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreetSegment {
    /// Primary key of the segment.
    pub id: i64,
    /// Street code used as the fact lookup key.
    pub street_code: Option<String>,
    /// Primary street name (e.g. "Bedford Avenue").
    pub primary_name: Option<String>,
    /// Borough the segment lies in.
    pub borough: Option<String>,
    /// Geodesic distance from the fix to the segment, in whole meters.
    pub snap_distance_m: i32,
}

/// The neighborhood polygon containing a fix.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Neighborhood {
    /// Neighborhood name.
    pub name: String,
}

/// A point of interest as returned by the ranked radius query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PoiCandidate {
    /// POI name.
    pub name: String,
    /// POI category (e.g. `"museum"`).
    pub category: String,
    /// Exact geodesic distance from the fix, in meters.
    pub distance_m: f64,
    /// Precomputed relevance weight, usually in `0.0..=1.0`.
    pub rank_score: f64,
}

/// A nearby point of interest on a composed card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoiItem {
    /// POI name.
    pub name: String,
    /// POI category.
    pub category: String,
    /// Distance from the fix, rounded to whole meters.
    pub distance_m: i64,
}

impl From<PoiCandidate> for PoiItem {
    #[allow(clippy::cast_possible_truncation)]
    fn from(candidate: PoiCandidate) -> Self {
        Self {
            name: candidate.name,
            category: candidate.category,
            distance_m: candidate.distance_m.round() as i64,
        }
    }
}

/// A trivia record keyed by street code.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fact {
    /// The fact text shown to the user.
    pub text: String,
    /// Human-readable source label.
    pub source_label: Option<String>,
    /// Link to the source.
    pub source_url: Option<String>,
    /// Confidence score; higher wins.
    pub confidence: f64,
    /// When the fact was last updated; more recent wins on equal confidence.
    pub updated_at: DateTime<Utc>,
}

/// Attribution for narrative text on a card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardSource {
    /// Source label.
    pub label: String,
    /// Source URL, if known.
    pub url: Option<String>,
}

/// Parameters for the ranked nearby-POI query.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NearbyQuery {
    /// Center of the search.
    pub point: GeoPoint,
    /// Search radius in meters.
    pub radius_m: u32,
    /// Maximum number of rows to return.
    pub limit: u32,
    /// Multiplier applied to `rank_score` in the composite score.
    pub rank_weight: f64,
}

/// A composed "what is here?" card.
///
/// Every field except [`Card::mode`] may be absent; a card is always
/// returned on a successful composition even when nothing was found.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Card {
    /// Primary name of the snapped street.
    pub canonical_street: Option<String>,
    /// Borough of the snapped street.
    pub borough: Option<String>,
    /// Name of the containing neighborhood.
    pub neighborhood: Option<String>,
    /// Street classification.
    pub mode: CardMode,
    /// Distance to the snapped street in meters.
    pub snap_distance_m: Option<i32>,
    /// Narrative text chosen by the fallback chain.
    pub did_you_know: Option<String>,
    /// Attribution for [`Card::did_you_know`]; empty for synthesized text.
    pub sources: Vec<CardSource>,
    /// Confidence of the attached fact.
    pub fact_confidence: Option<f64>,
    /// Nearby points of interest, best first.
    pub nearby: Vec<PoiItem>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mode_serializes_screaming_snake_case() {
        assert_eq!(
            serde_json::to_string(&CardMode::NumberedStreet).unwrap(),
            "\"NUMBERED_STREET\""
        );
        assert_eq!(CardMode::NamedStreet.to_string(), "NAMED_STREET");
        assert_eq!("NEAR".parse::<CardMode>().unwrap(), CardMode::Near);
    }

    #[test]
    fn poi_item_rounds_distance() {
        let item = PoiItem::from(PoiCandidate {
            name: "Cafe".to_string(),
            category: "food".to_string(),
            distance_m: 49.6,
            rank_score: 0.2,
        });
        assert_eq!(item.distance_m, 50);
    }

    #[test]
    fn fix_point_preserves_coordinates() {
        let point = Fix::new(40.73, -73.99, 10.0).point();
        assert!((point.latitude - 40.73).abs() < f64::EPSILON);
        assert!((point.longitude - (-73.99)).abs() < f64::EPSILON);
    }
}
