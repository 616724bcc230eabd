#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! API request and response types for the street card server.
//!
//! These types are serialized to JSON for the REST API. They are separate
//! from the domain types in `street_card_models` so the wire contract
//! (snake case field names, the always-null `cross_street`) can evolve
//! independently.

use serde::{Deserialize, Serialize};
use street_card_models::{Card, CardMode, CardSource, Fix, PoiItem};

/// Accuracy assumed when the client omits `acc`, in meters.
pub const DEFAULT_ACCURACY_M: f64 = 25.0;

/// Query parameters for `GET /v1/card`.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct CardQueryParams {
    /// Latitude in degrees.
    pub lat: f64,
    /// Longitude in degrees.
    pub lon: f64,
    /// Horizontal accuracy in meters.
    pub acc: Option<f64>,
}

impl CardQueryParams {
    /// Converts the parameters into a [`Fix`], defaulting the accuracy.
    #[must_use]
    pub fn to_fix(&self) -> Fix {
        Fix::new(self.lat, self.lon, self.acc.unwrap_or(DEFAULT_ACCURACY_M))
    }
}

/// A nearby point of interest as returned by the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiNearbyItem {
    /// POI name.
    pub name: String,
    /// POI category.
    pub category: String,
    /// Distance from the fix in meters.
    pub distance_m: i64,
}

impl From<PoiItem> for ApiNearbyItem {
    fn from(item: PoiItem) -> Self {
        Self {
            name: item.name,
            category: item.category,
            distance_m: item.distance_m,
        }
    }
}

/// Attribution for the card's narrative text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiSource {
    /// Source label.
    pub label: String,
    /// Source URL.
    pub url: Option<String>,
}

impl From<CardSource> for ApiSource {
    fn from(source: CardSource) -> Self {
        Self {
            label: source.label,
            url: source.url,
        }
    }
}

/// A street card as returned by the API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiCard {
    /// Primary name of the snapped street.
    pub canonical_street: Option<String>,
    /// Cross street; not resolved yet, always `null`.
    pub cross_street: Option<String>,
    /// Borough of the snapped street.
    pub borough: Option<String>,
    /// Containing neighborhood.
    pub neighborhood: Option<String>,
    /// Street classification.
    pub mode: CardMode,
    /// Distance to the snapped street in meters.
    pub snap_distance_m: Option<i32>,
    /// Narrative text.
    pub did_you_know: Option<String>,
    /// Confidence of the attached fact.
    pub fact_confidence: Option<f64>,
    /// Nearby points of interest, best first.
    pub nearby: Vec<ApiNearbyItem>,
    /// Attribution for `did_you_know`.
    pub sources: Vec<ApiSource>,
}

impl From<Card> for ApiCard {
    fn from(card: Card) -> Self {
        Self {
            canonical_street: card.canonical_street,
            cross_street: None,
            borough: card.borough,
            neighborhood: card.neighborhood,
            mode: card.mode,
            snap_distance_m: card.snap_distance_m,
            did_you_know: card.did_you_know,
            fact_confidence: card.fact_confidence,
            nearby: card.nearby.into_iter().map(ApiNearbyItem::from).collect(),
            sources: card.sources.into_iter().map(ApiSource::from).collect(),
        }
    }
}

/// Health check response.
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiHealth {
    /// Whether the service is up.
    pub ok: bool,
    /// Service version.
    pub version: String,
}

/// Error response body.
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiError {
    /// Machine-readable error kind (e.g. `"invalid_input"`).
    pub error: String,
    /// Human-readable detail.
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accuracy_defaults_when_omitted() {
        let params = CardQueryParams {
            lat: 40.7,
            lon: -73.9,
            acc: None,
        };
        assert!((params.to_fix().accuracy_m - DEFAULT_ACCURACY_M).abs() < f64::EPSILON);
    }

    #[test]
    fn card_json_has_wire_field_names() {
        let card = ApiCard::from(Card {
            canonical_street: Some("Broadway".to_string()),
            borough: Some("Manhattan".to_string()),
            neighborhood: None,
            mode: CardMode::NamedStreet,
            snap_distance_m: Some(8),
            did_you_know: Some("Broadway follows an old trail.".to_string()),
            sources: vec![CardSource {
                label: "source".to_string(),
                url: None,
            }],
            fact_confidence: Some(0.5),
            nearby: vec![PoiItem {
                name: "Trinity Church".to_string(),
                category: "church".to_string(),
                distance_m: 120,
            }],
        });

        let json = serde_json::to_value(&card).unwrap();

        assert_eq!(json["canonical_street"], "Broadway");
        assert!(json["cross_street"].is_null());
        assert!(json["neighborhood"].is_null());
        assert_eq!(json["mode"], "NAMED_STREET");
        assert_eq!(json["snap_distance_m"], 8);
        assert_eq!(json["nearby"][0]["distance_m"], 120);
        assert_eq!(json["sources"][0]["label"], "source");
        assert!(json["sources"][0]["url"].is_null());
    }
}
