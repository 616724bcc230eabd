//! `PostGIS` queries backing the spatial store.
//!
//! All distances are geodesic (`::geography`) and in meters. Points are
//! built with `ST_MakePoint(lon, lat)` in SRID 4326.

use moosicbox_json_utils::database::ToValue as _;
use street_card_models::{Fact, GeoPoint, Neighborhood, NearbyQuery, PoiCandidate, StreetSegment};
use switchy_database::{Database, DatabaseValue, Row};

use crate::DbError;

/// Nearest street segment within a radius.
///
/// Params: `$1` lon, `$2` lat, `$3` radius in meters.
pub const NEAREST_STREET_SQL: &str = "
WITH p AS (
  SELECT ST_SetSRID(ST_MakePoint($1, $2), 4326)::geography AS g
)
SELECT
  s.id,
  s.street_code,
  s.primary_name,
  s.borough,
  ROUND(ST_Distance(s.geom::geography, p.g))::int AS dist_m
FROM street_segment s, p
WHERE ST_DWithin(s.geom::geography, p.g, $3)
ORDER BY ST_Distance(s.geom::geography, p.g)
LIMIT 1";

/// Neighborhood polygon containing a point.
///
/// Params: `$1` lon, `$2` lat.
pub const CONTAINING_NEIGHBORHOOD_SQL: &str = "
SELECT name
FROM neighborhood
WHERE ST_Contains(geom, ST_SetSRID(ST_MakePoint($1, $2), 4326))
LIMIT 1";

/// POIs within a radius, ranked by `rank_score * weight - distance`.
///
/// Params: `$1` lon, `$2` lat, `$3` radius in meters, `$4` rank weight,
/// `$5` limit.
pub const NEARBY_POIS_SQL: &str = "
WITH p AS (
  SELECT ST_SetSRID(ST_MakePoint($1, $2), 4326)::geography AS g
)
SELECT
  poi.name,
  poi.category,
  poi.rank_score,
  ST_Distance(poi.geom::geography, p.g) AS distance_m
FROM poi, p
WHERE ST_DWithin(poi.geom::geography, p.g, $3)
ORDER BY (poi.rank_score * $4) - ST_Distance(poi.geom::geography, p.g) DESC,
         distance_m ASC,
         poi.name ASC
LIMIT $5";

/// Best fact for a street code: highest confidence, then most recent.
///
/// Params: `$1` street code.
pub const BEST_FACT_SQL: &str = "
SELECT fact_text, source_label, source_url, confidence, updated_at
FROM fact
WHERE key_type = 'street_code' AND key_value = $1
ORDER BY confidence DESC, updated_at DESC
LIMIT 1";

fn point_params(point: GeoPoint) -> [DatabaseValue; 2] {
    [
        DatabaseValue::Real64(point.longitude),
        DatabaseValue::Real64(point.latitude),
    ]
}

/// `ST_DWithin` takes its distance as `double precision`.
fn radius_param(radius_m: u32) -> DatabaseValue {
    DatabaseValue::Real64(f64::from(radius_m))
}

fn conversion<E: std::fmt::Display>(what: &'static str) -> impl FnOnce(E) -> DbError {
    move |e| DbError::Conversion {
        message: format!("Failed to parse {what}: {e}"),
    }
}

/// Finds the street segment nearest to `point` within `radius_m` meters.
///
/// # Errors
///
/// Returns [`DbError`] if the query fails or the row cannot be converted.
pub async fn nearest_street(
    db: &dyn Database,
    point: GeoPoint,
    radius_m: u32,
) -> Result<Option<StreetSegment>, DbError> {
    let [lon, lat] = point_params(point);
    let rows = db
        .query_raw_params(NEAREST_STREET_SQL, &[lon, lat, radius_param(radius_m)])
        .await?;

    rows.first().map(street_from_row).transpose()
}

fn street_from_row(row: &Row) -> Result<StreetSegment, DbError> {
    let id: i64 = row.to_value("id").map_err(conversion("street segment id"))?;
    let snap_distance_m: i32 = row
        .to_value("dist_m")
        .map_err(conversion("street snap distance"))?;
    let street_code: Option<String> = row
        .to_value("street_code")
        .map_err(conversion("street code"))?;
    let primary_name: Option<String> = row
        .to_value("primary_name")
        .map_err(conversion("street name"))?;
    let borough: Option<String> = row.to_value("borough").map_err(conversion("borough"))?;

    Ok(StreetSegment {
        id,
        street_code,
        primary_name,
        borough,
        snap_distance_m,
    })
}

/// Finds the neighborhood containing `point`.
///
/// # Errors
///
/// Returns [`DbError`] if the query fails or the row cannot be converted.
pub async fn containing_neighborhood(
    db: &dyn Database,
    point: GeoPoint,
) -> Result<Option<Neighborhood>, DbError> {
    let rows = db
        .query_raw_params(CONTAINING_NEIGHBORHOOD_SQL, &point_params(point))
        .await?;

    rows.first().map(neighborhood_from_row).transpose()
}

fn neighborhood_from_row(row: &Row) -> Result<Neighborhood, DbError> {
    let name: String = row
        .to_value("name")
        .map_err(conversion("neighborhood name"))?;

    Ok(Neighborhood { name })
}

/// Returns ranked POIs around `query.point`.
///
/// # Errors
///
/// Returns [`DbError`] if the query fails or any row cannot be converted.
pub async fn nearby_pois(
    db: &dyn Database,
    query: &NearbyQuery,
) -> Result<Vec<PoiCandidate>, DbError> {
    let [lon, lat] = point_params(query.point);
    let rows = db
        .query_raw_params(
            NEARBY_POIS_SQL,
            &[
                lon,
                lat,
                radius_param(query.radius_m),
                DatabaseValue::Real64(query.rank_weight),
                DatabaseValue::Int64(i64::from(query.limit)),
            ],
        )
        .await?;

    rows.iter().map(poi_from_row).collect()
}

fn poi_from_row(row: &Row) -> Result<PoiCandidate, DbError> {
    let name: String = row.to_value("name").map_err(conversion("POI name"))?;
    let category: String = row
        .to_value("category")
        .map_err(conversion("POI category"))?;
    let distance_m: f64 = row
        .to_value("distance_m")
        .map_err(conversion("POI distance"))?;
    let rank_score: f64 = row
        .to_value("rank_score")
        .map_err(conversion("POI rank score"))?;

    Ok(PoiCandidate {
        name,
        category,
        distance_m,
        rank_score,
    })
}

/// Returns the best fact recorded for `street_code`.
///
/// # Errors
///
/// Returns [`DbError`] if the query fails or the row cannot be converted.
pub async fn best_fact(db: &dyn Database, street_code: &str) -> Result<Option<Fact>, DbError> {
    let rows = db
        .query_raw_params(
            BEST_FACT_SQL,
            &[DatabaseValue::String(street_code.to_string())],
        )
        .await?;

    rows.first().map(fact_from_row).transpose()
}

fn fact_from_row(row: &Row) -> Result<Fact, DbError> {
    let text: String = row.to_value("fact_text").map_err(conversion("fact text"))?;
    let source_label: Option<String> = row
        .to_value("source_label")
        .map_err(conversion("fact source label"))?;
    let source_url: Option<String> = row
        .to_value("source_url")
        .map_err(conversion("fact source url"))?;
    let confidence: f64 = row
        .to_value("confidence")
        .map_err(conversion("fact confidence"))?;
    let updated_at: chrono::NaiveDateTime = row
        .to_value("updated_at")
        .map_err(conversion("fact updated_at"))?;

    Ok(Fact {
        text,
        source_label,
        source_url,
        confidence,
        updated_at: chrono::DateTime::<chrono::Utc>::from_naive_utc_and_offset(
            updated_at,
            chrono::Utc,
        ),
    })
}
