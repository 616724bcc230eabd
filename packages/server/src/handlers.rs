//! HTTP handler functions for the street card API.

use actix_web::error::{InternalError, QueryPayloadError};
use actix_web::http::StatusCode;
use actix_web::{HttpRequest, HttpResponse, web};
use street_card::CardError;
use street_card_server_models::{ApiCard, ApiError, ApiHealth, CardQueryParams};

use crate::AppState;

/// `GET /health`
///
/// Liveness only; never touches the spatial store.
pub async fn health() -> HttpResponse {
    HttpResponse::Ok().json(ApiHealth {
        ok: true,
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// `GET /v1/card?lat=..&lon=..&acc=..`
///
/// Resolves a fix into a street card. A fix with no street in range still
/// returns 200 with the street fields null.
pub async fn card(state: web::Data<AppState>, params: web::Query<CardQueryParams>) -> HttpResponse {
    let fix = params.to_fix();

    match state.composer.compose_with_deadline(&fix).await {
        Ok(card) => HttpResponse::Ok().json(ApiCard::from(card)),
        Err(e) => {
            match &e {
                CardError::InvalidInput { .. } => log::debug!("Rejected fix {fix:?}: {e}"),
                _ => log::error!("Failed to compose card for {fix:?}: {e}"),
            }
            error_response(&e)
        }
    }
}

/// Maps a [`CardError`] to its HTTP status and JSON body.
pub fn error_response(e: &CardError) -> HttpResponse {
    let (status, kind) = match e {
        CardError::InvalidInput { .. } => (StatusCode::BAD_REQUEST, "invalid_input"),
        CardError::CollaboratorUnavailable(_) => {
            (StatusCode::SERVICE_UNAVAILABLE, "collaborator_unavailable")
        }
        CardError::Timeout { .. } => (StatusCode::GATEWAY_TIMEOUT, "timeout"),
        CardError::Cancelled => (StatusCode::SERVICE_UNAVAILABLE, "cancelled"),
    };

    HttpResponse::build(status).json(ApiError {
        error: kind.to_string(),
        message: e.to_string(),
    })
}

/// Renders malformed or missing query parameters as a JSON 400.
pub fn query_error(err: QueryPayloadError, _req: &HttpRequest) -> actix_web::Error {
    let response = HttpResponse::BadRequest().json(ApiError {
        error: "invalid_input".to_string(),
        message: err.to_string(),
    });
    InternalError::from_response(err, response).into()
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use actix_web::{App, test};
    use async_trait::async_trait;
    use street_card::{CardComposer, CardConfig, SpatialStore, StoreError};
    use street_card_models::{
        CardMode, Fact, GeoPoint, Neighborhood, NearbyQuery, PoiCandidate, StreetSegment,
    };

    use super::*;

    #[derive(Default)]
    struct FixtureStore {
        street: Option<StreetSegment>,
        neighborhood: Option<Neighborhood>,
        unavailable: bool,
        calls: AtomicUsize,
    }

    impl FixtureStore {
        fn check(&self) -> Result<(), StoreError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.unavailable {
                return Err(StoreError::Query {
                    message: "connection refused".to_string(),
                });
            }
            Ok(())
        }
    }

    #[async_trait]
    impl SpatialStore for FixtureStore {
        async fn nearest_street(
            &self,
            _point: GeoPoint,
            _radius_m: u32,
        ) -> Result<Option<StreetSegment>, StoreError> {
            self.check()?;
            Ok(self.street.clone())
        }

        async fn containing_neighborhood(
            &self,
            _point: GeoPoint,
        ) -> Result<Option<Neighborhood>, StoreError> {
            self.check()?;
            Ok(self.neighborhood.clone())
        }

        async fn nearby_pois(&self, _query: &NearbyQuery) -> Result<Vec<PoiCandidate>, StoreError> {
            self.check()?;
            Ok(vec![PoiCandidate {
                name: "Domino Park".to_string(),
                category: "park".to_string(),
                distance_m: 210.4,
                rank_score: 0.8,
            }])
        }

        async fn best_fact(&self, _street_code: &str) -> Result<Option<Fact>, StoreError> {
            self.check()?;
            Ok(None)
        }
    }

    fn state(store: Arc<FixtureStore>) -> web::Data<AppState> {
        web::Data::new(AppState::new(Arc::new(CardComposer::new(
            store,
            CardConfig::default(),
        ))))
    }

    fn williamsburg() -> FixtureStore {
        FixtureStore {
            street: Some(StreetSegment {
                id: 1,
                street_code: Some("31710".to_string()),
                primary_name: Some("Bedford Avenue".to_string()),
                borough: Some("Brooklyn".to_string()),
                snap_distance_m: 9,
            }),
            neighborhood: Some(Neighborhood {
                name: "Williamsburg".to_string(),
            }),
            ..FixtureStore::default()
        }
    }

    #[actix_rt::test]
    async fn health_is_ok_without_store() {
        let store = Arc::new(FixtureStore {
            unavailable: true,
            ..FixtureStore::default()
        });
        let app = test::init_service(
            App::new()
                .app_data(state(store.clone()))
                .configure(crate::configure),
        )
        .await;

        let req = test::TestRequest::get().uri("/health").to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body["ok"], true);
        assert_eq!(store.calls.load(Ordering::SeqCst), 0);
    }

    #[actix_rt::test]
    async fn card_returns_composed_card() {
        let app = test::init_service(
            App::new()
                .app_data(state(Arc::new(williamsburg())))
                .configure(crate::configure),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/v1/card?lat=40.7178&lon=-73.9571&acc=12")
            .to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body["canonical_street"], "Bedford Avenue");
        assert!(body["cross_street"].is_null());
        assert_eq!(body["borough"], "Brooklyn");
        assert_eq!(body["neighborhood"], "Williamsburg");
        assert_eq!(body["mode"], CardMode::NamedStreet.as_ref());
        assert_eq!(
            body["did_you_know"],
            "You're in Williamsburg. Check nearby landmarks for context."
        );
        assert_eq!(body["nearby"][0]["name"], "Domino Park");
        assert_eq!(body["nearby"][0]["distance_m"], 210);
        assert_eq!(body["sources"], serde_json::json!([]));
    }

    #[actix_rt::test]
    async fn card_without_street_is_degraded_success() {
        let app = test::init_service(
            App::new()
                .app_data(state(Arc::new(FixtureStore::default())))
                .configure(crate::configure),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/v1/card?lat=40.5&lon=-74.3")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["mode"], "NEAR");
        assert!(body["canonical_street"].is_null());
        assert!(body["borough"].is_null());
        assert!(body["snap_distance_m"].is_null());
        assert!(body["did_you_know"].is_null());
    }

    #[actix_rt::test]
    async fn out_of_range_fix_is_bad_request() {
        let store = Arc::new(FixtureStore::default());
        let app = test::init_service(
            App::new()
                .app_data(state(store.clone()))
                .configure(crate::configure),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/v1/card?lat=123.0&lon=-73.9")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["error"], "invalid_input");
        assert_eq!(store.calls.load(Ordering::SeqCst), 0);
    }

    #[actix_rt::test]
    async fn malformed_query_is_json_bad_request() {
        let app = test::init_service(
            App::new()
                .app_data(state(Arc::new(FixtureStore::default())))
                .configure(crate::configure),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/v1/card?lat=north&lon=-73.9")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["error"], "invalid_input");
    }

    #[actix_rt::test]
    async fn store_failure_is_service_unavailable() {
        let app = test::init_service(
            App::new()
                .app_data(state(Arc::new(FixtureStore {
                    unavailable: true,
                    ..FixtureStore::default()
                })))
                .configure(crate::configure),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/v1/card?lat=40.7&lon=-73.9&acc=30")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);

        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["error"], "collaborator_unavailable");
    }

    #[::core::prelude::v1::test]
    fn timeout_maps_to_gateway_timeout() {
        let resp = error_response(&CardError::Timeout { elapsed_ms: 5_000 });
        assert_eq!(resp.status(), StatusCode::GATEWAY_TIMEOUT);
    }
}
