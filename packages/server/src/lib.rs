#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Actix-Web API server for street cards.
//!
//! Serves `GET /v1/card` (resolve a GPS fix into a street card) and
//! `GET /health`. The `PostGIS` connection is opened once at startup,
//! shared by every worker through [`AppState`], and released after the
//! server has drained on shutdown.

mod handlers;

use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{App, HttpServer, middleware, web};
use street_card::{CardComposer, CardConfig, ConfigError};
use street_card_database::{DbError, PostgisStore, db, run_migrations};
use switchy_database::Database;

const DEFAULT_BIND_ADDR: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 8000;
const DEFAULT_SHUTDOWN_TIMEOUT_SECS: u64 = 30;

/// Shared application state.
pub struct AppState {
    /// Card composer over the spatial store.
    pub composer: Arc<CardComposer>,
}

impl AppState {
    /// Creates state around a composer.
    #[must_use]
    pub const fn new(composer: Arc<CardComposer>) -> Self {
        Self { composer }
    }
}

/// Errors that prevent the server from starting or running.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// The card config could not be loaded.
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    /// The database connection could not be opened.
    #[error("Database connection error: {message}")]
    Connect {
        /// Description of the failure.
        message: String,
    },

    /// Migrations failed.
    #[error(transparent)]
    Database(#[from] DbError),

    /// The HTTP server failed to bind or run.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Registers the API routes.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::QueryConfig::default().error_handler(handlers::query_error))
        .route("/health", web::get().to(handlers::health))
        .service(web::scope("/v1").route("/card", web::get().to(handlers::card)));
}

fn log_config(config: &CardConfig) {
    log::info!(
        "Card config: snap radius {}..={} m, POI radius {} m (limit {}), timeout {} ms",
        config.snap.floor_m,
        config.snap.cap_m,
        config.poi.radius_m,
        config.poi.limit,
        config.query_timeout_ms,
    );
}

/// Starts the street card API server.
///
/// Loads the card config, connects to `PostGIS`, runs migrations, and
/// serves until the process receives a shutdown signal. In-flight requests
/// get `SHUTDOWN_TIMEOUT_SECS` to finish. The caller provides the async
/// runtime (e.g. via `#[actix_web::main]`).
///
/// # Errors
///
/// Returns [`ServerError`] if the config is invalid, the database cannot
/// be reached or migrated, or the HTTP server fails to bind.
#[allow(clippy::future_not_send)]
pub async fn run_server() -> Result<(), ServerError> {
    pretty_env_logger::init_custom_env("RUST_LOG");

    let config = CardConfig::from_env()?;

    log::info!("Connecting to database...");
    let db_conn: Arc<dyn Database> = Arc::from(db::connect_from_env().await.map_err(|e| {
        ServerError::Connect {
            message: e.to_string(),
        }
    })?);

    log::info!("Running migrations...");
    run_migrations(db_conn.as_ref()).await?;

    let store = Arc::new(PostgisStore::new(db_conn));
    let composer = Arc::new(CardComposer::new(store, config));
    log_config(composer.config());
    let state = web::Data::new(AppState::new(composer));

    let bind_addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string());
    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(DEFAULT_PORT);
    let shutdown_timeout = std::env::var("SHUTDOWN_TIMEOUT_SECS")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(DEFAULT_SHUTDOWN_TIMEOUT_SECS);

    log::info!("Starting server on {bind_addr}:{port}");

    let app_state = state.clone();
    HttpServer::new(move || {
        App::new()
            .wrap(Cors::permissive())
            .wrap(middleware::Logger::default())
            .app_data(app_state.clone())
            .configure(configure)
    })
    .shutdown_timeout(shutdown_timeout)
    .bind((bind_addr, port))?
    .run()
    .await?;

    log::info!("Server drained; releasing spatial store");
    drop(state);
    log::info!("Shutdown complete");

    Ok(())
}
