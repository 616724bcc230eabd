#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Street card API server binary.

#[actix_web::main]
async fn main() -> Result<(), street_card_server::ServerError> {
    street_card_server::run_server().await
}
