pub mod auth;
pub mod config;
pub mod database;
mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod service;
pub mod validation;

#[cfg(test)]
pub mod test_utils;

pub use config::Config;

use crate::auth::build_verifier;
use crate::db::stage_db;
use crate::middleware::{Cors, RequestLogger};
use crate::routes as app_routes;
use rocket::{Build, Rocket, catchers};
use tracing_subscriber::EnvFilter;

/// Installs the global tracing subscriber. Call once, before building the server.
pub fn init_tracing(log_level: &str, json_format: bool) {
    // RUST_LOG takes precedence over the configured level, e.g.
    //   RUST_LOG=debug
    //   RUST_LOG=info,apacks_server::auth=debug
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    let subscriber = tracing_subscriber::fmt().with_env_filter(filter).with_target(true).with_line_number(true);

    if json_format {
        subscriber.json().init();
    } else {
        subscriber.init();
    }
}

pub(crate) fn normalize_base_path(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return config::DEFAULT_API_BASE_PATH.to_string();
    }

    let mut normalized = if trimmed.starts_with('/') {
        trimmed.to_string()
    } else {
        format!("/{}", trimmed)
    };

    while normalized.ends_with('/') && normalized.len() > 1 {
        normalized.pop();
    }

    normalized
}

fn mount_api_routes(rocket: Rocket<Build>, base_path: &str) -> Rocket<Build> {
    rocket
        .mount("/", app_routes::health::root_routes())
        .mount(base_path, app_routes::health::routes())
        .mount(base_path, app_routes::user::routes())
}

/// Assembles the server: CORS and request logging fairings, the database
/// pool, the token verifier, routes and JSON error catchers.
pub fn build_rocket(config: Config) -> Rocket<Build> {
    let figment = rocket::Config::figment()
        .merge(("address", config.server.address.clone()))
        .merge(("port", config.server.port));

    let base_path = normalize_base_path(&config.api.base_path);
    let verifier = build_verifier(&config.jwt);

    let rocket = rocket::custom(figment)
        .attach(Cors::new(config.cors.allowed_origin.clone()))
        .attach(RequestLogger)
        .attach(stage_db(config.database.clone()))
        .manage(verifier)
        .manage(config);

    mount_api_routes(rocket, &base_path).register(
        "/",
        catchers![
            app_routes::error::unauthorized,
            app_routes::error::not_found,
            app_routes::error::unprocessable_entity,
            app_routes::error::internal_error,
            app_routes::error::default_catcher
        ],
    )
}
