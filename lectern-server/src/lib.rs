//! # Lectern Server
//!
//! HTTP API for the Lectern course platform.
//!
//! ## Overview
//!
//! - **Catalog**: course pages with per-lecture playback gating
//! - **Enrollment**: payment-driven access grants, admin revocation
//! - **Watch progress**: monotonic beacon ingestion and resume points
//! - **Curriculum**: admin section/lecture management with dense ordering
//!
//! The server is built on Axum over PostgreSQL; identity arrives as a
//! bearer token issued by the platform's identity service.

use axum::{Json, Router, http::HeaderValue, routing::get};
use serde_json::{Value, json};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::warn;

pub mod auth;
pub mod collaborators;
pub mod errors;
pub mod handlers;
pub mod infra;
pub mod routes;

pub use infra::app_state::AppState;

async fn health_handler() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// Assemble the full application router with its middleware stack.
pub fn build_app(state: AppState) -> Router {
    let cors = match &state.config.cors_allowed_origin {
        Some(origin) => match origin.parse::<HeaderValue>() {
            Ok(value) => CorsLayer::new()
                .allow_origin(value)
                .allow_methods(tower_http::cors::Any)
                .allow_headers(tower_http::cors::Any),
            Err(_) => {
                warn!(origin, "invalid CORS origin; falling back to same-origin only");
                CorsLayer::new()
            }
        },
        None => CorsLayer::permissive(),
    };

    Router::new()
        .route("/health", get(health_handler))
        .merge(routes::create_api_router(state.clone()))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
