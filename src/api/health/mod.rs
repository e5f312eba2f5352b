//! Health check routes
//!
//! `/health` is a plain liveness probe; `/health/detailed` also round-trips
//! the database and reports the latency.

use std::time::Instant;

use axum::{Json, Router, extract::State, routing::get};
use serde::Serialize;

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/health", get(health))
        .route("/health/detailed", get(detailed_health))
}

#[derive(Serialize)]
pub struct HealthResponse {
    status: &'static str,
    version: &'static str,
    environment: String,
}

async fn health(State(state): State<ServerState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        environment: state.config.environment.clone(),
    })
}

#[derive(Serialize)]
pub struct DetailedHealthResponse {
    status: &'static str,
    version: &'static str,
    database: CheckResult,
}

#[derive(Serialize)]
pub struct CheckResult {
    status: &'static str,
    latency_ms: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<String>,
}

async fn detailed_health(State(state): State<ServerState>) -> Json<DetailedHealthResponse> {
    let started = Instant::now();
    let database = match state.db.db.query("RETURN 1").await {
        Ok(_) => CheckResult {
            status: "ok",
            latency_ms: Some(started.elapsed().as_millis() as u64),
            message: None,
        },
        Err(e) => CheckResult {
            status: "error",
            latency_ms: None,
            message: Some(e.to_string()),
        },
    };

    Json(DetailedHealthResponse {
        status: if database.status == "ok" { "ok" } else { "error" },
        version: env!("CARGO_PKG_VERSION"),
        database,
    })
}
