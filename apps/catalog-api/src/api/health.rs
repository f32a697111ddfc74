//! Health check endpoints

use axum::{Json, Router, response::IntoResponse, routing::get};
use axum_helpers::server::{HealthCheckFuture, run_health_checks};
use serde::Serialize;

use crate::state::AppState;

#[derive(Serialize)]
struct HealthResponse {
    status: String,
    service: String,
    version: String,
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        service: "catalog-api".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Readiness probe checking whichever backing services the mode uses
async fn ready(state: AppState) -> axum::response::Response {
    let mongo = state.mongo.clone();
    let redis = state.redis.clone();

    let mut checks: Vec<(&str, HealthCheckFuture<'_>)> = Vec::new();

    if let Some(client) = &mongo {
        checks.push((
            "database",
            Box::pin(async move {
                if database::mongodb::check_health(client).await {
                    Ok(())
                } else {
                    Err("MongoDB unreachable".to_string())
                }
            }),
        ));
    }

    if let Some(conn) = &redis {
        let mut conn = conn.clone();
        checks.push((
            "cache",
            Box::pin(async move {
                database::redis::check_health(&mut conn)
                    .await
                    .map_err(|e| e.to_string())
            }),
        ));
    }

    match run_health_checks(checks).await {
        Ok(response) => response.into_response(),
        Err(response) => response.into_response(),
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/ready", get(move || ready(state)))
}
