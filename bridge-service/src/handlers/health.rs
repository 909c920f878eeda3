use crate::services::get_metrics;
use crate::startup::AppState;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::json;
use service_core::error::AppError;

pub const SERVICE_NAME: &str = "ai-ecosystem-bridge";

/// Liveness only. Does not touch either store.
pub async fn health_check() -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(json!({ "status": "healthy", "service": SERVICE_NAME })),
    )
}

/// Readiness: both stores must accept a connection and answer a trivial query.
pub async fn readiness_check(State(state): State<AppState>) -> impl IntoResponse {
    let (postgres, mongodb) = tokio::join!(state.chatwoot.ping(), state.librechat.ping());

    if postgres.is_ok() && mongodb.is_ok() {
        return (StatusCode::OK, Json(json!({ "status": "ready" })));
    }

    let describe = |result: Result<(), AppError>| match result {
        Ok(()) => "ok".to_string(),
        Err(e) => e.to_string(),
    };
    tracing::warn!("Readiness check failed");

    (
        StatusCode::SERVICE_UNAVAILABLE,
        Json(json!({
            "status": "unavailable",
            "postgres": describe(postgres),
            "mongodb": describe(mongodb),
        })),
    )
}

/// Prometheus metrics endpoint.
pub async fn metrics_endpoint() -> impl IntoResponse {
    (
        StatusCode::OK,
        [("content-type", "text/plain; charset=utf-8")],
        get_metrics(),
    )
}

pub async fn not_found() -> AppError {
    AppError::NotFound("Not Found".to_string())
}
