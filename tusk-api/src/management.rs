use axum::{
    extract::State,
    http::header::CONTENT_TYPE,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use serde_json::json;

use crate::{error::AppError, middleware::admin_auth_middleware, state::AppState};

pub fn routes(state: AppState) -> Router<AppState> {
    let protected = Router::new()
        .route("/management/metrics", get(metrics))
        .route_layer(axum::middleware::from_fn_with_state(state, admin_auth_middleware));

    Router::new()
        .route("/management/health", get(health))
        .merge(protected)
}

async fn health() -> impl IntoResponse {
    Json(json!({ "status": "UP" }))
}

async fn metrics(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let body = state
        .metrics
        .encode()
        .map_err(|e| AppError::InternalServerError(format!("Metrics encoding failed: {}", e)))?;

    Ok(([(CONTENT_TYPE, "text/plain; version=0.0.4")], body))
}
