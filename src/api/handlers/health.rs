use axum::extract::State;
use axum::http::header::CONTENT_TYPE;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde_json::json;

use crate::AppState;

pub async fn root() -> impl IntoResponse {
    Json(json!({ "message": "Credit Risk API is running" }))
}

pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    let db_ok = sqlx::query("SELECT 1").execute(&state.db).await.is_ok();
    let scoring = if state.scoring.has_model() { "model" } else { "heuristic" };

    if db_ok {
        (StatusCode::OK, Json(json!({ "status": "healthy", "scoring": scoring })))
    } else {
        (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({ "status": "unhealthy", "db": "disconnected", "scoring": scoring })),
        )
    }
}

/// GET /metrics: Prometheus scrape payload.
pub async fn render_metrics(State(state): State<AppState>) -> impl IntoResponse {
    ([(CONTENT_TYPE, "text/plain; version=0.0.4")], state.metrics_handle.render())
}
