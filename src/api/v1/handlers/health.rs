/*
 * Responsibility
 * - GET /health (liveness)
 * - sits outside /api/v1, so the authentication gate never sees it
 */
use axum::{Json, http::StatusCode, response::IntoResponse};
use serde_json::json;

pub async fn health() -> impl IntoResponse {
    (StatusCode::OK, Json(json!({"status": "ok"})))
}
