/*
 * Responsibility
 * - GET /api/health (疎通用)
 * - store には触れない (DB が落ちていても 200)
 */
use axum::{Json, http::StatusCode, response::IntoResponse};
use serde_json::json;

pub async fn health() -> impl IntoResponse {
    (StatusCode::OK, Json(json!({"status": "ok"})))
}
