use axum::{http::StatusCode, response::IntoResponse, Json};
use chrono::Utc;
use serde_json::json;

use crate::{utils::iso8601, SERVICE_NAME};

/// Liveness check. Always healthy while the process can answer.
pub async fn health_check() -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(json!({
            "status": "healthy",
            "timestamp": iso8601(&Utc::now()),
            "service": SERVICE_NAME
        })),
    )
}
