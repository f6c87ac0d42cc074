use axum::Json;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct HealthStatus {
    status: &'static str,
    message: &'static str,
}

/// Health check handler
pub async fn health_handler() -> Json<HealthStatus> {
    Json(HealthStatus {
        status: "OK",
        message: "Backend service is running",
    })
}
