use axum::Json;
use serde::Serialize;
use utoipa::ToSchema;

#[derive(Serialize, ToSchema)]
pub struct HealthResponse {
    status: &'static str,
}

/// Liveness probe polled by external monitoring.
#[utoipa::path(
    get,
    path = "/health",
    responses((status = 200, description = "Service is alive", body = HealthResponse))
)]
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse { status: "OK" })
}
