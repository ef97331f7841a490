use axum::Json;
use serde::Serialize;
use utoipa::ToSchema;

#[derive(Serialize, ToSchema)]
pub struct ServiceInfo {
    message: &'static str,
}

#[utoipa::path(
    get,
    path = "/",
    responses((status = 200, description = "Service banner", body = ServiceInfo))
)]
pub async fn service_info() -> Json<ServiceInfo> {
    Json(ServiceInfo {
        message: "Brixsport Analytics Service",
    })
}
