use axum::{routing::get, Router};
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Brixsport Analytics API",
        description = "Analytics service for Brixsport campus live score application",
        version = "1.0.0"
    ),
    paths(api::root::service_info, api::health::health_check),
    components(schemas(api::root::ServiceInfo, api::health::HealthResponse))
)]
struct ApiDoc;

pub fn build_router() -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);
    let middleware = ServiceBuilder::new()
        .layer(TraceLayer::new_for_http())
        .layer(cors);

    Router::new()
        .route("/", get(api::root::service_info))
        .route("/health", get(api::health::health_check))
        .merge(SwaggerUi::new("/docs").url("/openapi.json", ApiDoc::openapi()))
        .layer(middleware)
}
