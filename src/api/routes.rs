//! Router assembly.

use crate::api::handlers::{convert, get_all_currencies, health, metrics_handler, AppState};
use crate::api::openapi::FxApiDoc;
use crate::core::{request_id_middleware, MetricsMiddleware};
use axum::{routing::get, Router};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// Build the full application router.
///
/// CORS is open to any origin. Metrics are recorded per matched route.
pub fn build_router(state: Arc<AppState>) -> Router {
    let api_routes = Router::new()
        .route("/convert", get(convert))
        .route("/getAllCurrencies", get(get_all_currencies))
        .route("/health", get(health))
        .route_layer(axum::middleware::from_fn(MetricsMiddleware::track_metrics))
        .with_state(state);

    let swagger_ui = SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", FxApiDoc::openapi());

    Router::new()
        .merge(swagger_ui)
        .merge(api_routes)
        .route("/metrics", get(metrics_handler))
        .layer(axum::middleware::from_fn(request_id_middleware))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}
