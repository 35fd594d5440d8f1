/**
 * Main Router
 *
 * Assembles all routes, the request trace layer, and the 404 fallback.
 */

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, response::Json, routing::get, Router};
use serde_json::{json, Value};
use tower_http::trace::TraceLayer;

use crate::backend::routes::api_routes::configure_api_routes;
use crate::backend::routes::realtime_routes::configure_realtime_routes;
use crate::backend::server::state::AppState;
use crate::shared::AppConfig;

pub fn create_router(app_state: AppState) -> Router<()> {
    let router = Router::new().route("/health", get(health));

    let router = configure_api_routes(router, &app_state);
    let router = configure_realtime_routes(router);

    let router = router.fallback(|| async {
        (StatusCode::NOT_FOUND, Json(json!({"error": "Not Found", "status": 404})))
    });

    router.layer(TraceLayer::new_for_http()).with_state(app_state)
}

/// GET /health
async fn health(State(config): State<Arc<AppConfig>>) -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "service": config.app_name,
    }))
}
