/**
 * API Routes Configuration
 *
 * - Public: register, login
 * - Protected (behind `auth_middleware`): me, admin connection stats
 */

use axum::{
    middleware,
    routing::{get, post},
    Router,
};

use crate::backend::auth::{get_me, login, register};
use crate::backend::middleware::auth_middleware;
use crate::backend::realtime::connection_stats;
use crate::backend::server::state::AppState;

pub fn configure_api_routes(router: Router<AppState>, app_state: &AppState) -> Router<AppState> {
    let protected = Router::new()
        .route("/auth/me", get(get_me))
        .route("/admin/connections", get(connection_stats))
        .route_layer(middleware::from_fn_with_state(app_state.clone(), auth_middleware));

    router
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
        .merge(protected)
}
