//! Realtime route configuration

use axum::{routing::get, Router};

use crate::backend::realtime::handle_websocket;
use crate::backend::server::state::AppState;

/// `GET /ws` - never requires auth; the identity is resolved optionally
pub fn configure_realtime_routes(router: Router<AppState>) -> Router<AppState> {
    router.route("/ws", get(handle_websocket))
}
