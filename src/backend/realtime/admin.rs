//! Admin view of the connection registry

use axum::{extract::State, response::Json};
use serde::Serialize;

use crate::backend::middleware::AdminUser;
use crate::backend::realtime::hub::ConnectionHub;

#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct ConnectionStats {
    pub total: usize,
    pub anonymous: usize,
}

/// GET /admin/connections
pub async fn connection_stats(
    AdminUser(admin): AdminUser,
    State(hub): State<ConnectionHub>,
) -> Json<ConnectionStats> {
    let stats = hub.stats();
    tracing::debug!(user_id = admin.id, "[Realtime] Admin requested connection stats: {:?}", stats);
    Json(ConnectionStats {
        total: stats.total,
        anonymous: stats.anonymous,
    })
}
