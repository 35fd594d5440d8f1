//! Server-initiated pushes
//!
//! Producers (task execution, admin tooling) push events to a user through
//! these helpers instead of building frames themselves.

use crate::backend::auth::identity::{Identity, UserId};
use crate::backend::realtime::hub::{ConnectionHub, Target};
use crate::shared::{RealtimeEvent, TaskSnapshot};

/// Push a task's current state to every connection of its owner
///
/// # Returns
///
/// Number of connections the update reached. Zero when the owner has no
/// live session or the snapshot could not be encoded.
pub fn notify_task_update(hub: &ConnectionHub, owner_id: UserId, task: &TaskSnapshot) -> usize {
    let event = match RealtimeEvent::task_update(task) {
        Ok(event) => event,
        Err(e) => {
            tracing::error!("[Realtime] Failed to build task_update for task {}: {}", task.id, e);
            return 0;
        }
    };

    let delivered = hub.broadcast(&event, Identity::User(owner_id));
    tracing::debug!(
        "[Realtime] task_update for task {} reached {} connection(s) of user {}",
        task.id,
        delivered,
        owner_id
    );
    delivered
}

/// Push a notification to one user, or to everyone when `user_id` is `None`
pub fn notify_user(hub: &ConnectionHub, user_id: Option<UserId>, title: &str, message: &str) -> usize {
    let event = RealtimeEvent::notification(title, message);
    match user_id {
        Some(id) => hub.broadcast(&event, Identity::User(id)),
        None => hub.broadcast(&event, Target::All),
    }
}
