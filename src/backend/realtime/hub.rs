/**
 * Connection Hub
 *
 * Tracks live realtime connections keyed by identity and fans messages out
 * to them.
 *
 * # Locking
 *
 * The registry sits behind a single mutex. Every operation holds it for one
 * registry step only:
 *
 * - `connect` / `disconnect` - one insert or remove
 * - `broadcast` - snapshot the target's connections, release, deliver,
 *   then re-acquire only to drop connections whose delivery failed
 * - `disconnect_all` - drain everything, release, then close each handle
 *
 * Delivery never happens under the lock. A connection that registers while
 * a broadcast is in flight may or may not receive that message.
 *
 * # Failure Handling
 *
 * A failed delivery is an implicit disconnect of that one connection. It is
 * logged, the connection is removed and closed, and the remaining recipients
 * are unaffected. `broadcast` itself never fails.
 */

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use axum::extract::ws::Utf8Bytes;
use serde::Serialize;

use crate::backend::auth::identity::Identity;
use crate::backend::realtime::connection::{ConnectionHandle, ConnectionId};
use crate::shared::RealtimeEvent;

/// Recipients of a broadcast
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    /// Every registered connection, anonymous included
    All,
    /// Connections registered under one identity
    Identity(Identity),
}

impl From<Identity> for Target {
    fn from(identity: Identity) -> Self {
        Self::Identity(identity)
    }
}

/// Point-in-time registry counts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HubStats {
    pub total: usize,
    pub anonymous: usize,
    /// Distinct users with at least one connection
    pub users: usize,
}

#[derive(Default)]
struct Registry {
    by_identity: HashMap<Identity, HashMap<ConnectionId, ConnectionHandle>>,
    /// Reverse index; keeps each connection under exactly one identity
    owners: HashMap<ConnectionId, Identity>,
    shut_down: bool,
}

impl Registry {
    fn insert(&mut self, connection: ConnectionHandle, identity: Identity) {
        let id = connection.id();
        if let Some(previous) = self.owners.insert(id, identity) {
            if previous != identity {
                self.remove_entry(id, &previous);
            }
        }
        self.by_identity
            .entry(identity)
            .or_default()
            .insert(id, connection);
    }

    fn remove(&mut self, id: ConnectionId, identity: &Identity) -> Option<ConnectionHandle> {
        let removed = self.remove_entry(id, identity)?;
        self.owners.remove(&id);
        Some(removed)
    }

    fn remove_entry(&mut self, id: ConnectionId, identity: &Identity) -> Option<ConnectionHandle> {
        let set = self.by_identity.get_mut(identity)?;
        let removed = set.remove(&id);
        if set.is_empty() {
            self.by_identity.remove(identity);
        }
        removed
    }

    fn snapshot(&self, target: &Target) -> Vec<(Identity, ConnectionHandle)> {
        match target {
            Target::All => self
                .by_identity
                .iter()
                .flat_map(|(identity, set)| set.values().map(move |conn| (*identity, conn.clone())))
                .collect(),
            Target::Identity(identity) => self
                .by_identity
                .get(identity)
                .map(|set| set.values().map(|conn| (*identity, conn.clone())).collect())
                .unwrap_or_default(),
        }
    }

    fn count(&self, target: &Target) -> usize {
        match target {
            Target::All => self.owners.len(),
            Target::Identity(identity) => self.by_identity.get(identity).map_or(0, HashMap::len),
        }
    }
}

/// Shared registry of realtime connections
///
/// Cloning is cheap; clones share the same registry. Construct one at
/// startup, hand it to whatever needs to push events, and call
/// `disconnect_all` at shutdown.
#[derive(Clone, Default)]
pub struct ConnectionHub {
    registry: Arc<Mutex<Registry>>,
}

impl ConnectionHub {
    pub fn new() -> Self {
        Self::default()
    }

    // Registry mutations are single-step, so a poisoned lock still guards a
    // consistent map.
    fn lock(&self) -> MutexGuard<'_, Registry> {
        self.registry.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Register a connection under `identity`
    ///
    /// Registering the same connection again is an idempotent add; under a
    /// different identity it moves the connection. After `disconnect_all`
    /// the hub accepts nothing and closes the connection instead.
    pub fn connect(&self, connection: ConnectionHandle, identity: Identity) {
        let id = connection.id();
        {
            let mut registry = self.lock();
            if !registry.shut_down {
                registry.insert(connection, identity);
                tracing::info!(connection_id = %id, identity = %identity, "[Realtime] Connection registered");
                return;
            }
        }

        tracing::warn!(connection_id = %id, identity = %identity, "[Realtime] Hub is shut down, closing new connection");
        connection.close();
    }

    /// Remove a connection. Removing one that is not registered is a no-op.
    ///
    /// # Returns
    ///
    /// `true` if the connection was registered under `identity`
    pub fn disconnect(&self, connection: &ConnectionHandle, identity: &Identity) -> bool {
        let removed = self.lock().remove(connection.id(), identity).is_some();
        if removed {
            tracing::info!(connection_id = %connection.id(), identity = %identity, "[Realtime] Connection removed");
        }
        removed
    }

    /// Deliver `event` to every connection matching `target`
    ///
    /// # Returns
    ///
    /// Number of connections the event was delivered to
    pub fn broadcast(&self, event: &RealtimeEvent, target: impl Into<Target>) -> usize {
        let target = target.into();
        let text = match event.to_json() {
            Ok(json) => Utf8Bytes::from(json),
            Err(e) => {
                tracing::error!("[Realtime] Failed to serialize {} event: {}", event.event_type, e);
                return 0;
            }
        };

        let recipients = self.lock().snapshot(&target);

        let mut delivered = 0;
        let mut failed = Vec::new();
        for (identity, connection) in recipients {
            match connection.send(text.clone()) {
                Ok(()) => delivered += 1,
                Err(e) => {
                    tracing::warn!(
                        connection_id = %connection.id(),
                        identity = %identity,
                        "[Realtime] Delivery failed, dropping connection: {}",
                        e
                    );
                    failed.push((identity, connection));
                }
            }
        }

        if !failed.is_empty() {
            {
                let mut registry = self.lock();
                for (identity, connection) in &failed {
                    registry.remove(connection.id(), identity);
                }
            }
            for (_, connection) in &failed {
                connection.close();
            }
        }

        tracing::debug!(
            "[Realtime] {} event delivered to {} connection(s), {} dropped",
            event.event_type,
            delivered,
            failed.len()
        );
        delivered
    }

    /// Close and remove every connection
    ///
    /// The registry is empty when this returns and stays empty: the hub
    /// refuses further registrations.
    ///
    /// # Returns
    ///
    /// Number of connections that were closed
    pub fn disconnect_all(&self) -> usize {
        let drained: Vec<ConnectionHandle> = {
            let mut registry = self.lock();
            registry.shut_down = true;
            registry.owners.clear();
            std::mem::take(&mut registry.by_identity)
                .into_values()
                .flat_map(HashMap::into_values)
                .collect()
        };

        for connection in &drained {
            connection.close();
        }

        tracing::info!("[Realtime] Closed {} connection(s) for shutdown", drained.len());
        drained.len()
    }

    pub fn connection_count(&self, target: impl Into<Target>) -> usize {
        self.lock().count(&target.into())
    }

    pub fn stats(&self) -> HubStats {
        let registry = self.lock();
        HubStats {
            total: registry.owners.len(),
            anonymous: registry.count(&Target::Identity(Identity::Anonymous)),
            users: registry
                .by_identity
                .keys()
                .filter(|identity| !identity.is_anonymous())
                .count(),
        }
    }

    pub fn is_shut_down(&self) -> bool {
        self.lock().shut_down
    }
}
