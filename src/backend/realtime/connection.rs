/**
 * Realtime Connection Handle
 *
 * A connection is the server's handle on one live client session: an
 * outbound FIFO queue drained by the session's writer task, plus a shutdown
 * signal the session's receive loop listens on.
 *
 * The hub only ever holds handles. It never touches the socket, so a slow
 * client cannot stall a broadcast to everyone else; messages queue per
 * connection and are written in the order they were enqueued.
 */

use std::fmt;
use std::sync::Arc;

use axum::extract::ws::Utf8Bytes;
use thiserror::Error;
use tokio::sync::{mpsc, watch};
use uuid::Uuid;

pub type ConnectionId = Uuid;

/// Work item for a connection's writer task
#[derive(Debug, Clone, PartialEq)]
pub enum Outbound {
    Text(Utf8Bytes),
    /// Send a close frame and stop writing
    Close,
}

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum TransportError {
    #[error("connection closed")]
    Closed,
}

struct Inner {
    id: ConnectionId,
    tx: mpsc::UnboundedSender<Outbound>,
    shutdown: watch::Sender<bool>,
}

/// Cheap, cloneable handle to one client connection
#[derive(Clone)]
pub struct ConnectionHandle {
    inner: Arc<Inner>,
}

impl ConnectionHandle {
    /// Create a handle and the receiving end of its outbound queue
    ///
    /// Dropping the receiver makes every subsequent `send` fail with
    /// `TransportError::Closed`.
    pub fn new() -> (Self, mpsc::UnboundedReceiver<Outbound>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let (shutdown, _) = watch::channel(false);
        let handle = Self {
            inner: Arc::new(Inner {
                id: Uuid::new_v4(),
                tx,
                shutdown,
            }),
        };
        (handle, rx)
    }

    pub fn id(&self) -> ConnectionId {
        self.inner.id
    }

    /// Queue a text frame for delivery
    ///
    /// # Errors
    ///
    /// `TransportError::Closed` once the connection was closed or its writer
    /// has gone away.
    pub fn send(&self, text: Utf8Bytes) -> Result<(), TransportError> {
        if *self.inner.shutdown.borrow() {
            return Err(TransportError::Closed);
        }
        self.inner
            .tx
            .send(Outbound::Text(text))
            .map_err(|_| TransportError::Closed)
    }

    /// Close the connection. Idempotent.
    ///
    /// Wakes the session's receive loop and asks the writer to send a close
    /// frame. Frames already queued are still written first.
    pub fn close(&self) {
        let was_closed = self.inner.shutdown.send_replace(true);
        if !was_closed {
            let _ = self.inner.tx.send(Outbound::Close);
        }
    }

    pub fn is_closed(&self) -> bool {
        *self.inner.shutdown.borrow() || self.inner.tx.is_closed()
    }

    /// Resolves once `close` has been called
    pub async fn closed(&self) {
        let mut rx = self.inner.shutdown.subscribe();
        let _ = rx.wait_for(|closed| *closed).await;
    }
}

impl PartialEq for ConnectionHandle {
    fn eq(&self, other: &Self) -> bool {
        self.id() == other.id()
    }
}

impl Eq for ConnectionHandle {}

impl fmt::Debug for ConnectionHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionHandle")
            .field("id", &self.id())
            .field("closed", &self.is_closed())
            .finish()
    }
}
