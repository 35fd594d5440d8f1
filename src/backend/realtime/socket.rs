/**
 * Realtime WebSocket Session
 *
 * Entry point for `GET /ws`. The upgrade never fails on credentials: the
 * token is resolved optionally and a missing or bad one yields an anonymous
 * session.
 *
 * # Session Lifecycle
 *
 * 1. Upgrade, create a connection handle, register it with the hub
 * 2. Spawn the writer task that drains the handle's outbound queue
 * 3. Receive loop: answer every JSON message with a pong
 * 4. On client close, transport error, non-JSON text or hub shutdown:
 *    deregister and close the handle
 *
 * # Pong Routing
 *
 * For a user session the pong is broadcast to the user's identity, so all
 * of that user's tabs see it. An anonymous session only answers itself.
 */

use axum::{
    extract::{
        ws::{close_code, CloseFrame, Message, Utf8Bytes, WebSocket, WebSocketUpgrade},
        State,
    },
    response::Response,
};
use futures_util::{stream::SplitSink, SinkExt, StreamExt};
use thiserror::Error;
use tokio::sync::mpsc::UnboundedReceiver;

use crate::backend::auth::identity::Identity;
use crate::backend::middleware::OptionalIdentity;
use crate::backend::realtime::connection::{ConnectionHandle, Outbound, TransportError};
use crate::backend::realtime::hub::ConnectionHub;
use crate::shared::{RealtimeEvent, SharedError};

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("inbound message is not valid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error(transparent)]
    Encode(#[from] SharedError),
}

/// GET /ws
pub async fn handle_websocket(
    State(hub): State<ConnectionHub>,
    OptionalIdentity(identity): OptionalIdentity,
    ws: WebSocketUpgrade,
) -> Response {
    tracing::info!(identity = %identity, "[Realtime] WebSocket upgrade requested");
    ws.on_upgrade(move |socket| run_session(socket, hub, identity))
}

/// Drive one client session until it ends
pub async fn run_session(socket: WebSocket, hub: ConnectionHub, identity: Identity) {
    let (sink, mut stream) = socket.split();
    let (connection, rx) = ConnectionHandle::new();
    let writer = tokio::spawn(writer_task(sink, rx, connection.clone()));

    hub.connect(connection.clone(), identity);

    loop {
        tokio::select! {
            _ = connection.closed() => break,
            frame = stream.next() => match frame {
                Some(Ok(Message::Text(text))) => {
                    if let Err(e) = dispatch(&hub, &connection, identity, text.as_str()) {
                        tracing::warn!(
                            connection_id = %connection.id(),
                            identity = %identity,
                            "[Realtime] Ending session: {}",
                            e
                        );
                        break;
                    }
                }
                Some(Ok(Message::Close(_))) | None => break,
                Some(Ok(_)) => {}
                Some(Err(e)) => {
                    tracing::debug!(connection_id = %connection.id(), "[Realtime] Receive failed: {}", e);
                    break;
                }
            },
        }
    }

    hub.disconnect(&connection, &identity);
    connection.close();
    if let Err(e) = writer.await {
        tracing::error!(connection_id = %connection.id(), "[Realtime] Writer task panicked: {}", e);
    }
    tracing::info!(connection_id = %connection.id(), identity = %identity, "[Realtime] Session ended");
}

/// Handle one inbound text frame
///
/// Any JSON value is accepted as a ping; its content is not inspected.
pub fn dispatch(
    hub: &ConnectionHub,
    connection: &ConnectionHandle,
    identity: Identity,
    text: &str,
) -> Result<(), SessionError> {
    serde_json::from_str::<serde_json::Value>(text)?;

    let pong = RealtimeEvent::pong();
    match identity {
        Identity::User(_) => {
            hub.broadcast(&pong, identity);
        }
        Identity::Anonymous => {
            connection.send(Utf8Bytes::from(pong.to_json()?))?;
        }
    }
    Ok(())
}

async fn writer_task(
    mut sink: SplitSink<WebSocket, Message>,
    mut rx: UnboundedReceiver<Outbound>,
    connection: ConnectionHandle,
) {
    while let Some(outbound) = rx.recv().await {
        match outbound {
            Outbound::Text(text) => {
                if let Err(e) = sink.send(Message::Text(text)).await {
                    tracing::debug!(connection_id = %connection.id(), "[Realtime] Write failed: {}", e);
                    connection.close();
                    break;
                }
            }
            Outbound::Close => {
                let frame = CloseFrame {
                    code: close_code::AWAY,
                    reason: "Server closing connection".into(),
                };
                let _ = sink.send(Message::Close(Some(frame))).await;
                break;
            }
        }
    }
    // Receiver drops here; later sends on this handle fail.
}
