//! WebSocket integration tests
//!
//! Runs the full router on an ephemeral port and talks to `/ws` with
//! `tokio-tungstenite`.

mod common;

use std::net::SocketAddr;
use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use serde_json::{json, Value};
use tokio::net::{TcpListener, TcpStream};
use tokio_tungstenite::tungstenite::client::IntoClientRequest;
use tokio_tungstenite::tungstenite::http::{header::AUTHORIZATION, HeaderValue};
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};

use common::{auth_header, create_test_user, test_state};
use scrapyflow::backend::auth::Identity;
use scrapyflow::backend::realtime::{notify_task_update, Target};
use scrapyflow::backend::server::{create_app, AppState};
use scrapyflow::shared::{TaskSnapshot, TaskStatus};

type Client = WebSocketStream<MaybeTlsStream<TcpStream>>;

const TIMEOUT: Duration = Duration::from_secs(5);

async fn start_test_server() -> (SocketAddr, AppState) {
    let (state, _store) = test_state();
    let app = create_app(state.clone());
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (addr, state)
}

async fn connect(addr: SocketAddr, query: &str) -> Client {
    let (client, _response) = connect_async(format!("ws://{addr}/ws{query}")).await.unwrap();
    client
}

async fn connect_with_header(addr: SocketAddr, token: &str) -> Client {
    let mut request = format!("ws://{addr}/ws").into_client_request().unwrap();
    request
        .headers_mut()
        .insert(AUTHORIZATION, HeaderValue::from_str(&auth_header(token)).unwrap());
    let (client, _response) = connect_async(request).await.unwrap();
    client
}

/// Wait until the hub has registered `expected` connections for `target`
async fn wait_for_connections(state: &AppState, target: impl Into<Target>, expected: usize) {
    let target = target.into();
    tokio::time::timeout(TIMEOUT, async {
        while state.hub.connection_count(target) != expected {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    })
    .await
    .unwrap_or_else(|_| panic!("hub never reached {expected} connection(s) for {target:?}"));
}

async fn next_json(client: &mut Client) -> Value {
    loop {
        let message = tokio::time::timeout(TIMEOUT, client.next())
            .await
            .expect("timed out waiting for a message")
            .expect("stream ended")
            .expect("websocket error");
        match message {
            Message::Text(text) => return serde_json::from_str(text.as_str()).unwrap(),
            Message::Ping(_) | Message::Pong(_) => continue,
            other => panic!("expected a text frame, got {other:?}"),
        }
    }
}

/// Read until the server closes the connection
async fn expect_closed(client: &mut Client) {
    tokio::time::timeout(TIMEOUT, async {
        loop {
            match client.next().await {
                Some(Ok(Message::Close(_))) | None | Some(Err(_)) => break,
                Some(Ok(_)) => continue,
            }
        }
    })
    .await
    .expect("server did not close the connection");
}

#[tokio::test]
async fn test_anonymous_ping_pong() {
    let (addr, state) = start_test_server().await;
    let mut client = connect(addr, "").await;
    wait_for_connections(&state, Identity::Anonymous, 1).await;

    client.send(Message::Text(r#"{"type":"ping"}"#.into())).await.unwrap();

    assert_eq!(next_json(&mut client).await, json!({"type": "pong"}));
}

#[tokio::test]
async fn test_invalid_token_connects_anonymously() {
    let (addr, state) = start_test_server().await;
    let _client = connect(addr, "?token=garbage").await;

    wait_for_connections(&state, Identity::Anonymous, 1).await;
}

#[tokio::test]
async fn test_user_pong_reaches_every_tab() {
    let (addr, state) = start_test_server().await;
    let user = create_test_user(&state, "ada@example.com").await;
    let identity = Identity::User(user.user.id);

    let mut tab1 = connect(addr, &format!("?token={}", user.token)).await;
    let mut tab2 = connect_with_header(addr, &user.token).await;
    let mut stranger = connect(addr, "").await;
    wait_for_connections(&state, identity, 2).await;
    wait_for_connections(&state, Identity::Anonymous, 1).await;

    tab1.send(Message::Text("{}".into())).await.unwrap();

    assert_eq!(next_json(&mut tab1).await, json!({"type": "pong"}));
    assert_eq!(next_json(&mut tab2).await, json!({"type": "pong"}));
    let nothing = tokio::time::timeout(Duration::from_millis(200), stranger.next()).await;
    assert!(nothing.is_err(), "anonymous client received a user's pong");
}

#[tokio::test]
async fn test_task_update_push() {
    let (addr, state) = start_test_server().await;
    let user = create_test_user(&state, "ada@example.com").await;
    let mut client = connect(addr, &format!("?token={}", user.token)).await;
    wait_for_connections(&state, Identity::User(user.user.id), 1).await;

    let mut task = TaskSnapshot::new(42, "Prices", "amazon_price", "https://example.com/item");
    task.status = TaskStatus::Completed;
    task.progress = 100;
    task.has_result = true;

    assert_eq!(notify_task_update(&state.hub, user.user.id, &task), 1);

    let event = next_json(&mut client).await;
    assert_eq!(event["type"], "task_update");
    assert_eq!(event["task"]["id"], 42);
    assert_eq!(event["task"]["status"], "completed");
    assert_eq!(event["task"]["has_result"], true);
}

#[tokio::test]
async fn test_non_json_ends_session() {
    let (addr, state) = start_test_server().await;
    let mut client = connect(addr, "").await;
    wait_for_connections(&state, Target::All, 1).await;

    client.send(Message::Text("not json".into())).await.unwrap();

    expect_closed(&mut client).await;
    wait_for_connections(&state, Target::All, 0).await;
}

#[tokio::test]
async fn test_client_close_deregisters() {
    let (addr, state) = start_test_server().await;
    let mut client = connect(addr, "").await;
    wait_for_connections(&state, Target::All, 1).await;

    client.close(None).await.unwrap();

    wait_for_connections(&state, Target::All, 0).await;
}

#[tokio::test]
async fn test_disconnect_all_closes_clients() {
    let (addr, state) = start_test_server().await;
    let user = create_test_user(&state, "ada@example.com").await;
    let mut authed = connect(addr, &format!("?token={}", user.token)).await;
    let mut anonymous = connect(addr, "").await;
    wait_for_connections(&state, Target::All, 2).await;

    assert_eq!(state.hub.disconnect_all(), 2);

    expect_closed(&mut authed).await;
    expect_closed(&mut anonymous).await;
    assert_eq!(state.hub.connection_count(Target::All), 0);

    let mut late = connect(addr, "").await;
    expect_closed(&mut late).await;
    assert_eq!(state.hub.connection_count(Target::All), 0);
}
