//! Live sessions over a real WebSocket connection.

use std::net::SocketAddr;
use std::time::Duration;

use futures::{SinkExt, StreamExt};
use serde_json::{Value, json};
use tokio::net::{TcpListener, TcpStream};
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::tungstenite::client::IntoClientRequest;
use tokio_tungstenite::tungstenite::http::HeaderValue;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};

use initiative_core::config::AppConfig;
use initiative_core::types::SessionCode;

use crate::helpers::TestApp;

type Socket = WebSocketStream<MaybeTlsStream<TcpStream>>;

async fn serve(app: &TestApp) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("local addr");
    let router = app.router.clone();
    tokio::spawn(async move {
        axum::serve(listener, router).await.expect("serve");
    });
    addr
}

async fn connect(addr: SocketAddr, code: &str, uid: &str) -> Socket {
    let mut request = format!("ws://{addr}/ws/{code}")
        .into_client_request()
        .expect("request");
    request.headers_mut().insert(
        "cookie",
        HeaderValue::from_str(&format!("uid={uid}")).expect("cookie header"),
    );
    let (socket, _) = connect_async(request).await.expect("connect");
    socket
}

async fn next_state(socket: &mut Socket) -> Value {
    loop {
        let message = tokio::time::timeout(Duration::from_secs(2), socket.next())
            .await
            .expect("timely state")
            .expect("socket open")
            .expect("message");
        if let Message::Text(text) = message {
            return serde_json::from_str(text.as_str()).expect("json");
        }
    }
}

fn entry_count(state: &Value) -> Option<usize> {
    state["data"]["entries"].as_array().map(Vec::len)
}

#[tokio::test]
async fn test_oversized_frame_is_dropped_and_connection_survives() {
    let mut config = AppConfig::default();
    config.realtime.max_message_size = 1024;
    let app = TestApp::with_config(config);
    let code = app.join("ABCD", "dm").await;
    let addr = serve(&app).await;

    let mut socket = connect(addr, &code, "dm").await;
    assert_eq!(next_state(&mut socket).await["type"], "state");

    let oversized = json!({"type": "addPlayer", "data": {"name": "x".repeat(2048)}}).to_string();
    socket
        .send(Message::Text(oversized.into()))
        .await
        .expect("send oversized");
    assert_eq!(entry_count(&next_state(&mut socket).await), Some(0));

    let frame = json!({"type": "addPlayer", "data": {"name": "Aria"}}).to_string();
    socket.send(Message::Text(frame.into())).await.expect("send");
    let state = next_state(&mut socket).await;
    assert_eq!(state["data"]["entries"][0]["name"], "Aria");

    let code = SessionCode::parse(&code).expect("code");
    assert_eq!(app.state.realtime.hub.registry().subscriber_count(&code), 1);
    assert_eq!(app.state.realtime.metrics.snapshot().commands_malformed, 1);
}

#[tokio::test]
async fn test_binary_frames_are_routed() {
    let app = TestApp::new();
    let code = app.join("ABCD", "dm").await;
    let addr = serve(&app).await;

    let mut socket = connect(addr, &code, "dm").await;
    next_state(&mut socket).await;

    socket
        .send(Message::Binary(vec![0xff, 0x00, 0xfe].into()))
        .await
        .expect("send invalid utf-8");
    assert_eq!(entry_count(&next_state(&mut socket).await), Some(0));

    let frame = json!({"type": "addMonster", "data": {"name": "Ogre", "hp": 30}}).to_string();
    socket
        .send(Message::Binary(frame.into_bytes().into()))
        .await
        .expect("send binary");
    let state = next_state(&mut socket).await;
    assert_eq!(state["data"]["entries"][0]["name"], "Ogre");
    assert_eq!(state["data"]["entries"][0]["hp"], 30);
}
