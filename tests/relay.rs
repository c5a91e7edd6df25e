//! End-to-end relay tests over real websocket connections.

use futures::{SinkExt, StreamExt};
use relay::{make_app, Config};
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tokio::time::{sleep, timeout, Duration};
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, tungstenite, MaybeTlsStream, WebSocketStream};

const RECV_TIMEOUT: Duration = Duration::from_secs(5);

type WsStream = WebSocketStream<MaybeTlsStream<tokio::net::TcpStream>>;

/// Boot a server on an ephemeral port and return its address.
async fn boot_server() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let app = make_app(Config::from_env());

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    addr
}

async fn connect(addr: SocketAddr, room: &str) -> WsStream {
    let (socket, _) = connect_async(format!("ws://{addr}/ws?room={room}"))
        .await
        .expect("failed to connect");
    socket
}

/// Poll the status endpoint until the hub has converged on `pred`.
async fn wait_status(addr: SocketAddr, pred: impl Fn(&serde_json::Value) -> bool) {
    let url = format!("http://{addr}/api/status");
    for _ in 0..250 {
        let status: serde_json::Value = reqwest::get(&url)
            .await
            .expect("status request failed")
            .json()
            .await
            .expect("status body was not json");
        if pred(&status) {
            return;
        }
        sleep(Duration::from_millis(20)).await;
    }
    panic!("hub never reached the expected status");
}

async fn recv_text(socket: &mut WsStream) -> String {
    let frame = timeout(RECV_TIMEOUT, socket.next())
        .await
        .expect("timed out waiting for a frame")
        .expect("stream ended")
        .expect("read failed");
    match frame {
        Message::Text(text) => text,
        other => panic!("unexpected frame: {other:?}"),
    }
}

#[tokio::test]
async fn broadcast_reaches_room_members_only() {
    let addr = boot_server().await;

    let mut alice = connect(addr, "r1").await;
    let mut bob = connect(addr, "r1").await;
    let mut carol = connect(addr, "r2").await;
    wait_status(addr, |s| s["num_clients"] == 3).await;

    alice.send(Message::Text("hi".into())).await.unwrap();

    // every member of the room sees the message, the sender included
    assert_eq!(recv_text(&mut bob).await, "hi");
    assert_eq!(recv_text(&mut alice).await, "hi");

    // the other room stays silent
    assert!(timeout(Duration::from_millis(300), carol.next()).await.is_err());
}

#[tokio::test]
async fn inbound_newlines_are_normalized() {
    let addr = boot_server().await;

    let mut alice = connect(addr, "lines").await;
    let mut bob = connect(addr, "lines").await;
    wait_status(addr, |s| s["num_clients"] == 2).await;

    alice.send(Message::Text("hello\nworld".into())).await.unwrap();

    assert_eq!(recv_text(&mut bob).await, "hello world");
}

#[tokio::test]
async fn disconnect_reaps_the_empty_room() {
    let addr = boot_server().await;

    let mut solo = connect(addr, "solo").await;
    wait_status(addr, |s| s["num_rooms"] == 1).await;

    solo.close(None).await.unwrap();

    wait_status(addr, |s| s["num_rooms"] == 0 && s["num_clients"] == 0).await;
}

#[tokio::test]
async fn missing_room_param_is_rejected() {
    let addr = boot_server().await;

    let err = connect_async(format!("ws://{addr}/ws"))
        .await
        .expect_err("upgrade should have been rejected");

    match err {
        tungstenite::Error::Http(response) => assert_eq!(response.status(), 422),
        other => panic!("unexpected error: {other}"),
    }
}
