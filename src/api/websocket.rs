//! Handlers for the websocket relay endpoint.

use super::{extractor::RoomQuery, AppState};
use crate::conn::{normalize_line, Client, HubHandle, RoomMessage};
use axum::extract::ws::{close_code, CloseFrame, Message, WebSocket, WebSocketUpgrade};
use axum::extract::State;
use axum::response::IntoResponse;
use futures::stream::{SplitSink, SplitStream};
use futures::{sink::SinkExt, stream::StreamExt};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::time::{self, Duration, Instant};

// ========================// Websocket Handler //======================== //

/// Handler of the relay endpoint.
///
/// The room identifier comes from the `room` query parameter; oversize
/// inbound frames are a protocol error for the connection.
pub async fn ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
    RoomQuery(room_id): RoomQuery,
) -> impl IntoResponse {
    ws.max_message_size(state.config.max_frame_size)
        .on_upgrade(move |socket| websocket(socket, state, room_id))
}

/// Register the connection with the hub, then drive its two pumps until
/// either one stops.
async fn websocket(socket: WebSocket, state: Arc<AppState>, room_id: String) {
    // by splitting, we can send and receive at the same time
    let (sender, receiver) = socket.split();

    // the outbound queue between the hub and the write pump
    let (tx, rx) = mpsc::channel(state.config.client_queue_capacity);
    let client = Client::new(room_id.clone(), tx);
    let client_id = client.id();

    // the hub owns the client from here on; it must see the registration
    // before either pump starts
    if let Err(e) = state.hub.register(client).await {
        tracing::error!("{}", e.to_string());
        return;
    }

    let mut send_task = tokio::spawn(write_pump(
        sender,
        rx,
        state.config.keepalive_period(),
        state.config.write_deadline(),
    ));
    let mut recv_task = tokio::spawn(read_pump(
        receiver,
        state.hub.clone(),
        room_id.clone(),
        state.config.idle_timeout(),
    ));

    // whichever pump stops first takes the other one down with it
    tokio::select! {
        _ = (&mut send_task) => recv_task.abort(),
        _ = (&mut recv_task) => send_task.abort(),
    }

    // idempotent against a prior overflow eviction
    if let Err(e) = state.hub.unregister(room_id, client_id).await {
        tracing::error!("{}", e.to_string());
    }
    tracing::debug!("socket disconnect {}", client_id);
}

// ========================// Pumps //======================== //

/// Pumps messages from the socket to the hub.
///
/// Sole reader of the socket stream half. Each read is bounded by the
/// idle-timeout; any inbound frame (pongs included) resets the window.
async fn read_pump(
    mut receiver: SplitStream<WebSocket>,
    hub: HubHandle,
    room_id: String,
    idle_timeout: Duration,
) {
    loop {
        let frame = match time::timeout(idle_timeout, receiver.next()).await {
            Ok(Some(Ok(frame))) => frame,
            // idle-timeout expiry, peer gone or protocol error
            _ => break,
        };

        match frame {
            Message::Text(text) => {
                let msg = RoomMessage::new(room_id.clone(), normalize_line(&text));
                if hub.broadcast(msg).await.is_err() {
                    break;
                }
            }
            Message::Close(_) => break,
            _ => {}
        }
    }
    tracing::debug!("read pump stopped for room {}", room_id);
}

/// Pumps messages from the outbound queue to the socket.
///
/// Sole writer of the socket sink half. Waits on the queue and on the
/// keepalive ticker; a closed queue means the hub dropped the connection.
async fn write_pump(
    mut sender: SplitSink<WebSocket, Message>,
    mut rx: mpsc::Receiver<String>,
    keepalive: Duration,
    deadline: Duration,
) {
    let mut ticker = time::interval_at(Instant::now() + keepalive, keepalive);
    loop {
        tokio::select! {
            received = rx.recv() => match received {
                Some(mut payload) => {
                    // add queued chat lines to the current frame
                    while let Ok(line) = rx.try_recv() {
                        payload.push('\n');
                        payload.push_str(&line);
                    }
                    if !write(&mut sender, Message::Text(payload), deadline).await {
                        break;
                    }
                }
                None => {
                    // the hub closed the queue
                    let frame = CloseFrame {
                        code: close_code::NORMAL,
                        reason: "".into(),
                    };
                    let _ = write(&mut sender, Message::Close(Some(frame)), deadline).await;
                    break;
                }
            },
            _ = ticker.tick() => {
                if !write(&mut sender, Message::Ping(Vec::new()), deadline).await {
                    break;
                }
            }
        }
    }
}

/// A write that cannot complete within the deadline counts as a dead peer.
async fn write(sender: &mut SplitSink<WebSocket, Message>, frame: Message, deadline: Duration) -> bool {
    matches!(time::timeout(deadline, sender.send(frame)).await, Ok(Ok(())))
}
