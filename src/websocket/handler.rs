use axum::{
    extract::{
        ws::{Message, WebSocket},
        State, WebSocketUpgrade,
    },
    response::Response,
};
use futures::{sink::SinkExt, stream::StreamExt};
use tokio::sync::mpsc;
use uuid::Uuid;

use crate::{
    middleware::AuthUser,
    state::AppState,
    websocket::types::{ClientMessage, OnlineUsersPayload, WsMessage},
};

/// Real-time event WebSocket.
///
/// The server pushes `newMessage` events to the receiver of a freshly
/// persisted message and `onlineUsers` whenever the set of connected users
/// changes. The only client-to-server message is a ping.
pub async fn ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, user_id, state))
}

/// Handle individual WebSocket connection
async fn handle_socket(socket: WebSocket, user_id: Uuid, state: AppState) {
    let (mut sender, mut receiver) = socket.split();
    let (tx, mut rx) = mpsc::unbounded_channel::<WsMessage>();

    // A reconnect replaces any previous connection for this user.
    state.ws_connections.add_connection(user_id, tx.clone());
    broadcast_online_users(&state);

    // Task: send messages from channel to WebSocket
    let mut send_task = tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            if let Ok(json) = serde_json::to_string(&msg) {
                if sender.send(Message::Text(json)).await.is_err() {
                    break;
                }
            }
        }
    });

    // Task: receive messages from WebSocket
    let tx_clone = tx.clone();
    let mut recv_task = tokio::spawn(async move {
        while let Some(Ok(msg)) = receiver.next().await {
            match msg {
                Message::Text(text) => {
                    if let Ok(ClientMessage::Ping) = serde_json::from_str(&text) {
                        let _ = tx_clone.send(WsMessage::Pong);
                    }
                }
                Message::Close(_) => break,
                _ => {}
            }
        }
    });

    // Heartbeat task
    let tx_heartbeat = tx.clone();
    let mut heartbeat_task = tokio::spawn(async move {
        let mut interval = tokio::time::interval(std::time::Duration::from_secs(30));
        loop {
            interval.tick().await;
            if tx_heartbeat.send(WsMessage::Ping).is_err() {
                break;
            }
        }
    });

    // Stop all tasks when any one finishes
    tokio::select! {
        _ = &mut send_task => {
            recv_task.abort();
            heartbeat_task.abort();
        },
        _ = &mut recv_task => {
            send_task.abort();
            heartbeat_task.abort();
        },
        _ = &mut heartbeat_task => {
            send_task.abort();
            recv_task.abort();
        }
    }

    // Cleanup
    state.ws_connections.remove_connection(&user_id);
    broadcast_online_users(&state);

    tracing::info!("WebSocket closed for user {}", user_id);
}

fn broadcast_online_users(state: &AppState) {
    let payload = OnlineUsersPayload {
        user_ids: state.ws_connections.online_users(),
    };
    state.ws_connections.broadcast(WsMessage::OnlineUsers(payload));
}
