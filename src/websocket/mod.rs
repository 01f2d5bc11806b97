pub mod handler;
pub mod types;

pub use handler::ws_handler;

use dashmap::DashMap;
use std::sync::Arc;
use tokio::sync::mpsc;
use types::WsMessage;
use uuid::Uuid;

pub type WsSender = mpsc::UnboundedSender<WsMessage>;

/// Live-connection registry: at most one connection per user. Delivery is
/// fire-and-forget; a missing or closed connection is not an error.
#[derive(Clone, Default)]
pub struct ConnectionManager {
    connections: Arc<DashMap<Uuid, WsSender>>,
}

impl ConnectionManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_connection(&self, user_id: Uuid, sender: WsSender) {
        self.connections.insert(user_id, sender);
    }

    pub fn remove_connection(&self, user_id: &Uuid) {
        self.connections.remove(user_id);
    }

    pub fn send_to_user(&self, user_id: &Uuid, message: WsMessage) {
        if let Some(connection) = self.connections.get(user_id) {
            let _ = connection.send(message);
        }
    }

    pub fn broadcast(&self, message: WsMessage) {
        for connection in self.connections.iter() {
            let _ = connection.send(message.clone());
        }
    }

    pub fn online_users(&self) -> Vec<Uuid> {
        self.connections.iter().map(|entry| *entry.key()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::websocket::types::OnlineUsersPayload;

    #[tokio::test]
    async fn delivers_to_a_registered_user() {
        let manager = ConnectionManager::new();
        let user_id = Uuid::new_v4();
        let (tx, mut rx) = mpsc::unbounded_channel();
        manager.add_connection(user_id, tx);

        manager.send_to_user(&user_id, WsMessage::Ping);

        assert!(matches!(rx.recv().await, Some(WsMessage::Ping)));
    }

    #[tokio::test]
    async fn sending_to_an_absent_user_is_a_no_op() {
        let manager = ConnectionManager::new();
        manager.send_to_user(&Uuid::new_v4(), WsMessage::Ping);
    }

    #[tokio::test]
    async fn sending_to_a_closed_connection_does_not_panic() {
        let manager = ConnectionManager::new();
        let user_id = Uuid::new_v4();
        let (tx, rx) = mpsc::unbounded_channel();
        manager.add_connection(user_id, tx);
        drop(rx);

        manager.send_to_user(&user_id, WsMessage::Ping);
    }

    #[tokio::test]
    async fn removed_users_no_longer_receive() {
        let manager = ConnectionManager::new();
        let user_id = Uuid::new_v4();
        let (tx, mut rx) = mpsc::unbounded_channel();
        manager.add_connection(user_id, tx);
        manager.remove_connection(&user_id);

        manager.send_to_user(&user_id, WsMessage::Ping);

        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn broadcast_reaches_every_connection() {
        let manager = ConnectionManager::new();
        let (tx_a, mut rx_a) = mpsc::unbounded_channel();
        let (tx_b, mut rx_b) = mpsc::unbounded_channel();
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        manager.add_connection(a, tx_a);
        manager.add_connection(b, tx_b);

        let online = manager.online_users();
        assert_eq!(online.len(), 2);
        assert!(online.contains(&a) && online.contains(&b));

        manager.broadcast(WsMessage::OnlineUsers(OnlineUsersPayload { user_ids: online }));

        assert!(matches!(rx_a.recv().await, Some(WsMessage::OnlineUsers(_))));
        assert!(matches!(rx_b.recv().await, Some(WsMessage::OnlineUsers(_))));
    }
}
