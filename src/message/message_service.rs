use crate::error::Result;
use crate::message::message_dto::{SendMessageRequest, SidebarUser};
use crate::message::message_models::{Message, MessageResponse};
use crate::message::message_repository::MessageRepository;
use crate::storage::ImageStore;
use crate::websocket::{types::WsMessage, ConnectionManager};
use std::cmp::Ordering;
use std::sync::Arc;
use uuid::Uuid;

#[derive(Clone)]
pub struct MessageService {
    repo: MessageRepository,
    ws_manager: ConnectionManager,
    image_store: Arc<dyn ImageStore>,
}

impl MessageService {
    pub fn new(
        repo: MessageRepository,
        ws_manager: ConnectionManager,
        image_store: Arc<dyn ImageStore>,
    ) -> Self {
        Self {
            repo,
            ws_manager,
            image_store,
        }
    }

    /// Upload-then-persist-then-notify. The sequence is not atomic: an
    /// upload that succeeds before a failed insert leaves the stored image
    /// orphaned. Notification is fire-and-forget and never fails the send.
    pub async fn send_message(
        &self,
        sender_id: Uuid,
        receiver_id: Uuid,
        payload: SendMessageRequest,
    ) -> Result<Message> {
        let image_url = match payload.image {
            Some(ref image) => Some(self.image_store.upload(image).await?),
            None => None,
        };

        let message = self
            .repo
            .create(
                sender_id,
                receiver_id,
                payload.text.as_deref(),
                image_url.as_deref(),
            )
            .await?;

        self.ws_manager.send_to_user(
            &receiver_id,
            WsMessage::NewMessage(MessageResponse::from(message.clone())),
        );

        Ok(message)
    }

    pub async fn get_conversation(&self, user_id: Uuid, other_user_id: Uuid) -> Result<Vec<Message>> {
        self.repo.find_conversation(user_id, other_user_id).await
    }

    pub async fn get_sidebar(&self, user_id: Uuid) -> Result<Vec<SidebarUser>> {
        let mut users = self.repo.find_sidebar_users(user_id).await?;
        sort_sidebar(&mut users);
        Ok(users)
    }
}

/// Sidebar order: users with an inbound message first, most recent first;
/// username ascending breaks timestamp ties and orders everyone without a
/// message.
pub fn sort_sidebar(users: &mut [SidebarUser]) {
    users.sort_by(|a, b| match (&a.latest_message, &b.latest_message) {
        (Some(x), Some(y)) => y
            .created_at
            .cmp(&x.created_at)
            .then_with(|| a.username.cmp(&b.username)),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => a.username.cmp(&b.username),
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use crate::storage::ImageStore;
    use axum::async_trait;
    use chrono::{DateTime, TimeZone, Utc};
    use tokio::sync::mpsc;

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(secs, 0).unwrap()
    }

    fn entry(username: &str, message_at: Option<i64>) -> SidebarUser {
        let requester = Uuid::new_v4();
        let candidate = Uuid::new_v4();
        SidebarUser {
            id: candidate,
            username: username.to_string(),
            profile_pic: None,
            latest_message: message_at.map(|secs| MessageResponse {
                id: Uuid::new_v4(),
                sender_id: candidate,
                receiver_id: requester,
                text: Some("hi".to_string()),
                image_url: None,
                created_at: at(secs),
            }),
        }
    }

    fn usernames(users: &[SidebarUser]) -> Vec<&str> {
        users.iter().map(|u| u.username.as_str()).collect()
    }

    #[test]
    fn recent_messages_sort_first() {
        // A received from B at t=10 and from C at t=20
        let mut users = vec![entry("bob", Some(10)), entry("carol", Some(20))];
        sort_sidebar(&mut users);
        assert_eq!(usernames(&users), vec!["carol", "bob"]);
    }

    #[test]
    fn messageless_users_sort_after_everyone_with_a_message() {
        let mut users = vec![
            entry("aaron", None),
            entry("zoe", Some(5)),
            entry("mallory", None),
        ];
        sort_sidebar(&mut users);
        assert_eq!(usernames(&users), vec!["zoe", "aaron", "mallory"]);
    }

    #[test]
    fn messageless_users_order_by_username() {
        let mut users = vec![entry("carol", None), entry("alice", None), entry("bob", None)];
        sort_sidebar(&mut users);
        assert_eq!(usernames(&users), vec!["alice", "bob", "carol"]);
    }

    #[test]
    fn equal_timestamps_break_ties_by_username() {
        let mut users = vec![entry("dave", Some(42)), entry("bob", Some(42))];
        sort_sidebar(&mut users);
        assert_eq!(usernames(&users), vec!["bob", "dave"]);
    }

    #[test]
    fn empty_sidebar_stays_empty() {
        let mut users: Vec<SidebarUser> = vec![];
        sort_sidebar(&mut users);
        assert!(users.is_empty());
    }

    struct FailingStore;

    #[async_trait]
    impl ImageStore for FailingStore {
        async fn upload(&self, _data_uri: &str) -> crate::error::Result<String> {
            Err(AppError::Upload("boom".to_string()))
        }
    }

    #[tokio::test]
    async fn upload_failure_aborts_send_and_notifies_nobody() {
        // A lazy pool never connects, which is fine: the upload fails before
        // the repository is touched.
        let pool = sqlx::postgres::PgPoolOptions::new()
            .connect_lazy("postgres://localhost/unused")
            .unwrap();
        let ws_manager = ConnectionManager::new();
        let service = MessageService::new(
            MessageRepository::new(pool),
            ws_manager.clone(),
            Arc::new(FailingStore),
        );

        let receiver_id = Uuid::new_v4();
        let (tx, mut rx) = mpsc::unbounded_channel();
        ws_manager.add_connection(receiver_id, tx);

        let result = service
            .send_message(
                Uuid::new_v4(),
                receiver_id,
                SendMessageRequest {
                    text: None,
                    image: Some("data:image/png;base64,AAAA".to_string()),
                },
            )
            .await;

        assert!(matches!(result, Err(AppError::Upload(_))));
        assert!(rx.try_recv().is_err());
    }
}
