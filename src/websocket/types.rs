use crate::message::message_models::MessageResponse;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

// Server-to-client events
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum WsMessage {
    NewMessage(MessageResponse),
    OnlineUsers(OnlineUsersPayload),
    Ping,
    Pong,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct OnlineUsersPayload {
    pub user_ids: Vec<Uuid>,
}

// Client-to-server messages
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ClientMessage {
    Ping,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn new_message_event_uses_the_new_message_tag() {
        let event = WsMessage::NewMessage(MessageResponse {
            id: Uuid::new_v4(),
            sender_id: Uuid::new_v4(),
            receiver_id: Uuid::new_v4(),
            text: Some("hello".to_string()),
            image_url: None,
            created_at: Utc::now(),
        });
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "newMessage");
        assert_eq!(json["text"], "hello");
    }

    #[test]
    fn online_users_event_tag() {
        let event = WsMessage::OnlineUsers(OnlineUsersPayload { user_ids: vec![] });
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "onlineUsers");
    }
}
