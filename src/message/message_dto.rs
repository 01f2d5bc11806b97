use crate::message::message_models::MessageResponse;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Body of POST /api/messages/{user_id}. `image` is a base64 data URI that
/// gets uploaded before the message is persisted. Clients are expected to
/// send at least one of the two fields; the server does not reject an empty
/// message.
#[derive(Clone, Debug, Deserialize, ToSchema)]
pub struct SendMessageRequest {
    pub text: Option<String>,
    pub image: Option<String>,
}

/// One sidebar entry: a chat partner annotated with the most recent message
/// they sent to the requesting user, if any.
#[derive(Clone, Debug, Serialize, ToSchema)]
pub struct SidebarUser {
    pub id: Uuid,
    pub username: String,
    pub profile_pic: Option<String>,
    pub latest_message: Option<MessageResponse>,
}
