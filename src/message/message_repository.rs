use crate::{
    error::Result,
    message::{
        message_dto::SidebarUser,
        message_models::{Message, MessageResponse},
    },
};
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

/// Flat row produced by the sidebar lateral join; the message columns are
/// all-null when the candidate has never sent the requester anything.
#[derive(Debug, FromRow)]
struct SidebarRow {
    id: Uuid,
    username: String,
    profile_pic: Option<String>,
    message_id: Option<Uuid>,
    sender_id: Option<Uuid>,
    receiver_id: Option<Uuid>,
    text: Option<String>,
    image_url: Option<String>,
    message_created_at: Option<DateTime<Utc>>,
}

impl From<SidebarRow> for SidebarUser {
    fn from(row: SidebarRow) -> Self {
        let latest_message = match (row.message_id, row.sender_id, row.receiver_id, row.message_created_at) {
            (Some(id), Some(sender_id), Some(receiver_id), Some(created_at)) => {
                Some(MessageResponse {
                    id,
                    sender_id,
                    receiver_id,
                    text: row.text,
                    image_url: row.image_url,
                    created_at,
                })
            }
            _ => None,
        };

        SidebarUser {
            id: row.id,
            username: row.username,
            profile_pic: row.profile_pic,
            latest_message,
        }
    }
}

#[derive(Clone)]
pub struct MessageRepository {
    pool: PgPool,
}

impl MessageRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(
        &self,
        sender_id: Uuid,
        receiver_id: Uuid,
        text: Option<&str>,
        image_url: Option<&str>,
    ) -> Result<Message> {
        let message = sqlx::query_as::<_, Message>(
            "INSERT INTO messages (sender_id, receiver_id, text, image_url)
             VALUES ($1, $2, $3, $4)
             RETURNING *",
        )
        .bind(sender_id)
        .bind(receiver_id)
        .bind(text)
        .bind(image_url)
        .fetch_one(&self.pool)
        .await?;

        Ok(message)
    }

    /// Full history between two users, both directions, in creation order.
    pub async fn find_conversation(&self, user_id: Uuid, other_user_id: Uuid) -> Result<Vec<Message>> {
        let messages = sqlx::query_as::<_, Message>(
            "SELECT * FROM messages
             WHERE (sender_id = $1 AND receiver_id = $2)
                OR (sender_id = $2 AND receiver_id = $1)
             ORDER BY created_at, id",
        )
        .bind(user_id)
        .bind(other_user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(messages)
    }

    /// Every user except the requester, each joined against the latest
    /// message that user sent *to* the requester. Ordering is left to the
    /// caller. Messages flowing the other way do not count here.
    pub async fn find_sidebar_users(&self, user_id: Uuid) -> Result<Vec<SidebarUser>> {
        let rows = sqlx::query_as::<_, SidebarRow>(
            "SELECT
                u.id,
                u.username,
                u.profile_pic,
                m.id AS message_id,
                m.sender_id,
                m.receiver_id,
                m.text,
                m.image_url,
                m.created_at AS message_created_at
             FROM users u
             LEFT JOIN LATERAL (
                 SELECT * FROM messages
                 WHERE sender_id = u.id AND receiver_id = $1
                 ORDER BY created_at DESC
                 LIMIT 1
             ) m ON true
             WHERE u.id != $1",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(SidebarUser::from).collect())
    }
}
