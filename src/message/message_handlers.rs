use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use uuid::Uuid;

use crate::{
    error::Result,
    message::{
        message_dto::{SendMessageRequest, SidebarUser},
        message_models::MessageResponse,
    },
    middleware::AuthUser,
    state::AppState,
};

/// Get all other users for the chat sidebar, annotated with the latest
/// message each one sent to the authenticated user
#[utoipa::path(
    get,
    path = "/api/sidebar",
    tag = "messages",
    responses(
        (status = 200, description = "Users ordered by message recency", body = Vec<SidebarUser>),
        (status = 401, description = "Unauthorized")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn get_sidebar(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<impl IntoResponse> {
    let users = state.message_service.get_sidebar(user_id).await?;

    Ok((StatusCode::OK, Json(users)))
}

/// Get the full message history with a specific user
#[utoipa::path(
    get,
    path = "/api/messages/{user_id}",
    tag = "messages",
    params(
        ("user_id" = Uuid, Path, description = "Other user ID to get the conversation with")
    ),
    responses(
        (status = 200, description = "Messages in both directions, creation order", body = Vec<MessageResponse>),
        (status = 401, description = "Unauthorized")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn get_messages(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(other_user_id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    let messages = state
        .message_service
        .get_conversation(user_id, other_user_id)
        .await?;

    let responses: Vec<MessageResponse> = messages.into_iter().map(MessageResponse::from).collect();

    Ok((StatusCode::OK, Json(responses)))
}

/// Send a message to another user
#[utoipa::path(
    post,
    path = "/api/messages/{user_id}",
    tag = "messages",
    params(
        ("user_id" = Uuid, Path, description = "Receiver user ID")
    ),
    request_body = SendMessageRequest,
    responses(
        (status = 201, description = "Message sent successfully", body = MessageResponse),
        (status = 401, description = "Unauthorized")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn send_message(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(receiver_id): Path<Uuid>,
    Json(payload): Json<SendMessageRequest>,
) -> Result<impl IntoResponse> {
    let message = state
        .message_service
        .send_message(user_id, receiver_id, payload)
        .await?;

    Ok((StatusCode::CREATED, Json(MessageResponse::from(message))))
}
