//! Group chat endpoints

use axum::extract::State;
use serde::{Deserialize, Serialize};

use super::format_timestamp;
use crate::api::state::AppState;
use crate::api::types::{ApiError, Json, Path, Query};
use crate::domain::chat::ChatMessage;
use crate::domain::group::GroupId;
use crate::domain::storage::Page;
use crate::domain::user::UserRef;

#[derive(Debug, Clone, Deserialize)]
pub struct ChatParams {
    pub user: UserRef,
    #[serde(default)]
    pub page: Page,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PostMessageRequest {
    pub user: UserRef,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message_id: i64,
    pub user_id: i64,
    pub user: String,
    pub message: String,
    pub time: String,
}

impl From<ChatMessage> for MessageResponse {
    fn from(message: ChatMessage) -> Self {
        Self {
            message_id: message.id.value(),
            user_id: message.user_id.value(),
            user: message.username,
            message: message.text,
            time: format_timestamp(&message.sent_at),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct MessagesResponse {
    pub messages: Vec<MessageResponse>,
}

#[derive(Debug, Serialize)]
pub struct PostMessageResponse {
    pub result: &'static str,
    pub message_id: i64,
}

/// GET /group/{id}/chat/
pub async fn get_messages(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Query(params): Query<ChatParams>,
) -> Result<Json<MessagesResponse>, ApiError> {
    let messages = state
        .chat_service
        .get_messages(GroupId::new(id), &params.user, params.page)
        .await?;

    Ok(Json(MessagesResponse {
        messages: messages.into_iter().map(Into::into).collect(),
    }))
}

/// POST /group/{id}/chat/
pub async fn post_message(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(request): Json<PostMessageRequest>,
) -> Result<Json<PostMessageResponse>, ApiError> {
    let message = state
        .chat_service
        .post_message(GroupId::new(id), &request.user, &request.message)
        .await?;

    Ok(Json(PostMessageResponse {
        result: "ok",
        message_id: message.id.value(),
    }))
}
