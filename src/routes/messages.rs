use axum::Router;
use axum::extract::{Query, State};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use serde::Deserialize;

use crate::AppState;
use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::extract::Json;
use crate::models::{Message, MessageTarget, MessageType};

const DEFAULT_MESSAGE_LIMIT: i64 = 50;
/// Page-size ceiling for a single retrieval request.
const MAX_MESSAGE_LIMIT: i64 = 200;

#[derive(Deserialize)]
pub struct SendMessagePayload {
    content: Option<String>,
    message_type: Option<MessageType>,
    group_id: Option<String>,
    recipient_id: Option<String>,
}

#[derive(Deserialize)]
pub struct MessagesQuery {
    group_id: Option<String>,
    recipient_id: Option<String>,
    limit: Option<i64>,
}

#[derive(Deserialize)]
pub struct OnlineStatusPayload {
    is_online: Option<bool>,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/chat/messages", post(send_message))
        .route("/api/chat/messages", get(get_messages))
        .route("/api/chat/online-status", post(online_status))
}

fn target_from(
    group_id: Option<String>,
    recipient_id: Option<String>,
) -> Result<MessageTarget, ApiError> {
    match (group_id, recipient_id) {
        (Some(group), None) => Ok(MessageTarget::Group(group)),
        (None, Some(recipient)) => Ok(MessageTarget::Recipient(recipient)),
        (Some(_), Some(_)) => Err(ApiError::Validation(
            "Provide either group_id or recipient_id, not both".to_string(),
        )),
        (None, None) => Err(ApiError::Validation(
            "Either group_id or recipient_id is required".to_string(),
        )),
    }
}

async fn send_message(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Json(payload): Json<SendMessagePayload>,
) -> Result<impl IntoResponse, ApiError> {
    let content = payload
        .content
        .filter(|c| !c.trim().is_empty())
        .ok_or_else(|| ApiError::Validation("Message content is required".to_string()))?;

    let target = target_from(payload.group_id, payload.recipient_id)?;

    // Group broadcasts are members-only.
    if let MessageTarget::Group(group_id) = &target {
        if !state.store.is_group_member(group_id, &user.id).await? {
            return Err(ApiError::Forbidden(
                "Only members can post to this group".to_string(),
            ));
        }
    }

    let message = Message::new(
        user.id,
        target,
        content,
        payload.message_type.unwrap_or(MessageType::Text),
    );
    state.store.create_message(&message).await?;

    Ok(Json(message))
}

async fn get_messages(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Query(query): Query<MessagesQuery>,
) -> Result<impl IntoResponse, ApiError> {
    // group_id takes precedence when both are supplied, matching the send
    // side's broadcast-or-direct split.
    let target = match (query.group_id, query.recipient_id) {
        (Some(group_id), _) => {
            if !state.store.is_group_member(&group_id, &user.id).await? {
                return Err(ApiError::Forbidden(
                    "Only members can read this group".to_string(),
                ));
            }
            MessageTarget::Group(group_id)
        }
        (None, Some(recipient_id)) => MessageTarget::Recipient(recipient_id),
        (None, None) => {
            return Err(ApiError::Validation(
                "Either group_id or recipient_id is required".to_string(),
            ));
        }
    };

    let limit = query
        .limit
        .unwrap_or(DEFAULT_MESSAGE_LIMIT)
        .clamp(1, MAX_MESSAGE_LIMIT);
    let messages = state.store.list_messages(&target, limit).await?;

    Ok(Json(messages))
}

async fn online_status(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Json(payload): Json<OnlineStatusPayload>,
) -> Result<impl IntoResponse, ApiError> {
    let is_online = payload
        .is_online
        .ok_or_else(|| ApiError::Validation("is_online is required".to_string()))?;

    state.store.set_online_status(&user.id, is_online).await?;

    Ok(Json(serde_json::json!({ "success": true })))
}
