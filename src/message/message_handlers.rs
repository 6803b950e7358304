use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::{error::Result, middleware::AuthUser, state::AppState};

use super::{
    message_dto::{ConversationResponse, HistoryQuery, MarkReadResponse, SendMessageRequest},
    message_models::MessageResponse,
};

/// Send a direct message to another user
#[utoipa::path(
    post,
    path = "/api/messages",
    tag = "messages",
    request_body = SendMessageRequest,
    responses(
        (status = 201, description = "Message sent successfully", body = MessageResponse),
        (status = 400, description = "Invalid input"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Receiver not found")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn send_message(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(payload): Json<SendMessageRequest>,
) -> Result<impl IntoResponse> {
    payload.validate()?;

    let message = state.message_service.send_message(user_id, payload).await?;

    Ok((StatusCode::CREATED, Json(MessageResponse::from(message))))
}

/// List the authenticated user's conversations
#[utoipa::path(
    get,
    path = "/api/messages/conversations",
    tag = "messages",
    responses(
        (status = 200, description = "Conversations ordered by most recent message", body = Vec<ConversationResponse>),
        (status = 401, description = "Unauthorized")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn get_conversations(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<impl IntoResponse> {
    let conversations = state.message_service.get_conversations(user_id).await?;

    Ok((StatusCode::OK, Json(conversations)))
}

/// Get message history with a specific user
///
/// Fetching any page marks every unread message from that user as read.
#[utoipa::path(
    get,
    path = "/api/messages/{user_id}",
    tag = "messages",
    params(
        ("user_id" = Uuid, Path, description = "Counterparty user ID"),
        ("page" = Option<u32>, Query, description = "Page number (default: 1)"),
        ("limit" = Option<u32>, Query, description = "Messages per page (default: 50)")
    ),
    responses(
        (status = 200, description = "Messages ordered oldest-first", body = Vec<MessageResponse>),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "User not found")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn get_history(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(other_user_id): Path<Uuid>,
    Query(query): Query<HistoryQuery>,
) -> Result<impl IntoResponse> {
    let page = query.page.unwrap_or(1);
    let limit = query.limit.unwrap_or(50);

    let messages = state
        .message_service
        .get_history(user_id, other_user_id, page, limit)
        .await?;

    let responses: Vec<MessageResponse> =
        messages.into_iter().map(MessageResponse::from).collect();

    Ok((StatusCode::OK, Json(responses)))
}

/// Mark all messages from a user as read
#[utoipa::path(
    put,
    path = "/api/messages/{user_id}/read",
    tag = "messages",
    params(
        ("user_id" = Uuid, Path, description = "Counterparty user ID")
    ),
    responses(
        (status = 200, description = "Number of messages updated", body = MarkReadResponse),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "User not found")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn mark_read(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(other_user_id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    let updated = state
        .message_service
        .mark_conversation_read(user_id, other_user_id)
        .await?;

    Ok((StatusCode::OK, Json(MarkReadResponse { updated })))
}
