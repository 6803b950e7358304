use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::user::UserProfile;

use super::message_models::{MessageResponse, MessageType};

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct SendMessageRequest {
    pub receiver_id: Uuid,
    #[validate(length(min = 1, max = 1000))]
    pub content: String,
    pub message_type: Option<MessageType>,
}

/// One row of the conversation list: the counterparty, the most recent
/// message exchanged with them, and how many of their messages the
/// requester has not read yet.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ConversationResponse {
    pub participant: UserProfile,
    pub last_message: MessageResponse,
    pub unread_count: i64,
}

#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct MarkReadResponse {
    pub updated: u64,
}
