use std::collections::HashMap;

use uuid::Uuid;

use crate::error::{AppError, Result};
use crate::user::{UserProfile, UserRepository};

use super::conversation::build_conversations;
use super::message_dto::{ConversationResponse, SendMessageRequest};
use super::message_models::Message;
use super::message_repository::MessageRepository;

#[derive(Clone)]
pub struct MessageService {
    repo: MessageRepository,
    user_repo: UserRepository,
}

/// Rules the validator derive cannot express: a message may not target its
/// own sender, and content must survive trimming.
fn check_send_request(sender_id: Uuid, payload: &SendMessageRequest) -> Result<()> {
    if sender_id == payload.receiver_id {
        return Err(AppError::Validation(
            "Cannot send message to yourself".to_string(),
        ));
    }
    if payload.content.trim().is_empty() {
        return Err(AppError::Validation("Content is required".to_string()));
    }
    Ok(())
}

/// Converts 1-indexed page/limit into a SQL offset, clamping both to at
/// least one. Out-of-range pages simply produce an offset past the end;
/// the multiplication saturates so extreme query values stay a valid
/// (empty) page instead of overflowing.
fn page_offset(page: u32, limit: u32) -> (i64, i64) {
    let page = page.max(1) as i64;
    let limit = limit.max(1) as i64;
    (limit, (page - 1).saturating_mul(limit))
}

impl MessageService {
    pub fn new(repo: MessageRepository, user_repo: UserRepository) -> Self {
        Self { repo, user_repo }
    }

    pub async fn send_message(
        &self,
        sender_id: Uuid,
        payload: SendMessageRequest,
    ) -> Result<Message> {
        check_send_request(sender_id, &payload)?;

        self.user_repo
            .find_by_id(payload.receiver_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Receiver not found".to_string()))?;

        self.repo
            .create(
                sender_id,
                payload.receiver_id,
                &payload.content,
                payload.message_type.unwrap_or_default(),
            )
            .await
    }

    /// One page of the conversation with `other_user_id`, oldest-first so
    /// chat clients can append without re-sorting.
    ///
    /// Viewing any page clears the requester's entire unread state for this
    /// counterparty, not just the page returned. Fetching page 3 of an old
    /// thread therefore clears the badge for messages the client never
    /// loaded; that matches how the product behaves.
    pub async fn get_history(
        &self,
        user_id: Uuid,
        other_user_id: Uuid,
        page: u32,
        limit: u32,
    ) -> Result<Vec<Message>> {
        self.user_repo
            .find_by_id(other_user_id)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

        let (limit, offset) = page_offset(page, limit);
        let mut messages = self
            .repo
            .find_between(user_id, other_user_id, limit, offset)
            .await?;
        messages.reverse();

        self.repo
            .mark_conversation_read(user_id, other_user_id)
            .await?;

        Ok(messages)
    }

    pub async fn get_conversations(&self, user_id: Uuid) -> Result<Vec<ConversationResponse>> {
        let messages = self.repo.find_involving(user_id).await?;

        let mut counterparties: Vec<Uuid> = messages
            .iter()
            .map(|m| {
                if m.sender_id == user_id {
                    m.receiver_id
                } else {
                    m.sender_id
                }
            })
            .collect();
        counterparties.sort_unstable();
        counterparties.dedup();

        let profiles: HashMap<Uuid, UserProfile> = self
            .user_repo
            .find_profiles(&counterparties)
            .await?
            .into_iter()
            .map(|p| (p.id, p))
            .collect();

        Ok(build_conversations(user_id, &messages, &profiles))
    }

    pub async fn mark_conversation_read(
        &self,
        user_id: Uuid,
        other_user_id: Uuid,
    ) -> Result<u64> {
        self.user_repo
            .find_by_id(other_user_id)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

        self.repo
            .mark_conversation_read(user_id, other_user_id)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::message_models::MessageType;

    fn request(receiver_id: Uuid, content: &str) -> SendMessageRequest {
        SendMessageRequest {
            receiver_id,
            content: content.to_string(),
            message_type: Some(MessageType::Text),
        }
    }

    #[test]
    fn self_messaging_is_rejected() {
        let user = Uuid::new_v4();
        let err = check_send_request(user, &request(user, "hello")).unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn whitespace_only_content_is_rejected() {
        let sender = Uuid::new_v4();
        let receiver = Uuid::new_v4();
        let err = check_send_request(sender, &request(receiver, "   \n\t")).unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn valid_request_passes_checks() {
        let sender = Uuid::new_v4();
        let receiver = Uuid::new_v4();
        assert!(check_send_request(sender, &request(receiver, "hi")).is_ok());
    }

    #[test]
    fn page_offset_is_one_indexed() {
        assert_eq!(page_offset(1, 50), (50, 0));
        assert_eq!(page_offset(2, 50), (50, 50));
        assert_eq!(page_offset(3, 10), (10, 20));
    }

    #[test]
    fn page_offset_clamps_zero_inputs() {
        assert_eq!(page_offset(0, 50), (50, 0));
        assert_eq!(page_offset(1, 0), (1, 0));
    }

    #[test]
    fn page_offset_saturates_on_extreme_inputs() {
        let (limit, offset) = page_offset(u32::MAX, u32::MAX);
        assert_eq!(limit, u32::MAX as i64);
        assert!(offset >= 0);
        assert_eq!(offset, i64::MAX);
    }
}
