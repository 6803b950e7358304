use crate::error::Result;
use sqlx::PgPool;
use uuid::Uuid;

use super::message_models::{Message, MessageType};

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
        content: &str,
        message_type: MessageType,
    ) -> Result<Message> {
        let message = sqlx::query_as::<_, Message>(
            "INSERT INTO messages (sender_id, receiver_id, content, message_type)
             VALUES ($1, $2, $3, $4)
             RETURNING *",
        )
        .bind(sender_id)
        .bind(receiver_id)
        .bind(content)
        .bind(message_type)
        .fetch_one(&self.pool)
        .await?;

        Ok(message)
    }

    /// One page of the history between two users, newest-first.
    pub async fn find_between(
        &self,
        user_id: Uuid,
        other_user_id: Uuid,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Message>> {
        let messages = sqlx::query_as::<_, Message>(
            "SELECT * FROM messages
             WHERE (sender_id = $1 AND receiver_id = $2)
                OR (sender_id = $2 AND receiver_id = $1)
             ORDER BY created_at DESC
             LIMIT $3 OFFSET $4",
        )
        .bind(user_id)
        .bind(other_user_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(messages)
    }

    /// Every message the user has sent or received, newest-first. Feeds
    /// the conversation aggregation.
    pub async fn find_involving(&self, user_id: Uuid) -> Result<Vec<Message>> {
        let messages = sqlx::query_as::<_, Message>(
            "SELECT * FROM messages
             WHERE sender_id = $1 OR receiver_id = $1
             ORDER BY created_at DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(messages)
    }

    /// Marks every unread message from `sender_id` to `receiver_id` as read
    /// in a single filtered bulk update, and returns how many rows changed.
    ///
    /// The `is_read = false` filter makes the call idempotent and stamps
    /// `read_at` exactly once per row; a message appended concurrently is
    /// either matched by the filter or left for the next call, never half
    /// updated.
    pub async fn mark_conversation_read(
        &self,
        receiver_id: Uuid,
        sender_id: Uuid,
    ) -> Result<u64> {
        let result = sqlx::query(
            "UPDATE messages
             SET is_read = TRUE, read_at = NOW()
             WHERE sender_id = $1 AND receiver_id = $2 AND is_read = FALSE",
        )
        .bind(sender_id)
        .bind(receiver_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }
}
