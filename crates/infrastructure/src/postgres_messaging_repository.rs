use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use setrack_application::MessagingRepository;
use setrack_core::{AppError, AppResult, UserId};
use setrack_domain::{Conversation, Message, Participant};

/// PostgreSQL-backed repository for conversations and messages.
#[derive(Clone)]
pub struct PostgresMessagingRepository {
    pool: PgPool,
}

impl PostgresMessagingRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct ConversationRow {
    id: Uuid,
    is_group: bool,
    name: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<ConversationRow> for Conversation {
    fn from(row: ConversationRow) -> Self {
        Self {
            id: row.id,
            is_group: row.is_group,
            name: row.name,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(Debug, FromRow)]
struct ParticipantRow {
    conversation_id: Uuid,
    user_id: Uuid,
    last_read_at: Option<DateTime<Utc>>,
}

impl From<ParticipantRow> for Participant {
    fn from(row: ParticipantRow) -> Self {
        Self {
            conversation_id: row.conversation_id,
            user_id: UserId::from_uuid(row.user_id),
            last_read_at: row.last_read_at,
        }
    }
}

#[derive(Debug, FromRow)]
struct MessageRow {
    id: Uuid,
    conversation_id: Uuid,
    sender_id: Uuid,
    body: String,
    created_at: DateTime<Utc>,
}

impl From<MessageRow> for Message {
    fn from(row: MessageRow) -> Self {
        Self {
            id: row.id,
            conversation_id: row.conversation_id,
            sender_id: UserId::from_uuid(row.sender_id),
            body: row.body,
            created_at: row.created_at,
        }
    }
}

#[async_trait]
impl MessagingRepository for PostgresMessagingRepository {
    async fn insert_conversation(
        &self,
        conversation: Conversation,
        participants: Vec<Participant>,
    ) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO conversations (id, is_group, name, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(conversation.id)
        .bind(conversation.is_group)
        .bind(conversation.name)
        .bind(conversation.created_at)
        .bind(conversation.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to insert conversation: {error}")))?;

        let member_ids: Vec<Uuid> = participants
            .iter()
            .map(|participant| participant.user_id.as_uuid())
            .collect();
        sqlx::query(
            r#"
            INSERT INTO conversation_participants (conversation_id, user_id)
            SELECT $1, member_id FROM UNNEST($2::UUID[]) AS member_id
            "#,
        )
        .bind(conversation.id)
        .bind(member_ids)
        .execute(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to insert participants: {error}")))?;

        Ok(())
    }

    async fn find_conversation(&self, id: Uuid) -> AppResult<Option<Conversation>> {
        let row = sqlx::query_as::<_, ConversationRow>(
            "SELECT id, is_group, name, created_at, updated_at FROM conversations WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to fetch conversation: {error}")))?;

        Ok(row.map(Conversation::from))
    }

    async fn find_direct_conversation(
        &self,
        user_a: UserId,
        user_b: UserId,
    ) -> AppResult<Option<Conversation>> {
        let row = sqlx::query_as::<_, ConversationRow>(
            r#"
            SELECT c.id, c.is_group, c.name, c.created_at, c.updated_at
            FROM conversations c
            WHERE c.is_group = FALSE
                AND EXISTS (
                    SELECT 1 FROM conversation_participants p
                    WHERE p.conversation_id = c.id AND p.user_id = $1
                )
                AND EXISTS (
                    SELECT 1 FROM conversation_participants p
                    WHERE p.conversation_id = c.id AND p.user_id = $2
                )
                AND (
                    SELECT COUNT(*) FROM conversation_participants p
                    WHERE p.conversation_id = c.id
                ) = 2
            LIMIT 1
            "#,
        )
        .bind(user_a.as_uuid())
        .bind(user_b.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!("failed to look up direct conversation: {error}"))
        })?;

        Ok(row.map(Conversation::from))
    }

    async fn conversations_for_user(&self, user_id: UserId) -> AppResult<Vec<Conversation>> {
        let rows = sqlx::query_as::<_, ConversationRow>(
            r#"
            SELECT c.id, c.is_group, c.name, c.created_at, c.updated_at
            FROM conversations c
            JOIN conversation_participants p ON p.conversation_id = c.id
            WHERE p.user_id = $1
            ORDER BY c.updated_at DESC
            "#,
        )
        .bind(user_id.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to list conversations: {error}")))?;

        Ok(rows.into_iter().map(Conversation::from).collect())
    }

    async fn participant(
        &self,
        conversation_id: Uuid,
        user_id: UserId,
    ) -> AppResult<Option<Participant>> {
        let row = sqlx::query_as::<_, ParticipantRow>(
            r#"
            SELECT conversation_id, user_id, last_read_at
            FROM conversation_participants
            WHERE conversation_id = $1 AND user_id = $2
            "#,
        )
        .bind(conversation_id)
        .bind(user_id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to fetch participant: {error}")))?;

        Ok(row.map(Participant::from))
    }

    async fn insert_message(&self, message: Message) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO messages (id, conversation_id, sender_id, body, created_at)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(message.id)
        .bind(message.conversation_id)
        .bind(message.sender_id.as_uuid())
        .bind(message.body)
        .bind(message.created_at)
        .execute(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to insert message: {error}")))?;

        Ok(())
    }

    async fn latest_message(&self, conversation_id: Uuid) -> AppResult<Option<Message>> {
        let row = sqlx::query_as::<_, MessageRow>(
            r#"
            SELECT id, conversation_id, sender_id, body, created_at
            FROM messages
            WHERE conversation_id = $1
            ORDER BY created_at DESC
            LIMIT 1
            "#,
        )
        .bind(conversation_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to fetch latest message: {error}")))?;

        Ok(row.map(Message::from))
    }

    async fn list_messages(&self, conversation_id: Uuid) -> AppResult<Vec<Message>> {
        let rows = sqlx::query_as::<_, MessageRow>(
            r#"
            SELECT id, conversation_id, sender_id, body, created_at
            FROM messages
            WHERE conversation_id = $1
            ORDER BY created_at
            "#,
        )
        .bind(conversation_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to list messages: {error}")))?;

        Ok(rows.into_iter().map(Message::from).collect())
    }

    async fn touch_conversation(&self, conversation_id: Uuid, at: DateTime<Utc>) -> AppResult<()> {
        sqlx::query("UPDATE conversations SET updated_at = $2 WHERE id = $1")
            .bind(conversation_id)
            .bind(at)
            .execute(&self.pool)
            .await
            .map_err(|error| {
                AppError::Internal(format!("failed to touch conversation: {error}"))
            })?;

        Ok(())
    }

    async fn set_last_read(
        &self,
        conversation_id: Uuid,
        user_id: UserId,
        at: DateTime<Utc>,
    ) -> AppResult<()> {
        sqlx::query(
            r#"
            UPDATE conversation_participants
            SET last_read_at = $3
            WHERE conversation_id = $1 AND user_id = $2
            "#,
        )
        .bind(conversation_id)
        .bind(user_id.as_uuid())
        .bind(at)
        .execute(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to set read watermark: {error}")))?;

        Ok(())
    }
}
