use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use setrack_application::ConversationSummary;
use setrack_domain::{Conversation, Message};
use uuid::Uuid;

/// Incoming payload for conversation creation.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateConversationRequest {
    pub participant_ids: Vec<Uuid>,
    #[serde(default)]
    pub is_group: bool,
    pub name: Option<String>,
}

/// Incoming payload for sending a message.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendMessageRequest {
    pub body: String,
}

/// API representation of a conversation.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversationResponse {
    pub id: Uuid,
    pub is_group: bool,
    pub name: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Conversation> for ConversationResponse {
    fn from(value: Conversation) -> Self {
        Self {
            id: value.id,
            is_group: value.is_group,
            name: value.name,
            created_at: value.created_at,
            updated_at: value.updated_at,
        }
    }
}

/// API representation of a message.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageResponse {
    pub id: Uuid,
    pub conversation_id: Uuid,
    pub sender_id: Uuid,
    pub body: String,
    pub created_at: DateTime<Utc>,
}

impl From<Message> for MessageResponse {
    fn from(value: Message) -> Self {
        Self {
            id: value.id,
            conversation_id: value.conversation_id,
            sender_id: value.sender_id.as_uuid(),
            body: value.body,
            created_at: value.created_at,
        }
    }
}

/// API representation of a conversation list row.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversationSummaryResponse {
    #[serde(flatten)]
    pub conversation: ConversationResponse,
    pub latest_message: Option<MessageResponse>,
    pub unread: bool,
}

impl From<ConversationSummary> for ConversationSummaryResponse {
    fn from(value: ConversationSummary) -> Self {
        Self {
            conversation: ConversationResponse::from(value.conversation),
            latest_message: value.latest_message.map(MessageResponse::from),
            unread: value.unread,
        }
    }
}
