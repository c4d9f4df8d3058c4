use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use setrack_core::UserId;
use uuid::Uuid;

/// A messenger conversation.
///
/// `updated_at` is bumped on every new message and orders the conversation
/// list. A direct (non-group) conversation between the same two users is
/// unique; creation must return the existing one instead of inserting a
/// duplicate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Conversation {
    /// Stable identifier.
    pub id: Uuid,
    /// Group conversations carry a name; direct ones do not.
    pub is_group: bool,
    /// Group name, absent for direct conversations.
    pub name: Option<String>,
    /// Insertion timestamp.
    pub created_at: DateTime<Utc>,
    /// Timestamp of the latest message, used for ordering.
    pub updated_at: DateTime<Utc>,
}

/// Membership of a user in a conversation, with the read watermark.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Participant {
    /// Conversation the user belongs to.
    pub conversation_id: Uuid,
    /// Member user.
    pub user_id: UserId,
    /// Last time the user opened the conversation. `None` means never read.
    pub last_read_at: Option<DateTime<Utc>>,
}

/// An immutable chat message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    /// Stable identifier.
    pub id: Uuid,
    /// Owning conversation.
    pub conversation_id: Uuid,
    /// Author.
    pub sender_id: UserId,
    /// Message text.
    pub body: String,
    /// Insertion timestamp.
    pub created_at: DateTime<Utc>,
}

/// Computes whether a conversation is unread for a user.
///
/// Unread iff a latest message exists, it was not sent by the user, and the
/// user either has no read watermark or the message is strictly newer than
/// it.
#[must_use]
pub fn conversation_is_unread(
    latest_message: Option<&Message>,
    user_id: UserId,
    last_read_at: Option<DateTime<Utc>>,
) -> bool {
    let Some(message) = latest_message else {
        return false;
    };
    if message.sender_id == user_id {
        return false;
    }

    match last_read_at {
        None => true,
        Some(watermark) => message.created_at > watermark,
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};
    use setrack_core::UserId;
    use uuid::Uuid;

    use super::{Message, conversation_is_unread};

    fn message_from(sender_id: UserId) -> Message {
        Message {
            id: Uuid::new_v4(),
            conversation_id: Uuid::new_v4(),
            sender_id,
            body: "hello".to_owned(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn empty_conversation_is_read() {
        assert!(!conversation_is_unread(None, UserId::new(), None));
    }

    #[test]
    fn own_latest_message_is_read() {
        let user_id = UserId::new();
        let message = message_from(user_id);
        assert!(!conversation_is_unread(Some(&message), user_id, None));
    }

    #[test]
    fn foreign_message_without_watermark_is_unread() {
        let message = message_from(UserId::new());
        assert!(conversation_is_unread(Some(&message), UserId::new(), None));
    }

    #[test]
    fn watermark_at_or_after_message_marks_read() {
        let message = message_from(UserId::new());
        let reader = UserId::new();

        assert!(!conversation_is_unread(
            Some(&message),
            reader,
            Some(message.created_at),
        ));
        assert!(conversation_is_unread(
            Some(&message),
            reader,
            Some(message.created_at - Duration::seconds(1)),
        ));
    }
}
