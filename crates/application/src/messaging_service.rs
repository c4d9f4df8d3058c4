use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use setrack_core::{AppError, AppResult, UserId};
use setrack_domain::{Conversation, Message, Participant, conversation_is_unread};
use uuid::Uuid;

/// Repository port for conversations, participants, and messages.
#[async_trait]
pub trait MessagingRepository: Send + Sync {
    /// Inserts a conversation with its initial participant set.
    async fn insert_conversation(
        &self,
        conversation: Conversation,
        participants: Vec<Participant>,
    ) -> AppResult<()>;

    /// Fetches one conversation by id.
    async fn find_conversation(&self, id: Uuid) -> AppResult<Option<Conversation>>;

    /// Finds the direct (non-group) conversation between exactly two users.
    async fn find_direct_conversation(
        &self,
        user_a: UserId,
        user_b: UserId,
    ) -> AppResult<Option<Conversation>>;

    /// Lists a user's conversations, most recently active first.
    async fn conversations_for_user(&self, user_id: UserId) -> AppResult<Vec<Conversation>>;

    /// Fetches one membership row, if the user belongs to the conversation.
    async fn participant(
        &self,
        conversation_id: Uuid,
        user_id: UserId,
    ) -> AppResult<Option<Participant>>;

    /// Appends an immutable message.
    async fn insert_message(&self, message: Message) -> AppResult<()>;

    /// Fetches the newest message of a conversation.
    async fn latest_message(&self, conversation_id: Uuid) -> AppResult<Option<Message>>;

    /// Lists a conversation's messages, oldest first.
    async fn list_messages(&self, conversation_id: Uuid) -> AppResult<Vec<Message>>;

    /// Bumps a conversation's activity timestamp.
    async fn touch_conversation(&self, conversation_id: Uuid, at: DateTime<Utc>) -> AppResult<()>;

    /// Moves a participant's read watermark.
    async fn set_last_read(
        &self,
        conversation_id: Uuid,
        user_id: UserId,
        at: DateTime<Utc>,
    ) -> AppResult<()>;
}

/// A conversation listing row with its unread state.
#[derive(Debug, Clone, PartialEq)]
pub struct ConversationSummary {
    /// The conversation itself.
    pub conversation: Conversation,
    /// Newest message, when any exists.
    pub latest_message: Option<Message>,
    /// Whether the requesting user has unseen activity.
    pub unread: bool,
}

/// Application service for the internal messenger.
#[derive(Clone)]
pub struct MessagingService {
    repository: Arc<dyn MessagingRepository>,
}

impl MessagingService {
    /// Creates a service backed by the given repository.
    #[must_use]
    pub fn new(repository: Arc<dyn MessagingRepository>) -> Self {
        Self { repository }
    }

    /// Creates a conversation, or returns the existing direct conversation
    /// between the same two users.
    pub async fn create_conversation(
        &self,
        actor: UserId,
        participant_ids: Vec<UserId>,
        is_group: bool,
        name: Option<String>,
    ) -> AppResult<Conversation> {
        let mut members = participant_ids;
        if !members.contains(&actor) {
            members.push(actor);
        }
        members.sort();
        members.dedup();

        if members.len() < 2 {
            return Err(AppError::Validation(
                "a conversation needs at least two participants".to_owned(),
            ));
        }

        if !is_group {
            if members.len() != 2 {
                return Err(AppError::Validation(
                    "a direct conversation has exactly two participants".to_owned(),
                ));
            }
            if let Some(existing) = self
                .repository
                .find_direct_conversation(members[0], members[1])
                .await?
            {
                return Ok(existing);
            }
        }

        let now = Utc::now();
        let conversation = Conversation {
            id: Uuid::new_v4(),
            is_group,
            name: if is_group { name } else { None },
            created_at: now,
            updated_at: now,
        };
        let participants = members
            .into_iter()
            .map(|user_id| Participant {
                conversation_id: conversation.id,
                user_id,
                last_read_at: None,
            })
            .collect();
        self.repository
            .insert_conversation(conversation.clone(), participants)
            .await?;

        Ok(conversation)
    }

    /// Lists the actor's conversations with unread state, most recently
    /// active first.
    pub async fn conversations(&self, actor: UserId) -> AppResult<Vec<ConversationSummary>> {
        let conversations = self.repository.conversations_for_user(actor).await?;

        let mut summaries = Vec::with_capacity(conversations.len());
        for conversation in conversations {
            let latest_message = self.repository.latest_message(conversation.id).await?;
            let watermark = self
                .repository
                .participant(conversation.id, actor)
                .await?
                .and_then(|participant| participant.last_read_at);
            let unread = conversation_is_unread(latest_message.as_ref(), actor, watermark);
            summaries.push(ConversationSummary {
                conversation,
                latest_message,
                unread,
            });
        }

        Ok(summaries)
    }

    /// Appends a message and bumps the conversation's activity timestamp.
    pub async fn send_message(
        &self,
        actor: UserId,
        conversation_id: Uuid,
        body: String,
    ) -> AppResult<Message> {
        if body.trim().is_empty() {
            return Err(AppError::Validation("message must not be empty".to_owned()));
        }
        self.require_participant(conversation_id, actor).await?;

        let message = Message {
            id: Uuid::new_v4(),
            conversation_id,
            sender_id: actor,
            body,
            created_at: Utc::now(),
        };
        self.repository.insert_message(message.clone()).await?;
        self.repository
            .touch_conversation(conversation_id, message.created_at)
            .await?;

        Ok(message)
    }

    /// Lists a conversation's messages, oldest first.
    pub async fn messages(&self, actor: UserId, conversation_id: Uuid) -> AppResult<Vec<Message>> {
        self.require_participant(conversation_id, actor).await?;
        self.repository.list_messages(conversation_id).await
    }

    /// Moves the actor's read watermark to now.
    pub async fn mark_read(&self, actor: UserId, conversation_id: Uuid) -> AppResult<()> {
        self.require_participant(conversation_id, actor).await?;
        self.repository
            .set_last_read(conversation_id, actor, Utc::now())
            .await
    }

    async fn require_participant(&self, conversation_id: Uuid, user_id: UserId) -> AppResult<()> {
        if self
            .repository
            .find_conversation(conversation_id)
            .await?
            .is_none()
        {
            return Err(AppError::NotFound(format!(
                "conversation '{conversation_id}' does not exist"
            )));
        }

        if self
            .repository
            .participant(conversation_id, user_id)
            .await?
            .is_none()
        {
            return Err(AppError::Forbidden(format!(
                "user '{user_id}' is not a participant of conversation '{conversation_id}'"
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use async_trait::async_trait;
    use chrono::{DateTime, Utc};
    use setrack_core::{AppError, AppResult, UserId};
    use setrack_domain::{Conversation, Message, Participant};
    use tokio::sync::Mutex;
    use uuid::Uuid;

    use super::{MessagingRepository, MessagingService};

    #[derive(Default)]
    struct InMemoryMessagingRepository {
        conversations: Mutex<Vec<Conversation>>,
        participants: Mutex<Vec<Participant>>,
        messages: Mutex<Vec<Message>>,
    }

    #[async_trait]
    impl MessagingRepository for InMemoryMessagingRepository {
        async fn insert_conversation(
            &self,
            conversation: Conversation,
            participants: Vec<Participant>,
        ) -> AppResult<()> {
            self.conversations.lock().await.push(conversation);
            self.participants.lock().await.extend(participants);
            Ok(())
        }

        async fn find_conversation(&self, id: Uuid) -> AppResult<Option<Conversation>> {
            Ok(self
                .conversations
                .lock()
                .await
                .iter()
                .find(|conversation| conversation.id == id)
                .cloned())
        }

        async fn find_direct_conversation(
            &self,
            user_a: UserId,
            user_b: UserId,
        ) -> AppResult<Option<Conversation>> {
            let participants = self.participants.lock().await;
            let conversations = self.conversations.lock().await;
            for conversation in conversations.iter().filter(|conversation| !conversation.is_group) {
                let members: Vec<UserId> = participants
                    .iter()
                    .filter(|participant| participant.conversation_id == conversation.id)
                    .map(|participant| participant.user_id)
                    .collect();
                if members.len() == 2 && members.contains(&user_a) && members.contains(&user_b) {
                    return Ok(Some(conversation.clone()));
                }
            }
            Ok(None)
        }

        async fn conversations_for_user(&self, user_id: UserId) -> AppResult<Vec<Conversation>> {
            let participants = self.participants.lock().await;
            let mut conversations: Vec<Conversation> = self
                .conversations
                .lock()
                .await
                .iter()
                .filter(|conversation| {
                    participants.iter().any(|participant| {
                        participant.conversation_id == conversation.id
                            && participant.user_id == user_id
                    })
                })
                .cloned()
                .collect();
            conversations.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
            Ok(conversations)
        }

        async fn participant(
            &self,
            conversation_id: Uuid,
            user_id: UserId,
        ) -> AppResult<Option<Participant>> {
            Ok(self
                .participants
                .lock()
                .await
                .iter()
                .find(|participant| {
                    participant.conversation_id == conversation_id
                        && participant.user_id == user_id
                })
                .copied())
        }

        async fn insert_message(&self, message: Message) -> AppResult<()> {
            self.messages.lock().await.push(message);
            Ok(())
        }

        async fn latest_message(&self, conversation_id: Uuid) -> AppResult<Option<Message>> {
            Ok(self
                .messages
                .lock()
                .await
                .iter()
                .filter(|message| message.conversation_id == conversation_id)
                .max_by_key(|message| message.created_at)
                .cloned())
        }

        async fn list_messages(&self, conversation_id: Uuid) -> AppResult<Vec<Message>> {
            let mut messages: Vec<Message> = self
                .messages
                .lock()
                .await
                .iter()
                .filter(|message| message.conversation_id == conversation_id)
                .cloned()
                .collect();
            messages.sort_by_key(|message| message.created_at);
            Ok(messages)
        }

        async fn touch_conversation(
            &self,
            conversation_id: Uuid,
            at: DateTime<Utc>,
        ) -> AppResult<()> {
            let mut conversations = self.conversations.lock().await;
            if let Some(conversation) = conversations
                .iter_mut()
                .find(|conversation| conversation.id == conversation_id)
            {
                conversation.updated_at = at;
            }
            Ok(())
        }

        async fn set_last_read(
            &self,
            conversation_id: Uuid,
            user_id: UserId,
            at: DateTime<Utc>,
        ) -> AppResult<()> {
            let mut participants = self.participants.lock().await;
            if let Some(participant) = participants.iter_mut().find(|participant| {
                participant.conversation_id == conversation_id && participant.user_id == user_id
            }) {
                participant.last_read_at = Some(at);
            }
            Ok(())
        }
    }

    fn service() -> MessagingService {
        MessagingService::new(Arc::new(InMemoryMessagingRepository::default()))
    }

    #[tokio::test]
    async fn direct_conversation_creation_is_idempotent() {
        let service = service();
        let alice = UserId::new();
        let bob = UserId::new();

        let Ok(first) = service
            .create_conversation(alice, vec![bob], false, None)
            .await
        else {
            panic!("first create failed");
        };
        let Ok(second) = service
            .create_conversation(bob, vec![alice], false, None)
            .await
        else {
            panic!("second create failed");
        };

        assert_eq!(first.id, second.id);
    }

    #[tokio::test]
    async fn group_conversations_are_not_deduplicated() {
        let service = service();
        let alice = UserId::new();
        let bob = UserId::new();

        let Ok(first) = service
            .create_conversation(alice, vec![bob], true, Some("Ops".to_owned()))
            .await
        else {
            panic!("first create failed");
        };
        let Ok(second) = service
            .create_conversation(alice, vec![bob], true, Some("Ops".to_owned()))
            .await
        else {
            panic!("second create failed");
        };

        assert_ne!(first.id, second.id);
    }

    #[tokio::test]
    async fn unread_flips_with_the_read_watermark() {
        let service = service();
        let alice = UserId::new();
        let bob = UserId::new();

        let Ok(conversation) = service
            .create_conversation(alice, vec![bob], false, None)
            .await
        else {
            panic!("create failed");
        };
        service
            .send_message(alice, conversation.id, "kumusta".to_owned())
            .await
            .ok();

        let Ok(before_read) = service.conversations(bob).await else {
            panic!("listing failed");
        };
        assert!(before_read[0].unread);

        service.mark_read(bob, conversation.id).await.ok();

        let Ok(after_read) = service.conversations(bob).await else {
            panic!("listing failed");
        };
        assert!(!after_read[0].unread);
    }

    #[tokio::test]
    async fn own_messages_never_count_as_unread() {
        let service = service();
        let alice = UserId::new();
        let bob = UserId::new();

        let Ok(conversation) = service
            .create_conversation(alice, vec![bob], false, None)
            .await
        else {
            panic!("create failed");
        };
        service
            .send_message(alice, conversation.id, "hello".to_owned())
            .await
            .ok();

        let Ok(summaries) = service.conversations(alice).await else {
            panic!("listing failed");
        };
        assert!(!summaries[0].unread);
    }

    #[tokio::test]
    async fn new_message_bumps_conversation_ordering() {
        let service = service();
        let alice = UserId::new();
        let bob = UserId::new();
        let carol = UserId::new();

        let Ok(first) = service
            .create_conversation(alice, vec![bob], false, None)
            .await
        else {
            panic!("create failed");
        };
        let Ok(second) = service
            .create_conversation(alice, vec![carol], false, None)
            .await
        else {
            panic!("create failed");
        };

        service
            .send_message(alice, first.id, "bump".to_owned())
            .await
            .ok();

        let Ok(summaries) = service.conversations(alice).await else {
            panic!("listing failed");
        };
        assert_eq!(summaries[0].conversation.id, first.id);
        assert_eq!(summaries[1].conversation.id, second.id);
    }

    #[tokio::test]
    async fn non_participants_cannot_send() {
        let service = service();
        let alice = UserId::new();
        let bob = UserId::new();
        let mallory = UserId::new();

        let Ok(conversation) = service
            .create_conversation(alice, vec![bob], false, None)
            .await
        else {
            panic!("create failed");
        };

        let result = service
            .send_message(mallory, conversation.id, "hi".to_owned())
            .await;

        assert!(matches!(result, Err(AppError::Forbidden(_))));
    }
}
