use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use setrack_core::{AppError, AppResult, UserId};
use setrack_domain::{CalendarEvent, Notification, NotificationKind};
use uuid::Uuid;

use crate::user_service::UserRepository;

/// Repository port for per-recipient notifications.
#[async_trait]
pub trait NotificationRepository: Send + Sync {
    /// Inserts a batch of notification rows.
    async fn insert_many(&self, notifications: Vec<Notification>) -> AppResult<()>;

    /// Lists a recipient's notifications, newest first.
    async fn list_for_user(&self, user_id: UserId) -> AppResult<Vec<Notification>>;

    /// Flips one notification to read. Returns false when the row does not
    /// exist or belongs to another recipient.
    async fn mark_read(&self, id: Uuid, user_id: UserId) -> AppResult<bool>;

    /// Flips all of a recipient's unread notifications. Returns the number
    /// of rows touched.
    async fn mark_all_read(&self, user_id: UserId) -> AppResult<u64>;
}

/// A notification augmented with its precomputed relative-time label.
#[derive(Debug, Clone, PartialEq)]
pub struct NotificationFeedItem {
    /// The stored notification.
    pub notification: Notification,
    /// Label such as "Just now" or "5 minutes ago".
    pub relative_time: String,
}

/// Application service emitting and serving notifications.
#[derive(Clone)]
pub struct NotificationService {
    repository: Arc<dyn NotificationRepository>,
    users: Arc<dyn UserRepository>,
}

impl NotificationService {
    /// Creates a service from its dependencies.
    #[must_use]
    pub fn new(repository: Arc<dyn NotificationRepository>, users: Arc<dyn UserRepository>) -> Self {
        Self { repository, users }
    }

    /// Notifies every user newly exposed to an event's staffing.
    ///
    /// The actor's display name is looked up once and interpolated into
    /// every message. Callers wrap this in a best-effort guard; a failure
    /// here must never fail the primary mutation.
    pub async fn notify_event_staffing(
        &self,
        actor: UserId,
        event: &CalendarEvent,
        recipients: &[UserId],
    ) -> AppResult<usize> {
        if recipients.is_empty() {
            return Ok(0);
        }

        let actor_account = self.users.find(actor).await?;
        let actor_name = actor_account
            .as_ref()
            .map_or_else(|| "Someone".to_owned(), |account| account.display_name.clone());
        let actor_avatar = actor_account.and_then(|account| account.avatar_url);

        let now = Utc::now();
        let notifications: Vec<Notification> = recipients
            .iter()
            .map(|recipient| Notification {
                id: Uuid::new_v4(),
                user_id: *recipient,
                kind: NotificationKind::EventMention,
                title: "New event assignment".to_owned(),
                message: format!("{actor_name} added you to \"{}\"", event.title),
                event_id: Some(event.id),
                booked_by: Some(actor),
                booked_by_name: Some(actor_name.clone()),
                booked_by_avatar_url: actor_avatar.clone(),
                read: false,
                created_at: now,
            })
            .collect();

        let count = notifications.len();
        self.repository.insert_many(notifications).await?;
        Ok(count)
    }

    /// Returns the actor's notifications with relative-time labels.
    pub async fn feed(&self, user_id: UserId) -> AppResult<Vec<NotificationFeedItem>> {
        let now = Utc::now();
        let items = self
            .repository
            .list_for_user(user_id)
            .await?
            .into_iter()
            .map(|notification| {
                let relative_time = relative_time(notification.created_at, now);
                NotificationFeedItem {
                    notification,
                    relative_time,
                }
            })
            .collect();

        Ok(items)
    }

    /// Marks one of the actor's notifications as read.
    pub async fn mark_read(&self, user_id: UserId, id: Uuid) -> AppResult<()> {
        if !self.repository.mark_read(id, user_id).await? {
            return Err(AppError::NotFound(format!(
                "notification '{id}' does not exist"
            )));
        }

        Ok(())
    }

    /// Marks all of the actor's notifications as read.
    pub async fn mark_all_read(&self, user_id: UserId) -> AppResult<u64> {
        self.repository.mark_all_read(user_id).await
    }
}

/// Renders a timestamp relative to `now`, falling back to a short date for
/// anything older than seven days.
#[must_use]
pub fn relative_time(created_at: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let elapsed = now.signed_duration_since(created_at);
    let seconds = elapsed.num_seconds();

    if seconds < 60 {
        return "Just now".to_owned();
    }

    let minutes = elapsed.num_minutes();
    if minutes < 60 {
        return plural(minutes, "minute");
    }

    let hours = elapsed.num_hours();
    if hours < 24 {
        return plural(hours, "hour");
    }

    let days = elapsed.num_days();
    if days <= 7 {
        return plural(days, "day");
    }

    created_at.format("%b %-d, %Y").to_string()
}

fn plural(count: i64, unit: &str) -> String {
    if count == 1 {
        format!("1 {unit} ago")
    } else {
        format!("{count} {unit}s ago")
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use chrono::{Duration, TimeZone, Utc};
    use setrack_core::{AppError, AppResult, UserId};
    use setrack_domain::{CalendarEvent, Notification, UserAccount, UserRole};
    use tokio::sync::Mutex;
    use uuid::Uuid;

    use crate::user_service::UserRepository;

    use super::{NotificationRepository, NotificationService, relative_time};

    #[derive(Default)]
    struct FakeNotificationRepository {
        rows: Mutex<Vec<Notification>>,
    }

    #[async_trait]
    impl NotificationRepository for FakeNotificationRepository {
        async fn insert_many(&self, notifications: Vec<Notification>) -> AppResult<()> {
            self.rows.lock().await.extend(notifications);
            Ok(())
        }

        async fn list_for_user(&self, user_id: UserId) -> AppResult<Vec<Notification>> {
            Ok(self
                .rows
                .lock()
                .await
                .iter()
                .filter(|row| row.user_id == user_id)
                .cloned()
                .collect())
        }

        async fn mark_read(&self, id: Uuid, user_id: UserId) -> AppResult<bool> {
            let mut rows = self.rows.lock().await;
            match rows
                .iter_mut()
                .find(|row| row.id == id && row.user_id == user_id)
            {
                Some(row) => {
                    row.read = true;
                    Ok(true)
                }
                None => Ok(false),
            }
        }

        async fn mark_all_read(&self, user_id: UserId) -> AppResult<u64> {
            let mut rows = self.rows.lock().await;
            let mut touched = 0;
            for row in rows.iter_mut().filter(|row| row.user_id == user_id && !row.read) {
                row.read = true;
                touched += 1;
            }
            Ok(touched)
        }
    }

    struct CountingUserRepository {
        account: UserAccount,
        lookups: AtomicUsize,
    }

    #[async_trait]
    impl UserRepository for CountingUserRepository {
        async fn insert(&self, _account: UserAccount) -> AppResult<()> {
            Ok(())
        }

        async fn find(&self, id: UserId) -> AppResult<Option<UserAccount>> {
            self.lookups.fetch_add(1, Ordering::SeqCst);
            Ok((self.account.id == id).then(|| self.account.clone()))
        }

        async fn list(&self, _search: Option<String>) -> AppResult<Vec<UserAccount>> {
            Ok(vec![self.account.clone()])
        }

        async fn update(&self, _account: UserAccount) -> AppResult<()> {
            Ok(())
        }

        async fn delete(&self, _id: UserId) -> AppResult<()> {
            Ok(())
        }
    }

    fn account(id: UserId) -> UserAccount {
        let now = Utc::now();
        UserAccount {
            id,
            display_name: "Juan Dela Cruz".to_owned(),
            email: "juan@example.gov".to_owned(),
            position: None,
            role: UserRole::Staff,
            avatar_url: Some("/avatars/juan.png".to_owned()),
            active: true,
            created_at: now,
            updated_at: now,
        }
    }

    fn event(title: &str) -> CalendarEvent {
        let now = Utc::now();
        CalendarEvent {
            id: Uuid::new_v4(),
            title: title.to_owned(),
            description: None,
            location: None,
            starts_at: now,
            ends_at: now + Duration::hours(2),
            staff_involved: Vec::new(),
            assigned_personnel: None,
            booked_by: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn one_notification_per_recipient_with_single_actor_lookup() {
        let actor = UserId::new();
        let users = Arc::new(CountingUserRepository {
            account: account(actor),
            lookups: AtomicUsize::new(0),
        });
        let repository = Arc::new(FakeNotificationRepository::default());
        let service = NotificationService::new(repository.clone(), users.clone());

        let recipients = [UserId::new(), UserId::new(), UserId::new()];
        let count = service
            .notify_event_staffing(actor, &event("Quarterly Review"), &recipients)
            .await;

        assert_eq!(count.ok(), Some(3));
        assert_eq!(users.lookups.load(Ordering::SeqCst), 1);

        let rows = repository.rows.lock().await;
        assert_eq!(rows.len(), 3);
        assert!(rows.iter().all(|row| {
            row.message == "Juan Dela Cruz added you to \"Quarterly Review\"" && !row.read
        }));
    }

    #[tokio::test]
    async fn empty_recipient_set_writes_nothing() {
        let actor = UserId::new();
        let users = Arc::new(CountingUserRepository {
            account: account(actor),
            lookups: AtomicUsize::new(0),
        });
        let repository = Arc::new(FakeNotificationRepository::default());
        let service = NotificationService::new(repository.clone(), users);

        let count = service
            .notify_event_staffing(actor, &event("Site Visit"), &[])
            .await;

        assert_eq!(count.ok(), Some(0));
        assert!(repository.rows.lock().await.is_empty());
    }

    #[tokio::test]
    async fn mark_read_rejects_foreign_notification() {
        let recipient = UserId::new();
        let other = UserId::new();
        let users = Arc::new(CountingUserRepository {
            account: account(recipient),
            lookups: AtomicUsize::new(0),
        });
        let repository = Arc::new(FakeNotificationRepository::default());
        let service = NotificationService::new(repository.clone(), users);

        service
            .notify_event_staffing(recipient, &event("Inspection"), &[recipient])
            .await
            .ok();
        let id = repository.rows.lock().await[0].id;

        let result = service.mark_read(other, id).await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[test]
    fn relative_time_buckets() {
        let Some(now) = Utc.with_ymd_and_hms(2026, 1, 10, 12, 0, 0).single() else {
            panic!("valid timestamp literal");
        };

        assert_eq!(relative_time(now - Duration::seconds(30), now), "Just now");
        assert_eq!(relative_time(now - Duration::minutes(1), now), "1 minute ago");
        assert_eq!(
            relative_time(now - Duration::minutes(45), now),
            "45 minutes ago"
        );
        assert_eq!(relative_time(now - Duration::hours(3), now), "3 hours ago");
        assert_eq!(relative_time(now - Duration::days(6), now), "6 days ago");
        assert_eq!(relative_time(now - Duration::days(30), now), "Dec 11, 2025");
    }
}
