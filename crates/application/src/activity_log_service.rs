use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use serde_json::Value;
use setrack_core::{AppResult, UserId};
use setrack_domain::{AuditAction, day_bounds};

/// Audit log entry projection for the activity screen.
#[derive(Debug, Clone, PartialEq)]
pub struct AuditLogEntry {
    /// Stable entry identifier.
    pub id: String,
    /// Actor subject, absent for entries written before actor tracking.
    pub user_id: Option<String>,
    /// Stable action identifier.
    pub action: String,
    /// Resource type tag.
    pub resource_type: String,
    /// Resource identifier.
    pub resource_id: String,
    /// Title snapshot captured when the action happened.
    pub resource_title: String,
    /// Structured detail payload.
    pub details: Value,
    /// Entry timestamp in RFC3339.
    pub created_at: String,
}

/// Filters accepted by the activity log listing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AuditLogFilter {
    /// Restrict to one actor.
    pub user_id: Option<UserId>,
    /// Restrict to one action kind.
    pub action: Option<AuditAction>,
    /// Case-insensitive substring match on title and resource type.
    pub search: Option<String>,
}

/// Aggregate counts over the filtered entry set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuditLogStats {
    /// Matching entries overall.
    pub total: u64,
    /// Matching entries since UTC midnight.
    pub today: u64,
    /// Matching entries in the last seven days.
    pub this_week: u64,
}

/// Listing result: entries plus their aggregate counts.
#[derive(Debug, Clone, PartialEq)]
pub struct AuditLogPage {
    /// Matching entries, newest first.
    pub logs: Vec<AuditLogEntry>,
    /// Counts over the same filtered set.
    pub stats: AuditLogStats,
}

/// Repository port for reading the audit trail.
#[async_trait]
pub trait AuditLogRepository: Send + Sync {
    /// Lists matching entries, newest first.
    async fn list_entries(
        &self,
        filter: AuditLogFilter,
        limit: usize,
        offset: usize,
    ) -> AppResult<Vec<AuditLogEntry>>;

    /// Counts matching entries overall and within the given boundaries.
    async fn count_stats(
        &self,
        filter: AuditLogFilter,
        today_start: DateTime<Utc>,
        week_start: DateTime<Utc>,
    ) -> AppResult<AuditLogStats>;
}

/// Application service for the activity log screen.
///
/// Stats are computed over the same filtered set as the listing, so the
/// numbers always match what the caller sees.
#[derive(Clone)]
pub struct ActivityLogService {
    repository: Arc<dyn AuditLogRepository>,
}

impl ActivityLogService {
    /// Creates a service backed by the given repository.
    #[must_use]
    pub fn new(repository: Arc<dyn AuditLogRepository>) -> Self {
        Self { repository }
    }

    /// Returns matching entries plus aggregate counts.
    pub async fn list(
        &self,
        filter: AuditLogFilter,
        limit: usize,
        offset: usize,
    ) -> AppResult<AuditLogPage> {
        let now = Utc::now();
        let (today_start, _) = day_bounds(now.date_naive())?;
        let week_start = now - Duration::days(7);

        let logs = self
            .repository
            .list_entries(filter.clone(), limit.clamp(1, 200), offset.min(5_000))
            .await?;
        let stats = self
            .repository
            .count_stats(filter, today_start, week_start)
            .await?;

        Ok(AuditLogPage { logs, stats })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use async_trait::async_trait;
    use chrono::{DateTime, Utc};
    use setrack_core::AppResult;
    use setrack_domain::AuditAction;
    use tokio::sync::Mutex;

    use super::{
        ActivityLogService, AuditLogEntry, AuditLogFilter, AuditLogPage, AuditLogRepository,
        AuditLogStats,
    };

    #[derive(Default)]
    struct FakeAuditLogRepository {
        entries: Vec<AuditLogEntry>,
        observed: Mutex<Vec<(AuditLogFilter, usize, usize)>>,
    }

    #[async_trait]
    impl AuditLogRepository for FakeAuditLogRepository {
        async fn list_entries(
            &self,
            filter: AuditLogFilter,
            limit: usize,
            offset: usize,
        ) -> AppResult<Vec<AuditLogEntry>> {
            self.observed.lock().await.push((filter, limit, offset));
            Ok(self.entries.clone())
        }

        async fn count_stats(
            &self,
            _filter: AuditLogFilter,
            today_start: DateTime<Utc>,
            week_start: DateTime<Utc>,
        ) -> AppResult<AuditLogStats> {
            assert!(week_start < today_start);
            Ok(AuditLogStats {
                total: self.entries.len() as u64,
                today: 0,
                this_week: 0,
            })
        }
    }

    #[tokio::test]
    async fn list_caps_limit_and_offset() {
        let repository = Arc::new(FakeAuditLogRepository::default());
        let service = ActivityLogService::new(repository.clone());

        let result = service.list(AuditLogFilter::default(), 10_000, 1_000_000).await;

        assert!(result.is_ok());
        let observed = repository.observed.lock().await;
        assert_eq!(observed[0].1, 200);
        assert_eq!(observed[0].2, 5_000);
    }

    #[tokio::test]
    async fn list_passes_filter_through_to_stats() {
        let repository = Arc::new(FakeAuditLogRepository::default());
        let service = ActivityLogService::new(repository.clone());

        let filter = AuditLogFilter {
            action: Some(AuditAction::Deleted),
            ..AuditLogFilter::default()
        };
        let page: AuditLogPage = match service.list(filter.clone(), 50, 0).await {
            Ok(page) => page,
            Err(error) => panic!("listing failed: {error}"),
        };

        assert_eq!(page.stats.total, 0);
        let observed = repository.observed.lock().await;
        assert_eq!(observed[0].0, filter);
    }
}
