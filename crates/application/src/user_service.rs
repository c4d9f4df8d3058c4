use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use serde_json::json;
use setrack_core::{AppError, AppResult, UserId};
use setrack_domain::{AuditAction, NewUserAccount, ResourceKind, UserAccount, UserAccountPatch};

use crate::audit::AuditRecorder;

/// Repository port for user accounts.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Inserts a new account row.
    async fn insert(&self, account: UserAccount) -> AppResult<()>;

    /// Fetches one account by id.
    async fn find(&self, id: UserId) -> AppResult<Option<UserAccount>>;

    /// Lists accounts, optionally filtered by a case-insensitive substring
    /// match on display name and email.
    async fn list(&self, search: Option<String>) -> AppResult<Vec<UserAccount>>;

    /// Writes back a full account row.
    async fn update(&self, account: UserAccount) -> AppResult<()>;

    /// Removes an account row.
    async fn delete(&self, id: UserId) -> AppResult<()>;
}

/// Application service for user administration.
#[derive(Clone)]
pub struct UserService {
    repository: Arc<dyn UserRepository>,
    audit: AuditRecorder,
}

impl UserService {
    /// Creates a service from its dependencies.
    #[must_use]
    pub fn new(repository: Arc<dyn UserRepository>, audit: AuditRecorder) -> Self {
        Self { repository, audit }
    }

    /// Fetches one account or reports it missing.
    pub async fn get(&self, id: UserId) -> AppResult<UserAccount> {
        self.repository
            .find(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("user '{id}' does not exist")))
    }

    /// Lists accounts matching the optional search term.
    pub async fn list(&self, search: Option<String>) -> AppResult<Vec<UserAccount>> {
        self.repository.list(search).await
    }

    /// Creates an account and records the action.
    pub async fn create(
        &self,
        actor: Option<UserId>,
        input: NewUserAccount,
    ) -> AppResult<UserAccount> {
        if input.display_name.trim().is_empty() {
            return Err(AppError::Validation(
                "display_name must not be empty".to_owned(),
            ));
        }
        if !input.email.contains('@') {
            return Err(AppError::Validation(format!(
                "invalid email address '{}'",
                input.email
            )));
        }

        let now = Utc::now();
        let account = UserAccount {
            id: UserId::new(),
            display_name: input.display_name,
            email: input.email,
            position: input.position,
            role: input.role,
            avatar_url: input.avatar_url,
            active: true,
            created_at: now,
            updated_at: now,
        };
        self.repository.insert(account.clone()).await?;

        self.audit
            .record(
                actor,
                AuditAction::Created,
                ResourceKind::User,
                account.id.as_uuid(),
                account.display_name.clone(),
                json!({ "email": account.email }),
            )
            .await;

        Ok(account)
    }

    /// Applies a sparse patch and records the changed fields.
    pub async fn update(
        &self,
        actor: Option<UserId>,
        id: UserId,
        patch: UserAccountPatch,
    ) -> AppResult<UserAccount> {
        let mut account = self.get(id).await?;
        let changed = account.apply(patch, Utc::now());
        self.repository.update(account.clone()).await?;

        self.audit
            .record(
                actor,
                AuditAction::Updated,
                ResourceKind::User,
                account.id.as_uuid(),
                account.display_name.clone(),
                json!({ "changedFields": changed }),
            )
            .await;

        Ok(account)
    }

    /// Deletes an account, capturing its audit snapshot first.
    pub async fn delete(&self, actor: Option<UserId>, id: UserId) -> AppResult<()> {
        let account = self.get(id).await?;
        self.repository.delete(id).await?;

        self.audit
            .record(
                actor,
                AuditAction::Deleted,
                ResourceKind::User,
                account.id.as_uuid(),
                account.display_name,
                json!({ "email": account.email }),
            )
            .await;

        Ok(())
    }
}
