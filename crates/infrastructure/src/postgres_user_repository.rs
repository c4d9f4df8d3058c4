use std::str::FromStr;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use setrack_application::UserRepository;
use setrack_core::{AppError, AppResult, UserId};
use setrack_domain::{UserAccount, UserRole};

/// PostgreSQL-backed repository for user accounts.
#[derive(Clone)]
pub struct PostgresUserRepository {
    pool: PgPool,
}

impl PostgresUserRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct UserRow {
    id: Uuid,
    display_name: String,
    email: String,
    position: Option<String>,
    role: String,
    avatar_url: Option<String>,
    active: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl UserRow {
    fn into_account(self) -> AppResult<UserAccount> {
        Ok(UserAccount {
            id: UserId::from_uuid(self.id),
            display_name: self.display_name,
            email: self.email,
            position: self.position,
            role: UserRole::from_str(&self.role)?,
            avatar_url: self.avatar_url,
            active: self.active,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn insert(&self, account: UserAccount) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO users (
                id, display_name, email, position, role, avatar_url,
                active, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(account.id.as_uuid())
        .bind(account.display_name)
        .bind(account.email)
        .bind(account.position)
        .bind(account.role.as_str())
        .bind(account.avatar_url)
        .bind(account.active)
        .bind(account.created_at)
        .bind(account.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to insert user: {error}")))?;

        Ok(())
    }

    async fn find(&self, id: UserId) -> AppResult<Option<UserAccount>> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, display_name, email, position, role, avatar_url,
                active, created_at, updated_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to fetch user: {error}")))?;

        row.map(UserRow::into_account).transpose()
    }

    async fn list(&self, search: Option<String>) -> AppResult<Vec<UserAccount>> {
        let rows = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, display_name, email, position, role, avatar_url,
                active, created_at, updated_at
            FROM users
            WHERE ($1::TEXT IS NULL
                OR display_name ILIKE '%' || $1 || '%'
                OR email ILIKE '%' || $1 || '%')
            ORDER BY display_name
            "#,
        )
        .bind(search)
        .fetch_all(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to list users: {error}")))?;

        rows.into_iter().map(UserRow::into_account).collect()
    }

    async fn update(&self, account: UserAccount) -> AppResult<()> {
        sqlx::query(
            r#"
            UPDATE users SET
                display_name = $2,
                email = $3,
                position = $4,
                role = $5,
                avatar_url = $6,
                active = $7,
                updated_at = $8
            WHERE id = $1
            "#,
        )
        .bind(account.id.as_uuid())
        .bind(account.display_name)
        .bind(account.email)
        .bind(account.position)
        .bind(account.role.as_str())
        .bind(account.avatar_url)
        .bind(account.active)
        .bind(account.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to update user: {error}")))?;

        Ok(())
    }

    async fn delete(&self, id: UserId) -> AppResult<()> {
        sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(|error| AppError::Internal(format!("failed to delete user: {error}")))?;

        Ok(())
    }
}
