//! Remote user repository.

use async_trait::async_trait;
use defter_core::profile::UserProfile;
use defter_core::types::DbId;

use crate::error::{StoreError, StoreResult};
use crate::models::{NewUser, UserAccount, UserPatch};
use crate::repositories::UserRepository;
use crate::DbPool;

use super::rows::UserRow;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, username, display_name, role, xp, level, streak, created_at";

pub struct RemoteUserRepo {
    pool: DbPool,
}

impl RemoteUserRepo {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for RemoteUserRepo {
    async fn list(&self) -> StoreResult<Vec<UserAccount>> {
        let query = format!("SELECT {COLUMNS} FROM users ORDER BY created_at DESC");
        let rows = sqlx::query_as::<_, UserRow>(&query)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn get(&self, id: DbId) -> StoreResult<Option<UserAccount>> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE id = $1");
        let row = sqlx::query_as::<_, UserRow>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(Into::into))
    }

    async fn create(&self, input: NewUser) -> StoreResult<UserAccount> {
        let query = format!(
            "INSERT INTO users (username, display_name, role)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        let row = sqlx::query_as::<_, UserRow>(&query)
            .bind(&input.username)
            .bind(&input.display_name)
            .bind(input.role.as_str())
            .fetch_one(&self.pool)
            .await?;
        Ok(row.into())
    }

    async fn update(&self, id: DbId, patch: UserPatch) -> StoreResult<UserAccount> {
        let query = format!(
            "UPDATE users SET
                display_name = COALESCE($2, display_name),
                role = COALESCE($3, role)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        let row = sqlx::query_as::<_, UserRow>(&query)
            .bind(id)
            .bind(&patch.display_name)
            .bind(patch.role.map(|r| r.as_str()))
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| StoreError::not_found("user", id))?;
        Ok(row.into())
    }

    async fn delete(&self, id: DbId) -> StoreResult<()> {
        sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn leaderboard(&self, limit: i64) -> StoreResult<Vec<UserAccount>> {
        let query = format!(
            "SELECT {COLUMNS} FROM users ORDER BY xp DESC, created_at ASC LIMIT $1"
        );
        let rows = sqlx::query_as::<_, UserRow>(&query)
            .bind(limit.max(0))
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn sync_progress(&self, id: DbId, profile: &UserProfile) -> StoreResult<()> {
        // Best effort: unknown users (anonymous practice) are skipped.
        sqlx::query("UPDATE users SET xp = $2, level = $3, streak = $4 WHERE id = $1")
            .bind(id)
            .bind(profile.xp)
            .bind(profile.level.label())
            .bind(profile.streak)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}
