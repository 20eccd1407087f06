//! Repository traits and the hybrid storage facade.
//!
//! Each entity gets one trait with a remote (PostgreSQL) and a local (JSON
//! key-value) implementation. [`Storage::connect`] picks the implementations
//! once, at construction time; nothing downstream branches on the backend
//! again.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use async_trait::async_trait;
use defter_core::engine::WordAttempt;
use defter_core::profile::UserProfile;
use defter_core::types::{DbId, Timestamp, WordKey};

use crate::backend::{BackendMode, StorageConfig};
use crate::error::{StoreError, StoreResult};
use crate::kv::{JsonFileStore, KeyValueStore};
use crate::models::{
    ArchivalDocument, DocumentFilter, DocumentPatch, ErrorReport, NewDocument, NewReport, NewUser,
    ReportStatus, UserAccount, UserPatch, WordNote,
};
use crate::{local, remote, DbPool};

// ---------------------------------------------------------------------------
// Entity traits
// ---------------------------------------------------------------------------

#[async_trait]
pub trait DocumentRepository: Send + Sync {
    /// List documents matching the equality filters, newest first.
    async fn list(&self, filter: &DocumentFilter) -> StoreResult<Vec<ArchivalDocument>>;
    /// `Ok(None)` for an unknown id; never an error.
    async fn get(&self, id: DbId) -> StoreResult<Option<ArchivalDocument>>;
    /// The backend assigns the id.
    async fn create(&self, input: NewDocument) -> StoreResult<ArchivalDocument>;
    /// Partial update; absent fields are left untouched. Unknown id is
    /// [`StoreError::NotFound`].
    async fn update(&self, id: DbId, patch: DocumentPatch) -> StoreResult<ArchivalDocument>;
    /// Idempotent: deleting an unknown id succeeds.
    async fn delete(&self, id: DbId) -> StoreResult<()>;
}

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn list(&self) -> StoreResult<Vec<UserAccount>>;
    async fn get(&self, id: DbId) -> StoreResult<Option<UserAccount>>;
    async fn create(&self, input: NewUser) -> StoreResult<UserAccount>;
    async fn update(&self, id: DbId, patch: UserPatch) -> StoreResult<UserAccount>;
    async fn delete(&self, id: DbId) -> StoreResult<()>;
    /// Top accounts by XP, descending.
    async fn leaderboard(&self, limit: i64) -> StoreResult<Vec<UserAccount>>;
    /// Sync the denormalized gamification aggregates after practice.
    async fn sync_progress(&self, id: DbId, profile: &UserProfile) -> StoreResult<()>;
}

#[async_trait]
pub trait ReportRepository: Send + Sync {
    async fn list(&self, status: Option<ReportStatus>) -> StoreResult<Vec<ErrorReport>>;
    async fn get(&self, id: DbId) -> StoreResult<Option<ErrorReport>>;
    async fn create(&self, input: NewReport) -> StoreResult<ErrorReport>;
    /// Apply a status transition (validated against the monotonic state
    /// machine) and stamp `resolved_at` on terminal states.
    async fn set_status(&self, id: DbId, status: ReportStatus, at: Timestamp)
        -> StoreResult<ErrorReport>;
    async fn delete(&self, id: DbId) -> StoreResult<()>;
}

/// Per-user learning state. Every method takes the owning `user_id`
/// explicitly; there is no ambient current-user state, and two users' data
/// never mix.
#[async_trait]
pub trait ProgressRepository: Send + Sync {
    /// Full attempt log, chronological.
    async fn attempts(&self, user_id: DbId) -> StoreResult<Vec<WordAttempt>>;
    /// Append one attempt and persist the updated profile, in that order.
    async fn push_attempt(
        &self,
        user_id: DbId,
        attempt: &WordAttempt,
        profile: &UserProfile,
    ) -> StoreResult<()>;
    async fn profile(&self, user_id: DbId) -> StoreResult<Option<UserProfile>>;
    async fn save_profile(&self, user_id: DbId, profile: &UserProfile) -> StoreResult<()>;
    async fn notes(&self, user_id: DbId) -> StoreResult<Vec<WordNote>>;
    /// Upsert: a second note for the same word replaces the first.
    async fn put_note(&self, user_id: DbId, key: WordKey, text: &str, at: Timestamp)
        -> StoreResult<WordNote>;
    async fn favorites(&self, user_id: DbId) -> StoreResult<BTreeSet<String>>;
    /// Toggle membership; returns whether the word is a favorite afterwards.
    async fn toggle_favorite(&self, user_id: DbId, key: WordKey) -> StoreResult<bool>;
    /// Unlocked badge ids with their unlock timestamps.
    async fn unlocked_badges(&self, user_id: DbId) -> StoreResult<BTreeMap<String, Timestamp>>;
    /// Insert-if-absent for each id; existing unlocks keep their original
    /// timestamp (unlocking is one-way).
    async fn unlock_badges(&self, user_id: DbId, ids: &[&str], at: Timestamp) -> StoreResult<()>;
    /// Drop all state owned by the user.
    async fn clear(&self, user_id: DbId) -> StoreResult<()>;
}

// ---------------------------------------------------------------------------
// Facade
// ---------------------------------------------------------------------------

/// All repositories for the active backend, constructed once at startup.
#[derive(Clone)]
pub struct Storage {
    pub mode: BackendMode,
    pub documents: Arc<dyn DocumentRepository>,
    pub users: Arc<dyn UserRepository>,
    pub reports: Arc<dyn ReportRepository>,
    pub progress: Arc<dyn ProgressRepository>,
    pool: Option<DbPool>,
}

impl Storage {
    /// Connect according to the resolved configuration.
    pub async fn connect(config: &StorageConfig) -> StoreResult<Self> {
        match config.mode {
            BackendMode::Remote => {
                let url = config.database_url.as_deref().ok_or_else(|| {
                    StoreError::Validation(
                        "Remote backend selected but DATABASE_URL is not set".into(),
                    )
                })?;
                let pool = crate::create_pool(url).await?;
                tracing::info!("Connected to remote backend");
                Ok(Self::remote(pool))
            }
            BackendMode::Local => {
                let store = JsonFileStore::open(&config.local_store_path)?;
                tracing::info!(path = %config.local_store_path.display(), "Using local backend");
                Ok(Self::local(Arc::new(store)))
            }
        }
    }

    /// Build remote-backed repositories over an existing pool.
    pub fn remote(pool: DbPool) -> Self {
        Self {
            mode: BackendMode::Remote,
            documents: Arc::new(remote::RemoteDocumentRepo::new(pool.clone())),
            users: Arc::new(remote::RemoteUserRepo::new(pool.clone())),
            reports: Arc::new(remote::RemoteReportRepo::new(pool.clone())),
            progress: Arc::new(remote::RemoteProgressRepo::new(pool.clone())),
            pool: Some(pool),
        }
    }

    /// Build local repositories over any key-value store.
    pub fn local(store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            mode: BackendMode::Local,
            documents: Arc::new(local::LocalDocumentRepo::new(store.clone())),
            users: Arc::new(local::LocalUserRepo::new(store.clone())),
            reports: Arc::new(local::LocalReportRepo::new(store.clone())),
            progress: Arc::new(local::LocalProgressRepo::new(store)),
            pool: None,
        }
    }

    /// Whether the active backend is reachable. The local store has no
    /// liveness to probe, so local mode is always healthy.
    pub async fn health(&self) -> bool {
        match &self.pool {
            Some(pool) => crate::health_check(pool).await.is_ok(),
            None => true,
        }
    }
}
