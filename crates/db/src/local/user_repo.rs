//! Local user repository.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use defter_core::profile::UserProfile;
use defter_core::types::DbId;
use uuid::Uuid;

use crate::error::{StoreError, StoreResult};
use crate::kv::{KeyValueStore, KeyValueStoreExt};
use crate::models::{NewUser, UserAccount, UserPatch};
use crate::repositories::UserRepository;

use super::records::StoredUser;
use super::USERS_KEY;

pub struct LocalUserRepo {
    store: Arc<dyn KeyValueStore>,
}

impl LocalUserRepo {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    fn load(&self) -> Vec<UserAccount> {
        self.store
            .get_or::<Vec<StoredUser>>(USERS_KEY, Vec::new())
            .into_iter()
            .map(Into::into)
            .collect()
    }

    fn save(&self, users: &[UserAccount]) -> StoreResult<()> {
        let records: Vec<StoredUser> = users.iter().map(Into::into).collect();
        self.store.set(USERS_KEY, &records)
    }
}

#[async_trait]
impl UserRepository for LocalUserRepo {
    async fn list(&self) -> StoreResult<Vec<UserAccount>> {
        let mut users = self.load();
        users.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(users)
    }

    async fn get(&self, id: DbId) -> StoreResult<Option<UserAccount>> {
        Ok(self.load().into_iter().find(|u| u.id == id))
    }

    async fn create(&self, input: NewUser) -> StoreResult<UserAccount> {
        let mut users = self.load();
        if users.iter().any(|u| u.username == input.username) {
            return Err(StoreError::Validation(format!(
                "Username '{}' is already taken",
                input.username
            )));
        }
        let user = UserAccount {
            id: Uuid::now_v7(),
            username: input.username,
            display_name: input.display_name,
            role: input.role,
            xp: 0,
            level: Default::default(),
            streak: 0,
            created_at: Utc::now(),
        };
        users.push(user.clone());
        self.save(&users)?;
        Ok(user)
    }

    async fn update(&self, id: DbId, patch: UserPatch) -> StoreResult<UserAccount> {
        let mut users = self.load();
        let user = users
            .iter_mut()
            .find(|u| u.id == id)
            .ok_or_else(|| StoreError::not_found("user", id))?;

        if let Some(display_name) = patch.display_name {
            user.display_name = display_name;
        }
        if let Some(role) = patch.role {
            user.role = role;
        }
        let updated = user.clone();
        self.save(&users)?;
        Ok(updated)
    }

    async fn delete(&self, id: DbId) -> StoreResult<()> {
        let mut users = self.load();
        let before = users.len();
        users.retain(|u| u.id != id);
        if users.len() != before {
            self.save(&users)?;
        }
        Ok(())
    }

    async fn leaderboard(&self, limit: i64) -> StoreResult<Vec<UserAccount>> {
        let mut users = self.load();
        users.sort_by(|a, b| b.xp.cmp(&a.xp).then_with(|| a.created_at.cmp(&b.created_at)));
        users.truncate(limit.max(0) as usize);
        Ok(users)
    }

    async fn sync_progress(&self, id: DbId, profile: &UserProfile) -> StoreResult<()> {
        let mut users = self.load();
        // Best effort: an unknown user (e.g. anonymous practice) is not an
        // error for aggregate sync.
        if let Some(user) = users.iter_mut().find(|u| u.id == id) {
            user.xp = profile.xp;
            user.level = profile.level;
            user.streak = profile.streak;
            self.save(&users)?;
        }
        Ok(())
    }
}
