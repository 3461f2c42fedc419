use std::sync::Arc;

use super::{StoreResult, require_text};
use crate::models::UserProfile;
use crate::storage::{self, KeyValueStore, keys};

/// The single `user_profile` object. Absent until first saved.
pub struct ProfileStore {
    kv: Arc<dyn KeyValueStore>,
    profile: Option<UserProfile>,
}

impl ProfileStore {
    pub fn load(kv: Arc<dyn KeyValueStore>) -> Self {
        let profile = storage::load_object(kv.as_ref(), keys::USER_PROFILE);
        Self { kv, profile }
    }

    pub fn get(&self) -> Option<&UserProfile> {
        self.profile.as_ref()
    }

    /// The saved profile, or the defaults shown before anything is saved.
    pub fn current(&self) -> UserProfile {
        self.profile.clone().unwrap_or_default()
    }

    pub fn save(&mut self, profile: UserProfile) -> StoreResult<()> {
        require_text("name", &profile.name)?;
        require_text("email", &profile.email)?;

        storage::save_object(self.kv.as_ref(), keys::USER_PROFILE, &profile)?;
        self.profile = Some(profile);
        Ok(())
    }
}
