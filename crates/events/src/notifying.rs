//! Repository decorator that announces every successful write on the bus.

use std::sync::Arc;

use async_trait::async_trait;
use homecarpent_core::error::CoreError;
use homecarpent_core::ports::ProfileRepository;
use homecarpent_core::profile::{NewProfile, Profile, ProfilePatch};
use homecarpent_core::types::DbId;

use crate::bus::{EventBus, ProfileEvent};

/// Wraps a [`ProfileRepository`] and publishes a [`ProfileEvent`] after each
/// successful `create` / `update`. Failed writes publish nothing.
pub struct NotifyingProfileRepository {
    inner: Arc<dyn ProfileRepository>,
    bus: Arc<EventBus>,
}

impl NotifyingProfileRepository {
    pub fn new(inner: Arc<dyn ProfileRepository>, bus: Arc<EventBus>) -> Self {
        Self { inner, bus }
    }
}

#[async_trait]
impl ProfileRepository for NotifyingProfileRepository {
    async fn list_all(&self) -> Result<Vec<Profile>, CoreError> {
        self.inner.list_all().await
    }

    async fn create(&self, input: &NewProfile) -> Result<Profile, CoreError> {
        let profile = self.inner.create(input).await?;
        self.bus.publish(ProfileEvent::created(profile.id));
        Ok(profile)
    }

    async fn find_by_id(&self, id: DbId) -> Result<Option<Profile>, CoreError> {
        self.inner.find_by_id(id).await
    }

    async fn update(&self, id: DbId, patch: &ProfilePatch) -> Result<Profile, CoreError> {
        let profile = self.inner.update(id, patch).await?;
        self.bus.publish(ProfileEvent::updated(profile.id));
        Ok(profile)
    }
}
