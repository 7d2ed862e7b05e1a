//! Cached catalog snapshot, refreshed only when the bus reports a change.
//!
//! [`CatalogSnapshot::current`] hands out the same `Arc<Vec<Profile>>` to
//! every reader until a [`ProfileEvent`] arrives (or the optional maximum age
//! passes, which covers writers that bypass the bus). Pending notifications
//! are drained on each read, so a write published before a read is always
//! visible to that read.

use std::sync::Arc;
use std::time::{Duration, Instant};

use homecarpent_core::error::CoreError;
use homecarpent_core::ports::ProfileRepository;
use homecarpent_core::profile::Profile;
use tokio::sync::broadcast::error::TryRecvError;
use tokio::sync::{broadcast, Mutex};

use crate::bus::{EventBus, ProfileEvent};

struct SnapshotState {
    receiver: broadcast::Receiver<ProfileEvent>,
    profiles: Option<Arc<Vec<Profile>>>,
    loaded_at: Option<Instant>,
}

impl SnapshotState {
    /// Consume queued notifications. Returns `true` if any change was seen.
    fn drain_notifications(&mut self) -> bool {
        let mut changed = false;
        loop {
            match self.receiver.try_recv() {
                Ok(_) => changed = true,
                Err(TryRecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "Catalog snapshot lagged behind the event bus");
                    changed = true;
                }
                Err(TryRecvError::Empty) | Err(TryRecvError::Closed) => break,
            }
        }
        changed
    }

    fn is_expired(&self, max_age: Option<Duration>) -> bool {
        match (max_age, self.loaded_at) {
            (Some(max_age), Some(loaded_at)) => loaded_at.elapsed() >= max_age,
            _ => false,
        }
    }
}

/// Shared, lazily refreshed copy of the full profile listing.
pub struct CatalogSnapshot {
    repo: Arc<dyn ProfileRepository>,
    max_age: Option<Duration>,
    state: Mutex<SnapshotState>,
}

impl CatalogSnapshot {
    /// Subscribe to `bus` and serve listings from `repo`.
    pub fn new(repo: Arc<dyn ProfileRepository>, bus: &EventBus) -> Self {
        Self {
            repo,
            max_age: None,
            state: Mutex::new(SnapshotState {
                receiver: bus.subscribe(),
                profiles: None,
                loaded_at: None,
            }),
        }
    }

    /// Also refresh once the cached listing is older than `max_age`.
    pub fn with_max_age(mut self, max_age: Duration) -> Self {
        self.max_age = Some(max_age);
        self
    }

    /// Current listing, re-read from the repository only if something
    /// changed since the last load.
    ///
    /// Concurrent callers wait for a single in-flight refresh rather than
    /// each scanning the repository.
    pub async fn current(&self) -> Result<Arc<Vec<Profile>>, CoreError> {
        let mut state = self.state.lock().await;

        if state.drain_notifications() || state.is_expired(self.max_age) {
            state.profiles = None;
        }
        if let Some(profiles) = &state.profiles {
            return Ok(Arc::clone(profiles));
        }

        let fresh = Arc::new(self.repo.list_all().await?);
        tracing::debug!(count = fresh.len(), "Catalog snapshot refreshed");
        state.profiles = Some(Arc::clone(&fresh));
        state.loaded_at = Some(Instant::now());
        Ok(fresh)
    }

    /// Drop the cached listing so the next read goes to the repository.
    pub async fn invalidate(&self) {
        let mut state = self.state.lock().await;
        state.profiles = None;
    }
}
