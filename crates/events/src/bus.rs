//! In-process event bus backed by a `tokio::sync::broadcast` channel.
//!
//! [`EventBus`] is the publish/subscribe hub for [`ProfileEvent`]s. It is
//! shared via `Arc<EventBus>` between the repository wrapper that publishes
//! and the catalog snapshot that listens.

use chrono::{DateTime, Utc};
use homecarpent_core::types::DbId;
use serde::Serialize;
use tokio::sync::broadcast;

// ---------------------------------------------------------------------------
// ProfileEvent
// ---------------------------------------------------------------------------

/// What happened to a profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ProfileEventKind {
    Created,
    Updated,
}

impl ProfileEventKind {
    /// Dot-separated event name, e.g. `"profile.created"`.
    pub fn event_type(self) -> &'static str {
        match self {
            Self::Created => "profile.created",
            Self::Updated => "profile.updated",
        }
    }
}

/// A change to the profile collection.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProfileEvent {
    pub kind: ProfileEventKind,
    pub profile_id: DbId,
    /// When the event was created (UTC).
    pub timestamp: DateTime<Utc>,
}

impl ProfileEvent {
    pub fn new(kind: ProfileEventKind, profile_id: DbId) -> Self {
        Self {
            kind,
            profile_id,
            timestamp: Utc::now(),
        }
    }

    pub fn created(profile_id: DbId) -> Self {
        Self::new(ProfileEventKind::Created, profile_id)
    }

    pub fn updated(profile_id: DbId) -> Self {
        Self::new(ProfileEventKind::Updated, profile_id)
    }
}

// ---------------------------------------------------------------------------
// EventBus
// ---------------------------------------------------------------------------

/// Default buffer capacity for the broadcast channel.
const DEFAULT_CAPACITY: usize = 1024;

/// In-process fan-out event bus.
///
/// # Usage
///
/// ```rust
/// use homecarpent_events::bus::{EventBus, ProfileEvent};
///
/// let bus = EventBus::default();
/// let mut rx = bus.subscribe();
///
/// bus.publish(ProfileEvent::created(1));
/// ```
pub struct EventBus {
    sender: broadcast::Sender<ProfileEvent>,
}

impl EventBus {
    /// Create a bus with a specific channel capacity.
    ///
    /// When the buffer is full, the oldest un-consumed messages are dropped
    /// and slow receivers will observe a `Lagged` error.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publish an event to all current subscribers.
    ///
    /// If there are no active subscribers the event is silently dropped.
    pub fn publish(&self, event: ProfileEvent) {
        tracing::debug!(
            event_type = event.kind.event_type(),
            profile_id = event.profile_id,
            "Publishing profile event"
        );
        // Ignore the SendError; it only means there are zero receivers.
        let _ = self.sender.send(event);
    }

    /// Subscribe to all events published on this bus from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<ProfileEvent> {
        self.sender.subscribe()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
