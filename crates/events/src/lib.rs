//! HomeCarpent profile change notifications.
//!
//! - [`EventBus`] -- in-process publish/subscribe hub backed by
//!   `tokio::sync::broadcast`.
//! - [`ProfileEvent`] -- a created / updated profile.
//! - [`NotifyingProfileRepository`] -- repository decorator that publishes
//!   after each successful write.
//! - [`CatalogSnapshot`] -- cached full listing, refreshed only on
//!   notification.

pub mod bus;
pub mod notifying;
pub mod snapshot;

pub use bus::{EventBus, ProfileEvent, ProfileEventKind};
pub use notifying::NotifyingProfileRepository;
pub use snapshot::CatalogSnapshot;
