//! HomeCarpent domain core.
//!
//! Pure catalog logic plus the collaborator traits the rest of the workspace
//! implements:
//!
//! - [`catalog`] -- role filter, search and timeline sort over a profile
//!   snapshot.
//! - [`profile`] -- profile records and rating aggregation.
//! - [`assembly`] -- upload-then-persist profile creation.
//! - [`media`] -- upload payloads and blob naming.
//! - [`ports`] -- identity, blob and profile repository traits.
//! - [`session`] -- the view an authenticated account lands on.
//! - [`memory`] -- in-process implementations of those traits.
//! - [`password`] -- Argon2id hashing for stored credentials.

pub mod assembly;
pub mod catalog;
pub mod error;
pub mod media;
pub mod memory;
pub mod password;
pub mod ports;
pub mod profile;
pub mod session;
pub mod types;
pub mod user_type;
