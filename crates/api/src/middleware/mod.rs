//! Request extractors.
//!
//! - [`auth::AuthUser`] -- the account behind a bearer token.

pub mod auth;
