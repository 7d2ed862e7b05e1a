//! User account model and DTOs.

use homecarpent_core::types::{DbId, Timestamp};
use sqlx::FromRow;

/// Full row from the `users` table.
///
/// Contains the password hash -- never serialize this to API responses.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: DbId,
    /// Stored trimmed and lowercased.
    pub email: String,
    pub password_hash: String,
    /// One of `customer`, `designer`, `carpenter`.
    pub user_type: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new user.
#[derive(Debug)]
pub struct CreateUser {
    pub email: String,
    pub password_hash: String,
    pub user_type: String,
}
