//! Collaborator traits: identity, blob storage, profile persistence.
//!
//! Components receive these as `Arc<dyn _>` at construction time. Concrete
//! implementations live in `homecarpent-db` (PostgreSQL), `homecarpent-cloud`
//! (filesystem / S3), the API crate (password + JWT identity) and
//! [`crate::memory`] (in-process, for tests and demos).

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::profile::{NewProfile, Profile, ProfilePatch};
use crate::types::DbId;
use crate::user_type::UserType;

/// The authenticated account behind a request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub user_id: DbId,
    pub email: String,
    pub user_type: UserType,
}

/// Tokens handed out by a successful login or signup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthSession {
    pub identity: Identity,
    /// Bearer token for subsequent requests.
    pub access_token: String,
    /// Long-lived token, when the gateway supports refresh.
    pub refresh_token: Option<String>,
    /// Access token lifetime in seconds.
    pub expires_in: i64,
}

/// Authenticates accounts and resolves bearer tokens.
///
/// Credential rejections are reported as [`CoreError::Unauthorized`].
#[async_trait]
pub trait IdentityGateway: Send + Sync {
    /// Log in with an email/password pair.
    async fn authenticate(&self, email: &str, password: &str) -> Result<AuthSession, CoreError>;

    /// Create an account and log it in. Duplicate emails are a
    /// [`CoreError::Conflict`].
    async fn register(
        &self,
        email: &str,
        password: &str,
        user_type: UserType,
    ) -> Result<AuthSession, CoreError>;

    /// Resolve a bearer token. `Ok(None)` for unknown, expired or revoked
    /// tokens.
    async fn current_identity(&self, token: &str) -> Result<Option<Identity>, CoreError>;

    /// End every session of `identity`.
    async fn sign_out(&self, identity: &Identity) -> Result<(), CoreError>;

    /// Exchange a refresh token for a new session. Gateways that do not
    /// issue refresh tokens reject every request.
    async fn refresh(&self, _refresh_token: &str) -> Result<AuthSession, CoreError> {
        Err(CoreError::Unauthorized(
            "Token refresh is not supported".into(),
        ))
    }
}

/// Durable object storage returning retrieval URLs.
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Short backend name for logs (`"local"`, `"s3"`, `"memory"`).
    fn backend_tag(&self) -> &'static str;

    /// Store `bytes` under `name` and return the URL it can be fetched from.
    /// Any failure is a [`CoreError::UploadFailed`].
    async fn store(
        &self,
        name: &str,
        content_type: Option<&str>,
        bytes: Vec<u8>,
    ) -> Result<String, CoreError>;
}

/// Durable profile storage. Listing is a full scan in insertion order.
#[async_trait]
pub trait ProfileRepository: Send + Sync {
    async fn list_all(&self) -> Result<Vec<Profile>, CoreError>;

    /// Insert a profile; the repository assigns `id` and timestamps.
    async fn create(&self, input: &NewProfile) -> Result<Profile, CoreError>;

    async fn find_by_id(&self, id: DbId) -> Result<Option<Profile>, CoreError>;

    /// Apply `patch` and return the updated row, or
    /// [`CoreError::NotFound`] when `id` does not exist.
    async fn update(&self, id: DbId, patch: &ProfilePatch) -> Result<Profile, CoreError>;
}
