//! In-process implementations of the collaborator traits.
//!
//! Used by the test suites and by `BACKEND=memory` demo runs. Nothing here is
//! durable: state lives as long as the value does.

use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, Ordering};

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::error::CoreError;
use crate::password::{hash_password, verify_password};
use crate::ports::{AuthSession, BlobStore, Identity, IdentityGateway, ProfileRepository};
use crate::profile::{NewProfile, Profile, ProfilePatch};
use crate::types::DbId;
use crate::user_type::UserType;

/// Lifetime reported for in-memory session tokens. They never actually
/// expire before sign-out or restart.
const MEMORY_TOKEN_EXPIRY_SECS: i64 = 24 * 60 * 60;

// ---------------------------------------------------------------------------
// Blob store
// ---------------------------------------------------------------------------

struct StoredBlob {
    content_type: Option<String>,
    bytes: Vec<u8>,
}

/// Blob store keeping payloads in a map. URLs are `memory://<name>`.
#[derive(Default)]
pub struct InMemoryBlobStore {
    blobs: RwLock<HashMap<String, StoredBlob>>,
    /// File names whose upload should fail, matched against the end of the
    /// blob name.
    failing: RwLock<Vec<String>>,
}

impl InMemoryBlobStore {
    /// Make every later upload whose blob name ends with `file_name` fail.
    pub async fn fail_uploads_named(&self, file_name: impl Into<String>) {
        self.failing.write().await.push(file_name.into());
    }

    pub async fn len(&self) -> usize {
        self.blobs.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.blobs.read().await.is_empty()
    }

    pub async fn get(&self, name: &str) -> Option<Vec<u8>> {
        self.blobs.read().await.get(name).map(|b| b.bytes.clone())
    }

    pub async fn content_type(&self, name: &str) -> Option<String> {
        self.blobs
            .read()
            .await
            .get(name)
            .and_then(|b| b.content_type.clone())
    }
}

#[async_trait]
impl BlobStore for InMemoryBlobStore {
    fn backend_tag(&self) -> &'static str {
        "memory"
    }

    async fn store(
        &self,
        name: &str,
        content_type: Option<&str>,
        bytes: Vec<u8>,
    ) -> Result<String, CoreError> {
        if self
            .failing
            .read()
            .await
            .iter()
            .any(|suffix| name.ends_with(suffix.as_str()))
        {
            return Err(CoreError::upload_failed(name, "injected failure"));
        }
        self.blobs.write().await.insert(
            name.to_string(),
            StoredBlob {
                content_type: content_type.map(str::to_string),
                bytes,
            },
        );
        Ok(format!("memory://{name}"))
    }
}

// ---------------------------------------------------------------------------
// Profile repository
// ---------------------------------------------------------------------------

/// Profile repository over a `Vec`, preserving insertion order.
pub struct InMemoryProfileRepository {
    rows: RwLock<Vec<Profile>>,
    next_id: AtomicI64,
}

impl Default for InMemoryProfileRepository {
    fn default() -> Self {
        Self {
            rows: RwLock::new(Vec::new()),
            next_id: AtomicI64::new(1),
        }
    }
}

#[async_trait]
impl ProfileRepository for InMemoryProfileRepository {
    async fn list_all(&self) -> Result<Vec<Profile>, CoreError> {
        Ok(self.rows.read().await.clone())
    }

    async fn create(&self, input: &NewProfile) -> Result<Profile, CoreError> {
        let now = chrono::Utc::now();
        let profile = Profile {
            id: self.next_id.fetch_add(1, Ordering::Relaxed),
            owner_id: input.owner_id,
            name: input.name.clone(),
            location: input.location.clone(),
            description: input.description.clone(),
            timeline: input.timeline.clone(),
            catalog: input.catalog.clone(),
            user_type: input.user_type,
            photo_urls: input.photo_urls.clone(),
            video_url: input.video_url.clone(),
            profile_pic_url: input.profile_pic_url.clone(),
            rating: 0.0,
            reviews: Vec::new(),
            created_at: now,
            updated_at: now,
        };
        self.rows.write().await.push(profile.clone());
        Ok(profile)
    }

    async fn find_by_id(&self, id: DbId) -> Result<Option<Profile>, CoreError> {
        Ok(self.rows.read().await.iter().find(|p| p.id == id).cloned())
    }

    async fn update(&self, id: DbId, patch: &ProfilePatch) -> Result<Profile, CoreError> {
        let mut rows = self.rows.write().await;
        let row = rows
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or(CoreError::NotFound {
                entity: "Profile",
                id,
            })?;
        patch.apply_to(row);
        row.updated_at = chrono::Utc::now();
        Ok(row.clone())
    }
}

// ---------------------------------------------------------------------------
// Identity gateway
// ---------------------------------------------------------------------------

struct Account {
    identity: Identity,
    /// Argon2id PHC string.
    password_hash: String,
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Identity gateway with accounts and opaque bearer tokens held in memory.
///
/// Passwords are hashed with Argon2id, the same as the PostgreSQL gateway.
pub struct InMemoryIdentityGateway {
    accounts: RwLock<HashMap<String, Account>>,
    tokens: RwLock<HashMap<String, DbId>>,
    next_id: AtomicI64,
}

impl Default for InMemoryIdentityGateway {
    fn default() -> Self {
        Self {
            accounts: RwLock::new(HashMap::new()),
            tokens: RwLock::new(HashMap::new()),
            next_id: AtomicI64::new(1),
        }
    }
}

impl InMemoryIdentityGateway {
    async fn issue(&self, identity: Identity) -> AuthSession {
        let token = uuid::Uuid::new_v4().to_string();
        self.tokens
            .write()
            .await
            .insert(token.clone(), identity.user_id);
        AuthSession {
            identity,
            access_token: token,
            refresh_token: None,
            expires_in: MEMORY_TOKEN_EXPIRY_SECS,
        }
    }
}

#[async_trait]
impl IdentityGateway for InMemoryIdentityGateway {
    async fn authenticate(&self, email: &str, password: &str) -> Result<AuthSession, CoreError> {
        let (identity, password_hash) = self
            .accounts
            .read()
            .await
            .get(&normalize_email(email))
            .map(|a| (a.identity.clone(), a.password_hash.clone()))
            .ok_or_else(|| CoreError::Unauthorized("Invalid email or password".into()))?;

        let password_valid = verify_password(password, &password_hash)
            .map_err(|e| CoreError::Internal(format!("Password verification error: {e}")))?;
        if !password_valid {
            return Err(CoreError::Unauthorized("Invalid email or password".into()));
        }
        Ok(self.issue(identity).await)
    }

    async fn register(
        &self,
        email: &str,
        password: &str,
        user_type: UserType,
    ) -> Result<AuthSession, CoreError> {
        let email = normalize_email(email);
        let password_hash = hash_password(password)
            .map_err(|e| CoreError::Internal(format!("Password hashing error: {e}")))?;
        let identity = {
            let mut accounts = self.accounts.write().await;
            if accounts.contains_key(&email) {
                return Err(CoreError::Conflict(format!(
                    "An account for '{email}' already exists"
                )));
            }
            let identity = Identity {
                user_id: self.next_id.fetch_add(1, Ordering::Relaxed),
                email: email.clone(),
                user_type,
            };
            accounts.insert(
                email,
                Account {
                    identity: identity.clone(),
                    password_hash,
                },
            );
            identity
        };
        Ok(self.issue(identity).await)
    }

    async fn current_identity(&self, token: &str) -> Result<Option<Identity>, CoreError> {
        let Some(user_id) = self.tokens.read().await.get(token).copied() else {
            return Ok(None);
        };
        Ok(self
            .accounts
            .read()
            .await
            .values()
            .find(|a| a.identity.user_id == user_id)
            .map(|a| a.identity.clone()))
    }

    async fn sign_out(&self, identity: &Identity) -> Result<(), CoreError> {
        self.tokens
            .write()
            .await
            .retain(|_, user_id| *user_id != identity.user_id);
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
