//! PostgreSQL-backed [`IdentityGateway`]: Argon2id passwords in `users`,
//! one `user_sessions` row per login, HS256 access tokens bound to that row.

use async_trait::async_trait;
use chrono::Utc;
use homecarpent_core::error::CoreError;
use homecarpent_core::password::{hash_password, verify_password};
use homecarpent_core::ports::{AuthSession, Identity, IdentityGateway};
use homecarpent_core::user_type::UserType;
use homecarpent_db::models::session::CreateSession;
use homecarpent_db::models::user::{CreateUser, User};
use homecarpent_db::repositories::{SessionRepo, UserRepo};
use homecarpent_db::DbPool;

use super::jwt::{
    generate_access_token, generate_refresh_token, hash_refresh_token, validate_token, JwtConfig,
};

/// Message for every credential rejection, so callers cannot probe which
/// emails exist.
const INVALID_CREDENTIALS: &str = "Invalid email or password";

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

fn database(err: sqlx::Error) -> CoreError {
    tracing::error!(error = %err, "Identity query failed");
    CoreError::Internal("Database error".into())
}

fn identity_of(user: &User) -> Result<Identity, CoreError> {
    Ok(Identity {
        user_id: user.id,
        email: user.email.clone(),
        user_type: UserType::from_name(&user.user_type)
            .map_err(|_| CoreError::Internal(format!("User {} has unknown user_type", user.id)))?,
    })
}

fn is_duplicate_email(err: &sqlx::Error) -> bool {
    err.as_database_error()
        .and_then(|e| e.constraint())
        .is_some_and(|c| c == "uq_users_email")
}

#[derive(Clone)]
pub struct PgIdentityGateway {
    pool: DbPool,
    jwt: JwtConfig,
}

impl PgIdentityGateway {
    pub fn new(pool: DbPool, jwt: JwtConfig) -> Self {
        Self { pool, jwt }
    }

    /// Persist a session row and mint the token pair for it.
    async fn start_session(&self, identity: Identity) -> Result<AuthSession, CoreError> {
        let (refresh_plaintext, refresh_hash) = generate_refresh_token();
        let expires_at = Utc::now() + chrono::Duration::days(self.jwt.refresh_token_expiry_days);

        let session = SessionRepo::create(
            &self.pool,
            &CreateSession {
                user_id: identity.user_id,
                refresh_token_hash: refresh_hash,
                expires_at,
            },
        )
        .await
        .map_err(database)?;

        let access_token = generate_access_token(
            identity.user_id,
            identity.user_type.name(),
            session.id,
            &self.jwt,
        )
        .map_err(|e| CoreError::Internal(format!("Token generation error: {e}")))?;

        tracing::info!(user_id = identity.user_id, session_id = session.id, "Session started");

        Ok(AuthSession {
            identity,
            access_token,
            refresh_token: Some(refresh_plaintext),
            expires_in: self.jwt.access_token_expiry_secs(),
        })
    }
}

#[async_trait]
impl IdentityGateway for PgIdentityGateway {
    async fn authenticate(&self, email: &str, password: &str) -> Result<AuthSession, CoreError> {
        let user = UserRepo::find_by_email(&self.pool, &normalize_email(email))
            .await
            .map_err(database)?
            .ok_or_else(|| CoreError::Unauthorized(INVALID_CREDENTIALS.into()))?;

        let password_valid = verify_password(password, &user.password_hash)
            .map_err(|e| CoreError::Internal(format!("Password verification error: {e}")))?;
        if !password_valid {
            tracing::info!(user_id = user.id, "Rejected login with wrong password");
            return Err(CoreError::Unauthorized(INVALID_CREDENTIALS.into()));
        }

        self.start_session(identity_of(&user)?).await
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

        let input = CreateUser {
            email: email.clone(),
            password_hash,
            user_type: user_type.name().to_string(),
        };
        let user = match UserRepo::create(&self.pool, &input).await {
            Ok(user) => user,
            Err(e) if is_duplicate_email(&e) => {
                return Err(CoreError::Conflict(format!(
                    "An account for '{email}' already exists"
                )));
            }
            Err(e) => return Err(database(e)),
        };

        tracing::info!(user_id = user.id, user_type = %user_type, "Account registered");
        self.start_session(identity_of(&user)?).await
    }

    async fn current_identity(&self, token: &str) -> Result<Option<Identity>, CoreError> {
        let Ok(claims) = validate_token(token, &self.jwt) else {
            return Ok(None);
        };
        if SessionRepo::find_active(&self.pool, claims.sid)
            .await
            .map_err(database)?
            .is_none()
        {
            return Ok(None);
        }
        UserRepo::find_by_id(&self.pool, claims.sub)
            .await
            .map_err(database)?
            .as_ref()
            .map(identity_of)
            .transpose()
    }

    async fn sign_out(&self, identity: &Identity) -> Result<(), CoreError> {
        let revoked = SessionRepo::revoke_all_for_user(&self.pool, identity.user_id)
            .await
            .map_err(database)?;
        tracing::info!(user_id = identity.user_id, revoked, "Signed out");
        Ok(())
    }

    async fn refresh(&self, refresh_token: &str) -> Result<AuthSession, CoreError> {
        let invalid = || CoreError::Unauthorized("Invalid or expired refresh token".into());

        let session =
            SessionRepo::find_by_refresh_token_hash(&self.pool, &hash_refresh_token(refresh_token))
                .await
                .map_err(database)?
                .ok_or_else(invalid)?;

        // Rotation: the old refresh token is single-use.
        SessionRepo::revoke(&self.pool, session.id)
            .await
            .map_err(database)?;

        let user = UserRepo::find_by_id(&self.pool, session.user_id)
            .await
            .map_err(database)?
            .ok_or_else(invalid)?;

        self.start_session(identity_of(&user)?).await
    }
}
