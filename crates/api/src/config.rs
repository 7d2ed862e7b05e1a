use std::path::PathBuf;

use homecarpent_core::media::DEFAULT_MAX_UPLOAD_BYTES;

use crate::auth::jwt::JwtConfig;

/// Where profiles and accounts are persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backend {
    /// PostgreSQL through `homecarpent-db`.
    Postgres,
    /// Process-local maps. Nothing survives a restart.
    Memory,
}

/// Where uploaded media is written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlobConfig {
    /// Files under `dir`, served back by this server at `/files`.
    Local { dir: PathBuf, public_base_url: String },
    /// An S3 bucket; credentials come from the standard AWS environment.
    S3 {
        bucket: String,
        public_base_url: Option<String>,
    },
}

/// Server configuration loaded from environment variables.
///
/// All fields have defaults suitable for local development. In production,
/// override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// How long to wait for background tasks after the listener closes.
    pub shutdown_timeout_secs: u64,
    /// Per-file upload limit in bytes.
    pub max_upload_bytes: usize,
    /// Whole request body limit in bytes (multipart profile creation).
    pub max_request_bytes: usize,
    /// Upper bound on catalog snapshot age; `0` disables it.
    pub catalog_max_age_secs: u64,
    pub backend: Backend,
    /// Required when `backend` is [`Backend::Postgres`].
    pub database_url: Option<String>,
    pub blob: BlobConfig,
    /// JWT token configuration. Only used by the PostgreSQL identity gateway.
    pub jwt: Option<JwtConfig>,
}

/// Default whole-request limit: 200 MiB.
const DEFAULT_MAX_REQUEST_BYTES: usize = 200 * 1024 * 1024;

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.into())
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                 | Default                       |
    /// |-------------------------|-------------------------------|
    /// | `HOST`                  | `0.0.0.0`                     |
    /// | `PORT`                  | `3000`                        |
    /// | `CORS_ORIGINS`          | `http://localhost:5173`       |
    /// | `REQUEST_TIMEOUT_SECS`  | `30`                          |
    /// | `SHUTDOWN_TIMEOUT_SECS` | `30`                          |
    /// | `MAX_UPLOAD_BYTES`      | `52428800`                    |
    /// | `MAX_REQUEST_BYTES`     | `209715200`                   |
    /// | `CATALOG_MAX_AGE_SECS`  | `60`                          |
    /// | `BACKEND`               | `postgres`                    |
    /// | `DATABASE_URL`          | required for `postgres`       |
    /// | `BLOB_BACKEND`          | `local`                       |
    /// | `BLOB_LOCAL_DIR`        | `storage`                     |
    /// | `BLOB_PUBLIC_BASE_URL`  | `http://localhost:3000/files` |
    /// | `S3_BUCKET`             | required for `s3`             |
    /// | `S3_PUBLIC_BASE_URL`    | bucket URL                    |
    ///
    /// # Panics
    ///
    /// Panics on malformed numbers, unknown backend names, or a missing
    /// required variable. Misconfiguration should fail at startup.
    pub fn from_env() -> Self {
        let host = env_or("HOST", "0.0.0.0");

        let port: u16 = env_or("PORT", "3000")
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = env_or("CORS_ORIGINS", "http://localhost:5173")
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = env_or("REQUEST_TIMEOUT_SECS", "30")
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let shutdown_timeout_secs: u64 = env_or("SHUTDOWN_TIMEOUT_SECS", "30")
            .parse()
            .expect("SHUTDOWN_TIMEOUT_SECS must be a valid u64");

        let max_upload_bytes: usize = env_or("MAX_UPLOAD_BYTES", &DEFAULT_MAX_UPLOAD_BYTES.to_string())
            .parse()
            .expect("MAX_UPLOAD_BYTES must be a valid usize");

        let max_request_bytes: usize =
            env_or("MAX_REQUEST_BYTES", &DEFAULT_MAX_REQUEST_BYTES.to_string())
                .parse()
                .expect("MAX_REQUEST_BYTES must be a valid usize");

        let catalog_max_age_secs: u64 = env_or("CATALOG_MAX_AGE_SECS", "60")
            .parse()
            .expect("CATALOG_MAX_AGE_SECS must be a valid u64");

        let backend = match env_or("BACKEND", "postgres").as_str() {
            "postgres" => Backend::Postgres,
            "memory" => Backend::Memory,
            other => panic!("BACKEND must be 'postgres' or 'memory', got '{other}'"),
        };

        let database_url = std::env::var("DATABASE_URL").ok();
        let jwt = match backend {
            Backend::Postgres => {
                assert!(
                    database_url.is_some(),
                    "DATABASE_URL must be set when BACKEND=postgres"
                );
                Some(JwtConfig::from_env())
            }
            Backend::Memory => None,
        };

        let blob = match env_or("BLOB_BACKEND", "local").as_str() {
            "local" => BlobConfig::Local {
                dir: PathBuf::from(env_or("BLOB_LOCAL_DIR", "storage")),
                public_base_url: env_or("BLOB_PUBLIC_BASE_URL", "http://localhost:3000/files"),
            },
            "s3" => BlobConfig::S3 {
                bucket: std::env::var("S3_BUCKET")
                    .expect("S3_BUCKET must be set when BLOB_BACKEND=s3"),
                public_base_url: std::env::var("S3_PUBLIC_BASE_URL").ok(),
            },
            other => panic!("BLOB_BACKEND must be 'local' or 's3', got '{other}'"),
        };

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            shutdown_timeout_secs,
            max_upload_bytes,
            max_request_bytes,
            catalog_max_age_secs,
            backend,
            database_url,
            blob,
            jwt,
        }
    }
}
