//! Filesystem blob backend.

use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;
use homecarpent_core::error::CoreError;
use homecarpent_core::ports::BlobStore;

/// Stores blobs as files under `base_dir`; URLs are `public_base_url/<name>`.
///
/// The API serves `base_dir` back under `/files` when this backend is active.
#[derive(Debug, Clone)]
pub struct LocalBlobStore {
    base_dir: PathBuf,
    public_base_url: String,
}

impl LocalBlobStore {
    pub fn new(base_dir: impl Into<PathBuf>, public_base_url: impl Into<String>) -> Self {
        Self {
            base_dir: base_dir.into(),
            public_base_url: public_base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Resolve `name` inside `base_dir`, refusing anything that could escape it.
    fn resolve(&self, name: &str) -> Result<PathBuf, CoreError> {
        let relative = Path::new(name);
        let is_plain = !name.is_empty()
            && relative
                .components()
                .all(|c| matches!(c, Component::Normal(_)));
        if !is_plain {
            return Err(CoreError::upload_failed(name, "blob name must be a relative path"));
        }
        Ok(self.base_dir.join(relative))
    }
}

#[async_trait]
impl BlobStore for LocalBlobStore {
    fn backend_tag(&self) -> &'static str {
        "local"
    }

    async fn store(
        &self,
        name: &str,
        _content_type: Option<&str>,
        bytes: Vec<u8>,
    ) -> Result<String, CoreError> {
        let path = self.resolve(name)?;
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| CoreError::upload_failed(name, e))?;
        }
        tokio::fs::write(&path, &bytes)
            .await
            .map_err(|e| CoreError::upload_failed(name, e))?;

        tracing::debug!(blob = %name, size = bytes.len(), "Stored blob on local disk");
        Ok(format!("{}/{name}", self.public_base_url))
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[tokio::test]
    async fn stores_file_and_returns_public_url() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalBlobStore::new(dir.path(), "http://localhost:3000/files/");

        let url = store
            .store("uploads/abc-kitchen.jpg", Some("image/jpeg"), vec![1, 2, 3])
            .await
            .unwrap();

        assert_eq!(url, "http://localhost:3000/files/uploads/abc-kitchen.jpg");
        let written = std::fs::read(dir.path().join("uploads/abc-kitchen.jpg")).unwrap();
        assert_eq!(written, vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn rejects_names_escaping_the_base_dir() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalBlobStore::new(dir.path(), "http://x");

        for name in ["../evil.jpg", "/etc/passwd", "uploads/../../x", ""] {
            assert_matches!(
                store.store(name, None, vec![1]).await,
                Err(CoreError::UploadFailed { .. }),
                "{name}"
            );
        }
    }

    #[tokio::test]
    async fn unwritable_base_dir_is_upload_failed() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("not-a-dir");
        std::fs::write(&blocker, b"file").unwrap();
        let store = LocalBlobStore::new(&blocker, "http://x");

        let result = store.store("uploads/a.png", None, vec![1]).await;
        assert_matches!(result, Err(CoreError::UploadFailed { .. }));
    }
}
