//! Amazon S3 (or compatible) blob backend.

use async_trait::async_trait;
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client;
use homecarpent_core::error::CoreError;
use homecarpent_core::ports::BlobStore;

/// Uploads blobs with `PutObject`; URLs are `public_base_url/<key>`.
#[derive(Debug, Clone)]
pub struct S3BlobStore {
    client: Client,
    bucket: String,
    public_base_url: String,
}

impl S3BlobStore {
    pub fn new(client: Client, bucket: impl Into<String>, public_base_url: Option<String>) -> Self {
        let bucket = bucket.into();
        let public_base_url = public_base_url
            .unwrap_or_else(|| default_public_base_url(&bucket))
            .trim_end_matches('/')
            .to_string();
        Self {
            client,
            bucket,
            public_base_url,
        }
    }

    /// Build a client from the standard AWS environment (credentials chain,
    /// `AWS_REGION`, `AWS_ENDPOINT_URL`).
    pub async fn from_env(bucket: impl Into<String>, public_base_url: Option<String>) -> Self {
        let config = aws_config::load_from_env().await;
        Self::new(Client::new(&config), bucket, public_base_url)
    }

    pub fn object_url(&self, key: &str) -> String {
        format!("{}/{key}", self.public_base_url)
    }
}

/// Virtual-hosted-style URL used when no CDN / public base is configured.
fn default_public_base_url(bucket: &str) -> String {
    format!("https://{bucket}.s3.amazonaws.com")
}

#[async_trait]
impl BlobStore for S3BlobStore {
    fn backend_tag(&self) -> &'static str {
        "s3"
    }

    async fn store(
        &self,
        name: &str,
        content_type: Option<&str>,
        bytes: Vec<u8>,
    ) -> Result<String, CoreError> {
        let size = bytes.len();
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(name)
            .set_content_type(content_type.map(str::to_string))
            .body(ByteStream::from(bytes))
            .send()
            .await
            .map_err(|e| CoreError::upload_failed(name, DisplayErrorContext(&e)))?;

        tracing::debug!(blob = %name, bucket = %self.bucket, size, "Stored blob in S3");
        Ok(self.object_url(name))
    }
}
