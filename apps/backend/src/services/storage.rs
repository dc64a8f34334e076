//! S3/R2 storage for cached phrase audio.

use async_trait::async_trait;
use aws_sdk_s3::{
    config::{BehaviorVersion, Credentials, Region},
    primitives::ByteStream,
    Client, Config,
};
use thiserror::Error;

use crate::config::AudioBucketConfig;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("S3 error: {0}")]
    S3(String),
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Object storage operations the audio cache relies on.
#[async_trait]
pub trait BlobStore: Send + Sync {
    async fn file_exists(&self, key: &str) -> Result<bool, StorageError>;

    async fn upload_file(&self, key: &str, content: &[u8], content_type: Option<&str>) -> Result<String, StorageError>;

    /// URL clients can fetch `key` from.
    fn public_url(&self, key: &str) -> String;
}

/// S3/R2 storage service for file uploads.
pub struct StorageService {
    client: Client,
    bucket: String,
    public_url: String,
}

impl StorageService {
    /// Create a storage service for the configured bucket.
    ///
    /// Explicit `S3_ACCESS_KEY`/`S3_SECRET_KEY` take precedence; otherwise
    /// the default AWS credential chain is used.
    pub async fn new(config: &AudioBucketConfig) -> Result<Self, StorageError> {
        if config.bucket.is_empty() {
            return Err(StorageError::Config("AUDIO_BUCKET is empty".to_string()));
        }

        let client = match (&config.access_key, &config.secret_key) {
            (Some(access_key), Some(secret_key)) => {
                let credentials = Credentials::new(
                    access_key,
                    secret_key,
                    None,  // session token
                    None,  // expiry
                    "env", // provider name
                );

                let mut builder = Config::builder()
                    .region(Region::new(config.region.clone()))
                    .credentials_provider(credentials)
                    .behavior_version_latest();

                // Custom endpoint for R2 or other S3-compatible services
                if let Some(endpoint_url) = &config.endpoint {
                    builder = builder.endpoint_url(endpoint_url);
                }

                Client::from_conf(builder.build())
            }
            (None, None) => {
                let mut loader = aws_config::defaults(BehaviorVersion::latest())
                    .region(Region::new(config.region.clone()));
                if let Some(endpoint_url) = &config.endpoint {
                    loader = loader.endpoint_url(endpoint_url);
                }
                Client::new(&loader.load().await)
            }
            _ => {
                return Err(StorageError::Config(
                    "S3_ACCESS_KEY and S3_SECRET_KEY must be set together".to_string(),
                ))
            }
        };

        Ok(Self {
            client,
            bucket: config.bucket.clone(),
            public_url: config.public_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl BlobStore for StorageService {
    /// Check if a file exists in S3.
    async fn file_exists(&self, key: &str) -> Result<bool, StorageError> {
        match self
            .client
            .head_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
        {
            Ok(_) => Ok(true),
            Err(e) => {
                let err_str = e.to_string();
                let not_found = e
                    .as_service_error()
                    .map(|se| se.is_not_found())
                    .unwrap_or(false);
                if not_found || err_str.contains("NotFound") || err_str.contains("not found") {
                    Ok(false)
                } else {
                    Err(StorageError::S3(err_str))
                }
            }
        }
    }

    /// Upload a file to S3 and return its key.
    async fn upload_file(&self, key: &str, content: &[u8], content_type: Option<&str>) -> Result<String, StorageError> {
        let body = ByteStream::from(content.to_vec());

        let mut request = self
            .client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .body(body);

        if let Some(ct) = content_type {
            request = request.content_type(ct);
        }

        request
            .send()
            .await
            .map_err(|e| StorageError::S3(e.to_string()))?;

        tracing::info!("Uploaded file to S3: {}", key);
        Ok(key.to_string())
    }

    fn public_url(&self, key: &str) -> String {
        format!("{}/{}", self.public_url, key.trim_start_matches('/'))
    }
}
