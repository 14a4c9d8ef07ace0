//! S3-backed photo store implementation.
//!
//! One fixed bucket holds every photo; the object key is the photo
//! identifier. Listing paginates `ListObjectsV2` over the whole bucket,
//! uploads are single `PutObject` calls, and public URLs are derived
//! deterministically without any request.

use async_trait::async_trait;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client;
use bytes::Bytes;

use crate::error::StorageError;

use super::{PhotoStore, StoredObject};

/// S3-backed implementation of [`PhotoStore`].
///
/// # Example
///
/// ```ignore
/// use photo_share::storage::{create_s3_client, S3PhotoStore};
///
/// let client = create_s3_client(None, "us-east-1").await;
/// let store = S3PhotoStore::new(client, "photos".to_string(), "us-east-1".to_string(), None);
///
/// store.upload("1700000000000.jpg", "image/jpeg", data).await?;
/// ```
#[derive(Clone)]
pub struct S3PhotoStore {
    client: Client,
    bucket: String,
    region: String,
    public_base: Option<String>,
}

impl S3PhotoStore {
    /// Create a new store over the given bucket.
    ///
    /// # Arguments
    /// * `client` - AWS S3 client to use for requests
    /// * `bucket` - bucket name holding the photos
    /// * `region` - region used for the default public URL shape
    /// * `public_base` - base URL for public photo URLs; when `None`, the
    ///   virtual-hosted S3 URL is used
    pub fn new(
        client: Client,
        bucket: String,
        region: String,
        public_base: Option<String>,
    ) -> Self {
        Self {
            client,
            bucket,
            region,
            public_base: public_base.map(|b| b.trim_end_matches('/').to_string()),
        }
    }

    /// Get the bucket name.
    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    fn map_error(context: &str, err: impl std::fmt::Display) -> StorageError {
        let err_str = err.to_string();
        if err_str.contains("NotFound") || err_str.contains("NoSuchKey") || err_str.contains("404")
        {
            StorageError::NotFound(context.to_string())
        } else {
            StorageError::S3(err_str)
        }
    }
}

#[async_trait]
impl PhotoStore for S3PhotoStore {
    async fn list(&self) -> Result<Vec<StoredObject>, StorageError> {
        let mut objects = Vec::new();
        let mut continuation_token: Option<String> = None;

        loop {
            let mut request = self
                .client
                .list_objects_v2()
                .bucket(&self.bucket)
                .max_keys(1000);

            if let Some(token) = continuation_token {
                request = request.continuation_token(token);
            }

            let result = request
                .send()
                .await
                .map_err(|e| Self::map_error(&self.bucket, e))?;

            for obj in result.contents() {
                if let Some(key) = obj.key() {
                    let size = obj.size().and_then(|s| u64::try_from(s).ok());
                    objects.push(StoredObject::from_key(key, size));
                }
            }

            if result.is_truncated() == Some(true) {
                continuation_token = result.next_continuation_token().map(|s| s.to_string());
            } else {
                break;
            }
        }

        Ok(objects)
    }

    async fn upload(
        &self,
        key: &str,
        content_type: &str,
        data: Bytes,
    ) -> Result<(), StorageError> {
        if key.is_empty() {
            return Err(StorageError::InvalidKey("empty key".to_string()));
        }

        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .content_type(content_type)
            .body(ByteStream::from(data))
            .send()
            .await
            .map_err(|e| Self::map_error(key, e))?;

        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), StorageError> {
        if key.is_empty() {
            return Err(StorageError::InvalidKey("empty key".to_string()));
        }

        self.client
            .delete_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| Self::map_error(key, e))?;

        Ok(())
    }

    fn public_url(&self, key: &str) -> String {
        let encoded = urlencoding::encode(key);
        match &self.public_base {
            Some(base) => format!("{}/{}", base, encoded),
            None => format!(
                "https://{}.s3.{}.amazonaws.com/{}",
                self.bucket, self.region, encoded
            ),
        }
    }
}

/// Create an S3 client with optional custom endpoint and region.
///
/// Use a custom endpoint for S3-compatible services like MinIO:
/// ```ignore
/// let client = create_s3_client(Some("http://localhost:9000"), "us-east-1").await;
/// ```
///
/// For AWS S3, pass `None` to use the default endpoint.
pub async fn create_s3_client(endpoint_url: Option<&str>, region: &str) -> Client {
    let region = aws_config::Region::new(region.to_string());
    let mut config_loader =
        aws_config::defaults(aws_config::BehaviorVersion::latest()).region(region);

    if let Some(endpoint) = endpoint_url {
        config_loader = config_loader.endpoint_url(endpoint);
    }

    let sdk_config = config_loader.load().await;

    // S3-compatible services usually need path-style addressing
    let s3_config = if endpoint_url.is_some() {
        aws_sdk_s3::config::Builder::from(&sdk_config)
            .force_path_style(true)
            .build()
    } else {
        aws_sdk_s3::config::Builder::from(&sdk_config).build()
    };

    Client::from_conf(s3_config)
}

// =============================================================================
// Tests
// =============================================================================
