//! Offer-letter PDF storage on S3 / MinIO.

use async_trait::async_trait;
use aws_sdk_s3::primitives::ByteStream;
use bytes::Bytes;
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;

#[async_trait]
pub trait FileStore: Send + Sync {
    /// Stores an upload and returns its key.
    async fn put(&self, data: Bytes, content_type: &str) -> Result<String, AppError>;
    /// `Ok(None)` when nothing is stored under `key`.
    async fn fetch(&self, key: &str) -> Result<Option<Bytes>, AppError>;
}

#[derive(Clone)]
pub struct S3FileStore {
    client: aws_sdk_s3::Client,
    bucket: String,
}

impl S3FileStore {
    pub fn new(client: aws_sdk_s3::Client, bucket: String) -> Self {
        Self { client, bucket }
    }
}

#[async_trait]
impl FileStore for S3FileStore {
    async fn put(&self, data: Bytes, content_type: &str) -> Result<String, AppError> {
        let key = format!("offer-letters/{}.pdf", Uuid::new_v4());
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(&key)
            .body(ByteStream::from(data))
            .content_type(content_type)
            .send()
            .await
            .map_err(|e| AppError::Storage(format!("S3 upload failed: {e}")))?;

        info!("Uploaded offer letter to s3://{}/{}", self.bucket, key);
        Ok(key)
    }

    async fn fetch(&self, key: &str) -> Result<Option<Bytes>, AppError> {
        let output = match self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
        {
            Ok(output) => output,
            Err(err) => {
                if err.as_service_error().is_some_and(|e| e.is_no_such_key()) {
                    return Ok(None);
                }
                return Err(AppError::Storage(format!("S3 download failed: {err}")));
            }
        };

        let data = output
            .body
            .collect()
            .await
            .map_err(|e| AppError::Storage(format!("S3 read failed: {e}")))?
            .into_bytes();
        Ok(Some(data))
    }
}
