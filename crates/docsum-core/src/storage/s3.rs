use std::path::Path;

use aws_config::{BehaviorVersion, Region};
use aws_sdk_s3::config::http::HttpResponse;
use aws_sdk_s3::error::{DisplayErrorContext, SdkError};
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client;

use super::{ObjectStore, StorageError};
use crate::config::{StorageBackend, StorageConfig};

/// Archives uploads to an S3 (or S3-compatible) bucket
pub struct S3Store {
    client: Client,
    bucket: String,
}

impl S3Store {
    /// Create a store using the standard AWS credential chain
    pub async fn new(config: &StorageConfig) -> Self {
        let mut loader =
            aws_config::defaults(BehaviorVersion::latest()).region(Region::new(config.region.clone()));
        if let Some(ref endpoint) = config.endpoint_url {
            loader = loader.endpoint_url(endpoint);
        }
        let shared = loader.load().await;

        let s3_config = aws_sdk_s3::config::Builder::from(&shared)
            .force_path_style(config.force_path_style)
            .build();

        Self::from_client(Client::from_conf(s3_config), config.bucket.clone())
    }

    pub fn from_client(client: Client, bucket: impl Into<String>) -> Self {
        Self {
            client,
            bucket: bucket.into(),
        }
    }

    pub fn bucket(&self) -> &str {
        &self.bucket
    }
}

#[async_trait::async_trait]
impl ObjectStore for S3Store {
    fn backend(&self) -> StorageBackend {
        StorageBackend::S3
    }

    fn location(&self) -> String {
        format!("s3://{}", self.bucket)
    }

    async fn put_file(&self, key: &str, path: &Path) -> Result<(), StorageError> {
        let body = ByteStream::from_path(path)
            .await
            .map_err(|e| StorageError::Io(std::io::Error::other(e.to_string())))?;

        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .body(body)
            .send()
            .await
            .map_err(classify)?;

        tracing::debug!(bucket = %self.bucket, key, "Uploaded object to S3");
        Ok(())
    }

    async fn check(&self) -> Result<(), StorageError> {
        self.client
            .head_bucket()
            .bucket(&self.bucket)
            .send()
            .await
            .map_err(classify)?;
        Ok(())
    }
}

/// Map an SDK failure to a retryable or permanent storage error
fn classify<E>(err: SdkError<E, HttpResponse>) -> StorageError
where
    E: std::error::Error + Send + Sync + 'static,
{
    let transient = match &err {
        SdkError::TimeoutError(_) | SdkError::DispatchFailure(_) | SdkError::ResponseError(_) => {
            true
        }
        SdkError::ServiceError(service) => {
            let status = service.raw().status().as_u16();
            status >= 500 || status == 429
        }
        _ => false,
    };

    let message = DisplayErrorContext(&err).to_string();
    if transient {
        StorageError::Transient(message)
    } else {
        StorageError::Rejected(message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aws_sdk_s3::operation::put_object::PutObjectError;

    #[test]
    fn test_timeouts_are_transient() {
        let err: SdkError<PutObjectError, HttpResponse> = SdkError::timeout_error("timed out");
        assert!(classify(err).is_transient());
    }

    #[test]
    fn test_construction_failures_are_permanent() {
        let err: SdkError<PutObjectError, HttpResponse> =
            SdkError::construction_failure("missing bucket");
        assert!(matches!(classify(err), StorageError::Rejected(_)));
    }

    #[tokio::test]
    async fn test_location() {
        let mut config = StorageConfig::default();
        config.bucket = "archive-bucket".to_string();
        config.endpoint_url = Some("http://127.0.0.1:9000".to_string());
        config.force_path_style = true;

        let store = S3Store::new(&config).await;
        assert_eq!(store.location(), "s3://archive-bucket");
        assert_eq!(store.bucket(), "archive-bucket");
        assert_eq!(store.backend(), StorageBackend::S3);
    }
}
