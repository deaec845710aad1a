use std::sync::Arc;

use object_store::ObjectStore;
use object_store::aws::AmazonS3Builder;
use object_store::local::LocalFileSystem;

use crate::conf::{LocalStoreConfig, S3StoreConfig, StoreConfig};
use crate::core::ExtractError;

/// Creates a LocalFileSystem ObjectStore rooted at the configured path,
/// creating the directory when missing.
pub fn create_local_store(config: &LocalStoreConfig) -> Result<Arc<dyn ObjectStore>, ExtractError> {
    std::fs::create_dir_all(&config.path).map_err(|e| {
        ExtractError::DiscoveryError(format!("creating store root '{}': {}", config.path, e))
    })?;
    let store = LocalFileSystem::new_with_prefix(&config.path).map_err(|e| {
        ExtractError::DiscoveryError(format!(
            "Failed to open local store at '{}': {}",
            config.path, e
        ))
    })?;
    Ok(Arc::new(store))
}

/// Creates an S3 ObjectStore from S3StoreConfig.
pub fn create_s3_store(config: &S3StoreConfig) -> Result<Arc<dyn ObjectStore>, ExtractError> {
    let mut builder = AmazonS3Builder::from_env()
        .with_bucket_name(&config.bucket)
        .with_region(&config.region);

    // Optional custom endpoint (for MinIO, LocalStack, etc.)
    if let Some(endpoint) = &config.endpoint {
        builder = builder.with_endpoint(endpoint);
        if endpoint.starts_with("http://") {
            builder = builder.with_allow_http(true);
        }
    }

    let store = builder.build().map_err(|e| {
        ExtractError::DiscoveryError(format!(
            "Failed to create S3 store for bucket '{}': {}",
            config.bucket, e
        ))
    })?;

    Ok(Arc::new(store))
}

pub fn create_store(config: &StoreConfig) -> Result<Arc<dyn ObjectStore>, ExtractError> {
    match config {
        StoreConfig::S3(c) => create_s3_store(c),
        StoreConfig::Local(c) => create_local_store(c),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_local_store_creates_root() {
        let dir = tempfile::TempDir::new().unwrap();
        let root = dir.path().join("raw-data");
        let config = LocalStoreConfig {
            path: root.to_str().unwrap().to_string(),
            prefix: String::new(),
        };

        assert!(create_local_store(&config).is_ok());
        assert!(root.is_dir());
    }

    #[test]
    fn test_create_s3_store_with_endpoint() {
        let config = S3StoreConfig {
            bucket: "raw-data".to_string(),
            prefix: String::new(),
            endpoint: Some("http://localhost:9000".to_string()),
            region: "eu-west-2".to_string(),
        };
        assert!(create_s3_store(&config).is_ok());
    }
}
