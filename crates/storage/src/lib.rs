//! Object storage abstraction and upload session protocol for Strata.
//!
//! This crate provides:
//! - A minimal object store capability interface (list, streaming put,
//!   delete) designed so the session protocol is testable against fakes
//! - Tenant-scoped key prefixing
//! - The block upload session protocol built on lock objects
//! - Backends: local filesystem and S3-compatible

pub mod backends;
pub mod error;
pub mod session;
pub mod tenant;
pub mod traits;

pub use backends::{filesystem::FilesystemBackend, s3::S3Backend};
pub use error::{StorageError, StorageResult};
pub use session::{
    CloseReport, LOCK_SUFFIX, LockTokens, SessionError, SessionManager, UuidLockTokens,
};
pub use tenant::TenantStore;
pub use traits::{ByteStream, ObjectStore, Payload};

use std::sync::Arc;
use strata_core::config::StorageConfig;

/// Create an object store from configuration.
pub async fn from_config(config: &StorageConfig) -> StorageResult<Arc<dyn ObjectStore>> {
    config.validate().map_err(StorageError::Config)?;

    match config {
        StorageConfig::Filesystem { path } => {
            let backend = FilesystemBackend::new(path).await?;
            Ok(Arc::new(backend))
        }
        StorageConfig::S3 {
            bucket,
            endpoint,
            region,
            prefix,
            access_key_id,
            secret_access_key,
            force_path_style,
        } => {
            let backend = S3Backend::new(
                bucket,
                endpoint.clone(),
                region.clone(),
                prefix.clone(),
                access_key_id.clone(),
                secret_access_key.clone(),
                *force_path_style,
            )
            .await?;
            Ok(Arc::new(backend))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;
    use tempfile::tempdir;

    #[tokio::test]
    async fn from_config_filesystem_ok() {
        let temp = tempdir().unwrap();
        let config = StorageConfig::Filesystem {
            path: temp.path().join("store"),
        };

        let store = from_config(&config).await.unwrap();
        store
            .put("hello.txt", Payload::from_bytes(Bytes::from_static(b"hi")))
            .await
            .unwrap();
        assert_eq!(store.get("hello.txt").await.unwrap().as_ref(), b"hi");
    }

    #[tokio::test]
    async fn from_config_rejects_partial_credentials() {
        let config = StorageConfig::S3 {
            bucket: "bucket".to_string(),
            endpoint: None,
            region: None,
            prefix: None,
            access_key_id: Some("access".to_string()),
            secret_access_key: None,
            force_path_style: false,
        };

        match from_config(&config).await {
            Ok(_) => panic!("expected error"),
            Err(StorageError::Config(_)) => {}
            Err(other) => panic!("unexpected error: {other:?}"),
        }
    }
}
