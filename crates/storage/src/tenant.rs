//! Tenant-scoped view over an object store.

use crate::error::StorageResult;
use crate::traits::{ObjectStore, Payload};
use bytes::Bytes;
use std::sync::Arc;
use strata_core::TenantId;

/// A tenant-scoped object store.
///
/// Prefixes every key with `<tenant>/` so tenants can never address each
/// other's objects, and strips the prefix from listing results. Handlers
/// construct one per request from the authenticated tenant; there is no
/// ambient tenant state.
#[derive(Clone)]
pub struct TenantStore {
    inner: Arc<dyn ObjectStore>,
    tenant: TenantId,
}

impl TenantStore {
    /// Create a tenant-scoped view over a backend.
    pub fn new(inner: Arc<dyn ObjectStore>, tenant: TenantId) -> Self {
        Self { inner, tenant }
    }

    /// The tenant this view is scoped to.
    pub fn tenant(&self) -> &TenantId {
        &self.tenant
    }

    fn full_key(&self, key: &str) -> String {
        format!("{}/{}", self.tenant, key)
    }

    fn strip_tenant(&self, full_key: &str) -> String {
        let prefix = format!("{}/", self.tenant);
        full_key
            .strip_prefix(&prefix)
            .unwrap_or(full_key)
            .to_string()
    }

    /// List keys under a tenant-relative prefix, returned tenant-relative.
    pub async fn list(&self, prefix: &str) -> StorageResult<Vec<String>> {
        let keys = self.inner.list(&self.full_key(prefix)).await?;
        Ok(keys.iter().map(|k| self.strip_tenant(k)).collect())
    }

    /// Get an object by tenant-relative key.
    pub async fn get(&self, key: &str) -> StorageResult<Bytes> {
        self.inner.get(&self.full_key(key)).await
    }

    /// Put an object by tenant-relative key.
    pub async fn put(&self, key: &str, payload: Payload) -> StorageResult<()> {
        self.inner.put(&self.full_key(key), payload).await
    }

    /// Delete an object by tenant-relative key.
    pub async fn delete(&self, key: &str) -> StorageResult<()> {
        self.inner.delete(&self.full_key(key)).await
    }
}

impl std::fmt::Debug for TenantStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TenantStore")
            .field("tenant", &self.tenant)
            .field("backend", &self.inner.backend_name())
            .finish()
    }
}
