//! Block upload session protocol.
//!
//! A session is represented entirely by zero-length lock objects under the
//! block's key prefix: a block has an open session iff at least one key
//! ending in [`LOCK_SUFFIX`] exists there. There is no session record, no
//! expiry and no owner field; all state is re-derived by listing the store
//! on every call, so the protocol is stateless across requests and survives
//! process restarts.
//!
//! The backing store offers no create-if-absent primitive, so [`SessionManager::open`]
//! emulates mutual exclusion with a list-write-list sequence. This narrows,
//! but cannot eliminate, the window in which two concurrent opens both
//! observe an empty prefix before either lock write lands. The defense also
//! assumes read-after-write and list consistency within a single prefix; on
//! an eventually consistent backend it is unsound.

use crate::error::{StorageError, StorageResult};
use crate::tenant::TenantStore;
use crate::traits::Payload;
use std::sync::Arc;
use thiserror::Error;
use uuid::Uuid;

/// Suffix of session lock object names.
pub const LOCK_SUFFIX: &str = ".lock";

/// Session protocol errors.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("block already exists in object storage")]
    BlockExists,

    #[error("another file exists for the block in object storage")]
    LockRace,

    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Source of lock object name stems.
///
/// Injected so tests can supply deterministic values and assert the exact
/// keys written.
pub trait LockTokens: Send + Sync + 'static {
    fn next_token(&self) -> String;
}

/// Production token source backed by random v4 UUIDs.
#[derive(Debug, Default)]
pub struct UuidLockTokens;

impl LockTokens for UuidLockTokens {
    fn next_token(&self) -> String {
        Uuid::new_v4().to_string()
    }
}

/// Outcome of closing a session.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CloseReport {
    /// Lock objects deleted.
    pub deleted: usize,
    /// Lock objects whose deletion failed.
    pub failed: usize,
}

/// Manages upload session lock objects for blocks.
///
/// Holds no per-session state; every operation takes the tenant-scoped
/// store and the block ID it applies to.
pub struct SessionManager {
    tokens: Arc<dyn LockTokens>,
}

impl SessionManager {
    /// Create a session manager with random lock tokens.
    pub fn new() -> Self {
        Self::with_tokens(Arc::new(UuidLockTokens))
    }

    /// Create a session manager with an injected token source.
    pub fn with_tokens(tokens: Arc<dyn LockTokens>) -> Self {
        Self { tokens }
    }

    fn block_prefix(block: &str) -> String {
        format!("{block}/")
    }

    /// Whether any object at all exists under the block's prefix.
    pub async fn has_any_object(&self, store: &TenantStore, block: &str) -> StorageResult<bool> {
        let keys = store.list(&Self::block_prefix(block)).await?;
        Ok(!keys.is_empty())
    }

    /// Open an upload session for a block.
    ///
    /// Fails with [`SessionError::BlockExists`] when anything already lives
    /// under the block's prefix, and with [`SessionError::LockRace`] when a
    /// foreign object appears between the lock write and the verifying
    /// re-list. In the race case the freshly written lock is deliberately
    /// left in place: the competing session treats it as its own conflict
    /// signal, and removal here could tear down a lock the competitor just
    /// verified. Orphaned locks are not collected by this subsystem.
    pub async fn open(&self, store: &TenantStore, block: &str) -> Result<(), SessionError> {
        let prefix = Self::block_prefix(block);
        if !store.list(&prefix).await?.is_empty() {
            return Err(SessionError::BlockExists);
        }

        let lock_key = format!("{block}/{}{LOCK_SUFFIX}", self.tokens.next_token());
        store.put(&lock_key, Payload::empty()).await?;
        tracing::debug!(tenant = %store.tenant(), block, key = %lock_key, "wrote session lock object");

        let seen = store.list(&prefix).await?;
        if seen.iter().any(|key| key != &lock_key) {
            return Err(SessionError::LockRace);
        }

        Ok(())
    }

    /// Whether an upload session is open for a block.
    pub async fn is_open(&self, store: &TenantStore, block: &str) -> StorageResult<bool> {
        let keys = store.list(&Self::block_prefix(block)).await?;
        Ok(keys.iter().any(|key| key.ends_with(LOCK_SUFFIX)))
    }

    /// Close a block's session by deleting its lock objects.
    ///
    /// More than one lock may exist after an aborted open race; all are
    /// deleted, continuing past individual failures. Failures are counted
    /// in the report rather than aborting, so a single bad delete cannot
    /// strand the remaining locks.
    pub async fn close(&self, store: &TenantStore, block: &str) -> StorageResult<CloseReport> {
        let keys = store.list(&Self::block_prefix(block)).await?;

        let mut report = CloseReport::default();
        for key in keys.iter().filter(|key| key.ends_with(LOCK_SUFFIX)) {
            match store.delete(key).await {
                Ok(()) => report.deleted += 1,
                Err(err) => {
                    tracing::error!(
                        tenant = %store.tenant(),
                        block,
                        key = %key,
                        error = %err,
                        "failed to delete session lock object"
                    );
                    report.failed += 1;
                }
            }
        }

        Ok(report)
    }
}

impl Default for SessionManager {
    fn default() -> Self {
        Self::new()
    }
}
