//! Instrumented backend wrappers for failure and race injection.

use async_trait::async_trait;
use bytes::Bytes;
use std::collections::HashSet;
use std::sync::{Arc, Mutex};
use strata_storage::error::{StorageError, StorageResult};
use strata_storage::session::LockTokens;
use strata_storage::traits::{ObjectStore, Payload};

/// Deterministic lock token source yielding "session-0000", "session-0001", ...
///
/// Note: #[allow(dead_code)] because each test file compiles common/ separately.
#[allow(dead_code)]
#[derive(Default)]
pub struct SeqLockTokens {
    next: Mutex<usize>,
}

impl LockTokens for SeqLockTokens {
    fn next_token(&self) -> String {
        let mut next = self.next.lock().unwrap();
        let token = format!("session-{:04}", *next);
        *next += 1;
        token
    }
}

/// Backend wrapper that fails deletes for configured keys.
#[allow(dead_code)]
pub struct FaultyBackend {
    inner: Arc<dyn ObjectStore>,
    fail_delete_keys: HashSet<String>,
}

#[allow(dead_code)]
impl FaultyBackend {
    pub fn new(inner: Arc<dyn ObjectStore>, fail_delete_keys: &[&str]) -> Arc<Self> {
        Arc::new(Self {
            inner,
            fail_delete_keys: fail_delete_keys.iter().map(|k| k.to_string()).collect(),
        })
    }
}

#[async_trait]
impl ObjectStore for FaultyBackend {
    async fn list(&self, prefix: &str) -> StorageResult<Vec<String>> {
        self.inner.list(prefix).await
    }

    async fn get(&self, key: &str) -> StorageResult<Bytes> {
        self.inner.get(key).await
    }

    async fn put(&self, key: &str, payload: Payload) -> StorageResult<()> {
        self.inner.put(key, payload).await
    }

    async fn delete(&self, key: &str) -> StorageResult<()> {
        if self.fail_delete_keys.contains(key) {
            return Err(StorageError::Io(std::io::Error::other(
                "injected delete failure",
            )));
        }
        self.inner.delete(key).await
    }

    fn backend_name(&self) -> &'static str {
        "faulty"
    }
}

/// Backend wrapper that writes an extra object alongside the first put.
///
/// Simulates a concurrent writer landing between a session's lock write and
/// its verifying re-list.
#[allow(dead_code)]
pub struct IntrudingBackend {
    inner: Arc<dyn ObjectStore>,
    intruder_key: String,
    fired: Mutex<bool>,
}

#[allow(dead_code)]
impl IntrudingBackend {
    pub fn new(inner: Arc<dyn ObjectStore>, intruder_key: &str) -> Arc<Self> {
        Arc::new(Self {
            inner,
            intruder_key: intruder_key.to_string(),
            fired: Mutex::new(false),
        })
    }
}

#[async_trait]
impl ObjectStore for IntrudingBackend {
    async fn list(&self, prefix: &str) -> StorageResult<Vec<String>> {
        self.inner.list(prefix).await
    }

    async fn get(&self, key: &str) -> StorageResult<Bytes> {
        self.inner.get(key).await
    }

    async fn put(&self, key: &str, payload: Payload) -> StorageResult<()> {
        self.inner.put(key, payload).await?;
        let fire = {
            let mut fired = self.fired.lock().unwrap();
            !std::mem::replace(&mut *fired, true)
        };
        if fire {
            self.inner
                .put(&self.intruder_key, Payload::empty())
                .await?;
        }
        Ok(())
    }

    async fn delete(&self, key: &str) -> StorageResult<()> {
        self.inner.delete(key).await
    }

    fn backend_name(&self) -> &'static str {
        "intruding"
    }
}
