use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};
use thiserror::Error;

pub mod cache;

pub use cache::CacheStore;

pub type Hash = [u8; 32];

fn hash_leaf(key: &[u8], value: &[u8]) -> Hash {
    let mut hasher = blake3::Hasher::new();
    hasher.update(&(key.len() as u64).to_le_bytes());
    hasher.update(key);
    hasher.update(value);
    *hasher.finalize().as_bytes()
}

fn fold_hashes(leaves: Vec<Hash>) -> Hash {
    if leaves.is_empty() {
        return [0u8; 32];
    }
    let mut hasher = blake3::Hasher::new();
    for leaf in leaves {
        hasher.update(&leaf);
    }
    *hasher.finalize().as_bytes()
}

#[derive(Debug, Error)]
pub enum StateError {
    #[error("state lock poisoned")]
    Poisoned,
    #[error("backend error: {0}")]
    Backend(String),
}

pub type StateResult<T> = Result<T, StateError>;

/// Key-value view over the current state version.
///
/// Implementations must return `iter_prefix` results ordered by key so that
/// every node walks state in the same order.
#[async_trait]
pub trait KvStore: Send + Sync {
    async fn get(&self, key: &[u8]) -> StateResult<Option<Vec<u8>>>;
    async fn set(&self, key: &[u8], value: Vec<u8>) -> StateResult<()>;
    async fn has(&self, key: &[u8]) -> StateResult<bool>;
    async fn delete(&self, key: &[u8]) -> StateResult<()>;
    async fn iter_prefix(&self, prefix: &[u8]) -> StateResult<Vec<(Vec<u8>, Vec<u8>)>>;
}

#[derive(Clone, Default)]
pub struct InMemoryKvStore {
    inner: Arc<Mutex<BTreeMap<Vec<u8>, Vec<u8>>>>,
}

impl InMemoryKvStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn guard(&self) -> StateResult<MutexGuard<'_, BTreeMap<Vec<u8>, Vec<u8>>>> {
        self.inner.lock().map_err(|_| StateError::Poisoned)
    }

    pub fn len(&self) -> StateResult<usize> {
        Ok(self.guard()?.len())
    }

    pub fn is_empty(&self) -> StateResult<bool> {
        Ok(self.guard()?.is_empty())
    }

    /// Deterministic root over every entry, in key order.
    pub async fn commit(&self) -> StateResult<Hash> {
        let guard = self.guard()?;
        let leaves = guard.iter().map(|(k, v)| hash_leaf(k, v)).collect();
        Ok(fold_hashes(leaves))
    }
}

#[async_trait]
impl KvStore for InMemoryKvStore {
    async fn get(&self, key: &[u8]) -> StateResult<Option<Vec<u8>>> {
        Ok(self.guard()?.get(key).cloned())
    }

    async fn set(&self, key: &[u8], value: Vec<u8>) -> StateResult<()> {
        self.guard()?.insert(key.to_vec(), value);
        Ok(())
    }

    async fn has(&self, key: &[u8]) -> StateResult<bool> {
        Ok(self.guard()?.contains_key(key))
    }

    async fn delete(&self, key: &[u8]) -> StateResult<()> {
        self.guard()?.remove(key);
        Ok(())
    }

    async fn iter_prefix(&self, prefix: &[u8]) -> StateResult<Vec<(Vec<u8>, Vec<u8>)>> {
        let guard = self.guard()?;
        Ok(guard
            .range(prefix.to_vec()..)
            .take_while(|(k, _)| k.starts_with(prefix))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect())
    }
}
