use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

use crate::{KvStore, StateError, StateResult};

type Overlay = BTreeMap<Vec<u8>, Option<Vec<u8>>>;

/// Buffered write layer over a parent store.
///
/// Reads see pending writes first, then the parent. Nothing reaches the
/// parent until [`CacheStore::write`]; dropping the cache discards it.
pub struct CacheStore<'a, S: KvStore + ?Sized> {
    parent: &'a S,
    writes: Mutex<Overlay>,
}

impl<'a, S: KvStore + ?Sized> CacheStore<'a, S> {
    pub fn new(parent: &'a S) -> Self {
        Self {
            parent,
            writes: Mutex::new(BTreeMap::new()),
        }
    }

    fn overlay(&self) -> StateResult<MutexGuard<'_, Overlay>> {
        self.writes.lock().map_err(|_| StateError::Poisoned)
    }

    pub fn pending_writes(&self) -> StateResult<usize> {
        Ok(self.overlay()?.len())
    }

    /// Flushes buffered writes into the parent in key order.
    pub async fn write(self) -> StateResult<()> {
        let writes = self.writes.into_inner().map_err(|_| StateError::Poisoned)?;
        for (key, value) in writes {
            match value {
                Some(value) => self.parent.set(&key, value).await?,
                None => self.parent.delete(&key).await?,
            }
        }
        Ok(())
    }

    pub fn discard(self) {}
}

#[async_trait]
impl<'a, S: KvStore + ?Sized> KvStore for CacheStore<'a, S> {
    async fn get(&self, key: &[u8]) -> StateResult<Option<Vec<u8>>> {
        let pending = self.overlay()?.get(key).cloned();
        match pending {
            Some(value) => Ok(value),
            None => self.parent.get(key).await,
        }
    }

    async fn set(&self, key: &[u8], value: Vec<u8>) -> StateResult<()> {
        self.overlay()?.insert(key.to_vec(), Some(value));
        Ok(())
    }

    async fn has(&self, key: &[u8]) -> StateResult<bool> {
        let pending = self.overlay()?.get(key).map(Option::is_some);
        match pending {
            Some(present) => Ok(present),
            None => self.parent.has(key).await,
        }
    }

    async fn delete(&self, key: &[u8]) -> StateResult<()> {
        self.overlay()?.insert(key.to_vec(), None);
        Ok(())
    }

    async fn iter_prefix(&self, prefix: &[u8]) -> StateResult<Vec<(Vec<u8>, Vec<u8>)>> {
        let mut merged: BTreeMap<Vec<u8>, Vec<u8>> =
            self.parent.iter_prefix(prefix).await?.into_iter().collect();
        let overlay = self.overlay()?;
        for (key, value) in overlay
            .range(prefix.to_vec()..)
            .take_while(|(k, _)| k.starts_with(prefix))
        {
            match value {
                Some(value) => {
                    merged.insert(key.clone(), value.clone());
                }
                None => {
                    merged.remove(key);
                }
            }
        }
        Ok(merged.into_iter().collect())
    }
}
