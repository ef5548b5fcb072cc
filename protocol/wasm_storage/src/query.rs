use state::KvStore;

use crate::error::WasmStorageResult;
use crate::keeper::Keeper;
use crate::params::Params;
use crate::store::ArtifactStore;
use crate::types::{Wasm, WasmSummary, WasmType};

/// Read-only access to stored wasms. No authorization applies.
pub struct QueryService<'a, S: KvStore + ?Sized> {
    keeper: &'a Keeper,
    store: ArtifactStore<'a, S>,
}

impl<'a, S: KvStore + ?Sized> QueryService<'a, S> {
    pub fn new(keeper: &'a Keeper, kv: &'a S) -> Self {
        Self {
            keeper,
            store: ArtifactStore::new(kv),
        }
    }

    pub async fn fetch_by_hash(&self, hash: &str) -> WasmStorageResult<Vec<u8>> {
        Ok(self.store.get(hash).await?.bytecode)
    }

    pub async fn wasm(&self, hash: &str) -> WasmStorageResult<Wasm> {
        self.store.get(hash).await
    }

    pub async fn list_wasms(&self, filter: Option<WasmType>) -> WasmStorageResult<Vec<WasmSummary>> {
        self.store.list(filter).await
    }

    pub fn params(&self) -> Params {
        self.keeper.params().clone()
    }
}
