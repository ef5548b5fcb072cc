use serde::{Deserialize, Serialize};
use state::KvStore;

use crate::codec::{compress_at_rest, inflate_at_rest};
use crate::error::{WasmStorageError, WasmStorageResult};
use crate::policy::SubmissionClass;
use crate::types::{Wasm, WasmSummary, WasmType};

pub const WASM_PREFIX: &[u8] = b"wasm_storage/wasm/";

fn wasm_key(hash: &str) -> Vec<u8> {
    let mut key = WASM_PREFIX.to_vec();
    key.extend_from_slice(hash.as_bytes());
    key
}

fn hash_from_key(key: &[u8]) -> String {
    String::from_utf8_lossy(&key[WASM_PREFIX.len()..]).into_owned()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct StoredWasm {
    wasm_type: WasmType,
    submitter: String,
    added_at: u64,
    compressed: Vec<u8>,
}

impl StoredWasm {
    fn encode(wasm: &Wasm) -> WasmStorageResult<Vec<u8>> {
        let codec_err = |reason: String| WasmStorageError::Codec {
            hash: wasm.hash.clone(),
            reason,
        };
        let record = StoredWasm {
            wasm_type: wasm.wasm_type,
            submitter: wasm.submitter.clone(),
            added_at: wasm.added_at,
            compressed: compress_at_rest(&wasm.bytecode).map_err(|e| codec_err(e.to_string()))?,
        };
        bincode::serialize(&record).map_err(|e| codec_err(e.to_string()))
    }

    fn decode(hash: &str, raw: &[u8]) -> WasmStorageResult<Self> {
        bincode::deserialize(raw).map_err(|e| WasmStorageError::Codec {
            hash: hash.to_string(),
            reason: e.to_string(),
        })
    }

    fn into_wasm(self, hash: String) -> WasmStorageResult<Wasm> {
        let bytecode = inflate_at_rest(&self.compressed).map_err(|e| WasmStorageError::Codec {
            hash: hash.clone(),
            reason: e.to_string(),
        })?;
        Ok(Wasm {
            hash,
            bytecode,
            wasm_type: self.wasm_type,
            submitter: self.submitter,
            added_at: self.added_at,
        })
    }
}

/// Write-once wasm records keyed by hex content hash.
pub struct ArtifactStore<'a, S: KvStore + ?Sized> {
    kv: &'a S,
}

impl<'a, S: KvStore + ?Sized> ArtifactStore<'a, S> {
    pub fn new(kv: &'a S) -> Self {
        Self { kv }
    }

    pub async fn exists(&self, hash: &str) -> WasmStorageResult<bool> {
        Ok(self.kv.has(&wasm_key(hash)).await?)
    }

    pub async fn put(&self, class: SubmissionClass, wasm: &Wasm) -> WasmStorageResult<()> {
        if self.exists(&wasm.hash).await? {
            return Err(WasmStorageError::AlreadyExists {
                class,
                hash: wasm.hash.clone(),
            });
        }
        self.write_new(wasm).await
    }

    /// Callers must have checked [`Self::exists`] in the same transaction.
    pub(crate) async fn write_new(&self, wasm: &Wasm) -> WasmStorageResult<()> {
        let encoded = StoredWasm::encode(wasm)?;
        self.kv.set(&wasm_key(&wasm.hash), encoded).await?;
        Ok(())
    }

    pub async fn get(&self, hash: &str) -> WasmStorageResult<Wasm> {
        let raw = self
            .kv
            .get(&wasm_key(hash))
            .await?
            .ok_or_else(|| WasmStorageError::NotFound(hash.to_string()))?;
        StoredWasm::decode(hash, &raw)?.into_wasm(hash.to_string())
    }

    pub async fn list(&self, filter: Option<WasmType>) -> WasmStorageResult<Vec<WasmSummary>> {
        let mut out = Vec::new();
        for (key, raw) in self.kv.iter_prefix(WASM_PREFIX).await? {
            let hash = hash_from_key(&key);
            let record = StoredWasm::decode(&hash, &raw)?;
            if filter.map_or(true, |t| t == record.wasm_type) {
                out.push(WasmSummary {
                    hash,
                    wasm_type: record.wasm_type,
                    added_at: record.added_at,
                });
            }
        }
        Ok(out)
    }

    pub async fn all(&self) -> WasmStorageResult<Vec<Wasm>> {
        let mut out = Vec::new();
        for (key, raw) in self.kv.iter_prefix(WASM_PREFIX).await? {
            let hash = hash_from_key(&key);
            out.push(StoredWasm::decode(&hash, &raw)?.into_wasm(hash)?);
        }
        Ok(out)
    }
}
