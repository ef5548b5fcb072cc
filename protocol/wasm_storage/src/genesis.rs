use serde::{Deserialize, Serialize};
use state::KvStore;
use tracing::info;

use crate::error::{WasmStorageError, WasmStorageResult};
use crate::guard::check_size;
use crate::hash::content_hash;
use crate::keeper::Keeper;
use crate::store::ArtifactStore;
use crate::types::{Wasm, WasmType};

mod base64_bytes {
    use base64::engine::general_purpose::STANDARD as BASE64;
    use base64::Engine;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&BASE64.encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let encoded = String::deserialize(deserializer)?;
        BASE64
            .decode(encoded.as_bytes())
            .map_err(serde::de::Error::custom)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenesisWasm {
    pub hash: String,
    #[serde(with = "base64_bytes")]
    pub bytecode: Vec<u8>,
    pub wasm_type: WasmType,
    pub submitter: String,
    #[serde(default)]
    pub added_at: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenesisState {
    #[serde(default)]
    pub wasms: Vec<GenesisWasm>,
}

impl From<Wasm> for GenesisWasm {
    fn from(wasm: Wasm) -> Self {
        Self {
            hash: wasm.hash,
            bytecode: wasm.bytecode,
            wasm_type: wasm.wasm_type,
            submitter: wasm.submitter,
            added_at: wasm.added_at,
        }
    }
}

pub async fn init_genesis<S: KvStore + ?Sized>(
    keeper: &Keeper,
    kv: &S,
    genesis: &GenesisState,
) -> WasmStorageResult<()> {
    keeper.params().validate()?;
    let store = ArtifactStore::new(kv);
    for entry in &genesis.wasms {
        let computed = content_hash(&entry.bytecode).to_hex();
        if computed != entry.hash {
            return Err(WasmStorageError::InvalidGenesis(format!(
                "hash mismatch for wasm {}: content hashes to {}",
                entry.hash, computed
            )));
        }
        check_size(&entry.bytecode, keeper.params().max_wasm_size)?;
        if store.exists(&entry.hash).await? {
            return Err(WasmStorageError::InvalidGenesis(format!(
                "duplicate wasm {}",
                entry.hash
            )));
        }
        store
            .write_new(&Wasm {
                hash: entry.hash.clone(),
                bytecode: entry.bytecode.clone(),
                wasm_type: entry.wasm_type,
                submitter: entry.submitter.clone(),
                added_at: entry.added_at,
            })
            .await?;
    }
    info!("imported {} wasms from genesis", genesis.wasms.len());
    Ok(())
}

pub async fn export_genesis<S: KvStore + ?Sized>(kv: &S) -> WasmStorageResult<GenesisState> {
    let wasms = ArtifactStore::new(kv)
        .all()
        .await?
        .into_iter()
        .map(GenesisWasm::from)
        .collect();
    Ok(GenesisState { wasms })
}
