use anyhow::Context;
use serde::{Deserialize, Serialize};
use state::{CacheStore, Hash, InMemoryKvStore, KvStore};
use std::fs;
use std::path::Path;
use tracing::{info, warn};
use wasm_storage::{
    init_genesis, GenesisState, Keeper, MsgStoreDataRequestWasm, MsgStoreOverlayWasm, Params,
    WasmType,
};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum TxPayload {
    StoreDataRequestWasm { wasm: Vec<u8>, wasm_type: WasmType },
    StoreOverlayWasm { wasm: Vec<u8>, wasm_type: WasmType },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tx {
    pub chain_id: String,
    pub sender: String,
    pub payload: TxPayload,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Block {
    pub height: u64,
    pub transactions: Vec<Tx>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenesisConfig {
    pub chain_id: String,
    pub params: Params,
    #[serde(default)]
    pub wasm_storage: GenesisState,
}

#[derive(Clone)]
pub struct ExecutionContext {
    pub state: InMemoryKvStore,
    pub chain_id: String,
    pub keeper: Keeper,
}

impl ExecutionContext {
    pub fn new(state: InMemoryKvStore, chain_id: String, keeper: Keeper) -> Self {
        Self {
            state,
            chain_id,
            keeper,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ExecutionOutcome {
    pub hash: Option<String>,
    pub events: Vec<String>,
}

impl ExecutionOutcome {
    pub fn success(hash: String, event: &str) -> Self {
        Self {
            events: vec![format!("{event}:{hash}")],
            hash: Some(hash),
        }
    }
}

#[derive(Debug, Clone)]
pub struct BlockApplyResult {
    pub height: u64,
    pub state_root: Hash,
    pub events: Vec<String>,
}

/// Executes one transaction against `store`. Writes land in `store` only if
/// the transaction succeeds.
pub async fn apply_tx<S: KvStore + ?Sized>(
    ctx: &ExecutionContext,
    store: &S,
    tx: &Tx,
    height: u64,
) -> anyhow::Result<ExecutionOutcome> {
    if tx.chain_id != ctx.chain_id {
        anyhow::bail!("invalid chain id");
    }

    let cache = CacheStore::new(store);
    let outcome = match &tx.payload {
        TxPayload::StoreDataRequestWasm { wasm, wasm_type } => {
            let msg = MsgStoreDataRequestWasm {
                sender: tx.sender.clone(),
                wasm: wasm.clone(),
                wasm_type: *wasm_type,
            };
            let res = ctx
                .keeper
                .store_data_request_wasm(&cache, &msg, height)
                .await?;
            ExecutionOutcome::success(res.hash, "store_data_request_wasm")
        }
        TxPayload::StoreOverlayWasm { wasm, wasm_type } => {
            let msg = MsgStoreOverlayWasm {
                sender: tx.sender.clone(),
                wasm: wasm.clone(),
                wasm_type: *wasm_type,
            };
            let res = ctx.keeper.store_overlay_wasm(&cache, &msg, height).await?;
            ExecutionOutcome::success(res.hash, "store_overlay_wasm")
        }
    };
    cache.write().await?;
    Ok(outcome)
}

/// Applies every transaction of `block` or none of them.
pub async fn apply_block(
    ctx: &ExecutionContext,
    block: &Block,
) -> anyhow::Result<BlockApplyResult> {
    let block_cache = CacheStore::new(&ctx.state);
    let mut events = Vec::new();
    for (index, tx) in block.transactions.iter().enumerate() {
        match apply_tx(ctx, &block_cache, tx, block.height).await {
            Ok(outcome) => events.extend(outcome.events),
            Err(err) => {
                warn!("discarding block {}: tx {} failed: {err}", block.height, index);
                return Err(err.context(format!("tx {index} in block {}", block.height)));
            }
        }
    }
    block_cache.write().await?;
    let state_root = ctx.state.commit().await?;
    Ok(BlockApplyResult {
        height: block.height,
        state_root,
        events,
    })
}

pub fn bootstrap_state(authority: &str) -> ExecutionContext {
    ExecutionContext::new(
        InMemoryKvStore::new(),
        "seda-devnet".into(),
        Keeper::new(Params::new(authority)),
    )
}

pub async fn from_genesis(genesis: GenesisConfig) -> anyhow::Result<ExecutionContext> {
    genesis.params.validate()?;
    let store = InMemoryKvStore::new();
    let keeper = Keeper::new(genesis.params);
    init_genesis(&keeper, &store, &genesis.wasm_storage)
        .await
        .context("wasm storage genesis")?;
    info!(
        "chain {} initialised with {} genesis wasms",
        genesis.chain_id,
        genesis.wasm_storage.wasms.len()
    );
    Ok(ExecutionContext::new(store, genesis.chain_id, keeper))
}

pub async fn load_genesis_from_file(path: impl AsRef<Path>) -> anyhow::Result<ExecutionContext> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)
        .with_context(|| format!("reading genesis from {}", path.display()))?;
    let genesis: GenesisConfig = serde_json::from_str(&contents)?;
    from_genesis(genesis).await
}
