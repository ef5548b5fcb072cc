pub mod codec;
pub mod error;
pub mod genesis;
pub mod guard;
pub mod hash;
pub mod keeper;
pub mod params;
pub mod policy;
pub mod query;
pub mod store;
pub mod types;

pub use error::{WasmStorageError, WasmStorageResult};
pub use genesis::{export_genesis, init_genesis, GenesisState, GenesisWasm};
pub use hash::content_hash;
pub use keeper::{Keeper, Submission};
pub use params::{load_params_from_file, Params, DEFAULT_MAX_WASM_SIZE};
pub use policy::{ClassPolicy, Stage, SubmissionClass, TypeRule};
pub use query::QueryService;
pub use store::ArtifactStore;
pub use types::{
    Ingested, MsgStoreDataRequestWasm, MsgStoreDataRequestWasmResponse, MsgStoreOverlayWasm,
    MsgStoreOverlayWasmResponse, Wasm, WasmHash, WasmSummary, WasmType,
};
