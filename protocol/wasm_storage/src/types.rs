use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WasmType {
    Nil,
    DataRequest,
    Tally,
    DataRequestExecutor,
    Relayer,
}

impl WasmType {
    pub const ALL: [WasmType; 5] = [
        WasmType::Nil,
        WasmType::DataRequest,
        WasmType::Tally,
        WasmType::DataRequestExecutor,
        WasmType::Relayer,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            WasmType::Nil => "nil",
            WasmType::DataRequest => "data-request",
            WasmType::Tally => "tally",
            WasmType::DataRequestExecutor => "data-request-executor",
            WasmType::Relayer => "relayer",
        }
    }
}

impl fmt::Display for WasmType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Keccak-256 digest of canonical (decompressed) wasm bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WasmHash([u8; 32]);

impl WasmHash {
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Display for WasmHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Wasm {
    pub hash: String,
    pub bytecode: Vec<u8>,
    pub wasm_type: WasmType,
    pub submitter: String,
    pub added_at: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WasmSummary {
    pub hash: String,
    pub wasm_type: WasmType,
    pub added_at: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MsgStoreDataRequestWasm {
    pub sender: String,
    pub wasm: Vec<u8>,
    pub wasm_type: WasmType,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MsgStoreDataRequestWasmResponse {
    pub hash: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MsgStoreOverlayWasm {
    pub sender: String,
    pub wasm: Vec<u8>,
    pub wasm_type: WasmType,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MsgStoreOverlayWasmResponse {
    pub hash: String,
}

/// Outcome of a completed ingestion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ingested {
    pub hash: WasmHash,
    pub wasm_type: WasmType,
    pub submitter: String,
}
