use state::StateError;
use thiserror::Error;

use crate::policy::SubmissionClass;
use crate::types::WasmType;

#[derive(Debug, Error)]
pub enum WasmStorageError {
    #[error("wasm is not gzip compressed")]
    NotCompressed,
    #[error("wasm size exceeds maximum of {max} bytes")]
    TooLarge { max: usize },
    #[error("{reason}; got {wasm_type}")]
    InvalidWasmType {
        reason: &'static str,
        wasm_type: WasmType,
    },
    #[error("invalid authority; expected {expected}, got {sender}")]
    Unauthorized { expected: String, sender: String },
    #[error("{}", .class.duplicate_message())]
    AlreadyExists { class: SubmissionClass, hash: String },
    #[error("wasm with hash {0} not found")]
    NotFound(String),
    #[error("invalid params: {0}")]
    InvalidParams(String),
    #[error("invalid genesis: {0}")]
    InvalidGenesis(String),
    #[error("corrupt wasm record {hash}: {reason}")]
    Codec { hash: String, reason: String },
    #[error(transparent)]
    State(#[from] StateError),
}

pub type WasmStorageResult<T> = Result<T, WasmStorageError>;
