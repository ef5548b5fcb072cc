use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::{WasmStorageError, WasmStorageResult};

pub const DEFAULT_MAX_WASM_SIZE: usize = 800 * 1024;

fn default_max_wasm_size() -> usize {
    DEFAULT_MAX_WASM_SIZE
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Params {
    /// Address allowed to store overlay wasms.
    pub authority: String,
    /// Ceiling on the decompressed wasm length.
    #[serde(default = "default_max_wasm_size")]
    pub max_wasm_size: usize,
}

impl Params {
    pub fn new(authority: impl Into<String>) -> Self {
        Self {
            authority: authority.into(),
            max_wasm_size: DEFAULT_MAX_WASM_SIZE,
        }
    }

    pub fn with_max_wasm_size(mut self, max_wasm_size: usize) -> Self {
        self.max_wasm_size = max_wasm_size;
        self
    }

    pub fn validate(&self) -> WasmStorageResult<()> {
        if self.authority.trim().is_empty() {
            return Err(WasmStorageError::InvalidParams(
                "authority must not be empty".into(),
            ));
        }
        if self.max_wasm_size == 0 {
            return Err(WasmStorageError::InvalidParams(
                "max wasm size must be positive".into(),
            ));
        }
        Ok(())
    }
}

pub fn load_params_from_file(path: impl AsRef<Path>) -> anyhow::Result<Params> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)
        .with_context(|| format!("reading params from {}", path.display()))?;
    let params: Params = serde_json::from_str(&contents).context("invalid params json")?;
    params.validate()?;
    Ok(params)
}
