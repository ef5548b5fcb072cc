use flate2::read::MultiGzDecoder;
use std::io::Read;

use crate::error::{WasmStorageError, WasmStorageResult};
use crate::policy::ClassPolicy;
use crate::types::WasmType;

const GZIP_MAGIC: [u8; 3] = [0x1f, 0x8b, 0x08];

pub fn is_gzip(raw: &[u8]) -> bool {
    raw.starts_with(&GZIP_MAGIC)
}

/// Inflates a gzip payload, reading at most `limit + 1` bytes so an
/// oversized payload is caught by [`check_size`] without inflating it fully.
pub fn decompress(raw: &[u8], limit: usize) -> WasmStorageResult<Vec<u8>> {
    if !is_gzip(raw) {
        return Err(WasmStorageError::NotCompressed);
    }
    let cap = (limit as u64).saturating_add(1);
    let mut out = Vec::new();
    MultiGzDecoder::new(raw)
        .take(cap)
        .read_to_end(&mut out)
        .map_err(|_| WasmStorageError::NotCompressed)?;
    Ok(out)
}

pub fn check_size(bytes: &[u8], max: usize) -> WasmStorageResult<()> {
    if bytes.len() > max {
        return Err(WasmStorageError::TooLarge { max });
    }
    Ok(())
}

pub fn validate_type(policy: &ClassPolicy, wasm_type: WasmType) -> WasmStorageResult<()> {
    if policy.types.allows(wasm_type) {
        Ok(())
    } else {
        Err(WasmStorageError::InvalidWasmType {
            reason: policy.type_error,
            wasm_type,
        })
    }
}

pub fn authorize(sender: &str, authority: &str) -> WasmStorageResult<()> {
    if sender != authority {
        return Err(WasmStorageError::Unauthorized {
            expected: authority.to_string(),
            sender: sender.to_string(),
        });
    }
    Ok(())
}
