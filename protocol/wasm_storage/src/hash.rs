use sha3::{Digest, Keccak256};

use crate::types::WasmHash;

/// Content identifier over canonical bytes. Never call this on the at-rest
/// encoding.
pub fn content_hash(canonical: &[u8]) -> WasmHash {
    WasmHash::from_bytes(Keccak256::digest(canonical).into())
}
