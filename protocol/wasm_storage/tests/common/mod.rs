#![allow(dead_code)]

use flate2::write::GzEncoder;
use flate2::{Compression, GzBuilder};
use std::io::Write;
use wasm_storage::{Keeper, Params};

pub const AUTHORITY: &str = "seda10d07y265gmmuvt4z0w9aw880jnsr700jvvla4j";
pub const OUTSIDER: &str = "seda16wfryel63g7axeamw68630wglalcnk3l0zuadc";
pub const MAX_WASM_SIZE: usize = 4 * 1024;

pub fn hello_world_wasm() -> Vec<u8> {
    let mut module = b"\0asm\x01\0\0\0".to_vec();
    // type section: one func type () -> ()
    module.extend_from_slice(&[0x01, 0x04, 0x01, 0x60, 0x00, 0x00]);
    // function section
    module.extend_from_slice(&[0x03, 0x02, 0x01, 0x00]);
    // export "hello"
    module.extend_from_slice(&[0x07, 0x09, 0x01, 0x05, b'h', b'e', b'l', b'l', b'o', 0x00, 0x00]);
    // code section: empty body
    module.extend_from_slice(&[0x0a, 0x04, 0x01, 0x02, 0x00, 0x0b]);
    module
}

pub fn oversized_wasm() -> Vec<u8> {
    let mut module = hello_world_wasm();
    module.resize(MAX_WASM_SIZE * 2, 0);
    module
}

pub fn gzip(bytes: &[u8]) -> Vec<u8> {
    gzip_with(bytes, Compression::default())
}

pub fn gzip_with(bytes: &[u8], level: Compression) -> Vec<u8> {
    let mut encoder = GzEncoder::new(Vec::new(), level);
    encoder.write_all(bytes).unwrap();
    encoder.finish().unwrap()
}

pub fn gzip_named(bytes: &[u8], filename: &str, mtime: u32) -> Vec<u8> {
    let mut encoder = GzBuilder::new()
        .filename(filename)
        .mtime(mtime)
        .write(Vec::new(), Compression::fast());
    encoder.write_all(bytes).unwrap();
    encoder.finish().unwrap()
}

pub fn keccak_hex(bytes: &[u8]) -> String {
    use sha3::{Digest, Keccak256};
    hex::encode(Keccak256::digest(bytes))
}

pub fn keeper() -> Keeper {
    Keeper::new(Params::new(AUTHORITY).with_max_wasm_size(MAX_WASM_SIZE))
}
