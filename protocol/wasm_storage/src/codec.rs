use flate2::read::GzDecoder;
use flate2::{Compression, GzBuilder};
use std::io::{Read, Write};

// Fixed header and level keep the at-rest encoding identical on every node.
pub fn compress_at_rest(canonical: &[u8]) -> std::io::Result<Vec<u8>> {
    let mut encoder = GzBuilder::new()
        .mtime(0)
        .write(Vec::new(), Compression::best());
    encoder.write_all(canonical)?;
    encoder.finish()
}

pub fn inflate_at_rest(stored: &[u8]) -> std::io::Result<Vec<u8>> {
    let mut out = Vec::new();
    GzDecoder::new(stored).read_to_end(&mut out)?;
    Ok(out)
}
