//! Inflate ROOT compressed records.
//!
//! A compressed object is a sequence of blocks, each with a 9-byte header:
//! ```text
//! 0-1  algorithm tag: "ZL" zlib, "L4" LZ4, "ZS" ZSTD, "XZ" LZMA
//! 2    method byte (unused)
//! 3-5  compressed size, 24-bit little-endian
//! 6-8  uncompressed size, 24-bit little-endian
//! ```
//! Large objects are split into several blocks that concatenate to the
//! uncompressed payload.

use std::io::Read;

use crate::error::{Result, RootError};

const HEADER_LEN: usize = 9;
/// LZ4 blocks carry an 8-byte xxhash64 checksum ahead of the frame.
const LZ4_CHECKSUM_LEN: usize = 8;

/// Inflate `src` into exactly `expected_len` bytes.
pub fn decompress(src: &[u8], expected_len: usize) -> Result<Vec<u8>> {
    let mut out = Vec::with_capacity(expected_len);
    let mut rest = src;

    while out.len() < expected_len {
        if rest.len() < HEADER_LEN {
            return Err(RootError::Decompression(format!(
                "truncated block header after {} of {expected_len} bytes",
                out.len()
            )));
        }
        let (header, body) = rest.split_at(HEADER_LEN);
        let c_size = le24(&header[3..6]);
        let u_size = le24(&header[6..9]);
        if c_size > body.len() {
            return Err(RootError::Decompression(format!(
                "block claims {c_size} compressed bytes, {} remain",
                body.len()
            )));
        }
        let (block, tail) = body.split_at(c_size);

        let inflated = match &header[..2] {
            b"ZL" => zlib(block, u_size)?,
            b"L4" => lz4(block, u_size)?,
            b"ZS" => zstd(block, u_size)?,
            b"XZ" => xz(block, u_size)?,
            tag => {
                return Err(RootError::Decompression(format!(
                    "unknown algorithm tag {:?}",
                    String::from_utf8_lossy(tag)
                )));
            }
        };
        if inflated.len() != u_size {
            return Err(RootError::Decompression(format!(
                "block inflated to {} bytes, header says {u_size}",
                inflated.len()
            )));
        }
        out.extend_from_slice(&inflated);
        rest = tail;
    }

    if out.len() != expected_len {
        return Err(RootError::Decompression(format!(
            "payload inflated to {} bytes, key says {expected_len}",
            out.len()
        )));
    }
    Ok(out)
}

fn zlib(block: &[u8], expected: usize) -> Result<Vec<u8>> {
    let mut out = Vec::with_capacity(expected);
    flate2::read::ZlibDecoder::new(block)
        .read_to_end(&mut out)
        .map_err(|e| RootError::Decompression(format!("zlib: {e}")))?;
    Ok(out)
}

fn lz4(block: &[u8], expected: usize) -> Result<Vec<u8>> {
    let frame = block
        .get(LZ4_CHECKSUM_LEN..)
        .ok_or_else(|| RootError::Decompression("lz4: block shorter than checksum".into()))?;
    lz4_flex::decompress(frame, expected).map_err(|e| RootError::Decompression(format!("lz4: {e}")))
}

fn zstd(block: &[u8], expected: usize) -> Result<Vec<u8>> {
    let mut out = vec![0u8; expected];
    let written = ruzstd::decoding::FrameDecoder::new()
        .decode_all(block, &mut out)
        .map_err(|e| RootError::Decompression(format!("zstd: {e}")))?;
    out.truncate(written);
    Ok(out)
}

fn xz(block: &[u8], expected: usize) -> Result<Vec<u8>> {
    let mut out = Vec::with_capacity(expected);
    lzma_rs::xz_decompress(&mut std::io::BufReader::new(block), &mut out)
        .map_err(|e| RootError::Decompression(format!("xz: {e}")))?;
    Ok(out)
}

fn le24(b: &[u8]) -> usize {
    usize::from(b[0]) | usize::from(b[1]) << 8 | usize::from(b[2]) << 16
}

#[cfg(test)]
mod tests {
    use super::*;

    fn block(tag: &[u8; 2], compressed: &[u8], u_len: usize) -> Vec<u8> {
        let mut out = tag.to_vec();
        out.push(0);
        out.extend_from_slice(&(compressed.len() as u32).to_le_bytes()[..3]);
        out.extend_from_slice(&(u_len as u32).to_le_bytes()[..3]);
        out.extend_from_slice(compressed);
        out
    }

    const PAYLOAD: &[u8] = b"Occupancy_W+0_RB1_S01 Occupancy_W+0_RB1_S01 Occupancy_W+0_RB1_S01";

    #[test]
    fn le24_reads_little_endian() {
        assert_eq!(le24(&[0x01, 0x00, 0x00]), 1);
        assert_eq!(le24(&[0x00, 0x01, 0x00]), 256);
        assert_eq!(le24(&[0xff, 0xff, 0xff]), 0xFF_FFFF);
    }

    #[test]
    fn zlib_block() {
        use std::io::Write;
        let mut enc = flate2::write::ZlibEncoder::new(Vec::new(), flate2::Compression::best());
        enc.write_all(PAYLOAD).unwrap();
        let src = block(b"ZL", &enc.finish().unwrap(), PAYLOAD.len());
        assert_eq!(decompress(&src, PAYLOAD.len()).unwrap(), PAYLOAD);
    }

    #[test]
    fn multi_block_payload_concatenates() {
        use std::io::Write;
        let (a, b) = PAYLOAD.split_at(20);
        let mut src = Vec::new();
        for part in [a, b] {
            let mut enc = flate2::write::ZlibEncoder::new(Vec::new(), flate2::Compression::fast());
            enc.write_all(part).unwrap();
            src.extend(block(b"ZL", &enc.finish().unwrap(), part.len()));
        }
        assert_eq!(decompress(&src, PAYLOAD.len()).unwrap(), PAYLOAD);
    }

    #[test]
    fn lz4_block_skips_checksum() {
        let mut body = vec![0u8; LZ4_CHECKSUM_LEN];
        body.extend(lz4_flex::compress(PAYLOAD));
        let src = block(b"L4", &body, PAYLOAD.len());
        assert_eq!(decompress(&src, PAYLOAD.len()).unwrap(), PAYLOAD);
    }

    #[test]
    fn zstd_block() {
        let compressed =
            ruzstd::encoding::compress_to_vec(PAYLOAD, ruzstd::encoding::CompressionLevel::Fastest);
        let src = block(b"ZS", &compressed, PAYLOAD.len());
        assert_eq!(decompress(&src, PAYLOAD.len()).unwrap(), PAYLOAD);
    }

    #[test]
    fn xz_block() {
        let mut compressed = Vec::new();
        lzma_rs::xz_compress(&mut std::io::BufReader::new(PAYLOAD), &mut compressed).unwrap();
        let src = block(b"XZ", &compressed, PAYLOAD.len());
        assert_eq!(decompress(&src, PAYLOAD.len()).unwrap(), PAYLOAD);
    }

    #[test]
    fn unknown_tag_is_rejected() {
        let src = block(b"QQ", b"abc", 3);
        assert!(matches!(decompress(&src, 3), Err(RootError::Decompression(_))));
    }

    #[test]
    fn truncated_block_is_rejected() {
        let mut src = block(b"ZL", &[0u8; 10], 10);
        src.truncate(12);
        assert!(matches!(decompress(&src, 10), Err(RootError::Decompression(_))));
    }
}
