//! Payload framing for the remote tier
//!
//! Every payload starts with a one byte codec tag so a value written raw
//! (compression disabled, or compression failed) is always readable.

use crate::config::CompressionAlgorithm;
use crate::utils::error::{CacheError, Result};
use flate2::{Compression as GzipLevel, read::GzDecoder, write::GzEncoder};
use lz4_flex::{compress_prepend_size, decompress_size_prepended};
use std::io::{Read, Write};
use tracing::warn;

const TAG_RAW: u8 = 0;
const TAG_GZIP: u8 = 1;
const TAG_LZ4: u8 = 2;
const TAG_ZSTD: u8 = 3;

const ZSTD_LEVEL: i32 = 3;

/// Frame `data`, compressing it with `algorithm` when one is selected
pub fn compress(data: &[u8], algorithm: Option<CompressionAlgorithm>) -> Vec<u8> {
    let Some(algorithm) = algorithm else {
        return frame(TAG_RAW, data.to_vec());
    };

    let compressed = match algorithm {
        CompressionAlgorithm::Gzip => gzip(data).map(|out| (TAG_GZIP, out)),
        CompressionAlgorithm::Lz4 => Ok((TAG_LZ4, compress_prepend_size(data))),
        CompressionAlgorithm::Zstd => zstd::encode_all(data, ZSTD_LEVEL).map(|out| (TAG_ZSTD, out)),
    };

    match compressed {
        Ok((tag, out)) => frame(tag, out),
        Err(e) => {
            warn!("{} compression failed, storing payload uncompressed: {}", algorithm, e);
            frame(TAG_RAW, data.to_vec())
        }
    }
}

/// Undo [`compress`]
pub fn decompress(payload: &[u8]) -> Result<Vec<u8>> {
    let (tag, body) = payload
        .split_first()
        .ok_or_else(|| CacheError::compression("empty payload"))?;

    match *tag {
        TAG_RAW => Ok(body.to_vec()),
        TAG_GZIP => {
            let mut out = Vec::new();
            GzDecoder::new(body)
                .read_to_end(&mut out)
                .map_err(|e| CacheError::compression(format!("gzip: {}", e)))?;
            Ok(out)
        }
        TAG_LZ4 => decompress_size_prepended(body)
            .map_err(|e| CacheError::compression(format!("lz4: {}", e))),
        TAG_ZSTD => {
            zstd::decode_all(body).map_err(|e| CacheError::compression(format!("zstd: {}", e)))
        }
        other => Err(CacheError::compression(format!(
            "unknown codec tag {}",
            other
        ))),
    }
}

fn frame(tag: u8, body: Vec<u8>) -> Vec<u8> {
    let mut payload = Vec::with_capacity(body.len() + 1);
    payload.push(tag);
    payload.extend_from_slice(&body);
    payload
}

fn gzip(data: &[u8]) -> std::io::Result<Vec<u8>> {
    let mut encoder = GzEncoder::new(Vec::new(), GzipLevel::default());
    encoder.write_all(data)?;
    encoder.finish()
}
