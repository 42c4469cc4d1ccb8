//! zstd compression layer for persisted artifacts.

use std::io::Read;

/// Compression level used for every artifact.
const LEVEL: i32 = 3;

/// Error produced by zstd compression or decompression.
#[derive(Debug)]
pub enum CompressionError {
    /// The zstd encoder or decoder failed.
    Io(std::io::Error),
    /// Decompressed output exceeded the caller's size limit.
    TooLarge {
        /// The limit in bytes.
        limit: u64,
    },
}

impl std::fmt::Display for CompressionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CompressionError::Io(e) => write!(f, "zstd error: {e}"),
            CompressionError::TooLarge { limit } => {
                write!(f, "decompressed payload exceeds {limit} bytes")
            }
        }
    }
}

impl std::error::Error for CompressionError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CompressionError::Io(e) => Some(e),
            CompressionError::TooLarge { .. } => None,
        }
    }
}

/// Wraps `bytes` in a zstd frame.
pub fn compress_zstd(bytes: &[u8]) -> Result<Vec<u8>, CompressionError> {
    zstd::stream::encode_all(bytes, LEVEL).map_err(CompressionError::Io)
}

/// Decompresses a zstd frame, refusing to produce more than `max_size` bytes.
pub fn decompress_zstd(bytes: &[u8], max_size: u64) -> Result<Vec<u8>, CompressionError> {
    let decoder = zstd::stream::read::Decoder::new(bytes).map_err(CompressionError::Io)?;
    let mut out = Vec::new();
    decoder
        .take(max_size.saturating_add(1))
        .read_to_end(&mut out)
        .map_err(CompressionError::Io)?;
    if out.len() as u64 > max_size {
        return Err(CompressionError::TooLarge { limit: max_size });
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used)]

    use super::*;
    use crate::encoding::ZSTD_MAGIC;

    #[test]
    fn compressed_output_starts_with_magic() {
        let packed = compress_zstd(b"{\"artifact\":\"graph\"}").expect("compress");
        assert!(packed.starts_with(&ZSTD_MAGIC));
        let unpacked = decompress_zstd(&packed, 1024).expect("decompress");
        assert_eq!(unpacked, b"{\"artifact\":\"graph\"}");
    }

    #[test]
    fn oversized_output_is_refused() {
        let packed = compress_zstd(&[b'x'; 4096]).expect("compress");
        let err = decompress_zstd(&packed, 100).expect_err("too large");
        assert!(matches!(err, CompressionError::TooLarge { limit: 100 }));
    }
}
