//! Tile layer data decoding: CSV, base64, and base64 with gzip/zlib
//! compression, per the TMJ/TMX `data` encodings.

use base64::Engine;
use flate2::read::{GzDecoder, ZlibDecoder};
use std::io::Read;

use crate::error::{EngineError, EngineResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Compression {
    None,
    Gzip,
    Zlib,
}

pub fn decode_csv(text: &str) -> EngineResult<Vec<u32>> {
    text.split(',')
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse::<u32>().map_err(|e| EngineError::DecodeError {
                path: "<csv layer data>".into(),
                reason: e.to_string(),
            })
        })
        .collect()
}

pub fn decode_base64(text: &str, compression: Compression) -> EngineResult<Vec<u32>> {
    let raw = base64::engine::general_purpose::STANDARD
        .decode(text.trim())
        .map_err(|e| EngineError::DecodeError {
            path: "<base64 layer data>".into(),
            reason: e.to_string(),
        })?;

    let bytes = match compression {
        Compression::None => raw,
        Compression::Gzip => {
            let mut out = Vec::new();
            GzDecoder::new(&raw[..])
                .read_to_end(&mut out)
                .map_err(|e| EngineError::DecodeError {
                    path: "<gzip layer data>".into(),
                    reason: e.to_string(),
                })?;
            out
        }
        Compression::Zlib => {
            let mut out = Vec::new();
            ZlibDecoder::new(&raw[..])
                .read_to_end(&mut out)
                .map_err(|e| EngineError::DecodeError {
                    path: "<zlib layer data>".into(),
                    reason: e.to_string(),
                })?;
            out
        }
    };

    if bytes.len() % 4 != 0 {
        return Err(EngineError::DecodeError {
            path: "<layer data>".into(),
            reason: format!("byte length {} is not a multiple of 4", bytes.len()),
        });
    }

    Ok(bytes
        .chunks_exact(4)
        .map(|c| u32::from_le_bytes([c[0], c[1], c[2], c[3]]))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn csv_parses_comma_separated_gids() {
        let gids = decode_csv("1, 2, 3,4").unwrap();
        assert_eq!(gids, vec![1, 2, 3, 4]);
    }

    #[test]
    fn csv_rejects_garbage() {
        assert!(decode_csv("1, x, 3").is_err());
    }

    #[test]
    fn base64_roundtrips_without_compression() {
        let gids: Vec<u32> = vec![1, 2, 300, 65536];
        let bytes: Vec<u8> = gids.iter().flat_map(|g| g.to_le_bytes()).collect();
        let encoded = base64::engine::general_purpose::STANDARD.encode(&bytes);
        let decoded = decode_base64(&encoded, Compression::None).unwrap();
        assert_eq!(decoded, gids);
    }

    #[test]
    fn base64_zlib_roundtrips() {
        use flate2::write::ZlibEncoder;
        use flate2::Compression as FlateLevel;
        use std::io::Write;

        let gids: Vec<u32> = vec![7, 8, 9];
        let bytes: Vec<u8> = gids.iter().flat_map(|g| g.to_le_bytes()).collect();
        let mut encoder = ZlibEncoder::new(Vec::new(), FlateLevel::default());
        encoder.write_all(&bytes).unwrap();
        let compressed = encoder.finish().unwrap();
        let encoded = base64::engine::general_purpose::STANDARD.encode(&compressed);

        let decoded = decode_base64(&encoded, Compression::Zlib).unwrap();
        assert_eq!(decoded, gids);
    }

    #[test]
    fn malformed_base64_is_a_decode_error() {
        assert!(decode_base64("not valid base64!!", Compression::None).is_err());
    }
}
