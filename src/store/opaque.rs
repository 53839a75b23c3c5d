//! Versioned envelope for opaque records
//!
//! File format:
//! ```text
//! [HEADER: 64 bytes]
//!   - magic: 8 bytes ("FILEBOX\x01")
//!   - version: 4 bytes (u32 LE)
//!   - flags: 4 bytes (bit 0: payload is zstd-compressed)
//!   - payload_len: 8 bytes (u64 LE)
//!   - checksum: 32 bytes (BLAKE3 of the stored payload)
//!   - reserved: 8 bytes
//!
//! [PAYLOAD: payload_len bytes]
//!   - bincode-encoded record, optionally zstd-compressed
//! ```

use super::StoreOptions;
use crate::model::Checksum;
use crate::{Error, Result, MAGIC, VERSION};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::borrow::Cow;
use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

/// Size of the fixed envelope header in bytes
pub const HEADER_SIZE: usize = 64;

const FLAG_ZSTD: u32 = 1;

/// Decoded envelope header
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OpaqueHeader {
    pub version: u32,
    pub compressed: bool,
    /// Stored (possibly compressed) payload length
    pub payload_len: u64,
    pub checksum: Checksum,
}

impl OpaqueHeader {
    fn encode(&self) -> [u8; HEADER_SIZE] {
        let flags = if self.compressed { FLAG_ZSTD } else { 0 };

        let mut header = [0u8; HEADER_SIZE];
        header[0..8].copy_from_slice(MAGIC);
        header[8..12].copy_from_slice(&self.version.to_le_bytes());
        header[12..16].copy_from_slice(&flags.to_le_bytes());
        header[16..24].copy_from_slice(&self.payload_len.to_le_bytes());
        header[24..56].copy_from_slice(self.checksum.as_bytes());
        // reserved: 56..64
        header
    }

    fn decode(bytes: &[u8]) -> Result<Self> {
        if bytes.len() < HEADER_SIZE {
            return Err(Error::InvalidFile(format!(
                "{} bytes is shorter than the {}-byte header",
                bytes.len(),
                HEADER_SIZE
            )));
        }

        if &bytes[0..8] != MAGIC {
            return Err(Error::InvalidFile("Invalid magic bytes".into()));
        }

        let version = read_u32(&bytes[8..12]);
        if version != VERSION {
            return Err(Error::VersionMismatch {
                expected: VERSION,
                found: version,
            });
        }

        let flags = read_u32(&bytes[12..16]);
        if flags & !FLAG_ZSTD != 0 {
            return Err(Error::InvalidFile(format!("Unknown flags: {:#x}", flags)));
        }

        let payload_len = read_u64(&bytes[16..24]);

        let mut digest = [0u8; Checksum::LEN];
        digest.copy_from_slice(&bytes[24..56]);

        Ok(OpaqueHeader {
            version,
            compressed: flags & FLAG_ZSTD != 0,
            payload_len,
            checksum: Checksum::from_bytes(digest),
        })
    }
}

fn read_u32(bytes: &[u8]) -> u32 {
    let mut buf = [0u8; 4];
    buf.copy_from_slice(&bytes[..4]);
    u32::from_le_bytes(buf)
}

fn read_u64(bytes: &[u8]) -> u64 {
    let mut buf = [0u8; 8];
    buf.copy_from_slice(&bytes[..8]);
    u64::from_le_bytes(buf)
}

/// Serialize `record` into a complete envelope
pub(crate) fn encode_record<T: Serialize + ?Sized>(
    record: &T,
    options: &StoreOptions,
) -> Result<Vec<u8>> {
    let raw = bincode::serialize(record)?;
    let payload = if options.compress_opaque {
        zstd::encode_all(raw.as_slice(), options.compression_level)?
    } else {
        raw
    };

    let header = OpaqueHeader {
        version: VERSION,
        compressed: options.compress_opaque,
        payload_len: payload.len() as u64,
        checksum: Checksum::digest(&payload),
    };

    let mut out = Vec::with_capacity(HEADER_SIZE + payload.len());
    out.extend_from_slice(&header.encode());
    out.extend_from_slice(&payload);
    Ok(out)
}

/// Verify an envelope and reconstruct the record inside
pub(crate) fn decode_record<T: DeserializeOwned>(bytes: &[u8]) -> Result<T> {
    let header = OpaqueHeader::decode(bytes)?;
    let payload = &bytes[HEADER_SIZE..];

    if payload.len() as u64 != header.payload_len {
        return Err(Error::Corruption(format!(
            "Expected {} payload bytes, found {}",
            header.payload_len,
            payload.len()
        )));
    }
    if !header.checksum.verify(payload) {
        return Err(Error::Corruption("Payload checksum mismatch".into()));
    }

    let raw: Cow<[u8]> = if header.compressed {
        Cow::Owned(zstd::decode_all(payload)?)
    } else {
        Cow::Borrowed(payload)
    };

    Ok(bincode::deserialize(&raw)?)
}

/// Read only the header of the envelope at `path`
pub(crate) fn read_header(path: &Path) -> Result<OpaqueHeader> {
    let mut file = File::open(path).map_err(|e| Error::io(path, e))?;
    let mut header = [0u8; HEADER_SIZE];
    match file.read_exact(&mut header) {
        Ok(()) => OpaqueHeader::decode(&header),
        Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => Err(Error::InvalidFile(format!(
            "{} is shorter than the {}-byte header",
            path.display(),
            HEADER_SIZE
        ))),
        Err(e) => Err(Error::io(path, e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use std::collections::BTreeMap;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Checkpoint {
        name: String,
        epoch: u32,
        weights: Vec<f32>,
        classes: BTreeMap<String, u8>,
    }

    fn checkpoint() -> Checkpoint {
        Checkpoint {
            name: "vgg16-base".into(),
            epoch: 3,
            weights: vec![0.25, -1.5, 3.0],
            classes: [("cat".to_string(), 0), ("dog".to_string(), 1)]
                .into_iter()
                .collect(),
        }
    }

    #[test]
    fn test_envelope_roundtrip() {
        let bytes = encode_record(&checkpoint(), &StoreOptions::default()).unwrap();
        assert_eq!(&bytes[0..8], MAGIC);

        let header = OpaqueHeader::decode(&bytes).unwrap();
        assert_eq!(header.version, VERSION);
        assert!(!header.compressed);
        assert_eq!(header.payload_len as usize, bytes.len() - HEADER_SIZE);

        let restored: Checkpoint = decode_record(&bytes).unwrap();
        assert_eq!(restored, checkpoint());
    }

    #[test]
    fn test_compressed_roundtrip() {
        let options = StoreOptions::default().with_compression(3);
        let bytes = encode_record(&checkpoint(), &options).unwrap();

        assert!(OpaqueHeader::decode(&bytes).unwrap().compressed);
        let restored: Checkpoint = decode_record(&bytes).unwrap();
        assert_eq!(restored, checkpoint());
    }

    #[test]
    fn test_rejects_bad_magic() {
        let mut bytes = encode_record(&checkpoint(), &StoreOptions::default()).unwrap();
        bytes[0] = b'X';
        let err = decode_record::<Checkpoint>(&bytes).unwrap_err();
        assert!(matches!(err, Error::InvalidFile(_)));
    }

    #[test]
    fn test_rejects_other_version() {
        let mut bytes = encode_record(&checkpoint(), &StoreOptions::default()).unwrap();
        bytes[8..12].copy_from_slice(&2u32.to_le_bytes());
        let err = decode_record::<Checkpoint>(&bytes).unwrap_err();
        assert!(matches!(
            err,
            Error::VersionMismatch {
                expected: 1,
                found: 2
            }
        ));
    }

    #[test]
    fn test_rejects_unknown_flags() {
        let mut bytes = encode_record(&checkpoint(), &StoreOptions::default()).unwrap();
        bytes[12..16].copy_from_slice(&0x10u32.to_le_bytes());
        let err = decode_record::<Checkpoint>(&bytes).unwrap_err();
        assert!(matches!(err, Error::InvalidFile(_)));
    }

    #[test]
    fn test_detects_corruption() {
        let mut bytes = encode_record(&checkpoint(), &StoreOptions::default()).unwrap();
        let last = bytes.len() - 1;
        bytes[last] ^= 0xff;
        let err = decode_record::<Checkpoint>(&bytes).unwrap_err();
        assert!(matches!(err, Error::Corruption(_)));

        let bytes = encode_record(&checkpoint(), &StoreOptions::default()).unwrap();
        let err = decode_record::<Checkpoint>(&bytes[..bytes.len() - 4]).unwrap_err();
        assert!(matches!(err, Error::Corruption(_)));
    }

    #[test]
    fn test_rejects_truncated_header() {
        let err = decode_record::<Checkpoint>(b"FILEBOX").unwrap_err();
        assert!(matches!(err, Error::InvalidFile(_)));
    }
}
