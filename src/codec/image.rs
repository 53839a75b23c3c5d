//! Base64 transport encoding for image files

use crate::{Error, Result};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use std::fs;
use std::path::Path;

/// Encode raw bytes with the standard padded alphabet
pub fn encode_bytes(data: &[u8]) -> String {
    STANDARD.encode(data)
}

/// Decode standard padded base64, ignoring ASCII whitespace anywhere in the input
///
/// Line-wrapped (MIME or PEM style) text decodes the same as a single line.
pub fn decode_str(encoded: &str) -> Result<Vec<u8>> {
    let compact: Vec<u8> = encoded
        .bytes()
        .filter(|b| !b.is_ascii_whitespace())
        .collect();
    Ok(STANDARD.decode(compact)?)
}

/// Read the file at `path` and return its contents as base64
pub fn encode_image_into_base64(path: impl AsRef<Path>) -> Result<String> {
    let path = path.as_ref();
    let data = fs::read(path).map_err(|e| Error::io(path, e))?;
    Ok(encode_bytes(&data))
}

/// Decode `encoded` and write the bytes to `path`, overwriting it
///
/// Nothing is written when `encoded` is not valid base64.
pub fn decode_image(encoded: &str, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    let data = decode_str(encoded)?;
    fs::write(path, data).map_err(|e| Error::io(path, e))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    // 1x1 transparent PNG
    const PIXEL: &str = "iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAQAAAC1HAwCAAAAC0lEQVR42mNkYAAAAAYAAjCB0C8AAAAASUVORK5CYII=";

    #[test]
    fn test_encode_known_value() {
        assert_eq!(encode_bytes(b"hello"), "aGVsbG8=");
        assert_eq!(decode_str(" aGVsbG8=\n").unwrap(), b"hello");
    }

    #[test]
    fn test_decode_wrapped_lines() {
        assert_eq!(decode_str("aGVs\nbG8=").unwrap(), b"hello");
        assert_eq!(decode_str("aGVs\r\n bG8=\r\n").unwrap(), b"hello");

        let wrapped: String = PIXEL
            .as_bytes()
            .chunks(16)
            .map(|line| format!("{}\n", std::str::from_utf8(line).unwrap()))
            .collect();
        let dir = tempdir().unwrap();
        let path = dir.path().join("wrapped.png");
        decode_image(&wrapped, &path).unwrap();
        assert_eq!(encode_image_into_base64(&path).unwrap(), PIXEL);
    }

    #[test]
    fn test_decode_then_encode_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("pixel.png");

        decode_image(PIXEL, &path).unwrap();
        let bytes = fs::read(&path).unwrap();
        assert_eq!(&bytes[1..4], b"PNG");

        assert_eq!(encode_image_into_base64(&path).unwrap(), PIXEL);
    }

    #[test]
    fn test_invalid_base64_writes_nothing() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out.png");

        let err = decode_image("not base64!!", &path).unwrap_err();
        assert!(matches!(err, Error::Base64(_)));
        assert!(!path.exists());
    }

    #[test]
    fn test_encode_missing_file() {
        let dir = tempdir().unwrap();
        let err = encode_image_into_base64(dir.path().join("absent.jpg")).unwrap_err();
        assert!(err.is_not_found());
    }
}
