//! Base64 encoding of receipt images for request payloads.

use std::fs;
use std::path::Path;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;

/// Read a whole file and encode it as standard base64 (padded, unwrapped).
pub fn encode_file(path: &Path) -> std::io::Result<String> {
    let data = fs::read(path)?;
    Ok(encode_bytes(&data))
}

/// Encode raw bytes as standard base64.
pub fn encode_bytes(data: &[u8]) -> String {
    STANDARD.encode(data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_encode_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("receipt.jpg");
        fs::write(&path, b"receipt").unwrap();

        assert_eq!(encode_file(&path).unwrap(), "cmVjZWlwdA==");
    }

    #[test]
    fn test_no_line_wrapping() {
        let encoded = encode_bytes(&[0xffu8; 300]);
        assert!(!encoded.contains('\n'));
        assert_eq!(encoded.len(), 400);
    }

    #[test]
    fn test_unreadable_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(encode_file(&dir.path().join("missing.jpg")).is_err());
    }
}
