use std::fs;
use std::path::Path;

use super::error::ScanError;

/// Smallest byte count accepted as audio. Anything shorter cannot hold a
/// valid container header and is rejected before the network call.
const MIN_PAYLOAD_BYTES: usize = 10;

/// Largest byte count accepted as audio (10 MB), checked before the
/// payload is base64-inlined into a request body.
const MAX_PAYLOAD_BYTES: usize = 10 * 1024 * 1024;

/// MIME type assumed for imported files whose magic bytes are unrecognized.
const FALLBACK_MIME: &str = "audio/mpeg";

/// An opaque, finite audio blob plus its content type.
///
/// Produced exactly once per session, either by encoding a live capture
/// or by importing a user-supplied file, and consumed by the
/// classification client. Never mutated after construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioPayload {
    bytes: Vec<u8>,
    mime_type: String,
}

impl AudioPayload {
    /// Wrap already-encoded audio bytes with a known MIME type.
    pub fn new(bytes: Vec<u8>, mime_type: impl Into<String>) -> Result<Self, ScanError> {
        if bytes.len() < MIN_PAYLOAD_BYTES {
            return Err(ScanError::InvalidPayload(format!(
                "audio too short ({} bytes)",
                bytes.len()
            )));
        }
        if bytes.len() > MAX_PAYLOAD_BYTES {
            return Err(ScanError::InvalidPayload(format!(
                "audio too large ({} bytes, limit {})",
                bytes.len(),
                MAX_PAYLOAD_BYTES
            )));
        }
        Ok(Self {
            bytes,
            mime_type: mime_type.into(),
        })
    }

    /// Import a user-selected file's bytes directly, without re-encoding.
    ///
    /// The MIME type is sniffed from the leading magic bytes; unknown
    /// formats are tagged `audio/mpeg` and left for the remote engine to
    /// judge.
    pub fn from_file(path: &Path) -> Result<Self, ScanError> {
        let bytes = fs::read(path)
            .map_err(|e| ScanError::InvalidPayload(format!("{}: {}", path.display(), e)))?;
        Self::from_bytes(bytes)
    }

    /// Import raw file bytes directly, sniffing the MIME type.
    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self, ScanError> {
        let mime = infer::get(&bytes)
            .map(|kind| kind.mime_type().to_string())
            .unwrap_or_else(|| FALLBACK_MIME.to_string());
        Self::new(bytes, mime)
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_tiny_payloads() {
        let err = AudioPayload::new(vec![0u8; 4], "audio/wav").unwrap_err();
        assert!(matches!(err, ScanError::InvalidPayload(_)));
    }

    #[test]
    fn rejects_oversized_payloads() {
        let err = AudioPayload::new(vec![0u8; MAX_PAYLOAD_BYTES + 1], "audio/wav").unwrap_err();
        assert!(matches!(err, ScanError::InvalidPayload(_)));

        // Exactly at the limit is still accepted.
        assert!(AudioPayload::new(vec![0u8; MAX_PAYLOAD_BYTES], "audio/wav").is_ok());
    }

    #[test]
    fn sniffs_wav_magic() {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(b"RIFF");
        bytes.extend_from_slice(&36u32.to_le_bytes());
        bytes.extend_from_slice(b"WAVEfmt ");
        let payload = AudioPayload::from_bytes(bytes).unwrap();
        assert_eq!(payload.mime_type(), "audio/x-wav");
    }

    #[test]
    fn unknown_magic_falls_back_to_mpeg() {
        let payload = AudioPayload::from_bytes(vec![0x42u8; 64]).unwrap();
        assert_eq!(payload.mime_type(), "audio/mpeg");
    }
}
