//! Core type aliases for the sync engine

/// 32-byte BLAKE3 content digest
pub type Digest = [u8; 32];

/// Render a digest prefix for log output
pub fn short_hex(digest: &Digest) -> String {
    hex::encode(&digest[..8])
}
