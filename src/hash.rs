//! Streaming content digests using BLAKE3

use crate::error::ScanError;
use crate::types::Digest;
use std::path::Path;
use tokio::fs::File;
use tokio::io::AsyncReadExt;

/// Read buffer size for streaming digests. Bounds memory use regardless of
/// file size.
const CHUNK_SIZE: usize = 64 * 1024;

/// Compute the BLAKE3 digest of a file's content.
///
/// The file is streamed in fixed-size chunks so arbitrarily large files hash
/// in constant memory. Fails if the file cannot be opened or a read fails
/// mid-stream (permissions, concurrent deletion).
pub async fn digest_file(path: &Path) -> Result<Digest, ScanError> {
    let mut file = File::open(path).await?;
    let mut hasher = blake3::Hasher::new();
    let mut buf = vec![0u8; CHUNK_SIZE];

    loop {
        let n = file.read(&mut buf).await?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
    }

    Ok(*hasher.finalize().as_bytes())
}

/// Digest an in-memory byte slice
pub fn digest_bytes(data: &[u8]) -> Digest {
    *blake3::Hasher::new().update(data).finalize().as_bytes()
}
