//! BLAKE3 hashing utilities for install idempotency
//!
//! Content hashes decide whether a copy step is a no-op and are recorded in
//! backup metadata so overwritten files can be audited later.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use blake3::Hasher;

use crate::error::{ClaudekitError, Result};

/// Hash prefix for BLAKE3 hashes
pub const HASH_PREFIX: &str = "blake3:";

/// Calculate BLAKE3 hash of a file
pub fn hash_file(path: &Path) -> Result<String> {
    let file = File::open(path).map_err(|e| ClaudekitError::FileReadFailed {
        path: path.display().to_string(),
        reason: e.to_string(),
    })?;

    let mut reader = BufReader::new(file);
    let mut hasher = Hasher::new();
    let mut buffer = [0u8; 8192];

    loop {
        let bytes_read = reader
            .read(&mut buffer)
            .map_err(|e| ClaudekitError::FileReadFailed {
                path: path.display().to_string(),
                reason: e.to_string(),
            })?;

        if bytes_read == 0 {
            break;
        }

        hasher.update(&buffer[..bytes_read]);
    }

    Ok(format!("{}{}", HASH_PREFIX, hasher.finalize().to_hex()))
}

/// Whether two files have identical content
///
/// Returns `false` when either file is missing rather than erroring, since
/// callers use this to decide between copy and no-op.
pub fn files_identical(a: &Path, b: &Path) -> bool {
    match (hash_file(a), hash_file(b)) {
        (Ok(ha), Ok(hb)) => ha == hb,
        _ => false,
    }
}
