//! Checksum Verification
//!
//! SHA-256 digests of local files, used to decide whether the installed
//! artifact is current and whether a download can be promoted.

use sha2::{Digest, Sha256};
use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::Path;
use tracing::debug;

/// Calculate the SHA-256 digest of a file as lower-case hex
pub fn calculate_sha256(path: &Path) -> Result<String, io::Error> {
    let file = File::open(path)?;
    let mut reader = BufReader::new(file);
    let mut hasher = Sha256::new();

    let mut buffer = [0u8; 8192];
    loop {
        let bytes_read = reader.read(&mut buffer)?;
        if bytes_read == 0 {
            break;
        }
        hasher.update(&buffer[..bytes_read]);
    }

    Ok(hex::encode(hasher.finalize()))
}

/// Digest of a file, or an empty string if it cannot be read.
///
/// The empty string never equals a manifest digest, so an unreadable file is
/// always treated as out of date.
pub fn digest(path: &Path) -> String {
    match calculate_sha256(path) {
        Ok(sum) => sum,
        Err(e) => {
            debug!(path = %path.display(), error = %e, "could not hash file");
            String::new()
        }
    }
}

/// Exact comparison of a computed digest against an expected value. An
/// empty digest never matches.
pub fn digest_matches(actual: &str, expected: &str) -> bool {
    !actual.is_empty() && actual == expected
}
