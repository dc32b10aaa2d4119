use std::fmt::Write;

use sha2::{Digest, Sha256};

/// Prefix that marks a hashed value in redacted output.
pub const HASH_PREFIX: &str = "sha256:";

/// Number of digest bytes kept in the rendered hash.
const DIGEST_BYTES: usize = 16;

/// Unsalted SHA-256 of `value`, truncated to 128 bits and hex-encoded.
///
/// Equal inputs always produce equal output so hashed values stay joinable
/// across records.
pub fn digest_hex(value: &str) -> String {
    let digest = Sha256::digest(value.as_bytes());
    let mut out = String::with_capacity(HASH_PREFIX.len() + DIGEST_BYTES * 2);
    out.push_str(HASH_PREFIX);
    for byte in &digest[..DIGEST_BYTES] {
        let _ = write!(&mut out, "{byte:02x}");
    }
    out
}
