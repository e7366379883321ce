use sha1::{Digest, Sha1};

/// Length of a hex encoded SHA-1 digest
pub const DIGEST_HEX_LEN: usize = 40;

/// Lowercase hex SHA-1 of the expanded script content
///
/// Servers that cache scripts by SHA-1 (Redis `EVALSHA`) compute the same
/// value over the UTF-8 bytes of the script body.
pub fn digest(code: &str) -> String {
    let mut hasher = Sha1::new();
    hasher.update(code.as_bytes());
    hex::encode(hasher.finalize())
}
