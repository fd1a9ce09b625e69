use sha2::{Digest, Sha256};

/// Compares a provided shared secret against the configured one.
///
/// Both sides are hashed first so the comparison does not leak length or
/// prefix information through timing.
#[must_use]
pub fn secrets_match(provided: &str, expected: &str) -> bool {
    if expected.is_empty() {
        return false;
    }
    let provided = Sha256::digest(provided.as_bytes());
    let expected = Sha256::digest(expected.as_bytes());
    provided == expected
}
