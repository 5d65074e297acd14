//! Platform request signatures.
//!
//! The platform signs both the handshake and every encrypted envelope the
//! same way:
//! - sort the string parts (token, timestamp, nonce and, for envelopes,
//!   the ciphertext) in ascending byte order
//! - concatenate them with no separator
//! - SHA-1 the result and render it as lowercase hex
//!
//! Because the parts are sorted first, the signature does not depend on the
//! order they arrive in.

use sha1::{Digest, Sha1};
use tracing::warn;

/// Compute the platform signature over `parts`.
pub fn create_signature(parts: &[&str]) -> String {
    let mut sorted = parts.to_vec();
    sorted.sort_unstable();

    let mut hasher = Sha1::new();
    for part in sorted {
        hasher.update(part.as_bytes());
    }

    hex::encode(hasher.finalize())
}

/// Verify a platform signature.
///
/// # Arguments
///
/// * `signature` - The `signature` / `msg_signature` query parameter
/// * `parts` - Token, timestamp, nonce and (for envelopes) the ciphertext, in any order
///
/// # Returns
///
/// `true` if the lowercase hex SHA-1 of the sorted, concatenated parts
/// equals `signature`.
pub fn validate_signature(signature: &str, parts: &[&str]) -> bool {
    if signature.is_empty() {
        warn!("notify_signature_missing");
        return false;
    }

    let expected = create_signature(parts);
    let valid = constant_time_compare(&expected, signature);

    if !valid {
        warn!(
            expected_length = expected.len(),
            actual_length = signature.len(),
            part_count = parts.len(),
            "notify_signature_mismatch"
        );
    }

    valid
}

/// Constant-time string comparison to prevent timing attacks.
pub(crate) fn constant_time_compare(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }

    let mut result = 0u8;
    for (x, y) in a.bytes().zip(b.bytes()) {
        result |= x ^ y;
    }
    result == 0
}
