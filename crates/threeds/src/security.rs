//! Small security helpers shared by the orchestrator and the server.

use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;

/// Constant-time byte comparison that does not leak input lengths or content.
///
/// Both inputs are hashed to fixed-length SHA-256 digests before comparison.
/// Used for bearer token checks on operational endpoints.
pub fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    let ha = Sha256::digest(a);
    let hb = Sha256::digest(b);
    ha.ct_eq(&hb).into()
}

/// Last four characters of a card number, for logging. Shorter input is
/// returned whole.
pub fn last_four(pan: &str) -> &str {
    let count = pan.chars().count();
    if count <= 4 {
        return pan;
    }
    let start = pan
        .char_indices()
        .nth(count - 4)
        .map(|(i, _)| i)
        .unwrap_or(0);
    &pan[start..]
}
