//! One-time tokens for email verification and password reset
//!
//! The plaintext is a high-entropy random value emailed to the user; only
//! its SHA-256 digest is persisted, so reading the store is not enough to
//! reconstruct the emailed link. A fast digest is fine here - these are
//! 160-bit random values, not human-chosen secrets.

use rand::RngCore;
use sha2::{Digest, Sha256};

/// Password-reset tokens expire this many minutes after issuance.
pub const RESET_TOKEN_TTL_MINS: i64 = 10;

/// A freshly issued one-time token: the plaintext goes into an email, the
/// hash into the user record.
#[derive(Debug, Clone)]
pub struct OneTimeToken {
    pub plaintext: String,
    pub hash: String,
}

/// Issue a new one-time token from 20 random bytes.
pub fn issue() -> OneTimeToken {
    let mut bytes = [0u8; 20];
    rand::thread_rng().fill_bytes(&mut bytes);
    let plaintext = hex::encode(bytes);
    let hash = hash_for_lookup(&plaintext);
    OneTimeToken { plaintext, hash }
}

/// Digest an incoming plaintext token for store lookup.
pub fn hash_for_lookup(plaintext: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(plaintext.as_bytes());
    hex::encode(hasher.finalize())
}
