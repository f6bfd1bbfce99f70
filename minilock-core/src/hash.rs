//! Hashing utilities — BLAKE2s and scrypt passphrase stretching.
//!
//! miniLock uses BLAKE2s twice: full 32-byte digests for the ciphertext
//! hash and passphrase pre-hash, and a 1-byte variable-output digest as
//! the ID checksum. Note the checksum is a true BLAKE2s-1 digest, not a
//! truncated BLAKE2s-256.

use blake2::digest::{Update, VariableOutput};
use blake2::{Blake2s256, Blake2sVar, Digest};

use crate::constants::{KEY_LENGTH, SCRYPT_LOG_N, SCRYPT_P, SCRYPT_R};
use crate::errors::MiniLockError;

/// Compute a 32-byte BLAKE2s-256 digest.
pub fn blake2s_256(data: &[u8]) -> [u8; 32] {
    Blake2s256::digest(data).into()
}

/// Compute a BLAKE2s digest of `n` bytes, n within 1..=32.
///
/// # Errors
/// Returns `MiniLockError::BadArgument` for output lengths BLAKE2s
/// cannot produce.
pub fn blake2s_n(data: &[u8], n: usize) -> Result<Vec<u8>, MiniLockError> {
    let mut hasher = Blake2sVar::new(n).map_err(|_| {
        MiniLockError::BadArgument(format!("BLAKE2s output length must be 1..=32, got {n}"))
    })?;
    hasher.update(data);
    let mut out = vec![0u8; n];
    hasher
        .finalize_variable(&mut out)
        .map_err(|_| MiniLockError::BadArgument("BLAKE2s output buffer mismatch".into()))?;
    Ok(out)
}

/// Stretch `(email, passphrase)` into 32 bytes of key seed material.
///
/// The passphrase is pre-hashed with BLAKE2s-256, then run through
/// scrypt with the email as salt (N=2^17, r=8, p=1, dkLen=32). The
/// email is used verbatim — any normalization would derive a different
/// identity.
pub fn stretch_passphrase(email: &str, passphrase: &str) -> Result<[u8; 32], MiniLockError> {
    let pre_hash = blake2s_256(passphrase.as_bytes());
    let params = scrypt::Params::new(SCRYPT_LOG_N, SCRYPT_R, SCRYPT_P, KEY_LENGTH)
        .map_err(|e| MiniLockError::BadArgument(format!("invalid scrypt parameters: {e}")))?;
    let mut out = [0u8; KEY_LENGTH];
    scrypt::scrypt(&pre_hash, email.as_bytes(), &params, &mut out)
        .map_err(|e| MiniLockError::BadArgument(format!("invalid scrypt output length: {e}")))?;
    Ok(out)
}
