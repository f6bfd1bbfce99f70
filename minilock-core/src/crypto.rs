//! Primitive bindings — NaCl box, NaCl secretbox, and the system CSPRNG.
//!
//! Thin adapters with fixed-size buffer contracts. Key and nonce sizes
//! are enforced by array types at this boundary; callers holding slices
//! validate lengths first and fail with `BadArgument` before reaching
//! these functions.

use crypto_box::aead::Aead;
use crypto_box::{PublicKey, SalsaBox, SecretKey};
use crypto_secretbox::aead::KeyInit;
use crypto_secretbox::XSalsa20Poly1305;
use rand_core::{OsRng, RngCore};

use crate::constants::{FULL_NONCE_LENGTH, KEY_LENGTH, PUBLIC_KEY_LENGTH, SECRET_KEY_LENGTH};
use crate::errors::MiniLockError;

/// Fill a buffer from the OS CSPRNG.
///
/// # Errors
/// Returns `MiniLockError::InsufficientEntropy` if the RNG cannot
/// satisfy the read.
pub fn fill_random(buf: &mut [u8]) -> Result<(), MiniLockError> {
    OsRng
        .try_fill_bytes(buf)
        .map_err(|_| MiniLockError::InsufficientEntropy)
}

/// Draw a fixed-size array of fresh CSPRNG bytes.
pub fn random_array<const N: usize>() -> Result<[u8; N], MiniLockError> {
    let mut out = [0u8; N];
    fill_random(&mut out)?;
    Ok(out)
}

/// Seal plaintext with NaCl box (X25519 + XSalsa20-Poly1305).
///
/// Output is `plaintext.len() + 16` bytes of raw ciphertext; the nonce
/// is supplied by the caller and travels out of band (miniLock headers
/// carry it as the map key).
pub fn box_seal(
    plaintext: &[u8],
    nonce: &[u8; FULL_NONCE_LENGTH],
    their_public: &[u8; PUBLIC_KEY_LENGTH],
    my_private: &[u8; SECRET_KEY_LENGTH],
) -> Result<Vec<u8>, MiniLockError> {
    let pk = PublicKey::from(*their_public);
    let sk = SecretKey::from(*my_private);
    SalsaBox::new(&pk, &sk)
        .encrypt(crypto_box::Nonce::from_slice(nonce), plaintext)
        .map_err(|_| MiniLockError::Authentication)
}

/// Open a NaCl box.
///
/// # Errors
/// Returns `MiniLockError::Authentication` on any failure: tampered
/// ciphertext, wrong keypair, wrong nonce, truncation.
pub fn box_open(
    ciphertext: &[u8],
    nonce: &[u8; FULL_NONCE_LENGTH],
    their_public: &[u8; PUBLIC_KEY_LENGTH],
    my_private: &[u8; SECRET_KEY_LENGTH],
) -> Result<Vec<u8>, MiniLockError> {
    let pk = PublicKey::from(*their_public);
    let sk = SecretKey::from(*my_private);
    SalsaBox::new(&pk, &sk)
        .decrypt(crypto_box::Nonce::from_slice(nonce), ciphertext)
        .map_err(|_| MiniLockError::Authentication)
}

/// Seal plaintext with NaCl secretbox (XSalsa20-Poly1305).
///
/// Overhead is exactly 16 bytes.
pub fn secretbox_seal(
    plaintext: &[u8],
    nonce: &[u8; FULL_NONCE_LENGTH],
    key: &[u8; KEY_LENGTH],
) -> Result<Vec<u8>, MiniLockError> {
    let cipher = XSalsa20Poly1305::new(crypto_secretbox::Key::from_slice(key));
    cipher
        .encrypt(crypto_secretbox::Nonce::from_slice(nonce), plaintext)
        .map_err(|_| MiniLockError::Authentication)
}

/// Open a NaCl secretbox.
///
/// # Errors
/// Returns `MiniLockError::Authentication` if the Poly1305 check fails.
pub fn secretbox_open(
    ciphertext: &[u8],
    nonce: &[u8; FULL_NONCE_LENGTH],
    key: &[u8; KEY_LENGTH],
) -> Result<Vec<u8>, MiniLockError> {
    let cipher = XSalsa20Poly1305::new(crypto_secretbox::Key::from_slice(key));
    cipher
        .decrypt(crypto_secretbox::Nonce::from_slice(nonce), ciphertext)
        .map_err(|_| MiniLockError::Authentication)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::BOX_OVERHEAD;

    fn keypair() -> ([u8; 32], [u8; 32]) {
        let secret = random_array::<32>().unwrap();
        let public = *SecretKey::from(secret).public_key().as_bytes();
        (secret, public)
    }

    #[test]
    fn random_arrays_are_distinct() {
        let a = random_array::<32>().unwrap();
        let b = random_array::<32>().unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn box_seal_open_round_trip() {
        let (alice_sk, alice_pk) = keypair();
        let (bob_sk, bob_pk) = keypair();
        let nonce = random_array::<24>().unwrap();
        let plaintext = b"the key under the mat";

        let sealed = box_seal(plaintext, &nonce, &bob_pk, &alice_sk).unwrap();
        assert_eq!(sealed.len(), plaintext.len() + BOX_OVERHEAD);

        let opened = box_open(&sealed, &nonce, &alice_pk, &bob_sk).unwrap();
        assert_eq!(opened, plaintext);
    }

    #[test]
    fn box_open_rejects_wrong_key() {
        let (alice_sk, alice_pk) = keypair();
        let (_, bob_pk) = keypair();
        let (eve_sk, _) = keypair();
        let nonce = random_array::<24>().unwrap();

        let sealed = box_seal(b"secret", &nonce, &bob_pk, &alice_sk).unwrap();
        assert!(matches!(
            box_open(&sealed, &nonce, &alice_pk, &eve_sk),
            Err(MiniLockError::Authentication)
        ));
    }

    #[test]
    fn secretbox_seal_open_round_trip() {
        let key = random_array::<32>().unwrap();
        let nonce = random_array::<24>().unwrap();
        let plaintext = b"chunk contents";

        let sealed = secretbox_seal(plaintext, &nonce, &key).unwrap();
        assert_eq!(sealed.len(), plaintext.len() + BOX_OVERHEAD);
        assert_eq!(secretbox_open(&sealed, &nonce, &key).unwrap(), plaintext);
    }

    #[test]
    fn secretbox_open_rejects_tampering() {
        let key = random_array::<32>().unwrap();
        let nonce = random_array::<24>().unwrap();

        let mut sealed = secretbox_seal(b"chunk contents", &nonce, &key).unwrap();
        sealed[0] ^= 0x01;
        assert!(matches!(
            secretbox_open(&sealed, &nonce, &key),
            Err(MiniLockError::Authentication)
        ));
    }

    #[test]
    fn secretbox_open_rejects_wrong_nonce() {
        let key = random_array::<32>().unwrap();
        let nonce = random_array::<24>().unwrap();
        let mut other = nonce;
        other[23] ^= 0x80;

        let sealed = secretbox_seal(b"chunk contents", &nonce, &key).unwrap();
        assert!(secretbox_open(&sealed, &other, &key).is_err());
    }
}
