//! minilock-core — the miniLock v1 file-encryption container engine.
//!
//! Implements authenticated, multi-recipient, sender-attested
//! encryption of a named file as a single self-describing byte stream:
//! `"miniLock" ‖ u32-LE header length ‖ header JSON ‖ chunked
//! ciphertext`. Identities are Curve25519 box keypairs derived from
//! `(email, passphrase)` and shared as Base58 IDs; payloads travel as
//! length-prefixed XSalsa20-Poly1305 chunks keyed by a per-file
//! symmetric key that the header fans out to each recipient inside an
//! ephemeral-keyed envelope.
//!
//! # Module Map
//!
//! | Module | Responsibility |
//! |--------|----------------|
//! | [`constants`] | Fixed wire-format values |
//! | [`errors`] | Unified [`MiniLockError`] taxonomy |
//! | [`encoding`] | Base64 / Base58 helpers and serde adapters |
//! | [`crypto`] | NaCl box, secretbox, CSPRNG adapters |
//! | [`hash`] | BLAKE2s digests, scrypt passphrase stretching |
//! | [`keys`] | Identity keypairs, miniLock IDs, wiping |
//! | [`stream`] | Chunked symmetric stream + nonce derivation |
//! | [`header`] | Per-recipient envelopes over the file key |
//! | [`container`] | Magic framing, top-level encrypt/decrypt |
//!
//! # Example
//!
//! ```no_run
//! use minilock_core::{decrypt_file, encrypt_file, Keys};
//!
//! # fn main() -> Result<(), minilock_core::MiniLockError> {
//! let sender = Keys::from_email_and_passphrase("me@example.com", "a long passphrase")?;
//! let recipient = Keys::from_id("2453m8h7r3stzV8NeG4WzrFhsXTTsXTodQA2S6R9J2dfuh")?;
//!
//! let container = encrypt_file("notes.txt", b"meet at noon", &sender, &[recipient])?;
//!
//! // On the recipient's side, with their full keypair:
//! let me = Keys::from_email_and_passphrase("you@example.com", "another passphrase")?;
//! let (sender_id, filename, payload) = decrypt_file(&container, &me)?;
//! # Ok(())
//! # }
//! ```

/// Fixed wire-format constants.
pub mod constants;

/// Error types for minilock-core operations.
pub mod errors;

/// Encoding utilities — base64 and base58.
pub mod encoding;

/// Crypto primitives — NaCl box and secretbox adapters, CSPRNG.
pub mod crypto;

/// Hashing utilities — BLAKE2s and scrypt.
pub mod hash;

/// Identity keypairs and miniLock IDs.
pub mod keys;

/// Chunked symmetric stream.
pub mod stream;

/// Header envelopes over the per-file key.
pub mod header;

/// Container framing and top-level entry points.
pub mod container;

pub use container::{decrypt_file, encrypt_file, parse_container};
pub use errors::MiniLockError;
pub use header::{DecryptInfoEntry, FileInfo, Header};
pub use keys::Keys;
