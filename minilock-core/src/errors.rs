//! Error types for minilock-core.
//!
//! One unified enum covering the container, envelope, stream, and key
//! layers. The only error treated as soft anywhere in the crate is
//! [`MiniLockError::Authentication`] during the header's trial-decrypt
//! loop, where it means "this envelope is not for us" and the search
//! moves on. Everywhere else, every variant propagates immediately.

/// Unified error type for all minilock-core operations.
#[derive(Debug, thiserror::Error)]
pub enum MiniLockError {
    /// The 8-byte container prefix is not `miniLock`.
    #[error("magic bytes did not match expected \"miniLock\"")]
    BadMagic,

    /// Declared header length exceeds the container length.
    #[error("declared header length exceeds container length")]
    BadLength,

    /// Malformed serialized data: JSON parse failure, or a chunk length
    /// prefix inconsistent with the buffer it describes.
    #[error("bad encoding: {0}")]
    BadEncoding(String),

    /// Wrong-size key, nonce, or filename handed to the engine.
    #[error("bad argument: {0}")]
    BadArgument(String),

    /// No header envelope opened for this recipient, or the envelope
    /// opened but the inner file info failed authentication.
    #[error("could not decrypt given ciphertext with given key or nonce")]
    CannotDecrypt,

    /// An envelope decrypted successfully but named a recipient ID other
    /// than ours. A mis-addressed envelope is a protocol anomaly, not a
    /// miss; the search does not continue past it.
    #[error("envelope decrypted successfully but was addressed to another key")]
    BadRecipient,

    /// Ciphertext hash differs from the hash declared in the header.
    #[error("ciphertext hash did not match the declared file hash")]
    HashMismatch,

    /// A box or secretbox failed its Poly1305 check on opening.
    #[error("authentication of box failed on opening")]
    Authentication,

    /// The system CSPRNG returned fewer bytes than requested.
    #[error("got insufficient random bytes from the system RNG")]
    InsufficientEntropy,

    /// Base58 decode failure, wrong decoded length, or checksum mismatch
    /// in a miniLock ID.
    #[error("invalid miniLock ID: {0}")]
    InvalidID(String),
}
