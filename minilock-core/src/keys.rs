//! Identity keypairs — derivation, ID encoding, and wiping.
//!
//! A miniLock identity is a Curve25519 box keypair derived on demand
//! from `(email, passphrase)`; it is never persisted. Anyone holding
//! only a miniLock ID gets the public-key-only form, which can address
//! envelopes but not open them.
//!
//! Private material is zeroized on drop; callers that hold a keypair
//! across operations should additionally call [`Keys::wipe`] as soon as
//! it is no longer needed.

use crypto_box::SecretKey;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::constants::{ID_CHECKSUM_LENGTH, PUBLIC_KEY_LENGTH, SECRET_KEY_LENGTH};
use crate::errors::MiniLockError;
use crate::{crypto, encoding, hash};

/// A Curve25519 box keypair, or the public half of one.
///
/// The public-key-only form is the `None` arm of `private` — there is
/// no such thing as a partially-filled key buffer.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct Keys {
    public: [u8; PUBLIC_KEY_LENGTH],
    private: Option<[u8; SECRET_KEY_LENGTH]>,
}

impl Keys {
    /// Build a full keypair from a 32-byte secret seed. The seed is the
    /// secret scalar; the public key falls out of X25519 base-point
    /// multiplication.
    fn from_seed(seed: [u8; SECRET_KEY_LENGTH]) -> Keys {
        let sk = SecretKey::from(seed);
        Keys {
            public: *sk.public_key().as_bytes(),
            private: Some(seed),
        }
    }

    /// Derive the identity keypair for `(email, passphrase)`.
    ///
    /// Deterministic: the same inputs produce the same keypair,
    /// byte for byte. The passphrase is BLAKE2s-hashed and stretched
    /// with scrypt under the verbatim email as salt.
    pub fn from_email_and_passphrase(email: &str, passphrase: &str) -> Result<Keys, MiniLockError> {
        let seed = hash::stretch_passphrase(email, passphrase)?;
        Ok(Keys::from_seed(seed))
    }

    /// Generate a fresh random keypair, usually for ephemeral use.
    ///
    /// # Errors
    /// Returns `MiniLockError::InsufficientEntropy` if the CSPRNG
    /// cannot supply the seed.
    pub fn generate() -> Result<Keys, MiniLockError> {
        let seed = crypto::random_array::<SECRET_KEY_LENGTH>()?;
        Ok(Keys::from_seed(seed))
    }

    /// Load a keypair from raw private and public bytes.
    ///
    /// # Errors
    /// Returns `MiniLockError::BadArgument` unless both parts are
    /// exactly 32 bytes.
    pub fn from_parts(private: &[u8], public: &[u8]) -> Result<Keys, MiniLockError> {
        let private: [u8; SECRET_KEY_LENGTH] = private.try_into().map_err(|_| {
            MiniLockError::BadArgument(format!(
                "private key must be {SECRET_KEY_LENGTH} bytes, got {}",
                private.len()
            ))
        })?;
        let public: [u8; PUBLIC_KEY_LENGTH] = public.try_into().map_err(|_| {
            MiniLockError::BadArgument(format!(
                "public key must be {PUBLIC_KEY_LENGTH} bytes, got {}",
                public.len()
            ))
        })?;
        Ok(Keys {
            public,
            private: Some(private),
        })
    }

    /// Import a public-key-only keypair from a miniLock ID.
    ///
    /// The ID is Base58 of `public ‖ checksum`, where the checksum is a
    /// 1-byte BLAKE2s digest of the public key.
    ///
    /// # Errors
    /// Returns `MiniLockError::InvalidID` on decode failure, wrong
    /// decoded length, or checksum mismatch.
    pub fn from_id(id: &str) -> Result<Keys, MiniLockError> {
        let decoded = encoding::from_base58(id)?;
        if decoded.len() != PUBLIC_KEY_LENGTH + ID_CHECKSUM_LENGTH {
            return Err(MiniLockError::InvalidID(format!(
                "decoded ID must be {} bytes, got {}",
                PUBLIC_KEY_LENGTH + ID_CHECKSUM_LENGTH,
                decoded.len()
            )));
        }
        let mut public = [0u8; PUBLIC_KEY_LENGTH];
        public.copy_from_slice(&decoded[..PUBLIC_KEY_LENGTH]);
        let keys = Keys {
            public,
            private: None,
        };
        if decoded[PUBLIC_KEY_LENGTH] != keys.checksum()? {
            return Err(MiniLockError::InvalidID(format!(
                "checksum mismatch for ID {id}"
            )));
        }
        Ok(keys)
    }

    /// Encode this keypair's miniLock ID: `base58(public ‖ checksum)`.
    pub fn encode_id(&self) -> Result<String, MiniLockError> {
        let mut id_buf = [0u8; PUBLIC_KEY_LENGTH + ID_CHECKSUM_LENGTH];
        id_buf[..PUBLIC_KEY_LENGTH].copy_from_slice(&self.public);
        id_buf[PUBLIC_KEY_LENGTH] = self.checksum()?;
        Ok(encoding::to_base58(&id_buf))
    }

    /// The public key.
    pub fn public(&self) -> &[u8; PUBLIC_KEY_LENGTH] {
        &self.public
    }

    /// Whether this keypair carries private material.
    pub fn has_private(&self) -> bool {
        self.private.is_some()
    }

    /// The private key.
    ///
    /// # Errors
    /// Returns `MiniLockError::BadArgument` for a public-key-only
    /// keypair.
    pub fn private(&self) -> Result<&[u8; SECRET_KEY_LENGTH], MiniLockError> {
        self.private
            .as_ref()
            .ok_or_else(|| MiniLockError::BadArgument("private key material required".into()))
    }

    /// A public-key-only copy of this keypair.
    pub fn public_only(&self) -> Keys {
        Keys {
            public: self.public,
            private: None,
        }
    }

    /// Overwrite all present key material with fresh CSPRNG bytes.
    ///
    /// Drop will additionally zeroize, but an explicit wipe is the
    /// miniLock convention once a key is no longer needed.
    ///
    /// # Errors
    /// Returns `MiniLockError::InsufficientEntropy` if the RNG
    /// underreads; the buffers must not be left holding live key bytes.
    pub fn wipe(&mut self) -> Result<(), MiniLockError> {
        if let Some(private) = self.private.as_mut() {
            crypto::fill_random(private)?;
        }
        crypto::fill_random(&mut self.public)
    }

    /// 1-byte BLAKE2s checksum of the public key.
    fn checksum(&self) -> Result<u8, MiniLockError> {
        Ok(hash::blake2s_n(&self.public, ID_CHECKSUM_LENGTH)?[0])
    }
}
