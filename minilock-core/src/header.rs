//! Header envelopes — per-recipient encrypted `FileInfo` records.
//!
//! The header hides recipient identities behind an ephemeral keypair:
//! each recipient gets an envelope sealed under `(recipient, ephemeral)`
//! whose plaintext is a `DecryptInfoEntry`; the entry in turn carries
//! the `FileInfo` sealed under `(recipient, sender identity)`, which is
//! what attests the sender. Inner and outer box share the envelope's
//! 24-byte nonce — deliberate in miniLock v1, safe because the two
//! boxes use disjoint keypairs — but every recipient gets a fresh
//! nonce.
//!
//! Recovering a file means trial-decrypting envelopes until one opens,
//! which is the only place in the crate where an authentication failure
//! is soft.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::warn;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::constants::{
    BASE_NONCE_LENGTH, FULL_NONCE_LENGTH, KEY_LENGTH, MINILOCK_VERSION, PUBLIC_KEY_LENGTH,
};
use crate::errors::MiniLockError;
use crate::keys::Keys;
use crate::{crypto, encoding, hash, stream};

/// Everything needed to symmetrically decrypt and validate a payload.
///
/// Serialized (inside the sender-attested inner box) with standard
/// Base64 values and these exact field names and order.
#[derive(Clone, Serialize, Deserialize, Zeroize, ZeroizeOnDrop)]
pub struct FileInfo {
    /// 32-byte symmetric key for the chunked stream.
    #[serde(rename = "fileKey", with = "crate::encoding::b64")]
    pub file_key: Vec<u8>,
    /// 16-byte base nonce for the chunked stream.
    #[serde(rename = "fileNonce", with = "crate::encoding::b64")]
    pub file_nonce: Vec<u8>,
    /// BLAKE2s-256 of the entire chunked ciphertext.
    #[serde(rename = "fileHash", with = "crate::encoding::b64")]
    pub file_hash: Vec<u8>,
}

impl FileInfo {
    /// Encrypt a payload under a fresh random key and base nonce,
    /// returning the `FileInfo` describing the ciphertext.
    pub fn seal_payload(
        filename: &str,
        payload: &[u8],
    ) -> Result<(FileInfo, Vec<u8>), MiniLockError> {
        let key = crypto::random_array::<KEY_LENGTH>()?;
        let base_nonce = crypto::random_array::<BASE_NONCE_LENGTH>()?;
        Self::seal_payload_with(&key, &base_nonce, filename, payload)
    }

    /// Deterministic core of [`FileInfo::seal_payload`], split out so
    /// vector tests can pin exact ciphertexts.
    pub(crate) fn seal_payload_with(
        key: &[u8; KEY_LENGTH],
        base_nonce: &[u8; BASE_NONCE_LENGTH],
        filename: &str,
        payload: &[u8],
    ) -> Result<(FileInfo, Vec<u8>), MiniLockError> {
        let ciphertext = stream::encrypt_stream(filename, key, base_nonce, payload)?;
        let file_hash = hash::blake2s_256(&ciphertext);
        Ok((
            FileInfo {
                file_key: key.to_vec(),
                file_nonce: base_nonce.to_vec(),
                file_hash: file_hash.to_vec(),
            },
            ciphertext,
        ))
    }

    /// Validate a ciphertext against `file_hash`, then decrypt it.
    ///
    /// The hash comparison happens before any symmetric decryption so
    /// tampered input is rejected without wasting work on it.
    pub fn open_payload(&self, ciphertext: &[u8]) -> Result<(String, Vec<u8>), MiniLockError> {
        let actual = hash::blake2s_256(ciphertext);
        if self.file_hash != actual {
            return Err(MiniLockError::HashMismatch);
        }
        stream::decrypt_stream(&self.file_key, &self.file_nonce, ciphertext)
    }
}

/// One recipient's decryption record: the sender-sealed `FileInfo`
/// plus the authenticated sender and intended-recipient identities.
#[derive(Clone, Serialize, Deserialize)]
pub struct DecryptInfoEntry {
    /// miniLock ID of the sender's identity key.
    #[serde(rename = "senderID")]
    pub sender_id: String,
    /// miniLock ID the envelope is addressed to.
    #[serde(rename = "recipientID")]
    pub recipient_id: String,
    /// `FileInfo` JSON, boxed under `(recipient, sender identity)`.
    #[serde(rename = "fileInfo", with = "crate::encoding::b64")]
    pub file_info_enc: Vec<u8>,
}

impl DecryptInfoEntry {
    /// Build a recipient's entry: seal the `FileInfo` under the sender's
    /// identity key and record both encoded IDs.
    pub fn new(
        nonce: &[u8; FULL_NONCE_LENGTH],
        file_info: &FileInfo,
        sender: &Keys,
        recipient: &Keys,
    ) -> Result<DecryptInfoEntry, MiniLockError> {
        let encoded = serde_json::to_vec(file_info)
            .map_err(|e| MiniLockError::BadEncoding(format!("file info JSON: {e}")))?;
        let file_info_enc = crypto::box_seal(&encoded, nonce, recipient.public(), sender.private()?)?;
        Ok(DecryptInfoEntry {
            sender_id: sender.encode_id()?,
            recipient_id: recipient.encode_id()?,
            file_info_enc,
        })
    }

    /// The sender's public key, recovered (and checksum-verified) from
    /// the entry's `senderID`.
    pub fn sender_public(&self) -> Result<Keys, MiniLockError> {
        Keys::from_id(&self.sender_id)
    }

    /// Open the inner `FileInfo` box with the envelope's nonce.
    ///
    /// # Errors
    /// `CannotDecrypt` when authentication fails — an envelope we could
    /// open but whose inner record we cannot is indistinguishable from
    /// one that was never ours.
    pub fn extract_file_info(
        &self,
        nonce: &[u8; FULL_NONCE_LENGTH],
        recipient: &Keys,
    ) -> Result<FileInfo, MiniLockError> {
        let sender = self.sender_public()?;
        let plain = match crypto::box_open(
            &self.file_info_enc,
            nonce,
            sender.public(),
            recipient.private()?,
        ) {
            Ok(plain) => plain,
            Err(MiniLockError::Authentication) => return Err(MiniLockError::CannotDecrypt),
            Err(e) => return Err(e),
        };
        serde_json::from_slice(&plain)
            .map_err(|e| MiniLockError::BadEncoding(format!("file info JSON: {e}")))
    }
}

/// The miniLock v1 container header.
#[derive(Serialize, Deserialize)]
pub struct Header {
    /// Always 1.
    pub version: u32,
    /// Public half of the per-encryption ephemeral keypair.
    #[serde(with = "crate::encoding::b64")]
    pub ephemeral: Vec<u8>,
    /// Envelopes keyed by the Base64 of their 24-byte nonce.
    #[serde(rename = "decryptInfo", with = "crate::encoding::b64_map")]
    pub decrypt_info: HashMap<String, Vec<u8>>,
}

impl Header {
    /// New empty header with a fresh ephemeral keypair, returned
    /// alongside it so the caller can seal envelopes and then wipe it.
    pub(crate) fn prepare() -> Result<(Header, Keys), MiniLockError> {
        let ephemeral = Keys::generate()?;
        let header = Header {
            version: MINILOCK_VERSION,
            ephemeral: ephemeral.public().to_vec(),
            decrypt_info: HashMap::new(),
        };
        Ok((header, ephemeral))
    }

    /// Fan the `FileInfo` out to every recipient.
    ///
    /// Each recipient gets a fresh 24-byte CSPRNG nonce; the entry is
    /// sealed under the ephemeral key so that only holders of a
    /// recipient private key can learn who a container is addressed to.
    pub fn add_file_info(
        &mut self,
        file_info: &FileInfo,
        ephemeral: &Keys,
        sender: &Keys,
        recipients: &[Keys],
    ) -> Result<(), MiniLockError> {
        for recipient in recipients {
            let nonce = crypto::random_array::<FULL_NONCE_LENGTH>()?;
            let entry = DecryptInfoEntry::new(&nonce, file_info, sender, recipient)?;
            let plain = serde_json::to_vec(&entry)
                .map_err(|e| MiniLockError::BadEncoding(format!("decrypt info JSON: {e}")))?;
            let envelope =
                crypto::box_seal(&plain, &nonce, recipient.public(), ephemeral.private()?)?;
            self.decrypt_info
                .insert(encoding::to_base64(&nonce), envelope);
        }
        Ok(())
    }

    /// Trial-decrypt envelopes with `recipient` until one opens.
    ///
    /// Iteration order is irrelevant: at most one envelope opens for a
    /// given recipient key. An envelope that opens but names a foreign
    /// recipient ID aborts the search with `BadRecipient`.
    ///
    /// # Errors
    /// `CannotDecrypt` when every envelope fails authentication.
    pub fn extract_decrypt_info(
        &self,
        recipient: &Keys,
    ) -> Result<([u8; FULL_NONCE_LENGTH], DecryptInfoEntry), MiniLockError> {
        let ephemeral: &[u8; PUBLIC_KEY_LENGTH] =
            self.ephemeral.as_slice().try_into().map_err(|_| {
                MiniLockError::BadEncoding(format!(
                    "ephemeral key must be {PUBLIC_KEY_LENGTH} bytes, got {}",
                    self.ephemeral.len()
                ))
            })?;
        let recipient_id = recipient.encode_id()?;

        for (nonce_b64, envelope) in &self.decrypt_info {
            let nonce_bytes = encoding::from_base64(nonce_b64)?;
            let nonce: [u8; FULL_NONCE_LENGTH] =
                nonce_bytes.as_slice().try_into().map_err(|_| {
                    MiniLockError::BadEncoding(format!(
                        "envelope nonce must be {FULL_NONCE_LENGTH} bytes, got {}",
                        nonce_bytes.len()
                    ))
                })?;

            let plain = match crypto::box_open(envelope, &nonce, ephemeral, recipient.private()?) {
                Ok(plain) => plain,
                // Not our envelope; keep looking.
                Err(MiniLockError::Authentication) => continue,
                Err(e) => return Err(e),
            };
            let entry: DecryptInfoEntry = serde_json::from_slice(&plain)
                .map_err(|e| MiniLockError::BadEncoding(format!("decrypt info JSON: {e}")))?;
            if entry.recipient_id != recipient_id {
                warn!(
                    claimed = %entry.recipient_id,
                    "envelope opened but is addressed to another key"
                );
                return Err(MiniLockError::BadRecipient);
            }
            return Ok((nonce, entry));
        }
        Err(MiniLockError::CannotDecrypt)
    }

    /// Locate this recipient's envelope and recover `(FileInfo,
    /// sender ID)` from it.
    pub fn extract_file_info(
        &self,
        recipient: &Keys,
    ) -> Result<(FileInfo, String), MiniLockError> {
        let (nonce, entry) = self.extract_decrypt_info(recipient)?;
        let file_info = entry.extract_file_info(&nonce, recipient)?;
        Ok((file_info, entry.sender_id))
    }

    /// Full recipient-side recovery: envelope search, hash validation,
    /// stream decryption. Returns `(sender ID, filename, payload)`.
    pub fn decrypt_contents(
        &self,
        ciphertext: &[u8],
        recipient: &Keys,
    ) -> Result<(String, String, Vec<u8>), MiniLockError> {
        let (file_info, sender_id) = self.extract_file_info(recipient)?;
        let (filename, contents) = file_info.open_payload(ciphertext)?;
        Ok((sender_id, filename, contents))
    }
}
