//! Container codec — magic framing and the top-level entry points.
//!
//! A container is `"miniLock" ‖ u32-LE header length ‖ minified header
//! JSON ‖ chunked ciphertext`. This module owns the frame; the header
//! and stream modules own everything inside it.

use tracing::debug;

use crate::constants::{LENGTH_PREFIX_SIZE, MAGIC_BYTES};
use crate::errors::MiniLockError;
use crate::header::{FileInfo, Header};
use crate::keys::Keys;

/// Encrypt `payload` as `filename`, addressed to `recipients`, attested
/// by `sender`. Returns the complete container bytes.
///
/// The per-encryption ephemeral keypair never leaves this function; it
/// is wiped once the envelopes are sealed.
pub fn encrypt_file(
    filename: &str,
    payload: &[u8],
    sender: &Keys,
    recipients: &[Keys],
) -> Result<Vec<u8>, MiniLockError> {
    let (mut header, mut ephemeral) = Header::prepare()?;
    let (file_info, ciphertext) = FileInfo::seal_payload(filename, payload)?;
    header.add_file_info(&file_info, &ephemeral, sender, recipients)?;
    ephemeral.wipe()?;

    let header_json = serde_json::to_vec(&header)
        .map_err(|e| MiniLockError::BadEncoding(format!("header JSON: {e}")))?;
    debug!(
        recipients = recipients.len(),
        header_len = header_json.len(),
        ciphertext_len = ciphertext.len(),
        "sealed container"
    );

    let mut out = Vec::with_capacity(
        MAGIC_BYTES.len() + LENGTH_PREFIX_SIZE + header_json.len() + ciphertext.len(),
    );
    out.extend_from_slice(MAGIC_BYTES);
    out.extend_from_slice(&(header_json.len() as u32).to_le_bytes());
    out.extend_from_slice(&header_json);
    out.extend_from_slice(&ciphertext);
    Ok(out)
}

/// Split container bytes into the parsed header and the ciphertext
/// region.
///
/// # Errors
/// `BadMagic` when the 8-byte prefix is not `miniLock`, `BadLength`
/// when the declared header length overruns the buffer, `BadEncoding`
/// when the header is not valid JSON.
pub fn parse_container(contents: &[u8]) -> Result<(Header, &[u8]), MiniLockError> {
    if contents.len() < MAGIC_BYTES.len() || &contents[..MAGIC_BYTES.len()] != MAGIC_BYTES {
        return Err(MiniLockError::BadMagic);
    }
    if contents.len() < MAGIC_BYTES.len() + LENGTH_PREFIX_SIZE {
        return Err(MiniLockError::BadLength);
    }

    let mut len_bytes = [0u8; LENGTH_PREFIX_SIZE];
    len_bytes.copy_from_slice(&contents[MAGIC_BYTES.len()..MAGIC_BYTES.len() + LENGTH_PREFIX_SIZE]);
    let header_len = u32::from_le_bytes(len_bytes);

    let header_begin = MAGIC_BYTES.len() + LENGTH_PREFIX_SIZE;
    let header_end = header_begin as u64 + u64::from(header_len);
    if header_end > contents.len() as u64 {
        return Err(MiniLockError::BadLength);
    }
    let header_end = header_end as usize;

    let header: Header = serde_json::from_slice(&contents[header_begin..header_end])
        .map_err(|e| MiniLockError::BadEncoding(format!("header JSON: {e}")))?;
    debug!(
        header_len,
        ciphertext_len = contents.len() - header_end,
        envelopes = header.decrypt_info.len(),
        "parsed container"
    );
    Ok((header, &contents[header_end..]))
}

/// Decrypt a container with `recipient`'s key. Returns `(sender ID,
/// filename, payload)`.
pub fn decrypt_file(
    contents: &[u8],
    recipient: &Keys,
) -> Result<(String, String, Vec<u8>), MiniLockError> {
    let (header, ciphertext) = parse_container(contents)?;
    header.decrypt_contents(ciphertext, recipient)
}
