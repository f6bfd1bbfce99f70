//! Chunked symmetric stream — the miniLock ciphertext body.
//!
//! A stream is a sequence of length-prefixed secretbox blocks: block 0
//! is always the 256-byte zero-padded filename, blocks 1.. carry up to
//! 1 MiB of payload each. Per-chunk nonces extend the 16-byte base
//! nonce with the chunk index (little-endian u64); the final chunk sets
//! the high bit of the nonce's last byte, so truncating a stream at a
//! block boundary still breaks authentication.
//!
//! Chunk sealing and opening fan out across cores; blocks are always
//! assembled strictly in index order.

use rayon::prelude::*;

use crate::constants::{
    BASE_NONCE_LENGTH, BLOCK_LENGTH, BOX_OVERHEAD, CHUNK_SIZE, FULL_NONCE_LENGTH,
    KEY_LENGTH, LENGTH_PREFIX_SIZE, NAME_BLOCK_LENGTH, NAME_CHUNK_LENGTH,
};
use crate::crypto;
use crate::errors::MiniLockError;

/// Derive the 24-byte nonce for chunk `index` from a 16-byte base
/// nonce: `base ‖ index as u64 LE`, with the high bit of the final
/// byte set on the stream's last chunk.
pub fn chunk_nonce(
    base_nonce: &[u8; BASE_NONCE_LENGTH],
    index: u64,
    last: bool,
) -> [u8; FULL_NONCE_LENGTH] {
    let mut nonce = [0u8; FULL_NONCE_LENGTH];
    nonce[..BASE_NONCE_LENGTH].copy_from_slice(base_nonce);
    nonce[BASE_NONCE_LENGTH..].copy_from_slice(&index.to_le_bytes());
    if last {
        nonce[FULL_NONCE_LENGTH - 1] |= 0x80;
    }
    nonce
}

/// A parsed on-wire block: 4-byte length prefix plus secretbox
/// ciphertext. Index 0 is the name block.
struct Block<'a> {
    index: usize,
    bytes: &'a [u8],
    last: bool,
}

impl Block<'_> {
    /// Plaintext length, derived from the block's physical extent (the
    /// prefix already had to be consistent with it for the walk to
    /// accept the block).
    fn plaintext_len(&self) -> usize {
        self.bytes.len() - (BOX_OVERHEAD + LENGTH_PREFIX_SIZE)
    }
}

/// Pad a filename to the fixed 256-byte name chunk.
fn name_chunk(filename: &str) -> Result<[u8; NAME_CHUNK_LENGTH], MiniLockError> {
    let bytes = filename.as_bytes();
    if bytes.len() > NAME_CHUNK_LENGTH {
        return Err(MiniLockError::BadArgument(format!(
            "filename cannot be longer than {NAME_CHUNK_LENGTH} bytes: {filename}"
        )));
    }
    let mut padded = [0u8; NAME_CHUNK_LENGTH];
    padded[..bytes.len()].copy_from_slice(bytes);
    Ok(padded)
}

/// Seal one chunk into its on-wire block form.
fn seal_chunk(
    key: &[u8; KEY_LENGTH],
    base_nonce: &[u8; BASE_NONCE_LENGTH],
    chunk: &[u8],
    index: u64,
    last: bool,
) -> Result<Vec<u8>, MiniLockError> {
    let nonce = chunk_nonce(base_nonce, index, last);
    let mut block = Vec::with_capacity(LENGTH_PREFIX_SIZE + chunk.len() + BOX_OVERHEAD);
    block.extend_from_slice(&(chunk.len() as u32).to_le_bytes());
    block.extend_from_slice(&crypto::secretbox_seal(chunk, &nonce, key)?);
    Ok(block)
}

/// Open one payload block with its index-derived nonce.
fn open_chunk(
    key: &[u8; KEY_LENGTH],
    base_nonce: &[u8; BASE_NONCE_LENGTH],
    block: &Block<'_>,
) -> Result<Vec<u8>, MiniLockError> {
    let nonce = chunk_nonce(base_nonce, block.index as u64, block.last);
    crypto::secretbox_open(&block.bytes[LENGTH_PREFIX_SIZE..], &nonce, key)
}

/// Open the name block and recover the filename: bytes up to the first
/// zero, or the whole chunk if it has none.
fn open_name(
    key: &[u8; KEY_LENGTH],
    base_nonce: &[u8; BASE_NONCE_LENGTH],
    block: &Block<'_>,
) -> Result<String, MiniLockError> {
    let nonce = chunk_nonce(base_nonce, 0, false);
    let name_bytes = crypto::secretbox_open(&block.bytes[LENGTH_PREFIX_SIZE..], &nonce, key)?;
    let end = name_bytes
        .iter()
        .position(|&b| b == 0)
        .unwrap_or(name_bytes.len());
    String::from_utf8(name_bytes[..end].to_vec())
        .map_err(|_| MiniLockError::BadEncoding("filename is not valid UTF-8".into()))
}

/// Parse a stream into blocks using the length prefixes.
fn walk_ciphertext(ciphertext: &[u8]) -> Result<Vec<Block<'_>>, MiniLockError> {
    let mut blocks = Vec::with_capacity(ciphertext.len() / BLOCK_LENGTH + 2);
    let mut loc = 0usize;
    while loc < ciphertext.len() {
        if loc + LENGTH_PREFIX_SIZE > ciphertext.len() {
            return Err(MiniLockError::BadEncoding(
                "truncated block length prefix".into(),
            ));
        }
        let mut prefix = [0u8; LENGTH_PREFIX_SIZE];
        prefix.copy_from_slice(&ciphertext[loc..loc + LENGTH_PREFIX_SIZE]);
        // Widen before adding: a forged prefix must not be able to wrap.
        let end = loc as u64
            + u64::from(u32::from_le_bytes(prefix))
            + (BOX_OVERHEAD + LENGTH_PREFIX_SIZE) as u64;
        if end > ciphertext.len() as u64 {
            return Err(MiniLockError::BadEncoding(
                "block length prefix runs past end of ciphertext".into(),
            ));
        }
        blocks.push(Block {
            index: blocks.len(),
            bytes: &ciphertext[loc..end as usize],
            last: false,
        });
        loc = end as usize;
    }
    if let Some(last) = blocks.last_mut() {
        last.last = true;
    }
    Ok(blocks)
}

/// Encrypt a filename and payload into a chunked stream.
///
/// An empty payload still emits one zero-length payload chunk carrying
/// the last-chunk nonce bit, so every stream has at least two blocks.
///
/// # Errors
/// `BadArgument` for a key that is not 32 bytes, a base nonce that is
/// not 16 bytes, or a filename longer than 256 bytes.
pub fn encrypt_stream(
    filename: &str,
    key: &[u8],
    base_nonce: &[u8],
    payload: &[u8],
) -> Result<Vec<u8>, MiniLockError> {
    let (key, base_nonce) = check_stream_args(key, base_nonce)?;
    let name = name_chunk(filename)?;

    let mut chunks: Vec<&[u8]> = payload.chunks(CHUNK_SIZE).collect();
    if chunks.is_empty() {
        chunks.push(&[]);
    }
    let num_chunks = chunks.len();

    let mut out = Vec::with_capacity(
        NAME_BLOCK_LENGTH + payload.len() + num_chunks * (BOX_OVERHEAD + LENGTH_PREFIX_SIZE),
    );
    out.extend_from_slice(&seal_chunk(key, base_nonce, &name, 0, false)?);

    let blocks: Vec<Vec<u8>> = chunks
        .par_iter()
        .enumerate()
        .map(|(i, chunk)| seal_chunk(key, base_nonce, chunk, (i + 1) as u64, i + 1 == num_chunks))
        .collect::<Result<_, _>>()?;
    for block in &blocks {
        out.extend_from_slice(block);
    }
    Ok(out)
}

/// Decrypt a chunked stream back into `(filename, payload)`.
///
/// # Errors
/// `BadEncoding` when the length prefixes are inconsistent with the
/// buffer, `Authentication` when any block fails its Poly1305 check.
pub fn decrypt_stream(
    key: &[u8],
    base_nonce: &[u8],
    ciphertext: &[u8],
) -> Result<(String, Vec<u8>), MiniLockError> {
    let (key, base_nonce) = check_stream_args(key, base_nonce)?;
    let blocks = walk_ciphertext(ciphertext)?;
    if blocks.len() < 2 {
        return Err(MiniLockError::BadEncoding(
            "stream must carry a name block and at least one payload block".into(),
        ));
    }

    let filename = open_name(key, base_nonce, &blocks[0])?;

    let payload_blocks = &blocks[1..];
    let expected_len: usize = payload_blocks.iter().map(Block::plaintext_len).sum();
    let chunks: Vec<Vec<u8>> = payload_blocks
        .par_iter()
        .map(|block| open_chunk(key, base_nonce, block))
        .collect::<Result<_, _>>()?;

    // Chunk i lands at (i-1) * CHUNK_SIZE; anything that would spill
    // past the buffer means the prefixes lied about the layout.
    let mut plaintext = vec![0u8; expected_len];
    for (i, chunk) in chunks.iter().enumerate() {
        let begin = i * CHUNK_SIZE;
        let end = begin + chunk.len();
        if end > plaintext.len() {
            return Err(MiniLockError::BadEncoding(
                "declared chunk length would write past end of plaintext".into(),
            ));
        }
        plaintext[begin..end].copy_from_slice(chunk);
    }
    Ok((filename, plaintext))
}

fn check_stream_args<'a>(
    key: &'a [u8],
    base_nonce: &'a [u8],
) -> Result<(&'a [u8; KEY_LENGTH], &'a [u8; BASE_NONCE_LENGTH]), MiniLockError> {
    let key = key.try_into().map_err(|_| {
        MiniLockError::BadArgument(format!(
            "stream key must be {KEY_LENGTH} bytes, got {}",
            key.len()
        ))
    })?;
    let base_nonce = base_nonce.try_into().map_err(|_| {
        MiniLockError::BadArgument(format!(
            "base nonce must be {BASE_NONCE_LENGTH} bytes, got {}",
            base_nonce.len()
        ))
    })?;
    Ok((key, base_nonce))
}
