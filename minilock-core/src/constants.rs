//! Protocol constants — canonical values of the miniLock v1 format.
//!
//! Every value here is fixed by the wire format. None of them are
//! tunables; changing any one produces containers other miniLock
//! implementations cannot open.

/// ASCII magic prefix of every miniLock container.
pub const MAGIC_BYTES: &[u8; 8] = b"miniLock";

/// Container format version carried in the header.
pub const MINILOCK_VERSION: u32 = 1;

/// Maximum plaintext bytes per payload chunk (1 MiB).
pub const CHUNK_SIZE: usize = 1_048_576;

/// NaCl box/secretbox overhead (Poly1305 MAC).
pub const BOX_OVERHEAD: usize = 16;

/// Little-endian length prefix preceding each on-wire block.
pub const LENGTH_PREFIX_SIZE: usize = 4;

/// On-wire size of a full payload block: prefix + chunk + MAC.
pub const BLOCK_LENGTH: usize = CHUNK_SIZE + BOX_OVERHEAD + LENGTH_PREFIX_SIZE;

/// Plaintext size of the filename chunk (zero-padded).
pub const NAME_CHUNK_LENGTH: usize = 256;

/// On-wire size of the filename block.
pub const NAME_BLOCK_LENGTH: usize = NAME_CHUNK_LENGTH + BOX_OVERHEAD + LENGTH_PREFIX_SIZE;

/// Per-file base nonce length; per-chunk nonces extend it to 24 bytes.
pub const BASE_NONCE_LENGTH: usize = 16;

/// NaCl box/secretbox nonce length.
pub const FULL_NONCE_LENGTH: usize = 24;

/// Symmetric key length.
pub const KEY_LENGTH: usize = 32;

/// Curve25519 public key length.
pub const PUBLIC_KEY_LENGTH: usize = 32;

/// Curve25519 secret key length.
pub const SECRET_KEY_LENGTH: usize = 32;

/// BLAKE2s checksum byte appended to the public key in a miniLock ID.
pub const ID_CHECKSUM_LENGTH: usize = 1;

/// scrypt cost parameter for identity derivation: N = 2^17 = 131072.
pub const SCRYPT_LOG_N: u8 = 17;

/// scrypt block size parameter.
pub const SCRYPT_R: u32 = 8;

/// scrypt parallelization parameter.
pub const SCRYPT_P: u32 = 1;
