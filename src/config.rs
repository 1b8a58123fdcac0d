//! Cryptographic constants and on-disk format parameters.
//!
//! This module is the single source of truth for sizes and magic values that
//! both the writer and the reader side of the container codec must agree on.

/// Plaintext chunk size used by the container codec (§3/§4.E).
pub const CHUNK_SIZE: usize = 65_536;

/// Length in bytes of a single AEAD key (ChaCha20-Poly1305, AES-256, or Serpent).
pub const CIPHER_KEY_LEN: usize = 32;

/// Length in bytes of a single per-cipher nonce counter.
pub const CIPHER_NONCE_LEN: usize = 24;

/// Number of ciphers in the cascade.
pub const CASCADE_LEN: usize = 3;

/// Total length of the derived keying material (3 * 32 bytes, §3 `DerivedKeys`).
pub const DERIVED_KEYS_LEN: usize = CIPHER_KEY_LEN * CASCADE_LEN;

/// Total length of the triple-nonce seed (3 * 24 bytes, §3 `TripleNonce`).
pub const TRIPLE_NONCE_LEN: usize = CIPHER_NONCE_LEN * CASCADE_LEN;

/// Length of the per-file Argon2id salt.
pub const SALT_LEN: usize = 16;

/// Magic bytes identifying an Arsenic container (§6).
pub const MAGIC: [u8; 4] = *b"ARSN";

/// Current on-disk container version. Unknown versions fail with `BadCryptoboxVersion`.
pub const CURRENT_VERSION: u16 = 1;

/// The only defined algorithm selector value (triple cascade).
pub const ALGO_TRIPLE_CASCADE: u8 = 0;

/// Fixed Argon2id parallelism (§4.B: "parallelism is a fixed interactive
/// constant"). The header only ever records memory and iterations.
pub const KDF_PARALLELISM: u32 = 1;

/// Fixed byte offset/size layout of the container header (§6). All integers
/// are little-endian; offsets are absolute from the start of the stream.
pub mod header_layout {
    pub const MAGIC_OFFSET: usize = 0;
    pub const MAGIC_LEN: usize = 4;
    pub const VERSION_OFFSET: usize = 4;
    pub const VERSION_LEN: usize = 2;
    pub const KDF_MEMORY_OFFSET: usize = 6;
    pub const KDF_MEMORY_LEN: usize = 4;
    pub const KDF_ITERATIONS_OFFSET: usize = 10;
    pub const KDF_ITERATIONS_LEN: usize = 4;
    pub const ALGO_OFFSET: usize = 14;
    pub const ALGO_LEN: usize = 1;
    pub const RESERVED_OFFSET: usize = 15;
    pub const RESERVED_LEN: usize = 15;
    pub const SALT_OFFSET: usize = 30;
    pub const SALT_LEN: usize = 16;
    pub const NONCE_SEED_OFFSET: usize = 46;
    pub const NONCE_SEED_LEN: usize = 72;
    pub const NAME_LEN_OFFSET: usize = 118;
    pub const NAME_LEN_LEN: usize = 2;
    pub const NAME_OFFSET: usize = 120;

    /// Upper bound on the original-filename field so a corrupt `name_len`
    /// can't force an unbounded allocation while parsing a header.
    pub const MAX_NAME_LEN: usize = 4096;
}

/// Named Argon2id parameter presets exposed at the orchestrator boundary (§6).
pub mod kdf_presets {
    use crate::kdf::KdfParams;

    pub const INTERACTIVE: KdfParams = KdfParams { memory_kib: 64 * 1024, iterations: 2 };
    pub const MODERATE: KdfParams = KdfParams { memory_kib: 256 * 1024, iterations: 3 };
    pub const SENSITIVE: KdfParams = KdfParams { memory_kib: 1024 * 1024, iterations: 4 };
}

/// Armor envelope delimiters and wrap width (§6).
pub mod armor {
    pub const BEGIN_LINE: &str = "-----BEGIN ARSENIC-----";
    pub const END_LINE: &str = "-----END ARSENIC-----";
    pub const WRAP_COLUMN: usize = 64;
}
