//! Fixed-offset binary container header (§6).
//!
//! Every field lives at an exact byte offset; there is no length-prefixed or
//! self-describing framing above the original-filename field. Reserved bytes
//! must be zero on write and are ignored on read.

use std::io::Read;

use anyhow::{Result, bail, ensure};

use crate::config::{ALGO_TRIPLE_CASCADE, CURRENT_VERSION, MAGIC, SALT_LEN, TRIPLE_NONCE_LEN, header_layout as layout};
use crate::kdf::KdfParams;

/// A parsed or about-to-be-serialized container header (§3 `FileContainer`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    pub kdf_params: KdfParams,
    pub algo: u8,
    pub salt: [u8; SALT_LEN],
    pub nonce_seed: [u8; TRIPLE_NONCE_LEN],
    /// Advisory only (§9 Open Questions): the core never uses this to force
    /// a restore path, it is carried for the caller's convenience.
    pub original_name: String,
}

impl Header {
    /// Builds a header for a fresh encryption job. `algo` is always
    /// [`ALGO_TRIPLE_CASCADE`] today; the field exists for forward
    /// compatibility with a future second algorithm.
    #[must_use]
    pub fn new(kdf_params: KdfParams, salt: [u8; SALT_LEN], nonce_seed: [u8; TRIPLE_NONCE_LEN], original_name: String) -> Self {
        Self { kdf_params, algo: ALGO_TRIPLE_CASCADE, salt, nonce_seed, original_name }
    }

    /// Serializes the header to its fixed-offset binary form.
    ///
    /// # Errors
    /// Returns an error if `original_name` exceeds [`layout::MAX_NAME_LEN`]
    /// bytes once UTF-8 encoded.
    pub fn serialize(&self) -> Result<Vec<u8>> {
        let name_bytes = self.original_name.as_bytes();
        ensure!(
            name_bytes.len() <= layout::MAX_NAME_LEN,
            "InvalidCryptoboxInput: original filename exceeds {} bytes",
            layout::MAX_NAME_LEN
        );
        let name_len = u16::try_from(name_bytes.len()).map_err(|_| anyhow::anyhow!("InvalidCryptoboxInput: filename length overflow"))?;

        let mut out = vec![0u8; layout::NAME_OFFSET + name_bytes.len()];
        out[layout::MAGIC_OFFSET..layout::MAGIC_OFFSET + layout::MAGIC_LEN].copy_from_slice(&MAGIC);
        out[layout::VERSION_OFFSET..layout::VERSION_OFFSET + layout::VERSION_LEN].copy_from_slice(&CURRENT_VERSION.to_le_bytes());
        out[layout::KDF_MEMORY_OFFSET..layout::KDF_MEMORY_OFFSET + layout::KDF_MEMORY_LEN]
            .copy_from_slice(&self.kdf_params.memory_kib.to_le_bytes());
        out[layout::KDF_ITERATIONS_OFFSET..layout::KDF_ITERATIONS_OFFSET + layout::KDF_ITERATIONS_LEN]
            .copy_from_slice(&self.kdf_params.iterations.to_le_bytes());
        out[layout::ALGO_OFFSET] = self.algo;
        // layout::RESERVED_OFFSET..+RESERVED_LEN is already zero from the vec! initializer.
        out[layout::SALT_OFFSET..layout::SALT_OFFSET + layout::SALT_LEN].copy_from_slice(&self.salt);
        out[layout::NONCE_SEED_OFFSET..layout::NONCE_SEED_OFFSET + layout::NONCE_SEED_LEN].copy_from_slice(&self.nonce_seed);
        out[layout::NAME_LEN_OFFSET..layout::NAME_LEN_OFFSET + layout::NAME_LEN_LEN].copy_from_slice(&name_len.to_le_bytes());
        out[layout::NAME_OFFSET..layout::NAME_OFFSET + name_bytes.len()].copy_from_slice(name_bytes);

        Ok(out)
    }

    /// Parses a header from the start of `bytes`, returning the header and
    /// the number of bytes it consumed so the caller can locate the body.
    ///
    /// # Errors
    /// `NotAnArsenicFile` on magic mismatch, `BadCryptoboxVersion` on an
    /// unrecognized version, `SrcHeaderReadError` if `bytes` is too short to
    /// contain a complete header, `InvalidCryptoboxInput` on a malformed
    /// filename field.
    pub fn parse(bytes: &[u8]) -> Result<(Self, usize)> {
        if bytes.len() < layout::NAME_LEN_OFFSET + layout::NAME_LEN_LEN {
            bail!("SrcHeaderReadError: truncated container header");
        }

        if bytes[layout::MAGIC_OFFSET..layout::MAGIC_OFFSET + layout::MAGIC_LEN] != MAGIC {
            bail!("NotAnArsenicFile: magic bytes did not match");
        }

        let version = u16::from_le_bytes(
            bytes[layout::VERSION_OFFSET..layout::VERSION_OFFSET + layout::VERSION_LEN].try_into().expect("fixed-size slice"),
        );
        if version != CURRENT_VERSION {
            bail!("BadCryptoboxVersion: unsupported container version {version}");
        }

        let memory_kib = u32::from_le_bytes(
            bytes[layout::KDF_MEMORY_OFFSET..layout::KDF_MEMORY_OFFSET + layout::KDF_MEMORY_LEN].try_into().expect("fixed-size slice"),
        );
        let iterations = u32::from_le_bytes(
            bytes[layout::KDF_ITERATIONS_OFFSET..layout::KDF_ITERATIONS_OFFSET + layout::KDF_ITERATIONS_LEN]
                .try_into()
                .expect("fixed-size slice"),
        );
        let algo = bytes[layout::ALGO_OFFSET];
        if algo != ALGO_TRIPLE_CASCADE {
            bail!("InvalidCryptoboxInput: unrecognized algorithm selector {algo}");
        }

        let mut salt = [0u8; SALT_LEN];
        salt.copy_from_slice(&bytes[layout::SALT_OFFSET..layout::SALT_OFFSET + layout::SALT_LEN]);

        let mut nonce_seed = [0u8; TRIPLE_NONCE_LEN];
        nonce_seed.copy_from_slice(&bytes[layout::NONCE_SEED_OFFSET..layout::NONCE_SEED_OFFSET + layout::NONCE_SEED_LEN]);

        let name_len = u16::from_le_bytes(
            bytes[layout::NAME_LEN_OFFSET..layout::NAME_LEN_OFFSET + layout::NAME_LEN_LEN].try_into().expect("fixed-size slice"),
        ) as usize;
        ensure!(name_len <= layout::MAX_NAME_LEN, "InvalidCryptoboxInput: header name length {name_len} exceeds bound");

        let name_end = layout::NAME_OFFSET + name_len;
        if bytes.len() < name_end {
            bail!("SrcHeaderReadError: truncated original-filename field");
        }
        let original_name = String::from_utf8(bytes[layout::NAME_OFFSET..name_end].to_vec())
            .map_err(|_| anyhow::anyhow!("InvalidCryptoboxInput: original filename is not valid UTF-8"))?;

        Ok((
            Self { kdf_params: KdfParams { memory_kib, iterations }, algo, salt, nonce_seed, original_name },
            name_end,
        ))
    }

    /// Reads a header directly off a stream, without requiring the caller to
    /// buffer the whole container first. Reads the fixed-width prefix, then
    /// the variable-length name field once its length is known.
    ///
    /// # Errors
    /// Same as [`parse`](Self::parse), plus propagates I/O errors; an EOF
    /// partway through either read is reported as `SrcHeaderReadError`.
    pub fn read_from<R: Read>(source: &mut R) -> Result<Self> {
        let mut prefix = vec![0u8; layout::NAME_LEN_OFFSET + layout::NAME_LEN_LEN];
        read_exact_mapped(source, &mut prefix)?;

        let name_len = u16::from_le_bytes(
            prefix[layout::NAME_LEN_OFFSET..layout::NAME_LEN_OFFSET + layout::NAME_LEN_LEN].try_into().expect("fixed-size slice"),
        ) as usize;
        ensure!(name_len <= layout::MAX_NAME_LEN, "InvalidCryptoboxInput: header name length {name_len} exceeds bound");

        let mut full = prefix;
        full.resize(layout::NAME_OFFSET + name_len, 0);
        read_exact_mapped(source, &mut full[layout::NAME_OFFSET..])?;

        let (header, _) = Self::parse(&full)?;
        Ok(header)
    }
}

fn read_exact_mapped<R: Read>(source: &mut R, buf: &mut [u8]) -> Result<()> {
    match source.read_exact(buf) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::UnexpectedEof => bail!("SrcHeaderReadError: truncated container header"),
        Err(e) => Err(e.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Header {
        Header::new(
            KdfParams { memory_kib: 65_536, iterations: 3 },
            [7u8; SALT_LEN],
            [9u8; TRIPLE_NONCE_LEN],
            "notes.txt".to_string(),
        )
    }

    /// §8 invariant 9: header round-trip.
    #[test]
    fn round_trip() {
        let header = sample();
        let bytes = header.serialize().unwrap();
        let (parsed, consumed) = Header::parse(&bytes).unwrap();
        assert_eq!(parsed, header);
        assert_eq!(consumed, bytes.len());
    }

    #[test]
    fn empty_name_round_trips() {
        let header = Header::new(KdfParams { memory_kib: 1024, iterations: 1 }, [0u8; SALT_LEN], [0u8; TRIPLE_NONCE_LEN], String::new());
        let bytes = header.serialize().unwrap();
        let (parsed, _) = Header::parse(&bytes).unwrap();
        assert_eq!(parsed.original_name, "");
    }

    #[test]
    fn reserved_bytes_are_zero_on_write() {
        let bytes = sample().serialize().unwrap();
        let reserved = &bytes[crate::config::header_layout::RESERVED_OFFSET
            ..crate::config::header_layout::RESERVED_OFFSET + crate::config::header_layout::RESERVED_LEN];
        assert!(reserved.iter().all(|&b| b == 0));
    }

    #[test]
    fn wrong_magic_rejected() {
        let mut bytes = sample().serialize().unwrap();
        bytes[0] = b'X';
        let err = Header::parse(&bytes).unwrap_err();
        assert!(err.to_string().contains("NotAnArsenicFile"));
    }

    #[test]
    fn wrong_version_rejected() {
        let mut bytes = sample().serialize().unwrap();
        bytes[4..6].copy_from_slice(&99u16.to_le_bytes());
        let err = Header::parse(&bytes).unwrap_err();
        assert!(err.to_string().contains("BadCryptoboxVersion"));
    }

    #[test]
    fn truncated_header_rejected() {
        let bytes = sample().serialize().unwrap();
        let err = Header::parse(&bytes[..50]).unwrap_err();
        assert!(err.to_string().contains("SrcHeaderReadError"));
    }

    #[test]
    fn read_from_reader_matches_parse() {
        let header = sample();
        let bytes = header.serialize().unwrap();
        let mut cursor = std::io::Cursor::new(bytes);
        let read = Header::read_from(&mut cursor).unwrap();
        assert_eq!(read, header);
    }

    #[test]
    fn read_from_truncated_reader_is_header_read_error() {
        let bytes = sample().serialize().unwrap();
        let mut cursor = std::io::Cursor::new(&bytes[..20]);
        let err = Header::read_from(&mut cursor).unwrap_err();
        assert!(err.to_string().contains("SrcHeaderReadError"));
    }
}
