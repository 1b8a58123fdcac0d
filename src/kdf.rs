//! Argon2id key derivation (§4.B).
//!
//! Derives the 96-byte [`DerivedKeys`] from a passphrase and a 16-byte salt.
//! Parallelism is fixed (`config::KDF_PARALLELISM`); only memory and
//! iterations vary per job, and both round-trip through the container header
//! so decryption can reconstruct identical derivation.

use anyhow::{Result, anyhow, ensure};
use argon2::Algorithm::Argon2id;
use argon2::Version::V0x13;
use argon2::{Argon2, Params};

use crate::config::{CIPHER_KEY_LEN, DERIVED_KEYS_LEN, KDF_PARALLELISM};
use crate::secret::SecretArray;

/// Tunable Argon2id cost parameters (§3 `KDFParams`). Parallelism is not a
/// field here because it is a fixed constant, not a per-job choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KdfParams {
    pub memory_kib: u32,
    pub iterations: u32,
}

/// 96 bytes of keying material split into three contiguous 32-byte keys, in
/// cascade order `[ChaCha20, AES, Serpent]` (§3 `DerivedKeys`).
pub struct DerivedKeys {
    bytes: SecretArray<DERIVED_KEYS_LEN>,
}

impl DerivedKeys {
    #[must_use]
    pub fn chacha_key(&self) -> &[u8; CIPHER_KEY_LEN] {
        self.slice(0)
    }

    #[must_use]
    pub fn aes_key(&self) -> &[u8; CIPHER_KEY_LEN] {
        self.slice(1)
    }

    #[must_use]
    pub fn serpent_key(&self) -> &[u8; CIPHER_KEY_LEN] {
        self.slice(2)
    }

    fn slice(&self, index: usize) -> &[u8; CIPHER_KEY_LEN] {
        let start = index * CIPHER_KEY_LEN;
        self.bytes.expose_secret()[start..start + CIPHER_KEY_LEN].try_into().expect("fixed-size slice")
    }
}

/// Derives [`DerivedKeys`] from `passphrase` and `salt` using Argon2id.
///
/// # Errors
/// Returns `EmptyPassword`-equivalent ([`anyhow::Error`] carrying that
/// message; the orchestrator maps it to `ErrorCode::EmptyPassword`) if
/// `passphrase` is empty, and a `KdfUnavailable`-equivalent error if the
/// underlying Argon2 implementation rejects the parameters.
pub fn derive(passphrase: &[u8], salt: &[u8; crate::config::SALT_LEN], params: KdfParams) -> Result<DerivedKeys> {
    ensure!(!passphrase.is_empty(), "EmptyPassword: passphrase must not be empty");

    let argon2_params = Params::new(params.memory_kib, params.iterations, KDF_PARALLELISM, Some(DERIVED_KEYS_LEN))
        .map_err(|e| anyhow!("KdfUnavailable: invalid argon2id parameters: {e}"))?;
    let argon2 = Argon2::new(Argon2id, V0x13, argon2_params);

    let mut out = [0u8; DERIVED_KEYS_LEN];
    argon2
        .hash_password_into(passphrase, salt, &mut out)
        .map_err(|e| anyhow!("KdfUnavailable: argon2id derivation failed: {e}"))?;

    Ok(DerivedKeys { bytes: SecretArray::new(out) })
}
