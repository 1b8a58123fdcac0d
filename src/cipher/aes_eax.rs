//! AES-256/EAX stage of the cascade (§4.D, cascade position 2).

use aes::Aes256;
use aes::cipher::consts::U24;
use anyhow::{Result, anyhow};
use eax::Eax;
use eax::aead::{AeadInPlace, KeyInit};

use crate::config::{CIPHER_KEY_LEN, CIPHER_NONCE_LEN};

type Aes256Eax = Eax<Aes256, U24>;

pub struct AesEaxStage {
    inner: Aes256Eax,
}

impl AesEaxStage {
    pub fn new(key: &[u8; CIPHER_KEY_LEN]) -> Result<Self> {
        Ok(Self { inner: Aes256Eax::new_from_slice(key).map_err(|e| anyhow!("aes-256/eax key setup failed: {e}"))? })
    }

    /// Encrypts `buffer` in place, appending the 16-byte EAX tag.
    pub fn encrypt_in_place(&self, nonce: &[u8; CIPHER_NONCE_LEN], buffer: &mut Vec<u8>) -> Result<()> {
        self.inner.encrypt_in_place(nonce.into(), b"", buffer).map_err(|e| anyhow!("aes-256/eax encryption failed: {e}"))
    }

    /// Verifies and removes the EAX tag, decrypting `buffer` in place.
    ///
    /// # Errors
    /// Returns `DecryptFail`-equivalent on tag mismatch.
    pub fn decrypt_in_place(&self, nonce: &[u8; CIPHER_NONCE_LEN], buffer: &mut Vec<u8>) -> Result<()> {
        self.inner.decrypt_in_place(nonce.into(), b"", buffer).map_err(|_| anyhow!("DecryptFail: aes-256/eax authentication failed"))
    }
}
