//! ChaCha20-Poly1305 stage of the cascade (§4.D, cascade position 1).
//!
//! Uses the extended-nonce (XChaCha20) construction so that the 24-byte
//! counters produced by the nonce pipeline (§4.C) can be fed in directly;
//! standard ChaCha20-Poly1305 only accepts a 12-byte nonce, but the
//! triple-nonce format is uniformly 24 bytes per cipher across the cascade
//! (see DESIGN.md for the tradeoff this records).

use anyhow::{Result, anyhow};
use chacha20poly1305::aead::{AeadInPlace, KeyInit};
use chacha20poly1305::{XChaCha20Poly1305, XNonce};

use crate::config::{CIPHER_KEY_LEN, CIPHER_NONCE_LEN};

pub struct ChaChaStage {
    inner: XChaCha20Poly1305,
}

impl ChaChaStage {
    pub fn new(key: &[u8; CIPHER_KEY_LEN]) -> Result<Self> {
        Ok(Self { inner: XChaCha20Poly1305::new_from_slice(key).map_err(|e| anyhow!("chacha20poly1305 key setup failed: {e}"))? })
    }

    /// Encrypts `buffer` in place, appending the 16-byte Poly1305 tag.
    pub fn encrypt_in_place(&self, nonce: &[u8; CIPHER_NONCE_LEN], buffer: &mut Vec<u8>) -> Result<()> {
        self.inner
            .encrypt_in_place(XNonce::from_slice(nonce), b"", buffer)
            .map_err(|e| anyhow!("chacha20poly1305 encryption failed: {e}"))
    }

    /// Verifies and removes the Poly1305 tag, decrypting `buffer` in place.
    ///
    /// # Errors
    /// Returns `DecryptFail`-equivalent on tag mismatch; no partial plaintext
    /// is left in `buffer` on failure.
    pub fn decrypt_in_place(&self, nonce: &[u8; CIPHER_NONCE_LEN], buffer: &mut Vec<u8>) -> Result<()> {
        self.inner
            .decrypt_in_place(XNonce::from_slice(nonce), b"", buffer)
            .map_err(|_| anyhow!("DecryptFail: chacha20poly1305 authentication failed"))
    }
}
