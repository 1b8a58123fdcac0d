//! Serpent/GCM stage of the cascade (§4.D, cascade position 3, outermost on
//! disk per the rationale in §4.D: corruption or a wrong key is caught here
//! before the other two stages ever run).

use anyhow::{Result, anyhow};
use gcm::AesGcm;
use gcm::aead::{AeadInPlace, KeyInit, consts::U24};
use serpent::Serpent;

use crate::config::{CIPHER_KEY_LEN, CIPHER_NONCE_LEN};

type SerpentGcm = AesGcm<Serpent, U24>;

pub struct SerpentGcmStage {
    inner: SerpentGcm,
}

impl SerpentGcmStage {
    pub fn new(key: &[u8; CIPHER_KEY_LEN]) -> Result<Self> {
        Ok(Self { inner: SerpentGcm::new_from_slice(key).map_err(|e| anyhow!("serpent/gcm key setup failed: {e}"))? })
    }

    /// Encrypts `buffer` in place, appending the 16-byte GCM tag.
    pub fn encrypt_in_place(&self, nonce: &[u8; CIPHER_NONCE_LEN], buffer: &mut Vec<u8>) -> Result<()> {
        self.inner.encrypt_in_place(nonce.into(), b"", buffer).map_err(|e| anyhow!("serpent/gcm encryption failed: {e}"))
    }

    /// Verifies and removes the GCM tag, decrypting `buffer` in place.
    ///
    /// # Errors
    /// Returns `DecryptFail`-equivalent on tag mismatch. Per §4.D, this is the
    /// outermost tag on decrypt: a mismatch here means the inner two stages
    /// never run.
    pub fn decrypt_in_place(&self, nonce: &[u8; CIPHER_NONCE_LEN], buffer: &mut Vec<u8>) -> Result<()> {
        self.inner.decrypt_in_place(nonce.into(), b"", buffer).map_err(|_| anyhow!("DecryptFail: serpent/gcm authentication failed"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roundtrip() {
        let stage = SerpentGcmStage::new(&[9u8; CIPHER_KEY_LEN]).unwrap();
        let nonce = [4u8; CIPHER_NONCE_LEN];
        let mut buf = b"outermost tag".to_vec();
        stage.encrypt_in_place(&nonce, &mut buf).unwrap();
        assert_ne!(buf, b"outermost tag");
        stage.decrypt_in_place(&nonce, &mut buf).unwrap();
        assert_eq!(buf, b"outermost tag");
    }

    #[test]
    fn wrong_key_fails() {
        let stage = SerpentGcmStage::new(&[9u8; CIPHER_KEY_LEN]).unwrap();
        let other = SerpentGcmStage::new(&[1u8; CIPHER_KEY_LEN]).unwrap();
        let nonce = [4u8; CIPHER_NONCE_LEN];
        let mut buf = b"outermost tag".to_vec();
        stage.encrypt_in_place(&nonce, &mut buf).unwrap();
        assert!(other.decrypt_in_place(&nonce, &mut buf).is_err());
    }
}
