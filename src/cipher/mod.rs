//! # Triple-cascade cipher engine
//!
//! Composes the three AEAD stages into the cascade described in §4.D:
//! ChaCha20-Poly1305 → AES-256/EAX → Serpent/GCM on encrypt, and the exact
//! reverse order on decrypt. Each stage uses an independent key (from
//! [`crate::kdf::DerivedKeys`]) and an independent nonce counter (from
//! [`crate::nonce::TripleNonce`]); there is no shared state between stages
//! beyond the chunk buffer itself.
//!
//! A tag failure at any stage aborts the cascade immediately: on decrypt this
//! means an attacker who flips bits in the outermost layer never gets a
//! chance to see whether the inner layers would have decrypted anything.

mod aes_eax;
mod chacha;
mod serpent_gcm;

use anyhow::Result;

use crate::kdf::DerivedKeys;
use crate::nonce::TripleNonce;

use aes_eax::AesEaxStage;
use chacha::ChaChaStage;
use serpent_gcm::SerpentGcmStage;

/// Holds the three keyed stage contexts. Built once per job from
/// [`DerivedKeys`] and reused for every chunk; only the nonce advances
/// between calls.
pub struct TripleCipher {
    chacha: ChaChaStage,
    aes: AesEaxStage,
    serpent: SerpentGcmStage,
}

impl TripleCipher {
    pub fn new(keys: &DerivedKeys) -> Result<Self> {
        Ok(Self {
            chacha: ChaChaStage::new(keys.chacha_key())?,
            aes: AesEaxStage::new(keys.aes_key())?,
            serpent: SerpentGcmStage::new(keys.serpent_key())?,
        })
    }

    /// Advances `nonce` by one, then encrypts `buffer` in place through the
    /// full cascade: ChaCha20-Poly1305, then AES-256/EAX, then Serpent/GCM.
    /// Each stage appends its own 16-byte tag, so the buffer grows by 48
    /// bytes total.
    pub fn encrypt_chunk(&self, nonce: &mut TripleNonce, buffer: &mut Vec<u8>) -> Result<()> {
        nonce.increment();
        self.chacha.encrypt_in_place(nonce.chacha(), buffer)?;
        self.aes.encrypt_in_place(nonce.aes(), buffer)?;
        self.serpent.encrypt_in_place(nonce.serpent(), buffer)?;
        Ok(())
    }

    /// Advances `nonce` by one, then decrypts `buffer` in place through the
    /// cascade in reverse: Serpent/GCM, then AES-256/EAX, then
    /// ChaCha20-Poly1305. Stops at the first tag mismatch; later stages never
    /// run and the buffer is left in whatever partially-unwrapped state the
    /// failing stage produced, which callers must discard rather than treat
    /// as plaintext.
    pub fn decrypt_chunk(&self, nonce: &mut TripleNonce, buffer: &mut Vec<u8>) -> Result<()> {
        nonce.increment();
        self.serpent.decrypt_in_place(nonce.serpent(), buffer)?;
        self.aes.decrypt_in_place(nonce.aes(), buffer)?;
        self.chacha.decrypt_in_place(nonce.chacha(), buffer)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{SALT_LEN, TRIPLE_NONCE_LEN};
    use crate::kdf::{self, KdfParams};

    fn test_keys() -> DerivedKeys {
        let salt = [11u8; SALT_LEN];
        kdf::derive(b"correct horse battery staple", &salt, KdfParams { memory_kib: 8 * 1024, iterations: 1 }).unwrap()
    }

    #[test]
    fn cascade_roundtrip() {
        let keys = test_keys();
        let cipher = TripleCipher::new(&keys).unwrap();
        let seed = [21u8; TRIPLE_NONCE_LEN];
        let mut enc_nonce = TripleNonce::from_seed(&seed);
        let mut dec_nonce = TripleNonce::from_seed(&seed);

        let mut buf = b"three layers of authenticated encryption".to_vec();
        cipher.encrypt_chunk(&mut enc_nonce, &mut buf).unwrap();
        assert_ne!(buf, b"three layers of authenticated encryption");
        cipher.decrypt_chunk(&mut dec_nonce, &mut buf).unwrap();
        assert_eq!(buf, b"three layers of authenticated encryption");
    }

    #[test]
    fn successive_chunks_use_independent_nonces() {
        let keys = test_keys();
        let cipher = TripleCipher::new(&keys).unwrap();
        let seed = [21u8; TRIPLE_NONCE_LEN];
        let mut nonce = TripleNonce::from_seed(&seed);

        let mut chunk_a = b"chunk one payload".to_vec();
        cipher.encrypt_chunk(&mut nonce, &mut chunk_a).unwrap();
        let mut chunk_b = b"chunk one payload".to_vec();
        cipher.encrypt_chunk(&mut nonce, &mut chunk_b).unwrap();

        assert_ne!(chunk_a, chunk_b);
    }

    #[test]
    fn tampered_outer_layer_aborts_before_inner_layers() {
        let keys = test_keys();
        let cipher = TripleCipher::new(&keys).unwrap();
        let seed = [21u8; TRIPLE_NONCE_LEN];
        let mut enc_nonce = TripleNonce::from_seed(&seed);
        let mut dec_nonce = TripleNonce::from_seed(&seed);

        let mut buf = b"tamper target".to_vec();
        cipher.encrypt_chunk(&mut enc_nonce, &mut buf).unwrap();
        let len = buf.len();
        buf[len - 1] ^= 0x01;
        assert!(cipher.decrypt_chunk(&mut dec_nonce, &mut buf).is_err());
    }

    #[test]
    fn wrong_key_fails_closed() {
        let keys_a = test_keys();
        let salt = [12u8; SALT_LEN];
        let keys_b = kdf::derive(b"a different passphrase", &salt, KdfParams { memory_kib: 8 * 1024, iterations: 1 }).unwrap();
        let cipher_a = TripleCipher::new(&keys_a).unwrap();
        let cipher_b = TripleCipher::new(&keys_b).unwrap();
        let seed = [21u8; TRIPLE_NONCE_LEN];
        let mut enc_nonce = TripleNonce::from_seed(&seed);
        let mut dec_nonce = TripleNonce::from_seed(&seed);

        let mut buf = b"wrong passphrase test".to_vec();
        cipher_a.encrypt_chunk(&mut enc_nonce, &mut buf).unwrap();
        assert!(cipher_b.decrypt_chunk(&mut dec_nonce, &mut buf).is_err());
    }
}
