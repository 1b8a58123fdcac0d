//! Triple-nonce pipeline (§4.C).
//!
//! Splits a 72-byte seed into three independent 24-byte little-endian
//! counters and increments all three, independently, exactly once per chunk.
//! The increment is `sodium_increment`-compatible: little-endian add-one with
//! full carry propagation across all 24 bytes. Reimplemented directly here
//! rather than pulling in a general crypto library for one helper (§9).

use crate::config::{CASCADE_LEN, CIPHER_NONCE_LEN, TRIPLE_NONCE_LEN};

/// Three independent 24-byte nonce counters, in cascade order
/// `[ChaCha20, AES, Serpent]` (§3 `TripleNonce`).
pub struct TripleNonce {
    counters: [[u8; CIPHER_NONCE_LEN]; CASCADE_LEN],
}

impl TripleNonce {
    /// Splits a 72-byte seed into three 24-byte counters. The seed itself is
    /// never used directly as a nonce; callers must call
    /// [`increment`](Self::increment) before the first cipher start so that
    /// nonce value 0 never sees the wire under a derived key (§4.C).
    #[must_use]
    pub fn from_seed(seed: &[u8; TRIPLE_NONCE_LEN]) -> Self {
        let mut counters = [[0u8; CIPHER_NONCE_LEN]; CASCADE_LEN];
        for (i, counter) in counters.iter_mut().enumerate() {
            let start = i * CIPHER_NONCE_LEN;
            counter.copy_from_slice(&seed[start..start + CIPHER_NONCE_LEN]);
        }
        Self { counters }
    }

    /// Increments all three counters independently, little-endian add-one
    /// with carry. Must be called exactly once per chunk, before any cipher
    /// in the cascade starts.
    pub fn increment(&mut self) {
        for counter in &mut self.counters {
            sodium_increment(counter);
        }
    }

    #[must_use]
    pub fn chacha(&self) -> &[u8; CIPHER_NONCE_LEN] {
        &self.counters[0]
    }

    #[must_use]
    pub fn aes(&self) -> &[u8; CIPHER_NONCE_LEN] {
        &self.counters[1]
    }

    #[must_use]
    pub fn serpent(&self) -> &[u8; CIPHER_NONCE_LEN] {
        &self.counters[2]
    }
}

/// Little-endian add-one-with-carry over the full width of `bytes`, matching
/// `sodium_increment`'s semantics (§9).
fn sodium_increment(bytes: &mut [u8; CIPHER_NONCE_LEN]) {
    let mut carry: u16 = 1;
    for byte in bytes.iter_mut() {
        let sum = u16::from(*byte) + carry;
        *byte = sum as u8;
        carry = sum >> 8;
        if carry == 0 {
            break;
        }
    }
}
