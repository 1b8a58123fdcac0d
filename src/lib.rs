//! Arsenic: file encryption via a cascade of three authenticated ciphers.
//!
//! Plaintext is protected by ChaCha20-Poly1305, then AES-256/EAX, then
//! Serpent/GCM, each with an independent key derived from a single
//! passphrase via Argon2id. See [`job`] for the orchestrator entry point
//! used by the CLI binary.

pub mod cipher;
pub mod config;
pub mod container;
pub mod error;
pub mod job;
pub mod kdf;
pub mod nonce;
pub mod rng;
pub mod secret;
