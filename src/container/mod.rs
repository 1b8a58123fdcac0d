//! Container codec (§4.E): glues the header, chunk-framing codec, and armor
//! wrapper into the two whole-file operations the job orchestrator drives.

pub mod armor;
pub mod codec;
pub mod header;

use std::io::{Cursor, Read, Write};
use std::sync::atomic::{AtomicBool, AtomicU64};

use anyhow::Result;

use crate::cipher::TripleCipher;
use crate::config::armor::BEGIN_LINE;
use crate::config::{SALT_LEN, TRIPLE_NONCE_LEN};
use crate::kdf::{self, KdfParams};
use crate::nonce::TripleNonce;
use crate::rng;

use header::Header;

/// Encrypts the full contents of `source` into `sink` as an Arsenic
/// container (§4.E write path). `original_name` is carried in the header as
/// an advisory restore-name hint (§9 Open Questions).
///
/// # Errors
/// `EmptyPassword` if `passphrase` is empty; propagates KDF, cipher, and I/O
/// errors; `AbortedByUser` if `cancel` is observed between chunks.
pub fn encrypt<R: Read, W: Write>(
    source: &mut R,
    sink: &mut W,
    passphrase: &[u8],
    kdf_params: KdfParams,
    original_name: String,
    armor_output: bool,
    progress: &AtomicU64,
    cancel: &AtomicBool,
) -> Result<()> {
    let salt: [u8; SALT_LEN] = rng::random_array()?;
    let nonce_seed: [u8; TRIPLE_NONCE_LEN] = rng::random_array()?;

    let keys = kdf::derive(passphrase, &salt, kdf_params)?;
    let cipher = TripleCipher::new(&keys)?;
    let mut nonce = TripleNonce::from_seed(&nonce_seed);

    let header = Header::new(kdf_params, salt, nonce_seed, original_name);
    let header_bytes = header.serialize()?;

    if armor_output {
        let mut binary = header_bytes;
        codec::write_body(source, &mut binary, &cipher, &mut nonce, progress, cancel)?;
        sink.write_all(armor::wrap(&binary).as_bytes())?;
    } else {
        sink.write_all(&header_bytes)?;
        codec::write_body(source, sink, &cipher, &mut nonce, progress, cancel)?;
    }

    Ok(())
}

/// Decrypts an Arsenic container from `source` into `sink` (§4.E read path).
/// Transparently unwraps armor if present (§9: armored and binary forms
/// share the same magic once unwrapped).
///
/// # Errors
/// `NotAnArsenicFile`/`BadCryptoboxVersion` on header mismatch,
/// `BadCryptoboxPemHeader` on malformed armor, `DecryptFail` on any
/// authentication failure, `AbortedByUser` if cancelled between chunks.
pub fn decrypt<R: Read, W: Write>(
    source: &mut R,
    sink: &mut W,
    passphrase: &[u8],
    progress: &AtomicU64,
    cancel: &AtomicBool,
) -> Result<()> {
    let mut probe = vec![0u8; BEGIN_LINE.as_bytes().len()];
    let probe_len = read_up_to(source, &mut probe)?;
    probe.truncate(probe_len);

    if armor::is_armored(&probe) {
        let mut rest = Vec::new();
        source.read_to_end(&mut rest)?;
        let mut full = probe;
        full.extend_from_slice(&rest);
        let binary = armor::unwrap(&full)?;
        decrypt_binary(&mut Cursor::new(binary), sink, passphrase, progress, cancel)
    } else {
        let mut chained = Cursor::new(probe).chain(source);
        decrypt_binary(&mut chained, sink, passphrase, progress, cancel)
    }
}

fn decrypt_binary<R: Read, W: Write>(
    source: &mut R,
    sink: &mut W,
    passphrase: &[u8],
    progress: &AtomicU64,
    cancel: &AtomicBool,
) -> Result<()> {
    let header = Header::read_from(source)?;
    let keys = kdf::derive(passphrase, &header.salt, header.kdf_params)?;
    let cipher = TripleCipher::new(&keys)?;
    let mut nonce = TripleNonce::from_seed(&header.nonce_seed);

    codec::read_body(source, sink, &cipher, &mut nonce, progress, cancel)
}

/// Reads up to `buf.len()` bytes, stopping early (rather than erroring) on a
/// short stream; the caller only uses this to sniff the armor marker.
fn read_up_to<R: Read>(source: &mut R, buf: &mut [u8]) -> Result<usize> {
    let mut total = 0;
    while total < buf.len() {
        let n = source.read(&mut buf[total..])?;
        if n == 0 {
            break;
        }
        total += n;
    }
    Ok(total)
}
