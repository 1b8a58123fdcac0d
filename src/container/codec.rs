//! Streaming chunked body codec (§4.E).
//!
//! Encodes the plaintext body as a sequence of `u32_le length || ciphertext`
//! frames terminated by a zero-length sentinel frame. Encryption and
//! decryption are both strictly sequential: each frame advances the shared
//! [`TripleNonce`] by exactly one before its cipher runs, so frames cannot be
//! processed out of order or in parallel.

use std::io::{Read, Write};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use anyhow::{Result, bail};

use crate::cipher::TripleCipher;
use crate::config::CHUNK_SIZE;
use crate::nonce::TripleNonce;
use crate::secret::SecretBytes;

/// Sentinel frame length marking clean end-of-stream (§4.E, §6).
const SENTINEL_LEN: u32 = 0;

/// Writes the encrypted body of `source` to `sink`, advancing `progress` by
/// the plaintext byte count after every chunk and checking `cancel` between
/// chunks.
///
/// # Errors
/// Returns `AbortedByUser` if `cancel` is observed set between chunks, or
/// propagates I/O and cipher errors.
pub fn write_body<R: Read, W: Write>(
    source: &mut R,
    sink: &mut W,
    cipher: &TripleCipher,
    nonce: &mut TripleNonce,
    progress: &AtomicU64,
    cancel: &AtomicBool,
) -> Result<()> {
    let mut plaintext = SecretBytes::zeroed(CHUNK_SIZE, CHUNK_SIZE);
    loop {
        if cancel.load(Ordering::SeqCst) {
            bail!("AbortedByUser: cancellation observed before chunk start");
        }

        let mut read_total = 0usize;
        while read_total < CHUNK_SIZE {
            let n = source.read(&mut plaintext.expose_secret_mut()[read_total..])?;
            if n == 0 {
                break;
            }
            read_total += n;
        }

        if read_total == 0 {
            sink.write_all(&SENTINEL_LEN.to_le_bytes())?;
            break;
        }

        let mut buffer = SecretBytes::from_slice(&plaintext.expose_secret()[..read_total]);
        cipher.encrypt_chunk(nonce, buffer.expose_secret_mut())?;

        let len = u32::try_from(buffer.len()).map_err(|_| anyhow::anyhow!("InvalidCryptoboxInput: chunk ciphertext too large"))?;
        sink.write_all(&len.to_le_bytes())?;
        sink.write_all(buffer.expose_secret())?;

        progress.fetch_add(read_total as u64, Ordering::SeqCst);
    }
    Ok(())
}

/// Reads the encrypted body from `source`, writing verified plaintext to
/// `sink` as each chunk authenticates (stream-on-verify, §3 invariants: no
/// plaintext reaches `sink` until its chunk's triple-decryption succeeds).
///
/// # Errors
/// `SrcHeaderReadError` on truncation before the sentinel, `DecryptFail` on
/// any authentication failure, `InvalidCryptoboxInput` on an impossible frame
/// length. Stops at the first failure without writing that chunk's output.
pub fn read_body<R: Read, W: Write>(
    source: &mut R,
    sink: &mut W,
    cipher: &TripleCipher,
    nonce: &mut TripleNonce,
    progress: &AtomicU64,
    cancel: &AtomicBool,
) -> Result<()> {
    loop {
        if cancel.load(Ordering::SeqCst) {
            bail!("AbortedByUser: cancellation observed before chunk start");
        }

        let mut len_bytes = [0u8; 4];
        read_exact_or_truncated(source, &mut len_bytes)?;
        let len = u32::from_le_bytes(len_bytes);

        if len == SENTINEL_LEN {
            break;
        }

        let len = len as usize;
        anyhow::ensure!(len <= CHUNK_SIZE + 64, "InvalidCryptoboxInput: frame length {len} exceeds maximum possible chunk size");

        let mut buffer = SecretBytes::zeroed(len, len);
        read_exact_or_truncated(source, buffer.expose_secret_mut())?;

        cipher.decrypt_chunk(nonce, buffer.expose_secret_mut())?;
        progress.fetch_add(buffer.len() as u64, Ordering::SeqCst);
        sink.write_all(buffer.expose_secret())?;
    }
    Ok(())
}

fn read_exact_or_truncated<R: Read>(source: &mut R, buf: &mut [u8]) -> Result<()> {
    match source.read_exact(buf) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::UnexpectedEof => bail!("SrcHeaderReadError: truncated body stream"),
        Err(e) => Err(e.into()),
    }
}
