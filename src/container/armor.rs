//! PEM-like armor wrapper for the binary container (§6).
//!
//! Wraps an arbitrary byte string as Base64 between `BEGIN`/`END` marker
//! lines, wrapped at a fixed column width so the result is safe to paste into
//! text-only channels. Readers detect armor by its leading dash sequence and
//! strip it before binary parsing; armor and binary forms share the same
//! magic bytes once unwrapped (§9 Open Questions).

use anyhow::{Result, bail};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;

use crate::config::armor::{BEGIN_LINE, END_LINE, WRAP_COLUMN};

/// Wraps `bytes` in the armor envelope.
#[must_use]
pub fn wrap(bytes: &[u8]) -> String {
    let encoded = STANDARD.encode(bytes);
    let mut out = String::with_capacity(encoded.len() + encoded.len() / WRAP_COLUMN + BEGIN_LINE.len() + END_LINE.len() + 8);
    out.push_str(BEGIN_LINE);
    out.push('\n');
    for line in encoded.as_bytes().chunks(WRAP_COLUMN) {
        out.push_str(std::str::from_utf8(line).expect("base64 output is ASCII"));
        out.push('\n');
    }
    out.push_str(END_LINE);
    out.push('\n');
    out
}

/// True if `input` looks like it starts with an armor envelope.
#[must_use]
pub fn is_armored(input: &[u8]) -> bool {
    input.starts_with(BEGIN_LINE.as_bytes())
}

/// Unwraps an armor envelope, returning the original binary bytes.
///
/// # Errors
/// `BadCryptoboxPemHeader` if `input` doesn't start with the begin marker,
/// doesn't contain an end marker, or the enclosed Base64 fails to decode.
pub fn unwrap(input: &[u8]) -> Result<Vec<u8>> {
    let text = std::str::from_utf8(input).map_err(|_| anyhow::anyhow!("BadCryptoboxPemHeader: armor body is not valid UTF-8"))?;

    let after_begin = text.strip_prefix(BEGIN_LINE).ok_or_else(|| anyhow::anyhow!("BadCryptoboxPemHeader: missing begin marker"))?;

    let end_pos = after_begin.find(END_LINE).ok_or_else(|| anyhow::anyhow!("BadCryptoboxPemHeader: missing end marker"))?;

    let body: String = after_begin[..end_pos].chars().filter(|c| !c.is_whitespace()).collect();
    if body.is_empty() {
        bail!("BadCryptoboxPemHeader: empty armor body");
    }

    STANDARD.decode(body).map_err(|e| anyhow::anyhow!("BadCryptoboxPemHeader: invalid base64: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    /// §8 invariant 8: armor idempotence.
    #[test]
    fn unwrap_of_wrap_is_identity() {
        let data = b"arbitrary byte string, not necessarily valid UTF-8: \xFF\x00\x01".to_vec();
        let armored = wrap(&data);
        assert!(is_armored(armored.as_bytes()));
        let recovered = unwrap(armored.as_bytes()).unwrap();
        assert_eq!(recovered, data);
    }

    #[test]
    fn unarmored_input_is_rejected() {
        let err = unwrap(b"not an armor envelope at all").unwrap_err();
        assert!(err.to_string().contains("BadCryptoboxPemHeader"));
    }

    #[test]
    fn missing_end_marker_is_rejected() {
        let partial = format!("{BEGIN_LINE}\nQUJD\n");
        let err = unwrap(partial.as_bytes()).unwrap_err();
        assert!(err.to_string().contains("BadCryptoboxPemHeader"));
    }

    #[test]
    fn wraps_at_fixed_column_width() {
        let data = vec![0u8; 300];
        let armored = wrap(&data);
        for line in armored.lines().skip(1) {
            if line == END_LINE {
                break;
            }
            assert!(line.len() <= WRAP_COLUMN);
        }
    }
}
