//! Cryptographically secure random-byte source (§4.A).
//!
//! Thin wrapper over the OS RNG that fails loudly instead of silently falling
//! back to a weaker source, per §4.A ("it must fail loudly if the OS source is
//! unavailable").

use anyhow::{Result, anyhow};
use rand::rand_core::{OsRng, TryRngCore};

/// Fills `buf` with cryptographically secure random bytes from the OS source.
///
/// # Errors
/// Returns an error if the platform RNG is unavailable or fails to fill the
/// buffer; this is never silently downgraded to a weaker source.
pub fn fill_bytes(buf: &mut [u8]) -> Result<()> {
    OsRng.try_fill_bytes(buf).map_err(|e| anyhow!("OS random number generator unavailable: {e}"))
}

/// Draws a fixed-size array of cryptographically secure random bytes.
///
/// # Errors
/// See [`fill_bytes`].
pub fn random_array<const N: usize>() -> Result<[u8; N]> {
    let mut bytes = [0u8; N];
    fill_bytes(&mut bytes)?;
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn random_array_is_not_all_zero() {
        let a: [u8; 32] = random_array().unwrap();
        assert_ne!(a, [0u8; 32]);
    }

    #[test]
    fn successive_draws_differ() {
        let a: [u8; 24] = random_array().unwrap();
        let b: [u8; 24] = random_array().unwrap();
        assert_ne!(a, b);
    }
}
