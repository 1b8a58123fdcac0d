//! Secret-buffer discipline (§4.A).
//!
//! `SecretBytes` owns a resizable byte buffer that is guaranteed to be
//! overwritten with zeros before its memory is released, on every exit path:
//! success, error return, early `?`, or panic unwinding. It deliberately does
//! not implement `Clone` or `Copy` so that passphrases, derived keys, and
//! in-flight plaintext chunks cannot be silently duplicated.
//!
//! Zeroization on `Drop` covers unwinding panics but not process abort; that
//! limitation is inherent to any userspace zeroize-on-drop buffer and is the
//! same guarantee the teacher's `Protected<T>` type relies on implicitly.

use std::fmt;
use std::ops::{Deref, DerefMut};

use secrecy::{ExposeSecret, ExposeSecretMut, SecretBox};
use zeroize::Zeroize;

/// An owned, resizable byte buffer that zeroizes its backing memory on drop.
pub struct SecretBytes {
    inner: SecretBox<Vec<u8>>,
    cap: usize,
}

impl SecretBytes {
    /// Wraps `data`, capping future growth at its current length.
    #[must_use]
    pub fn from_vec(data: Vec<u8>) -> Self {
        let cap = data.len();
        Self { inner: SecretBox::new(Box::new(data)), cap }
    }

    /// Wraps a copy of `data`. Prefer [`from_vec`](Self::from_vec) when the
    /// caller already owns the buffer, to avoid one extra un-zeroized copy.
    #[must_use]
    pub fn from_slice(data: &[u8]) -> Self {
        Self::from_vec(data.to_vec())
    }

    /// An all-zero buffer of `len` bytes, growable up to `cap`.
    #[must_use]
    pub fn zeroed(len: usize, cap: usize) -> Self {
        Self { inner: SecretBox::new(Box::new(vec![0u8; len])), cap: cap.max(len) }
    }

    /// Read-only access to the underlying bytes.
    #[must_use]
    pub fn expose_secret(&self) -> &[u8] {
        self.inner.expose_secret()
    }

    /// Mutable access to the underlying bytes.
    pub fn expose_secret_mut(&mut self) -> &mut Vec<u8> {
        self.inner.expose_secret_mut()
    }

    /// Grows or shrinks the buffer in place, refusing to exceed the cap
    /// established at construction time.
    ///
    /// # Errors
    /// Returns an error if `new_len` exceeds the buffer's configured cap.
    pub fn resize(&mut self, new_len: usize) -> anyhow::Result<()> {
        anyhow::ensure!(new_len <= self.cap, "secret buffer cap exceeded: {new_len} > {}", self.cap);
        self.inner.expose_secret_mut().resize(new_len, 0);
        Ok(())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.expose_secret().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Deref for SecretBytes {
    type Target = [u8];

    fn deref(&self) -> &Self::Target {
        self.expose_secret()
    }
}

impl DerefMut for SecretBytes {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.inner.expose_secret_mut()
    }
}

impl fmt::Debug for SecretBytes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SecretBytes([REDACTED])")
    }
}

/// A fixed-size secret array, used for derived keys and nonce seeds where the
/// length is known up front and growth is never needed.
pub struct SecretArray<const N: usize> {
    inner: Box<[u8; N]>,
}

impl<const N: usize> SecretArray<N> {
    #[must_use]
    pub fn new(data: [u8; N]) -> Self {
        Self { inner: Box::new(data) }
    }

    #[must_use]
    pub fn expose_secret(&self) -> &[u8; N] {
        &self.inner
    }
}

impl<const N: usize> Drop for SecretArray<N> {
    fn drop(&mut self) {
        self.inner.zeroize();
    }
}

impl<const N: usize> fmt::Debug for SecretArray<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SecretArray<{N}>([REDACTED])")
    }
}
