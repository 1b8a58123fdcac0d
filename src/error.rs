//! Stable error taxonomy shared across the orchestrator/UI boundary (§7).
//!
//! `ErrorCode` is the only type that crosses out of the library at the job
//! boundary (`JobHandle::await`). Components below the orchestrator return
//! `anyhow::Result` for internal plumbing; the orchestrator is the sole place
//! that classifies a failure into one of these stable ordinals.

/// A stable, numerically ordinal error taxonomy (§7). The discriminant values
/// are part of the contract surface and must never be renumbered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[repr(u32)]
pub enum ErrorCode {
    #[error("encrypt job finished")]
    CryptSuccess = 0,

    #[error("decrypt job finished")]
    DecryptSuccess = 1,

    #[error("authentication tag mismatch")]
    DecryptFail = 2,

    #[error("not an arsenic file")]
    NotAnArsenicFile = 3,

    #[error("input path not found")]
    SrcNotFound = 4,

    #[error("input path unreadable")]
    SrcCannotOpenRead = 5,

    #[error("output path already exists")]
    DesFileExists = 6,

    #[error("output path unwritable")]
    DesCannotOpenWrite = 7,

    #[error("truncated stream or malformed header")]
    SrcHeaderReadError = 8,

    #[error("aborted by user")]
    AbortedByUser = 9,

    #[error("malformed frame length or impossible field")]
    InvalidCryptoboxInput = 10,

    #[error("unknown container version")]
    BadCryptoboxVersion = 11,

    #[error("invalid armor envelope")]
    BadCryptoboxPemHeader = 12,

    #[error("passphrase is empty")]
    EmptyPassword = 13,
}

impl ErrorCode {
    /// The stable numeric value, `[0, 13]` (§6).
    #[must_use]
    pub const fn code(self) -> u32 {
        self as u32
    }

    /// True for the two terminal-success variants.
    #[must_use]
    pub const fn is_success(self) -> bool {
        matches!(self, Self::CryptSuccess | Self::DecryptSuccess)
    }

    /// Classifies an internal `anyhow::Error` into a stable [`ErrorCode`].
    ///
    /// Lower layers (kdf, cipher, container) report failures as
    /// `anyhow::Error` with a `"VariantName: detail"` message prefix; this is
    /// the one place that convention is consumed, so that only the
    /// orchestrator needs to know it exists. A message matching no known
    /// prefix is treated as `InvalidCryptoboxInput`, the catch-all for
    /// malformed input the core couldn't otherwise classify.
    #[must_use]
    pub fn classify(err: &anyhow::Error) -> Self {
        let msg = err.to_string();
        let prefix = msg.split(':').next().unwrap_or("");
        match prefix {
            "DecryptFail" => Self::DecryptFail,
            "NotAnArsenicFile" => Self::NotAnArsenicFile,
            "SrcNotFound" => Self::SrcNotFound,
            "SrcCannotOpenRead" => Self::SrcCannotOpenRead,
            "DesFileExists" => Self::DesFileExists,
            "DesCannotOpenWrite" => Self::DesCannotOpenWrite,
            "SrcHeaderReadError" => Self::SrcHeaderReadError,
            "AbortedByUser" => Self::AbortedByUser,
            "BadCryptoboxVersion" => Self::BadCryptoboxVersion,
            "BadCryptoboxPemHeader" => Self::BadCryptoboxPemHeader,
            "EmptyPassword" => Self::EmptyPassword,
            "KdfUnavailable" => Self::InvalidCryptoboxInput,
            _ => Self::InvalidCryptoboxInput,
        }
    }
}
