//! CLI argument parsing (§11 of the expanded design).

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

/// Arsenic - file encryption via a cascade of three authenticated ciphers.
#[derive(Parser)]
#[command(name = "arsenic")]
#[command(version)]
#[command(about = "Encrypt or decrypt a file with a ChaCha20-Poly1305 / AES-256-EAX / Serpent-GCM cascade keyed from a passphrase.")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Encrypt a file.
    Encrypt {
        /// Input file path.
        #[arg(short, long)]
        input: PathBuf,

        /// Output file path (defaults to `<input>.arsn`).
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Passphrase (prompted interactively if omitted).
        #[arg(short, long)]
        password: Option<String>,

        /// Argon2id cost preset.
        #[arg(long, value_enum, default_value_t = Profile::Interactive)]
        profile: Profile,

        /// Wrap the output in a printable PEM-like armor envelope.
        #[arg(long)]
        armor: bool,

        /// Keep the original input file after a successful encryption.
        #[arg(long)]
        keep: bool,
    },

    /// Decrypt a file.
    Decrypt {
        /// Input file path.
        #[arg(short, long)]
        input: PathBuf,

        /// Output file path (defaults to stripping a trailing `.arsn`).
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Passphrase (prompted interactively if omitted).
        #[arg(short, long)]
        password: Option<String>,

        /// Keep the original input file after a successful decryption.
        #[arg(long)]
        keep: bool,
    },
}

/// Named Argon2id cost presets exposed on the command line (§6 KDF defaults).
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Profile {
    Interactive,
    Moderate,
    Sensitive,
}

impl Profile {
    #[must_use]
    pub fn params(self) -> arsenic_core::kdf::KdfParams {
        use arsenic_core::config::kdf_presets::{INTERACTIVE, MODERATE, SENSITIVE};
        match self {
            Self::Interactive => INTERACTIVE,
            Self::Moderate => MODERATE,
            Self::Sensitive => SENSITIVE,
        }
    }
}

/// Derives a default output path for `input` under `mode`.
#[must_use]
pub fn default_output_path(input: &std::path::Path, encrypting: bool) -> PathBuf {
    if encrypting {
        let mut name = input.as_os_str().to_owned();
        name.push(".arsn");
        PathBuf::from(name)
    } else {
        input
            .to_str()
            .and_then(|s| s.strip_suffix(".arsn"))
            .map(PathBuf::from)
            .unwrap_or_else(|| input.with_extension("decrypted"))
    }
}
