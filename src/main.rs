//! Arsenic command-line front-end.
//!
//! Thin binary over `arsenic_core`: parses arguments, collects a passphrase,
//! drives a [`JobHandle`](arsenic_core::job::JobHandle) to completion behind
//! a progress bar, and maps the resulting [`ErrorCode`](arsenic_core::error::ErrorCode)
//! to a process exit code.

mod cli;

use std::process::ExitCode;
use std::thread;
use std::time::Duration;

use anyhow::{Context, Result};
use arsenic_core::error::ErrorCode;
use arsenic_core::job::{self, Job, Mode};
use arsenic_core::secret::SecretBytes;
use clap::Parser;
use cli::{Cli, Commands};
use indicatif::{ProgressBar, ProgressStyle};

fn main() -> ExitCode {
    let subscriber = tracing_subscriber::fmt().with_target(false).finish();
    if tracing::subscriber::set_global_default(subscriber).is_err() {
        eprintln!("warning: a global tracing subscriber was already installed");
    }

    match run(Cli::parse()) {
        Ok(code) if code.is_success() => ExitCode::SUCCESS,
        Ok(code) => ExitCode::from(u8::try_from(code.code()).unwrap_or(255)),
        Err(e) => {
            eprintln!("arsenic: {e:?}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<ErrorCode> {
    match cli.command {
        Commands::Encrypt { input, output, password, profile, armor, keep } => {
            let output = output.unwrap_or_else(|| cli::default_output_path(&input, true));
            let passphrase = resolve_passphrase(password, true)?;

            let job = Job {
                mode: Mode::Encrypt,
                input_path: input,
                output_path: output,
                passphrase,
                kdf_params: profile.params(),
                armor,
                delete_original_on_success: !keep,
            };
            run_job("Encrypting", job)
        }

        Commands::Decrypt { input, output, password, keep } => {
            let output = output.unwrap_or_else(|| cli::default_output_path(&input, false));
            let passphrase = resolve_passphrase(password, false)?;

            let job = Job {
                mode: Mode::Decrypt,
                input_path: input,
                output_path: output,
                passphrase,
                kdf_params: arsenic_core::config::kdf_presets::INTERACTIVE,
                armor: false,
                delete_original_on_success: !keep,
            };
            run_job("Decrypting", job)
        }
    }
}

fn resolve_passphrase(password: Option<String>, confirm: bool) -> Result<SecretBytes> {
    if let Some(p) = password {
        return Ok(SecretBytes::from_vec(p.into_bytes()));
    }

    let entered = inquire::Password::new("Passphrase:").without_confirmation().prompt().context("passphrase entry failed")?;

    if confirm {
        let confirmation = inquire::Password::new("Confirm passphrase:")
            .without_confirmation()
            .prompt()
            .context("passphrase confirmation failed")?;
        anyhow::ensure!(entered == confirmation, "passphrases did not match");
    }

    Ok(SecretBytes::from_vec(entered.into_bytes()))
}

fn run_job(label: &str, job: Job) -> Result<ErrorCode> {
    let handle = job::submit(job);

    let bar = ProgressBar::new(100);
    if let Ok(style) = ProgressStyle::with_template("{msg} [{bar:40.cyan/blue}] {percent}%") {
        bar.set_style(style.progress_chars("=> "));
    }
    bar.set_message(label.to_string());

    while !handle.is_finished() {
        bar.set_position(u64::from(handle.progress()));
        thread::sleep(Duration::from_millis(100));
    }
    bar.set_position(u64::from(handle.progress()));

    let result = handle.join();
    bar.finish_and_clear();

    match result {
        Ok(()) => {
            println!("{label} succeeded.");
            Ok(if label == "Encrypting" { ErrorCode::CryptSuccess } else { ErrorCode::DecryptSuccess })
        }
        Err(code) => {
            eprintln!("arsenic: {code} (code {})", code.code());
            Ok(code)
        }
    }
}
