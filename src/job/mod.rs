//! Job orchestrator (§4.F, §5).
//!
//! A [`Job`] describes one file to encrypt or decrypt. [`submit`] spawns a
//! single dedicated worker thread that runs the job to completion and
//! surfaces progress through an atomic counter and cancellation through an
//! atomic flag, so the UI thread never touches cipher state directly. Jobs
//! are not pooled or reordered; one thread per submitted job, one file at a
//! time.

use std::fs::{File, OpenOptions};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};

use anyhow::{Result, anyhow, bail};

use crate::container;
use crate::error::ErrorCode;
use crate::kdf::KdfParams;
use crate::secret::SecretBytes;

/// Direction of a [`Job`] (§3 `Job`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Encrypt,
    Decrypt,
}

/// An immutable description of one file to process (§3 `Job`). Once
/// [`submit`]ted, nothing about a `Job` changes; the orchestrator reads it
/// from the worker thread only.
pub struct Job {
    pub mode: Mode,
    pub input_path: PathBuf,
    pub output_path: PathBuf,
    pub passphrase: SecretBytes,
    pub kdf_params: KdfParams,
    pub armor: bool,
    pub delete_original_on_success: bool,
}

/// The UI-facing handle returned by [`submit`] (§6 command surface).
pub struct JobHandle {
    cancel: Arc<AtomicBool>,
    progress_bytes: Arc<AtomicU64>,
    total_bytes: Arc<AtomicU64>,
    worker: Mutex<Option<JoinHandle<ErrorCode>>>,
}

impl JobHandle {
    /// Requests cancellation. Idempotent; safe to call more than once or
    /// after the job has already finished.
    pub fn cancel(&self) {
        self.cancel.store(true, Ordering::SeqCst);
    }

    /// Current progress as a percentage in `[0, 100]`, monotonically
    /// non-decreasing until the job finishes. Lossy most-recent-value
    /// semantics (§5): a caller that never polls simply never sees
    /// intermediate values, which is fine for a progress bar.
    #[must_use]
    pub fn progress(&self) -> u8 {
        let total = self.total_bytes.load(Ordering::SeqCst);
        if total == 0 {
            return 0;
        }
        let done = self.progress_bytes.load(Ordering::SeqCst).min(total);
        u8::try_from(done * 100 / total).unwrap_or(100)
    }

    /// True once the worker thread has finished, whether or not [`join`](Self::join)
    /// has been called yet.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.worker.lock().expect("job handle mutex poisoned").as_ref().is_none_or(JoinHandle::is_finished)
    }

    /// Blocks until the job's worker thread finishes, returning its outcome.
    /// Corresponds to the command surface's `handle.await()`; named `join`
    /// here because `await` cannot be used as a Rust identifier.
    ///
    /// # Panics
    /// Panics if called more than once on the same handle.
    pub fn join(&self) -> Result<(), ErrorCode> {
        let worker = self.worker.lock().expect("job handle mutex poisoned").take().expect("JobHandle::join called more than once");
        let code = worker.join().unwrap_or(ErrorCode::InvalidCryptoboxInput);
        if code.is_success() { Ok(()) } else { Err(code) }
    }
}

/// Spawns `job` onto its own worker thread and returns immediately with a
/// handle to observe and control it (§6 `submit_job`).
#[must_use]
pub fn submit(job: Job) -> JobHandle {
    let cancel = Arc::new(AtomicBool::new(false));
    let progress_bytes = Arc::new(AtomicU64::new(0));
    let total_bytes = Arc::new(AtomicU64::new(0));

    let worker_cancel = Arc::clone(&cancel);
    let worker_progress = Arc::clone(&progress_bytes);
    let worker_total = Arc::clone(&total_bytes);

    let worker = thread::Builder::new()
        .name("arsenic-job".to_string())
        .spawn(move || run(&job, &worker_cancel, &worker_progress, &worker_total))
        .expect("failed to spawn job worker thread");

    JobHandle { cancel, progress_bytes, total_bytes, worker: Mutex::new(Some(worker)) }
}

fn run(job: &Job, cancel: &AtomicBool, progress_bytes: &AtomicU64, total_bytes: &AtomicU64) -> ErrorCode {
    match run_inner(job, cancel, progress_bytes, total_bytes) {
        Ok(code) => code,
        Err(e) => {
            let _ = std::fs::remove_file(&job.output_path);
            ErrorCode::classify(&e)
        }
    }
}

fn run_inner(job: &Job, cancel: &AtomicBool, progress_bytes: &AtomicU64, total_bytes: &AtomicU64) -> Result<ErrorCode> {
    // §8 invariant 6: no-overwrite is checked, and fails, before the input is touched.
    if job.output_path.exists() {
        bail!("DesFileExists: {}", job.output_path.display());
    }

    if !job.input_path.exists() {
        bail!("SrcNotFound: {}", job.input_path.display());
    }
    let mut input = File::open(&job.input_path).map_err(|_| anyhow!("SrcCannotOpenRead: {}", job.input_path.display()))?;

    let file_len = input.metadata().map(|m| m.len()).unwrap_or(0);
    total_bytes.store(file_len.max(1), Ordering::SeqCst);

    let mut output = OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(&job.output_path)
        .map_err(|_| anyhow!("DesCannotOpenWrite: {}", job.output_path.display()))?;

    let result = match job.mode {
        Mode::Encrypt => {
            let original_name = job.input_path.file_name().map(|n| n.to_string_lossy().into_owned()).unwrap_or_default();
            container::encrypt(
                &mut input,
                &mut output,
                job.passphrase.expose_secret(),
                job.kdf_params,
                original_name,
                job.armor,
                progress_bytes,
                cancel,
            )
        }
        Mode::Decrypt => container::decrypt(&mut input, &mut output, job.passphrase.expose_secret(), progress_bytes, cancel),
    };

    result?;
    drop(output);

    if job.delete_original_on_success {
        let _ = std::fs::remove_file(&job.input_path);
    }

    Ok(match job.mode {
        Mode::Encrypt => ErrorCode::CryptSuccess,
        Mode::Decrypt => ErrorCode::DecryptSuccess,
    })
}

#[cfg(test)]
mod tests {
    use std::io::Write as _;

    use tempfile::tempdir;

    use super::*;
    use crate::config::kdf_presets::INTERACTIVE;

    fn job(mode: Mode, input: PathBuf, output: PathBuf, passphrase: &[u8]) -> Job {
        Job {
            mode,
            input_path: input,
            output_path: output,
            passphrase: SecretBytes::from_slice(passphrase),
            kdf_params: INTERACTIVE,
            armor: false,
            delete_original_on_success: false,
        }
    }

    #[test]
    fn round_trip_through_orchestrator() {
        let dir = tempdir().unwrap();
        let input_path = dir.path().join("plain.txt");
        let encrypted_path = dir.path().join("plain.txt.arsn");
        let decrypted_path = dir.path().join("plain.restored.txt");
        std::fs::write(&input_path, b"orchestrated contents").unwrap();

        let handle = submit(job(Mode::Encrypt, input_path.clone(), encrypted_path.clone(), b"passphrase"));
        handle.join().unwrap();

        let handle = submit(job(Mode::Decrypt, encrypted_path, decrypted_path.clone(), b"passphrase"));
        handle.join().unwrap();

        assert_eq!(std::fs::read(&decrypted_path).unwrap(), b"orchestrated contents");
        assert!(input_path.exists());
    }

    /// §8 invariant 6: no-overwrite.
    #[test]
    fn existing_output_is_rejected_without_reading_input() {
        let dir = tempdir().unwrap();
        let input_path = dir.path().join("plain.txt");
        let output_path = dir.path().join("taken.arsn");
        std::fs::write(&input_path, b"never read").unwrap();
        std::fs::write(&output_path, b"already here").unwrap();

        let handle = submit(job(Mode::Encrypt, input_path, output_path.clone(), b"passphrase"));
        let err = handle.join().unwrap_err();
        assert_eq!(err, ErrorCode::DesFileExists);
        assert_eq!(std::fs::read(&output_path).unwrap(), b"already here");
    }

    #[test]
    fn missing_input_is_src_not_found() {
        let dir = tempdir().unwrap();
        let handle = submit(job(Mode::Encrypt, dir.path().join("ghost.txt"), dir.path().join("out.arsn"), b"passphrase"));
        assert_eq!(handle.join().unwrap_err(), ErrorCode::SrcNotFound);
    }

    #[test]
    fn delete_original_on_success_removes_input() {
        let dir = tempdir().unwrap();
        let input_path = dir.path().join("plain.txt");
        let output_path = dir.path().join("plain.arsn");
        std::fs::write(&input_path, b"gone after success").unwrap();

        let mut j = job(Mode::Encrypt, input_path.clone(), output_path, b"passphrase");
        j.delete_original_on_success = true;
        let handle = submit(j);
        handle.join().unwrap();

        assert!(!input_path.exists());
    }

    /// §8 invariant 7: cancellation cleanup.
    #[test]
    fn cancelling_before_start_leaves_no_output() {
        let dir = tempdir().unwrap();
        let input_path = dir.path().join("plain.txt");
        let output_path = dir.path().join("plain.arsn");
        let mut big = Vec::new();
        for i in 0..200_000u32 {
            big.write_all(&i.to_le_bytes()).unwrap();
        }
        std::fs::write(&input_path, &big).unwrap();

        let handle = submit(job(Mode::Encrypt, input_path, output_path.clone(), b"passphrase"));
        handle.cancel();
        let err = handle.join().unwrap_err();
        assert_eq!(err, ErrorCode::AbortedByUser);
        assert!(!output_path.exists());
    }

    #[test]
    fn wrong_passphrase_leaves_no_output() {
        let dir = tempdir().unwrap();
        let input_path = dir.path().join("plain.txt");
        let encrypted_path = dir.path().join("plain.arsn");
        let decrypted_path = dir.path().join("plain.restored.txt");
        std::fs::write(&input_path, b"protected contents").unwrap();

        let handle = submit(job(Mode::Encrypt, input_path, encrypted_path.clone(), b"right"));
        handle.join().unwrap();

        let handle = submit(job(Mode::Decrypt, encrypted_path, decrypted_path.clone(), b"wrong"));
        assert_eq!(handle.join().unwrap_err(), ErrorCode::DecryptFail);
        assert!(!decrypted_path.exists());
    }
}
