//! File-based locking to prevent concurrent update runs.
//!
//! Each category's output files are owned by exactly one run; an advisory
//! lock in the output directory enforces it.

use anyhow::{Context, Result};
use fs2::FileExt;
use std::fs::{self, File, OpenOptions};
use std::path::Path;

const LOCK_FILE_NAME: &str = ".hostsmith.lock";

/// A guard holding an exclusive lock for the output directory.
/// The lock is released when the guard is dropped.
pub struct LockGuard {
    _file: File,
}

impl LockGuard {
    /// Attempt to acquire an exclusive lock for `output_dir`.
    /// Returns an error if another instance is already running.
    pub fn acquire(output_dir: &Path) -> Result<Self> {
        fs::create_dir_all(output_dir)
            .with_context(|| format!("Failed to create output directory {:?}", output_dir))?;
        let lock_path = output_dir.join(LOCK_FILE_NAME);

        // Open read+write without truncate to avoid a TOCTOU race between
        // file creation and lock acquisition.
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&lock_path)
            .with_context(|| format!("Failed to open lock file: {:?}", lock_path))?;

        file.try_lock_exclusive().map_err(|_| {
            anyhow::anyhow!(
                "Another hostsmith run is already using {:?}.\n\
                 Wait for it to finish, or remove {:?} if it crashed.",
                output_dir,
                lock_path
            )
        })?;

        Ok(Self { _file: file })
    }
}
