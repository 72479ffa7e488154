//! Staging-tree materialization
//!
//! Owns the working directory `temp_dir/platform`: wiping leftovers from
//! earlier runs, creating the format layout, copying the payload in and
//! checksumming every file that lands.

use std::fs::OpenOptions;
use std::path::{Path, PathBuf};

use fs2::FileExt;
use tracing::{debug, info};

use crate::core::checksum::{ChecksumRecord, HashKind};
use crate::core::format::PackageFormat;
use crate::core::manifest::CopyManifest;
use crate::error::{CopyError, FilesystemError, StagingError};
use crate::infra::filesystem;

/// The working directory of one packaging run
#[derive(Debug, Clone)]
pub struct StagingArea {
    temp_dir: PathBuf,
    platform: String,
    format: PackageFormat,
    workdir: PathBuf,
}

/// What the copy step did
#[derive(Debug, Default)]
pub struct CopyOutcome {
    /// Files copied and checksummed
    pub copied: usize,
    /// Self-copies left alone
    pub skipped: usize,
    /// One record per copied file, in destination order
    pub checksums: Vec<ChecksumRecord>,
    /// Collected per-file failures; non-empty fails the run
    pub errors: Vec<CopyError>,
}

impl StagingArea {
    pub fn new(
        temp_dir: impl Into<PathBuf>,
        platform: impl Into<String>,
        format: PackageFormat,
    ) -> Self {
        let temp_dir = temp_dir.into();
        let platform = platform.into();
        let workdir = temp_dir.join(&platform);
        Self {
            temp_dir,
            platform,
            format,
            workdir,
        }
    }

    pub fn temp_dir(&self) -> &Path {
        &self.temp_dir
    }

    pub fn platform(&self) -> &str {
        &self.platform
    }

    pub fn format(&self) -> PackageFormat {
        self.format
    }

    pub fn workdir(&self) -> &Path {
        &self.workdir
    }

    /// Payload subtree the copy manifest roots at
    pub fn payload_root(&self) -> PathBuf {
        self.workdir.join(self.format.payload_dir())
    }

    /// Directory the rendered control files go to
    pub fn control_dir(&self) -> PathBuf {
        match self.format {
            PackageFormat::Deb => self.workdir.join("DEBIAN"),
            PackageFormat::Rpm => self.workdir.join("SPECS"),
        }
    }

    /// Lock file guarding this `(temp_dir, platform)` pair
    pub fn lock_path(&self) -> PathBuf {
        self.temp_dir.join(format!(".{}.lock", self.platform))
    }

    /// Remove the working directory left by a previous run
    pub fn clean(&self) -> Result<(), StagingError> {
        debug!("Cleaning {}", self.workdir.display());
        filesystem::remove_dir_all(&self.workdir)?;
        Ok(())
    }

    /// Create the working directory and the format's control layout
    pub fn prepare(&self) -> Result<(), StagingError> {
        filesystem::create_dir_with_mode(&self.workdir, self.format.workdir_mode())?;
        for (name, mode) in self.format.control_subdirs() {
            filesystem::create_dir_with_mode(&self.workdir.join(name), *mode)?;
        }
        Ok(())
    }

    /// Copy the manifest into the tree
    ///
    /// Self-copies are skipped without error. A failed file copy does not
    /// abort the loop; failures come back collected so the caller can fail
    /// the run with the complete list. Directory creation failures abort
    /// immediately, the tree itself is broken at that point.
    pub fn copy_all(
        &self,
        manifest: &CopyManifest,
        hash: HashKind,
    ) -> Result<CopyOutcome, StagingError> {
        let mut outcome = CopyOutcome::default();

        for dir in manifest.dirs() {
            filesystem::create_dir_all(dir)?;
        }

        if manifest.len() > 0 {
            info!(
                "Copying {} file{} to {}",
                manifest.len(),
                if manifest.len() == 1 { "" } else { "s" },
                self.payload_root().display()
            );
        }

        for (dest, src) in manifest.files() {
            if src == dest {
                debug!("Skipping self-copy of {}", src.display());
                outcome.skipped += 1;
                continue;
            }

            if let Err(error) = copy_one(src, dest) {
                outcome.errors.push(CopyError {
                    from: src.to_path_buf(),
                    to: dest.to_path_buf(),
                    error: error.to_string(),
                });
                continue;
            }

            let relative = dest.strip_prefix(&self.workdir).unwrap_or(dest);
            match ChecksumRecord::for_file(hash, dest, relative) {
                Ok(record) => {
                    outcome.checksums.push(record);
                    outcome.copied += 1;
                }
                Err(error) => outcome.errors.push(CopyError {
                    from: src.to_path_buf(),
                    to: dest.to_path_buf(),
                    error: error.to_string(),
                }),
            }
        }

        Ok(outcome)
    }
}

fn copy_one(src: &Path, dest: &Path) -> std::io::Result<()> {
    if let Some(parent) = dest.parent() {
        std::fs::create_dir_all(parent)?;
    }
    filesystem::copy_file(src, dest)
}

/// Exclusive advisory lock on a `(temp_dir, platform)` staging pair
///
/// Held for the whole pipeline run and released on drop. A second run
/// against the same pair is refused, not queued.
#[derive(Debug)]
pub struct StagingLock {
    lock_file: std::fs::File,
}

impl StagingLock {
    /// Try to take the lock; `None` when another run holds it
    pub fn try_acquire(area: &StagingArea) -> Result<Option<Self>, FilesystemError> {
        let lock_path = area.lock_path();
        if let Some(parent) = lock_path.parent() {
            filesystem::create_dir_all(parent)?;
        }

        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(&lock_path)
            .map_err(|e| FilesystemError::WriteFile {
                path: lock_path.clone(),
                error: e.to_string(),
            })?;

        match file.try_lock_exclusive() {
            Ok(()) => Ok(Some(Self { lock_file: file })),
            Err(_) => Ok(None),
        }
    }
}

impl Drop for StagingLock {
    fn drop(&mut self) {
        let _ = self.lock_file.unlock();
    }
}
