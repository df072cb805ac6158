//! One-file-per-slot storage in the diary data directory.
//!
//! Each write goes to a temporary file in the same directory which is then
//! renamed over the slot, so a crash mid-write leaves the previous snapshot
//! intact.

use super::SlotStorage;
use crate::constants::{CORRUPT_SLOT_SUFFIX, STORE_LOCK_FILE};
use crate::errors::{AppError, AppResult, LockError, StorageError};
use fs2::FileExt;
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
#[cfg(unix)]
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::debug;

/// Slot storage rooted at a data directory.
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    /// Opens the data directory, creating it if necessary.
    ///
    /// # Errors
    ///
    /// Returns:
    /// - `AppError::Config` if `dir` is not an absolute path
    /// - `AppError::Io` if the directory cannot be created or secured
    pub fn open(dir: &Path) -> AppResult<Self> {
        ensure_data_directory_exists(dir)?;
        Ok(FileStorage {
            dir: dir.to_path_buf(),
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the file backing `slot`.
    pub fn slot_path(&self, slot: &str) -> PathBuf {
        self.dir.join(slot)
    }

    /// Takes the exclusive store lock without blocking.
    ///
    /// The lock is held until the returned guard is dropped.
    ///
    /// # Errors
    ///
    /// - `LockError::StoreBusy` if another process holds the lock
    /// - `LockError::AcquisitionFailed` if the lock file cannot be opened or locked
    pub fn lock(&self) -> AppResult<StoreLock> {
        let path = self.dir.join(STORE_LOCK_FILE);
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&path)
            .map_err(|source| LockError::AcquisitionFailed {
                path: self.dir.clone(),
                source,
            })?;

        match FileExt::try_lock_exclusive(&file) {
            Ok(()) => {
                debug!("Acquired store lock");
                Ok(StoreLock { file })
            }
            Err(e) if e.kind() == fs2::lock_contended_error().kind() => {
                Err(LockError::StoreBusy {
                    path: self.dir.clone(),
                }
                .into())
            }
            Err(source) => Err(LockError::AcquisitionFailed {
                path: self.dir.clone(),
                source,
            }
            .into()),
        }
    }
}

impl SlotStorage for FileStorage {
    fn read_slot(&self, slot: &str) -> AppResult<Option<String>> {
        match fs::read_to_string(self.slot_path(slot)) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(AppError::Io(e)),
        }
    }

    fn write_slot(&mut self, slot: &str, value: &str) -> AppResult<()> {
        let write_failed = |source: io::Error| StorageError::WriteFailed {
            slot: slot.to_string(),
            source,
        };

        let mut temp = NamedTempFile::new_in(&self.dir).map_err(write_failed)?;
        temp.write_all(value.as_bytes()).map_err(write_failed)?;
        temp.as_file().sync_all().map_err(write_failed)?;

        #[cfg(unix)]
        {
            use crate::constants::DEFAULT_FILE_PERMISSIONS;
            let permissions = fs::Permissions::from_mode(DEFAULT_FILE_PERMISSIONS);
            fs::set_permissions(temp.path(), permissions).map_err(write_failed)?;
        }

        temp.persist(self.slot_path(slot))
            .map_err(|e| write_failed(e.error))?;

        debug!(slot, bytes = value.len(), "Wrote storage slot");
        Ok(())
    }

    fn set_aside(&mut self, slot: &str) -> AppResult<()> {
        let from = self.slot_path(slot);
        let to = self.dir.join(format!("{}{}", slot, CORRUPT_SLOT_SUFFIX));
        match fs::rename(&from, &to) {
            Ok(()) => {
                debug!(slot, to = %to.display(), "Moved corrupt slot aside");
                Ok(())
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(source) => Err(StorageError::WriteFailed {
                slot: slot.to_string(),
                source,
            }
            .into()),
        }
    }
}

/// Exclusive advisory lock on the data directory.
#[derive(Debug)]
pub struct StoreLock {
    file: File,
}

impl Drop for StoreLock {
    fn drop(&mut self) {
        let _ = FileExt::unlock(&self.file);
    }
}

/// Ensures the data directory exists, creating it with owner-only
/// permissions if necessary.
fn ensure_data_directory_exists(dir: &Path) -> AppResult<()> {
    if !dir.is_absolute() {
        return Err(AppError::Config(format!(
            "Data directory path must be absolute: {}",
            dir.display()
        )));
    }

    if !dir.exists() {
        fs::create_dir_all(dir).map_err(|e| {
            AppError::Io(io::Error::new(
                e.kind(),
                format!("Failed to create data directory: {}", e),
            ))
        })?;

        #[cfg(unix)]
        {
            use crate::constants::DEFAULT_DIR_PERMISSIONS;
            let permissions = fs::Permissions::from_mode(DEFAULT_DIR_PERMISSIONS);
            fs::set_permissions(dir, permissions).map_err(|e| {
                AppError::Io(io::Error::new(
                    e.kind(),
                    format!("Failed to set secure permissions on data directory: {}", e),
                ))
            })?;
            debug!("Set 0o700 permissions on data directory");
        }
    }
    Ok(())
}
