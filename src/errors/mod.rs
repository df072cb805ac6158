//! Error handling utilities for the moodlog application.
//!
//! This module provides the central error type `AppError` which represents all
//! possible error conditions that might occur in the application, as well as the
//! convenience type alias `AppResult` for functions that can return these errors.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Represents rejections raised by the diary's entry rules.
///
/// None of these are fatal: each one discards a single user action and leaves
/// the stored entries untouched.
///
/// # Examples
///
/// ```
/// use moodlog::errors::DiaryError;
///
/// let error = DiaryError::DuplicateEmotion {
///     name: "Feliz".to_string(),
/// };
/// assert!(format!("{}", error).contains("Feliz"));
/// assert!(format!("{}", error).contains("30 seconds"));
/// ```
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DiaryError {
    /// The same emotion was logged less than 30 seconds ago.
    #[error("Emotion '{name}' was already logged less than 30 seconds ago")]
    DuplicateEmotion {
        /// Name of the rejected emotion
        name: String,
    },

    /// The submitted text was empty after trimming.
    #[error("Text entry is empty")]
    EmptyTextRejected,

    /// No entry with the given id exists in the targeted sequence.
    #[error("Entry not found: {id}")]
    EntryNotFound {
        /// The id that was looked up
        id: String,
    },

    /// The emotion name is not part of the catalog.
    #[error("Unknown emotion '{0}'. Run `moodlog emotions` to list the available ones.")]
    UnknownEmotion(String),
}

/// Represents failures reading or writing the durable storage slots.
///
/// # Examples
///
/// ```
/// use moodlog::errors::StorageError;
/// use std::io::{self, ErrorKind};
///
/// let error = StorageError::WriteFailed {
///     slot: "emotions".to_string(),
///     source: io::Error::new(ErrorKind::PermissionDenied, "permission denied"),
/// };
/// assert!(format!("{}", error).contains("emotions"));
/// ```
#[derive(Debug, Error)]
pub enum StorageError {
    /// A slot holds content that cannot be decoded.
    #[error("Storage slot '{slot}' is corrupt: {message}")]
    ReadCorrupt {
        /// The slot that failed to decode
        slot: String,
        /// What was wrong with it
        message: String,
    },

    /// A snapshot could not be written to its slot.
    #[error("Failed to write storage slot '{slot}': {source}. Check free disk space and permissions on the data directory.")]
    WriteFailed {
        /// The slot being written
        slot: String,
        /// The underlying I/O error
        #[source]
        source: io::Error,
    },
}

/// Represents specific error cases that can occur when interacting with external editors.
///
/// # Examples
///
/// ```
/// use moodlog::errors::EditorError;
///
/// let error = EditorError::NonZeroExit {
///     command: "vim".to_string(),
///     status_code: 1,
/// };
///
/// assert!(format!("{}", error).contains("non-zero status code"));
/// assert!(format!("{}", error).contains("vim"));
/// ```
#[derive(Debug, Error)]
pub enum EditorError {
    /// Error when the specified editor command cannot be found.
    #[error("Editor command '{command}' not found: {source}. Please check that the editor is installed and available in your PATH.")]
    CommandNotFound {
        /// The editor command that was not found
        command: String,
        /// The underlying I/O error
        #[source]
        source: io::Error,
    },

    /// Error when permission is denied to execute the editor command.
    #[error("Permission denied when trying to execute editor '{command}': {source}. Please check file permissions or try running with appropriate access rights.")]
    PermissionDenied {
        /// The editor command that had permission denied
        command: String,
        /// The underlying I/O error
        #[source]
        source: io::Error,
    },

    /// Error when the editor command fails to execute due to other I/O errors.
    #[error("Failed to execute editor '{command}': {source}")]
    ExecutionFailed {
        /// The editor command that failed to execute
        command: String,
        /// The underlying I/O error
        #[source]
        source: io::Error,
    },

    /// Error when the editor exits with a non-zero status code.
    #[error("Editor '{command}' exited with non-zero status code: {status_code}. The draft was discarded.")]
    NonZeroExit {
        /// The editor command that exited with a non-zero status
        command: String,
        /// The exit status code
        status_code: i32,
    },
}

/// Represents errors that can occur when locking the data directory.
///
/// # Examples
///
/// ```
/// use moodlog::errors::LockError;
/// use std::path::PathBuf;
///
/// let error = LockError::StoreBusy {
///     path: PathBuf::from("/path/to/diary"),
/// };
///
/// assert!(format!("{}", error).contains("another moodlog process"));
/// ```
#[derive(Debug, Error)]
pub enum LockError {
    /// Another process holds the store lock.
    #[error("Diary at {path} is in use by another moodlog process. Please wait for it to finish.")]
    StoreBusy {
        /// The data directory that is locked
        path: PathBuf,
    },

    /// Error when acquiring the lock fails for a technical reason.
    #[error("Failed to acquire lock for diary {path}: {source}. Please check that the data directory is accessible.")]
    AcquisitionFailed {
        /// The data directory that couldn't be locked
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: io::Error,
    },
}

/// Represents reasons a reminder notification could not be scheduled or shown.
#[derive(Debug, Error)]
pub enum NotificationError {
    /// The host has no notification capability.
    #[error("Notifications are not available on this system")]
    Unavailable,

    /// The user declined notification permission.
    #[error("Notification permission was not granted")]
    PermissionDenied,

    /// The notification backend rejected the notification.
    #[error("Failed to show notification: {0}")]
    SendFailed(String),
}

/// Represents all possible errors that can occur in the moodlog application.
///
/// This enum is the central error type used across the application, with variants
/// for different error categories. It uses `thiserror` for deriving the `Error` trait
/// implementation and formatted error messages.
///
/// # Examples
///
/// ```
/// use moodlog::errors::AppError;
///
/// let error = AppError::Config("Missing data directory".to_string());
/// assert_eq!(format!("{}", error), "Configuration error: Missing data directory");
/// ```
#[derive(Debug, Error)]
pub enum AppError {
    /// Errors related to configuration loading or validation.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Input/output errors from filesystem operations.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Rejections from the diary's entry rules.
    #[error("{0}")]
    Diary(#[from] DiaryError),

    /// Errors reading or writing the storage slots.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Errors when interacting with the text editor.
    #[error("Editor error: {0}")]
    Editor(#[from] EditorError),

    /// Errors related to locking the data directory.
    #[error("Store locking error: {0}")]
    Lock(#[from] LockError),

    /// Errors related to the reminder notification.
    #[error("Notification error: {0}")]
    Notification(#[from] NotificationError),

    /// A date argument that is neither YYYY-MM-DD nor YYYYMMDD.
    #[error("Invalid date '{0}'. Use YYYY-MM-DD or YYYYMMDD.")]
    InvalidDate(String),

    /// Errors while rendering or writing the PDF report.
    #[error("Report error: {0}")]
    Report(String),
}

/// A type alias for `Result<T, AppError>` to simplify function signatures.
///
/// # Examples
///
/// ```
/// use moodlog::errors::{AppResult, AppError};
///
/// fn might_fail() -> AppResult<String> {
///     if false {
///         return Err(AppError::Report("Something went wrong".to_string()));
///     }
///     Ok("Operation succeeded".to_string())
/// }
/// ```
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;
    use std::io;

    #[test]
    fn test_app_error_from_io_error() {
        let io_error = io::Error::new(io::ErrorKind::NotFound, "file not found");

        let app_error: AppError = io_error.into();

        match app_error {
            AppError::Io(inner) => {
                assert_eq!(inner.kind(), io::ErrorKind::NotFound);
            }
            _ => panic!("Expected AppError::Io variant"),
        }
    }

    #[test]
    fn test_diary_error_display_is_not_wrapped() {
        // Diary rejections are shown to the user as-is
        let app_error: AppError = DiaryError::DuplicateEmotion {
            name: "Triste".to_string(),
        }
        .into();
        assert_eq!(
            format!("{}", app_error),
            "Emotion 'Triste' was already logged less than 30 seconds ago"
        );

        let app_error: AppError = DiaryError::EntryNotFound {
            id: "123-abc".to_string(),
        }
        .into();
        assert_eq!(format!("{}", app_error), "Entry not found: 123-abc");
    }

    #[test]
    fn test_storage_error_source_chaining() {
        let error = StorageError::WriteFailed {
            slot: "texts".to_string(),
            source: io::Error::other("disk full"),
        };

        let source = error
            .source()
            .expect("StorageError::WriteFailed should have a source");
        let source_io_error = source
            .downcast_ref::<io::Error>()
            .expect("Source should be an io::Error");
        assert_eq!(source_io_error.to_string(), "disk full");

        let corrupt = StorageError::ReadCorrupt {
            slot: "emotions".to_string(),
            message: "expected value at line 1".to_string(),
        };
        assert!(corrupt.source().is_none());
        assert!(format!("{}", corrupt).contains("emotions"));
    }

    #[test]
    fn test_editor_error_variants() {
        let io_error = io::Error::new(io::ErrorKind::NotFound, "command not found");
        let error = EditorError::CommandNotFound {
            command: "vim".to_string(),
            source: io_error,
        };
        assert!(format!("{}", error).contains("not found"));
        assert!(format!("{}", error).contains("PATH"));

        let io_error = io::Error::new(io::ErrorKind::PermissionDenied, "permission denied");
        let error = EditorError::PermissionDenied {
            command: "vim".to_string(),
            source: io_error,
        };
        assert!(format!("{}", error).contains("Permission denied"));

        let error = EditorError::NonZeroExit {
            command: "vim".to_string(),
            status_code: 2,
        };
        assert!(format!("{}", error).contains("2"));
        assert!(error.source().is_none());
    }

    #[test]
    fn test_lock_error_conversion_to_app_error() {
        let lock_error = LockError::StoreBusy {
            path: PathBuf::from("/path/to/diary"),
        };

        let app_error: AppError = lock_error.into();

        match app_error {
            AppError::Lock(LockError::StoreBusy { path }) => {
                assert_eq!(path, PathBuf::from("/path/to/diary"));
            }
            _ => panic!("Expected AppError::Lock(StoreBusy) variant"),
        }
    }

    #[test]
    fn test_notification_error_display() {
        let app_error: AppError = NotificationError::Unavailable.into();
        assert!(format!("{}", app_error).contains("not available"));
    }
}
