//! Error types for archive extraction operations.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using `ExtractError`.
pub type Result<T> = std::result::Result<T, ExtractError>;

/// Why an archive entry path was rejected by the safety validator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnsafeReason {
    /// The entry path is anchored at a filesystem root.
    AbsolutePath,
    /// The entry path contains a parent-directory (`..`) component.
    DirectoryTraversal,
}

impl std::fmt::Display for UnsafeReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AbsolutePath => write!(f, "absolute path"),
            Self::DirectoryTraversal => write!(f, "directory traversal"),
        }
    }
}

/// Errors that can occur while classifying, validating, or extracting an
/// uploaded archive.
#[derive(Error, Debug)]
pub enum ExtractError {
    /// I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Uploaded filename does not match any supported archive suffix.
    #[error("Unsupported archive type '{filename}' (supported: .tar.gz, .tgz, .zip, .7z)")]
    UnsupportedArchive {
        /// The filename as supplied by the client.
        filename: String,
    },

    /// Archive bytes are corrupt or unreadable for the detected format.
    #[error("Invalid {kind} archive: {reason}")]
    InvalidArchive {
        /// Archive kind label, e.g. `"ZIP"`.
        kind: &'static str,
        /// Human-readable failure detail.
        reason: String,
    },

    /// An entry path inside the archive failed the safety validator.
    #[error("Unsafe path '{entry}' in {kind} archive: {reason}")]
    UnsafePath {
        /// The offending entry name as recorded in the archive.
        entry: String,
        /// Archive kind label, e.g. `"ZIP"`.
        kind: &'static str,
        /// The rule that was violated.
        reason: UnsafeReason,
    },

    /// A symlink entry points outside the extraction directory.
    #[error("Unsafe symlink '{entry}': target '{target}' escapes the destination")]
    UnsafeLink {
        /// The symlink entry name.
        entry: String,
        /// The recorded link target.
        target: PathBuf,
    },

    /// The resolved destination would fall outside the base directory.
    #[error("Destination path escapes the base directory: {path}")]
    DestinationEscape {
        /// The offending request path.
        path: PathBuf,
    },
}

impl ExtractError {
    /// Returns `true` if the error was caused by the uploaded request
    /// (bad filename, malicious entry paths) rather than by the service
    /// or its filesystem.
    ///
    /// The HTTP layer maps client faults to 400 responses and everything
    /// else to 500.
    #[must_use]
    pub const fn is_client_fault(&self) -> bool {
        matches!(
            self,
            Self::UnsupportedArchive { .. }
                | Self::UnsafePath { .. }
                | Self::UnsafeLink { .. }
                | Self::DestinationEscape { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unsupported_display_names_extensions() {
        let err = ExtractError::UnsupportedArchive {
            filename: "notes.txt".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("notes.txt"));
        assert!(msg.contains(".tar.gz"));
        assert!(msg.contains(".zip"));
        assert!(msg.contains(".7z"));
    }

    #[test]
    fn test_unsafe_path_display() {
        let err = ExtractError::UnsafePath {
            entry: "../../etc/passwd".to_string(),
            kind: "ZIP",
            reason: UnsafeReason::DirectoryTraversal,
        };
        let msg = err.to_string();
        assert!(msg.contains("Unsafe path"));
        assert!(msg.contains("../../etc/passwd"));
        assert!(msg.contains("ZIP"));
        assert!(msg.contains("directory traversal"));
    }

    #[test]
    fn test_absolute_reason_display() {
        let err = ExtractError::UnsafePath {
            entry: "/etc/shadow".to_string(),
            kind: "TAR.GZ",
            reason: UnsafeReason::AbsolutePath,
        };
        assert!(err.to_string().contains("absolute path"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: ExtractError = io_err.into();
        assert!(matches!(err, ExtractError::Io(_)));
        assert!(!err.is_client_fault());
    }

    #[test]
    fn test_is_client_fault() {
        let err = ExtractError::UnsupportedArchive {
            filename: "a.rar".to_string(),
        };
        assert!(err.is_client_fault());

        let err = ExtractError::UnsafePath {
            entry: "../x".to_string(),
            kind: "7Z",
            reason: UnsafeReason::DirectoryTraversal,
        };
        assert!(err.is_client_fault());

        let err = ExtractError::DestinationEscape {
            path: PathBuf::from("../../outside"),
        };
        assert!(err.is_client_fault());

        let err = ExtractError::InvalidArchive {
            kind: "ZIP",
            reason: "truncated central directory".to_string(),
        };
        assert!(!err.is_client_fault());
    }
}
