//! Archive kind classification from upload filenames.

use crate::ExtractError;
use crate::Result;

/// Supported archive container formats.
///
/// The set is closed: an upload is one of these three kinds or it is
/// rejected during classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchiveKind {
    /// Gzip-compressed tar archive (`.tar.gz`, `.tgz`).
    TarGz,
    /// ZIP archive (`.zip`).
    Zip,
    /// 7z archive (`.7z`).
    SevenZ,
}

impl ArchiveKind {
    /// Classifies an uploaded filename by its suffix, case-insensitively.
    ///
    /// `.tar.gz` is checked before any generic `.gz` handling, so a bare
    /// `file.gz` stays unsupported.
    ///
    /// # Errors
    ///
    /// Returns [`ExtractError::UnsupportedArchive`] when the filename does
    /// not end in a supported suffix.
    ///
    /// # Examples
    ///
    /// ```
    /// use hermes_core::ArchiveKind;
    ///
    /// assert_eq!(ArchiveKind::classify("app.TAR.GZ").unwrap(), ArchiveKind::TarGz);
    /// assert!(ArchiveKind::classify("app.rar").is_err());
    /// ```
    pub fn classify(filename: &str) -> Result<Self> {
        let lower = filename.to_ascii_lowercase();
        if lower.ends_with(".tar.gz") || lower.ends_with(".tgz") {
            Ok(Self::TarGz)
        } else if lower.ends_with(".zip") {
            Ok(Self::Zip)
        } else if lower.ends_with(".7z") {
            Ok(Self::SevenZ)
        } else {
            Err(ExtractError::UnsupportedArchive {
                filename: filename.to_string(),
            })
        }
    }

    /// Wire name used in response payloads.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::TarGz => "tar.gz",
            Self::Zip => "zip",
            Self::SevenZ => "7z",
        }
    }

    /// Uppercase label used in error messages.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::TarGz => "TAR.GZ",
            Self::Zip => "ZIP",
            Self::SevenZ => "7Z",
        }
    }

    /// File suffix used when staging an upload of this kind to disk.
    #[must_use]
    pub const fn staging_suffix(self) -> &'static str {
        match self {
            Self::TarGz => ".tar.gz",
            Self::Zip => ".zip",
            Self::SevenZ => ".7z",
        }
    }
}
