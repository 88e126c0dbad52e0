//! Path traversal validation over archive entry listings.
//!
//! Validation runs over the *complete* entry listing before any entry is
//! written, so a malicious archive is rejected atomically: no partial
//! writes can occur from an archive that is later found unsafe.

use std::path::Component;
use std::path::Path;
use std::path::PathBuf;

use crate::ArchiveKind;
use crate::ExtractError;
use crate::Result;
use crate::error::UnsafeReason;

/// Validates every entry path in an archive listing, failing on the first
/// violation.
///
/// Rules, per entry:
/// - a root-anchored path is rejected as "absolute path"
/// - a `..` component anywhere, including as a prefix, is rejected as
///   "directory traversal"
///
/// # Errors
///
/// Returns [`ExtractError::UnsafePath`] naming the offending entry, the
/// archive kind, and the violated rule.
///
/// # Examples
///
/// ```
/// use hermes_core::ArchiveKind;
/// use hermes_core::security::validate_entries;
///
/// let safe = ["README.md", "data/info.txt"];
/// assert!(validate_entries(safe.iter().copied(), ArchiveKind::Zip).is_ok());
///
/// let evil = ["README.md", "../../etc/passwd"];
/// assert!(validate_entries(evil.iter().copied(), ArchiveKind::Zip).is_err());
/// ```
pub fn validate_entries<'a, I>(entries: I, kind: ArchiveKind) -> Result<()>
where
    I: IntoIterator<Item = &'a str>,
{
    for entry in entries {
        sanitize_entry_path(entry, kind)?;
    }
    Ok(())
}

/// Checks a single entry path and returns its normalized relative form.
///
/// `.` components are dropped; the result is the path that may be joined
/// under the destination directory. Extractors call this again per entry
/// immediately before writing, so the write path never trusts a listing
/// that was validated earlier.
///
/// # Errors
///
/// Returns [`ExtractError::UnsafePath`] if the path is absolute or contains
/// a parent-directory component.
pub fn sanitize_entry_path(entry: &str, kind: ArchiveKind) -> Result<PathBuf> {
    let unsafe_path = |reason: UnsafeReason| ExtractError::UnsafePath {
        entry: entry.to_string(),
        kind: kind.label(),
        reason,
    };

    // Archives written on Windows may record a drive-letter prefix that
    // Unix `Path` semantics would treat as a plain file name.
    if entry.starts_with('/') || entry.starts_with('\\') || has_drive_prefix(entry) {
        return Err(unsafe_path(UnsafeReason::AbsolutePath));
    }

    let mut normalized = PathBuf::new();
    for component in Path::new(entry).components() {
        match component {
            Component::RootDir | Component::Prefix(_) => {
                return Err(unsafe_path(UnsafeReason::AbsolutePath));
            }
            Component::ParentDir => {
                return Err(unsafe_path(UnsafeReason::DirectoryTraversal));
            }
            Component::CurDir => {}
            Component::Normal(part) => normalized.push(part),
        }
    }

    Ok(normalized)
}

fn has_drive_prefix(entry: &str) -> bool {
    let bytes = entry.as_bytes();
    bytes.len() >= 2 && bytes[0].is_ascii_alphabetic() && bytes[1] == b':'
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_safe_listing() {
        let entries = ["README.md", "data/", "data/info.txt", "a/b/c.bin"];
        assert!(validate_entries(entries.iter().copied(), ArchiveKind::TarGz).is_ok());
    }

    #[test]
    fn test_reject_parent_traversal() {
        for entry in [
            "../etc/passwd",
            "foo/../../etc/passwd",
            "foo/bar/..",
            "..",
        ] {
            let result = sanitize_entry_path(entry, ArchiveKind::Zip);
            assert!(
                matches!(
                    result,
                    Err(ExtractError::UnsafePath {
                        reason: UnsafeReason::DirectoryTraversal,
                        ..
                    })
                ),
                "should reject traversal: {entry}"
            );
        }
    }

    #[test]
    fn test_reject_absolute() {
        for entry in ["/etc/passwd", "\\windows\\system32", "C:\\evil.exe", "c:/evil"] {
            let result = sanitize_entry_path(entry, ArchiveKind::SevenZ);
            assert!(
                matches!(
                    result,
                    Err(ExtractError::UnsafePath {
                        reason: UnsafeReason::AbsolutePath,
                        ..
                    })
                ),
                "should reject absolute: {entry}"
            );
        }
    }

    #[test]
    fn test_first_violation_wins() {
        let entries = ["ok.txt", "/abs.txt", "../trav.txt"];
        let err = validate_entries(entries.iter().copied(), ArchiveKind::Zip).unwrap_err();
        match err {
            ExtractError::UnsafePath { entry, reason, kind } => {
                assert_eq!(entry, "/abs.txt");
                assert_eq!(reason, UnsafeReason::AbsolutePath);
                assert_eq!(kind, "ZIP");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_normalizes_dot_components() {
        let path = sanitize_entry_path("./foo/./bar.txt", ArchiveKind::TarGz).unwrap();
        assert_eq!(path, Path::new("foo/bar.txt"));
    }

    #[test]
    fn test_empty_and_dot_entries_normalize_to_empty() {
        assert_eq!(sanitize_entry_path("", ArchiveKind::TarGz).unwrap(), PathBuf::new());
        assert_eq!(sanitize_entry_path("./", ArchiveKind::TarGz).unwrap(), PathBuf::new());
    }

    #[test]
    fn test_error_mentions_kind_label() {
        let err = sanitize_entry_path("../x", ArchiveKind::TarGz).unwrap_err();
        assert!(err.to_string().contains("TAR.GZ"));
    }
}
