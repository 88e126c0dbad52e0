//! Write helpers shared by the format adapters.

use std::fs::File;
use std::fs::create_dir_all;
use std::io::BufWriter;
use std::io::Read;
use std::io::Write;
use std::path::Component;
use std::path::Path;
use std::path::PathBuf;

use crate::ExtractError;
use crate::Result;

/// Creates a directory and any missing ancestors. Idempotent.
pub(crate) fn ensure_dir(path: &Path) -> Result<()> {
    create_dir_all(path)?;
    Ok(())
}

/// Writes one file entry to `dest_path` with buffered I/O, creating parent
/// directories as needed. Returns the number of bytes written.
///
/// `R` is unsized so callers holding a `&mut dyn Read` (the 7z extract
/// callback) can pass it directly.
pub(crate) fn write_file_entry<R: Read + ?Sized>(reader: &mut R, dest_path: &Path) -> Result<u64> {
    if let Some(parent) = dest_path.parent() {
        create_dir_all(parent)?;
    }
    let output = File::create(dest_path)?;
    let mut writer = BufWriter::with_capacity(64 * 1024, output);
    let bytes_written = std::io::copy(reader, &mut writer)?;
    writer.flush()?;
    Ok(bytes_written)
}

/// Validates a symlink target recorded in an archive.
///
/// The target must be relative and free of `..` components, so the link
/// cannot point outside the destination tree by name. Returns the target
/// unchanged on success.
///
/// # Errors
///
/// Returns [`ExtractError::UnsafeLink`] for absolute or traversing targets.
pub(crate) fn safe_link_target(entry: &str, target: &Path) -> Result<PathBuf> {
    let escape = || ExtractError::UnsafeLink {
        entry: entry.to_string(),
        target: target.to_path_buf(),
    };

    if target.is_absolute() {
        return Err(escape());
    }
    for component in target.components() {
        match component {
            Component::ParentDir | Component::RootDir | Component::Prefix(_) => {
                return Err(escape());
            }
            Component::CurDir | Component::Normal(_) => {}
        }
    }
    Ok(target.to_path_buf())
}

/// Creates a symlink at `link` pointing at the already-validated `target`.
#[cfg(unix)]
pub(crate) fn create_symlink(target: &Path, link: &Path) -> Result<()> {
    if let Some(parent) = link.parent() {
        create_dir_all(parent)?;
    }
    std::os::unix::fs::symlink(target, link)?;
    Ok(())
}

/// Symlinks cannot be represented on this platform; fail extraction rather
/// than silently dropping the entry.
#[cfg(not(unix))]
pub(crate) fn create_symlink(target: &Path, link: &Path) -> Result<()> {
    let _ = target;
    Err(ExtractError::Io(std::io::Error::new(
        std::io::ErrorKind::Unsupported,
        format!("symlink entries are not supported on this platform: {}", link.display()),
    )))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_write_file_entry_creates_parents() {
        let temp = TempDir::new().unwrap();
        let dest = temp.path().join("a/b/c.txt");
        let mut reader = std::io::Cursor::new(b"hello".to_vec());

        let written = write_file_entry(&mut reader, &dest).unwrap();
        assert_eq!(written, 5);
        assert_eq!(std::fs::read_to_string(&dest).unwrap(), "hello");
    }

    #[test]
    fn test_write_file_entry_from_trait_object() {
        let temp = TempDir::new().unwrap();
        let dest = temp.path().join("out.bin");
        let mut cursor = std::io::Cursor::new(b"abc".to_vec());
        let reader: &mut dyn Read = &mut cursor;

        assert_eq!(write_file_entry(reader, &dest).unwrap(), 3);
        assert_eq!(std::fs::read(&dest).unwrap(), b"abc");
    }

    #[test]
    fn test_safe_link_target_relative() {
        assert!(safe_link_target("link", Path::new("sibling.txt")).is_ok());
        assert!(safe_link_target("link", Path::new("sub/dir/file")).is_ok());
    }

    #[test]
    fn test_safe_link_target_rejects_escape() {
        for target in ["/etc/passwd", "../outside", "a/../../b"] {
            let result = safe_link_target("link", Path::new(target));
            assert!(
                matches!(result, Err(ExtractError::UnsafeLink { .. })),
                "should reject target: {target}"
            );
        }
    }

    #[test]
    #[cfg(unix)]
    fn test_create_symlink() {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join("real.txt"), "data").unwrap();

        let link = temp.path().join("nested/link.txt");
        create_symlink(Path::new("../real.txt"), &link).unwrap();
        assert!(link.symlink_metadata().unwrap().file_type().is_symlink());
    }
}
