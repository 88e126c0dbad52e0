//! Destination directory resolution and replacement.

use std::path::Component;
use std::path::Path;
use std::path::PathBuf;

use crate::ExtractError;
use crate::Result;

/// The resolved filesystem location that receives extracted entries.
///
/// A `DestDir` is derived from the configured base directory and the
/// caller-supplied URL path, and is guaranteed at construction to lie
/// inside the base directory. The URL path cannot escape the base via
/// `..` segments or root anchors.
///
/// # Examples
///
/// ```no_run
/// use hermes_core::DestDir;
/// use std::path::Path;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let dest = DestDir::resolve(Path::new("/srv/deploys"), "apps/demo")?;
/// assert!(dest.as_path().ends_with("apps/demo"));
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DestDir(PathBuf);

impl DestDir {
    /// Resolves the target directory from the base directory and the
    /// request path (leading slashes stripped).
    ///
    /// The base directory must already exist; it is canonicalized so that
    /// the containment check cannot be bypassed through symlinked or
    /// relative base paths.
    ///
    /// # Errors
    ///
    /// - [`ExtractError::Io`] if the base directory does not exist or
    ///   cannot be canonicalized
    /// - [`ExtractError::DestinationEscape`] if the request path contains
    ///   `..`/root components or otherwise resolves outside the base
    pub fn resolve(base: &Path, request_path: &str) -> Result<Self> {
        let canonical_base = base.canonicalize().map_err(|e| {
            ExtractError::Io(std::io::Error::new(
                e.kind(),
                format!("base directory unavailable: {}: {e}", base.display()),
            ))
        })?;

        let trimmed = request_path.trim_start_matches('/');
        let mut relative = PathBuf::new();
        for component in Path::new(trimmed).components() {
            match component {
                Component::Normal(part) => relative.push(part),
                Component::CurDir => {}
                Component::ParentDir | Component::RootDir | Component::Prefix(_) => {
                    return Err(ExtractError::DestinationEscape {
                        path: PathBuf::from(request_path),
                    });
                }
            }
        }

        let target = canonical_base.join(&relative);
        if !target.starts_with(&canonical_base) {
            return Err(ExtractError::DestinationEscape {
                path: PathBuf::from(request_path),
            });
        }

        Ok(Self(target))
    }

    /// Clears any pre-existing content at the target and recreates it as
    /// an empty directory.
    ///
    /// A pre-existing file (or symlink) is deleted; a pre-existing
    /// directory is deleted recursively with everything under it. The
    /// directory and any missing ancestors are then created fresh. This is
    /// a destructive replace-in-place with no rollback.
    ///
    /// # Errors
    ///
    /// Returns [`ExtractError::Io`] on permission or I/O failure.
    pub fn prepare(&self) -> Result<()> {
        match std::fs::symlink_metadata(&self.0) {
            Ok(meta) if meta.is_dir() => std::fs::remove_dir_all(&self.0)?,
            Ok(_) => std::fs::remove_file(&self.0)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => return Err(ExtractError::Io(e)),
        }
        std::fs::create_dir_all(&self.0)?;
        Ok(())
    }

    /// Returns the resolved absolute path.
    #[inline]
    #[must_use]
    pub fn as_path(&self) -> &Path {
        &self.0
    }

    /// Joins a validated relative entry path under the destination.
    #[must_use]
    pub fn join_entry(&self, relative: &Path) -> PathBuf {
        self.0.join(relative)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_resolve_simple_path() {
        let base = TempDir::new().expect("temp dir");
        let dest = DestDir::resolve(base.path(), "apps/demo").unwrap();
        assert!(dest.as_path().starts_with(base.path().canonicalize().unwrap()));
        assert!(dest.as_path().ends_with("apps/demo"));
    }

    #[test]
    fn test_resolve_strips_leading_slash() {
        let base = TempDir::new().expect("temp dir");
        let with_slash = DestDir::resolve(base.path(), "/users/123").unwrap();
        let without = DestDir::resolve(base.path(), "users/123").unwrap();
        assert_eq!(with_slash, without);
    }

    #[test]
    fn test_resolve_empty_path_is_base() {
        let base = TempDir::new().expect("temp dir");
        let dest = DestDir::resolve(base.path(), "").unwrap();
        assert_eq!(dest.as_path(), base.path().canonicalize().unwrap());
    }

    #[test]
    fn test_resolve_rejects_traversal() {
        let base = TempDir::new().expect("temp dir");
        for path in ["../outside", "a/../../outside", "/..", "a/.."] {
            let result = DestDir::resolve(base.path(), path);
            assert!(
                matches!(result, Err(ExtractError::DestinationEscape { .. })),
                "should reject: {path}"
            );
        }
    }

    #[test]
    fn test_resolve_missing_base_fails() {
        let base = TempDir::new().expect("temp dir");
        let gone = base.path().join("nope");
        assert!(matches!(
            DestDir::resolve(&gone, "x"),
            Err(ExtractError::Io(_))
        ));
    }

    #[test]
    fn test_prepare_creates_fresh_directory() {
        let base = TempDir::new().expect("temp dir");
        let dest = DestDir::resolve(base.path(), "a/b/c").unwrap();
        dest.prepare().unwrap();
        assert!(dest.as_path().is_dir());
        assert_eq!(std::fs::read_dir(dest.as_path()).unwrap().count(), 0);
    }

    #[test]
    fn test_prepare_replaces_existing_directory() {
        let base = TempDir::new().expect("temp dir");
        let dest = DestDir::resolve(base.path(), "site").unwrap();
        dest.prepare().unwrap();
        std::fs::write(dest.as_path().join("old.txt"), "stale").unwrap();
        std::fs::create_dir(dest.as_path().join("olddir")).unwrap();

        dest.prepare().unwrap();
        assert!(dest.as_path().is_dir());
        assert_eq!(std::fs::read_dir(dest.as_path()).unwrap().count(), 0);
    }

    #[test]
    fn test_prepare_replaces_existing_file() {
        let base = TempDir::new().expect("temp dir");
        std::fs::write(base.path().join("blob"), "i am a file").unwrap();

        let dest = DestDir::resolve(base.path(), "blob").unwrap();
        dest.prepare().unwrap();
        assert!(dest.as_path().is_dir());
    }
}
