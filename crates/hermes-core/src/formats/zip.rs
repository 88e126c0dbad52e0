//! ZIP archive adapter.

use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::path::PathBuf;

use crate::DestDir;
use crate::ExtractError;
use crate::ExtractionReport;
use crate::Result;
use crate::formats::ArchiveKind;
use crate::formats::common;
use crate::formats::traits::ArchiveAdapter;
use crate::security::sanitize_entry_path;

/// Adapter over a staged `.zip` file.
///
/// Works off the standard central directory; entries with trailing
/// separators denote empty directories.
#[derive(Debug)]
pub struct ZipAdapter {
    path: PathBuf,
}

impl ZipAdapter {
    /// Wraps a staged archive file. The file is opened lazily per
    /// operation.
    #[must_use]
    pub fn open(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
        }
    }

    fn open_archive(&self) -> Result<zip::ZipArchive<File>> {
        let file = File::open(&self.path)?;
        zip::ZipArchive::new(file).map_err(|e| invalid(format!("failed to open ZIP archive: {e}")))
    }
}

fn invalid(reason: impl std::fmt::Display) -> ExtractError {
    ExtractError::InvalidArchive {
        kind: ArchiveKind::Zip.label(),
        reason: reason.to_string(),
    }
}

/// ZIP has no first-class symlink flag; the convention is the Unix mode
/// bits stored in the external attributes.
fn is_symlink<R: Read + std::io::Seek>(entry: &zip::read::ZipFile<'_, R>) -> bool {
    entry
        .unix_mode()
        .is_some_and(|mode| mode & 0o170_000 == 0o120_000)
}

/// Reads and validates a symlink entry's target, which ZIP stores as the
/// entry's content.
fn read_link_target<R: Read + std::io::Seek>(
    entry: &mut zip::read::ZipFile<'_, R>,
    name: &str,
) -> Result<PathBuf> {
    let mut raw = Vec::new();
    entry
        .read_to_end(&mut raw)
        .map_err(|e| invalid(format!("failed to read symlink target: {e}")))?;
    let target = PathBuf::from(String::from_utf8_lossy(&raw).into_owned());
    common::safe_link_target(name, &target)
}

impl ArchiveAdapter for ZipAdapter {
    fn kind(&self) -> ArchiveKind {
        ArchiveKind::Zip
    }

    fn list_entries(&mut self) -> Result<Vec<String>> {
        let mut archive = self.open_archive()?;
        let mut names = Vec::with_capacity(archive.len());
        for i in 0..archive.len() {
            let mut entry = archive
                .by_index(i)
                .map_err(|e| invalid(format!("failed to read ZIP entry: {e}")))?;
            let name = entry.name().to_string();

            // Symlink targets are screened during listing so a rejected
            // archive never reaches the write phase.
            if is_symlink(&entry) {
                read_link_target(&mut entry, &name)?;
            }

            names.push(name);
        }
        Ok(names)
    }

    fn extract_all(&mut self, dest: &DestDir) -> Result<ExtractionReport> {
        let mut archive = self.open_archive()?;
        let mut report = ExtractionReport::new();

        for i in 0..archive.len() {
            let mut entry = archive
                .by_index(i)
                .map_err(|e| invalid(format!("failed to read ZIP entry: {e}")))?;
            let name = entry.name().to_string();
            let relative = sanitize_entry_path(&name, ArchiveKind::Zip)?;
            if relative.as_os_str().is_empty() {
                continue;
            }

            if entry.is_dir() {
                common::ensure_dir(&dest.join_entry(&relative))?;
                report.directories_created += 1;
            } else if is_symlink(&entry) {
                let target = read_link_target(&mut entry, &name)?;
                common::create_symlink(&target, &dest.join_entry(&relative))?;
            } else {
                let written = common::write_file_entry(&mut entry, &dest.join_entry(&relative))?;
                report.files_extracted += 1;
                report.bytes_written += written;
            }
            report.entries.push(name);
        }
        Ok(report)
    }
}
