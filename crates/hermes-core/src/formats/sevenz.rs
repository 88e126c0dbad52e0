//! 7z archive adapter.
//!
//! Listing reads the 7z container metadata without extraction; the
//! container's own compression/filter chain (LZMA, LZMA2, BZIP2, PPMd,
//! DEFLATE, Copy) is handled by `sevenz-rust2`.
//!
//! # Limitations
//!
//! `sevenz-rust2` does not expose Unix symlink metadata, so 7z entries
//! that were symlinks at creation time are materialized as regular files
//! whose content is the recorded target path. Encrypted archives are
//! rejected.

use std::cell::RefCell;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::path::PathBuf;

use sevenz_rust2::Archive;
use sevenz_rust2::Password;

use crate::DestDir;
use crate::ExtractError;
use crate::ExtractionReport;
use crate::Result;
use crate::formats::ArchiveKind;
use crate::formats::common;
use crate::formats::traits::ArchiveAdapter;
use crate::security::sanitize_entry_path;

/// Adapter over a staged `.7z` file.
#[derive(Debug)]
pub struct SevenZAdapter {
    path: PathBuf,
}

impl SevenZAdapter {
    /// Wraps a staged archive file. The file is opened lazily per
    /// operation.
    #[must_use]
    pub fn open(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
        }
    }

    fn read_metadata(&self) -> Result<Archive> {
        let mut file = File::open(&self.path)?;
        let password = Password::empty();
        Archive::read(&mut file, &password).map_err(|e| {
            let err_str = e.to_string().to_ascii_lowercase();
            if err_str.contains("encrypt") || err_str.contains("password") {
                return invalid(
                    "archive is encrypted; password-protected archives are not supported",
                );
            }
            invalid(format!("failed to open 7z archive: {e}"))
        })
    }
}

fn invalid(reason: impl std::fmt::Display) -> ExtractError {
    ExtractError::InvalidArchive {
        kind: ArchiveKind::SevenZ.label(),
        reason: reason.to_string(),
    }
}

impl ArchiveAdapter for SevenZAdapter {
    fn kind(&self) -> ArchiveKind {
        ArchiveKind::SevenZ
    }

    fn list_entries(&mut self) -> Result<Vec<String>> {
        let archive = self.read_metadata()?;
        Ok(archive.files.iter().map(|e| e.name.clone()).collect())
    }

    fn extract_all(&mut self, dest: &DestDir) -> Result<ExtractionReport> {
        let mut file = File::open(&self.path)?;
        let report = RefCell::new(ExtractionReport::new());

        let extract_fn = |entry: &sevenz_rust2::ArchiveEntry,
                          reader: &mut dyn Read,
                          _dest_dir: &PathBuf|
         -> std::result::Result<bool, sevenz_rust2::Error> {
            let name = entry.name.clone();
            // Re-validate per entry; the listing was checked before any
            // write, this guards the write itself.
            let relative = sanitize_entry_path(&name, ArchiveKind::SevenZ)
                .map_err(|e| sevenz_rust2::Error::Other(format!("validation failed: {e}").into()))?;
            if relative.as_os_str().is_empty() {
                return Ok(true);
            }

            let mut report = report.borrow_mut();
            if entry.is_directory() {
                common::ensure_dir(&dest.join_entry(&relative))
                    .map_err(|e| sevenz_rust2::Error::Other(e.to_string().into()))?;
                report.directories_created += 1;
            } else {
                let written = common::write_file_entry(reader, &dest.join_entry(&relative))
                    .map_err(|e| sevenz_rust2::Error::Other(e.to_string().into()))?;
                report.files_extracted += 1;
                report.bytes_written += written;
            }
            report.entries.push(name);
            Ok(true)
        };

        sevenz_rust2::decompress_with_extract_fn(&mut file, dest.as_path(), extract_fn)
            .map_err(|e| invalid(format!("extraction failed: {e}")))?;

        Ok(report.into_inner())
    }
}
