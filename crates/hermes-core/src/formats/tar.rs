//! Gzip-compressed tar archive adapter.

use std::fs::File;
use std::io::BufReader;
use std::io::Read;
use std::path::Path;
use std::path::PathBuf;

use flate2::read::GzDecoder;

use crate::DestDir;
use crate::ExtractError;
use crate::ExtractionReport;
use crate::Result;
use crate::formats::ArchiveKind;
use crate::formats::common;
use crate::formats::traits::ArchiveAdapter;
use crate::security::sanitize_entry_path;

/// Adapter over a staged `.tar.gz`/`.tgz` file.
///
/// The gzip stream is not seekable, so listing and extraction each run a
/// fresh decompression pass over the re-opened staged file.
#[derive(Debug)]
pub struct TarGzAdapter {
    path: PathBuf,
}

impl TarGzAdapter {
    /// Wraps a staged archive file. The file is opened lazily per
    /// operation.
    #[must_use]
    pub fn open(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
        }
    }

    fn reader(&self) -> Result<tar::Archive<GzDecoder<BufReader<File>>>> {
        let file = File::open(&self.path)?;
        let decoder = GzDecoder::new(BufReader::new(file));
        Ok(tar::Archive::new(decoder))
    }
}

fn invalid(reason: impl std::fmt::Display) -> ExtractError {
    ExtractError::InvalidArchive {
        kind: ArchiveKind::TarGz.label(),
        reason: reason.to_string(),
    }
}

fn entry_name<R: Read>(entry: &tar::Entry<'_, R>) -> String {
    String::from_utf8_lossy(&entry.path_bytes()).into_owned()
}

fn link_target<R: Read>(entry: &tar::Entry<'_, R>, name: &str) -> Result<PathBuf> {
    let target = entry
        .link_name()
        .map_err(|e| invalid(format!("invalid link target: {e}")))?
        .ok_or_else(|| invalid(format!("symlink entry '{name}' has no target")))?
        .into_owned();
    common::safe_link_target(name, &target)
}

/// Entry types the service refuses to materialize. Device nodes and FIFOs
/// have no place in an uploaded deployment tree; hardlinks are rejected
/// because their targets cannot be validated against the destination
/// before extraction.
fn reject_special<R: Read>(entry: &tar::Entry<'_, R>, name: &str) -> Result<()> {
    match entry.header().entry_type() {
        tar::EntryType::Char | tar::EntryType::Block | tar::EntryType::Fifo => Err(invalid(
            format!("special entry '{name}' (char/block device or FIFO) is not supported"),
        )),
        tar::EntryType::Link => Err(invalid(format!(
            "hardlink entry '{name}' is not supported"
        ))),
        _ => Ok(()),
    }
}

impl ArchiveAdapter for TarGzAdapter {
    fn kind(&self) -> ArchiveKind {
        ArchiveKind::TarGz
    }

    fn list_entries(&mut self) -> Result<Vec<String>> {
        let mut archive = self.reader()?;
        let entries = archive
            .entries()
            .map_err(|e| invalid(format!("failed to read TAR entries: {e}")))?;

        let mut names = Vec::new();
        for entry_result in entries {
            let entry =
                entry_result.map_err(|e| invalid(format!("failed to read TAR entry: {e}")))?;
            let name = entry_name(&entry);

            reject_special(&entry, &name)?;
            // Symlink targets are screened during listing so a rejected
            // archive never reaches the write phase.
            if entry.header().entry_type() == tar::EntryType::Symlink {
                link_target(&entry, &name)?;
            }

            names.push(name);
        }
        Ok(names)
    }

    fn extract_all(&mut self, dest: &DestDir) -> Result<ExtractionReport> {
        let mut archive = self.reader()?;
        let entries = archive
            .entries()
            .map_err(|e| invalid(format!("failed to read TAR entries: {e}")))?;

        let mut report = ExtractionReport::new();
        for entry_result in entries {
            let mut entry =
                entry_result.map_err(|e| invalid(format!("failed to read TAR entry: {e}")))?;
            let name = entry_name(&entry);
            let relative = sanitize_entry_path(&name, ArchiveKind::TarGz)?;
            if relative.as_os_str().is_empty() {
                // "./" style entries resolve to the destination itself.
                continue;
            }

            reject_special(&entry, &name)?;
            match entry.header().entry_type() {
                tar::EntryType::Directory => {
                    common::ensure_dir(&dest.join_entry(&relative))?;
                    report.directories_created += 1;
                }
                tar::EntryType::Symlink => {
                    let target = link_target(&entry, &name)?;
                    common::create_symlink(&target, &dest.join_entry(&relative))?;
                }
                // Regular, GNUSparse, and long-name continuation entries
                // all carry file content.
                _ => {
                    let written =
                        common::write_file_entry(&mut entry, &dest.join_entry(&relative))?;
                    report.files_extracted += 1;
                    report.bytes_written += written;
                }
            }
            report.entries.push(name);
        }
        Ok(report)
    }
}
