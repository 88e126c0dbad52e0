//! Top-level extraction pipeline.

use std::path::Path;

use crate::ArchiveKind;
use crate::DestDir;
use crate::ExtractionReport;
use crate::Result;
use crate::formats;
use crate::security;

/// Runs the full extraction pipeline for a staged upload.
///
/// Order of operations:
/// 1. The destination is cleared of prior content and recreated empty.
/// 2. The matching adapter lists every entry path in the archive.
/// 3. The safety validator checks the complete listing; a violation stops
///    here, leaving the destination empty with nothing written.
/// 4. The adapter materializes all entries under the destination.
///
/// # Errors
///
/// Propagates classification-independent failures from any stage:
/// corrupt archives, unsafe entry paths, and filesystem errors.
///
/// # Examples
///
/// ```no_run
/// use hermes_core::ArchiveKind;
/// use hermes_core::DestDir;
/// use hermes_core::extract_archive;
/// use std::path::Path;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let dest = DestDir::resolve(Path::new("/srv/deploys"), "apps/demo")?;
/// let report = extract_archive(Path::new("/tmp/stage.zip"), ArchiveKind::Zip, &dest)?;
/// # Ok(())
/// # }
/// ```
pub fn extract_archive(staged: &Path, kind: ArchiveKind, dest: &DestDir) -> Result<ExtractionReport> {
    dest.prepare()?;

    let mut adapter = formats::open_adapter(kind, staged);
    let entries = adapter.list_entries()?;
    security::validate_entries(entries.iter().map(String::as_str), kind)?;

    adapter.extract_all(dest)
}
