//! Common trait for archive format adapters.

use crate::ArchiveKind;
use crate::DestDir;
use crate::ExtractionReport;
use crate::Result;

/// Capability set every supported archive format provides.
///
/// Listing is independent of extraction so the safety validator can walk
/// the complete entry listing before the first byte is written.
pub trait ArchiveAdapter {
    /// The archive kind this adapter handles.
    fn kind(&self) -> ArchiveKind;

    /// Reads the archive-recorded entry names without writing anything.
    ///
    /// # Errors
    ///
    /// Returns an error if the archive bytes are corrupt or unreadable.
    fn list_entries(&mut self) -> Result<Vec<String>>;

    /// Materializes every entry under the destination directory,
    /// preserving relative structure.
    ///
    /// # Errors
    ///
    /// Returns an error on corrupt archive bytes, an unsafe entry path,
    /// or a filesystem failure.
    fn extract_all(&mut self, dest: &DestDir) -> Result<ExtractionReport>;
}
