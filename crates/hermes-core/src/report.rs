//! Extraction result reporting.

/// Summary of a completed extraction.
///
/// Request-scoped: built by an extractor, consumed by the HTTP layer for
/// the response payload, never persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractionReport {
    /// Archive-recorded entry names that were written, in archive order.
    pub entries: Vec<String>,
    /// Number of regular files written.
    pub files_extracted: usize,
    /// Number of directories created from archive entries.
    pub directories_created: usize,
    /// Total bytes of file content written.
    pub bytes_written: u64,
}

impl ExtractionReport {
    /// Creates an empty report.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Total number of entry paths materialized.
    #[must_use]
    pub fn total_entries(&self) -> usize {
        self.entries.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_report_is_empty() {
        let report = ExtractionReport::new();
        assert_eq!(report.total_entries(), 0);
        assert_eq!(report.files_extracted, 0);
        assert_eq!(report.bytes_written, 0);
    }
}
