//! Archive format adapters.

pub mod common;
pub mod detect;
pub mod sevenz;
pub mod tar;
pub mod traits;
pub mod zip;

pub use detect::ArchiveKind;
pub use sevenz::SevenZAdapter;
pub use tar::TarGzAdapter;
pub use traits::ArchiveAdapter;
pub use zip::ZipAdapter;

use std::path::Path;

/// Opens the format adapter matching `kind` over a staged archive file.
///
/// Dispatch over the closed [`ArchiveKind`] set; each adapter re-opens the
/// staged file per operation, so listing and extraction are independent
/// passes.
#[must_use]
pub fn open_adapter(kind: ArchiveKind, staged: &Path) -> Box<dyn ArchiveAdapter> {
    match kind {
        ArchiveKind::TarGz => Box::new(TarGzAdapter::open(staged)),
        ArchiveKind::Zip => Box::new(ZipAdapter::open(staged)),
        ArchiveKind::SevenZ => Box::new(SevenZAdapter::open(staged)),
    }
}
