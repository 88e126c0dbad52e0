//! Archive extraction pipeline for the Hermes deploy service.
//!
//! `hermes-core` takes a staged archive file (tar.gz, zip, or 7z), validates
//! every entry path against traversal and absolute-path attacks *before*
//! anything touches the filesystem, clears the destination directory, and
//! materializes the archive contents under it.
//!
//! # Examples
//!
//! ```no_run
//! use hermes_core::ArchiveKind;
//! use hermes_core::DestDir;
//! use hermes_core::extract_archive;
//! use std::path::Path;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let kind = ArchiveKind::classify("release.tar.gz")?;
//! let dest = DestDir::resolve(Path::new("/srv/deploys"), "apps/demo")?;
//! let report = extract_archive(Path::new("/tmp/upload.tar.gz"), kind, &dest)?;
//! println!("extracted {} entries", report.entries.len());
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod api;
pub mod dest;
pub mod error;
pub mod formats;
pub mod report;
pub mod security;

pub use api::extract_archive;
pub use dest::DestDir;
pub use error::ExtractError;
pub use error::Result;
pub use error::UnsafeReason;
pub use formats::ArchiveKind;
pub use report::ExtractionReport;
