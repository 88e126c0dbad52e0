//! JSON response bodies.

use serde::Deserialize;
use serde::Serialize;

/// Body of `GET /health`.
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Always `"ok"` while the process is serving.
    pub status: String,
    /// Service identifier.
    pub service: String,
    /// Crate version baked in at compile time.
    pub version: String,
}

impl HealthResponse {
    /// Health body for this build.
    #[must_use]
    pub fn current() -> Self {
        Self {
            status: "ok".to_string(),
            service: "hermes".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

/// Body of a successful `PUT` upload.
#[derive(Debug, Serialize, Deserialize)]
pub struct ExtractResponse {
    /// Request path as received, leading slash included.
    pub endpoint: String,
    /// Always `"PUT"`.
    pub method: String,
    /// Absolute destination directory the archive was unpacked into.
    pub created_path: String,
    /// Always `"extracted"`.
    pub status: String,
    /// Archive family that was detected (`tar.gz`, `zip`, or `7z`).
    pub archive_type: String,
    /// Filename of the uploaded part.
    pub filename: String,
    /// Size of the uploaded archive in bytes.
    pub file_size: u64,
    /// Sorted names of the immediate children of the destination after
    /// extraction.
    pub extracted_items: Vec<String>,
    /// Total number of entries the archive produced.
    pub total_extracted_paths: usize,
}

/// Body of every error response.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Human-readable failure description.
    pub detail: String,
}
