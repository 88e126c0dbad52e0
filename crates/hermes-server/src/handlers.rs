//! Request handlers.

use std::io::Write;
use std::path::Path;
use std::path::PathBuf;
use std::sync::Arc;

use axum::Json;
use axum::body::Bytes;
use axum::extract::Multipart;
use axum::extract::Path as UrlPath;
use axum::extract::State;
use axum::http::HeaderMap;
use tokio::sync::Mutex;
use tracing::info;
use tracing::warn;

use hermes_core::ArchiveKind;
use hermes_core::DestDir;
use hermes_core::ExtractionReport;
use hermes_core::extract_archive;

use crate::AppState;
use crate::auth;
use crate::error::ApiError;
use crate::types::ExtractResponse;
use crate::types::HealthResponse;

/// `GET /health` — liveness probe, never authenticated.
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse::current())
}

/// `PUT /` — upload targeting the base directory itself.
pub async fn upload_root(
    State(state): State<AppState>,
    headers: HeaderMap,
    multipart: Multipart,
) -> Result<Json<ExtractResponse>, ApiError> {
    upload_to(state, headers, String::new(), multipart).await
}

/// `PUT /{*path}` — upload targeting a subdirectory of the base.
pub async fn upload(
    State(state): State<AppState>,
    UrlPath(path): UrlPath<String>,
    headers: HeaderMap,
    multipart: Multipart,
) -> Result<Json<ExtractResponse>, ApiError> {
    upload_to(state, headers, path, multipart).await
}

async fn upload_to(
    state: AppState,
    headers: HeaderMap,
    request_path: String,
    mut multipart: Multipart,
) -> Result<Json<ExtractResponse>, ApiError> {
    auth::check_token(state.settings.api_token.as_deref(), &headers)?;

    let endpoint = format!("/{request_path}");
    let (filename, bytes) = read_file_part(&mut multipart).await?;
    let file_size = bytes.len() as u64;
    info!(endpoint, filename, file_size, "received archive upload");

    let kind = match ArchiveKind::classify(&filename) {
        Ok(kind) => kind,
        Err(err) => {
            warn!(endpoint, filename, "rejected upload: {err}");
            return Err(err.into());
        }
    };

    ensure_dir_configured(&state.settings.base_dir, "base directory")?;
    ensure_dir_configured(&state.settings.tmp_dir, "temp directory")?;

    let dest = DestDir::resolve(&state.settings.base_dir, &request_path)?;

    let staging = staging_dir(&state.settings.tmp_dir, dest.as_path());

    // One extraction per destination at a time; concurrent uploads to
    // different paths proceed in parallel.
    let lock = dest_lock(&state, dest.as_path().to_path_buf()).await;
    let result = {
        let _guard = lock.lock().await;
        run_extraction(staging, kind, dest.clone(), bytes).await
    };
    release_dest_lock(&state, dest.as_path(), lock).await;

    let (report, items) = result?;
    info!(
        endpoint,
        dest = %dest.as_path().display(),
        entries = report.total_entries(),
        bytes = report.bytes_written,
        "extraction complete"
    );

    Ok(Json(ExtractResponse {
        endpoint,
        method: "PUT".to_string(),
        created_path: dest.as_path().display().to_string(),
        status: "extracted".to_string(),
        archive_type: kind.as_str().to_string(),
        filename,
        file_size,
        extracted_items: items,
        total_extracted_paths: report.total_entries(),
    }))
}

/// Finds the `file` part and buffers its content. Other parts are
/// skipped without being read.
async fn read_file_part(multipart: &mut Multipart) -> Result<(String, Bytes), ApiError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadMultipart(e.to_string()))?
    {
        if field.name() != Some("file") {
            continue;
        }
        let filename = field
            .file_name()
            .map(ToString::to_string)
            .ok_or(ApiError::MissingFilename)?;
        let bytes = field
            .bytes()
            .await
            .map_err(|e| ApiError::BadMultipart(e.to_string()))?;
        return Ok((filename, bytes));
    }
    Err(ApiError::MissingFile)
}

fn ensure_dir_configured(dir: &Path, role: &str) -> Result<(), ApiError> {
    if dir.is_dir() {
        Ok(())
    } else {
        Err(ApiError::Config(format!(
            "{role} does not exist: {}",
            dir.display()
        )))
    }
}

/// Picks the directory that holds the staged upload. Extraction clears
/// the destination before the staged file is read, so a configured temp
/// dir lying inside the destination (the default temp dir is the base,
/// which an upload to `/` resolves to) falls back to the system temp dir.
fn staging_dir(tmp_dir: &Path, dest: &Path) -> PathBuf {
    let resolved = tmp_dir
        .canonicalize()
        .unwrap_or_else(|_| tmp_dir.to_path_buf());
    if resolved.starts_with(dest) {
        std::env::temp_dir()
    } else {
        resolved
    }
}

async fn dest_lock(state: &AppState, key: PathBuf) -> Arc<Mutex<()>> {
    let mut table = state.locks.lock().await;
    table.entry(key).or_default().clone()
}

/// Returns this request's lock handle and evicts the table entry once no
/// other request holds it, so the table stays bounded by in-flight
/// uploads rather than growing per distinct path.
async fn release_dest_lock(state: &AppState, key: &Path, lock: Arc<Mutex<()>>) {
    let mut table = state.locks.lock().await;
    drop(lock);
    if table.get(key).is_some_and(|entry| Arc::strong_count(entry) == 1) {
        table.remove(key);
    }
}

/// Stages the upload to a temp file and runs the blocking extraction
/// pipeline off the async runtime. The staged file is removed on every
/// exit path.
async fn run_extraction(
    staging_dir: PathBuf,
    kind: ArchiveKind,
    dest: DestDir,
    bytes: Bytes,
) -> Result<(ExtractionReport, Vec<String>), ApiError> {
    tokio::task::spawn_blocking(move || {
        let mut staged = tempfile::Builder::new()
            .prefix("hermes-upload-")
            .suffix(kind.staging_suffix())
            .tempfile_in(&staging_dir)
            .map_err(|e| ApiError::Internal(format!("cannot stage upload: {e}")))?;
        staged
            .write_all(&bytes)
            .and_then(|()| staged.flush())
            .map_err(|e| ApiError::Internal(format!("cannot stage upload: {e}")))?;

        let report = extract_archive(staged.path(), kind, &dest)?;
        let items = list_children(dest.as_path())?;
        Ok((report, items))
    })
    .await
    .map_err(|e| ApiError::Internal(format!("extraction task failed: {e}")))?
}

fn list_children(dir: &Path) -> Result<Vec<String>, ApiError> {
    let entries = std::fs::read_dir(dir)
        .map_err(|e| ApiError::Internal(format!("cannot list {}: {e}", dir.display())))?;

    let mut items = Vec::new();
    for entry in entries {
        let entry = entry
            .map_err(|e| ApiError::Internal(format!("cannot list {}: {e}", dir.display())))?;
        items.push(entry.file_name().to_string_lossy().into_owned());
    }
    items.sort();
    Ok(items)
}
