//! HTTP error taxonomy and response mapping.

use axum::Json;
use axum::http::StatusCode;
use axum::http::header;
use axum::response::IntoResponse;
use axum::response::Response;
use thiserror::Error;

use hermes_core::ExtractError;

use crate::types::ErrorBody;

/// Request-terminating errors, each mapped to a status class:
/// client-caused validation failures are 400, auth failures 401, a
/// missing upload part 422, and operator/extraction faults 500.
#[derive(Error, Debug)]
pub enum ApiError {
    /// Token required but absent or mismatched.
    #[error("Missing or invalid API token")]
    Unauthorized,

    /// Multipart request carried no `file` part.
    #[error("No file supplied in multipart field 'file'")]
    MissingFile,

    /// The `file` part carried no filename to classify.
    #[error("Uploaded file has no filename")]
    MissingFilename,

    /// Multipart body could not be parsed.
    #[error("Malformed multipart body: {0}")]
    BadMultipart(String),

    /// Base or temp directory absent: operator fault, not client fault.
    #[error("Service misconfigured: {0}")]
    Config(String),

    /// Failure from the extraction pipeline; the source error decides
    /// whether the client or the service is at fault.
    #[error(transparent)]
    Extraction(#[from] ExtractError),

    /// Anything else (join failures and similar internal conditions).
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::MissingFile => StatusCode::UNPROCESSABLE_ENTITY,
            Self::MissingFilename | Self::BadMultipart(_) => StatusCode::BAD_REQUEST,
            Self::Config(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Extraction(err) => {
                if err.is_client_fault() {
                    StatusCode::BAD_REQUEST
                } else {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = Json(ErrorBody {
            detail: self.to_string(),
        });

        if status == StatusCode::UNAUTHORIZED {
            (status, [(header::WWW_AUTHENTICATE, "Bearer")], body).into_response()
        } else {
            (status, body).into_response()
        }
    }
}
