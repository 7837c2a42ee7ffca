use axum::extract::multipart::MultipartRejection;
use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Serialize;
use serde_json::json;
use tracing::{debug, warn};

use super::AppState;
use crate::error::AnalysisError;
use crate::io::{AnalysisReport, decode_transcript};
use crate::pipeline::analyze_transcript;

/// Multipart field carrying the transcript
const FILE_FIELD: &str = "file";

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/analyze", post(analyze))
        .route("/health", get(health))
}

#[derive(Serialize)]
struct HealthStatus {
    status: &'static str,
}

async fn health() -> Json<HealthStatus> {
    Json(HealthStatus { status: "ok" })
}

async fn analyze(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<AnalysisReport>, ApiError> {
    let mut multipart = multipart.map_err(|e| {
        debug!("Rejected upload: {}", e);
        AnalysisError::NoInput
    })?;

    let mut upload = None;
    while let Some(field) = multipart.next_field().await.map_err(|e| {
        debug!("Malformed multipart body: {}", e);
        AnalysisError::NoInput
    })? {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }

        let file_name = field.file_name().map(str::to_string);
        let bytes = field.bytes().await.map_err(|e| {
            debug!("Failed to read uploaded file: {}", e);
            AnalysisError::NoInput
        })?;
        upload = Some((file_name, bytes));
        break;
    }

    let (file_name, bytes) = upload.ok_or(AnalysisError::NoInput)?;
    // A field without a filename is form data, not an uploaded file
    let file_name = file_name.ok_or(AnalysisError::NoInput)?;
    if file_name.is_empty() {
        return Err(AnalysisError::EmptyInput.into());
    }

    debug!("Received upload {:?} ({} bytes)", file_name, bytes.len());

    let transcript = decode_transcript(&bytes)?;
    let report = analyze_transcript(state.classifier.as_ref(), &transcript, &state.config).await?;

    Ok(Json(report))
}

/// JSON error response for the analyze endpoint
#[derive(Debug)]
pub struct ApiError(AnalysisError);

impl From<AnalysisError> for ApiError {
    fn from(err: AnalysisError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = if self.0.is_client_error() {
            StatusCode::BAD_REQUEST
        } else {
            warn!("Analysis failed: {}", self.0);
            StatusCode::INTERNAL_SERVER_ERROR
        };

        (status, Json(json!({ "error": self.0.to_string() }))).into_response()
    }
}
