use crate::models::{AnalysisRequest, AnalysisResult};
use crate::startup::AppState;
use axum::{body::Bytes, extract::State, http::StatusCode, Json};
use service_core::error::AppError;

/// Error text for a request without a usable `image` field.
pub const NO_IMAGE_MESSAGE: &str = "No image provided in the request body.";

/// Detect labels in the posted image and describe it.
///
/// The body is parsed here rather than through the `Json` extractor so that a
/// malformed body surfaces as a 500 carrying the parser's message.
#[tracing::instrument(skip(state, body), fields(body_bytes = body.len()))]
pub async fn analyze_image(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<AnalysisResult>, AppError> {
    let request: AnalysisRequest =
        serde_json::from_slice(&body).map_err(|e| AppError::InternalError(e.into()))?;

    let encoded_image = request
        .encoded_image()
        .ok_or_else(|| AppError::BadRequest(anyhow::anyhow!(NO_IMAGE_MESSAGE)))?;

    let result = state
        .analyzer
        .analyze(encoded_image)
        .await
        .map_err(|e| AppError::InternalError(e.into()))?;

    tracing::info!(label_count = result.labels.len(), "Image analysis completed");

    Ok(Json(result))
}

/// Answer browser pre-flight checks; the CORS headers come from middleware.
pub async fn preflight() -> StatusCode {
    StatusCode::OK
}
