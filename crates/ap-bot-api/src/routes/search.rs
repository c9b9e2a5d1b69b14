//! Search preview: extracted criteria plus matches, without fallback.

use axum::Json;
use axum::extract::State;
use serde::Deserialize;

use ap_assistant::dialogue::SearchPreview;
use ap_protocol::SearchMode;

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct SearchRequest {
    pub text: String,
    /// Defaults to structured, so the criteria shown are the ones applied.
    #[serde(default)]
    pub mode: Option<SearchMode>,
}

/// POST /api/v1/search
pub async fn search(
    State(state): State<AppState>,
    Json(req): Json<SearchRequest>,
) -> ApiResult<Json<SearchPreview>> {
    if req.text.trim().is_empty() {
        return Err(ApiError::BadRequest("text must not be empty".into()));
    }
    let mode = req.mode.unwrap_or(SearchMode::Structured);
    let preview = state.assistant.preview(&req.text, mode).await?;
    Ok(Json(preview))
}
