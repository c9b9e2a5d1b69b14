//! Inbound chat messages.

use axum::Json;
use axum::extract::State;

use ap_protocol::{BotReply, IncomingMessage};

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

/// Longest message text accepted (Telegram's own limit).
const MAX_TEXT_CHARS: usize = 4096;

/// POST /api/v1/messages: answer one user message.
pub async fn post_message(
    State(state): State<AppState>,
    Json(message): Json<IncomingMessage>,
) -> ApiResult<Json<BotReply>> {
    if message.text.chars().count() > MAX_TEXT_CHARS {
        return Err(ApiError::BadRequest(format!(
            "text exceeds {MAX_TEXT_CHARS} characters"
        )));
    }
    let reply = state.assistant.handle(&message).await;
    Ok(Json(reply))
}
