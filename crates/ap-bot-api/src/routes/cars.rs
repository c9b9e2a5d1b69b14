//! Car lookup by sheet ID.

use axum::Json;
use axum::extract::{Path, State};

use ap_protocol::Record;

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

/// GET /api/v1/cars/{id}: one inventory row as a JSON object.
pub async fn get_car(
    State(state): State<AppState>,
    Path(car_id): Path<String>,
) -> ApiResult<Json<Record>> {
    state
        .assistant
        .car_by_id(&car_id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("car '{car_id}' not found")))
}
