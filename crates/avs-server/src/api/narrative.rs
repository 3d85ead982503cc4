use avs_core::Category;
use avs_engine::NarrativeResult;
use axum::{extract::State, Extension, Json};
use serde::Deserialize;

use crate::middleware::RequestId;

use super::{as_of_or_today, map_engine_error, require_param, ApiError, ApiResponse, AppState};

#[derive(Debug, Deserialize)]
pub(super) struct NarrativeRequest {
    pub brand: String,
    pub category: String,
    #[serde(default)]
    pub as_of: Option<String>,
}

/// Narrative for one brand in one category; cached per day.
pub(super) async fn create_narrative(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Json(body): Json<NarrativeRequest>,
) -> Result<Json<ApiResponse<NarrativeResult>>, ApiError> {
    let category: Category = require_param(&req_id.0, "category", Some(&body.category))?;
    let as_of = as_of_or_today(&req_id.0, body.as_of.as_deref())?;

    let narrative = state
        .engine
        .compute_narrative(&body.brand, category, &state.mentions, as_of)
        .await
        .map_err(|e| map_engine_error(req_id.0.clone(), &e))?;

    Ok(Json(ApiResponse::new(req_id.0, narrative)))
}
