use avs_engine::GapAnalysis;
use axum::{
    extract::{Query, State},
    Extension, Json,
};
use serde::Deserialize;

use crate::middleware::RequestId;

use super::{as_of_or_today, map_engine_error, require_param, ApiError, ApiResponse, AppState};

#[derive(Debug, Deserialize)]
pub(super) struct GapQuery {
    pub brand_a: Option<String>,
    pub brand_b: Option<String>,
    pub as_of: Option<String>,
}

pub(super) async fn get_gap(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(query): Query<GapQuery>,
) -> Result<Json<ApiResponse<GapAnalysis>>, ApiError> {
    let brand_a: String = require_param(&req_id.0, "brand_a", query.brand_a.as_deref())?;
    let brand_b: String = require_param(&req_id.0, "brand_b", query.brand_b.as_deref())?;
    let as_of = as_of_or_today(&req_id.0, query.as_of.as_deref())?;

    let gap = state
        .engine
        .compute_gap(&brand_a, &brand_b, &state.mentions, as_of)
        .await
        .map_err(|e| map_engine_error(req_id.0.clone(), &e))?;

    Ok(Json(ApiResponse::new(req_id.0, gap)))
}
