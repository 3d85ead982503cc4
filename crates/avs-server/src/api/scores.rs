use avs_core::Category;
use avs_engine::{BrandScore, Highlights, PromptMatrixRow};
use axum::{
    extract::{Query, State},
    Extension, Json,
};
use serde::Deserialize;

use crate::middleware::RequestId;

use super::{as_of_or_today, map_engine_error, parse_param, ApiError, ApiResponse, AppState};

#[derive(Debug, Deserialize)]
pub(super) struct ScoresQuery {
    pub brand: Option<String>,
    pub category: Option<String>,
    pub as_of: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(super) struct AsOfQuery {
    pub as_of: Option<String>,
}

/// Visibility scores, highest first.
///
/// Scores are always normalised over every loaded mention. `category` keeps
/// brands whose dominant category matches and `brand` keeps the exact brand
/// name. The day's snapshots are recorded in the background.
pub(super) async fn list_scores(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(query): Query<ScoresQuery>,
) -> Result<Json<ApiResponse<Vec<BrandScore>>>, ApiError> {
    let category: Option<Category> =
        parse_param(&req_id.0, "category", query.category.as_deref())?;
    let as_of = as_of_or_today(&req_id.0, query.as_of.as_deref())?;

    let scores = state
        .engine
        .compute_scores(&state.mentions, category, as_of)
        .await
        .map_err(|e| map_engine_error(req_id.0.clone(), &e))?;

    // fire and forget; failures are logged by the engine
    drop(state.engine.record_snapshots(&scores, as_of));

    let brand = query.brand.as_deref().map(str::trim).filter(|b| !b.is_empty());
    let data = scores
        .into_iter()
        .filter(|s| brand.is_none_or(|b| s.brand == b))
        .collect();

    Ok(Json(ApiResponse::new(req_id.0, data)))
}

pub(super) async fn get_highlights(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(query): Query<AsOfQuery>,
) -> Result<Json<ApiResponse<Highlights>>, ApiError> {
    let as_of = as_of_or_today(&req_id.0, query.as_of.as_deref())?;
    let data = state
        .engine
        .highlights(&state.mentions, as_of)
        .await
        .map_err(|e| map_engine_error(req_id.0.clone(), &e))?;
    Ok(Json(ApiResponse::new(req_id.0, data)))
}

/// Best-ranked brand per category and assistant.
pub(super) async fn get_matrix(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> Json<ApiResponse<Vec<PromptMatrixRow>>> {
    Json(ApiResponse::new(
        req_id.0,
        state.engine.prompt_matrix(&state.mentions),
    ))
}
