use avs_core::Category;
use avs_engine::AuditReport;
use axum::{
    extract::{Query, State},
    Extension, Json,
};
use serde::Deserialize;

use crate::middleware::RequestId;

use super::{as_of_or_today, map_engine_error, require_param, ApiError, ApiResponse, AppState};

#[derive(Debug, Deserialize)]
pub(super) struct AuditQuery {
    pub brand: Option<String>,
    pub category: Option<String>,
    pub as_of: Option<String>,
}

/// Visibility audit: score, narrative, top-competitor gap and recommendations.
pub(super) async fn get_audit(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(query): Query<AuditQuery>,
) -> Result<Json<ApiResponse<AuditReport>>, ApiError> {
    let brand: String = require_param(&req_id.0, "brand", query.brand.as_deref())?;
    let category: Category = require_param(&req_id.0, "category", query.category.as_deref())?;
    let as_of = as_of_or_today(&req_id.0, query.as_of.as_deref())?;

    let report = state
        .engine
        .compute_audit(&brand, category, &state.mentions, as_of)
        .await
        .map_err(|e| map_engine_error(req_id.0.clone(), &e))?;

    Ok(Json(ApiResponse::new(req_id.0, report)))
}
