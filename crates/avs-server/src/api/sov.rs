use avs_core::{Assistant, Category};
use avs_engine::{CategorySov, SovEntry};
use axum::{
    extract::{Query, State},
    Extension, Json,
};
use serde::{Deserialize, Serialize};

use crate::middleware::RequestId;

use super::{parse_param, require_param, ApiError, ApiResponse, AppState};

#[derive(Debug, Deserialize)]
pub(super) struct SovQuery {
    pub category: Option<String>,
    pub assistant: Option<String>,
}

#[derive(Debug, Serialize)]
pub(super) struct AssistantSov {
    pub category: Category,
    pub assistant: Assistant,
    pub entries: Vec<SovEntry>,
}

/// Whole-category view, or a single assistant's ranking when one is named.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub(super) enum SovData {
    Category(CategorySov),
    Assistant(AssistantSov),
}

pub(super) async fn get_share_of_voice(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(query): Query<SovQuery>,
) -> Result<Json<ApiResponse<SovData>>, ApiError> {
    let category: Category = require_param(&req_id.0, "category", query.category.as_deref())?;
    let assistant: Option<Assistant> =
        parse_param(&req_id.0, "assistant", query.assistant.as_deref())?;

    let data = match assistant {
        Some(assistant) => SovData::Assistant(AssistantSov {
            category,
            assistant,
            entries: state
                .engine
                .compute_share_of_voice(&state.mentions, category, Some(assistant)),
        }),
        None => SovData::Category(state.engine.category_share_of_voice(&state.mentions, category)),
    };

    Ok(Json(ApiResponse::new(req_id.0, data)))
}
