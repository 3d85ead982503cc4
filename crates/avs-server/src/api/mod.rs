mod audit;
mod gap;
mod narrative;
mod scores;
mod sov;

use std::{fmt::Display, str::FromStr, sync::Arc};

use avs_core::Mention;
use avs_engine::{AnalyticsEngine, EngineError};
use axum::{
    extract::State,
    http::{header, HeaderName, Method, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Extension, Json, Router,
};
use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::middleware::{request_id, RequestId};

/// Shared state: one engine and the mention set loaded at startup.
#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<AnalyticsEngine>,
    pub mentions: Arc<Vec<Mention>>,
}

#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub data: T,
    pub meta: ResponseMeta,
}

#[derive(Debug, Serialize)]
pub struct ResponseMeta {
    pub request_id: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct ApiError {
    pub error: ErrorBody,
    pub meta: ResponseMeta,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
struct HealthData {
    status: &'static str,
    mentions: usize,
}

impl ResponseMeta {
    pub(super) fn new(request_id: String) -> Self {
        Self {
            request_id,
            timestamp: Utc::now(),
        }
    }
}

impl<T: Serialize> ApiResponse<T> {
    pub(super) fn new(request_id: String, data: T) -> Self {
        Self {
            data,
            meta: ResponseMeta::new(request_id),
        }
    }
}

impl ApiError {
    pub fn new(
        request_id: impl Into<String>,
        code: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            error: ErrorBody {
                code: code.into(),
                message: message.into(),
            },
            meta: ResponseMeta::new(request_id.into()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = match self.error.code.as_str() {
            "not_found" => StatusCode::NOT_FOUND,
            "bad_request" | "validation_error" => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(self)).into_response()
    }
}

pub(super) fn map_engine_error(request_id: String, error: &EngineError) -> ApiError {
    match error {
        EngineError::NotFound(_) => ApiError::new(request_id, "not_found", error.to_string()),
        EngineError::InvalidInput(msg) => {
            ApiError::new(request_id, "validation_error", msg.clone())
        }
        EngineError::Store(_) => {
            tracing::error!(error = %error, "analytics store failed");
            ApiError::new(request_id, "internal_error", "analytics store unavailable")
        }
    }
}

/// Parse an optional query value, reporting failures as `validation_error`.
pub(super) fn parse_param<T>(
    request_id: &str,
    name: &str,
    raw: Option<&str>,
) -> Result<Option<T>, ApiError>
where
    T: FromStr,
    T::Err: Display,
{
    match raw.map(str::trim).filter(|v| !v.is_empty()) {
        None => Ok(None),
        Some(value) => value.parse().map(Some).map_err(|e| {
            ApiError::new(request_id, "validation_error", format!("invalid {name}: {e}"))
        }),
    }
}

/// Like [`parse_param`] but the value must be present.
pub(super) fn require_param<T>(
    request_id: &str,
    name: &str,
    raw: Option<&str>,
) -> Result<T, ApiError>
where
    T: FromStr,
    T::Err: Display,
{
    parse_param(request_id, name, raw)?.ok_or_else(|| {
        ApiError::new(request_id, "validation_error", format!("{name} is required"))
    })
}

/// `as_of` defaults to today (UTC) when absent.
pub(super) fn as_of_or_today(request_id: &str, raw: Option<&str>) -> Result<NaiveDate, ApiError> {
    Ok(parse_param(request_id, "as_of", raw)?.unwrap_or_else(|| Utc::now().date_naive()))
}

fn build_cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            HeaderName::from_static("x-request-id"),
        ])
}

pub fn build_app(state: AppState) -> Router {
    Router::new()
        .route("/api/v1/health", get(health))
        .route("/api/v1/scores", get(scores::list_scores))
        .route("/api/v1/highlights", get(scores::get_highlights))
        .route("/api/v1/matrix", get(scores::get_matrix))
        .route("/api/v1/sov", get(sov::get_share_of_voice))
        .route("/api/v1/gap", get(gap::get_gap))
        .route("/api/v1/narrative", post(narrative::create_narrative))
        .route("/api/v1/audit", get(audit::get_audit))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(build_cors())
                .layer(axum::middleware::from_fn(request_id)),
        )
        .with_state(state)
}

async fn health(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> impl IntoResponse {
    Json(ApiResponse::new(
        req_id.0,
        HealthData {
            status: "ok",
            mentions: state.mentions.len(),
        },
    ))
}
