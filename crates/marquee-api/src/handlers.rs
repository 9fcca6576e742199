use axum::{
    extract::{rejection::JsonRejection, rejection::QueryRejection, Path, Query, State},
    http::StatusCode,
    Json,
};
use marquee_core::{parse_id_list, ImportOutcome};
use marquee_models::{ContentKind, ImportSummary, SearchPage};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ApiError;
use crate::response::ApiResponse;
use crate::state::AppState;

type ApiResult<T> = Result<(StatusCode, Json<ApiResponse<T>>), ApiError>;

const MIN_QUERY_CHARS: usize = 2;

#[derive(Debug, Default, Deserialize)]
pub struct SearchParams {
    pub query: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub page: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ImportRequest {
    pub imdb_id: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub category_id: Option<i64>,
    pub language_id: Option<i64>,
}

/// Either a JSON array of ids or the raw textarea contents
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum IdList {
    List(Vec<String>),
    Text(String),
}

impl IdList {
    fn into_ids(self) -> Vec<String> {
        match self {
            IdList::List(ids) => ids
                .into_iter()
                .map(|id| id.trim().to_string())
                .filter(|id| !id.is_empty())
                .collect(),
            IdList::Text(text) => parse_id_list(&text),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct BulkImportRequest {
    pub imdb_ids: Option<IdList>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub category_id: Option<i64>,
    pub language_id: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct HealthStatus {
    pub status: &'static str,
    pub provider: String,
}

fn validate_query(query: Option<&str>) -> Result<String, ApiError> {
    let query = query.map(str::trim).unwrap_or_default();
    if query.is_empty() {
        return Err(ApiError::Validation("The query field is required.".to_string()));
    }
    if query.chars().count() < MIN_QUERY_CHARS {
        return Err(ApiError::Validation(format!(
            "The query field must be at least {} characters.",
            MIN_QUERY_CHARS
        )));
    }
    Ok(query.to_string())
}

fn validate_kind(kind: Option<&str>) -> Result<Option<ContentKind>, ApiError> {
    match kind.map(str::trim) {
        None | Some("") => Ok(None),
        Some("movie") => Ok(Some(ContentKind::Movie)),
        Some("series") => Ok(Some(ContentKind::Series)),
        Some(_) => Err(ApiError::Validation("The selected type is invalid.".to_string())),
    }
}

fn require_kind(kind: Option<&str>) -> Result<ContentKind, ApiError> {
    validate_kind(kind)?
        .ok_or_else(|| ApiError::Validation("The type field is required.".to_string()))
}

fn validate_page(page: Option<&str>) -> Result<u32, ApiError> {
    let page = match page.map(str::trim) {
        None | Some("") => return Ok(1),
        Some(p) => p,
    };
    let page: i64 = page
        .parse()
        .map_err(|_| ApiError::Validation("The page field must be an integer.".to_string()))?;
    if page < 1 {
        return Err(ApiError::Validation("The page field must be at least 1.".to_string()));
    }
    u32::try_from(page)
        .map_err(|_| ApiError::Validation("The page field is too large.".to_string()))
}

fn require_positive(value: Option<i64>, field: &str) -> Result<i64, ApiError> {
    match value {
        None => Err(ApiError::Validation(format!("The {} field is required.", field))),
        Some(v) if v < 1 => Err(ApiError::Validation(format!(
            "The {} field must be at least 1.",
            field
        ))),
        Some(v) => Ok(v),
    }
}

fn language_or_default(state: &AppState, language_id: Option<i64>) -> Result<i64, ApiError> {
    require_positive(Some(language_id.unwrap_or(state.default_language_id)), "language_id")
}

fn kind_label(kind: ContentKind) -> &'static str {
    match kind {
        ContentKind::Movie => "Movie",
        ContentKind::Series => "Series",
    }
}

async fn run_search(
    state: &AppState,
    params: SearchParams,
    fixed_kind: Option<ContentKind>,
) -> ApiResult<SearchPage> {
    let query = validate_query(params.query.as_deref())?;
    let kind = match fixed_kind {
        Some(kind) => Some(kind),
        None => validate_kind(params.kind.as_deref())?,
    };
    let page = validate_page(params.page.as_deref())?;

    let results = state
        .provider()
        .search(&query, kind, page)
        .await
        .map_err(ApiError::from_search)?;
    Ok((StatusCode::OK, Json(ApiResponse::ok(results))))
}

/// GET /api/omdb/search
pub async fn search(
    State(state): State<AppState>,
    params: Result<Query<SearchParams>, QueryRejection>,
) -> ApiResult<SearchPage> {
    let Query(params) = params?;
    run_search(&state, params, None).await
}

/// GET /api/omdb/movies
pub async fn search_movies(
    State(state): State<AppState>,
    params: Result<Query<SearchParams>, QueryRejection>,
) -> ApiResult<SearchPage> {
    let Query(params) = params?;
    run_search(&state, params, Some(ContentKind::Movie)).await
}

/// GET /api/omdb/series
pub async fn search_series(
    State(state): State<AppState>,
    params: Result<Query<SearchParams>, QueryRejection>,
) -> ApiResult<SearchPage> {
    let Query(params) = params?;
    run_search(&state, params, Some(ContentKind::Series)).await
}

/// GET /api/omdb/details/{imdb_id}
///
/// Returns the provider payload untouched.
pub async fn details(State(state): State<AppState>, Path(imdb_id): Path<String>) -> ApiResult<Value> {
    let record = state
        .provider()
        .details(&imdb_id)
        .await
        .map_err(ApiError::from_details)?;

    let payload = if record.raw.is_null() {
        serde_json::to_value(&record).unwrap_or(Value::Null)
    } else {
        record.raw
    };
    Ok((StatusCode::OK, Json(ApiResponse::ok(payload))))
}

/// POST /api/omdb/import
pub async fn import(
    State(state): State<AppState>,
    body: Result<Json<ImportRequest>, JsonRejection>,
) -> ApiResult<ImportOutcome> {
    let Json(request) = body?;
    let imdb_id = request
        .imdb_id
        .as_deref()
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .ok_or_else(|| ApiError::Validation("The imdb_id field is required.".to_string()))?
        .to_string();
    let kind = require_kind(request.kind.as_deref())?;
    let category_id = require_positive(request.category_id, "category_id")?;
    let language_id = language_or_default(&state, request.language_id)?;

    let outcome = state
        .importer
        .import_one(&imdb_id, kind, category_id, language_id)
        .await?;

    let (status, message) = match &outcome {
        ImportOutcome::Created(_) => (
            StatusCode::CREATED,
            format!("{} imported successfully", kind_label(kind)),
        ),
        ImportOutcome::Existing(_) => (
            StatusCode::OK,
            format!("{} already exists", kind_label(kind)),
        ),
    };
    Ok((status, Json(ApiResponse::ok_with_message(outcome, message))))
}

/// POST /api/omdb/import/bulk
pub async fn bulk_import(
    State(state): State<AppState>,
    body: Result<Json<BulkImportRequest>, JsonRejection>,
) -> ApiResult<ImportSummary> {
    let Json(request) = body?;
    let ids = request.imdb_ids.map(IdList::into_ids).unwrap_or_default();
    if ids.is_empty() {
        return Err(ApiError::Validation("The imdb_ids field is required.".to_string()));
    }
    let kind = require_kind(request.kind.as_deref())?;
    let category_id = require_positive(request.category_id, "category_id")?;
    let language_id = language_or_default(&state, request.language_id)?;

    let summary = state
        .bulk
        .import_many(&ids, kind, category_id, language_id)
        .await;
    let message = format!(
        "Imported {} of {} ({} failed)",
        summary.success_count,
        summary.total(),
        summary.failure_count
    );
    Ok((StatusCode::OK, Json(ApiResponse::ok_with_message(summary, message))))
}

/// GET /health
pub async fn health(State(state): State<AppState>) -> ApiResult<HealthStatus> {
    Ok((
        StatusCode::OK,
        Json(ApiResponse::ok(HealthStatus {
            status: "ok",
            provider: state.provider().provider_name().to_string(),
        })),
    ))
}
