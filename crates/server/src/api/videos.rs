//! Video catalog API handlers.

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::error;
use vidshelf_core::{CatalogEntry, CatalogError, Library, Page, PageRequest, Pagination};

use crate::state::AppState;

// ============================================================================
// Request/Response types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub q: Option<String>,
    #[serde(default = "default_page")]
    pub page: u32,
    #[serde(default = "default_limit")]
    pub limit: u32,
}

fn default_page() -> u32 {
    PageRequest::default().page
}

fn default_limit() -> u32 {
    PageRequest::default().limit
}

#[derive(Debug, Deserialize)]
pub struct AddTagRequest {
    #[serde(default)]
    pub tag: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct VideoListResponse {
    pub videos: Vec<CatalogEntry>,
    pub pagination: Pagination,
}

impl From<Page<CatalogEntry>> for VideoListResponse {
    fn from(page: Page<CatalogEntry>) -> Self {
        Self {
            videos: page.items,
            pagination: page.pagination,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RescanResponse {
    pub message: String,
    pub video_count: usize,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

pub type ApiError = (StatusCode, Json<ErrorResponse>);

type ApiResult<T> = Result<Json<T>, ApiError>;

/// Map a catalog error to an HTTP status and JSON error body.
pub fn error_response(err: CatalogError) -> (StatusCode, Json<ErrorResponse>) {
    let (status, message) = match &err {
        CatalogError::NotFound(_) => (StatusCode::NOT_FOUND, "Video not found".to_string()),
        CatalogError::TagRequired | CatalogError::InvalidTag(_) => {
            (StatusCode::BAD_REQUEST, err.to_string())
        }
        CatalogError::Io { .. }
        | CatalogError::IndexParse { .. }
        | CatalogError::IndexEncode { .. }
        | CatalogError::TagWriteFailed(_) => {
            error!("Request failed: {}", err);
            (StatusCode::INTERNAL_SERVER_ERROR, err.to_string())
        }
    };
    (status, Json(ErrorResponse { error: message }))
}

/// Run a library call on the blocking pool.
///
/// Library calls hold a mutex across filesystem work, so they must not run on
/// a runtime worker.
pub async fn with_library<T, F>(state: &Arc<AppState>, f: F) -> Result<T, ApiError>
where
    F: FnOnce(&Library) -> Result<T, CatalogError> + Send + 'static,
    T: Send + 'static,
{
    let state = Arc::clone(state);
    tokio::task::spawn_blocking(move || f(state.library()))
        .await
        .map_err(|e| {
            error!("Library task failed: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Internal server error".to_string(),
                }),
            )
        })?
        .map_err(error_response)
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /api/videos
///
/// List the catalog, scanning the media root first if the index is empty.
pub async fn list_videos(
    State(state): State<Arc<AppState>>,
    Query(page): Query<PageRequest>,
) -> ApiResult<VideoListResponse> {
    let page = with_library(&state, move |library| library.list(page)).await?;
    Ok(Json(page.into()))
}

/// GET /api/videos/search
///
/// Videos whose name or tags contain `q`, ignoring case.
pub async fn search_videos(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SearchParams>,
) -> ApiResult<VideoListResponse> {
    let page = PageRequest::new(params.page, params.limit);
    let term = params.q.unwrap_or_default();
    let page = with_library(&state, move |library| library.search(&term, page)).await?;
    Ok(Json(page.into()))
}

/// GET /api/videos/rescan
///
/// Force a full rescan of the media root.
pub async fn rescan(State(state): State<Arc<AppState>>) -> ApiResult<RescanResponse> {
    let video_count = with_library(&state, |library| library.rescan()).await?;
    Ok(Json(RescanResponse {
        message: "Rescan completed".to_string(),
        video_count,
    }))
}

/// GET /api/videos/{id}
pub async fn get_video(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<CatalogEntry> {
    with_library(&state, move |library| library.get(&id))
        .await
        .map(Json)
}

/// POST /api/videos/{id}/tags
///
/// Add a tag. The body is `{"tag": "..."}`; a missing or unparsable body is
/// reported as a missing tag.
pub async fn add_tag(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    body: Bytes,
) -> ApiResult<CatalogEntry> {
    let tag = serde_json::from_slice::<AddTagRequest>(&body)
        .ok()
        .and_then(|request| request.tag)
        .ok_or_else(|| error_response(CatalogError::TagRequired))?;

    with_library(&state, move |library| library.add_tag(&id, &tag))
        .await
        .map(Json)
}

/// DELETE /api/videos/{id}/tags/{tag}
pub async fn remove_tag(
    State(state): State<Arc<AppState>>,
    Path((id, tag)): Path<(String, String)>,
) -> ApiResult<CatalogEntry> {
    with_library(&state, move |library| library.remove_tag(&id, &tag))
        .await
        .map(Json)
}
