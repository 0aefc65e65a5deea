//! Search handlers for the HTTP API.

use axum::{
    extract::{Query, State},
    Json,
};
use std::sync::Arc;

use crate::file::{FileQuery, SearchEngine, SortDirection, SortField};
use crate::web::dto::{
    parse_categories, ApiResponse, FileResponse, PaginatedResponse, SearchQuery, SuggestQuery,
};
use crate::web::error::ApiError;
use crate::web::handlers::{file_responses, AppState};

/// GET /api/search - Filtered, sorted, paginated file search.
pub async fn search_files(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SearchQuery>,
) -> Result<Json<PaginatedResponse<FileResponse>>, ApiError> {
    let categories = parse_categories(params.categories.as_deref())?;
    let query = FileQuery::from_page(params.page, params.size)
        .with_text(params.q)
        .with_categories(categories)
        .with_sort(
            SortField::from_param(params.sort_field.as_deref()),
            SortDirection::from_param(params.sort_dir.as_deref()),
        );

    let page = SearchEngine::new(state.db.pool()).search(&query).await?;
    let files = file_responses(&state, page.files).await?;

    Ok(Json(PaginatedResponse::new(
        files,
        params.page.max(1),
        page.limit,
        page.total,
    )))
}

/// GET /api/search/suggest - Title and filename completions.
pub async fn suggest(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SuggestQuery>,
) -> Result<Json<ApiResponse<Vec<String>>>, ApiError> {
    let categories = parse_categories(params.categories.as_deref())?;
    let suggestions = SearchEngine::new(state.db.pool())
        .suggest(params.q.as_deref(), &categories)
        .await?;

    Ok(Json(ApiResponse::new(suggestions)))
}
