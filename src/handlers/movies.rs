use axum::extract::{Path, Query, State};
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};
use validator::Validate;

use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};
use crate::models::{Movie, MovieCreate, MovieUpdate};
use crate::pagination::PageQuery;
use crate::state::AppState;

/// GET /movies - List the collection, optionally windowed by page/size
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> ApiResult<Vec<Movie>> {
    let window = query.window()?;
    let movies = state.movies.list(window).await?;
    Ok(ApiResponse::success(movies))
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub category: Option<String>,
    pub year: Option<i32>,
}

/// GET /movies/by_category - Filter by category substring and/or exact year
///
/// Returns every match; missing criteria is a 400, an empty result a 404.
pub async fn search(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> ApiResult<Vec<Movie>> {
    if query.category.is_none() && query.year.is_none() {
        return Err(ApiError::bad_request(
            "Specify at least one of 'category' or 'year'",
        ));
    }

    let results = state
        .movies
        .search(query.category.as_deref(), query.year)
        .await?;
    if results.is_empty() {
        return Err(ApiError::not_found("No movies matched the given criteria"));
    }
    Ok(ApiResponse::success(results))
}

/// GET /movies/:id - Get a single movie
pub async fn get(State(state): State<AppState>, Path(id): Path<i64>) -> ApiResult<Movie> {
    let movie = state.movies.get(id).await?;
    Ok(ApiResponse::success(movie))
}

/// POST /movies - Validate and create; the store assigns the id
pub async fn create(
    State(state): State<AppState>,
    Json(payload): Json<MovieCreate>,
) -> ApiResult<Movie> {
    payload.validate()?;
    let movie = state.movies.insert(payload).await?;
    tracing::info!(id = movie.id, title = %movie.title, "movie created");
    Ok(ApiResponse::created(movie))
}

/// PUT /movies/:id - Partial update; only supplied fields change
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(patch): Json<MovieUpdate>,
) -> ApiResult<Movie> {
    patch.validate()?;
    let movie = state.movies.update(id, &patch).await?;
    Ok(ApiResponse::success(movie))
}

/// DELETE /movies/:id - Remove the movie; its id is never reused
pub async fn delete(State(state): State<AppState>, Path(id): Path<i64>) -> ApiResult<Value> {
    state.movies.delete(id).await?;
    tracing::info!(id, "movie deleted");
    Ok(ApiResponse::success(json!({ "message": "Movie deleted" })))
}
