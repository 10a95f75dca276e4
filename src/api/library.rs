//! Personal list and favorites endpoints.
//!
//! Handlers only map HTTP to [`LibraryService`](crate::services::LibraryService)
//! calls. Adds and removes are idempotent: repeating one succeeds and the
//! message says nothing changed.

use axum::{Json, extract::State};
use serde::Serialize;
use std::sync::Arc;

use super::auth::CurrentUser;
use super::validation::{BaseUrl, Params};
use super::{ApiError, ApiResponse, AppState};
use crate::models::catalog::MovieCard;

const MOVIE_ID: &str = "movie_id";

#[derive(Debug, Serialize)]
pub struct Changed {
    pub changed: bool,
}

fn changed(changed: bool, yes: &str, no: &str) -> Json<ApiResponse<Changed>> {
    let message = if changed { yes } else { no };
    Json(ApiResponse::with_message(message, Changed { changed }))
}

/// GET /myListCards
pub async fn my_list(
    State(state): State<Arc<AppState>>,
    current: CurrentUser,
    BaseUrl(base): BaseUrl,
) -> Result<Json<ApiResponse<Vec<MovieCard>>>, ApiError> {
    let cards = state.library_service().my_list(current.id(), &base).await?;
    Ok(Json(ApiResponse::with_message(
        "User movie list retrieved successfully",
        cards,
    )))
}

/// GET /mayLike
pub async fn may_like(
    State(state): State<Arc<AppState>>,
    current: CurrentUser,
    BaseUrl(base): BaseUrl,
) -> Result<Json<ApiResponse<Vec<MovieCard>>>, ApiError> {
    let cards = state.library_service().may_like(current.id(), &base).await?;
    let message = if cards.is_empty() {
        "No recommendations available"
    } else {
        "Recommendations retrieved successfully"
    };
    Ok(Json(ApiResponse::with_message(message, cards)))
}

/// POST /addMovieList
pub async fn add_to_list(
    State(state): State<Arc<AppState>>,
    current: CurrentUser,
    params: Params,
) -> Result<Json<ApiResponse<Changed>>, ApiError> {
    let added = state
        .library_service()
        .add_to_list(current.id(), params.integer(MOVIE_ID)?)
        .await?;
    Ok(changed(
        added,
        "Movie added to list successfully",
        "Movie already in your list",
    ))
}

/// POST /removeMovieList
pub async fn remove_from_list(
    State(state): State<Arc<AppState>>,
    current: CurrentUser,
    params: Params,
) -> Result<Json<ApiResponse<Changed>>, ApiError> {
    let removed = state
        .library_service()
        .remove_from_list(current.id(), params.integer(MOVIE_ID)?)
        .await?;
    Ok(changed(
        removed,
        "Movie removed from list successfully",
        "Movie not found in your list",
    ))
}

/// POST /addMovieFav
pub async fn add_favorite(
    State(state): State<Arc<AppState>>,
    current: CurrentUser,
    params: Params,
) -> Result<Json<ApiResponse<Changed>>, ApiError> {
    let added = state
        .library_service()
        .add_favorite(current.id(), params.integer(MOVIE_ID)?)
        .await?;
    Ok(changed(
        added,
        "Movie added to favorites successfully",
        "Movie already in your favorites",
    ))
}

/// POST /removeMovieFav
pub async fn remove_favorite(
    State(state): State<Arc<AppState>>,
    current: CurrentUser,
    params: Params,
) -> Result<Json<ApiResponse<Changed>>, ApiError> {
    let removed = state
        .library_service()
        .remove_favorite(current.id(), params.integer(MOVIE_ID)?)
        .await?;
    Ok(changed(
        removed,
        "Movie removed from favorites successfully",
        "Movie not found in your favorites",
    ))
}

/// GET|POST /checkList
pub async fn check_list(
    State(state): State<Arc<AppState>>,
    current: CurrentUser,
    params: Params,
) -> Result<Json<ApiResponse<u8>>, ApiError> {
    let present = state
        .library_service()
        .check_list(current.id(), params.integer(MOVIE_ID)?)
        .await?;
    Ok(Json(ApiResponse::success(u8::from(present))))
}

/// GET|POST /checkFav
pub async fn check_favorite(
    State(state): State<Arc<AppState>>,
    current: CurrentUser,
    params: Params,
) -> Result<Json<ApiResponse<u8>>, ApiError> {
    let present = state
        .library_service()
        .check_favorite(current.id(), params.integer(MOVIE_ID)?)
        .await?;
    Ok(Json(ApiResponse::success(u8::from(present))))
}
