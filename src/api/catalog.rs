use axum::{Json, extract::State};
use serde::Serialize;
use std::sync::Arc;

use super::validation::{BaseUrl, Params};
use super::{ApiError, ApiResponse, AppState};
use crate::domain::ContentType;
use crate::models::catalog::MovieCard;
use crate::services::{BannerInfo, GenreInfo, MovieDetail, SeriesDetail, Suggestions, TrendingCard};

#[derive(Debug, Serialize)]
pub struct ViewCount {
    pub view: i32,
}

/// GET /listCardsTending
pub async fn trending(
    State(state): State<Arc<AppState>>,
    BaseUrl(base): BaseUrl,
) -> Result<Json<ApiResponse<Vec<TrendingCard>>>, ApiError> {
    let cards = state.catalog_service().trending(&base).await?;
    Ok(Json(ApiResponse::with_message(
        "Trending movies retrieved successfully",
        cards,
    )))
}

/// GET /dramaListCard
pub async fn drama(
    State(state): State<Arc<AppState>>,
    BaseUrl(base): BaseUrl,
) -> Result<Json<ApiResponse<Vec<MovieCard>>>, ApiError> {
    let cards = state.catalog_service().drama_cards(&base).await?;
    Ok(Json(ApiResponse::with_message(
        "Drama movies retrieved successfully",
        cards,
    )))
}

/// GET /moviesCards
pub async fn movie_cards(
    State(state): State<Arc<AppState>>,
    BaseUrl(base): BaseUrl,
    params: Params,
) -> Result<Json<ApiResponse<Vec<MovieCard>>>, ApiError> {
    let page = state
        .catalog_service()
        .movie_cards(params.page(), params.id("genre_id"), &base)
        .await?;
    Ok(Json(ApiResponse::page("Movies retrieved successfully", page)))
}

/// GET /seriesCards
pub async fn series_cards(
    State(state): State<Arc<AppState>>,
    BaseUrl(base): BaseUrl,
    params: Params,
) -> Result<Json<ApiResponse<Vec<MovieCard>>>, ApiError> {
    let page = state
        .catalog_service()
        .series_cards(params.page(), params.id("genre_id"), &base)
        .await?;
    Ok(Json(ApiResponse::page("Series retrieved successfully", page)))
}

/// GET /moviesGenre and GET /seriesGenre
pub async fn genres(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<Vec<GenreInfo>>>, ApiError> {
    let genres = state.catalog_service().genres().await?;
    Ok(Json(ApiResponse::with_message(
        "Genres retrieved successfully",
        genres,
    )))
}

async fn search(
    state: &AppState,
    base: &str,
    params: &Params,
    content_type: Option<ContentType>,
) -> Result<Json<ApiResponse<Vec<MovieCard>>>, ApiError> {
    let query = params.first_text(&["title", "q"]).unwrap_or_default();
    let page = state
        .catalog_service()
        .search(query.trim(), params.page(), content_type, base)
        .await?;
    Ok(Json(ApiResponse::page(
        "Search results retrieved successfully",
        page,
    )))
}

/// GET /searchAll
pub async fn search_all(
    State(state): State<Arc<AppState>>,
    BaseUrl(base): BaseUrl,
    params: Params,
) -> Result<Json<ApiResponse<Vec<MovieCard>>>, ApiError> {
    search(&state, &base, &params, None).await
}

/// GET /searchMovies
pub async fn search_movies(
    State(state): State<Arc<AppState>>,
    BaseUrl(base): BaseUrl,
    params: Params,
) -> Result<Json<ApiResponse<Vec<MovieCard>>>, ApiError> {
    search(&state, &base, &params, Some(ContentType::Film)).await
}

/// GET /searchSeries
pub async fn search_series(
    State(state): State<Arc<AppState>>,
    BaseUrl(base): BaseUrl,
    params: Params,
) -> Result<Json<ApiResponse<Vec<MovieCard>>>, ApiError> {
    search(&state, &base, &params, Some(ContentType::Series)).await
}

/// POST /view
pub async fn increment_view(
    State(state): State<Arc<AppState>>,
    params: Params,
) -> Result<Json<ApiResponse<ViewCount>>, ApiError> {
    let view = state.catalog_service().increment_view(params.id("id")).await?;
    Ok(Json(ApiResponse::with_message(
        "View incremented",
        ViewCount { view },
    )))
}

/// GET|POST /moviesDetail
pub async fn movie_detail(
    State(state): State<Arc<AppState>>,
    BaseUrl(base): BaseUrl,
    params: Params,
) -> Result<Json<ApiResponse<MovieDetail>>, ApiError> {
    let detail = state
        .catalog_service()
        .movie_detail(params.id("id"), &base)
        .await?;
    Ok(Json(ApiResponse::with_message(
        "Movie details retrieved successfully",
        detail,
    )))
}

/// GET|POST /seriesDetail
pub async fn series_detail(
    State(state): State<Arc<AppState>>,
    BaseUrl(base): BaseUrl,
    params: Params,
) -> Result<Json<ApiResponse<SeriesDetail>>, ApiError> {
    let detail = state
        .catalog_service()
        .series_detail(params.id("id"), &base)
        .await?;
    Ok(Json(ApiResponse::with_message(
        "Series details retrieved successfully",
        detail,
    )))
}

fn suggestion_response(
    suggestions: Suggestions,
    found: &str,
    no_genres: &str,
) -> Json<ApiResponse<Vec<MovieCard>>> {
    match suggestions {
        Suggestions::Found(cards) => Json(ApiResponse::with_message(found, cards)),
        Suggestions::NoGenres => Json(ApiResponse::with_message(no_genres, Vec::new())),
    }
}

/// GET|POST /moviesSuggest
pub async fn movie_suggestions(
    State(state): State<Arc<AppState>>,
    BaseUrl(base): BaseUrl,
    params: Params,
) -> Result<Json<ApiResponse<Vec<MovieCard>>>, ApiError> {
    let suggestions = state
        .catalog_service()
        .movie_suggestions(params.id("id"), &base)
        .await?;
    Ok(suggestion_response(
        suggestions,
        "Suggested movies retrieved successfully",
        "No suggestions found (movie has no genres)",
    ))
}

/// GET|POST /seriesSuggest
pub async fn series_suggestions(
    State(state): State<Arc<AppState>>,
    BaseUrl(base): BaseUrl,
    params: Params,
) -> Result<Json<ApiResponse<Vec<MovieCard>>>, ApiError> {
    let suggestions = state
        .catalog_service()
        .series_suggestions(params.id("id"), &base)
        .await?;
    Ok(suggestion_response(
        suggestions,
        "Suggested series retrieved successfully",
        "No suggestions found (series has no genres)",
    ))
}

/// GET /banner
pub async fn banners(
    State(state): State<Arc<AppState>>,
    BaseUrl(base): BaseUrl,
    params: Params,
) -> Result<Json<ApiResponse<Vec<BannerInfo>>>, ApiError> {
    let position = params.integer("position")?;
    let banners = state.catalog_service().banners(position, &base).await?;
    Ok(Json(ApiResponse::with_message(
        "Banners retrieved successfully",
        banners,
    )))
}
