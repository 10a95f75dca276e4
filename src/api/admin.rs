//! Content management endpoints under `/admin`.
//!
//! Every route here sits behind [`admin_middleware`](super::auth::admin_middleware).

use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
};
use std::sync::Arc;

use super::auth::CurrentUser;
use super::validation::{BaseUrl, Params};
use super::{
    ApiError, ApiResponse, AppState, AttachmentDto, BannerDto, EpisodeDto, GenreDto, MovieDto,
    SeasonDto, UserDto,
};
use crate::models::catalog::{
    AttachmentInput, BannerInput, CatalogCounts, EpisodeInput, GenreInput, MovieFilter,
    MovieInput, SeasonInput, UserFlagsUpdate,
};

fn created<T: serde::Serialize>(message: &str, data: T) -> impl IntoResponse {
    (
        StatusCode::CREATED,
        Json(ApiResponse::with_message(message, data)),
    )
}

fn deleted(what: &str) -> Json<ApiResponse<()>> {
    Json(ApiResponse::message(format!("{what} deleted successfully")))
}

fn dtos<M, D: From<M>>(models: Vec<M>) -> Vec<D> {
    models.into_iter().map(D::from).collect()
}

#[derive(Debug, serde::Serialize)]
pub struct Dashboard {
    #[serde(flatten)]
    pub counts: CatalogCounts,
    pub uptime_seconds: u64,
}

/// GET /admin/dashboard
pub async fn dashboard(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<Dashboard>>, ApiError> {
    let counts = state.admin_service().dashboard().await?;
    Ok(Json(ApiResponse::success(Dashboard {
        counts,
        uptime_seconds: state.start_time.elapsed().as_secs(),
    })))
}

// ============================================================================
// Genres
// ============================================================================

/// GET /admin/genres
pub async fn list_genres(
    State(state): State<Arc<AppState>>,
    params: Params,
) -> Result<Json<ApiResponse<Vec<GenreDto>>>, ApiError> {
    let name = params.text("name");
    let genres = state
        .admin_service()
        .list_genres(name.as_deref().map(str::trim).filter(|n| !n.is_empty()))
        .await?;
    Ok(Json(ApiResponse::success(dtos(genres))))
}

/// POST /admin/genres
pub async fn create_genre(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<GenreInput>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(input) = payload?;
    let genre = state.admin_service().create_genre(&input).await?;
    tracing::info!(genre_id = genre.id, "Genre created");
    Ok(created("Genre created successfully", GenreDto::from(genre)))
}

/// PUT /admin/genres/{id}
pub async fn update_genre(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
    payload: Result<Json<GenreInput>, JsonRejection>,
) -> Result<Json<ApiResponse<GenreDto>>, ApiError> {
    let Json(input) = payload?;
    let genre = state.admin_service().update_genre(id, &input).await?;
    Ok(Json(ApiResponse::with_message(
        "Genre updated successfully",
        genre.into(),
    )))
}

/// DELETE /admin/genres/{id}
pub async fn delete_genre(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    state.admin_service().delete_genre(id).await?;
    Ok(deleted("Genre"))
}

// ============================================================================
// Films and series
// ============================================================================

/// GET /admin/movies
pub async fn list_movies(
    State(state): State<Arc<AppState>>,
    params: Params,
) -> Result<Json<ApiResponse<Vec<MovieDto>>>, ApiError> {
    let filter = MovieFilter {
        title: params.text("title").filter(|t| !t.trim().is_empty()),
        content_type: params.integer("type")?,
        status: params.integer("status")?,
        genre_id: params.integer("genre_id")?,
        language: params.text("language").filter(|l| !l.trim().is_empty()),
    };

    let page = state
        .admin_service()
        .list_movies(&filter, params.page())
        .await?;
    Ok(Json(ApiResponse::page(
        "Movies retrieved successfully",
        page.map(MovieDto::from),
    )))
}

/// GET /admin/movies/{id}
pub async fn get_movie(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<MovieDto>>, ApiError> {
    let movie = state.admin_service().get_movie(id).await?;
    Ok(Json(ApiResponse::success(movie.into())))
}

/// POST /admin/movies
pub async fn create_movie(
    State(state): State<Arc<AppState>>,
    current: CurrentUser,
    payload: Result<Json<MovieInput>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(input) = payload?;
    let movie = state
        .admin_service()
        .create_movie(&input, Some(current.id()))
        .await?;
    tracing::info!(movie_id = movie.id, title = %movie.title, "Catalog item created");
    Ok(created("Movie created successfully", MovieDto::from(movie)))
}

/// PUT /admin/movies/{id}
pub async fn update_movie(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
    payload: Result<Json<MovieInput>, JsonRejection>,
) -> Result<Json<ApiResponse<MovieDto>>, ApiError> {
    let Json(input) = payload?;
    let movie = state.admin_service().update_movie(id, &input).await?;
    Ok(Json(ApiResponse::with_message(
        "Movie updated successfully",
        movie.into(),
    )))
}

/// DELETE /admin/movies/{id}
pub async fn delete_movie(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    state.admin_service().delete_movie(id).await?;
    tracing::info!(movie_id = id, "Catalog item deleted");
    Ok(deleted("Movie"))
}

// ============================================================================
// Seasons and episodes
// ============================================================================

/// GET /admin/movies/{id}/seasons
pub async fn list_seasons(
    State(state): State<Arc<AppState>>,
    Path(movie_id): Path<i32>,
) -> Result<Json<ApiResponse<Vec<SeasonDto>>>, ApiError> {
    let seasons = state.admin_service().list_seasons(movie_id).await?;
    Ok(Json(ApiResponse::success(dtos(seasons))))
}

/// POST /admin/seasons
pub async fn create_season(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<SeasonInput>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(input) = payload?;
    let season = state.admin_service().create_season(&input).await?;
    Ok(created("Season created successfully", SeasonDto::from(season)))
}

/// PUT /admin/seasons/{id}
pub async fn update_season(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
    payload: Result<Json<SeasonInput>, JsonRejection>,
) -> Result<Json<ApiResponse<SeasonDto>>, ApiError> {
    let Json(input) = payload?;
    let season = state.admin_service().update_season(id, &input).await?;
    Ok(Json(ApiResponse::with_message(
        "Season updated successfully",
        season.into(),
    )))
}

/// DELETE /admin/seasons/{id}
pub async fn delete_season(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    state.admin_service().delete_season(id).await?;
    Ok(deleted("Season"))
}

/// GET /admin/seasons/{id}/episodes
pub async fn list_episodes(
    State(state): State<Arc<AppState>>,
    Path(season_id): Path<i32>,
) -> Result<Json<ApiResponse<Vec<EpisodeDto>>>, ApiError> {
    let episodes = state.admin_service().list_episodes(season_id).await?;
    Ok(Json(ApiResponse::success(dtos(episodes))))
}

/// POST /admin/episodes
pub async fn create_episode(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<EpisodeInput>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(input) = payload?;
    let episode = state.admin_service().create_episode(&input).await?;
    Ok(created(
        "Episode created successfully",
        EpisodeDto::from(episode),
    ))
}

/// PUT /admin/episodes/{id}
pub async fn update_episode(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
    payload: Result<Json<EpisodeInput>, JsonRejection>,
) -> Result<Json<ApiResponse<EpisodeDto>>, ApiError> {
    let Json(input) = payload?;
    let episode = state.admin_service().update_episode(id, &input).await?;
    Ok(Json(ApiResponse::with_message(
        "Episode updated successfully",
        episode.into(),
    )))
}

/// DELETE /admin/episodes/{id}
pub async fn delete_episode(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    state.admin_service().delete_episode(id).await?;
    Ok(deleted("Episode"))
}

// ============================================================================
// Banners
// ============================================================================

/// GET /admin/banners
pub async fn list_banners(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<Vec<BannerDto>>>, ApiError> {
    let banners = state.admin_service().list_banners().await?;
    Ok(Json(ApiResponse::success(dtos(banners))))
}

/// POST /admin/banners
pub async fn create_banner(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<BannerInput>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(input) = payload?;
    let banner = state.admin_service().create_banner(&input).await?;
    Ok(created("Banner created successfully", BannerDto::from(banner)))
}

/// PUT /admin/banners/{id}
pub async fn update_banner(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
    payload: Result<Json<BannerInput>, JsonRejection>,
) -> Result<Json<ApiResponse<BannerDto>>, ApiError> {
    let Json(input) = payload?;
    let banner = state.admin_service().update_banner(id, &input).await?;
    Ok(Json(ApiResponse::with_message(
        "Banner updated successfully",
        banner.into(),
    )))
}

/// DELETE /admin/banners/{id}
pub async fn delete_banner(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    state.admin_service().delete_banner(id).await?;
    Ok(deleted("Banner"))
}

// ============================================================================
// Attachments
// ============================================================================

/// POST /admin/attachments
///
/// Registers a file that already sits on a storage disk.
pub async fn create_attachment(
    State(state): State<Arc<AppState>>,
    BaseUrl(base): BaseUrl,
    payload: Result<Json<AttachmentInput>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(input) = payload?;
    let attachment = state.admin_service().create_attachment(&input).await?;
    let url = state.image_service().resolve(&attachment, &base);
    Ok(created(
        "Attachment registered successfully",
        AttachmentDto::new(attachment, url),
    ))
}

/// GET /admin/attachments/{id}
pub async fn get_attachment(
    State(state): State<Arc<AppState>>,
    BaseUrl(base): BaseUrl,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<AttachmentDto>>, ApiError> {
    let attachment = state.admin_service().get_attachment(id).await?;
    let url = state.image_service().resolve(&attachment, &base);
    Ok(Json(ApiResponse::success(AttachmentDto::new(attachment, url))))
}

/// DELETE /admin/attachments/{id}
pub async fn delete_attachment(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    state.admin_service().delete_attachment(id).await?;
    Ok(deleted("Attachment"))
}

// ============================================================================
// End users
// ============================================================================

/// GET /admin/users
pub async fn list_users(
    State(state): State<Arc<AppState>>,
    params: Params,
) -> Result<Json<ApiResponse<Vec<UserDto>>>, ApiError> {
    let username = params.text("username");
    let page = state
        .admin_service()
        .list_users(
            username.as_deref().map(str::trim).filter(|u| !u.is_empty()),
            params.page(),
        )
        .await?;
    Ok(Json(ApiResponse::page(
        "Users retrieved successfully",
        page.map(UserDto::from),
    )))
}

/// PUT /admin/users/{id}/flags
pub async fn set_user_flags(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
    payload: Result<Json<UserFlagsUpdate>, JsonRejection>,
) -> Result<Json<ApiResponse<UserDto>>, ApiError> {
    let Json(flags) = payload?;
    let user = state.admin_service().set_user_flags(id, flags).await?;
    tracing::info!(user_id = id, ?flags, "User flags updated");
    Ok(Json(ApiResponse::with_message(
        "User updated successfully",
        user.into(),
    )))
}

/// DELETE /admin/users/{id}
pub async fn delete_user(
    State(state): State<Arc<AppState>>,
    current: CurrentUser,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    state.admin_service().delete_user(id, current.id()).await?;
    tracing::info!(user_id = id, "User deleted");
    Ok(deleted("User"))
}

// ============================================================================
// Editor pickers
// ============================================================================

/// GET /admin/series/search?q=
pub async fn search_series(
    State(state): State<Arc<AppState>>,
    params: Params,
) -> Result<Json<ApiResponse<Vec<MovieDto>>>, ApiError> {
    let query = params.first_text(&["q", "title"]).unwrap_or_default();
    let series = state.admin_service().search_series(query.trim()).await?;
    Ok(Json(ApiResponse::success(dtos(series))))
}

/// GET /admin/series/{id}/seasons
pub async fn series_seasons(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<Vec<SeasonDto>>>, ApiError> {
    let seasons = state.admin_service().series_seasons(id).await?;
    Ok(Json(ApiResponse::success(dtos(seasons))))
}
