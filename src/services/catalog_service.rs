//! Domain service for the public catalog.
//!
//! Listing rails, search, detail pages, suggestions and home banners. Every
//! image is resolved to an absolute URL against the caller's base URL.

use serde::Serialize;
use thiserror::Error;

use crate::domain::ContentType;
use crate::models::Page;
use crate::models::catalog::MovieCard;
use crate::parser::video::VideoType;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("{0}")]
    MissingId(String),

    #[error("{0}")]
    NotFound(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<sea_orm::DbErr> for CatalogError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<anyhow::Error> for CatalogError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

/// Card on the trending rail, richer than a [`MovieCard`].
#[derive(Debug, Clone, Serialize)]
pub struct TrendingCard {
    pub id: i32,
    pub title: String,
    pub description: String,
    pub image: Option<String>,
    pub genre: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GenreInfo {
    pub id: i32,
    pub name: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct MovieDetail {
    pub title: String,
    pub description: Option<String>,
    pub image: Option<String>,
    pub video: Option<String>,
    pub video_type: VideoType,
    pub genre: Vec<String>,
    pub age_rating: Option<String>,
    pub lang: Option<String>,
    pub is_sub: bool,
    pub is_dub: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct EpisodeDetail {
    pub id: i32,
    pub title: String,
    pub description: Option<String>,
    pub image: Option<String>,
    pub video: Option<String>,
    pub video_type: VideoType,
    pub duration: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SeasonDetail {
    pub id: i32,
    pub title: String,
    pub description: Option<String>,
    pub number_of_season: i32,
    pub episodes: Vec<EpisodeDetail>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SeriesDetail {
    pub title: String,
    pub description: Option<String>,
    pub image: Option<String>,
    pub genre: Vec<String>,
    pub age_rating: Option<String>,
    pub lang: Option<String>,
    pub is_sub: bool,
    pub is_dub: bool,
    pub seasons: Vec<SeasonDetail>,
}

/// Items "you may also like" for one detail page.
#[derive(Debug, Clone)]
pub enum Suggestions {
    /// The source item carries no genres, so nothing can be matched.
    NoGenres,
    Found(Vec<MovieCard>),
}

#[derive(Debug, Clone, Serialize)]
pub struct BannerMovie {
    pub id: i32,
    pub title: String,
    #[serde(rename = "type")]
    pub content_type: i32,
}

#[derive(Debug, Clone, Serialize)]
pub struct BannerInfo {
    pub id: i32,
    pub position: i32,
    pub image: Option<String>,
    pub movie: Option<BannerMovie>,
    pub created_at: String,
    pub updated_at: String,
}

/// Domain service trait for browsing the catalog.
#[async_trait::async_trait]
pub trait CatalogService: Send + Sync {
    /// Most viewed items touched within the trending window, or across the
    /// whole catalog when the window is empty.
    async fn trending(&self, base: &str) -> Result<Vec<TrendingCard>, CatalogError>;

    async fn drama_cards(&self, base: &str) -> Result<Vec<MovieCard>, CatalogError>;

    async fn movie_cards(
        &self,
        page: u64,
        genre_id: Option<i32>,
        base: &str,
    ) -> Result<Page<MovieCard>, CatalogError>;

    async fn series_cards(
        &self,
        page: u64,
        genre_id: Option<i32>,
        base: &str,
    ) -> Result<Page<MovieCard>, CatalogError>;

    async fn genres(&self) -> Result<Vec<GenreInfo>, CatalogError>;

    /// Substring search filtered by the query/title length ratio.
    async fn search(
        &self,
        query: &str,
        page: u64,
        content_type: Option<ContentType>,
        base: &str,
    ) -> Result<Page<MovieCard>, CatalogError>;

    /// Returns the new view count.
    ///
    /// # Errors
    ///
    /// [`CatalogError::MissingId`] without an id, [`CatalogError::NotFound`]
    /// when no active item has it.
    async fn increment_view(&self, id: Option<i32>) -> Result<i32, CatalogError>;

    async fn movie_detail(&self, id: Option<i32>, base: &str) -> Result<MovieDetail, CatalogError>;

    async fn movie_suggestions(
        &self,
        id: Option<i32>,
        base: &str,
    ) -> Result<Suggestions, CatalogError>;

    async fn series_detail(&self, id: Option<i32>, base: &str)
    -> Result<SeriesDetail, CatalogError>;

    async fn series_suggestions(
        &self,
        id: Option<i32>,
        base: &str,
    ) -> Result<Suggestions, CatalogError>;

    async fn banners(
        &self,
        position: Option<i32>,
        base: &str,
    ) -> Result<Vec<BannerInfo>, CatalogError>;
}
