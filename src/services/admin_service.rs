//! Domain service for content management.
//!
//! Validates editor input and writes genres, items, seasons, episodes,
//! banners, attachment records and user moderation flags.

use thiserror::Error;

use crate::db::User;
use crate::domain::UserId;
use crate::entities::{attachments, banner, episode, genres, movies, season};
use crate::models::Page;
use crate::models::catalog::{
    AttachmentInput, BannerInput, CatalogCounts, EpisodeInput, GenreInput, MovieFilter,
    MovieInput, SeasonInput, UserFlagsUpdate,
};
use crate::services::validation::FieldErrors;

#[derive(Debug, Error)]
pub enum AdminError {
    #[error("Validation failed")]
    Validation(FieldErrors),

    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("{0}")]
    Conflict(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<sea_orm::DbErr> for AdminError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<anyhow::Error> for AdminError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

impl From<FieldErrors> for AdminError {
    fn from(errors: FieldErrors) -> Self {
        Self::Validation(errors)
    }
}

/// Domain service trait for the content management endpoints.
///
/// Callers are expected to have checked that the acting user is an
/// administrator.
#[async_trait::async_trait]
pub trait AdminService: Send + Sync {
    async fn dashboard(&self) -> Result<CatalogCounts, AdminError>;

    // Genres

    async fn list_genres(&self, name: Option<&str>) -> Result<Vec<genres::Model>, AdminError>;

    async fn create_genre(&self, input: &GenreInput) -> Result<genres::Model, AdminError>;

    async fn update_genre(&self, id: i32, input: &GenreInput)
    -> Result<genres::Model, AdminError>;

    async fn delete_genre(&self, id: i32) -> Result<(), AdminError>;

    // Films and series

    async fn list_movies(
        &self,
        filter: &MovieFilter,
        page: u64,
    ) -> Result<Page<movies::Model>, AdminError>;

    async fn get_movie(&self, id: i32) -> Result<movies::Model, AdminError>;

    /// # Errors
    ///
    /// Returns [`AdminError::Validation`] when the type is unknown, a
    /// required field is blank, a genre or the poster attachment does not
    /// exist, or a film has no video.
    async fn create_movie(
        &self,
        input: &MovieInput,
        owner: Option<UserId>,
    ) -> Result<movies::Model, AdminError>;

    async fn update_movie(&self, id: i32, input: &MovieInput)
    -> Result<movies::Model, AdminError>;

    /// Removes the item with its seasons, episodes, banners and list rows.
    async fn delete_movie(&self, id: i32) -> Result<(), AdminError>;

    // Seasons and episodes

    async fn list_seasons(&self, movie_id: i32) -> Result<Vec<season::Model>, AdminError>;

    async fn create_season(&self, input: &SeasonInput) -> Result<season::Model, AdminError>;

    async fn update_season(
        &self,
        id: i32,
        input: &SeasonInput,
    ) -> Result<season::Model, AdminError>;

    async fn delete_season(&self, id: i32) -> Result<(), AdminError>;

    async fn list_episodes(&self, season_id: i32) -> Result<Vec<episode::Model>, AdminError>;

    async fn create_episode(&self, input: &EpisodeInput) -> Result<episode::Model, AdminError>;

    async fn update_episode(
        &self,
        id: i32,
        input: &EpisodeInput,
    ) -> Result<episode::Model, AdminError>;

    async fn delete_episode(&self, id: i32) -> Result<(), AdminError>;

    // Banners

    async fn list_banners(&self) -> Result<Vec<banner::Model>, AdminError>;

    async fn create_banner(&self, input: &BannerInput) -> Result<banner::Model, AdminError>;

    async fn update_banner(
        &self,
        id: i32,
        input: &BannerInput,
    ) -> Result<banner::Model, AdminError>;

    async fn delete_banner(&self, id: i32) -> Result<(), AdminError>;

    // Attachments

    async fn create_attachment(
        &self,
        input: &AttachmentInput,
    ) -> Result<attachments::Model, AdminError>;

    async fn get_attachment(&self, id: i32) -> Result<attachments::Model, AdminError>;

    async fn delete_attachment(&self, id: i32) -> Result<(), AdminError>;

    // End users

    async fn list_users(&self, username: Option<&str>, page: u64)
    -> Result<Page<User>, AdminError>;

    async fn set_user_flags(&self, id: i32, flags: UserFlagsUpdate) -> Result<User, AdminError>;

    /// # Errors
    ///
    /// Returns [`AdminError::Conflict`] when `acting` tries to delete itself.
    async fn delete_user(&self, id: i32, acting: UserId) -> Result<(), AdminError>;

    // Editor pickers

    /// Series whose title contains `query`, at most ten.
    async fn search_series(&self, query: &str) -> Result<Vec<movies::Model>, AdminError>;

    async fn series_seasons(&self, series_id: i32) -> Result<Vec<season::Model>, AdminError>;
}
