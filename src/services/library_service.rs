//! Domain service for per-user lists and favorites.

use thiserror::Error;

use crate::domain::UserId;
use crate::models::catalog::MovieCard;
use crate::services::validation::FieldErrors;

#[derive(Debug, Error)]
pub enum LibraryError {
    #[error("Validation failed")]
    Validation(FieldErrors),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<sea_orm::DbErr> for LibraryError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<anyhow::Error> for LibraryError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

/// Domain service trait for the "My list" and favorites collections.
///
/// Every mutating call is idempotent and reports whether it changed
/// anything. `movie_id` must name an existing item.
#[async_trait::async_trait]
pub trait LibraryService: Send + Sync {
    async fn add_to_list(&self, user: UserId, movie_id: Option<i32>) -> Result<bool, LibraryError>;

    async fn remove_from_list(
        &self,
        user: UserId,
        movie_id: Option<i32>,
    ) -> Result<bool, LibraryError>;

    async fn check_list(&self, user: UserId, movie_id: Option<i32>) -> Result<bool, LibraryError>;

    async fn add_favorite(&self, user: UserId, movie_id: Option<i32>)
    -> Result<bool, LibraryError>;

    async fn remove_favorite(
        &self,
        user: UserId,
        movie_id: Option<i32>,
    ) -> Result<bool, LibraryError>;

    async fn check_favorite(
        &self,
        user: UserId,
        movie_id: Option<i32>,
    ) -> Result<bool, LibraryError>;

    /// Active items in the user's list, most recently added first.
    async fn my_list(&self, user: UserId, base: &str) -> Result<Vec<MovieCard>, LibraryError>;

    /// Active items sharing a genre with the user's favorites, excluding the
    /// favorites themselves. Empty when there is nothing to go on.
    async fn may_like(&self, user: UserId, base: &str) -> Result<Vec<MovieCard>, LibraryError>;
}
