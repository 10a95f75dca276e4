//! `SeaORM` implementation of the `LibraryService` trait.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use crate::config::CatalogConfig;
use crate::db::Store;
use crate::domain::UserId;
use crate::models::catalog::MovieCard;
use crate::parser::genre::parse_genre_ids;
use crate::services::image::ImageService;
use crate::services::library_service::{LibraryError, LibraryService};
use crate::services::validation::{self, FieldErrors};

const MOVIE_ID: &str = "movie_id";

pub struct SeaOrmLibraryService {
    store: Store,
    images: Arc<ImageService>,
    config: CatalogConfig,
}

impl SeaOrmLibraryService {
    #[must_use]
    pub const fn new(store: Store, images: Arc<ImageService>, config: CatalogConfig) -> Self {
        Self {
            store,
            images,
            config,
        }
    }

    /// The referenced item must exist, whatever its status.
    async fn existing_movie(&self, movie_id: Option<i32>) -> Result<i32, LibraryError> {
        let Some(id) = movie_id else {
            return Err(LibraryError::Validation(FieldErrors::single(
                MOVIE_ID,
                "The movie id field is required.",
            )));
        };

        if !self.store.movie_exists(id).await? {
            let mut errors = FieldErrors::new();
            validation::invalid(&mut errors, MOVIE_ID);
            return Err(LibraryError::Validation(errors));
        }
        Ok(id)
    }
}

#[async_trait]
impl LibraryService for SeaOrmLibraryService {
    async fn add_to_list(&self, user: UserId, movie_id: Option<i32>) -> Result<bool, LibraryError> {
        let movie_id = self.existing_movie(movie_id).await?;
        let added = self.store.add_to_list(user.value(), movie_id).await?;
        debug!(user = %user, movie_id, added, "List add");
        Ok(added)
    }

    async fn remove_from_list(
        &self,
        user: UserId,
        movie_id: Option<i32>,
    ) -> Result<bool, LibraryError> {
        let movie_id = self.existing_movie(movie_id).await?;
        Ok(self.store.remove_from_list(user.value(), movie_id).await?)
    }

    async fn check_list(&self, user: UserId, movie_id: Option<i32>) -> Result<bool, LibraryError> {
        let movie_id = self.existing_movie(movie_id).await?;
        Ok(self.store.in_list(user.value(), movie_id).await?)
    }

    async fn add_favorite(
        &self,
        user: UserId,
        movie_id: Option<i32>,
    ) -> Result<bool, LibraryError> {
        let movie_id = self.existing_movie(movie_id).await?;
        let added = self.store.add_favorite(user.value(), movie_id).await?;
        debug!(user = %user, movie_id, added, "Favorite add");
        Ok(added)
    }

    async fn remove_favorite(
        &self,
        user: UserId,
        movie_id: Option<i32>,
    ) -> Result<bool, LibraryError> {
        let movie_id = self.existing_movie(movie_id).await?;
        Ok(self.store.remove_favorite(user.value(), movie_id).await?)
    }

    async fn check_favorite(
        &self,
        user: UserId,
        movie_id: Option<i32>,
    ) -> Result<bool, LibraryError> {
        let movie_id = self.existing_movie(movie_id).await?;
        Ok(self.store.is_favorite(user.value(), movie_id).await?)
    }

    async fn my_list(&self, user: UserId, base: &str) -> Result<Vec<MovieCard>, LibraryError> {
        let ids = self.store.list_movie_ids(user.value()).await?;
        let found = self.store.get_active_movies_by_ids(&ids).await?;

        // Restore list order, which the IN query does not keep.
        let mut by_id: HashMap<i32, _> = found.into_iter().map(|m| (m.id, m)).collect();
        let ordered: Vec<_> = ids.iter().filter_map(|id| by_id.remove(id)).collect();

        Ok(self.images.movie_cards(&self.store, &ordered, base).await?)
    }

    async fn may_like(&self, user: UserId, base: &str) -> Result<Vec<MovieCard>, LibraryError> {
        let favorite_ids = self.store.favorite_movie_ids(user.value()).await?;
        if favorite_ids.is_empty() {
            return Ok(Vec::new());
        }

        let favorites = self.store.get_active_movies_by_ids(&favorite_ids).await?;
        let mut genre_ids = Vec::new();
        for movie in &favorites {
            for id in parse_genre_ids(movie.genre_id.as_deref().unwrap_or_default()) {
                if !genre_ids.contains(&id) {
                    genre_ids.push(id);
                }
            }
        }
        if genre_ids.is_empty() {
            return Ok(Vec::new());
        }

        let items = self
            .store
            .movies_sharing_genres(
                None,
                &genre_ids,
                &favorite_ids,
                self.config.recommendation_limit,
            )
            .await?;

        Ok(self.images.movie_cards(&self.store, &items, base).await?)
    }
}
