//! `SeaORM` implementation of the `AdminService` trait.

use async_trait::async_trait;
use tracing::info;

use crate::config::CatalogConfig;
use crate::db::{Store, User};
use crate::domain::{ContentType, STATUS_ACTIVE, STATUS_INACTIVE, UserId};
use crate::entities::{attachments, banner, episode, genres, movies, season};
use crate::models::Page;
use crate::models::catalog::{
    AttachmentInput, BannerInput, CatalogCounts, EpisodeInput, GenreInput, MovieFilter,
    MovieInput, SeasonInput, UserFlagsUpdate,
};
use crate::services::admin_service::{AdminError, AdminService};
use crate::services::validation::{self, FieldErrors};

const NAME_MAX: usize = 255;
const SERIES_PICKER_LIMIT: u64 = 10;

pub struct SeaOrmAdminService {
    store: Store,
    config: CatalogConfig,
}

impl SeaOrmAdminService {
    #[must_use]
    pub const fn new(store: Store, config: CatalogConfig) -> Self {
        Self { store, config }
    }

    fn check_status(errors: &mut FieldErrors, status: i32) {
        if status != STATUS_ACTIVE && status != STATUS_INACTIVE {
            validation::invalid(errors, "status");
        }
    }

    async fn check_image(
        &self,
        errors: &mut FieldErrors,
        image: Option<i32>,
        required: bool,
    ) -> Result<(), AdminError> {
        match image {
            Some(id) => {
                if self.store.get_attachment(id).await?.is_none() {
                    validation::invalid(errors, "image");
                }
            }
            None if required => errors.add("image", "The image field is required."),
            None => {}
        }
        Ok(())
    }

    fn validate_genre(input: &GenreInput) -> Result<GenreInput, AdminError> {
        let mut errors = FieldErrors::new();
        let name = validation::required(&mut errors, "name", Some(input.name.as_str()));
        if let Some(name) = name {
            validation::length(&mut errors, "name", name, None, Some(NAME_MAX));
        }
        errors.into_result()?;

        Ok(GenreInput {
            name: name.unwrap_or_default().to_string(),
        })
    }

    /// Checks an item form and returns it normalized: trimmed text,
    /// de-duplicated genres, and no video for a series.
    async fn validate_movie(&self, input: &MovieInput) -> Result<MovieInput, AdminError> {
        let mut errors = FieldErrors::new();

        let content_type = ContentType::from_i32(input.content_type);
        if content_type.is_none() {
            validation::invalid(&mut errors, "type");
        }

        let title = validation::required(&mut errors, "title", Some(input.title.as_str()));
        if let Some(title) = title {
            validation::length(&mut errors, "title", title, None, Some(NAME_MAX));
        }

        let mut genre_ids: Vec<i32> = Vec::with_capacity(input.genre_ids.len());
        for id in &input.genre_ids {
            if !genre_ids.contains(id) {
                genre_ids.push(*id);
            }
        }
        if genre_ids.is_empty() {
            errors.add("genre_id", "The genre id field is required.");
        } else {
            let known = self.store.genre_names(&genre_ids).await?;
            if genre_ids.iter().any(|id| !known.contains_key(id)) {
                validation::invalid(&mut errors, "genre_id");
            }
        }

        let age_rating =
            validation::required(&mut errors, "age_rating", input.age_rating.as_deref());
        let language = validation::required(&mut errors, "language", input.language.as_deref());
        self.check_image(&mut errors, input.image, true).await?;

        let video = match content_type {
            Some(ContentType::Film) => {
                validation::required(&mut errors, "video", input.video.as_deref())
                    .map(str::to_string)
            }
            _ => None,
        };

        Self::check_status(&mut errors, input.status);
        errors.into_result()?;

        Ok(MovieInput {
            title: title.unwrap_or_default().to_string(),
            description: input
                .description
                .as_deref()
                .map(str::trim)
                .filter(|d| !d.is_empty())
                .map(str::to_string),
            video,
            genre_ids,
            age_rating: age_rating.map(str::to_string),
            language: language.map(str::to_string),
            ..input.clone()
        })
    }

    async fn validate_season(&self, input: &SeasonInput) -> Result<SeasonInput, AdminError> {
        let mut errors = FieldErrors::new();

        let title = validation::required(&mut errors, "title", Some(input.title.as_str()));
        if input.number_of_season < 1 {
            errors.add(
                "number_of_season",
                "The number of season must be at least 1.",
            );
        }

        match self.store.get_movie(input.movie_id).await? {
            None => validation::invalid(&mut errors, "movie_id"),
            Some(movie) if movie.content_type != ContentType::Series.as_i32() => {
                errors.add("movie_id", "Only series can have seasons.");
            }
            Some(_) => {}
        }
        errors.into_result()?;

        Ok(SeasonInput {
            title: title.unwrap_or_default().to_string(),
            ..input.clone()
        })
    }

    async fn validate_episode(&self, input: &EpisodeInput) -> Result<EpisodeInput, AdminError> {
        let mut errors = FieldErrors::new();

        let title = validation::required(&mut errors, "title", Some(input.title.as_str()));
        if self.store.get_season(input.season_id).await?.is_none() {
            validation::invalid(&mut errors, "season_id");
        }
        self.check_image(&mut errors, input.image, false).await?;
        errors.into_result()?;

        Ok(EpisodeInput {
            title: title.unwrap_or_default().to_string(),
            video: input
                .video
                .as_deref()
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(str::to_string),
            ..input.clone()
        })
    }

    async fn validate_banner(&self, input: &BannerInput) -> Result<(), AdminError> {
        let mut errors = FieldErrors::new();

        if !self.store.movie_exists(input.movie_id).await? {
            validation::invalid(&mut errors, "movie_id");
        }
        self.check_image(&mut errors, input.image, false).await?;
        Self::check_status(&mut errors, input.status);

        Ok(errors.into_result()?)
    }

    fn validate_attachment(input: &AttachmentInput) -> Result<(), AdminError> {
        let mut errors = FieldErrors::new();

        validation::required(&mut errors, "name", Some(input.name.as_str()));
        if input.size < 0 {
            errors.add("size", "The size must be at least 0.");
        }

        Ok(errors.into_result()?)
    }
}

/// Maps a `false` from a delete to [`AdminError::NotFound`].
fn found(removed: bool, what: &'static str) -> Result<(), AdminError> {
    if removed {
        Ok(())
    } else {
        Err(AdminError::NotFound(what))
    }
}

#[async_trait]
impl AdminService for SeaOrmAdminService {
    async fn dashboard(&self) -> Result<CatalogCounts, AdminError> {
        Ok(self.store.catalog_counts().await?)
    }

    async fn list_genres(&self, name: Option<&str>) -> Result<Vec<genres::Model>, AdminError> {
        Ok(self.store.list_genres(name).await?)
    }

    async fn create_genre(&self, input: &GenreInput) -> Result<genres::Model, AdminError> {
        let input = Self::validate_genre(input)?;
        let genre = self.store.create_genre(&input.name).await?;
        info!("Created genre {} ({})", genre.id, genre.name);
        Ok(genre)
    }

    async fn update_genre(
        &self,
        id: i32,
        input: &GenreInput,
    ) -> Result<genres::Model, AdminError> {
        let input = Self::validate_genre(input)?;
        self.store
            .update_genre(id, &input.name)
            .await?
            .ok_or(AdminError::NotFound("Genre"))
    }

    async fn delete_genre(&self, id: i32) -> Result<(), AdminError> {
        found(self.store.delete_genre(id).await?, "Genre")
    }

    async fn list_movies(
        &self,
        filter: &MovieFilter,
        page: u64,
    ) -> Result<Page<movies::Model>, AdminError> {
        Ok(self
            .store
            .list_movies(filter, page, self.config.per_page)
            .await?)
    }

    async fn get_movie(&self, id: i32) -> Result<movies::Model, AdminError> {
        self.store
            .get_movie(id)
            .await?
            .ok_or(AdminError::NotFound("Movie"))
    }

    async fn create_movie(
        &self,
        input: &MovieInput,
        owner: Option<UserId>,
    ) -> Result<movies::Model, AdminError> {
        let input = self.validate_movie(input).await?;
        Ok(self
            .store
            .create_movie(&input, owner.map(|u| u.value()))
            .await?)
    }

    async fn update_movie(
        &self,
        id: i32,
        input: &MovieInput,
    ) -> Result<movies::Model, AdminError> {
        if !self.store.movie_exists(id).await? {
            return Err(AdminError::NotFound("Movie"));
        }
        let input = self.validate_movie(input).await?;
        self.store
            .update_movie(id, &input)
            .await?
            .ok_or(AdminError::NotFound("Movie"))
    }

    async fn delete_movie(&self, id: i32) -> Result<(), AdminError> {
        found(self.store.delete_movie(id).await?, "Movie")
    }

    async fn list_seasons(&self, movie_id: i32) -> Result<Vec<season::Model>, AdminError> {
        Ok(self.store.list_seasons(movie_id).await?)
    }

    async fn create_season(&self, input: &SeasonInput) -> Result<season::Model, AdminError> {
        let input = self.validate_season(input).await?;
        Ok(self.store.create_season(&input).await?)
    }

    async fn update_season(
        &self,
        id: i32,
        input: &SeasonInput,
    ) -> Result<season::Model, AdminError> {
        let input = self.validate_season(input).await?;
        self.store
            .update_season(id, &input)
            .await?
            .ok_or(AdminError::NotFound("Season"))
    }

    async fn delete_season(&self, id: i32) -> Result<(), AdminError> {
        found(self.store.delete_season(id).await?, "Season")
    }

    async fn list_episodes(&self, season_id: i32) -> Result<Vec<episode::Model>, AdminError> {
        Ok(self.store.list_episodes(season_id).await?)
    }

    async fn create_episode(&self, input: &EpisodeInput) -> Result<episode::Model, AdminError> {
        let input = self.validate_episode(input).await?;
        Ok(self.store.create_episode(&input).await?)
    }

    async fn update_episode(
        &self,
        id: i32,
        input: &EpisodeInput,
    ) -> Result<episode::Model, AdminError> {
        let input = self.validate_episode(input).await?;
        self.store
            .update_episode(id, &input)
            .await?
            .ok_or(AdminError::NotFound("Episode"))
    }

    async fn delete_episode(&self, id: i32) -> Result<(), AdminError> {
        found(self.store.delete_episode(id).await?, "Episode")
    }

    async fn list_banners(&self) -> Result<Vec<banner::Model>, AdminError> {
        Ok(self.store.list_banners().await?)
    }

    async fn create_banner(&self, input: &BannerInput) -> Result<banner::Model, AdminError> {
        self.validate_banner(input).await?;
        Ok(self.store.create_banner(input).await?)
    }

    async fn update_banner(
        &self,
        id: i32,
        input: &BannerInput,
    ) -> Result<banner::Model, AdminError> {
        self.validate_banner(input).await?;
        self.store
            .update_banner(id, input)
            .await?
            .ok_or(AdminError::NotFound("Banner"))
    }

    async fn delete_banner(&self, id: i32) -> Result<(), AdminError> {
        found(self.store.delete_banner(id).await?, "Banner")
    }

    async fn create_attachment(
        &self,
        input: &AttachmentInput,
    ) -> Result<attachments::Model, AdminError> {
        Self::validate_attachment(input)?;
        Ok(self.store.create_attachment(input).await?)
    }

    async fn get_attachment(&self, id: i32) -> Result<attachments::Model, AdminError> {
        self.store
            .get_attachment(id)
            .await?
            .ok_or(AdminError::NotFound("Attachment"))
    }

    async fn delete_attachment(&self, id: i32) -> Result<(), AdminError> {
        found(self.store.delete_attachment(id).await?, "Attachment")
    }

    async fn list_users(
        &self,
        username: Option<&str>,
        page: u64,
    ) -> Result<Page<User>, AdminError> {
        Ok(self
            .store
            .list_users(username, page, self.config.per_page)
            .await?)
    }

    async fn set_user_flags(&self, id: i32, flags: UserFlagsUpdate) -> Result<User, AdminError> {
        self.store
            .set_user_flags(id, flags)
            .await?
            .ok_or(AdminError::NotFound("User"))
    }

    async fn delete_user(&self, id: i32, acting: UserId) -> Result<(), AdminError> {
        if id == acting.value() {
            return Err(AdminError::Conflict(
                "You cannot delete your own account".to_string(),
            ));
        }
        found(self.store.delete_user(id).await?, "User")
    }

    async fn search_series(&self, query: &str) -> Result<Vec<movies::Model>, AdminError> {
        Ok(self
            .store
            .search_series(query, SERIES_PICKER_LIMIT)
            .await?)
    }

    async fn series_seasons(&self, series_id: i32) -> Result<Vec<season::Model>, AdminError> {
        let series = self
            .store
            .get_movie(series_id)
            .await?
            .filter(|m| m.content_type == ContentType::Series.as_i32())
            .ok_or(AdminError::NotFound("Series"))?;

        Ok(self.store.list_seasons(series.id).await?)
    }
}
