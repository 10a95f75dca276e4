use anyhow::Result;
use chrono::SecondsFormat;
use sea_orm::{
    ConnectOptions, ConnectionTrait, Database, DatabaseConnection, DbErr, Paginator, SelectorTrait,
};
use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;
use tracing::info;

use crate::config::SecurityConfig;
use crate::domain::ContentType;
use crate::entities::{attachments, banner, episode, genres, movies, season};
use crate::models::Page;
use crate::models::page::page_offset;
use crate::models::catalog::{
    AttachmentInput, BannerInput, CatalogCounts, EpisodeInput, MovieFilter, MovieInput,
    SeasonInput, UserFlagsUpdate,
};

pub mod migrator;
pub mod repositories;

pub use repositories::user::{NewUser, User};

/// Current UTC time as an RFC 3339 string with second precision.
///
/// Every timestamp column uses this format so that lexical order equals
/// chronological order.
#[must_use]
pub fn now_timestamp() -> String {
    chrono::Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Counts the rows behind `paginator` and fetches the 1-based `page`.
///
/// Pages past the last row come back empty without a second query.
pub(crate) async fn fetch_page<'db, C, S>(
    paginator: Paginator<'db, C, S>,
    page: u64,
    per_page: u64,
) -> Result<Page<S::Item>, DbErr>
where
    C: ConnectionTrait,
    S: SelectorTrait + 'db,
{
    let total = paginator.num_items().await?;
    let items = match page_offset(page, per_page) {
        Some(offset) if offset < total => paginator.fetch_page(page.max(1) - 1).await?,
        _ => Vec::new(),
    };
    Ok(Page::new(items, total, page, per_page))
}

#[derive(Clone)]
pub struct Store {
    pub conn: DatabaseConnection,
}

impl Store {
    pub async fn new(db_url: &str) -> Result<Self> {
        Self::with_pool_options(db_url, 5, 1).await
    }

    pub async fn with_pool_options(
        db_url: &str,
        max_connections: u32,
        min_connections: u32,
    ) -> Result<Self> {
        use sea_orm_migration::MigratorTrait;

        let in_memory = db_url.contains(":memory:");
        if !in_memory {
            let path_str = db_url
                .trim_start_matches("sqlite://")
                .trim_start_matches("sqlite:");
            let path_str = path_str.split('?').next().unwrap_or(path_str);
            if let Some(parent) = Path::new(path_str).parent() {
                tokio::fs::create_dir_all(parent).await.ok();
            }
            if !Path::new(path_str).exists() {
                std::fs::File::create(path_str)?;
            }
        }

        // Every connection to an in-memory database sees its own empty schema
        let (max_connections, min_connections) = if in_memory {
            (1, 1)
        } else {
            (max_connections, min_connections.min(max_connections))
        };

        let mut opt = ConnectOptions::new(db_url.to_string());
        opt.max_connections(max_connections)
            .min_connections(min_connections)
            .connect_timeout(Duration::from_secs(10))
            .acquire_timeout(Duration::from_secs(10))
            .idle_timeout(Duration::from_secs(300))
            .sqlx_logging(false);
        if !in_memory {
            opt.max_lifetime(Duration::from_secs(600));
        }

        let conn = Database::connect(opt).await?;

        migrator::Migrator::up(&conn, None).await?;

        info!(
            "Database connected & migrations applied (pool: {}-{})",
            min_connections, max_connections
        );

        Ok(Self { conn })
    }

    fn movie_repo(&self) -> repositories::movie::MovieRepository {
        repositories::movie::MovieRepository::new(self.conn.clone())
    }

    fn genre_repo(&self) -> repositories::genre::GenreRepository {
        repositories::genre::GenreRepository::new(self.conn.clone())
    }

    fn season_repo(&self) -> repositories::season::SeasonRepository {
        repositories::season::SeasonRepository::new(self.conn.clone())
    }

    fn episode_repo(&self) -> repositories::episode::EpisodeRepository {
        repositories::episode::EpisodeRepository::new(self.conn.clone())
    }

    fn banner_repo(&self) -> repositories::banner::BannerRepository {
        repositories::banner::BannerRepository::new(self.conn.clone())
    }

    fn attachment_repo(&self) -> repositories::attachment::AttachmentRepository {
        repositories::attachment::AttachmentRepository::new(self.conn.clone())
    }

    fn user_repo(&self) -> repositories::user::UserRepository {
        repositories::user::UserRepository::new(self.conn.clone())
    }

    fn token_repo(&self) -> repositories::token::TokenRepository {
        repositories::token::TokenRepository::new(self.conn.clone())
    }

    fn library_repo(&self) -> repositories::library::LibraryRepository {
        repositories::library::LibraryRepository::new(self.conn.clone())
    }

    // Movies and series

    pub async fn get_movie(&self, id: i32) -> Result<Option<movies::Model>> {
        self.movie_repo().get(id).await
    }

    pub async fn get_active_movie(
        &self,
        id: i32,
        content_type: Option<ContentType>,
    ) -> Result<Option<movies::Model>> {
        self.movie_repo().get_active(id, content_type).await
    }

    pub async fn get_movies_by_ids(&self, ids: &[i32]) -> Result<Vec<movies::Model>> {
        self.movie_repo().get_by_ids(ids).await
    }

    pub async fn get_active_movies_by_ids(&self, ids: &[i32]) -> Result<Vec<movies::Model>> {
        self.movie_repo().get_active_by_ids(ids).await
    }

    pub async fn movie_exists(&self, id: i32) -> Result<bool> {
        self.movie_repo().exists(id).await
    }

    pub async fn trending_movies(
        &self,
        since: Option<&str>,
        limit: u64,
    ) -> Result<Vec<movies::Model>> {
        self.movie_repo().trending(since, limit).await
    }

    pub async fn movies_with_genre(&self, genre_id: i32) -> Result<Vec<movies::Model>> {
        self.movie_repo().with_genre(genre_id).await
    }

    pub async fn page_active_movies(
        &self,
        content_type: ContentType,
        genre_id: Option<i32>,
        page: u64,
        per_page: u64,
    ) -> Result<Page<movies::Model>> {
        self.movie_repo()
            .page_active(content_type, genre_id, page, per_page)
            .await
    }

    pub async fn search_candidates(
        &self,
        query: &str,
        content_type: Option<ContentType>,
    ) -> Result<Vec<movies::Model>> {
        self.movie_repo()
            .search_candidates(query, content_type)
            .await
    }

    pub async fn movies_sharing_genres(
        &self,
        content_type: Option<ContentType>,
        genre_ids: &[i32],
        exclude: &[i32],
        limit: u64,
    ) -> Result<Vec<movies::Model>> {
        self.movie_repo()
            .sharing_genres(content_type, genre_ids, exclude, limit)
            .await
    }

    pub async fn increment_view(&self, id: i32) -> Result<Option<i32>> {
        self.movie_repo().increment_view(id).await
    }

    pub async fn create_movie(
        &self,
        input: &MovieInput,
        owner: Option<i32>,
    ) -> Result<movies::Model> {
        self.movie_repo().create(input, owner).await
    }

    pub async fn update_movie(&self, id: i32, input: &MovieInput) -> Result<Option<movies::Model>> {
        self.movie_repo().update(id, input).await
    }

    pub async fn delete_movie(&self, id: i32) -> Result<bool> {
        self.movie_repo().delete(id).await
    }

    pub async fn list_movies(
        &self,
        filter: &MovieFilter,
        page: u64,
        per_page: u64,
    ) -> Result<Page<movies::Model>> {
        self.movie_repo().list_filtered(filter, page, per_page).await
    }

    pub async fn search_series(&self, query: &str, limit: u64) -> Result<Vec<movies::Model>> {
        self.movie_repo().search_series(query, limit).await
    }

    pub async fn catalog_counts(&self) -> Result<CatalogCounts> {
        let movies = self.movie_repo();
        Ok(CatalogCounts {
            total_movies: movies.count(None).await?,
            films: movies.count(Some(ContentType::Film)).await?,
            series: movies.count(Some(ContentType::Series)).await?,
            users: self.user_repo().count().await?,
        })
    }

    // Genres

    pub async fn list_genres(&self, name: Option<&str>) -> Result<Vec<genres::Model>> {
        self.genre_repo().list(name).await
    }

    pub async fn find_genre_by_name(&self, name: &str) -> Result<Option<genres::Model>> {
        self.genre_repo().find_by_name(name).await
    }

    pub async fn genre_names(&self, ids: &[i32]) -> Result<HashMap<i32, String>> {
        self.genre_repo().names_by_ids(ids).await
    }

    pub async fn create_genre(&self, name: &str) -> Result<genres::Model> {
        self.genre_repo().create(name).await
    }

    pub async fn update_genre(&self, id: i32, name: &str) -> Result<Option<genres::Model>> {
        self.genre_repo().update(id, name).await
    }

    pub async fn delete_genre(&self, id: i32) -> Result<bool> {
        self.genre_repo().delete(id).await
    }

    // Seasons and episodes

    pub async fn list_seasons(&self, movie_id: i32) -> Result<Vec<season::Model>> {
        self.season_repo().list_by_movie(movie_id).await
    }

    pub async fn get_season(&self, id: i32) -> Result<Option<season::Model>> {
        self.season_repo().get(id).await
    }

    pub async fn create_season(&self, input: &SeasonInput) -> Result<season::Model> {
        self.season_repo().create(input).await
    }

    pub async fn update_season(
        &self,
        id: i32,
        input: &SeasonInput,
    ) -> Result<Option<season::Model>> {
        self.season_repo().update(id, input).await
    }

    pub async fn delete_season(&self, id: i32) -> Result<bool> {
        self.season_repo().delete(id).await
    }

    pub async fn list_episodes(&self, season_id: i32) -> Result<Vec<episode::Model>> {
        self.episode_repo().list_by_season(season_id).await
    }

    pub async fn list_episodes_for_seasons(
        &self,
        season_ids: &[i32],
    ) -> Result<Vec<episode::Model>> {
        self.episode_repo().list_by_seasons(season_ids).await
    }

    pub async fn create_episode(&self, input: &EpisodeInput) -> Result<episode::Model> {
        self.episode_repo().create(input).await
    }

    pub async fn update_episode(
        &self,
        id: i32,
        input: &EpisodeInput,
    ) -> Result<Option<episode::Model>> {
        self.episode_repo().update(id, input).await
    }

    pub async fn delete_episode(&self, id: i32) -> Result<bool> {
        self.episode_repo().delete(id).await
    }

    // Banners

    pub async fn list_active_banners(&self, position: Option<i32>) -> Result<Vec<banner::Model>> {
        self.banner_repo().list_active(position).await
    }

    pub async fn list_banners(&self) -> Result<Vec<banner::Model>> {
        self.banner_repo().list_all().await
    }

    pub async fn create_banner(&self, input: &BannerInput) -> Result<banner::Model> {
        self.banner_repo().create(input).await
    }

    pub async fn update_banner(
        &self,
        id: i32,
        input: &BannerInput,
    ) -> Result<Option<banner::Model>> {
        self.banner_repo().update(id, input).await
    }

    pub async fn delete_banner(&self, id: i32) -> Result<bool> {
        self.banner_repo().delete(id).await
    }

    // Attachments

    pub async fn get_attachment(&self, id: i32) -> Result<Option<attachments::Model>> {
        self.attachment_repo().get(id).await
    }

    pub async fn get_attachments(&self, ids: &[i32]) -> Result<Vec<attachments::Model>> {
        self.attachment_repo().get_by_ids(ids).await
    }

    pub async fn create_attachment(&self, input: &AttachmentInput) -> Result<attachments::Model> {
        self.attachment_repo().create(input).await
    }

    pub async fn delete_attachment(&self, id: i32) -> Result<bool> {
        self.attachment_repo().delete(id).await
    }

    // Users and tokens

    pub async fn get_user(&self, id: i32) -> Result<Option<User>> {
        self.user_repo().get_by_id(id).await
    }

    pub async fn get_user_by_username(&self, username: &str) -> Result<Option<User>> {
        self.user_repo().get_by_username(username).await
    }

    pub async fn get_user_with_password(&self, username: &str) -> Result<Option<(User, String)>> {
        self.user_repo()
            .get_by_username_with_password(username)
            .await
    }

    pub async fn username_taken(&self, username: &str, except: Option<i32>) -> Result<bool> {
        self.user_repo().username_taken(username, except).await
    }

    pub async fn create_user(&self, new_user: NewUser<'_>, config: &SecurityConfig) -> Result<User> {
        self.user_repo().create(new_user, config).await
    }

    pub async fn verify_user_password(&self, id: i32, password: &str) -> Result<bool> {
        self.user_repo().verify_password(id, password).await
    }

    pub async fn update_user_profile(
        &self,
        id: i32,
        name: Option<&str>,
        username: Option<&str>,
    ) -> Result<Option<User>> {
        self.user_repo().update_profile(id, name, username).await
    }

    pub async fn update_user_password(
        &self,
        id: i32,
        new_password: &str,
        config: &SecurityConfig,
    ) -> Result<()> {
        self.user_repo()
            .update_password(id, new_password, config)
            .await
    }

    pub async fn list_users(
        &self,
        username: Option<&str>,
        page: u64,
        per_page: u64,
    ) -> Result<Page<User>> {
        self.user_repo().list(username, page, per_page).await
    }

    pub async fn set_user_flags(&self, id: i32, flags: UserFlagsUpdate) -> Result<Option<User>> {
        self.user_repo().set_flags(id, flags).await
    }

    pub async fn delete_user(&self, id: i32) -> Result<bool> {
        self.user_repo().delete(id).await
    }

    pub async fn issue_token(&self, user_id: i32, name: &str) -> Result<String> {
        self.token_repo().issue(user_id, name).await
    }

    pub async fn authenticate_token(&self, token: &str) -> Result<Option<User>> {
        self.token_repo().authenticate(token).await
    }

    pub async fn revoke_token(&self, token: &str) -> Result<bool> {
        self.token_repo().revoke(token).await
    }

    // Lists and favorites

    pub async fn add_to_list(&self, user_id: i32, movie_id: i32) -> Result<bool> {
        self.library_repo().add_to_list(user_id, movie_id).await
    }

    pub async fn remove_from_list(&self, user_id: i32, movie_id: i32) -> Result<bool> {
        self.library_repo().remove_from_list(user_id, movie_id).await
    }

    pub async fn in_list(&self, user_id: i32, movie_id: i32) -> Result<bool> {
        self.library_repo().in_list(user_id, movie_id).await
    }

    pub async fn list_movie_ids(&self, user_id: i32) -> Result<Vec<i32>> {
        self.library_repo().list_movie_ids(user_id).await
    }

    pub async fn add_favorite(&self, user_id: i32, movie_id: i32) -> Result<bool> {
        self.library_repo().add_favorite(user_id, movie_id).await
    }

    pub async fn remove_favorite(&self, user_id: i32, movie_id: i32) -> Result<bool> {
        self.library_repo().remove_favorite(user_id, movie_id).await
    }

    pub async fn is_favorite(&self, user_id: i32, movie_id: i32) -> Result<bool> {
        self.library_repo().is_favorite(user_id, movie_id).await
    }

    pub async fn favorite_movie_ids(&self, user_id: i32) -> Result<Vec<i32>> {
        self.library_repo().favorite_movie_ids(user_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::EntityTrait;

    async fn memory_store() -> Store {
        Store::new("sqlite::memory:").await.unwrap()
    }

    fn film(title: &str, genres: Vec<i32>) -> MovieInput {
        MovieInput {
            content_type: ContentType::Film.as_i32(),
            title: title.to_string(),
            description: None,
            image: None,
            video: Some("https://youtu.be/abc".to_string()),
            genre_ids: genres,
            age_rating: Some("PG".to_string()),
            language: Some("en".to_string()),
            is_subtitles: false,
            is_dubbed: false,
            status: crate::domain::STATUS_ACTIVE,
        }
    }

    #[test]
    fn test_timestamp_format() {
        let ts = now_timestamp();
        assert_eq!(ts.len(), "2026-01-01T00:00:00Z".len());
        assert!(ts.ends_with('Z'));
    }

    #[tokio::test]
    async fn test_migration_seeds_admin() {
        let store = memory_store().await;
        let admin = store.get_user_by_username("admin").await.unwrap().unwrap();
        assert!(admin.is_admin);
        assert!(!admin.is_ban);
        assert!(store.verify_user_password(admin.id, "password").await.unwrap());
    }

    #[tokio::test]
    async fn test_increment_view_coalesces_null() {
        let store = memory_store().await;
        let movie = store.create_movie(&film("Heat", vec![]), None).await.unwrap();

        movies::Entity::update_many()
            .col_expr(
                movies::Column::ViewCount,
                sea_orm::sea_query::Expr::value(Option::<i32>::None),
            )
            .exec(&store.conn)
            .await
            .unwrap();

        assert_eq!(store.increment_view(movie.id).await.unwrap(), Some(1));
        assert_eq!(store.increment_view(movie.id).await.unwrap(), Some(2));
        assert_eq!(store.increment_view(movie.id + 100).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_genre_filter_is_exact() {
        let store = memory_store().await;
        store.create_movie(&film("One", vec![1]), None).await.unwrap();
        let twelve = store.create_movie(&film("Twelve", vec![12]), None).await.unwrap();
        let both = store.create_movie(&film("Both", vec![3, 12]), None).await.unwrap();

        let found = store.movies_with_genre(12).await.unwrap();
        let ids: Vec<i32> = found.iter().map(|m| m.id).collect();
        assert!(ids.contains(&twelve.id));
        assert!(ids.contains(&both.id));
        assert_eq!(ids.len(), 2);
    }

    #[tokio::test]
    async fn test_list_add_is_idempotent() {
        let store = memory_store().await;
        let movie = store.create_movie(&film("Ran", vec![]), None).await.unwrap();
        let admin = store.get_user_by_username("admin").await.unwrap().unwrap();

        assert!(store.add_to_list(admin.id, movie.id).await.unwrap());
        assert!(!store.add_to_list(admin.id, movie.id).await.unwrap());
        assert_eq!(store.list_movie_ids(admin.id).await.unwrap(), vec![movie.id]);

        assert!(store.remove_from_list(admin.id, movie.id).await.unwrap());
        assert!(!store.remove_from_list(admin.id, movie.id).await.unwrap());
    }

    #[tokio::test]
    async fn test_delete_movie_cascades() {
        let store = memory_store().await;
        let mut input = film("Dark", vec![]);
        input.content_type = ContentType::Series.as_i32();
        let series = store.create_movie(&input, None).await.unwrap();

        let season = store
            .create_season(&SeasonInput {
                title: "Season 1".to_string(),
                description: None,
                number_of_season: 1,
                movie_id: series.id,
            })
            .await
            .unwrap();
        store
            .create_episode(&EpisodeInput {
                title: "Secrets".to_string(),
                description: None,
                season_id: season.id,
                video: None,
                image: None,
                duration: Some("51m".to_string()),
            })
            .await
            .unwrap();

        assert!(store.delete_movie(series.id).await.unwrap());
        assert!(store.get_season(season.id).await.unwrap().is_none());
        assert!(store.list_episodes(season.id).await.unwrap().is_empty());
    }
}
