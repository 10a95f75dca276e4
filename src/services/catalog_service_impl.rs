//! `SeaORM` implementation of the `CatalogService` trait.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::SecondsFormat;
use tracing::debug;

use crate::config::CatalogConfig;
use crate::db::Store;
use crate::domain::ContentType;
use crate::entities::movies;
use crate::models::Page;
use crate::models::catalog::MovieCard;
use crate::parser::genre::parse_genre_ids;
use crate::parser::video::{VideoType, playable_video, video_type};
use crate::services::catalog_service::{
    BannerInfo, BannerMovie, CatalogError, CatalogService, EpisodeDetail, GenreInfo, MovieDetail,
    SeasonDetail, SeriesDetail, Suggestions, TrendingCard,
};
use crate::services::image::ImageService;
use crate::services::search::filter_matches;

pub struct SeaOrmCatalogService {
    store: Store,
    images: Arc<ImageService>,
    config: CatalogConfig,
}

/// Genre names of one item, in the order its ids are stored.
fn names_for(genre_csv: Option<&str>, names: &HashMap<i32, String>) -> Vec<String> {
    parse_genre_ids(genre_csv.unwrap_or_default())
        .into_iter()
        .filter_map(|id| names.get(&id).cloned())
        .collect()
}

fn video_type_of(video: Option<&String>) -> VideoType {
    video_type(video.map_or("", String::as_str))
}

impl SeaOrmCatalogService {
    #[must_use]
    pub const fn new(store: Store, images: Arc<ImageService>, config: CatalogConfig) -> Self {
        Self {
            store,
            images,
            config,
        }
    }

    async fn genre_names_for(
        &self,
        items: &[movies::Model],
    ) -> Result<HashMap<i32, String>, CatalogError> {
        let mut ids: Vec<i32> = items
            .iter()
            .flat_map(|m| parse_genre_ids(m.genre_id.as_deref().unwrap_or_default()))
            .collect();
        ids.sort_unstable();
        ids.dedup();

        Ok(self.store.genre_names(&ids).await?)
    }

    async fn cards(
        &self,
        content_type: ContentType,
        page: u64,
        genre_id: Option<i32>,
        base: &str,
    ) -> Result<Page<MovieCard>, CatalogError> {
        let page = self
            .store
            .page_active_movies(content_type, genre_id, page, self.config.per_page)
            .await?;
        let cards = self.images.movie_cards(&self.store, &page.items, base).await?;

        Ok(Page::new(cards, page.total, page.page, page.per_page))
    }

    /// Active item of `content_type` for a detail or suggestion page.
    async fn find_item(
        &self,
        id: Option<i32>,
        content_type: ContentType,
    ) -> Result<movies::Model, CatalogError> {
        let noun = match content_type {
            ContentType::Film => "Movie",
            ContentType::Series => "Series",
        };
        let id = id
            .filter(|id| *id != 0)
            .ok_or_else(|| CatalogError::MissingId(format!("{noun} ID is required")))?;

        self.store
            .get_active_movie(id, Some(content_type))
            .await?
            .ok_or_else(|| CatalogError::NotFound(format!("{noun} not found")))
    }

    async fn suggestions(
        &self,
        id: Option<i32>,
        content_type: ContentType,
        base: &str,
    ) -> Result<Suggestions, CatalogError> {
        let item = self.find_item(id, content_type).await?;
        let genre_ids = parse_genre_ids(item.genre_id.as_deref().unwrap_or_default());
        if genre_ids.is_empty() {
            return Ok(Suggestions::NoGenres);
        }

        let similar = self
            .store
            .movies_sharing_genres(
                Some(content_type),
                &genre_ids,
                &[item.id],
                self.config.suggestion_limit,
            )
            .await?;
        let cards = self.images.movie_cards(&self.store, &similar, base).await?;

        Ok(Suggestions::Found(cards))
    }
}

#[async_trait]
impl CatalogService for SeaOrmCatalogService {
    async fn trending(&self, base: &str) -> Result<Vec<TrendingCard>, CatalogError> {
        let since = chrono::Duration::try_days(self.config.trending_window_days)
            .and_then(|window| chrono::Utc::now().checked_sub_signed(window))
            .map(|t| t.to_rfc3339_opts(SecondsFormat::Secs, true));

        let mut items = self
            .store
            .trending_movies(since.as_deref(), self.config.trending_limit)
            .await?;
        if items.is_empty() && since.is_some() {
            debug!("Nothing recently updated, falling back to all active items");
            items = self
                .store
                .trending_movies(None, self.config.trending_limit)
                .await?;
        }

        let names = self.genre_names_for(&items).await?;
        let images = self
            .images
            .resolve_many(&self.store, items.iter().map(|m| m.image), base)
            .await?;

        Ok(items
            .into_iter()
            .map(|m| TrendingCard {
                id: m.id,
                image: m.image.and_then(|id| images.get(&id).cloned()),
                genre: names_for(m.genre_id.as_deref(), &names),
                title: m.title,
                description: m.description.unwrap_or_default(),
            })
            .collect())
    }

    async fn drama_cards(&self, base: &str) -> Result<Vec<MovieCard>, CatalogError> {
        let Some(genre) = self
            .store
            .find_genre_by_name(&self.config.drama_genre_name)
            .await?
        else {
            debug!(
                "Genre {:?} does not exist, drama rail is empty",
                self.config.drama_genre_name
            );
            return Ok(Vec::new());
        };

        let items = self.store.movies_with_genre(genre.id).await?;
        Ok(self.images.movie_cards(&self.store, &items, base).await?)
    }

    async fn movie_cards(
        &self,
        page: u64,
        genre_id: Option<i32>,
        base: &str,
    ) -> Result<Page<MovieCard>, CatalogError> {
        self.cards(ContentType::Film, page, genre_id, base).await
    }

    async fn series_cards(
        &self,
        page: u64,
        genre_id: Option<i32>,
        base: &str,
    ) -> Result<Page<MovieCard>, CatalogError> {
        self.cards(ContentType::Series, page, genre_id, base).await
    }

    async fn genres(&self) -> Result<Vec<GenreInfo>, CatalogError> {
        let genres = self.store.list_genres(None).await?;
        Ok(genres
            .into_iter()
            .map(|g| GenreInfo {
                id: g.id,
                name: g.name,
            })
            .collect())
    }

    async fn search(
        &self,
        query: &str,
        page: u64,
        content_type: Option<ContentType>,
        base: &str,
    ) -> Result<Page<MovieCard>, CatalogError> {
        let candidates = self.store.search_candidates(query, content_type).await?;
        let matches = filter_matches(candidates, query, self.config.search_min_ratio, |m| {
            m.title.as_str()
        });

        let page = Page::from_vec(matches, page, self.config.per_page);
        let cards = self.images.movie_cards(&self.store, &page.items, base).await?;

        Ok(Page::new(cards, page.total, page.page, page.per_page))
    }

    async fn increment_view(&self, id: Option<i32>) -> Result<i32, CatalogError> {
        let id = id
            .filter(|id| *id != 0)
            .ok_or_else(|| CatalogError::MissingId("ID is required".to_string()))?;

        self.store
            .increment_view(id)
            .await?
            .ok_or_else(|| CatalogError::NotFound("Not found".to_string()))
    }

    async fn movie_detail(&self, id: Option<i32>, base: &str) -> Result<MovieDetail, CatalogError> {
        let movie = self.find_item(id, ContentType::Film).await?;

        let names = self.genre_names_for(std::slice::from_ref(&movie)).await?;
        let image = self
            .images
            .resolve_id(&self.store, movie.image, base)
            .await?;
        let video = playable_video(movie.video.as_deref());

        Ok(MovieDetail {
            genre: names_for(movie.genre_id.as_deref(), &names),
            video_type: video_type_of(video.as_ref()),
            video,
            image,
            title: movie.title,
            description: movie.description,
            age_rating: movie.age_rating,
            lang: movie.language,
            is_sub: movie.is_subtitles,
            is_dub: movie.is_dubbed,
        })
    }

    async fn movie_suggestions(
        &self,
        id: Option<i32>,
        base: &str,
    ) -> Result<Suggestions, CatalogError> {
        self.suggestions(id, ContentType::Film, base).await
    }

    async fn series_detail(
        &self,
        id: Option<i32>,
        base: &str,
    ) -> Result<SeriesDetail, CatalogError> {
        let series = self.find_item(id, ContentType::Series).await?;

        let names = self.genre_names_for(std::slice::from_ref(&series)).await?;
        let seasons = self.store.list_seasons(series.id).await?;
        let season_ids: Vec<i32> = seasons.iter().map(|s| s.id).collect();
        let episodes = self.store.list_episodes_for_seasons(&season_ids).await?;

        let images = self
            .images
            .resolve_many(
                &self.store,
                std::iter::once(series.image).chain(episodes.iter().map(|e| e.image)),
                base,
            )
            .await?;

        let mut by_season: HashMap<i32, Vec<EpisodeDetail>> = HashMap::new();
        for episode in episodes {
            let video = playable_video(episode.video.as_deref());
            by_season
                .entry(episode.season_id)
                .or_default()
                .push(EpisodeDetail {
                    id: episode.id,
                    image: episode.image.and_then(|id| images.get(&id).cloned()),
                    video_type: video_type_of(video.as_ref()),
                    video,
                    title: episode.title,
                    description: episode.description,
                    duration: episode.duration,
                });
        }

        let seasons = seasons
            .into_iter()
            .map(|s| SeasonDetail {
                episodes: by_season.remove(&s.id).unwrap_or_default(),
                id: s.id,
                title: s.title,
                description: s.description,
                number_of_season: s.number_of_season,
            })
            .collect();

        Ok(SeriesDetail {
            genre: names_for(series.genre_id.as_deref(), &names),
            image: series.image.and_then(|id| images.get(&id).cloned()),
            title: series.title,
            description: series.description,
            age_rating: series.age_rating,
            lang: series.language,
            is_sub: series.is_subtitles,
            is_dub: series.is_dubbed,
            seasons,
        })
    }

    async fn series_suggestions(
        &self,
        id: Option<i32>,
        base: &str,
    ) -> Result<Suggestions, CatalogError> {
        self.suggestions(id, ContentType::Series, base).await
    }

    async fn banners(
        &self,
        position: Option<i32>,
        base: &str,
    ) -> Result<Vec<BannerInfo>, CatalogError> {
        let banners = self.store.list_active_banners(position).await?;

        let mut movie_ids: Vec<i32> = banners.iter().map(|b| b.movie_id).collect();
        movie_ids.sort_unstable();
        movie_ids.dedup();
        let movies: HashMap<i32, _> = self
            .store
            .get_movies_by_ids(&movie_ids)
            .await?
            .into_iter()
            .map(|m| (m.id, m))
            .collect();

        let images = self
            .images
            .resolve_many(&self.store, banners.iter().map(|b| b.image), base)
            .await?;

        Ok(banners
            .into_iter()
            .map(|b| BannerInfo {
                id: b.id,
                position: b.position,
                image: b.image.and_then(|id| images.get(&id).cloned()),
                movie: movies.get(&b.movie_id).map(|m| BannerMovie {
                    id: m.id,
                    title: m.title.clone(),
                    content_type: m.content_type,
                }),
                created_at: b.created_at,
                updated_at: b.updated_at,
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names_follow_stored_order() {
        let names = HashMap::from([
            (1, "Action".to_string()),
            (4, "Drama".to_string()),
            (9, "Horror".to_string()),
        ]);

        assert_eq!(names_for(Some("4,1"), &names), vec!["Drama", "Action"]);
        assert_eq!(names_for(Some("4,77"), &names), vec!["Drama"]);
        assert!(names_for(None, &names).is_empty());
    }
}
