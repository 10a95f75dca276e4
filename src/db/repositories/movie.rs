use anyhow::{Context, Result};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Select, Set, TransactionTrait,
};
use tracing::info;

use crate::db::{fetch_page, now_timestamp};
use crate::domain::{ContentType, STATUS_ACTIVE};
use crate::entities::{
    banner, episode, movies, prelude::*, season, user_movie_likes, user_web_list,
};
use crate::models::Page;
use crate::models::catalog::{MovieFilter, MovieInput};
use crate::parser::genre::{any_genre_condition, genre_condition, join_genre_ids};

pub struct MovieRepository {
    conn: DatabaseConnection,
}

/// Active items, optionally narrowed to one content type.
fn active_items(content_type: Option<ContentType>) -> Select<Movies> {
    let query = Movies::find().filter(movies::Column::Status.eq(STATUS_ACTIVE));
    match content_type {
        Some(kind) => query.filter(movies::Column::ContentType.eq(kind.as_i32())),
        None => query,
    }
}

/// Most viewed first, most recently touched breaks ties.
fn by_popularity(query: Select<Movies>) -> Select<Movies> {
    query
        .order_by_desc(movies::Column::ViewCount)
        .order_by_desc(movies::Column::UpdatedAt)
}

impl MovieRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn get(&self, id: i32) -> Result<Option<movies::Model>> {
        Movies::find_by_id(id)
            .one(&self.conn)
            .await
            .context("Failed to query movie by ID")
    }

    pub async fn get_active(
        &self,
        id: i32,
        content_type: Option<ContentType>,
    ) -> Result<Option<movies::Model>> {
        active_items(content_type)
            .filter(movies::Column::Id.eq(id))
            .one(&self.conn)
            .await
            .context("Failed to query active movie")
    }

    /// Items among `ids` whatever their status, in no particular order.
    pub async fn get_by_ids(&self, ids: &[i32]) -> Result<Vec<movies::Model>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        Movies::find()
            .filter(movies::Column::Id.is_in(ids.iter().copied()))
            .all(&self.conn)
            .await
            .context("Failed to query movies by IDs")
    }

    /// Active items among `ids`, in no particular order.
    pub async fn get_active_by_ids(&self, ids: &[i32]) -> Result<Vec<movies::Model>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        active_items(None)
            .filter(movies::Column::Id.is_in(ids.iter().copied()))
            .all(&self.conn)
            .await
            .context("Failed to query movies by IDs")
    }

    pub async fn exists(&self, id: i32) -> Result<bool> {
        let count = Movies::find_by_id(id)
            .count(&self.conn)
            .await
            .context("Failed to check movie existence")?;
        Ok(count > 0)
    }

    /// Active items updated at or after `since` (all active items when `None`).
    pub async fn trending(&self, since: Option<&str>, limit: u64) -> Result<Vec<movies::Model>> {
        let mut query = active_items(None);
        if let Some(since) = since {
            query = query.filter(movies::Column::UpdatedAt.gte(since));
        }

        by_popularity(query)
            .limit(limit)
            .all(&self.conn)
            .await
            .context("Failed to query trending movies")
    }

    pub async fn with_genre(&self, genre_id: i32) -> Result<Vec<movies::Model>> {
        by_popularity(active_items(None).filter(genre_condition(movies::Column::GenreId, genre_id)))
            .all(&self.conn)
            .await
            .context("Failed to query movies by genre")
    }

    pub async fn page_active(
        &self,
        content_type: ContentType,
        genre_id: Option<i32>,
        page: u64,
        per_page: u64,
    ) -> Result<Page<movies::Model>> {
        let mut query = active_items(Some(content_type));
        if let Some(genre_id) = genre_id {
            query = query.filter(genre_condition(movies::Column::GenreId, genre_id));
        }

        let paginator = by_popularity(query).paginate(&self.conn, per_page.max(1));
        fetch_page(paginator, page, per_page)
            .await
            .context("Failed to fetch movie page")
    }

    /// Active items whose title contains `query`, most popular first.
    pub async fn search_candidates(
        &self,
        query: &str,
        content_type: Option<ContentType>,
    ) -> Result<Vec<movies::Model>> {
        let mut select = active_items(content_type);
        if !query.is_empty() {
            select = select.filter(movies::Column::Title.contains(query));
        }

        by_popularity(select)
            .all(&self.conn)
            .await
            .context("Failed to search movies")
    }

    /// Active items of `content_type` sharing any of `genre_ids`, except `exclude`.
    pub async fn sharing_genres(
        &self,
        content_type: Option<ContentType>,
        genre_ids: &[i32],
        exclude: &[i32],
        limit: u64,
    ) -> Result<Vec<movies::Model>> {
        if genre_ids.is_empty() {
            return Ok(Vec::new());
        }

        let mut query =
            active_items(content_type).filter(any_genre_condition(movies::Column::GenreId, genre_ids));
        if !exclude.is_empty() {
            query = query.filter(movies::Column::Id.is_not_in(exclude.iter().copied()));
        }

        by_popularity(query)
            .limit(limit)
            .all(&self.conn)
            .await
            .context("Failed to query movies sharing genres")
    }

    /// Atomically bumps the view counter of an active item and returns the new value.
    pub async fn increment_view(&self, id: i32) -> Result<Option<i32>> {
        let result = Movies::update_many()
            .col_expr(
                movies::Column::ViewCount,
                Expr::col(movies::Column::ViewCount).if_null(0).add(1),
            )
            .filter(movies::Column::Id.eq(id))
            .filter(movies::Column::Status.eq(STATUS_ACTIVE))
            .exec(&self.conn)
            .await
            .context("Failed to increment view count")?;

        if result.rows_affected == 0 {
            return Ok(None);
        }

        let views = Movies::find_by_id(id)
            .one(&self.conn)
            .await
            .context("Failed to read view count")?
            .and_then(|m| m.view_count);

        Ok(Some(views.unwrap_or_default()))
    }

    pub async fn create(&self, input: &MovieInput, owner: Option<i32>) -> Result<movies::Model> {
        let now = now_timestamp();
        let model = movies::ActiveModel {
            content_type: Set(input.content_type),
            title: Set(input.title.clone()),
            description: Set(input.description.clone()),
            image: Set(input.image),
            video: Set(input.video.clone()),
            genre_id: Set(Some(join_genre_ids(&input.genre_ids))),
            age_rating: Set(input.age_rating.clone()),
            language: Set(input.language.clone()),
            is_subtitles: Set(input.is_subtitles),
            is_dubbed: Set(input.is_dubbed),
            like_count: Set(0),
            view_count: Set(Some(0)),
            user_web_id: Set(owner),
            status: Set(input.status),
            created_at: Set(now.clone()),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&self.conn)
        .await
        .context("Failed to insert movie")?;

        info!("Created movie {} ({})", model.id, model.title);
        Ok(model)
    }

    pub async fn update(&self, id: i32, input: &MovieInput) -> Result<Option<movies::Model>> {
        let Some(existing) = Movies::find_by_id(id).one(&self.conn).await? else {
            return Ok(None);
        };

        let mut active: movies::ActiveModel = existing.into();
        active.content_type = Set(input.content_type);
        active.title = Set(input.title.clone());
        active.description = Set(input.description.clone());
        active.image = Set(input.image);
        active.video = Set(input.video.clone());
        active.genre_id = Set(Some(join_genre_ids(&input.genre_ids)));
        active.age_rating = Set(input.age_rating.clone());
        active.language = Set(input.language.clone());
        active.is_subtitles = Set(input.is_subtitles);
        active.is_dubbed = Set(input.is_dubbed);
        active.status = Set(input.status);
        active.updated_at = Set(now_timestamp());

        let model = active
            .update(&self.conn)
            .await
            .context("Failed to update movie")?;
        Ok(Some(model))
    }

    /// Deletes an item together with its seasons, episodes, banners and
    /// list/favorite rows.
    pub async fn delete(&self, id: i32) -> Result<bool> {
        let txn = self.conn.begin().await?;

        let season_ids: Vec<i32> = Season::find()
            .select_only()
            .column(season::Column::Id)
            .filter(season::Column::MovieId.eq(id))
            .into_tuple()
            .all(&txn)
            .await?;

        if !season_ids.is_empty() {
            Episode::delete_many()
                .filter(episode::Column::SeasonId.is_in(season_ids))
                .exec(&txn)
                .await?;
        }

        Season::delete_many()
            .filter(season::Column::MovieId.eq(id))
            .exec(&txn)
            .await?;
        Banner::delete_many()
            .filter(banner::Column::MovieId.eq(id))
            .exec(&txn)
            .await?;
        UserWebList::delete_many()
            .filter(user_web_list::Column::MovieId.eq(id))
            .exec(&txn)
            .await?;
        UserMovieLikes::delete_many()
            .filter(user_movie_likes::Column::MovieId.eq(id))
            .exec(&txn)
            .await?;

        let result = Movies::delete_by_id(id).exec(&txn).await?;

        txn.commit().await?;

        let removed = result.rows_affected > 0;
        if removed {
            info!("Removed movie with ID: {}", id);
        }
        Ok(removed)
    }

    pub async fn list_filtered(
        &self,
        filter: &MovieFilter,
        page: u64,
        per_page: u64,
    ) -> Result<Page<movies::Model>> {
        let mut cond = Condition::all();
        if let Some(title) = filter.title.as_deref().filter(|t| !t.trim().is_empty()) {
            cond = cond.add(movies::Column::Title.contains(title.trim()));
        }
        if let Some(kind) = filter.content_type {
            cond = cond.add(movies::Column::ContentType.eq(kind));
        }
        if let Some(status) = filter.status {
            cond = cond.add(movies::Column::Status.eq(status));
        }
        if let Some(genre_id) = filter.genre_id {
            cond = cond.add(genre_condition(movies::Column::GenreId, genre_id));
        }
        if let Some(language) = filter.language.as_deref().filter(|l| !l.trim().is_empty()) {
            cond = cond.add(movies::Column::Language.contains(language.trim()));
        }

        let paginator = Movies::find()
            .filter(cond)
            .order_by_desc(movies::Column::UpdatedAt)
            .order_by_desc(movies::Column::Id)
            .paginate(&self.conn, per_page.max(1));
        fetch_page(paginator, page, per_page)
            .await
            .context("Failed to list movies")
    }

    /// Series whose title contains `query`, for editor pickers.
    pub async fn search_series(&self, query: &str, limit: u64) -> Result<Vec<movies::Model>> {
        let mut select =
            Movies::find().filter(movies::Column::ContentType.eq(ContentType::Series.as_i32()));
        if !query.trim().is_empty() {
            select = select.filter(movies::Column::Title.contains(query.trim()));
        }

        select
            .order_by_asc(movies::Column::Title)
            .limit(limit)
            .all(&self.conn)
            .await
            .context("Failed to search series")
    }

    pub async fn count(&self, content_type: Option<ContentType>) -> Result<u64> {
        let mut query = Movies::find();
        if let Some(kind) = content_type {
            query = query.filter(movies::Column::ContentType.eq(kind.as_i32()));
        }
        query
            .count(&self.conn)
            .await
            .context("Failed to count movies")
    }
}
