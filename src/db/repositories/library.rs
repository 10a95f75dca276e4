//! Per-user saved list and favorites.
//!
//! Both tables carry a unique `(user_web_id, movie_id)` index, so adds are
//! plain `INSERT ... ON CONFLICT DO NOTHING` and report whether a row was
//! actually written.

use anyhow::{Context, Result};
use sea_orm::sea_query::OnConflict;
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Set,
};

use crate::db::now_timestamp;
use crate::entities::{prelude::*, user_movie_likes, user_web_list};

pub struct LibraryRepository {
    conn: DatabaseConnection,
}

impl LibraryRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn add_to_list(&self, user_id: i32, movie_id: i32) -> Result<bool> {
        let row = user_web_list::ActiveModel {
            user_web_id: Set(user_id),
            movie_id: Set(movie_id),
            created_at: Set(now_timestamp()),
            ..Default::default()
        };

        let inserted = UserWebList::insert(row)
            .on_conflict(
                OnConflict::columns([
                    user_web_list::Column::UserWebId,
                    user_web_list::Column::MovieId,
                ])
                .do_nothing()
                .to_owned(),
            )
            .exec_without_returning(&self.conn)
            .await
            .context("Failed to add movie to list")?;

        Ok(inserted > 0)
    }

    pub async fn remove_from_list(&self, user_id: i32, movie_id: i32) -> Result<bool> {
        let result = UserWebList::delete_many()
            .filter(user_web_list::Column::UserWebId.eq(user_id))
            .filter(user_web_list::Column::MovieId.eq(movie_id))
            .exec(&self.conn)
            .await
            .context("Failed to remove movie from list")?;
        Ok(result.rows_affected > 0)
    }

    pub async fn in_list(&self, user_id: i32, movie_id: i32) -> Result<bool> {
        let count = UserWebList::find()
            .filter(user_web_list::Column::UserWebId.eq(user_id))
            .filter(user_web_list::Column::MovieId.eq(movie_id))
            .count(&self.conn)
            .await
            .context("Failed to check list")?;
        Ok(count > 0)
    }

    /// Movie ids in the user's list, most recently added first.
    pub async fn list_movie_ids(&self, user_id: i32) -> Result<Vec<i32>> {
        UserWebList::find()
            .select_only()
            .column(user_web_list::Column::MovieId)
            .filter(user_web_list::Column::UserWebId.eq(user_id))
            .order_by_desc(user_web_list::Column::Id)
            .into_tuple()
            .all(&self.conn)
            .await
            .context("Failed to read user list")
    }

    pub async fn add_favorite(&self, user_id: i32, movie_id: i32) -> Result<bool> {
        let now = now_timestamp();
        let row = user_movie_likes::ActiveModel {
            user_web_id: Set(user_id),
            movie_id: Set(movie_id),
            created_at: Set(now.clone()),
            updated_at: Set(now),
            ..Default::default()
        };

        let inserted = UserMovieLikes::insert(row)
            .on_conflict(
                OnConflict::columns([
                    user_movie_likes::Column::UserWebId,
                    user_movie_likes::Column::MovieId,
                ])
                .do_nothing()
                .to_owned(),
            )
            .exec_without_returning(&self.conn)
            .await
            .context("Failed to add favorite")?;

        Ok(inserted > 0)
    }

    pub async fn remove_favorite(&self, user_id: i32, movie_id: i32) -> Result<bool> {
        let result = UserMovieLikes::delete_many()
            .filter(user_movie_likes::Column::UserWebId.eq(user_id))
            .filter(user_movie_likes::Column::MovieId.eq(movie_id))
            .exec(&self.conn)
            .await
            .context("Failed to remove favorite")?;
        Ok(result.rows_affected > 0)
    }

    pub async fn is_favorite(&self, user_id: i32, movie_id: i32) -> Result<bool> {
        let count = UserMovieLikes::find()
            .filter(user_movie_likes::Column::UserWebId.eq(user_id))
            .filter(user_movie_likes::Column::MovieId.eq(movie_id))
            .count(&self.conn)
            .await
            .context("Failed to check favorite")?;
        Ok(count > 0)
    }

    pub async fn favorite_movie_ids(&self, user_id: i32) -> Result<Vec<i32>> {
        UserMovieLikes::find()
            .select_only()
            .column(user_movie_likes::Column::MovieId)
            .filter(user_movie_likes::Column::UserWebId.eq(user_id))
            .order_by_desc(user_movie_likes::Column::Id)
            .into_tuple()
            .all(&self.conn)
            .await
            .context("Failed to read favorites")
    }
}
