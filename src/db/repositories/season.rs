use anyhow::{Context, Result};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};
use tracing::info;

use crate::db::now_timestamp;
use crate::entities::{episode, prelude::*, season};
use crate::models::catalog::SeasonInput;

pub struct SeasonRepository {
    conn: DatabaseConnection,
}

impl SeasonRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn list_by_movie(&self, movie_id: i32) -> Result<Vec<season::Model>> {
        Season::find()
            .filter(season::Column::MovieId.eq(movie_id))
            .order_by_asc(season::Column::NumberOfSeason)
            .order_by_asc(season::Column::Id)
            .all(&self.conn)
            .await
            .context("Failed to list seasons")
    }

    pub async fn get(&self, id: i32) -> Result<Option<season::Model>> {
        Season::find_by_id(id)
            .one(&self.conn)
            .await
            .context("Failed to query season")
    }

    pub async fn create(&self, input: &SeasonInput) -> Result<season::Model> {
        let now = now_timestamp();
        season::ActiveModel {
            title: Set(input.title.clone()),
            description: Set(input.description.clone()),
            number_of_season: Set(input.number_of_season),
            movie_id: Set(input.movie_id),
            created_at: Set(now.clone()),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&self.conn)
        .await
        .context("Failed to insert season")
    }

    pub async fn update(&self, id: i32, input: &SeasonInput) -> Result<Option<season::Model>> {
        let Some(existing) = self.get(id).await? else {
            return Ok(None);
        };

        let mut active: season::ActiveModel = existing.into();
        active.title = Set(input.title.clone());
        active.description = Set(input.description.clone());
        active.number_of_season = Set(input.number_of_season);
        active.movie_id = Set(input.movie_id);
        active.updated_at = Set(now_timestamp());

        let model = active
            .update(&self.conn)
            .await
            .context("Failed to update season")?;
        Ok(Some(model))
    }

    /// Deletes a season and its episodes.
    pub async fn delete(&self, id: i32) -> Result<bool> {
        let txn = self.conn.begin().await?;

        Episode::delete_many()
            .filter(episode::Column::SeasonId.eq(id))
            .exec(&txn)
            .await?;

        let result = Season::delete_by_id(id).exec(&txn).await?;

        txn.commit().await?;

        let removed = result.rows_affected > 0;
        if removed {
            info!("Removed season with ID: {}", id);
        }
        Ok(removed)
    }
}
