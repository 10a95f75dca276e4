use anyhow::{Context, Result};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};

use crate::db::now_timestamp;
use crate::entities::{episode, prelude::*};
use crate::models::catalog::EpisodeInput;

pub struct EpisodeRepository {
    conn: DatabaseConnection,
}

impl EpisodeRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn list_by_season(&self, season_id: i32) -> Result<Vec<episode::Model>> {
        self.list_by_seasons(&[season_id]).await
    }

    /// Episodes of several seasons in one query, ordered by id.
    pub async fn list_by_seasons(&self, season_ids: &[i32]) -> Result<Vec<episode::Model>> {
        if season_ids.is_empty() {
            return Ok(Vec::new());
        }

        Episode::find()
            .filter(episode::Column::SeasonId.is_in(season_ids.iter().copied()))
            .order_by_asc(episode::Column::Id)
            .all(&self.conn)
            .await
            .context("Failed to list episodes")
    }

    pub async fn get(&self, id: i32) -> Result<Option<episode::Model>> {
        Episode::find_by_id(id)
            .one(&self.conn)
            .await
            .context("Failed to query episode")
    }

    pub async fn create(&self, input: &EpisodeInput) -> Result<episode::Model> {
        let now = now_timestamp();
        episode::ActiveModel {
            title: Set(input.title.clone()),
            description: Set(input.description.clone()),
            season_id: Set(input.season_id),
            video: Set(input.video.clone()),
            image: Set(input.image),
            duration: Set(input.duration.clone()),
            created_at: Set(now.clone()),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&self.conn)
        .await
        .context("Failed to insert episode")
    }

    pub async fn update(&self, id: i32, input: &EpisodeInput) -> Result<Option<episode::Model>> {
        let Some(existing) = self.get(id).await? else {
            return Ok(None);
        };

        let mut active: episode::ActiveModel = existing.into();
        active.title = Set(input.title.clone());
        active.description = Set(input.description.clone());
        active.season_id = Set(input.season_id);
        active.video = Set(input.video.clone());
        active.image = Set(input.image);
        active.duration = Set(input.duration.clone());
        active.updated_at = Set(now_timestamp());

        let model = active
            .update(&self.conn)
            .await
            .context("Failed to update episode")?;
        Ok(Some(model))
    }

    pub async fn delete(&self, id: i32) -> Result<bool> {
        let result = Episode::delete_by_id(id)
            .exec(&self.conn)
            .await
            .context("Failed to delete episode")?;
        Ok(result.rows_affected > 0)
    }
}
