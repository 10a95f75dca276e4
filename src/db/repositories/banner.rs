use anyhow::{Context, Result};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};

use crate::db::now_timestamp;
use crate::domain::STATUS_ACTIVE;
use crate::entities::{banner, prelude::*};
use crate::models::catalog::BannerInput;

pub struct BannerRepository {
    conn: DatabaseConnection,
}

impl BannerRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    /// Active banners by position, newest first within a position.
    pub async fn list_active(&self, position: Option<i32>) -> Result<Vec<banner::Model>> {
        let mut query = Banner::find().filter(banner::Column::Status.eq(STATUS_ACTIVE));
        if let Some(position) = position {
            query = query.filter(banner::Column::Position.eq(position));
        }

        query
            .order_by_asc(banner::Column::Position)
            .order_by_desc(banner::Column::CreatedAt)
            .order_by_desc(banner::Column::Id)
            .all(&self.conn)
            .await
            .context("Failed to list banners")
    }

    pub async fn list_all(&self) -> Result<Vec<banner::Model>> {
        Banner::find()
            .order_by_asc(banner::Column::Position)
            .order_by_desc(banner::Column::Id)
            .all(&self.conn)
            .await
            .context("Failed to list banners")
    }

    pub async fn get(&self, id: i32) -> Result<Option<banner::Model>> {
        Banner::find_by_id(id)
            .one(&self.conn)
            .await
            .context("Failed to query banner")
    }

    pub async fn create(&self, input: &BannerInput) -> Result<banner::Model> {
        let now = now_timestamp();
        banner::ActiveModel {
            position: Set(input.position),
            movie_id: Set(input.movie_id),
            image: Set(input.image),
            status: Set(input.status),
            created_at: Set(now.clone()),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&self.conn)
        .await
        .context("Failed to insert banner")
    }

    pub async fn update(&self, id: i32, input: &BannerInput) -> Result<Option<banner::Model>> {
        let Some(existing) = self.get(id).await? else {
            return Ok(None);
        };

        let mut active: banner::ActiveModel = existing.into();
        active.position = Set(input.position);
        active.movie_id = Set(input.movie_id);
        active.image = Set(input.image);
        active.status = Set(input.status);
        active.updated_at = Set(now_timestamp());

        let model = active
            .update(&self.conn)
            .await
            .context("Failed to update banner")?;
        Ok(Some(model))
    }

    pub async fn delete(&self, id: i32) -> Result<bool> {
        let result = Banner::delete_by_id(id)
            .exec(&self.conn)
            .await
            .context("Failed to delete banner")?;
        Ok(result.rows_affected > 0)
    }
}
