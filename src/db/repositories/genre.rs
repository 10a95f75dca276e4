use anyhow::{Context, Result};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};
use std::collections::HashMap;

use crate::db::now_timestamp;
use crate::entities::{genres, prelude::*};

pub struct GenreRepository {
    conn: DatabaseConnection,
}

impl GenreRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    /// All genres ordered by name, optionally filtered by a name fragment.
    pub async fn list(&self, name: Option<&str>) -> Result<Vec<genres::Model>> {
        let mut query = Genres::find();
        if let Some(name) = name.map(str::trim).filter(|n| !n.is_empty()) {
            query = query.filter(genres::Column::Name.contains(name));
        }

        query
            .order_by_asc(genres::Column::Name)
            .order_by_asc(genres::Column::Id)
            .all(&self.conn)
            .await
            .context("Failed to list genres")
    }

    pub async fn get(&self, id: i32) -> Result<Option<genres::Model>> {
        Genres::find_by_id(id)
            .one(&self.conn)
            .await
            .context("Failed to query genre")
    }

    /// Case-sensitive lookup by exact name.
    pub async fn find_by_name(&self, name: &str) -> Result<Option<genres::Model>> {
        Genres::find()
            .filter(genres::Column::Name.eq(name))
            .one(&self.conn)
            .await
            .context("Failed to query genre by name")
    }

    /// Maps each known id to its name. Unknown ids are left out.
    pub async fn names_by_ids(&self, ids: &[i32]) -> Result<HashMap<i32, String>> {
        if ids.is_empty() {
            return Ok(HashMap::new());
        }

        let rows = Genres::find()
            .filter(genres::Column::Id.is_in(ids.iter().copied()))
            .all(&self.conn)
            .await
            .context("Failed to query genre names")?;

        Ok(rows.into_iter().map(|g| (g.id, g.name)).collect())
    }

    pub async fn create(&self, name: &str) -> Result<genres::Model> {
        let now = now_timestamp();
        genres::ActiveModel {
            name: Set(name.to_string()),
            created_at: Set(now.clone()),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&self.conn)
        .await
        .context("Failed to insert genre")
    }

    pub async fn update(&self, id: i32, name: &str) -> Result<Option<genres::Model>> {
        let Some(existing) = self.get(id).await? else {
            return Ok(None);
        };

        let mut active: genres::ActiveModel = existing.into();
        active.name = Set(name.to_string());
        active.updated_at = Set(now_timestamp());

        let model = active
            .update(&self.conn)
            .await
            .context("Failed to update genre")?;
        Ok(Some(model))
    }

    pub async fn delete(&self, id: i32) -> Result<bool> {
        let result = Genres::delete_by_id(id)
            .exec(&self.conn)
            .await
            .context("Failed to delete genre")?;
        Ok(result.rows_affected > 0)
    }
}
