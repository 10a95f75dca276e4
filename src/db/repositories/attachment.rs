use anyhow::{Context, Result};
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};

use crate::db::now_timestamp;
use crate::entities::{attachments, prelude::*};
use crate::models::catalog::AttachmentInput;

const DEFAULT_DISK: &str = "public";

pub struct AttachmentRepository {
    conn: DatabaseConnection,
}

impl AttachmentRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn get(&self, id: i32) -> Result<Option<attachments::Model>> {
        Attachments::find_by_id(id)
            .one(&self.conn)
            .await
            .context("Failed to query attachment")
    }

    pub async fn get_by_ids(&self, ids: &[i32]) -> Result<Vec<attachments::Model>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        Attachments::find()
            .filter(attachments::Column::Id.is_in(ids.iter().copied()))
            .all(&self.conn)
            .await
            .context("Failed to query attachments")
    }

    pub async fn create(&self, input: &AttachmentInput) -> Result<attachments::Model> {
        attachments::ActiveModel {
            name: Set(input.name.clone()),
            original_name: Set(input
                .original_name
                .clone()
                .unwrap_or_else(|| input.name.clone())),
            mime: Set(input.mime.clone()),
            extension: Set(input.extension.clone()),
            size: Set(input.size),
            path: Set(input.path.clone()),
            disk: Set(input
                .disk
                .clone()
                .unwrap_or_else(|| DEFAULT_DISK.to_string())),
            created_at: Set(now_timestamp()),
            ..Default::default()
        }
        .insert(&self.conn)
        .await
        .context("Failed to insert attachment")
    }

    pub async fn delete(&self, id: i32) -> Result<bool> {
        let result = Attachments::delete_by_id(id)
            .exec(&self.conn)
            .await
            .context("Failed to delete attachment")?;
        Ok(result.rows_affected > 0)
    }
}
