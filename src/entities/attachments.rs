use sea_orm::entity::prelude::*;

/// Metadata of an uploaded file. The bytes live on `disk` under
/// `{path}{name}.{extension}`.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "attachments")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    /// Stored file name without extension
    pub name: String,

    pub original_name: String,

    pub mime: Option<String>,

    pub extension: Option<String>,

    pub size: i64,

    /// Directory prefix relative to the disk root (with trailing slash),
    /// or an absolute URL for externally hosted images
    pub path: String,

    pub disk: String,

    pub created_at: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
