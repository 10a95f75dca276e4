use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "movies")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    /// 1 = film, 2 = series
    pub content_type: i32,

    pub title: String,

    pub description: Option<String>,

    /// Attachment id of the poster image
    pub image: Option<i32>,

    /// Raw link or iframe markup as entered by an editor
    pub video: Option<String>,

    /// Comma-joined genre ids, e.g. "1,4,12"
    pub genre_id: Option<String>,

    pub age_rating: Option<String>,

    pub language: Option<String>,

    pub is_subtitles: bool,

    pub is_dubbed: bool,

    pub like_count: i32,

    pub view_count: Option<i32>,

    pub user_web_id: Option<i32>,

    /// 1 = active
    pub status: i32,

    pub created_at: String,

    pub updated_at: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::season::Entity")]
    Season,
    #[sea_orm(has_many = "super::banner::Entity")]
    Banner,
}

impl Related<super::season::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Season.def()
    }
}

impl Related<super::banner::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Banner.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
