use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "access_tokens")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub user_web_id: i32,

    /// Label of the client that requested the token
    pub name: String,

    /// Random bearer token (64-char hex string)
    #[sea_orm(unique)]
    pub token: String,

    pub last_used_at: Option<String>,

    pub created_at: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user_web::Entity",
        from = "Column::UserWebId",
        to = "super::user_web::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    UserWeb,
}

impl Related<super::user_web::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::UserWeb.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
