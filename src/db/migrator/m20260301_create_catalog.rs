use crate::entities::prelude::*;
use crate::entities::user_web;
use sea_orm_migration::prelude::*;
use sea_orm_migration::sea_orm::{EntityTrait, Schema};

#[derive(DeriveMigrationName)]
pub struct Migration;

const DEFAULT_ADMIN_USERNAME: &str = "admin";

/// Hash the bootstrap password using Argon2id
fn hash_default_password() -> Result<String, DbErr> {
    use argon2::{
        Argon2,
        password_hash::{PasswordHasher, SaltString, rand_core::OsRng},
    };

    let salt = SaltString::generate(&mut OsRng);

    Argon2::default()
        .hash_password(b"password", &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| DbErr::Custom(format!("Failed to hash default password: {e}")))
}

async fn create_entity<E>(manager: &SchemaManager<'_>, schema: &Schema, entity: E) -> Result<(), DbErr>
where
    E: EntityTrait,
{
    manager
        .create_table(
            schema
                .create_table_from_entity(entity)
                .if_not_exists()
                .to_owned(),
        )
        .await
}

async fn drop_entity<E>(manager: &SchemaManager<'_>, entity: E) -> Result<(), DbErr>
where
    E: EntityTrait,
{
    manager
        .drop_table(Table::drop().table(entity).if_exists().to_owned())
        .await
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let backend = manager.get_database_backend();
        let schema = Schema::new(backend);

        create_entity(manager, &schema, Genres).await?;
        create_entity(manager, &schema, Attachments).await?;
        create_entity(manager, &schema, Movies).await?;
        create_entity(manager, &schema, Season).await?;
        create_entity(manager, &schema, Episode).await?;
        create_entity(manager, &schema, Banner).await?;
        create_entity(manager, &schema, UserWeb).await?;
        create_entity(manager, &schema, AccessTokens).await?;
        create_entity(manager, &schema, UserWebList).await?;
        create_entity(manager, &schema, UserMovieLikes).await?;

        let now = crate::db::now_timestamp();
        let password_hash = hash_default_password()?;

        let insert = Query::insert()
            .into_table(UserWeb)
            .columns([
                user_web::Column::Name,
                user_web::Column::Username,
                user_web::Column::PasswordHash,
                user_web::Column::IsMember,
                user_web::Column::IsBan,
                user_web::Column::IsRestric,
                user_web::Column::IsAdmin,
                user_web::Column::CreatedAt,
                user_web::Column::UpdatedAt,
            ])
            .values_panic([
                "Administrator".into(),
                DEFAULT_ADMIN_USERNAME.into(),
                password_hash.into(),
                true.into(),
                false.into(),
                false.into(),
                true.into(),
                now.clone().into(),
                now.into(),
            ])
            .on_conflict(
                OnConflict::column(user_web::Column::Username)
                    .do_nothing()
                    .to_owned(),
            )
            .to_owned();

        manager.exec_stmt(insert).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        drop_entity(manager, UserMovieLikes).await?;
        drop_entity(manager, UserWebList).await?;
        drop_entity(manager, AccessTokens).await?;
        drop_entity(manager, UserWeb).await?;
        drop_entity(manager, Banner).await?;
        drop_entity(manager, Episode).await?;
        drop_entity(manager, Season).await?;
        drop_entity(manager, Movies).await?;
        drop_entity(manager, Attachments).await?;
        drop_entity(manager, Genres).await?;

        Ok(())
    }
}
