use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

const INDEXES: &[&str] = &[
    "CREATE INDEX IF NOT EXISTS idx_season_movie_id ON season(movie_id)",
    "CREATE INDEX IF NOT EXISTS idx_episode_season_id ON episode(season_id)",
    "CREATE INDEX IF NOT EXISTS idx_movies_type_status ON movies(content_type, status)",
    "CREATE INDEX IF NOT EXISTS idx_access_tokens_user ON access_tokens(user_web_id)",
    "CREATE UNIQUE INDEX IF NOT EXISTS idx_user_web_list_unique ON user_web_list(user_web_id, movie_id)",
    "CREATE UNIQUE INDEX IF NOT EXISTS idx_user_movie_likes_unique ON user_movie_likes(user_web_id, movie_id)",
];

const INDEX_NAMES: &[&str] = &[
    "idx_season_movie_id",
    "idx_episode_season_id",
    "idx_movies_type_status",
    "idx_access_tokens_user",
    "idx_user_web_list_unique",
    "idx_user_movie_likes_unique",
];

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let conn = manager.get_connection();

        // Keep the oldest row of any duplicated (user, movie) pair
        conn.execute_unprepared(
            "DELETE FROM user_web_list WHERE id NOT IN (SELECT MIN(id) FROM user_web_list GROUP BY user_web_id, movie_id)",
        )
        .await?;
        conn.execute_unprepared(
            "DELETE FROM user_movie_likes WHERE id NOT IN (SELECT MIN(id) FROM user_movie_likes GROUP BY user_web_id, movie_id)",
        )
        .await?;

        for sql in INDEXES {
            conn.execute_unprepared(sql).await?;
        }

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let conn = manager.get_connection();

        for name in INDEX_NAMES {
            conn.execute_unprepared(&format!("DROP INDEX IF EXISTS {name}"))
                .await?;
        }

        Ok(())
    }
}
