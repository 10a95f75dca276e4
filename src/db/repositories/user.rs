use anyhow::{Context, Result};
use argon2::{
    Algorithm, Argon2, Params, Version,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set, TransactionTrait,
};
use tokio::task;
use tracing::info;

use crate::config::SecurityConfig;
use crate::db::{fetch_page, now_timestamp};
use crate::entities::{access_tokens, prelude::*, user_movie_likes, user_web, user_web_list};
use crate::models::Page;
use crate::models::catalog::UserFlagsUpdate;

/// User data returned from repository (without sensitive password hash)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: i32,
    pub name: String,
    pub username: String,
    pub is_member: bool,
    pub is_ban: bool,
    pub is_restric: bool,
    pub is_admin: bool,
    pub avatar: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<user_web::Model> for User {
    fn from(model: user_web::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            username: model.username,
            is_member: model.is_member,
            is_ban: model.is_ban,
            is_restric: model.is_restric,
            is_admin: model.is_admin,
            avatar: model.avatar,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

/// Fields for a new account.
#[derive(Debug, Clone)]
pub struct NewUser<'a> {
    pub name: &'a str,
    pub username: &'a str,
    pub password: &'a str,
    pub is_admin: bool,
}

pub struct UserRepository {
    conn: DatabaseConnection,
}

impl UserRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    /// Get user by username
    pub async fn get_by_username(&self, username: &str) -> Result<Option<User>> {
        let user = UserWeb::find()
            .filter(user_web::Column::Username.eq(username))
            .one(&self.conn)
            .await
            .context("Failed to query user by username")?;

        Ok(user.map(User::from))
    }

    /// Get user by username together with the stored password hash
    pub async fn get_by_username_with_password(
        &self,
        username: &str,
    ) -> Result<Option<(User, String)>> {
        let user = UserWeb::find()
            .filter(user_web::Column::Username.eq(username))
            .one(&self.conn)
            .await
            .context("Failed to query user by username")?;

        Ok(user.map(|u| {
            let password_hash = u.password_hash.clone();
            (User::from(u), password_hash)
        }))
    }

    /// Get user by ID
    pub async fn get_by_id(&self, id: i32) -> Result<Option<User>> {
        let user = UserWeb::find_by_id(id)
            .one(&self.conn)
            .await
            .context("Failed to query user by ID")?;

        Ok(user.map(User::from))
    }

    async fn password_hash(&self, id: i32) -> Result<Option<String>> {
        let user = UserWeb::find_by_id(id)
            .one(&self.conn)
            .await
            .context("Failed to query user for password verification")?;

        Ok(user.map(|u| u.password_hash))
    }

    /// Whether `username` belongs to anyone other than `except`
    pub async fn username_taken(&self, username: &str, except: Option<i32>) -> Result<bool> {
        let mut query = UserWeb::find().filter(user_web::Column::Username.eq(username));
        if let Some(id) = except {
            query = query.filter(user_web::Column::Id.ne(id));
        }

        let count = query
            .count(&self.conn)
            .await
            .context("Failed to check username")?;
        Ok(count > 0)
    }

    pub async fn create(&self, new_user: NewUser<'_>, config: &SecurityConfig) -> Result<User> {
        let password = new_user.password.to_string();
        let config = config.clone();
        let password_hash = task::spawn_blocking(move || hash_password(&password, Some(&config)))
            .await
            .context("Password hashing task panicked")??;

        let now = now_timestamp();
        let model = user_web::ActiveModel {
            name: Set(new_user.name.to_string()),
            username: Set(new_user.username.to_string()),
            password_hash: Set(password_hash),
            is_member: Set(false),
            is_ban: Set(false),
            is_restric: Set(false),
            is_admin: Set(new_user.is_admin),
            avatar: Set(None),
            created_at: Set(now.clone()),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&self.conn)
        .await
        .context("Failed to insert user")?;

        info!("Created user {} (admin: {})", model.username, model.is_admin);
        Ok(User::from(model))
    }

    /// Verify password for a user
    /// Note: This uses `spawn_blocking` because Argon2 hashing is CPU-intensive
    /// and would block the async runtime if run directly.
    pub async fn verify_password(&self, id: i32, password: &str) -> Result<bool> {
        let Some(password_hash) = self.password_hash(id).await? else {
            return Ok(false);
        };

        verify_password_hash(password_hash, password.to_string()).await
    }

    pub async fn update_profile(
        &self,
        id: i32,
        name: Option<&str>,
        username: Option<&str>,
    ) -> Result<Option<User>> {
        let Some(user) = UserWeb::find_by_id(id).one(&self.conn).await? else {
            return Ok(None);
        };

        let mut active: user_web::ActiveModel = user.into();
        if let Some(name) = name {
            active.name = Set(name.to_string());
        }
        if let Some(username) = username {
            active.username = Set(username.to_string());
        }
        active.updated_at = Set(now_timestamp());

        let model = active
            .update(&self.conn)
            .await
            .context("Failed to update profile")?;
        Ok(Some(User::from(model)))
    }

    /// Update password for a user with specific security config
    pub async fn update_password(
        &self,
        id: i32,
        new_password: &str,
        config: &SecurityConfig,
    ) -> Result<()> {
        let user = UserWeb::find_by_id(id)
            .one(&self.conn)
            .await
            .context("Failed to query user for password update")?
            .ok_or_else(|| anyhow::anyhow!("User not found: {id}"))?;

        let password = new_password.to_string();
        let config = config.clone();
        let new_hash = task::spawn_blocking(move || hash_password(&password, Some(&config)))
            .await
            .context("Password hashing task panicked")??;

        let mut active: user_web::ActiveModel = user.into();
        active.password_hash = Set(new_hash);
        active.updated_at = Set(now_timestamp());
        active.update(&self.conn).await?;

        Ok(())
    }

    pub async fn list(
        &self,
        username: Option<&str>,
        page: u64,
        per_page: u64,
    ) -> Result<Page<User>> {
        let mut query = UserWeb::find();
        if let Some(username) = username.map(str::trim).filter(|u| !u.is_empty()) {
            query = query.filter(user_web::Column::Username.contains(username));
        }

        let paginator = query
            .order_by_desc(user_web::Column::Id)
            .paginate(&self.conn, per_page.max(1));
        let page = fetch_page(paginator, page, per_page)
            .await
            .context("Failed to list users")?;

        Ok(page.map(User::from))
    }

    pub async fn set_flags(&self, id: i32, flags: UserFlagsUpdate) -> Result<Option<User>> {
        let Some(user) = UserWeb::find_by_id(id).one(&self.conn).await? else {
            return Ok(None);
        };

        let mut active: user_web::ActiveModel = user.into();
        if let Some(value) = flags.is_ban {
            active.is_ban = Set(value);
        }
        if let Some(value) = flags.is_restric {
            active.is_restric = Set(value);
        }
        if let Some(value) = flags.is_admin {
            active.is_admin = Set(value);
        }
        if let Some(value) = flags.is_member {
            active.is_member = Set(value);
        }
        active.updated_at = Set(now_timestamp());

        let model = active
            .update(&self.conn)
            .await
            .context("Failed to update user flags")?;
        info!(
            "Updated flags for user {}: ban={} restric={} admin={} member={}",
            model.username, model.is_ban, model.is_restric, model.is_admin, model.is_member
        );
        Ok(Some(User::from(model)))
    }

    /// Removes a user with their tokens, list and favorite rows.
    pub async fn delete(&self, id: i32) -> Result<bool> {
        let txn = self.conn.begin().await?;

        AccessTokens::delete_many()
            .filter(access_tokens::Column::UserWebId.eq(id))
            .exec(&txn)
            .await?;
        UserWebList::delete_many()
            .filter(user_web_list::Column::UserWebId.eq(id))
            .exec(&txn)
            .await?;
        UserMovieLikes::delete_many()
            .filter(user_movie_likes::Column::UserWebId.eq(id))
            .exec(&txn)
            .await?;

        let result = UserWeb::delete_by_id(id).exec(&txn).await?;

        txn.commit().await?;

        let removed = result.rows_affected > 0;
        if removed {
            info!("Removed user with ID: {}", id);
        }
        Ok(removed)
    }

    pub async fn count(&self) -> Result<u64> {
        UserWeb::find()
            .count(&self.conn)
            .await
            .context("Failed to count users")
    }
}

/// Checks `password` against an Argon2 PHC string off the async runtime.
pub async fn verify_password_hash(password_hash: String, password: String) -> Result<bool> {
    task::spawn_blocking(move || {
        let parsed_hash = PasswordHash::new(&password_hash)
            .map_err(|e| anyhow::anyhow!("Invalid password hash format: {e}"))?;

        Ok::<bool, anyhow::Error>(
            Argon2::default()
                .verify_password(password.as_bytes(), &parsed_hash)
                .is_ok(),
        )
    })
    .await
    .context("Password verification task panicked")?
}

/// Hash a password using Argon2id with optional custom params.
/// If config is None, uses the library default params.
pub fn hash_password(password: &str, config: Option<&SecurityConfig>) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);

    let argon2 = if let Some(cfg) = config {
        let params = Params::new(
            cfg.argon2_memory_cost_kib,
            cfg.argon2_time_cost,
            cfg.argon2_parallelism,
            None, // output length (use default)
        )
        .map_err(|e| anyhow::anyhow!("Invalid Argon2 params: {e}"))?;
        Argon2::new(Algorithm::Argon2id, Version::V0x13, params)
    } else {
        Argon2::default()
    };

    let hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow::anyhow!("Failed to hash password: {e}"))?;

    Ok(hash.to_string())
}
