//! Domain service for end-user accounts.
//!
//! Handles sign-up, login, bearer token resolution, profile edits and
//! password changes.

use serde::Serialize;
use thiserror::Error;

use crate::db::User;
use crate::domain::UserId;
use crate::models::account::{Credentials, PasswordChange, ProfileUpdate, Registration};
use crate::services::validation::FieldErrors;

/// Errors specific to account operations.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Validation failed")]
    Validation(FieldErrors),

    #[error("Username not found.")]
    UsernameNotFound,

    #[error("Invalid password.")]
    InvalidPassword,

    #[error("Your account has been banned.")]
    Banned,

    #[error("Administrator access required")]
    NotAdmin,

    #[error("Old password is incorrect")]
    WrongOldPassword,

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<sea_orm::DbErr> for AuthError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<anyhow::Error> for AuthError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

/// Token handed out by login and registration.
#[derive(Debug, Clone, Serialize)]
pub struct AuthToken {
    pub token: String,
    pub id: i32,
    pub username: String,
}

/// Profile as the mobile client reads it. Flags are `0`/`1`.
#[derive(Debug, Clone, Serialize)]
pub struct ProfileInfo {
    pub id: i32,
    pub name: String,
    pub username: String,
    pub is_member: u8,
    pub is_admin: u8,
    pub is_ban: u8,
    pub is_restric: u8,
    pub avatar: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

/// Domain service trait for accounts.
#[async_trait::async_trait]
pub trait AuthService: Send + Sync {
    /// Creates a regular account and issues its first token.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Validation`] when a field fails its rules or the
    /// username is taken.
    async fn register(&self, form: &Registration) -> Result<AuthToken, AuthError>;

    /// Checks credentials and issues a new token.
    ///
    /// # Errors
    ///
    /// [`AuthError::UsernameNotFound`], [`AuthError::InvalidPassword`] or
    /// [`AuthError::Banned`], checked in that order.
    async fn login(&self, credentials: &Credentials) -> Result<AuthToken, AuthError>;

    /// Same checks as [`AuthService::login`] plus the admin flag. No token is
    /// issued; the caller keeps the user in a session instead.
    async fn admin_login(&self, credentials: &Credentials) -> Result<User, AuthError>;

    async fn profile(&self, user_id: UserId, base: &str) -> Result<ProfileInfo, AuthError>;

    async fn update_profile(
        &self,
        user_id: UserId,
        update: &ProfileUpdate,
        base: &str,
    ) -> Result<ProfileInfo, AuthError>;

    /// # Errors
    ///
    /// Returns [`AuthError::WrongOldPassword`] if `old_password` does not match.
    async fn update_password(
        &self,
        user_id: UserId,
        change: &PasswordChange,
    ) -> Result<(), AuthError>;

    /// Revokes only the presented token.
    async fn logout(&self, token: &str) -> Result<(), AuthError>;

    /// Resolves a bearer token to its user.
    ///
    /// # Errors
    ///
    /// [`AuthError::Unauthorized`] for unknown tokens and [`AuthError::Banned`]
    /// for banned users.
    async fn authenticate(&self, token: &str) -> Result<User, AuthError>;

    /// Current state of a user kept in an admin session.
    async fn get_user(&self, user_id: UserId) -> Result<Option<User>, AuthError>;
}
