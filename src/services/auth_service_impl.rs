//! `SeaORM` implementation of the `AuthService` trait.

use async_trait::async_trait;
use tracing::info;

use crate::config::SecurityConfig;
use crate::db::repositories::user::verify_password_hash;
use crate::db::{NewUser, Store, User};
use crate::domain::UserId;
use crate::models::account::{Credentials, PasswordChange, ProfileUpdate, Registration};
use crate::services::auth_service::{AuthError, AuthService, AuthToken, ProfileInfo};
use crate::services::image::avatar_url;
use crate::services::validation::{self, FieldErrors};

const USERNAME_MIN: usize = 3;
const USERNAME_MAX: usize = 50;
const NAME_MAX: usize = 255;
const TOKEN_NAME: &str = "api-token";

pub struct SeaOrmAuthService {
    store: Store,
    security: SecurityConfig,
}

impl SeaOrmAuthService {
    #[must_use]
    pub const fn new(store: Store, security: SecurityConfig) -> Self {
        Self { store, security }
    }

    fn profile_info(user: User, base: &str) -> ProfileInfo {
        ProfileInfo {
            id: user.id,
            avatar: avatar_url(base, user.avatar.as_deref()),
            name: user.name,
            username: user.username,
            is_member: u8::from(user.is_member),
            is_admin: u8::from(user.is_admin),
            is_ban: u8::from(user.is_ban),
            is_restric: u8::from(user.is_restric),
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }

    /// Looks up the user and checks password and ban, in that order.
    async fn check_credentials(&self, credentials: &Credentials) -> Result<User, AuthError> {
        let mut errors = FieldErrors::new();
        let username =
            validation::required(&mut errors, "username", credentials.username.as_deref());
        let password = credentials.password.as_deref().filter(|p| !p.is_empty());
        if password.is_none() {
            errors.add("password", "The password field is required.");
        }
        let (Some(username), Some(password)) = (username, password) else {
            return Err(AuthError::Validation(errors));
        };

        let (user, hash) = self
            .store
            .get_user_with_password(username)
            .await?
            .ok_or(AuthError::UsernameNotFound)?;

        if !verify_password_hash(hash, password.to_string()).await? {
            return Err(AuthError::InvalidPassword);
        }

        if user.is_ban {
            return Err(AuthError::Banned);
        }

        Ok(user)
    }

    fn check_password_length(&self, errors: &mut FieldErrors, field: &str, password: &str) {
        validation::length(
            errors,
            field,
            password,
            Some(self.security.min_password_length),
            None,
        );
    }
}

#[async_trait]
impl AuthService for SeaOrmAuthService {
    async fn register(&self, form: &Registration) -> Result<AuthToken, AuthError> {
        let mut errors = FieldErrors::new();

        let username = validation::required(&mut errors, "username", form.username.as_deref());
        if let Some(username) = username {
            validation::length(
                &mut errors,
                "username",
                username,
                Some(USERNAME_MIN),
                Some(USERNAME_MAX),
            );
            if self.store.username_taken(username, None).await? {
                validation::taken(&mut errors, "username");
            }
        }

        let password = form.password.as_deref().filter(|p| !p.is_empty());
        match password {
            Some(password) => self.check_password_length(&mut errors, "password", password),
            None => errors.add("password", "The password field is required."),
        }

        let name = form
            .name
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty());
        if let Some(name) = name {
            validation::length(&mut errors, "name", name, None, Some(NAME_MAX));
        }

        errors.into_result().map_err(AuthError::Validation)?;
        let (Some(username), Some(password)) = (username, password) else {
            return Err(AuthError::Internal("validated fields missing".to_string()));
        };

        let user = self
            .store
            .create_user(
                NewUser {
                    name: name.unwrap_or(username),
                    username,
                    password,
                    is_admin: false,
                },
                &self.security,
            )
            .await?;

        let token = self.store.issue_token(user.id, TOKEN_NAME).await?;
        info!("Registered user {}", user.username);

        Ok(AuthToken {
            token,
            id: user.id,
            username: user.username,
        })
    }

    async fn login(&self, credentials: &Credentials) -> Result<AuthToken, AuthError> {
        let user = self.check_credentials(credentials).await?;
        let token = self.store.issue_token(user.id, TOKEN_NAME).await?;

        Ok(AuthToken {
            token,
            id: user.id,
            username: user.username,
        })
    }

    async fn admin_login(&self, credentials: &Credentials) -> Result<User, AuthError> {
        let user = self.check_credentials(credentials).await?;
        if !user.is_admin {
            return Err(AuthError::NotAdmin);
        }
        Ok(user)
    }

    async fn profile(&self, user_id: UserId, base: &str) -> Result<ProfileInfo, AuthError> {
        let user = self
            .store
            .get_user(user_id.value())
            .await?
            .ok_or(AuthError::Unauthorized)?;

        Ok(Self::profile_info(user, base))
    }

    async fn update_profile(
        &self,
        user_id: UserId,
        update: &ProfileUpdate,
        base: &str,
    ) -> Result<ProfileInfo, AuthError> {
        let mut errors = FieldErrors::new();

        let name = update
            .name
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty());
        if let Some(name) = name {
            validation::length(&mut errors, "name", name, None, Some(NAME_MAX));
        }

        let username = update
            .username
            .as_deref()
            .map(str::trim)
            .filter(|u| !u.is_empty());
        if let Some(username) = username {
            validation::length(
                &mut errors,
                "username",
                username,
                Some(USERNAME_MIN),
                Some(USERNAME_MAX),
            );
            if self
                .store
                .username_taken(username, Some(user_id.value()))
                .await?
            {
                validation::taken(&mut errors, "username");
            }
        }

        errors.into_result().map_err(AuthError::Validation)?;

        let user = self
            .store
            .update_user_profile(user_id.value(), name, username)
            .await?
            .ok_or(AuthError::Unauthorized)?;

        Ok(Self::profile_info(user, base))
    }

    async fn update_password(
        &self,
        user_id: UserId,
        change: &PasswordChange,
    ) -> Result<(), AuthError> {
        let mut errors = FieldErrors::new();

        let old = change.old_password.as_deref().filter(|p| !p.is_empty());
        if old.is_none() {
            errors.add("old_password", "The old password field is required.");
        }
        let new = change.new_password.as_deref().filter(|p| !p.is_empty());
        match new {
            Some(new) => self.check_password_length(&mut errors, "new_password", new),
            None => errors.add("new_password", "The new password field is required."),
        }

        errors.into_result().map_err(AuthError::Validation)?;
        let (Some(old), Some(new)) = (old, new) else {
            return Err(AuthError::Internal("validated fields missing".to_string()));
        };

        if !self
            .store
            .verify_user_password(user_id.value(), old)
            .await?
        {
            return Err(AuthError::WrongOldPassword);
        }

        self.store
            .update_user_password(user_id.value(), new, &self.security)
            .await?;

        info!("Password changed for user {}", user_id);
        Ok(())
    }

    async fn logout(&self, token: &str) -> Result<(), AuthError> {
        self.store.revoke_token(token).await?;
        Ok(())
    }

    async fn authenticate(&self, token: &str) -> Result<User, AuthError> {
        let user = self
            .store
            .authenticate_token(token)
            .await?
            .ok_or(AuthError::Unauthorized)?;

        if user.is_ban {
            return Err(AuthError::Banned);
        }
        Ok(user)
    }

    async fn get_user(&self, user_id: UserId) -> Result<Option<User>, AuthError> {
        Ok(self.store.get_user(user_id.value()).await?)
    }
}
