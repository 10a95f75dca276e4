use axum::{
    Json,
    extract::{FromRequestParts, Request, State},
    http::{HeaderMap, StatusCode, request::Parts},
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::sync::Arc;
use tower_sessions::Session;

use super::validation::{BaseUrl, Params};
use super::{ApiError, ApiResponse, AppState};
use crate::db::User;
use crate::domain::UserId;
use crate::models::account::{Credentials, PasswordChange, ProfileUpdate, Registration};
use crate::services::{AuthError, AuthToken, ProfileInfo};

/// Session key holding the id of a logged-in administrator.
const ADMIN_SESSION_KEY: &str = "admin_user_id";

/// User resolved by one of the auth middlewares.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub user: User,
    /// Bearer token the request was made with. `None` for session logins.
    pub token: Option<String>,
}

impl CurrentUser {
    #[must_use]
    pub const fn id(&self) -> UserId {
        UserId::new(self.user.id)
    }
}

impl<S: Send + Sync> FromRequestParts<S> for CurrentUser {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Self>()
            .cloned()
            .ok_or_else(ApiError::unauthorized)
    }
}

// ============================================================================
// Middleware
// ============================================================================

/// Requires `Authorization: Bearer <token>` belonging to a user that is not
/// banned.
pub async fn auth_middleware(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = bearer_token(&headers).ok_or_else(ApiError::unauthorized)?;

    let user = state.auth_service().authenticate(&token).await?;
    tracing::Span::current().record("user_id", user.id);

    request.extensions_mut().insert(CurrentUser {
        user,
        token: Some(token),
    });
    Ok(next.run(request).await)
}

/// Requires an administrator, either from the admin session or a bearer
/// token.
pub async fn admin_middleware(
    State(state): State<Arc<AppState>>,
    session: Session,
    headers: HeaderMap,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let current = if let Ok(Some(id)) = session.get::<i32>(ADMIN_SESSION_KEY).await
        && let Some(user) = state.auth_service().get_user(UserId::new(id)).await?
        && user.is_admin
        && !user.is_ban
    {
        CurrentUser { user, token: None }
    } else {
        let token = bearer_token(&headers).ok_or_else(ApiError::unauthorized)?;
        let user = state.auth_service().authenticate(&token).await?;
        if !user.is_admin {
            return Err(AuthError::NotAdmin.into());
        }
        CurrentUser {
            user,
            token: Some(token),
        }
    };

    tracing::Span::current().record("user_id", current.user.id);
    request.extensions_mut().insert(current);
    Ok(next.run(request).await)
}

fn bearer_token(headers: &HeaderMap) -> Option<String> {
    let value = headers.get("Authorization")?.to_str().ok()?;
    let token = value.strip_prefix("Bearer ")?.trim();
    (!token.is_empty()).then(|| token.to_string())
}

/// Login errors carry the first field message instead of a generic one.
fn login_error(err: AuthError) -> ApiError {
    match err {
        AuthError::Validation(errors) => ApiError::Validation {
            message: errors.summary(),
            errors,
        },
        other => other.into(),
    }
}

fn credentials(params: &Params) -> Credentials {
    Credentials {
        username: params.text("username"),
        password: params.text("password"),
    }
}

// ============================================================================
// Mobile client
// ============================================================================

/// POST /login
pub async fn login(
    State(state): State<Arc<AppState>>,
    params: Params,
) -> Result<Json<ApiResponse<AuthToken>>, ApiError> {
    let token = state
        .auth_service()
        .login(&credentials(&params))
        .await
        .map_err(login_error)?;

    tracing::info!(user_id = token.id, "User logged in");
    Ok(Json(ApiResponse::with_message("Login successful", token)))
}

/// POST /register
pub async fn register(
    State(state): State<Arc<AppState>>,
    params: Params,
) -> Result<impl IntoResponse, ApiError> {
    let form = Registration {
        username: params.text("username"),
        password: params.text("password"),
        name: params.text("name"),
    };

    let token = state.auth_service().register(&form).await?;

    tracing::info!(user_id = token.id, "User registered");
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::with_message("Registration successful", token)),
    ))
}

/// GET /profile
pub async fn profile(
    State(state): State<Arc<AppState>>,
    current: CurrentUser,
    BaseUrl(base): BaseUrl,
) -> Result<Json<ApiResponse<ProfileInfo>>, ApiError> {
    let info = state.auth_service().profile(current.id(), &base).await?;
    Ok(Json(ApiResponse::with_message(
        "Profile retrieved successfully",
        info,
    )))
}

/// POST /updateProfile
pub async fn update_profile(
    State(state): State<Arc<AppState>>,
    current: CurrentUser,
    BaseUrl(base): BaseUrl,
    params: Params,
) -> Result<Json<ApiResponse<ProfileInfo>>, ApiError> {
    let update = ProfileUpdate {
        name: params.text("name"),
        username: params.text("username"),
    };

    let info = state
        .auth_service()
        .update_profile(current.id(), &update, &base)
        .await?;
    Ok(Json(ApiResponse::with_message(
        "Profile updated successfully",
        info,
    )))
}

/// POST /userPassword
pub async fn update_password(
    State(state): State<Arc<AppState>>,
    current: CurrentUser,
    params: Params,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    let change = PasswordChange {
        old_password: params.text("old_password"),
        new_password: params.text("new_password"),
    };

    state
        .auth_service()
        .update_password(current.id(), &change)
        .await?;

    tracing::info!(user_id = current.user.id, "Password changed");
    Ok(Json(ApiResponse::message("Password updated successfully")))
}

/// POST /logout
pub async fn logout(
    State(state): State<Arc<AppState>>,
    current: CurrentUser,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    if let Some(token) = &current.token {
        state.auth_service().logout(token).await?;
    }
    Ok(Json(ApiResponse::message("Logout successful")))
}

// ============================================================================
// Admin session
// ============================================================================

#[derive(serde::Serialize)]
pub struct AdminSessionInfo {
    pub id: i32,
    pub username: String,
    pub name: String,
}

/// POST /admin/login
pub async fn admin_login(
    State(state): State<Arc<AppState>>,
    session: Session,
    params: Params,
) -> Result<Json<ApiResponse<AdminSessionInfo>>, ApiError> {
    let user = state
        .auth_service()
        .admin_login(&credentials(&params))
        .await
        .map_err(login_error)?;

    session.cycle_id().await.map_err(|e| {
        ApiError::internal(format!("Failed to rotate session: {e}"))
    })?;
    session
        .insert(ADMIN_SESSION_KEY, user.id)
        .await
        .map_err(|e| ApiError::internal(format!("Failed to create session: {e}")))?;

    tracing::info!(user_id = user.id, "Administrator logged in");
    Ok(Json(ApiResponse::with_message(
        "Login successful",
        AdminSessionInfo {
            id: user.id,
            username: user.username,
            name: user.name,
        },
    )))
}

/// POST /admin/logout
pub async fn admin_logout(session: Session) -> Result<Json<ApiResponse<()>>, ApiError> {
    session
        .flush()
        .await
        .map_err(|e| ApiError::internal(format!("Failed to end session: {e}")))?;
    Ok(Json(ApiResponse::message("Logout successful")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bearer_token() {
        let mut headers = HeaderMap::new();
        assert_eq!(bearer_token(&headers), None);

        headers.insert("Authorization", "Bearer abc123 ".parse().unwrap());
        assert_eq!(bearer_token(&headers).as_deref(), Some("abc123"));

        headers.insert("Authorization", "Basic abc123".parse().unwrap());
        assert_eq!(bearer_token(&headers), None);

        headers.insert("Authorization", "Bearer ".parse().unwrap());
        assert_eq!(bearer_token(&headers), None);
    }

    #[test]
    fn test_login_error_uses_first_message() {
        let mut errors = crate::services::FieldErrors::new();
        errors.add("password", "The password field is required.");
        errors.add("username", "The username field is required.");

        match login_error(AuthError::Validation(errors)) {
            ApiError::Validation { message, .. } => {
                assert_eq!(
                    message,
                    "The password field is required. (and 1 more error)"
                );
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
