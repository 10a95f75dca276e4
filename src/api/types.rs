use serde::Serialize;

use crate::db::User;
use crate::entities::{attachments, banner, episode, genres, movies, season};
use crate::models::Page;
use crate::models::page::PageInfo;
use crate::parser::genre::parse_genre_ids;
use crate::services::FieldErrors;

/// Envelope shared by every endpoint.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pagination: Option<PageInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<FieldErrors>,
}

impl<T> ApiResponse<T> {
    pub const fn success(data: T) -> Self {
        Self {
            success: true,
            message: None,
            data: Some(data),
            pagination: None,
            errors: None,
        }
    }

    pub fn with_message(message: impl Into<String>, data: T) -> Self {
        Self {
            message: Some(message.into()),
            ..Self::success(data)
        }
    }

    /// Success without a payload.
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: Some(message.into()),
            data: None,
            pagination: None,
            errors: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: Some(message.into()),
            data: None,
            pagination: None,
            errors: None,
        }
    }

    pub fn validation(message: impl Into<String>, errors: FieldErrors) -> Self {
        Self {
            errors: (!errors.is_empty()).then_some(errors),
            ..Self::error(message)
        }
    }
}

impl<T> ApiResponse<Vec<T>> {
    pub fn page(message: impl Into<String>, page: Page<T>) -> Self {
        let info = page.info();
        Self {
            pagination: Some(info),
            ..Self::with_message(message, page.items)
        }
    }
}

#[derive(Debug, Serialize)]
pub struct GenreDto {
    pub id: i32,
    pub name: String,
    pub created_at: String,
    pub updated_at: String,
}

impl From<genres::Model> for GenreDto {
    fn from(model: genres::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

/// Editor view of a film or series. The genre column is exposed as ids.
#[derive(Debug, Serialize)]
pub struct MovieDto {
    pub id: i32,
    #[serde(rename = "type")]
    pub content_type: i32,
    pub title: String,
    pub description: Option<String>,
    pub image: Option<i32>,
    pub video: Option<String>,
    pub genre_id: Vec<i32>,
    pub age_rating: Option<String>,
    pub language: Option<String>,
    pub is_subtitles: bool,
    pub is_dubbed: bool,
    pub like_count: i32,
    pub view_count: i32,
    pub user_web_id: Option<i32>,
    pub status: i32,
    pub created_at: String,
    pub updated_at: String,
}

impl From<movies::Model> for MovieDto {
    fn from(model: movies::Model) -> Self {
        Self {
            id: model.id,
            content_type: model.content_type,
            genre_id: parse_genre_ids(model.genre_id.as_deref().unwrap_or_default()),
            title: model.title,
            description: model.description,
            image: model.image,
            video: model.video,
            age_rating: model.age_rating,
            language: model.language,
            is_subtitles: model.is_subtitles,
            is_dubbed: model.is_dubbed,
            like_count: model.like_count,
            view_count: model.view_count.unwrap_or(0),
            user_web_id: model.user_web_id,
            status: model.status,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SeasonDto {
    pub id: i32,
    pub title: String,
    pub description: Option<String>,
    pub number_of_season: i32,
    pub movie_id: i32,
    pub created_at: String,
    pub updated_at: String,
}

impl From<season::Model> for SeasonDto {
    fn from(model: season::Model) -> Self {
        Self {
            id: model.id,
            title: model.title,
            description: model.description,
            number_of_season: model.number_of_season,
            movie_id: model.movie_id,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct EpisodeDto {
    pub id: i32,
    pub title: String,
    pub description: Option<String>,
    pub season_id: i32,
    pub video: Option<String>,
    pub image: Option<i32>,
    pub duration: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<episode::Model> for EpisodeDto {
    fn from(model: episode::Model) -> Self {
        Self {
            id: model.id,
            title: model.title,
            description: model.description,
            season_id: model.season_id,
            video: model.video,
            image: model.image,
            duration: model.duration,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct BannerDto {
    pub id: i32,
    pub position: i32,
    pub movie_id: i32,
    pub image: Option<i32>,
    pub status: i32,
    pub created_at: String,
    pub updated_at: String,
}

impl From<banner::Model> for BannerDto {
    fn from(model: banner::Model) -> Self {
        Self {
            id: model.id,
            position: model.position,
            movie_id: model.movie_id,
            image: model.image,
            status: model.status,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct AttachmentDto {
    pub id: i32,
    pub name: String,
    pub original_name: String,
    pub mime: Option<String>,
    pub extension: Option<String>,
    pub size: i64,
    pub path: String,
    pub disk: String,
    /// Public URL as the catalog endpoints would render it
    pub url: String,
    pub created_at: String,
}

impl AttachmentDto {
    pub fn new(model: attachments::Model, url: String) -> Self {
        Self {
            id: model.id,
            name: model.name,
            original_name: model.original_name,
            mime: model.mime,
            extension: model.extension,
            size: model.size,
            path: model.path,
            disk: model.disk,
            url,
            created_at: model.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct UserDto {
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

impl From<User> for UserDto {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            username: user.username,
            is_member: user.is_member,
            is_ban: user.is_ban,
            is_restric: user.is_restric,
            is_admin: user.is_admin,
            avatar: user.avatar,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}
