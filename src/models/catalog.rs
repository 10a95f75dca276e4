use serde::{Deserialize, Serialize};

use crate::domain::STATUS_ACTIVE;

const fn default_status() -> i32 {
    STATUS_ACTIVE
}

/// Fields an editor supplies when creating or updating a film or series.
#[derive(Debug, Clone, Deserialize)]
pub struct MovieInput {
    #[serde(rename = "type")]
    pub content_type: i32,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Attachment id of the poster
    #[serde(default)]
    pub image: Option<i32>,
    #[serde(default)]
    pub video: Option<String>,
    #[serde(default, rename = "genre_id")]
    pub genre_ids: Vec<i32>,
    #[serde(default)]
    pub age_rating: Option<String>,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub is_subtitles: bool,
    #[serde(default)]
    pub is_dubbed: bool,
    #[serde(default = "default_status")]
    pub status: i32,
}

/// Admin listing filters. Every field is optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MovieFilter {
    pub title: Option<String>,
    #[serde(rename = "type")]
    pub content_type: Option<i32>,
    pub status: Option<i32>,
    pub genre_id: Option<i32>,
    pub language: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GenreInput {
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SeasonInput {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub number_of_season: i32,
    pub movie_id: i32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EpisodeInput {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub season_id: i32,
    #[serde(default)]
    pub video: Option<String>,
    #[serde(default)]
    pub image: Option<i32>,
    #[serde(default)]
    pub duration: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BannerInput {
    #[serde(default)]
    pub position: i32,
    pub movie_id: i32,
    #[serde(default)]
    pub image: Option<i32>,
    #[serde(default = "default_status")]
    pub status: i32,
}

/// Metadata of a file that has already been placed on a storage disk.
#[derive(Debug, Clone, Deserialize)]
pub struct AttachmentInput {
    pub name: String,
    #[serde(default)]
    pub original_name: Option<String>,
    #[serde(default)]
    pub mime: Option<String>,
    #[serde(default)]
    pub extension: Option<String>,
    #[serde(default)]
    pub size: i64,
    #[serde(default)]
    pub path: String,
    #[serde(default)]
    pub disk: Option<String>,
}

/// Partial update of the moderation flags on an end user.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct UserFlagsUpdate {
    pub is_ban: Option<bool>,
    pub is_restric: Option<bool>,
    pub is_admin: Option<bool>,
    pub is_member: Option<bool>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CatalogCounts {
    pub total_movies: u64,
    pub films: u64,
    pub series: u64,
    pub users: u64,
}

/// Poster tile used by every listing rail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MovieCard {
    pub id: i32,
    pub image: Option<String>,
}
