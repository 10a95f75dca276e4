//! Absolute image URLs for attachment records.

use std::collections::HashMap;

use anyhow::Result;
use url::Url;

use crate::db::Store;
use crate::entities::{attachments, movies};
use crate::models::catalog::MovieCard;

/// Turns attachment rows into URLs the mobile client can load.
#[derive(Debug, Clone, Default)]
pub struct ImageService {
    storage_url: Option<String>,
}

/// Path of the stored file relative to the disk root, e.g. `2024/05/ab12.jpg`.
#[must_use]
pub fn physical_path(attachment: &attachments::Model) -> String {
    let dir = attachment.path.trim_start_matches('/');
    match attachment.extension.as_deref().filter(|e| !e.is_empty()) {
        Some(ext) => format!("{dir}{}.{ext}", attachment.name),
        None => format!("{dir}{}", attachment.name),
    }
}

impl ImageService {
    #[must_use]
    pub const fn new(storage_url: Option<String>) -> Self {
        Self { storage_url }
    }

    fn storage_root(&self, base: &str) -> String {
        self.storage_url.as_deref().map_or_else(
            || format!("{base}/storage"),
            |url| url.trim_end_matches('/').to_string(),
        )
    }

    /// URL the storage disk reports for an attachment, before any rewriting.
    fn raw_url(&self, attachment: &attachments::Model, base: &str) -> String {
        if attachment.path.starts_with("http") {
            return attachment.path.clone();
        }
        format!("{}/{}", self.storage_root(base), physical_path(attachment))
    }

    /// Resolves one attachment against the request base (`scheme://host`).
    #[must_use]
    pub fn resolve(&self, attachment: &attachments::Model, base: &str) -> String {
        let base = base.trim_end_matches('/');
        let mut url = self.raw_url(attachment, base);

        // Files uploaded on a dev box keep pointing at the dev host otherwise.
        if url.contains("127.0.0.1") || url.contains("localhost") {
            let path = Url::parse(&url).map_or_else(|_| String::new(), |u| u.path().to_string());
            url = format!("{base}{path}");
        }

        if url.is_empty() || !url.starts_with("http") {
            return format!("{base}/storage/{}", physical_path(attachment));
        }
        url
    }

    /// Loads every attachment in `ids` with one query and resolves them.
    ///
    /// Ids without a row are absent from the map.
    pub async fn resolve_many(
        &self,
        store: &Store,
        ids: impl IntoIterator<Item = Option<i32>>,
        base: &str,
    ) -> Result<HashMap<i32, String>> {
        let mut wanted: Vec<i32> = ids.into_iter().flatten().collect();
        wanted.sort_unstable();
        wanted.dedup();

        let attachments = store.get_attachments(&wanted).await?;
        Ok(attachments
            .iter()
            .map(|a| (a.id, self.resolve(a, base)))
            .collect())
    }

    /// Poster cards for `items`, keeping their order.
    pub async fn movie_cards(
        &self,
        store: &Store,
        items: &[movies::Model],
        base: &str,
    ) -> Result<Vec<MovieCard>> {
        let images = self
            .resolve_many(store, items.iter().map(|m| m.image), base)
            .await?;

        Ok(items
            .iter()
            .map(|m| MovieCard {
                id: m.id,
                image: m.image.and_then(|id| images.get(&id).cloned()),
            })
            .collect())
    }

    /// Resolves a single optional attachment id.
    pub async fn resolve_id(
        &self,
        store: &Store,
        id: Option<i32>,
        base: &str,
    ) -> Result<Option<String>> {
        let Some(id) = id else {
            return Ok(None);
        };
        Ok(store
            .get_attachment(id)
            .await?
            .map(|a| self.resolve(&a, base)))
    }
}

/// Public URL of a user avatar stored on the public disk.
#[must_use]
pub fn avatar_url(base: &str, avatar: Option<&str>) -> Option<String> {
    avatar
        .filter(|a| !a.is_empty())
        .map(|a| format!("{}/storage/{}", base.trim_end_matches('/'), a.trim_start_matches('/')))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn attachment(path: &str, name: &str, ext: Option<&str>) -> attachments::Model {
        attachments::Model {
            id: 1,
            name: name.to_string(),
            original_name: format!("{name}.jpg"),
            mime: Some("image/jpeg".to_string()),
            extension: ext.map(str::to_string),
            size: 1024,
            path: path.to_string(),
            disk: "public".to_string(),
            created_at: "2026-01-01T00:00:00Z".to_string(),
        }
    }

    #[test]
    fn test_storage_url_from_request_base() {
        let service = ImageService::default();
        let a = attachment("2026/01/01/", "abc", Some("jpg"));
        assert_eq!(
            service.resolve(&a, "https://cdn.example.com"),
            "https://cdn.example.com/storage/2026/01/01/abc.jpg"
        );
    }

    #[test]
    fn test_configured_storage_url() {
        let service = ImageService::new(Some("https://files.example.com/media/".to_string()));
        let a = attachment("posters/", "p1", Some("png"));
        assert_eq!(
            service.resolve(&a, "https://api.example.com"),
            "https://files.example.com/media/posters/p1.png"
        );
    }

    #[test]
    fn test_external_path_is_kept() {
        let service = ImageService::default();
        let a = attachment("https://img.example.org/x.jpg", "x", Some("jpg"));
        assert_eq!(
            service.resolve(&a, "https://api.example.com"),
            "https://img.example.org/x.jpg"
        );
    }

    #[test]
    fn test_localhost_is_rewritten() {
        let service = ImageService::new(Some("http://127.0.0.1:8000/storage".to_string()));
        let a = attachment("2026/02/", "poster", Some("webp"));
        assert_eq!(
            service.resolve(&a, "https://reel.example.com"),
            "https://reel.example.com/storage/2026/02/poster.webp"
        );
    }

    #[test]
    fn test_non_http_falls_back_to_storage() {
        let service = ImageService::new(Some("s3://bucket".to_string()));
        let a = attachment("/covers/", "c", None);
        assert_eq!(
            service.resolve(&a, "https://reel.example.com/"),
            "https://reel.example.com/storage/covers/c"
        );
    }

    #[test]
    fn test_avatar_url() {
        assert_eq!(
            avatar_url("https://reel.example.com", Some("avatars/u1.png")).as_deref(),
            Some("https://reel.example.com/storage/avatars/u1.png")
        );
        assert_eq!(avatar_url("https://reel.example.com", None), None);
        assert_eq!(avatar_url("https://reel.example.com", Some("")), None);
    }
}
