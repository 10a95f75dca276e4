use regex::Regex;
use serde::Serialize;
use std::sync::OnceLock;

/// How a client should play a video link.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum VideoType {
    Youtube,
    Direct,
    Unknown,
}

fn iframe_src_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"<iframe[^>]+src=["']([^"']+)["']"#).expect("Invalid regex")
    })
}

fn youtube_watch_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?:youtube\.com/watch\?v=|youtu\.be/)([a-zA-Z0-9_-]+)").expect("Invalid regex")
    })
}

fn archive_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"archive\.org/(?:embed|details)/([^/?\s"'<>]+)"#).expect("Invalid regex")
    })
}

/// Normalizes an editor-supplied video value into an embeddable URL.
///
/// Accepts plain links, YouTube watch/short/embed links, Archive.org
/// links and raw `<iframe>` markup. Returns `None` when nothing usable
/// can be derived.
#[must_use]
pub fn embed_url(raw: &str) -> Option<String> {
    let mut video = raw.trim().to_string();
    if video.is_empty() {
        return None;
    }

    if let Some(src) = iframe_src_regex()
        .captures(&video)
        .and_then(|caps| caps.get(1))
    {
        video = html_escape::decode_html_entities(src.as_str()).into_owned();
    }

    let video = html_escape::decode_html_entities(&video).into_owned();

    if let Some(id) = youtube_watch_regex()
        .captures(&video)
        .and_then(|caps| caps.get(1))
    {
        return Some(format!("https://www.youtube.com/embed/{}", id.as_str()));
    }

    if video.contains("youtube.com/embed/") || video.contains("youtu.be/embed/") {
        let without_query = video.split('?').next().unwrap_or(&video);
        return Some(without_query.to_string());
    }

    if let Some(id) = archive_regex().captures(&video).and_then(|caps| caps.get(1)) {
        return Some(format!("https://archive.org/embed/{}", id.as_str()));
    }

    if video.starts_with("http") && video.contains("/embed/") {
        return Some(video);
    }

    if url::Url::parse(&video).is_ok_and(|u| u.has_host()) {
        return Some(video);
    }

    None
}

/// The embed URL when one can be derived, otherwise the raw value.
#[must_use]
pub fn playable_video(raw: Option<&str>) -> Option<String> {
    let raw = raw?;
    embed_url(raw).or_else(|| {
        let trimmed = raw.trim();
        (!trimmed.is_empty()).then(|| trimmed.to_string())
    })
}

#[must_use]
pub fn is_youtube_url(url: &str) -> bool {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = RE.get_or_init(|| {
        Regex::new(r"^(https?://)?(www\.)?(youtube\.com|youtu\.be)/.+").expect("Invalid regex")
    });
    re.is_match(url)
}

#[must_use]
pub fn extract_youtube_video_id(url: &str) -> Option<String> {
    static PATTERNS: OnceLock<[Regex; 2]> = OnceLock::new();
    let patterns = PATTERNS.get_or_init(|| {
        [
            Regex::new(r"(?:youtube\.com/watch\?v=|youtu\.be/|youtube\.com/embed/)([^&\n?#]+)")
                .expect("Invalid regex"),
            Regex::new(r"youtube\.com/watch\?.*v=([^&\n?#]+)").expect("Invalid regex"),
        ]
    });

    patterns
        .iter()
        .find_map(|re| re.captures(url)?.get(1).map(|m| m.as_str().to_string()))
}

#[must_use]
pub fn video_type(url: &str) -> VideoType {
    static DIRECT: OnceLock<Regex> = OnceLock::new();

    if url.trim().is_empty() {
        return VideoType::Unknown;
    }

    if is_youtube_url(url) {
        return VideoType::Youtube;
    }

    let direct = DIRECT.get_or_init(|| {
        Regex::new(r"(?i)\.(mp4|m3u8|webm|mov|avi)(\?|$)").expect("Invalid regex")
    });
    if direct.is_match(url) {
        VideoType::Direct
    } else {
        VideoType::Unknown
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_embed_youtube_variants() {
        assert_eq!(
            embed_url("https://www.youtube.com/watch?v=dQw4w9WgXcQ&t=42").as_deref(),
            Some("https://www.youtube.com/embed/dQw4w9WgXcQ")
        );
        assert_eq!(
            embed_url("https://youtu.be/abc_12-3").as_deref(),
            Some("https://www.youtube.com/embed/abc_12-3")
        );
        assert_eq!(
            embed_url("https://www.youtube.com/embed/xyz?autoplay=1").as_deref(),
            Some("https://www.youtube.com/embed/xyz")
        );
    }

    #[test]
    fn test_embed_archive_org() {
        assert_eq!(
            embed_url("https://archive.org/details/night_of_the_living_dead").as_deref(),
            Some("https://archive.org/embed/night_of_the_living_dead")
        );
        assert_eq!(
            embed_url("https://archive.org/embed/Nosferatu1922?start=5").as_deref(),
            Some("https://archive.org/embed/Nosferatu1922")
        );
    }

    #[test]
    fn test_embed_iframe_markup() {
        let iframe = r#"<iframe width="560" height="315" src="https://www.youtube.com/embed/abc123?si=x&amp;y=1" frameborder="0"></iframe>"#;
        assert_eq!(
            embed_url(iframe).as_deref(),
            Some("https://www.youtube.com/embed/abc123")
        );

        let vimeo = r#"<iframe src="https://player.vimeo.com/video/76979871"></iframe>"#;
        assert_eq!(
            embed_url(vimeo).as_deref(),
            Some("https://player.vimeo.com/video/76979871")
        );
    }

    #[test]
    fn test_embed_plain_and_invalid() {
        assert_eq!(
            embed_url("  https://cdn.example.com/movie.mp4  ").as_deref(),
            Some("https://cdn.example.com/movie.mp4")
        );
        assert_eq!(embed_url(""), None);
        assert_eq!(embed_url("   "), None);
        assert_eq!(embed_url("not a link"), None);
    }

    #[test]
    fn test_playable_video_falls_back_to_raw() {
        assert_eq!(
            playable_video(Some("movie-file-17")).as_deref(),
            Some("movie-file-17")
        );
        assert_eq!(
            playable_video(Some("https://youtu.be/abc")).as_deref(),
            Some("https://www.youtube.com/embed/abc")
        );
        assert_eq!(playable_video(Some("  ")), None);
        assert_eq!(playable_video(None), None);
    }

    #[test]
    fn test_extract_youtube_video_id() {
        assert_eq!(
            extract_youtube_video_id("https://youtu.be/abc123").as_deref(),
            Some("abc123")
        );
        assert_eq!(
            extract_youtube_video_id("https://www.youtube.com/watch?v=abc123#t=1").as_deref(),
            Some("abc123")
        );
        assert_eq!(
            extract_youtube_video_id("https://www.youtube.com/watch?feature=share&v=zzz9").as_deref(),
            Some("zzz9")
        );
        assert_eq!(
            extract_youtube_video_id("https://www.youtube.com/embed/emb1?rel=0").as_deref(),
            Some("emb1")
        );
        assert_eq!(extract_youtube_video_id("https://vimeo.com/1"), None);
    }

    #[test]
    fn test_video_type() {
        assert_eq!(video_type("https://youtu.be/abc"), VideoType::Youtube);
        assert_eq!(video_type("youtube.com/watch?v=a"), VideoType::Youtube);
        assert_eq!(video_type("foo.mp4"), VideoType::Direct);
        assert_eq!(video_type("https://cdn.x/stream.M3U8?token=1"), VideoType::Direct);
        assert_eq!(video_type("https://cdn.x/movie.mp4.html"), VideoType::Unknown);
        assert_eq!(video_type("garbage"), VideoType::Unknown);
        assert_eq!(video_type(""), VideoType::Unknown);
    }
}
