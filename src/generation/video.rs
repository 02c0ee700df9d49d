//! Video references submitted by clients.

use crate::error::{Result, VidlearnError};
use regex::Regex;
use std::sync::OnceLock;
use url::Url;

/// A validated video URL plus the identity used to key cached results.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoRef {
    /// URL passed to the model.
    pub url: String,
    /// YouTube video id when recognizable, otherwise the normalized URL.
    pub key: String,
}

fn video_id_regex() -> &'static Regex {
    static VIDEO_ID: OnceLock<Regex> = OnceLock::new();
    VIDEO_ID.get_or_init(|| {
        // Matches the common YouTube URL formats
        Regex::new(
            r"(?x)
            ^(?:https?://)?
            (?:www\.|m\.|music\.)?
            (?:
                youtube\.com/(?:watch\?(?:[^\#]*&)?v=|embed/|v/|shorts/|live/)
                |
                youtu\.be/
            )
            ([a-zA-Z0-9_-]{11})
            (?:[^a-zA-Z0-9_-]|$)
        ",
        )
        .expect("Invalid regex")
    })
}

impl VideoRef {
    /// Validate a client-supplied URL.
    ///
    /// The URL only has to be a well-formed http(s) address; whether it points
    /// at a playable video is discovered by the model call.
    pub fn parse(input: &str) -> Result<Self> {
        let input = input.trim();
        if input.is_empty() {
            return Err(VidlearnError::InvalidInput("youtubeUrl is required".to_string()));
        }

        let parsed = Url::parse(input).map_err(|e| {
            VidlearnError::InvalidInput(format!("youtubeUrl is not a valid URL: {}", e))
        })?;

        if !matches!(parsed.scheme(), "http" | "https") || parsed.host_str().is_none() {
            return Err(VidlearnError::InvalidInput(format!(
                "youtubeUrl must be an http(s) web address, got {}",
                input
            )));
        }

        let key = extract_video_id(input).unwrap_or_else(|| parsed.as_str().to_string());

        Ok(Self {
            url: input.to_string(),
            key,
        })
    }
}

/// Extract the 11-character video id from a YouTube URL.
pub fn extract_video_id(input: &str) -> Option<String> {
    video_id_regex()
        .captures(input.trim())
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_video_id_formats() {
        for url in [
            "https://www.youtube.com/watch?v=dQw4w9WgXcQ",
            "https://youtube.com/watch?feature=share&v=dQw4w9WgXcQ&t=42",
            "https://m.youtube.com/watch?v=dQw4w9WgXcQ",
            "https://youtu.be/dQw4w9WgXcQ?si=abc",
            "https://www.youtube.com/embed/dQw4w9WgXcQ",
            "https://www.youtube.com/shorts/dQw4w9WgXcQ",
        ] {
            assert_eq!(extract_video_id(url).as_deref(), Some("dQw4w9WgXcQ"), "{}", url);
        }
        assert_eq!(extract_video_id("https://example.com/watch?v=dQw4w9WgXcQ"), None);
        assert_eq!(extract_video_id("https://youtu.be/short"), None);
    }

    #[test]
    fn test_same_video_same_key() {
        let a = VideoRef::parse("https://www.youtube.com/watch?v=dQw4w9WgXcQ").unwrap();
        let b = VideoRef::parse(" https://youtu.be/dQw4w9WgXcQ ").unwrap();
        assert_eq!(a.key, b.key);
        assert_eq!(b.url, "https://youtu.be/dQw4w9WgXcQ");
    }

    #[test]
    fn test_non_youtube_url_keyed_by_url() {
        let video = VideoRef::parse("https://vimeo.com/12345").unwrap();
        assert_eq!(video.key, "https://vimeo.com/12345");
    }

    #[test]
    fn test_rejects_missing_and_malformed() {
        let err = VideoRef::parse("   ").unwrap_err();
        assert_eq!(err.to_string(), "Invalid input: youtubeUrl is required");

        assert!(VideoRef::parse("not a url").unwrap_err().is_client_error());
        assert!(VideoRef::parse("ftp://example.com/video").unwrap_err().is_client_error());
        assert!(VideoRef::parse("mailto:someone@example.com").unwrap_err().is_client_error());
    }
}
