//! Client for the Vidlearn HTTP API.
//!
//! Mirrors what a browser front end does: fetch a transcript, fetch study
//! materials (transcribing first when no transcript is held for the video),
//! and expose a status and error message for display.

use crate::error::{Result, VidlearnError};
use crate::schema::{CourseData, TranscriptData};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::debug;

/// Progress of the most recent fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FetchStatus {
    #[default]
    Idle,
    Loading,
    Error,
}

#[derive(Deserialize)]
struct ErrorBody {
    error: String,
}

/// Stateful API client.
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    status: FetchStatus,
    error: Option<String>,
    /// Last transcript fetched, with the URL it belongs to.
    transcript: Option<(String, TranscriptData)>,
}

impl ApiClient {
    /// Create a client for an API rooted at `base_url` (e.g. `http://localhost:3000/api`).
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            status: FetchStatus::Idle,
            error: None,
            transcript: None,
        }
    }

    pub fn status(&self) -> FetchStatus {
        self.status
    }

    /// Message of the last failure, cleared when a new fetch starts.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Transcript held for `youtube_url`, if any.
    pub fn transcript_for(&self, youtube_url: &str) -> Option<&TranscriptData> {
        self.transcript
            .as_ref()
            .filter(|(url, _)| url == youtube_url)
            .map(|(_, t)| t)
    }

    /// Fetch the transcript for a video.
    pub async fn fetch_transcript(&mut self, youtube_url: &str) -> Result<TranscriptData> {
        self.begin();
        let result = self.post::<TranscriptData>("/transcribe", youtube_url).await;
        if let Ok(transcript) = &result {
            self.transcript = Some((youtube_url.to_string(), transcript.clone()));
        }
        self.finish(result)
    }

    /// Fetch study materials, transcribing first when no transcript is held.
    pub async fn fetch_study_materials(&mut self, youtube_url: &str) -> Result<CourseData> {
        if self.transcript_for(youtube_url).is_none() {
            debug!("No transcript held for {}, fetching it first", youtube_url);
            self.fetch_transcript(youtube_url).await?;
        }

        self.begin();
        let result = self.post::<CourseData>("/study-materials", youtube_url).await;
        self.finish(result)
    }

    fn begin(&mut self) {
        self.status = FetchStatus::Loading;
        self.error = None;
    }

    fn finish<T>(&mut self, result: Result<T>) -> Result<T> {
        match &result {
            Ok(_) => self.status = FetchStatus::Idle,
            Err(e) => {
                self.status = FetchStatus::Error;
                self.error = Some(match e {
                    VidlearnError::InvalidInput(message) | VidlearnError::Provider(message) => {
                        message.clone()
                    }
                    other => other.to_string(),
                });
            }
        }
        result
    }

    async fn post<T: DeserializeOwned>(&self, path: &str, youtube_url: &str) -> Result<T> {
        let response = self
            .http
            .post(format!("{}{}", self.base_url, path))
            .json(&serde_json::json!({ "youtubeUrl": youtube_url }))
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            return Ok(response.json().await?);
        }

        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorBody>(&body)
            .map(|b| b.error)
            .unwrap_or_else(|_| format!("{} {}", status, body));

        if status == StatusCode::BAD_REQUEST {
            Err(VidlearnError::InvalidInput(message))
        } else {
            Err(VidlearnError::Provider(message))
        }
    }
}
