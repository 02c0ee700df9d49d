//! Vidlearn - Study Materials from YouTube Videos
//!
//! An HTTP relay that sends a YouTube URL to Gemini and turns the reply into
//! a validated transcript or a structured course.
//!
//! # Overview
//!
//! Vidlearn allows you to:
//! - Transcribe a YouTube video into timestamped, speaker-labelled segments
//! - Derive study materials (objectives, sections, takeaways, quiz) from it
//! - Serve both over a small JSON API for a browser front end
//!
//! Every model reply goes through the same three stages: sanitize (strip
//! code fences), parse (JSON), validate (shape and value constraints).
//!
//! # Architecture
//!
//! - `config` - Settings and prompt templates
//! - `provider` - Content generator abstraction and the Gemini client
//! - `sanitize` - Reply cleanup and JSON parsing
//! - `schema` - Transcript and course types with their validators
//! - `generation` - Request pipeline and per-video cache
//! - `client` - Client for the HTTP API
//! - `cli` - Command-line interface and HTTP server
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use vidlearn::config::Settings;
//! use vidlearn::generation::GenerationService;
//! use vidlearn::provider::GeminiClient;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let settings = Settings::load()?;
//!     let client = GeminiClient::new(&settings.gemini, settings.api_key()?)?;
//!     let service = GenerationService::new(&settings, Arc::new(client))?;
//!
//!     let transcript = service
//!         .transcribe("https://www.youtube.com/watch?v=dQw4w9WgXcQ")
//!         .await?;
//!     println!("{}", transcript.format_with_timestamps());
//!
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod client;
pub mod config;
pub mod error;
pub mod generation;
pub mod provider;
pub mod sanitize;
pub mod schema;

#[cfg(test)]
mod testing;

pub use error::{Result, VidlearnError};
