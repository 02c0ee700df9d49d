//! Generation service.
//!
//! Turns a video URL into validated transcripts and study materials by
//! prompting a [`ContentGenerator`] and running its reply through the
//! sanitize → parse → validate boundary.
//!
//! Every video is derived through one step keyed by its identity: the
//! transcript is generated once and reused, both as a cached answer and as
//! grounding context for the study-material prompt.

mod cache;
mod video;

pub use cache::VideoCache;
pub use video::{extract_video_id, VideoRef};

use crate::config::{Prompts, Settings};
use crate::error::{Result, VidlearnError};
use crate::provider::{ContentGenerator, GenerationRequest};
use crate::sanitize::{parse_json, snippet, strip_code_fence, SNIPPET_LEN};
use crate::schema::{
    course_response_schema, decode, transcript_response_schema, CourseData, ReferencePolicy,
    TranscriptData, Validate,
};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

/// Interpret a raw model reply as a validated document.
///
/// An empty reply fails before any parsing is attempted.
pub fn interpret_reply<T>(raw: &str) -> Result<T>
where
    T: DeserializeOwned + Validate,
{
    if raw.trim().is_empty() {
        return Err(VidlearnError::EmptyResponse);
    }

    let sanitized = strip_code_fence(raw);
    let value = parse_json(sanitized).inspect_err(|_| {
        warn!("JSON parse error on reply: {}", snippet(sanitized, SNIPPET_LEN));
    })?;

    decode(value)
}

/// Service producing transcripts and study materials for videos.
pub struct GenerationService {
    generator: Arc<dyn ContentGenerator>,
    prompts: Prompts,
    reference_policy: ReferencePolicy,
    cache: VideoCache,
}

impl GenerationService {
    /// Create a service from settings, loading custom prompts if configured.
    pub fn new(settings: &Settings, generator: Arc<dyn ContentGenerator>) -> Result<Self> {
        let prompts = Prompts::load(
            settings.prompts.custom_dir.as_deref(),
            Some(&settings.prompts.variables),
        )?;

        Ok(Self::with_components(
            generator,
            prompts,
            settings.generation.reference_policy,
            VideoCache::new(&settings.cache),
        ))
    }

    /// Create a service with custom components.
    pub fn with_components(
        generator: Arc<dyn ContentGenerator>,
        prompts: Prompts,
        reference_policy: ReferencePolicy,
        cache: VideoCache,
    ) -> Self {
        Self {
            generator,
            prompts,
            reference_policy,
            cache,
        }
    }

    /// Get a reference to the generator.
    pub fn generator(&self) -> &dyn ContentGenerator {
        self.generator.as_ref()
    }

    /// Get a reference to the cache.
    pub fn cache(&self) -> &VideoCache {
        &self.cache
    }

    /// Produce a transcript of the video's audio.
    #[instrument(skip(self))]
    pub async fn transcribe(&self, youtube_url: &str) -> Result<TranscriptData> {
        let video = VideoRef::parse(youtube_url)?;
        self.transcript_for(&video).await
    }

    /// Produce study materials for the video.
    #[instrument(skip(self))]
    pub async fn study_materials(&self, youtube_url: &str) -> Result<CourseData> {
        let video = VideoRef::parse(youtube_url)?;
        self.course_for(&video).await
    }

    /// Legacy combined flow: transcribe, then derive study materials.
    ///
    /// Shares the pipeline and schema of [`Self::study_materials`], which
    /// already transcribes before deriving.
    #[instrument(skip(self))]
    pub async fn extract(&self, youtube_url: &str) -> Result<CourseData> {
        let video = VideoRef::parse(youtube_url)?;
        info!("Legacy extract for {}", video.key);
        self.course_for(&video).await
    }

    async fn transcript_for(&self, video: &VideoRef) -> Result<TranscriptData> {
        if let Some(transcript) = self.cache.transcript(&video.key) {
            info!("Reusing cached transcript for {}", video.key);
            return Ok(transcript);
        }

        info!("Transcribing {} with {}", video.url, self.generator.model());
        let prompt = self.prompts.transcription_prompt();
        let raw = self
            .generator
            .generate(GenerationRequest::structured(
                &video.url,
                &prompt,
                transcript_response_schema(),
            ))
            .await?;
        debug!("Raw transcript reply length: {}", raw.len());

        let transcript: TranscriptData = interpret_reply(&raw)?;
        if transcript.segments.is_empty() {
            warn!("Transcript for {} has no segments", video.key);
        }
        info!(
            "Validated transcript with {} segments ({})",
            transcript.segments.len(),
            transcript.language_codes().join(", ")
        );

        self.cache.put_transcript(&video.key, transcript.clone());
        Ok(transcript)
    }

    async fn course_for(&self, video: &VideoRef) -> Result<CourseData> {
        if let Some(course) = self.cache.course(&video.key) {
            info!("Reusing cached study materials for {}", video.key);
            return Ok(course);
        }

        let transcript = self.transcript_for(video).await?;

        info!("Generating study materials for {}", video.url);
        let prompt = self
            .prompts
            .study_materials_prompt(Some(&transcript.format_with_timestamps()));
        let raw = self
            .generator
            .generate(GenerationRequest::structured(
                &video.url,
                &prompt,
                course_response_schema(),
            ))
            .await?;
        debug!("Raw study materials reply length: {}", raw.len());

        let mut course: CourseData = interpret_reply(&raw)?;
        let repaired = course.resolve_references(self.reference_policy)?;
        if repaired > 0 {
            warn!("Repaired {} dangling objective references", repaired);
        }
        if course.transcript_summary.is_none() {
            course.transcript_summary = Some(transcript.summary.clone());
        }

        info!(
            "Validated study materials: {} sections, {} subsections, {} quiz questions, {} key takeaways",
            course.sections.len(),
            course.subsection_count(),
            course.quiz.len(),
            course.key_takeaways.len()
        );

        self.cache.put_course(&video.key, course.clone());
        debug!("{} videos cached", self.cache.len());
        Ok(course)
    }
}
