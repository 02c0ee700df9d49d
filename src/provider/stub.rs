//! Scripted generator for tests.

use super::{ContentGenerator, GenerationRequest};
use crate::error::{Result, VidlearnError};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;

/// What the stub saw for one call.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub video_url: Option<String>,
    pub prompt: String,
    pub structured: bool,
}

/// Replays canned replies in order and records every request.
pub struct StubGenerator {
    replies: Mutex<VecDeque<Result<String>>>,
    requests: Mutex<Vec<RecordedRequest>>,
}

impl StubGenerator {
    pub fn new(replies: Vec<Result<String>>) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn replying(replies: &[&str]) -> Self {
        Self::new(replies.iter().map(|r| Ok(r.to_string())).collect())
    }

    pub fn calls(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl ContentGenerator for StubGenerator {
    async fn generate(&self, request: GenerationRequest<'_>) -> Result<String> {
        self.requests.lock().unwrap().push(RecordedRequest {
            video_url: request.video_url.map(str::to_string),
            prompt: request.prompt.to_string(),
            structured: request.response_schema.is_some(),
        });
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(VidlearnError::Provider("no scripted reply left".to_string())))
    }

    fn name(&self) -> &str {
        "stub"
    }

    fn model(&self) -> &str {
        "stub-model"
    }
}
