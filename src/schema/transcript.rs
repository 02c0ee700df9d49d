//! Transcript document.

use super::{field, Validate, Violations};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

/// A transcript of a video's audio.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscriptData {
    /// Concise summary of the whole video.
    pub summary: String,
    /// Spoken segments in chronological order.
    pub segments: Vec<TranscriptSegment>,
}

/// A single spoken segment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscriptSegment {
    /// Start of the segment, `MM:SS` (or `H:MM:SS` for long videos).
    pub timestamp: String,
    pub speaker: String,
    pub text: String,
    /// Language name, e.g. "English".
    pub language: String,
    /// Language code, e.g. "en".
    pub language_code: String,
}

fn timestamp_regex() -> &'static Regex {
    static TIMESTAMP: OnceLock<Regex> = OnceLock::new();
    TIMESTAMP.get_or_init(|| {
        Regex::new(r"^(\d{1,3}):([0-5]\d)(?::([0-5]\d))?$").expect("Invalid regex")
    })
}

impl TranscriptSegment {
    /// Offset of the segment in seconds, or `None` if the timestamp is malformed.
    pub fn seconds(&self) -> Option<u32> {
        let caps = timestamp_regex().captures(self.timestamp.trim())?;
        let first: u32 = caps.get(1)?.as_str().parse().ok()?;
        let second: u32 = caps.get(2)?.as_str().parse().ok()?;
        match caps.get(3) {
            Some(third) => {
                let third: u32 = third.as_str().parse().ok()?;
                Some(first * 3600 + second * 60 + third)
            }
            None => Some(first * 60 + second),
        }
    }
}

impl TranscriptData {
    /// Format the transcript as timestamped lines, one per segment.
    pub fn format_with_timestamps(&self) -> String {
        self.segments
            .iter()
            .map(|s| format!("[{}] {}: {}", s.timestamp, s.speaker, s.text))
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Distinct language codes in order of first appearance.
    pub fn language_codes(&self) -> Vec<&str> {
        let mut codes: Vec<&str> = Vec::new();
        for segment in &self.segments {
            if !codes.contains(&segment.language_code.as_str()) {
                codes.push(&segment.language_code);
            }
        }
        codes
    }
}

impl Validate for TranscriptData {
    fn collect_violations(&self, path: &str, violations: &mut Violations) {
        let mut previous: Option<u32> = None;

        for (i, segment) in self.segments.iter().enumerate() {
            let segment_path = format!("{}[{}]", field(path, "segments"), i);

            match segment.seconds() {
                Some(secs) => {
                    if let Some(prev) = previous {
                        if secs < prev {
                            violations.push(
                                &field(&segment_path, "timestamp"),
                                format!("{} is earlier than the previous segment", segment.timestamp),
                            );
                        }
                    }
                    previous = Some(secs);
                }
                None => violations.push(
                    &field(&segment_path, "timestamp"),
                    format!("expected MM:SS, got {:?}", segment.timestamp),
                ),
            }
        }
    }
}
