//! Data contracts for generated content.
//!
//! Defines the transcript and study-material documents, the response schemas
//! sent to the model, and the constraint checks a parsed reply must pass
//! before it is trusted.

mod course;
mod response;
mod transcript;

pub use course::{
    CourseData, LearningObjective, QuizQuestion, ReferencePolicy, Section, Subsection,
    TechnicalTerm,
};
pub use response::{course_response_schema, transcript_response_schema};
pub use transcript::{TranscriptData, TranscriptSegment};

use crate::error::{Result, VidlearnError};
use serde::de::DeserializeOwned;

/// Constraint checks on a parsed document.
pub trait Validate {
    /// Record every violated constraint, prefixing field paths with `path`.
    fn collect_violations(&self, path: &str, violations: &mut Violations);

    /// Check all constraints, failing with every violation found.
    fn validate(&self) -> Result<()> {
        let mut violations = Violations::default();
        self.collect_violations("", &mut violations);
        violations.into_result()
    }
}

/// Accumulator for violated fields.
#[derive(Debug, Default)]
pub struct Violations(Vec<String>);

impl Violations {
    pub fn push(&mut self, field: &str, message: impl std::fmt::Display) {
        self.0.push(format!("{}: {}", field, message));
    }

    /// Check that a list length lies within `min..=max` (`max = None` is unbounded).
    pub fn check_len(&mut self, field: &str, len: usize, min: usize, max: Option<usize>) {
        let ok = len >= min && max.map_or(true, |max| len <= max);
        if ok {
            return;
        }
        let expected = match max {
            Some(max) if max == min => format!("exactly {}", min),
            Some(max) => format!("{}-{}", min, max),
            None => format!("at least {}", min),
        };
        self.push(field, format!("expected {} items, got {}", expected, len));
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_result(self) -> Result<()> {
        if self.0.is_empty() {
            Ok(())
        } else {
            Err(VidlearnError::SchemaValidation(self.0))
        }
    }
}

/// Join a parent path and a child field name.
pub(crate) fn field(path: &str, name: &str) -> String {
    if path.is_empty() {
        name.to_string()
    } else {
        format!("{}.{}", path, name)
    }
}

/// Decode a parsed JSON value into a document and validate it.
///
/// Shape mismatches (missing fields, wrong types) and constraint violations
/// both surface as [`VidlearnError::SchemaValidation`].
pub fn decode<T>(value: serde_json::Value) -> Result<T>
where
    T: DeserializeOwned + Validate,
{
    let doc: T = serde_json::from_value(value)
        .map_err(|e| VidlearnError::SchemaValidation(vec![e.to_string()]))?;
    doc.validate()?;
    Ok(doc)
}
