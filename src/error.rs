//! Error types for Vidlearn.

use thiserror::Error;

/// Library-level error type for Vidlearn operations.
#[derive(Error, Debug)]
pub enum VidlearnError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Gemini request failed: {0}")]
    Provider(String),

    #[error("Empty response from Gemini")]
    EmptyResponse,

    #[error("Failed to parse Gemini response as JSON: {message} (response began: {snippet})")]
    Parse { message: String, snippet: String },

    #[error("Gemini response failed schema validation: {}", .0.join("; "))]
    SchemaValidation(Vec<String>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

impl VidlearnError {
    /// Whether the error was caused by the caller rather than by generation.
    pub fn is_client_error(&self) -> bool {
        matches!(self, VidlearnError::InvalidInput(_))
    }
}

/// Result type alias for Vidlearn operations.
pub type Result<T> = std::result::Result<T, VidlearnError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_validation_lists_every_field() {
        let err = VidlearnError::SchemaValidation(vec![
            "quiz[0].options: expected exactly 4 items, got 3".to_string(),
            "keyTakeaways: expected 3-8 items, got 1".to_string(),
        ]);
        let msg = err.to_string();
        assert!(msg.contains("quiz[0].options"));
        assert!(msg.contains("keyTakeaways"));
    }

    #[test]
    fn test_client_error_classification() {
        assert!(VidlearnError::InvalidInput("x".into()).is_client_error());
        assert!(!VidlearnError::EmptyResponse.is_client_error());
        assert!(!VidlearnError::Provider("quota".into()).is_client_error());
    }

    #[test]
    fn test_parse_error_message_carries_snippet() {
        let err = crate::sanitize::parse_json("```python\nprint(1)").unwrap_err();
        assert!(matches!(err, VidlearnError::Parse { .. }));
        assert!(err.to_string().contains("response began: ```python"));
        assert!(!err.is_client_error());
    }
}
