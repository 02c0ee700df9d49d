//! Configuration module for Vidlearn.
//!
//! Handles loading and managing application settings and prompt templates.

mod prompts;
mod settings;

pub use prompts::{Prompts, StudyMaterialPrompts, TranscriptionPrompts};
pub use settings::{
    CacheSettings, GeminiSettings, GeneralSettings, GenerationSettings, PromptSettings,
    ServerSettings, Settings,
};
