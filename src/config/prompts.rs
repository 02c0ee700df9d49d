//! Prompt templates for Vidlearn.
//!
//! Prompts can be customized by placing TOML files in the custom prompts directory.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

/// Collection of all prompt templates.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct Prompts {
    pub transcription: TranscriptionPrompts,
    pub study_materials: StudyMaterialPrompts,
    /// Custom variables from config, available in all prompts.
    #[serde(skip)]
    pub variables: HashMap<String, String>,
}

/// Prompts for transcript generation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TranscriptionPrompts {
    pub instructions: String,
}

impl Default for TranscriptionPrompts {
    fn default() -> Self {
        Self {
            instructions: r#"You are a transcription engine.

Transcribe the ENTIRE audio from the provided YouTube video.

Rules:
- Do not summarize or omit content
- Preserve spoken wording as accurately as possible
- Split content into logical segments
- Include a timestamp in MM:SS format for every segment, in chronological order
- Label speakers consistently (Speaker 1, Speaker 2, or their names if stated)
- Record the language of every segment with its name and code

Output must strictly match the provided JSON schema.
Do not include commentary or markdown."#
                .to_string(),
        }
    }
}

/// Prompts for study-material generation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StudyMaterialPrompts {
    pub instructions: String,
    /// Appended to the instructions when a transcript is available.
    /// `{{transcript}}` is replaced with the timestamped transcript.
    pub transcript_context: String,
}

impl Default for StudyMaterialPrompts {
    fn default() -> Self {
        Self {
            instructions: r#"You are an expert educator who turns video content into complete, university-quality study materials.

Coverage:
- Cover EVERY major concept discussed in the video, including ones mentioned only briefly
- Create as many sections as the material needs (at least 2)

Depth:
- Explain as if teaching someone meeting the material for the first time
- Define all technical terms and jargon
- Explain processes step by step and include the "why" and "how"

Structure:
- Write 2-6 measurable learning objectives, numbered with ids starting at 1
- Every section must set objectiveId to the id of one of those objectives
- Split complex sections into several subsections; simple topics may have one
- Give each section 2-6 key points

Enhancements:
- Define technical terms, give practical examples and analogies
- List common misconceptions and real-world applications
- Finish with 3-8 key takeaways for the whole video
- Write 3-8 multiple choice questions with exactly 4 options each and the
  index (0-3) of the correct option, testing understanding rather than recall

Accuracy:
- Base ALL content strictly on what the video says
- Do not introduce concepts or examples the video does not support

Output must strictly match the provided JSON schema.
Do not include commentary or markdown."#
                .to_string(),

            transcript_context: r#"A transcript of this video has already been produced. Treat it as the authoritative record of what was said:

{{transcript}}"#
                .to_string(),
        }
    }
}

impl Prompts {
    /// Load prompts from the default location, with optional custom directory and variables.
    pub fn load(
        custom_dir: Option<&str>,
        custom_variables: Option<&HashMap<String, String>>,
    ) -> crate::error::Result<Self> {
        let mut prompts = Prompts::default();

        if let Some(vars) = custom_variables {
            prompts.variables = vars.clone();
        }

        if let Some(dir) = custom_dir {
            let custom_path = PathBuf::from(shellexpand::tilde(dir).to_string());

            let transcription_path = custom_path.join("transcription.toml");
            if transcription_path.exists() {
                let content = std::fs::read_to_string(&transcription_path)?;
                prompts.transcription = toml::from_str(&content)?;
            }

            let study_path = custom_path.join("study_materials.toml");
            if study_path.exists() {
                let content = std::fs::read_to_string(&study_path)?;
                prompts.study_materials = toml::from_str(&content)?;
            }
        }

        Ok(prompts)
    }

    /// Render a prompt template with the given variables.
    pub fn render(template: &str, vars: &HashMap<String, String>) -> String {
        let mut result = template.to_string();
        for (key, value) in vars {
            result = result.replace(&format!("{{{{{}}}}}", key), value);
        }
        result
    }

    /// Render a prompt template with both provided variables and custom config variables.
    /// Provided variables take precedence over custom config variables.
    pub fn render_with_custom(&self, template: &str, vars: &HashMap<String, String>) -> String {
        let mut merged = self.variables.clone();
        for (key, value) in vars {
            merged.insert(key.clone(), value.clone());
        }
        Self::render(template, &merged)
    }

    /// Full transcription prompt.
    pub fn transcription_prompt(&self) -> String {
        self.render_with_custom(&self.transcription.instructions, &HashMap::new())
    }

    /// Full study-material prompt, grounded on `transcript` when given.
    pub fn study_materials_prompt(&self, transcript: Option<&str>) -> String {
        let mut prompt =
            self.render_with_custom(&self.study_materials.instructions, &HashMap::new());

        if let Some(transcript) = transcript {
            let mut vars = HashMap::new();
            vars.insert("transcript".to_string(), transcript.to_string());
            prompt.push_str("\n\n");
            prompt.push_str(&self.render_with_custom(&self.study_materials.transcript_context, &vars));
        }

        prompt
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_prompts() {
        let prompts = Prompts::default();
        assert!(prompts.transcription.instructions.contains("JSON schema"));
        assert!(prompts.study_materials.transcript_context.contains("{{transcript}}"));
    }

    #[test]
    fn test_render_template() {
        let template = "Hello {{name}}, you have {{count}} messages.";
        let mut vars = HashMap::new();
        vars.insert("name".to_string(), "Alice".to_string());
        vars.insert("count".to_string(), "5".to_string());

        let result = Prompts::render(template, &vars);
        assert_eq!(result, "Hello Alice, you have 5 messages.");
    }

    #[test]
    fn test_study_prompt_embeds_transcript() {
        let prompts = Prompts::default();
        let without = prompts.study_materials_prompt(None);
        let with = prompts.study_materials_prompt(Some("[00:00] Speaker 1: Hello"));

        assert!(!without.contains("authoritative record"));
        assert!(with.starts_with(&without));
        assert!(with.ends_with("[00:00] Speaker 1: Hello"));
    }

    #[test]
    fn test_custom_directory_and_variables() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("transcription.toml"),
            "instructions = \"Transcribe for {{audience}}.\"\n",
        )
        .unwrap();

        let mut vars = HashMap::new();
        vars.insert("audience".to_string(), "beginners".to_string());
        let prompts = Prompts::load(dir.path().to_str(), Some(&vars)).unwrap();

        assert_eq!(prompts.transcription_prompt(), "Transcribe for beginners.");
        assert_eq!(
            prompts.study_materials.instructions,
            StudyMaterialPrompts::default().instructions
        );
    }
}
