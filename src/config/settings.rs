//! Configuration settings for Vidlearn.

use crate::schema::ReferencePolicy;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Environment variable checked when the configured one is unset.
const FALLBACK_API_KEY_ENV: &str = "GEMINI_API_KEY";

/// Root configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct Settings {
    pub general: GeneralSettings,
    pub server: ServerSettings,
    pub gemini: GeminiSettings,
    pub generation: GenerationSettings,
    pub cache: CacheSettings,
    pub prompts: PromptSettings,
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralSettings {
    /// Log level (trace, debug, info, warn, error) used when `RUST_LOG` is unset
    /// and no `-v` flag is given.
    pub log_level: String,
}

impl Default for GeneralSettings {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

/// HTTP server settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    /// Prefix for the generation routes. Empty or "/" mounts them at the root.
    pub base_path: String,
    /// Origins allowed by CORS. Empty allows any origin (without credentials).
    pub cors_origins: Vec<String>,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
            base_path: "/api".to_string(),
            cors_origins: vec!["http://localhost:5173".to_string()],
        }
    }
}

/// Gemini provider settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeminiSettings {
    pub model: String,
    pub api_base: String,
    /// Environment variable holding the API key.
    pub api_key_env: String,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
    /// Sampling temperature. Unset uses the model default.
    pub temperature: Option<f32>,
}

impl Default for GeminiSettings {
    fn default() -> Self {
        Self {
            model: "gemini-3-flash-preview".to_string(),
            api_base: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            api_key_env: "GOOGLE_API_KEY".to_string(),
            timeout_secs: 300, // 5 minutes
            temperature: None,
        }
    }
}

/// Generation pipeline settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct GenerationSettings {
    /// What to do with sections that reference unknown objectives.
    pub reference_policy: ReferencePolicy,
}

/// Per-video result cache settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheSettings {
    pub enabled: bool,
    /// Maximum number of videos kept; the oldest entry is evicted first.
    pub max_entries: usize,
    /// Seconds before an entry is regenerated. 0 keeps entries forever.
    pub ttl_seconds: u64,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            max_entries: 64,
            ttl_seconds: 3600,
        }
    }
}

/// Prompt customization settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct PromptSettings {
    /// Directory for custom prompts (overrides defaults).
    pub custom_dir: Option<String>,
    /// Custom variables available in all prompts as {{variable_name}}.
    pub variables: std::collections::HashMap<String, String>,
}

impl Settings {
    /// Load settings from the default configuration file.
    pub fn load() -> crate::error::Result<Self> {
        Self::load_from(None)
    }

    /// Load settings from a specific path, or default location if None.
    pub fn load_from(path: Option<&PathBuf>) -> crate::error::Result<Self> {
        let config_path = match path {
            Some(p) => p.clone(),
            None => Self::default_config_path(),
        };

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let settings: Settings = toml::from_str(&content)?;
            Ok(settings)
        } else {
            Ok(Settings::default())
        }
    }

    /// Get the default configuration file path.
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("vidlearn")
            .join("config.toml")
    }

    /// Render the settings as TOML.
    pub fn to_toml(&self) -> crate::error::Result<String> {
        toml::to_string_pretty(self)
            .map_err(|e| crate::error::VidlearnError::Config(e.to_string()))
    }

    /// Save settings to a specific path.
    pub fn save_to(&self, path: &PathBuf) -> crate::error::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, self.to_toml()?)?;
        Ok(())
    }

    /// Read the Gemini API key from the environment.
    pub fn api_key(&self) -> crate::error::Result<String> {
        let configured = self.gemini.api_key_env.as_str();
        for var in [configured, FALLBACK_API_KEY_ENV] {
            if let Ok(key) = std::env::var(var) {
                if !key.trim().is_empty() {
                    return Ok(key.trim().to_string());
                }
            }
        }
        Err(crate::error::VidlearnError::Config(format!(
            "{} is missing. Set it in the environment or in a .env file",
            configured
        )))
    }

    /// Socket address string the server binds to.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}
