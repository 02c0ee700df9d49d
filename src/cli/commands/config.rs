//! Config command implementation.

use crate::cli::{ConfigAction, Output};
use crate::config::Settings;
use anyhow::Result;
use std::path::PathBuf;

/// Run the config command.
pub fn run_config(action: &ConfigAction, config_path: Option<PathBuf>, settings: Settings) -> Result<()> {
    let config_path = config_path.unwrap_or_else(Settings::default_config_path);

    match action {
        ConfigAction::Show => {
            println!("{}", settings.to_toml()?);
        }

        ConfigAction::Init => {
            if config_path.exists() {
                Output::warning(&format!("Config already exists at {}", config_path.display()));
            } else {
                Settings::default().save_to(&config_path)?;
                Output::success(&format!("Created default config at {}", config_path.display()));
            }
        }

        ConfigAction::Path => {
            println!("{}", config_path.display());
        }
    }

    Ok(())
}
