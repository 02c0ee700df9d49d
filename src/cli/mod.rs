//! CLI module for Vidlearn.

pub mod commands;
mod output;

pub use output::{cache_summary, Output};

use clap::{Parser, Subcommand};

/// Vidlearn - study materials from YouTube videos
///
/// Serves an HTTP API that transcribes videos with Gemini and turns the
/// transcripts into structured study materials.
#[derive(Parser, Debug)]
#[command(name = "vidlearn")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v for info, -vv for debug, -vvv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to configuration file
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the HTTP API server
    Serve {
        /// Host to bind to (overrides the config file)
        #[arg(long, env = "VIDLEARN_HOST")]
        host: Option<String>,

        /// Port to bind to (overrides the config file)
        #[arg(short, long, env = "PORT")]
        port: Option<u16>,
    },

    /// Check that the configured model is reachable
    Ping,

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Write a default configuration file if none exists
    Init,

    /// Show configuration file path
    Path,
}
