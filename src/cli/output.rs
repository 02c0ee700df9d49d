//! CLI output formatting utilities.

use crate::generation::VideoCache;
use crate::sanitize::snippet;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};

/// Characters of a model reply shown by `ping`.
const REPLY_PREVIEW_LEN: usize = 300;

/// Output helper for CLI formatting.
pub struct Output;

impl Output {
    /// Print an info message.
    pub fn info(msg: &str) {
        println!("{} {}", style(">>").cyan().bold(), msg);
    }

    /// Print a success message.
    pub fn success(msg: &str) {
        println!("{} {}", style(">>").green().bold(), msg);
    }

    /// Print a warning message.
    pub fn warning(msg: &str) {
        eprintln!("{} {}", style(">>").yellow().bold(), msg);
    }

    /// Print an error message.
    pub fn error(msg: &str) {
        eprintln!("{} {}", style(">>").red().bold(), msg);
    }

    pub fn header(msg: &str) {
        println!("\n{}", style(msg).bold().underlined());
    }

    /// Print a key-value pair.
    pub fn kv(key: &str, value: &str) {
        println!("  {}: {}", style(key).dim(), value);
    }

    /// Print one served route, e.g. `POST /api/transcribe`.
    pub fn endpoint(method: &str, path: &str, label: &str) {
        println!(
            "  {} {}  {}",
            style(format!("{:<4}", method)).cyan().bold(),
            path,
            style(label).dim()
        );
    }

    /// Print a model reply, collapsed to one line and truncated.
    pub fn reply(text: &str) {
        println!("  {}", style(reply_preview(text)).italic());
    }

    /// Spinner shown while waiting on Gemini.
    pub fn spinner(msg: &str) -> ProgressBar {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} {msg} [{elapsed}]")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        pb.set_message(msg.to_string());
        pb.enable_steady_tick(std::time::Duration::from_millis(100));
        pb
    }
}

/// Describe the cache configuration for the server banner.
pub fn cache_summary(cache: &VideoCache) -> String {
    if !cache.is_enabled() {
        return "disabled".to_string();
    }
    let expiry = match cache.ttl_seconds() {
        Some(secs) => format!("expire after {}", format_ttl(secs)),
        None => "never expire".to_string(),
    };
    format!("up to {} videos, entries {}", cache.max_entries(), expiry)
}

/// Format a TTL in seconds, e.g. `1h 30m` or `45s`.
fn format_ttl(seconds: i64) -> String {
    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;
    let secs = seconds % 60;

    match (hours, minutes, secs) {
        (0, 0, s) => format!("{}s", s),
        (0, m, 0) => format!("{}m", m),
        (0, m, s) => format!("{}m {}s", m, s),
        (h, 0, 0) => format!("{}h", h),
        (h, m, _) => format!("{}h {}m", h, m),
    }
}

fn reply_preview(text: &str) -> String {
    let flat = text.split_whitespace().collect::<Vec<_>>().join(" ");
    snippet(&flat, REPLY_PREVIEW_LEN)
}
