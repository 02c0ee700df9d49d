//! CLI command implementations.

mod config;
mod ping;
mod serve;

pub use config::run_config;
pub use ping::run_ping;
pub use serve::{router, run_serve, ApiError, AppState};
