//! Core utilities, configuration and errors

pub mod config;
pub mod error;
pub mod logging;
pub mod utils;

// Re-exports for convenience
pub use error::{AppError, AppResult};
pub use logging::init_logger;
pub use utils::{escape_markdown_url, escape_markdown_v2, format_track_duration, sanitize_title};
