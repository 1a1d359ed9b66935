//! Spotigram - Telegram bot that turns Spotify track links into delivered audio
//!
//! This library provides the full `sp` command pipeline: metadata resolution
//! through an interchangeable provider, asset download/extraction, and the
//! progress-reporting Telegram upload.
//!
//! # Module Structure
//!
//! - `core`: configuration, errors, logging, and shared utilities
//! - `provider`: track-metadata sources (scraping API / Spotify Web API + search)
//! - `download`: scratch assets, fetching, extraction, progress, upload pipeline
//! - `telegram`: bot integration and the `sp` command surface

pub mod core;
pub mod download;
pub mod provider;
pub mod telegram;

// Re-export commonly used types for convenience
pub use crate::core::{config, AppError, AppResult};
pub use crate::download::{handle_track_request, ScratchDir};
pub use crate::provider::{MetadataProvider, ProviderError, TrackMetadata};
pub use crate::telegram::{create_bot, Bot, HandlerDeps};
