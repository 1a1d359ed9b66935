//! Metadata providers — interchangeable sources of track metadata.
//!
//! The `sp` pipeline is parameterized by a [`MetadataProvider`]: given a
//! Spotify track URL it either yields a complete [`TrackMetadata`] or a
//! categorized [`ProviderError`]. Two backends exist:
//! - [`ScraperProvider`]: one call to a third-party scraping API that also
//!   returns a direct audio download URL;
//! - [`SpotifyProvider`]: official Web API (client-credentials flow) plus a
//!   YouTube search to locate a playable page for the extractor.
//!
//! Which one backs the command is chosen by `SP_PROVIDER` at startup.

use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;
use url::Url;

use crate::core::config;

pub mod scraper;
pub mod spotify;
pub mod youtube;

// Re-exports for convenience
pub use scraper::ScraperProvider;
pub use spotify::SpotifyProvider;
pub use youtube::{AudioLocator, YtSearchLocator};

/// Where the playable audio for a resolved track comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AudioSource {
    /// Direct download URL, fetched with a plain streamed GET.
    Direct(Url),
    /// Page URL located via search; handed to the audio extractor.
    Page(Url),
}

/// Fully resolved track metadata. Immutable after resolution and dropped
/// together with the request.
#[derive(Debug, Clone)]
pub struct TrackMetadata {
    pub title: String,
    /// Comma-joined artist names.
    pub artists: String,
    /// Human-readable duration, e.g. "3:23".
    pub duration: String,
    pub album: Option<String>,
    pub release_date: Option<String>,
    /// Canonical Spotify track URL for the caption link.
    pub track_url: String,
    pub cover_url: Option<String>,
    pub audio: AudioSource,
}

/// Categorized resolution failures.
///
/// Every variant maps to exactly one terminal status-message text via
/// [`ProviderError::user_message`]; the distinction between an invalid URL
/// and an empty search result is kept even though both halt the pipeline.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// The supplied link is not a resolvable Spotify track URL.
    #[error("not a valid Spotify track URL")]
    InvalidUrl,

    /// The metadata service itself failed (non-200, bad JSON, token refused).
    #[error("metadata service unavailable: {0}")]
    Unavailable(String),

    /// The search-backed locator found no playable entry for the track.
    #[error("no playable match found")]
    NoMatch,

    /// Transport-level HTTP failure.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

impl ProviderError {
    /// Text shown to the user in the terminal status edit.
    pub fn user_message(&self) -> &'static str {
        match self {
            ProviderError::InvalidUrl => "Please provide a valid Spotify track URL ❌",
            ProviderError::Unavailable(_) => "The track service is unavailable right now ❌",
            ProviderError::NoMatch => "No playable match found for this track ❌",
            ProviderError::Http(_) => "Could not fetch track details ❌",
        }
    }
}

/// A source of track metadata, selected once at startup.
#[async_trait]
pub trait MetadataProvider: Send + Sync {
    /// Short backend name for logs.
    fn name(&self) -> &'static str;

    /// Resolves a Spotify track URL into complete metadata, including the
    /// audio source the pipeline will download from.
    async fn resolve(&self, url: &str) -> Result<TrackMetadata, ProviderError>;
}

/// Builds the provider selected by `SP_PROVIDER`.
pub fn from_config() -> anyhow::Result<Arc<dyn MetadataProvider>> {
    match config::METADATA_PROVIDER.as_str() {
        "scraper" => Ok(Arc::new(ScraperProvider::new())),
        "spotify" => {
            if config::SPOTIFY_CLIENT_ID.is_empty() || config::SPOTIFY_CLIENT_SECRET.is_empty() {
                anyhow::bail!("SP_PROVIDER=spotify requires SPOTIFY_CLIENT_ID and SPOTIFY_CLIENT_SECRET");
            }
            Ok(Arc::new(SpotifyProvider::new(Arc::new(YtSearchLocator::new()))))
        }
        other => anyhow::bail!("Unknown SP_PROVIDER value: {}", other),
    }
}
