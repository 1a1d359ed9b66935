//! SpotifyProvider — metadata via the official Spotify Web API.
//!
//! Resolution is three sequential steps:
//! 1. extract the track ID from the final URL path segment,
//! 2. exchange client credentials for a bearer token,
//! 3. fetch the track object and hand title + artists to an [`AudioLocator`]
//!    that finds a playable page for the extractor.
//!
//! Every token/track failure collapses into `ProviderError::Unavailable`; the
//! locator's empty-result case stays a distinct `ProviderError::NoMatch`.

use reqwest::Client;
use serde::Deserialize;
use std::sync::Arc;

use crate::core::config;
use crate::core::utils::format_track_duration;
use crate::provider::youtube::AudioLocator;
use crate::provider::{AudioSource, MetadataProvider, ProviderError, TrackMetadata};
use async_trait::async_trait;

const DEFAULT_TOKEN_URL: &str = "https://accounts.spotify.com/api/token";
const DEFAULT_API_BASE: &str = "https://api.spotify.com/v1";

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

#[derive(Debug, Deserialize)]
struct ArtistRef {
    name: String,
}

#[derive(Debug, Deserialize)]
struct ImageRef {
    url: String,
}

#[derive(Debug, Deserialize)]
struct AlbumRef {
    #[serde(default)]
    name: String,
    #[serde(default)]
    release_date: Option<String>,
    #[serde(default)]
    images: Vec<ImageRef>,
}

#[derive(Debug, Default, Deserialize)]
struct ExternalUrls {
    spotify: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TrackResponse {
    name: String,
    artists: Vec<ArtistRef>,
    duration_ms: u64,
    album: AlbumRef,
    #[serde(default)]
    external_urls: ExternalUrls,
}

/// Metadata provider backed by the official Web API plus a search locator.
pub struct SpotifyProvider {
    client: Client,
    token_url: String,
    api_base: String,
    locator: Arc<dyn AudioLocator>,
}

impl SpotifyProvider {
    pub fn new(locator: Arc<dyn AudioLocator>) -> Self {
        Self::with_endpoints(DEFAULT_TOKEN_URL, DEFAULT_API_BASE, locator)
    }

    /// Points the provider at different endpoints (used by tests).
    pub fn with_endpoints(
        token_url: impl Into<String>,
        api_base: impl Into<String>,
        locator: Arc<dyn AudioLocator>,
    ) -> Self {
        let client = Client::builder()
            .timeout(config::network::metadata_timeout())
            .build()
            .unwrap_or_default();

        Self {
            client,
            token_url: token_url.into(),
            api_base: api_base.into(),
            locator,
        }
    }

    /// Extracts the track identifier from the final URL path segment.
    ///
    /// Query strings and trailing slashes are ignored; an empty path means
    /// there is nothing to extract.
    fn extract_track_id(url: &str) -> Option<String> {
        let parsed = url::Url::parse(url).ok()?;
        if parsed.scheme() != "http" && parsed.scheme() != "https" {
            return None;
        }
        parsed
            .path_segments()?
            .filter(|s| !s.is_empty())
            .next_back()
            .map(|s| s.to_string())
    }

    /// Client-credentials token exchange. Logs and degrades to `Unavailable`
    /// on any HTTP failure so the caller reports "could not fetch details".
    async fn fetch_token(&self) -> Result<String, ProviderError> {
        let response = self
            .client
            .post(&self.token_url)
            .basic_auth(config::SPOTIFY_CLIENT_ID.as_str(), Some(config::SPOTIFY_CLIENT_SECRET.as_str()))
            .form(&[("grant_type", "client_credentials")])
            .send()
            .await
            .map_err(|e| {
                log::error!("Spotify token request failed: {}", e);
                ProviderError::Unavailable(format!("token request failed: {}", e))
            })?;

        let status = response.status();
        if !status.is_success() {
            log::error!("Spotify token endpoint returned HTTP {}", status);
            return Err(ProviderError::Unavailable(format!("token HTTP {}", status)));
        }

        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::Unavailable(format!("bad token response: {}", e)))?;

        Ok(token.access_token)
    }

    async fn fetch_track(&self, track_id: &str, token: &str) -> Result<TrackResponse, ProviderError> {
        let endpoint = format!("{}/tracks/{}", self.api_base, track_id);

        let response = self
            .client
            .get(&endpoint)
            .bearer_auth(token)
            .send()
            .await
            .map_err(|e| {
                log::error!("Spotify track request failed for {}: {}", track_id, e);
                ProviderError::Unavailable(format!("track request failed: {}", e))
            })?;

        let status = response.status();
        if !status.is_success() {
            log::error!("Spotify track endpoint returned HTTP {} for {}", status, track_id);
            return Err(ProviderError::Unavailable(format!("track HTTP {}", status)));
        }

        response
            .json()
            .await
            .map_err(|e| ProviderError::Unavailable(format!("bad track response: {}", e)))
    }
}

#[async_trait]
impl MetadataProvider for SpotifyProvider {
    fn name(&self) -> &'static str {
        "spotify"
    }

    async fn resolve(&self, url: &str) -> Result<TrackMetadata, ProviderError> {
        let track_id = Self::extract_track_id(url).ok_or(ProviderError::InvalidUrl)?;
        log::info!("Resolving Spotify track {} via Web API", track_id);

        let token = self.fetch_token().await?;
        let track = self.fetch_track(&track_id, &token).await?;

        let artists = track
            .artists
            .iter()
            .map(|a| a.name.as_str())
            .collect::<Vec<_>>()
            .join(", ");

        let playable = self.locator.locate(&track.name, &artists).await?;
        log::info!("Located playable page for '{}': {}", track.name, playable);

        Ok(TrackMetadata {
            duration: format_track_duration(track.duration_ms),
            album: Some(track.album.name).filter(|n| !n.is_empty()),
            release_date: track.album.release_date.filter(|d| !d.is_empty()),
            track_url: track.external_urls.spotify.unwrap_or_else(|| url.to_string()),
            cover_url: track.album.images.first().map(|i| i.url.clone()),
            title: track.name,
            artists,
            audio: AudioSource::Page(playable),
        })
    }
}
