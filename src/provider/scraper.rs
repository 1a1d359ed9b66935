//! ScraperProvider — metadata via a third-party scraping API.
//!
//! One GET to `<host>/sp.php?url=<trackURL>` returns the full metadata set
//! *and* a direct audio download link, so no locator step is needed.

use reqwest::Client;
use serde::Deserialize;
use url::Url;

use crate::core::config;
use crate::provider::{AudioSource, MetadataProvider, ProviderError, TrackMetadata};
use async_trait::async_trait;

/// Wire format of the scraping API response.
///
/// `status: false` means the service did not recognize the URL; every other
/// field is only meaningful when `status` is true. The cover URL historically
/// arrives under either `image` or `cover`.
#[derive(Debug, Deserialize)]
struct ScraperResponse {
    status: bool,
    #[serde(default)]
    title: String,
    #[serde(default)]
    artist: String,
    #[serde(default)]
    duration: String,
    #[serde(default)]
    album: Option<String>,
    #[serde(default, rename = "releaseDate")]
    release_date: Option<String>,
    #[serde(default)]
    spotify_url: String,
    #[serde(default)]
    download_link: String,
    #[serde(default, alias = "cover")]
    image: Option<String>,
}

/// Metadata provider backed by the scraping endpoint.
pub struct ScraperProvider {
    client: Client,
    base_url: String,
}

impl Default for ScraperProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl ScraperProvider {
    pub fn new() -> Self {
        Self::with_base_url(config::SCRAPER_API_URL.clone())
    }

    /// Points the provider at a different host (used by tests).
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        let client = Client::builder()
            .timeout(config::network::metadata_timeout())
            .build()
            .unwrap_or_default();

        Self {
            client,
            base_url: base_url.into(),
        }
    }
}

#[async_trait]
impl MetadataProvider for ScraperProvider {
    fn name(&self) -> &'static str {
        "scraper"
    }

    async fn resolve(&self, url: &str) -> Result<TrackMetadata, ProviderError> {
        let endpoint = format!("{}/sp.php", self.base_url);
        log::info!("Resolving track via scraper API: {}", url);

        let response = self.client.get(&endpoint).query(&[("url", url)]).send().await?;

        let status = response.status();
        if !status.is_success() {
            log::error!("Scraper API returned HTTP {} for {}", status, url);
            return Err(ProviderError::Unavailable(format!("HTTP {}", status)));
        }

        let data: ScraperResponse = response.json().await?;

        if !data.status {
            log::warn!("Scraper API rejected URL: {}", url);
            return Err(ProviderError::InvalidUrl);
        }

        let download = Url::parse(&data.download_link)
            .map_err(|e| ProviderError::Unavailable(format!("bad download link: {}", e)))?;

        Ok(TrackMetadata {
            title: data.title,
            artists: data.artist,
            duration: data.duration,
            album: data.album.filter(|a| !a.is_empty()),
            release_date: data.release_date.filter(|d| !d.is_empty()),
            track_url: if data.spotify_url.is_empty() {
                url.to_string()
            } else {
                data.spotify_url
            },
            cover_url: data.image.filter(|c| !c.is_empty()),
            audio: AudioSource::Direct(download),
        })
    }
}
