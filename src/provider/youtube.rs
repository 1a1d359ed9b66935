//! Search-only playable-page locator backed by yt-dlp.
//!
//! Runs `yt-dlp --dump-json --skip-download "ytsearch1:<title> <artist>"`,
//! a metadata-only query; nothing is downloaded here. The located page URL
//! is later handed to the extractor.

use tokio::process::Command as TokioCommand;
use tokio::time::timeout;
use url::Url;

use crate::core::config;
use crate::provider::ProviderError;
use async_trait::async_trait;

/// Maps a resolved title + artists to a concrete playable page URL.
#[async_trait]
pub trait AudioLocator: Send + Sync {
    async fn locate(&self, title: &str, artists: &str) -> Result<Url, ProviderError>;
}

/// Locator that asks yt-dlp for the first YouTube search result.
pub struct YtSearchLocator;

impl Default for YtSearchLocator {
    fn default() -> Self {
        Self::new()
    }
}

impl YtSearchLocator {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl AudioLocator for YtSearchLocator {
    async fn locate(&self, title: &str, artists: &str) -> Result<Url, ProviderError> {
        let ytdl_bin = &*config::YTDL_BIN;
        let query = format!("ytsearch1:{} {}", title, artists);

        log::info!("Searching playable page: {}", query);

        let result = timeout(
            config::ytdlp::search_timeout(),
            TokioCommand::new(ytdl_bin)
                .args(["--dump-json", "--skip-download", "--no-warnings", "--no-playlist", &query])
                .output(),
        )
        .await;

        let output = match result {
            Ok(Ok(output)) => output,
            Ok(Err(e)) => {
                log::error!("Failed to execute {} for search: {}", ytdl_bin, e);
                return Err(ProviderError::Unavailable(format!("search command failed: {}", e)));
            }
            Err(_) => {
                log::error!("yt-dlp search timed out for query: {}", query);
                return Err(ProviderError::Unavailable("search timed out".to_string()));
            }
        };

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            log::error!(
                "yt-dlp search exited with {}: {}",
                output.status,
                &stderr[..stderr.len().min(300)]
            );
            return Err(ProviderError::Unavailable("search failed".to_string()));
        }

        // One JSON object per entry; ytsearch1 yields at most one line.
        let stdout = String::from_utf8_lossy(&output.stdout);
        let first_entry = match stdout.lines().find(|l| !l.trim().is_empty()) {
            Some(line) => line,
            None => {
                log::warn!("No search entries for query: {}", query);
                return Err(ProviderError::NoMatch);
            }
        };

        let entry: serde_json::Value =
            serde_json::from_str(first_entry).map_err(|e| ProviderError::Unavailable(format!("bad search JSON: {}", e)))?;

        let page_url = entry
            .get("webpage_url")
            .and_then(|v| v.as_str())
            .ok_or(ProviderError::NoMatch)?;

        Url::parse(page_url).map_err(|e| ProviderError::Unavailable(format!("bad result URL: {}", e)))
    }
}
