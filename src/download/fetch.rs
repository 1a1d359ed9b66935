//! Streamed HTTP asset downloads.

use futures_util::StreamExt;
use reqwest::Client;
use std::path::Path;
use tokio::io::AsyncWriteExt;

use crate::core::error::{AppError, AppResult};

/// Downloads `url` to `dest` with a chunked streamed GET.
///
/// A non-success status fails before anything is written. Whether the failure
/// is fatal is the caller's call: cover art degrades to "no thumbnail",
/// direct audio aborts the request.
///
/// # Returns
///
/// The number of bytes written.
pub async fn download_to_file(client: &Client, url: &str, dest: &Path) -> AppResult<u64> {
    log::info!("Downloading {} -> {}", url, dest.display());

    let response = client.get(url).send().await?;

    let status = response.status();
    if !status.is_success() {
        return Err(AppError::HttpStatus(status));
    }

    let mut file = tokio::fs::File::create(dest).await?;
    let mut stream = response.bytes_stream();
    let mut written: u64 = 0;

    while let Some(chunk) = stream.next().await {
        let chunk = chunk?;
        file.write_all(&chunk).await?;
        written += chunk.len() as u64;
    }

    file.flush().await?;
    log::info!("Downloaded {} bytes to {}", written, dest.display());

    Ok(written)
}
