//! Audio extraction via yt-dlp.
//!
//! Invoked only for provider results with a `Page` audio source: the located
//! page is pulled through yt-dlp, best audio stream selected, transcoded to
//! mp3 at the configured bitrate. The process runs on the blocking worker
//! pool with a hard timeout; the orchestrator awaits it.

use std::path::Path;
use std::process::{Child, Command, Stdio};
use std::time::Duration;
use url::Url;

use crate::core::config;
use crate::core::error::{AppError, AppResult};

/// Wait for a child process with a timeout. Kills the child on timeout.
fn wait_with_output_timeout(mut child: Child, timeout: Duration) -> Result<std::process::Output, AppError> {
    let deadline = std::time::Instant::now() + timeout;

    // Poll with try_wait until the process exits or we time out
    loop {
        match child.try_wait() {
            Ok(Some(_status)) => {
                return child.wait_with_output().map_err(AppError::Io);
            }
            Ok(None) => {
                if std::time::Instant::now() >= deadline {
                    log::error!("yt-dlp process timed out after {}s, killing", timeout.as_secs());
                    let _ = child.kill();
                    let _ = child.wait(); // Reap the zombie
                    return Err(AppError::Download(format!(
                        "yt-dlp process timed out after {}s",
                        timeout.as_secs()
                    )));
                }
                std::thread::sleep(Duration::from_millis(500));
            }
            Err(e) => {
                return Err(AppError::Io(e));
            }
        }
    }
}

/// Extracts the audio of `page_url` into `dest` as an mp3.
///
/// yt-dlp runs with its own progress/verbose output suppressed; the cookie
/// file from `YTDL_COOKIES_FILE` is passed through when configured.
pub async fn extract_audio(page_url: &Url, dest: &Path) -> AppResult<()> {
    let ytdl_bin = config::YTDL_BIN.clone();
    let url_str = page_url.to_string();
    let out_path = dest.to_string_lossy().into_owned();
    let bitrate = config::AUDIO_BITRATE.clone();
    let cookies = config::YTDL_COOKIES_FILE.clone();

    log::info!("Extracting audio: {} -> {}", url_str, out_path);

    let dest_check = dest.to_path_buf();
    tokio::task::spawn_blocking(move || {
        let postprocessor_args = format!("ffmpeg:-acodec libmp3lame -b:a {}", bitrate);

        let mut args: Vec<&str> = vec![
            "-f",
            "bestaudio/best",
            "--extract-audio",
            "--audio-format",
            "mp3",
            "--postprocessor-args",
            postprocessor_args.as_str(),
            "--no-playlist",
            "--quiet",
            "--no-warnings",
            "--no-progress",
            "-o",
            out_path.as_str(),
        ];
        if let Some(ref cookie_file) = cookies {
            args.extend_from_slice(&["--cookies", cookie_file.as_str()]);
        }
        args.push(url_str.as_str());

        let child = Command::new(&ytdl_bin)
            .args(&args)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| AppError::Download(format!("failed to spawn {}: {}", ytdl_bin, e)))?;

        let output = wait_with_output_timeout(child, config::ytdlp::extract_timeout())?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let snippet = &stderr[..stderr.len().min(300)];
            return Err(AppError::Download(format!(
                "yt-dlp exited with {}: {}",
                output.status, snippet
            )));
        }

        if !dest_check.exists() {
            return Err(AppError::Download(format!(
                "yt-dlp reported success but {} is missing",
                dest_check.display()
            )));
        }

        Ok(())
    })
    .await
    .map_err(|e| AppError::Download(format!("extraction task failed: {}", e)))?
}
