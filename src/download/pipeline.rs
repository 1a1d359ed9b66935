//! Request orchestrator: resolve → fetch assets → upload → cleanup.
//!
//! One request is one strictly sequential chain. Every failure writes a
//! single terminal, human-readable edit into the status message and halts;
//! on success the status message is deleted entirely. Temporary assets are
//! RAII-owned, so every exit path (including the failure edits) releases
//! them.

use reqwest::Client;
use teloxide::prelude::*;
use teloxide::prelude::Requester as _;

use crate::core::error::AppError;
use crate::core::utils::{escape_markdown_v2, sanitize_title};
use crate::download::progress::StatusMessage;
use crate::download::scratch::{ScratchDir, TempAsset};
use crate::download::send::{build_caption, send_audio_with_progress, Requester};
use crate::download::{fetch, ytdlp};
use crate::provider::{AudioSource, TrackMetadata};
use crate::telegram::{Bot, HandlerDeps};

const MSG_PROMPT: &str = "Please provide a Spotify track URL ❌";
const MSG_SEARCHING: &str = "🔍 *Searching the music\\.\\.\\.*";
const MSG_FOUND: &str = "☑️ *Found — downloading\\.\\.\\.*";
const MSG_DOWNLOAD_FAILED: &str = "❌ An error occurred while downloading the track";

/// Downloads the cover (best effort) and the audio (mandatory) for a
/// resolved track. The cover degrades to `None` on any failure; an audio
/// failure aborts, and the already-written cover is released by its guard.
pub async fn fetch_assets(
    client: &Client,
    scratch: &ScratchDir,
    meta: &TrackMetadata,
) -> Result<(TempAsset, Option<TempAsset>), AppError> {
    let stem = sanitize_title(&meta.title);

    let cover = match meta.cover_url {
        Some(ref cover_url) => {
            let asset = scratch.asset(&format!("{}.jpg", stem));
            match fetch::download_to_file(client, cover_url, asset.path()).await {
                Ok(_) => Some(asset),
                Err(e) => {
                    log::warn!("Cover download failed, proceeding without thumbnail: {}", e);
                    None
                }
            }
        }
        None => None,
    };

    let audio = scratch.asset(&format!("{}.mp3", stem));
    match meta.audio {
        AudioSource::Direct(ref url) => {
            fetch::download_to_file(client, url.as_str(), audio.path()).await?;
        }
        AudioSource::Page(ref url) => {
            ytdlp::extract_audio(url, audio.path()).await?;
        }
    }

    Ok((audio, cover))
}

/// Handles one `sp` command end to end.
///
/// A missing URL is answered with a prompt and creates no state at all.
/// Once the status message exists, no error escapes: every failure becomes
/// its terminal text.
pub async fn handle_track_request(
    bot: &Bot,
    msg: &Message,
    url: Option<String>,
    deps: &HandlerDeps,
) -> ResponseResult<()> {
    let chat_id = msg.chat.id;

    let Some(url) = url else {
        bot.send_message(chat_id, escape_markdown_v2(MSG_PROMPT))
            .parse_mode(teloxide::types::ParseMode::MarkdownV2)
            .await?;
        return Ok(());
    };

    log::info!("Processing sp request in chat {}: {}", chat_id, url);
    let status = StatusMessage::send(bot, chat_id, MSG_SEARCHING).await?;

    // Nothing touches the scratch directory until resolution has succeeded.
    let meta = match deps.provider.resolve(&url).await {
        Ok(meta) => meta,
        Err(e) => {
            log::error!("Resolution failed for {}: {}", url, e);
            status.edit_logged(bot, &escape_markdown_v2(e.user_message())).await;
            return Ok(());
        }
    };
    log::info!("Resolved '{}' by {} ({})", meta.title, meta.artists, meta.duration);

    status.edit_logged(bot, MSG_FOUND).await;

    let (audio, cover) = match fetch_assets(&deps.http, &deps.scratch, &meta).await {
        Ok(assets) => assets,
        Err(e) => {
            log::error!("Asset fetch failed for '{}': {}", meta.title, e);
            status.edit_logged(bot, &escape_markdown_v2(MSG_DOWNLOAD_FAILED)).await;
            return Ok(());
        }
    };

    let requester = Requester::from_message(msg);
    let caption = build_caption(&meta, &requester);

    let send_result = send_audio_with_progress(
        bot,
        chat_id,
        &status,
        &meta,
        audio.path(),
        cover.as_ref().map(|c| c.path()),
        caption,
    )
    .await;

    match send_result {
        Ok(()) => {
            if let Err(e) = status.delete(bot).await {
                log::warn!("Failed to delete status message in chat {}: {}", chat_id, e);
            }
            log::info!("Delivered '{}' to chat {}", meta.title, chat_id);
        }
        Err(e) => {
            log::error!("Upload failed for '{}' in chat {}: {}", meta.title, chat_id, e);
            status
                .edit_logged(bot, &escape_markdown_v2(&format!("❌ Upload failed: {}", e)))
                .await;
        }
    }

    // `audio` and `cover` drop here: temp files are removed on every path.
    Ok(())
}
