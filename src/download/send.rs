//! Telegram audio upload with byte-accurate progress tracking.
//!
//! The file handed to `send_audio` is wrapped in a [`ProgressReader`] that
//! counts every byte Telegram pulls; a side task polls the counter and feeds
//! the throttled [`UploadReporter`](crate::download::progress::UploadReporter).

use std::path::Path;
use std::pin::Pin;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::task::{Context, Poll};
use teloxide::prelude::*;
use teloxide::prelude::Requester as _;
use teloxide::types::{InputFile, ParseMode};
use teloxide::RequestError;
use tokio::fs::File as TokioFile;
use tokio::io::{AsyncRead, ReadBuf};

use crate::core::config;
use crate::core::utils::{escape_markdown_url, escape_markdown_v2};
use crate::download::progress::{StatusMessage, UploadReporter};
use crate::provider::TrackMetadata;
use crate::telegram::Bot;

/// Tracks the number of bytes sent during an upload operation.
///
/// Atomic so the counter can be read from the reporter task while the
/// request body is being streamed.
#[derive(Clone, Default)]
pub struct UploadProgress {
    bytes_sent: Arc<AtomicU64>,
}

impl UploadProgress {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_bytes(&self, bytes: usize) {
        self.bytes_sent.fetch_add(bytes as u64, Ordering::Relaxed);
    }

    pub fn bytes_sent(&self) -> u64 {
        self.bytes_sent.load(Ordering::Relaxed)
    }
}

/// An `AsyncRead` wrapper that reports read progress to an [`UploadProgress`].
pub struct ProgressReader<R> {
    inner: R,
    progress: UploadProgress,
}

impl<R> ProgressReader<R> {
    pub fn new(inner: R, progress: UploadProgress) -> Self {
        Self { inner, progress }
    }
}

impl<R: AsyncRead + Unpin> AsyncRead for ProgressReader<R> {
    fn poll_read(mut self: Pin<&mut Self>, cx: &mut Context<'_>, buf: &mut ReadBuf<'_>) -> Poll<std::io::Result<()>> {
        let before = buf.filled().len();
        let poll = Pin::new(&mut self.inner).poll_read(cx, buf);
        if let Poll::Ready(Ok(())) = &poll {
            let after = buf.filled().len();
            if after > before {
                self.progress.add_bytes(after - before);
            }
        }
        poll
    }
}

/// Creates an `InputFile` whose reads are counted by `progress`.
pub async fn input_file_with_progress(path: &Path, progress: UploadProgress) -> Result<InputFile, RequestError> {
    let file = TokioFile::open(path)
        .await
        .map_err(|err| RequestError::Io(Arc::new(err)))?;
    let reader = ProgressReader::new(file, progress);

    let mut input_file = InputFile::read(reader);
    if let Some(name) = path.file_name().and_then(|name| name.to_str()) {
        input_file = input_file.file_name(name.to_string());
    }
    Ok(input_file)
}

/// Who asked for the track; drives the caption attribution line.
#[derive(Debug, Clone)]
pub enum Requester {
    /// A regular user; mention-linked via `tg://user?id=`.
    User { id: u64, name: String },
    /// Anonymous channel/group post; attributed to the chat itself.
    Chat { title: String, username: Option<String> },
}

impl Requester {
    pub fn from_message(msg: &Message) -> Self {
        if let Some(user) = msg.from.as_ref() {
            Requester::User {
                id: user.id.0,
                name: user.full_name(),
            }
        } else {
            Requester::Chat {
                title: msg.chat.title().unwrap_or("this group").to_string(),
                username: msg.chat.username().map(|u| u.to_string()),
            }
        }
    }

    /// MarkdownV2 mention/link for the attribution line.
    fn mention(&self) -> String {
        match self {
            Requester::User { id, name } => {
                format!("[{}](tg://user?id={})", escape_markdown_v2(name), id)
            }
            Requester::Chat { title, username } => match username {
                Some(username) => format!("[{}](https://t.me/{})", escape_markdown_v2(title), username),
                None => format!("*{}*", escape_markdown_v2(title)),
            },
        }
    }
}

/// Builds the MarkdownV2 caption for the delivered audio.
pub fn build_caption(meta: &TrackMetadata, requester: &Requester) -> String {
    let mut caption = String::with_capacity(256);

    caption.push_str("🌟 *Title:* ");
    caption.push_str(&escape_markdown_v2(&meta.title));
    caption.push_str("\n💥 *Artist:* ");
    caption.push_str(&escape_markdown_v2(&meta.artists));
    caption.push_str("\n✨ *Duration:* ");
    caption.push_str(&escape_markdown_v2(&meta.duration));

    if let Some(ref album) = meta.album {
        caption.push_str("\n👀 *Album:* ");
        caption.push_str(&escape_markdown_v2(album));
    }
    if let Some(ref release_date) = meta.release_date {
        caption.push_str("\n🎵 *Release date:* ");
        caption.push_str(&escape_markdown_v2(release_date));
    }

    caption.push_str("\n🎸 [Listen on Spotify](");
    caption.push_str(&escape_markdown_url(&meta.track_url));
    caption.push_str(")\n━━━━━━━━━━━━━━━━━━━\n*Downloaded by* ");
    caption.push_str(&requester.mention());

    caption
}

/// Uploads the audio with caption, id3 attributes and optional cover
/// thumbnail, feeding the throttled progress reporter until the send returns.
pub async fn send_audio_with_progress(
    bot: &Bot,
    chat_id: ChatId,
    status: &StatusMessage,
    meta: &TrackMetadata,
    audio_path: &Path,
    cover_path: Option<&Path>,
    caption: String,
) -> Result<(), RequestError> {
    let total = tokio::fs::metadata(audio_path)
        .await
        .map(|m| m.len())
        .map_err(|err| RequestError::Io(Arc::new(err)))?;

    let progress = UploadProgress::new();
    let input_file = input_file_with_progress(audio_path, progress.clone()).await?;

    log::info!(
        "Uploading {} ({} bytes) to chat {}",
        audio_path.display(),
        total,
        chat_id
    );

    // Reporter task: polls the byte counter; the reporter itself enforces the
    // 2-second edit throttle, so the poll interval only bounds latency.
    let reporter_task = {
        let bot = bot.clone();
        let status = *status;
        let progress = progress.clone();
        tokio::spawn(async move {
            let mut reporter = UploadReporter::new();
            let mut interval = tokio::time::interval(config::progress::poll_interval());
            loop {
                interval.tick().await;
                reporter.report(&bot, &status, progress.bytes_sent(), total).await;
            }
        })
    };

    let mut request = bot
        .send_audio(chat_id, input_file)
        .caption(caption)
        .parse_mode(ParseMode::MarkdownV2)
        .title(meta.title.clone())
        .performer(meta.artists.clone());

    if let Some(cover) = cover_path {
        request = request.thumbnail(InputFile::file(cover.to_path_buf()));
    }

    let result = request.await;
    reporter_task.abort();

    result.map(|_| ())
}
