//! Status message lifecycle and throttled upload-progress rendering.
//!
//! One [`StatusMessage`] exists per request: sent when the search starts,
//! edited in place as the pipeline advances, then either deleted (success)
//! or left with a terminal error text (failure).
//!
//! Upload progress edits are throttled by [`ProgressThrottle`]: no matter how
//! often the byte counter is polled, at most one edit per
//! `config::progress::EDIT_INTERVAL_SECS` real-time seconds goes out.

use std::time::{Duration, Instant};
use teloxide::prelude::*;
use teloxide::types::MessageId;

use crate::core::config;
use crate::core::utils::escape_markdown_v2;
use crate::telegram::Bot;

/// Number of segments in the rendered progress bar.
pub const BAR_SEGMENTS: usize = 20;

/// Percent of progress covered by one bar segment.
const SEGMENT_PERCENT: f64 = 100.0 / BAR_SEGMENTS as f64;

/// Renders the upload progress bar: filled count is `floor(percent / 5)`.
pub fn render_progress_bar(percent: f64) -> String {
    let percent = percent.clamp(0.0, 100.0);
    let filled = ((percent / SEGMENT_PERCENT).floor() as usize).min(BAR_SEGMENTS);

    let mut bar = String::with_capacity(BAR_SEGMENTS * 3);
    bar.push_str(&"▓".repeat(filled));
    bar.push_str(&"░".repeat(BAR_SEGMENTS - filled));
    bar
}

/// One tick of upload progress, ready to be rendered.
#[derive(Debug, Clone, Copy)]
pub struct UploadSnapshot {
    /// Cumulative bytes handed to Telegram so far.
    pub sent: u64,
    /// Total file size in bytes.
    pub total: u64,
    /// Time since the upload started.
    pub elapsed: Duration,
}

impl UploadSnapshot {
    pub fn percent(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        (self.sent as f64 / self.total as f64) * 100.0
    }

    /// Average speed since upload start, in MB/s.
    pub fn speed_mbs(&self) -> f64 {
        let secs = self.elapsed.as_secs_f64();
        if secs <= 0.0 {
            return 0.0;
        }
        self.sent as f64 / secs / (1024.0 * 1024.0)
    }

    pub fn sent_mb(&self) -> f64 {
        self.sent as f64 / (1024.0 * 1024.0)
    }

    pub fn total_mb(&self) -> f64 {
        self.total as f64 / (1024.0 * 1024.0)
    }

    /// Renders the full progress block, MarkdownV2-ready.
    pub fn render(&self) -> String {
        let text = format!(
            "📥 Upload Progress 📥\n\n{}\n\n🚧 Percentage: {:.2}%\n⚡️ Speed: {:.2} MB/s\n📶 Uploaded: {:.2} MB of {:.2} MB",
            render_progress_bar(self.percent()),
            self.percent(),
            self.speed_mbs(),
            self.sent_mb(),
            self.total_mb(),
        );
        escape_markdown_v2(&text)
    }
}

/// Edit-rate limiter owned by the reporter instance.
///
/// `should_edit` returns `false` (no side effects) while the previous edit is
/// younger than `min_interval`; otherwise it records `now` and allows the
/// edit. The first call always passes.
#[derive(Debug)]
pub struct ProgressThrottle {
    last_edit: Option<Instant>,
    min_interval: Duration,
}

impl ProgressThrottle {
    pub fn new(min_interval: Duration) -> Self {
        Self {
            last_edit: None,
            min_interval,
        }
    }

    pub fn should_edit(&mut self, now: Instant) -> bool {
        if let Some(prev) = self.last_edit {
            if now.duration_since(prev) < self.min_interval {
                return false;
            }
        }
        self.last_edit = Some(now);
        true
    }
}

/// Handle to the single per-request status message.
#[derive(Debug, Clone, Copy)]
pub struct StatusMessage {
    pub chat_id: ChatId,
    pub message_id: MessageId,
}

impl StatusMessage {
    /// Sends the initial status message. `text` must already be MarkdownV2.
    pub async fn send(bot: &Bot, chat_id: ChatId, text: &str) -> ResponseResult<Self> {
        let msg = bot
            .send_message(chat_id, text)
            .parse_mode(teloxide::types::ParseMode::MarkdownV2)
            .await?;
        Ok(Self {
            chat_id,
            message_id: msg.id,
        })
    }

    /// Edits the message in place. `text` must already be MarkdownV2.
    pub async fn edit(&self, bot: &Bot, text: &str) -> ResponseResult<()> {
        bot.edit_message_text(self.chat_id, self.message_id, text)
            .parse_mode(teloxide::types::ParseMode::MarkdownV2)
            .await?;
        Ok(())
    }

    /// Edit that never propagates: "message is not modified" is normal,
    /// anything else is logged and swallowed.
    pub async fn edit_logged(&self, bot: &Bot, text: &str) {
        if let Err(e) = self.edit(bot, text).await {
            let error_str = e.to_string();
            if error_str.contains("message is not modified") {
                return;
            }
            log::warn!("Failed to edit status message in chat {}: {}", self.chat_id, e);
        }
    }

    /// Removes the status message entirely (the clean-finish signal).
    pub async fn delete(&self, bot: &Bot) -> ResponseResult<()> {
        bot.delete_message(self.chat_id, self.message_id).await?;
        Ok(())
    }
}

/// Throttled upload-progress reporter.
///
/// Owns the throttle state explicitly (start instant + last edit instant)
/// instead of capturing it in a closure, and is polled with cumulative byte
/// counts during the upload.
pub struct UploadReporter {
    started_at: Instant,
    throttle: ProgressThrottle,
}

impl Default for UploadReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl UploadReporter {
    pub fn new() -> Self {
        Self {
            started_at: Instant::now(),
            throttle: ProgressThrottle::new(config::progress::edit_interval()),
        }
    }

    /// Reports one progress tick. A no-op while throttled; edit failures are
    /// logged, never propagated, so a flaky edit cannot kill the upload.
    pub async fn report(&mut self, bot: &Bot, status: &StatusMessage, sent: u64, total: u64) {
        let now = Instant::now();
        if !self.throttle.should_edit(now) {
            return;
        }

        let snapshot = UploadSnapshot {
            sent,
            total,
            elapsed: now.duration_since(self.started_at),
        };
        status.edit_logged(bot, &snapshot.render()).await;
    }
}
