//! Telegram bot integration and handlers

use reqwest::ClientBuilder;

use crate::core::config;

pub mod commands;

// Re-exports for convenience
pub use commands::{parse_sp_command, schema, HandlerDeps};

/// The bot type used throughout the crate.
pub type Bot = teloxide::Bot;

/// Creates a Bot instance with a long-timeout HTTP client.
///
/// The timeout must cover a full multipart audio upload, not just the usual
/// request round-trip.
///
/// # Returns
/// * `Ok(Bot)` - Successfully created bot instance
/// * `Err(anyhow::Error)` - Missing token or HTTP client build failure
pub fn create_bot() -> anyhow::Result<Bot> {
    let token = config::BOT_TOKEN.as_str();
    if token.is_empty() {
        anyhow::bail!("BOT_TOKEN (or TELOXIDE_TOKEN) is not set");
    }

    let client = ClientBuilder::new().timeout(config::network::request_timeout()).build()?;

    Ok(Bot::with_client(token, client))
}
