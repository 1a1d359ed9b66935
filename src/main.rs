use anyhow::Result;
use dotenvy::dotenv;
use teloxide::prelude::*;

use spotigram::core::{config, init_logger};
use spotigram::download::ScratchDir;
use spotigram::provider;
use spotigram::telegram::{create_bot, schema, HandlerDeps};

/// Main entry point for the Telegram bot
///
/// # Errors
/// Returns an error if initialization fails (logging, provider selection,
/// scratch directory, bot creation).
#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env if present
    let _ = dotenv();

    // Initialize logger (console + file)
    init_logger(&config::LOG_FILE_PATH)?;

    log::info!("Starting spotigram...");

    let bot = create_bot()?;

    let provider = provider::from_config()?;
    log::info!("Metadata provider: {}", provider.name());

    let scratch = ScratchDir::from_config()?;
    log::info!("Scratch directory: {}", scratch.root().display());

    let deps = HandlerDeps {
        provider,
        http: reqwest::Client::builder()
            .timeout(config::network::asset_timeout())
            .build()?,
        scratch,
    };

    Dispatcher::builder(bot, schema())
        .dependencies(dptree::deps![deps])
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;

    Ok(())
}
