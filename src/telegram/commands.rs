//! The `sp` command surface: parsing and the dispatcher schema.

use std::sync::Arc;

use teloxide::dispatching::{UpdateFilterExt, UpdateHandler};
use teloxide::prelude::*;

use crate::core::config;
use crate::download::pipeline;
use crate::download::scratch::ScratchDir;
use crate::provider::MetadataProvider;
use crate::telegram::Bot;

/// Dependencies required by handlers
#[derive(Clone)]
pub struct HandlerDeps {
    pub provider: Arc<dyn MetadataProvider>,
    pub http: reqwest::Client,
    pub scratch: ScratchDir,
}

/// Parses an `sp` command line.
///
/// Accepts `<prefix>sp` and `<prefix>sp <url>` where `<prefix>` is one of the
/// configured prefix characters and at most one argument follows. Returns:
/// - `None`: not an `sp` command at all,
/// - `Some(None)`: `sp` with no URL (the prompt case),
/// - `Some(Some(url))`: `sp` with exactly one argument.
pub fn parse_sp_command(text: &str, prefixes: &[char]) -> Option<Option<String>> {
    let mut chars = text.chars();
    let first = chars.next()?;
    if !prefixes.contains(&first) {
        return None;
    }

    let rest = chars.as_str().strip_prefix("sp")?;
    if rest.is_empty() {
        return Some(None);
    }
    if !rest.starts_with(char::is_whitespace) {
        // a different command, e.g. "/spotify"
        return None;
    }

    let mut parts = rest.split_whitespace();
    let url = parts.next()?;
    if parts.next().is_some() {
        return None;
    }

    Some(Some(url.to_string()))
}

/// Builds the dispatcher handler tree for the bot.
pub fn schema() -> UpdateHandler<teloxide::RequestError> {
    Update::filter_message()
        .filter_map(|msg: Message| {
            msg.text()
                .and_then(|text| parse_sp_command(text, &config::COMMAND_PREFIXES))
        })
        .endpoint(|bot: Bot, msg: Message, url: Option<String>, deps: HandlerDeps| async move {
            pipeline::handle_track_request(&bot, &msg, url, &deps).await
        })
}
