use once_cell::sync::Lazy;
use std::env;
use std::time::Duration;

/// Configuration constants for the bot
/// Bot token
/// Read from BOT_TOKEN or TELOXIDE_TOKEN environment variable
pub static BOT_TOKEN: Lazy<String> = Lazy::new(|| {
    env::var("BOT_TOKEN")
        .or_else(|_| env::var("TELOXIDE_TOKEN"))
        .unwrap_or_else(|_| String::new())
});

/// Base URL of the third-party Spotify scraping API
/// Read from SCRAPER_API_URL environment variable
pub static SCRAPER_API_URL: Lazy<String> =
    Lazy::new(|| env::var("SCRAPER_API_URL").unwrap_or_else(|_| "https://iam404.serv00.net".to_string()));

/// Spotify Web API client credentials
/// Read from SPOTIFY_CLIENT_ID / SPOTIFY_CLIENT_SECRET environment variables
/// Required only when SP_PROVIDER=spotify
pub static SPOTIFY_CLIENT_ID: Lazy<String> =
    Lazy::new(|| env::var("SPOTIFY_CLIENT_ID").unwrap_or_else(|_| String::new()));

pub static SPOTIFY_CLIENT_SECRET: Lazy<String> =
    Lazy::new(|| env::var("SPOTIFY_CLIENT_SECRET").unwrap_or_else(|_| String::new()));

/// Which metadata provider backs the `sp` command: "scraper" or "spotify"
/// Read from SP_PROVIDER environment variable
/// Default: scraper
pub static METADATA_PROVIDER: Lazy<String> =
    Lazy::new(|| env::var("SP_PROVIDER").unwrap_or_else(|_| "scraper".to_string()));

/// Scratch directory for per-request temporary media files
/// Read from SCRATCH_DIR environment variable
/// Created on startup if absent
pub static SCRATCH_DIR: Lazy<String> =
    Lazy::new(|| env::var("SCRATCH_DIR").unwrap_or_else(|_| "temp_media".to_string()));

/// Cached yt-dlp binary path
/// Read once at startup from YTDL_BIN environment variable or defaults to "yt-dlp"
pub static YTDL_BIN: Lazy<String> = Lazy::new(|| env::var("YTDL_BIN").unwrap_or_else(|_| "yt-dlp".to_string()));

/// Path to cookies file for YouTube authentication
/// Read from YTDL_COOKIES_FILE environment variable
/// Example: youtube_cookies.txt
pub static YTDL_COOKIES_FILE: Lazy<Option<String>> = Lazy::new(|| env::var("YTDL_COOKIES_FILE").ok());

/// Target mp3 bitrate for extracted audio
/// Read from AUDIO_BITRATE environment variable
/// Default: 192k
pub static AUDIO_BITRATE: Lazy<String> =
    Lazy::new(|| env::var("AUDIO_BITRATE").unwrap_or_else(|_| "192k".to_string()));

/// Characters accepted as command prefixes for the `sp` command
/// Read from COMMAND_PREFIX environment variable, one prefix per character
/// Default: "/!."
pub static COMMAND_PREFIXES: Lazy<Vec<char>> =
    Lazy::new(|| env::var("COMMAND_PREFIX").unwrap_or_else(|_| "/!.".to_string()).chars().collect());

/// Log file path
/// Read from LOG_FILE_PATH environment variable
/// Default: spotigram.log
pub static LOG_FILE_PATH: Lazy<String> =
    Lazy::new(|| env::var("LOG_FILE_PATH").unwrap_or_else(|_| "spotigram.log".to_string()));

/// Network configuration
pub mod network {
    use super::Duration;

    /// Timeout for metadata/token HTTP requests (in seconds)
    pub const METADATA_TIMEOUT_SECS: u64 = 30;

    /// Timeout for asset (cover/audio) HTTP downloads (in seconds)
    pub const ASSET_TIMEOUT_SECS: u64 = 120;

    /// Request timeout for the Telegram client (in seconds)
    /// Generous because it covers the whole multipart upload of the audio file
    pub const REQUEST_TIMEOUT_SECS: u64 = 900;

    /// Metadata request timeout duration
    pub fn metadata_timeout() -> Duration {
        Duration::from_secs(METADATA_TIMEOUT_SECS)
    }

    /// Asset download timeout duration
    pub fn asset_timeout() -> Duration {
        Duration::from_secs(ASSET_TIMEOUT_SECS)
    }

    /// Telegram client timeout duration
    pub fn request_timeout() -> Duration {
        Duration::from_secs(REQUEST_TIMEOUT_SECS)
    }
}

/// yt-dlp invocation configuration
pub mod ytdlp {
    use super::Duration;

    /// Timeout for the search-only metadata query (in seconds)
    pub const SEARCH_TIMEOUT_SECS: u64 = 30;

    /// Timeout for the audio extraction run (in seconds)
    pub const EXTRACT_TIMEOUT_SECS: u64 = 240;

    /// Search query timeout duration
    pub fn search_timeout() -> Duration {
        Duration::from_secs(SEARCH_TIMEOUT_SECS)
    }

    /// Extraction timeout duration
    pub fn extract_timeout() -> Duration {
        Duration::from_secs(EXTRACT_TIMEOUT_SECS)
    }
}

/// Upload progress reporting configuration
pub mod progress {
    use super::Duration;

    /// Minimum interval between status message edits (in seconds)
    pub const EDIT_INTERVAL_SECS: u64 = 2;

    /// Interval between upload byte-counter polls (in milliseconds)
    pub const POLL_INTERVAL_MS: u64 = 500;

    /// Edit throttle interval duration
    pub fn edit_interval() -> Duration {
        Duration::from_secs(EDIT_INTERVAL_SECS)
    }

    /// Poll interval duration
    pub fn poll_interval() -> Duration {
        Duration::from_millis(POLL_INTERVAL_MS)
    }
}
