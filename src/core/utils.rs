use std::time::{SystemTime, UNIX_EPOCH};

/// Characters stripped from track titles before they become file names.
const FORBIDDEN_FILENAME_CHARS: &[char] = &['<', '>', ':', '"', '/', '\\', '|', '?', '*'];

/// Maximum length (in characters) of the title part of a scratch file name.
const MAX_TITLE_CHARS: usize = 50;

/// Turns a track title into a collision-free scratch file stem.
///
/// Strips filesystem-hostile characters, replaces spaces with underscores,
/// truncates to 50 characters and appends the current Unix timestamp so that
/// concurrent requests for similarly-titled tracks never collide.
pub fn sanitize_title(title: &str) -> String {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs();
    sanitize_title_at(title, now)
}

/// Clock-injected variant of [`sanitize_title`]; fully deterministic.
///
/// # Example
///
/// ```
/// use spotigram::core::utils::sanitize_title_at;
///
/// assert_eq!(sanitize_title_at("My Song?*", 1700000000), "My_Song_1700000000");
/// ```
pub fn sanitize_title_at(title: &str, unix_ts: u64) -> String {
    let cleaned: String = title
        .chars()
        .filter(|c| !FORBIDDEN_FILENAME_CHARS.contains(c))
        .map(|c| if c == ' ' { '_' } else { c })
        .take(MAX_TITLE_CHARS)
        .collect();

    format!("{}_{}", cleaned, unix_ts)
}

/// Formats a millisecond track duration as `M:SS`.
pub fn format_track_duration(duration_ms: u64) -> String {
    let total_secs = duration_ms / 1000;
    format!("{}:{:02}", total_secs / 60, total_secs % 60)
}

/// Escapes special characters for Telegram MarkdownV2.
///
/// MarkdownV2 requires escaping of
/// `_`, `*`, `[`, `]`, `(`, `)`, `~`, `` ` ``, `>`, `#`, `+`, `-`, `=`, `|`, `{`, `}`, `.`, `!`.
/// The backslash is escaped first so already-escaped text is not mangled.
pub fn escape_markdown_v2(text: &str) -> String {
    let mut result = String::with_capacity(text.len() * 2);

    for c in text.chars() {
        match c {
            '\\' => result.push_str("\\\\"),
            '_' => result.push_str("\\_"),
            '*' => result.push_str("\\*"),
            '[' => result.push_str("\\["),
            ']' => result.push_str("\\]"),
            '(' => result.push_str("\\("),
            ')' => result.push_str("\\)"),
            '~' => result.push_str("\\~"),
            '`' => result.push_str("\\`"),
            '>' => result.push_str("\\>"),
            '#' => result.push_str("\\#"),
            '+' => result.push_str("\\+"),
            '-' => result.push_str("\\-"),
            '=' => result.push_str("\\="),
            '|' => result.push_str("\\|"),
            '{' => result.push_str("\\{"),
            '}' => result.push_str("\\}"),
            '.' => result.push_str("\\."),
            '!' => result.push_str("\\!"),
            _ => result.push(c),
        }
    }

    result
}

/// Escapes a URL for use inside a MarkdownV2 inline-link target.
///
/// Inside `(...)` only `)` and `\` are special.
pub fn escape_markdown_url(url: &str) -> String {
    url.replace('\\', "\\\\").replace(')', "\\)")
}
