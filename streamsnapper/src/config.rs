use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;
use yt_dlp::{CookieBrowser, Cookies, YtDlp};

use crate::language::DEFAULT_LOCALE;

pub const ENV_YTDLP_PATH: &str = "STREAMSNAPPER_YTDLP_PATH";
pub const ENV_COOKIES_FILE: &str = "STREAMSNAPPER_COOKIES_FILE";
pub const ENV_COOKIES_BROWSER: &str = "STREAMSNAPPER_COOKIES_BROWSER";
pub const ENV_EXTRACTOR_ARGS: &str = "STREAMSNAPPER_EXTRACTOR_ARGS";

const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// yt-dlp executable; resolved through `PATH` when unset.
    pub ytdlp_path: Option<PathBuf>,
    pub cookies: Option<Cookies>,
    /// Passed to yt-dlp verbatim, after the built-in flags.
    pub extra_args: Vec<String>,
    pub http_timeout_secs: u64,
    /// Used when the system locale cannot be determined.
    pub fallback_locale: String
}

impl Default for Config {
    fn default() -> Self {
        Self {
            ytdlp_path: None,
            cookies: None,
            extra_args: Vec::new(),
            http_timeout_secs: DEFAULT_HTTP_TIMEOUT_SECS,
            fallback_locale: DEFAULT_LOCALE.to_string()
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let mut config = Self::default();

        if let Some(path) = get(ENV_YTDLP_PATH) {
            tracing::debug!(%path, "using custom yt-dlp path");
            config.ytdlp_path = Some(PathBuf::from(path.trim()));
        }

        if let Some(file) = get(ENV_COOKIES_FILE) {
            config.cookies = Some(Cookies::File(PathBuf::from(file.trim())));
        } else if let Some(browser) = get(ENV_COOKIES_BROWSER) {
            match browser.parse::<CookieBrowser>() {
                Ok(browser) => config.cookies = Some(Cookies::Browser(browser)),
                Err(e) => tracing::warn!(error = %e, "ignoring {ENV_COOKIES_BROWSER}")
            }
        }

        if let Some(args) = get(ENV_EXTRACTOR_ARGS) {
            config.extra_args = parse_extractor_args(&args);
        }

        config
    }

    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }

    pub fn build_client(&self) -> YtDlp {
        let mut client = match &self.ytdlp_path {
            Some(path) => YtDlp::with_binary(path),
            None => YtDlp::new()
        };
        client.set_cookies(self.cookies.clone());
        client.set_extra_args(self.extra_args.clone());
        client
    }
}

/// Joins one extractor argument per line (or `;`-separated) into a single
/// `--extractor-args` flag.
pub fn parse_extractor_args(input: &str) -> Vec<String> {
    let joined: Vec<&str> = input
        .split(['\n', ';'])
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect();
    if joined.is_empty() {
        return Vec::new();
    }
    vec!["--extractor-args".to_string(), joined.join(";")]
}
