use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Browsers yt-dlp can read cookies from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CookieBrowser {
    Chrome,
    Firefox,
    Edge,
    Safari,
    Opera,
    Brave,
    Chromium
}

impl CookieBrowser {
    pub fn as_str(&self) -> &'static str {
        match self {
            CookieBrowser::Chrome => "chrome",
            CookieBrowser::Firefox => "firefox",
            CookieBrowser::Edge => "edge",
            CookieBrowser::Safari => "safari",
            CookieBrowser::Opera => "opera",
            CookieBrowser::Brave => "brave",
            CookieBrowser::Chromium => "chromium"
        }
    }
}

impl fmt::Display for CookieBrowser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CookieBrowser {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "chrome" => Ok(CookieBrowser::Chrome),
            "firefox" => Ok(CookieBrowser::Firefox),
            "edge" => Ok(CookieBrowser::Edge),
            "safari" => Ok(CookieBrowser::Safari),
            "opera" => Ok(CookieBrowser::Opera),
            "brave" => Ok(CookieBrowser::Brave),
            "chromium" => Ok(CookieBrowser::Chromium),
            other => Err(Error::UnsupportedBrowser(other.to_string()))
        }
    }
}

/// Where yt-dlp should take its cookies from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Cookies {
    /// Netscape-format cookie file.
    File(PathBuf),
    Browser(CookieBrowser)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_browser_from_str() {
        assert_eq!("Firefox".parse::<CookieBrowser>().unwrap(), CookieBrowser::Firefox);
        assert_eq!(" brave ".parse::<CookieBrowser>().unwrap(), CookieBrowser::Brave);
        assert!(matches!(
            "netscape".parse::<CookieBrowser>(),
            Err(Error::UnsupportedBrowser(_))
        ));
    }

    #[test]
    fn test_cookies_deserialize() {
        let cookies: Cookies = serde_json::from_str(r#"{"browser":"chrome"}"#).unwrap();
        assert_eq!(cookies, Cookies::Browser(CookieBrowser::Chrome));

        let cookies: Cookies = serde_json::from_str(r#"{"file":"/tmp/cookies.txt"}"#).unwrap();
        assert_eq!(cookies, Cookies::File(PathBuf::from("/tmp/cookies.txt")));
    }
}
