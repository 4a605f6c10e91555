use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

static PLATFORM_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:https?://)?(?:www\.)?(music\.)?youtube\.com|youtu\.be")
        .expect("platform regex is valid")
});

static VIDEO_ID_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?:youtu\.be/|youtube\.com/(?:watch\?v=|embed/|v/|shorts/|music/|live/|.*[?&]v=))([a-zA-Z0-9_-]{11})"
    )
    .expect("video id regex is valid")
});

static PLAYLIST_ID_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"youtube\.com/(?:playlist\?|watch\?|music/playlist\?)(?:.*?&)?list=([a-zA-Z0-9_-]+)")
        .expect("playlist id regex is valid")
});

/// Public playlist ids are always this long; mixes and other generated
/// lists are not.
const PUBLIC_PLAYLIST_ID_LEN: usize = 34;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Platform {
    YouTube,
    YouTubeMusic
}

pub fn identify_platform(url: &str) -> Option<Platform> {
    let captures = PLATFORM_RE.captures(url)?;
    if captures.get(1).is_some() {
        Some(Platform::YouTubeMusic)
    } else {
        Some(Platform::YouTube)
    }
}

pub fn extract_video_id(url: &str) -> Option<String> {
    VIDEO_ID_RE
        .captures(url)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
}

/// Playlist id of a playlist or watch URL. Generated lists such as mixes
/// (`RD...`) are only returned with `include_private`.
pub fn extract_playlist_id(url: &str, include_private: bool) -> Option<String> {
    let id = PLAYLIST_ID_RE.captures(url)?.get(1)?.as_str();

    let accepted = if include_private {
        id.len() >= PUBLIC_PLAYLIST_ID_LEN || id.starts_with("RD")
    } else {
        id.len() == PUBLIC_PLAYLIST_ID_LEN
    };

    accepted.then(|| id.to_string())
}
