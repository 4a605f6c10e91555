use serde::{Deserialize, Serialize};

/// One line of `--flat-playlist` output: a playlist, channel or search entry
/// that has not been resolved into a full video document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlatEntry {
    pub id: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub ie_key: Option<String>,
    #[serde(default)]
    pub duration: Option<f64>,
    #[serde(default)]
    pub channel: Option<String>,
    #[serde(default)]
    pub channel_id: Option<String>,
    #[serde(default)]
    pub view_count: Option<u64>,
    #[serde(default)]
    pub playlist_index: Option<u32>
}

impl FlatEntry {
    /// Entries that point at a single video rather than a nested playlist.
    pub fn is_video(&self) -> bool {
        match self.ie_key.as_deref() {
            Some(key) => key == "Youtube",
            None => self.id.len() == 11
        }
    }

    pub fn watch_url(&self) -> String {
        format!("https://www.youtube.com/watch?v={}", self.id)
    }
}
