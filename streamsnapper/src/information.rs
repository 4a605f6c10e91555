use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::Result;
use crate::utils::{DEFAULT_MAX_FILENAME_LENGTH, sanitize_filename};
use crate::value;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Chapter {
    pub title: Option<String>,
    pub start_time: Option<f64>,
    pub end_time: Option<f64>
}

/// Non-stream metadata of one video, normalized from the extractor output.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct VideoInformation {
    pub source_url: Option<String>,
    pub short_url: Option<String>,
    pub embed_url: Option<String>,
    pub youtube_music_url: Option<String>,
    pub full_url: Option<String>,

    pub id: Option<String>,
    pub title: Option<String>,
    pub clean_title: Option<String>,
    pub description: Option<String>,

    pub channel_id: Option<String>,
    pub channel_url: Option<String>,
    pub channel_name: Option<String>,
    pub clean_channel_name: Option<String>,
    pub is_verified_channel: bool,

    pub duration: Option<u64>,
    pub view_count: Option<u64>,
    pub like_count: Option<u64>,
    pub dislike_count: Option<u64>,
    pub comment_count: u64,
    pub follow_count: Option<u64>,

    pub is_age_restricted: bool,
    pub categories: Vec<String>,
    pub tags: Vec<String>,
    pub chapters: Vec<Chapter>,
    pub is_streaming: Option<bool>,
    pub upload_timestamp: Option<i64>,
    pub availability: Option<String>,
    pub language: Option<String>,

    /// Candidate thumbnails, largest first.
    pub thumbnails: Vec<String>
}

impl VideoInformation {
    pub fn from_info(info: &Value, source_url: Option<&str>) -> Self {
        let id = value::get_str(info, &["id"]);
        let title = value::get_str(info, &["fulltitle", "title"]);
        let channel_name = value::get_str(info, &["channel", "uploader"]);

        let chapters = match info.get("chapters").and_then(Value::as_array) {
            Some(chapters) => chapters
                .iter()
                .map(|chapter| Chapter {
                    title: value::get_str(chapter, &["title"]),
                    start_time: value::get_f64(chapter, &["start_time"]),
                    end_time: value::get_f64(chapter, &["end_time"])
                })
                .collect(),
            None => Vec::new()
        };

        let mut information = Self {
            source_url: source_url.map(str::to_string),
            clean_title: title
                .as_deref()
                .and_then(|t| sanitize_filename(t, Some(DEFAULT_MAX_FILENAME_LENGTH))),
            title,
            description: value::get_str(info, &["description"]),
            channel_id: value::get_str(info, &["channel_id"]),
            channel_url: value::get_str(info, &["channel_url", "uploader_url"]),
            clean_channel_name: channel_name
                .as_deref()
                .and_then(|c| sanitize_filename(c, Some(DEFAULT_MAX_FILENAME_LENGTH))),
            channel_name,
            is_verified_channel: value::get_bool(info, &["channel_is_verified"]).unwrap_or(false),
            duration: value::get_u64(info, &["duration"]),
            view_count: value::get_u64(info, &["view_count"]),
            like_count: value::get_u64(info, &["like_count"]),
            dislike_count: None,
            comment_count: value::get_u64(info, &["comment_count"]).unwrap_or(0),
            follow_count: value::get_u64(info, &["channel_follower_count"]),
            is_age_restricted: value::get_u64(info, &["age_limit"]).is_some_and(|limit| limit > 0),
            categories: value::get_str_list(info, &["categories"]),
            tags: value::get_str_list(info, &["tags"]),
            chapters,
            is_streaming: value::get_bool(info, &["is_live"]),
            upload_timestamp: value::get_i64(info, &["timestamp", "release_timestamp"]),
            availability: value::get_str(info, &["availability"]),
            language: value::get_str(info, &["language"]),
            ..Self::default()
        };

        if let Some(id) = &id {
            information.short_url = Some(format!("https://youtu.be/{id}"));
            information.embed_url = Some(format!("https://www.youtube.com/embed/{id}"));
            information.youtube_music_url = Some(format!("https://music.youtube.com/watch?v={id}"));
            information.full_url = Some(format!("https://www.youtube.com/watch?v={id}"));
            information.thumbnails = thumbnail_candidates(id);
        }
        information.id = id;

        information
    }

    pub fn to_map(&self) -> Map<String, Value> {
        match serde_json::to_value(self) {
            Ok(Value::Object(map)) => map,
            _ => Map::new()
        }
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// The fixed YouTube thumbnail renditions, from largest to smallest. Not all
/// of them exist for every video.
pub fn thumbnail_candidates(video_id: &str) -> Vec<String> {
    ["maxresdefault", "sddefault", "hqdefault", "mqdefault", "default"]
        .iter()
        .map(|name| format!("https://img.youtube.com/vi/{video_id}/{name}.jpg"))
        .collect()
}
