pub(crate) mod audio;
pub(crate) mod raw;
pub(crate) mod subtitle;
pub(crate) mod video;

use std::cmp::Ordering;

use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::Result;

pub use audio::AudioStream;
pub use raw::RawStreams;
pub use subtitle::SubtitleStream;
pub use video::VideoStream;

/// Ranking value of a stream. Only meaningful relative to other scores of
/// the same stream kind.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct Score(f64);

impl Score {
    pub fn new(value: f64) -> Self {
        Self(value)
    }

    pub fn value(self) -> f64 {
        self.0
    }
}

impl PartialEq for Score {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Score {}

impl PartialOrd for Score {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Score {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

/// Capabilities shared by every stream kind.
///
/// `score` returns `None` when the stream lacks an attribute its kind needs
/// for ranking; such streams stay enumerable but never win best/worst.
pub trait Stream: Clone + Serialize + Send + Sync {
    fn url(&self) -> &str;

    fn score(&self) -> Option<Score>;

    fn codec(&self) -> Option<&str>;

    fn extension(&self) -> Option<&str>;

    /// Size in bytes, when the extractor reported one.
    fn size(&self) -> Option<u64>;

    /// Bitrate in kbps.
    fn bitrate(&self) -> Option<f64> {
        None
    }

    fn language(&self) -> Option<&str> {
        None
    }

    fn is_source_language(&self) -> bool {
        false
    }

    fn to_map(&self) -> Map<String, Value> {
        match serde_json::to_value(self) {
            Ok(Value::Object(map)) => map,
            _ => Map::new()
        }
    }

    fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Canonical family name for codec aliases, so `h264` finds `avc1` streams.
pub(crate) fn codec_family(codec: &str) -> String {
    let codec = codec.trim().to_ascii_lowercase();
    let base = codec.split('.').next().unwrap_or_default();

    let family = match base {
        "avc1" | "avc3" | "h264" | "avc" => "h264",
        "hev1" | "hvc1" | "h265" | "hevc" => "h265",
        "vp09" | "vp9" => "vp9",
        "vp8" | "vp08" => "vp8",
        "av01" | "av1" => "av1",
        "mp4a" | "aac" => "aac",
        "ac-3" | "ac3" => "ac3",
        "ec-3" | "eac3" => "eac3",
        other => other
    };

    family.to_string()
}
