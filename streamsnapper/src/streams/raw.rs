use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::{AudioStream, Stream, SubtitleStream, VideoStream};
use crate::collection::StreamCollection;
use crate::error::{Error, Result};
use crate::value;

/// Unvalidated stream descriptors, one list per kind.
///
/// Subtitle descriptors are the extractor's entries with two extra keys:
/// `language` (the code they were keyed under) and `automatic` (whether they
/// came from the auto-generated captions).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawStreams {
    #[serde(default)]
    pub video: Vec<Value>,
    #[serde(default)]
    pub audio: Vec<Value>,
    #[serde(default)]
    pub subtitles: Vec<Value>,
    #[serde(default)]
    pub source_language: Option<String>
}

impl RawStreams {
    /// Splits a yt-dlp info document into per-kind descriptor lists.
    pub fn from_info(info: &Value) -> Result<Self> {
        let Some(formats) = info.get("formats").and_then(Value::as_array) else {
            return Err(Error::InvalidData("missing required key \"formats\"".to_string()));
        };

        let mut raw = RawStreams {
            source_language: value::get_str(info, &["language"]),
            ..Self::default()
        };

        for format in formats {
            if is_storyboard(format) {
                continue;
            }

            if has_codec(format, "vcodec") {
                raw.video.push(format.clone());
            } else if has_codec(format, "acodec") {
                raw.audio.push(format.clone());
            } else {
                tracing::trace!(format_id = ?format.get("format_id"), "format has no usable track");
            }
        }

        collect_subtitles(info.get("subtitles"), false, &mut raw.subtitles);
        collect_subtitles(info.get("automatic_captions"), true, &mut raw.subtitles);

        tracing::debug!(
            video = raw.video.len(),
            audio = raw.audio.len(),
            subtitles = raw.subtitles.len(),
            "classified extractor formats"
        );

        Ok(raw)
    }

    pub fn video_streams(&self) -> StreamCollection<VideoStream> {
        build("video", &self.video, VideoStream::from_raw)
    }

    pub fn audio_streams(&self) -> StreamCollection<AudioStream> {
        build("audio", &self.audio, AudioStream::from_raw)
    }

    pub fn subtitle_streams(&self) -> StreamCollection<SubtitleStream> {
        let source = self.source_language.as_deref();
        build("subtitle", &self.subtitles, |raw| {
            let language = value::get_str(raw, &["language"])?;
            let automatic = value::get_bool(raw, &["automatic"]).unwrap_or(false);
            SubtitleStream::from_raw(&language, raw, automatic, source)
        })
    }
}

fn build<S: Stream>(
    kind: &'static str,
    descriptors: &[Value],
    parse: impl Fn(&Value) -> Option<S>
) -> StreamCollection<S> {
    let streams = descriptors.iter().filter_map(|raw| {
        let parsed = parse(raw);
        if parsed.is_none() {
            tracing::warn!(
                kind,
                format_id = ?raw.get("format_id"),
                "skipping stream descriptor without a usable URL"
            );
        }
        parsed
    });

    StreamCollection::new(streams)
}

fn has_codec(format: &Value, key: &str) -> bool {
    value::get_str(format, &[key]).is_some_and(|codec| codec != "none")
}

fn is_storyboard(format: &Value) -> bool {
    value::get_str(format, &["ext"]).is_some_and(|ext| ext == "mhtml")
        || value::get_str(format, &["format_note"])
            .is_some_and(|note| note.to_ascii_lowercase().contains("storyboard"))
}

fn collect_subtitles(mapping: Option<&Value>, automatic: bool, out: &mut Vec<Value>) {
    let Some(mapping) = mapping.and_then(Value::as_object) else {
        return;
    };

    let mut languages: Vec<&String> = mapping.keys().collect();
    languages.sort();

    for language in languages {
        if language == "live_chat" {
            continue;
        }
        let Some(entries) = mapping[language].as_array() else {
            continue;
        };

        for entry in entries {
            let mut descriptor = entry.as_object().cloned().unwrap_or_else(Map::new);
            descriptor.insert("language".to_string(), Value::String(language.clone()));
            descriptor.insert("automatic".to_string(), Value::Bool(automatic));
            out.push(Value::Object(descriptor));
        }
    }
}

#[cfg(test)]
pub(crate) fn sample_info() -> Value {
    serde_json::json!({
        "id": "dQw4w9WgXcQ",
        "title": "Sample",
        "language": "en",
        "formats": [
            { "format_id": "sb0", "ext": "mhtml", "vcodec": "none", "acodec": "none",
              "format_note": "storyboard", "url": "https://i.ytimg.com/sb/0" },
            { "format_id": "251", "url": "https://example.com/251", "acodec": "opus",
              "vcodec": "none", "abr": 130.1, "asr": 48000, "audio_channels": 2,
              "format_note": "medium" },
            { "format_id": "140", "url": "https://example.com/140", "acodec": "mp4a.40.2",
              "vcodec": "none", "abr": 129.5, "asr": 44100, "audio_channels": 2,
              "format_note": "medium" },
            { "format_id": "137", "url": "https://example.com/137", "vcodec": "avc1.640028",
              "acodec": "none", "width": 1920, "height": 1080, "fps": 30, "tbr": 4400.0 },
            { "format_id": "248", "url": "https://example.com/248", "vcodec": "vp9",
              "acodec": "none", "width": 1920, "height": 1080, "fps": 30, "tbr": 2600.0 },
            { "format_id": "136", "url": "https://example.com/136", "vcodec": "avc1.4d401f",
              "acodec": "none", "width": 1280, "height": 720, "fps": 30, "tbr": 1900.0 },
            { "format_id": "137", "vcodec": "avc1.640028", "acodec": "none",
              "width": 1920, "height": 1080 }
        ],
        "subtitles": {
            "live_chat": [{ "ext": "json", "url": "https://example.com/chat" }],
            "en": [
                { "ext": "vtt", "url": "https://example.com/sub/en.vtt", "name": "English" },
                { "ext": "srv3", "url": "https://example.com/sub/en.srv3", "name": "English" }
            ]
        },
        "automatic_captions": {
            "fr": [{ "ext": "vtt", "url": "https://example.com/auto/fr.vtt", "name": "French" }]
        }
    })
}
