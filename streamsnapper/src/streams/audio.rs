use serde::Serialize;
use serde_json::Value;

use super::{Score, Stream};
use crate::{itag, value};

/// yt-dlp marks the original track of a multi-language video with this
/// preference.
const ORIGINAL_LANGUAGE_PREFERENCE: i64 = 10;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AudioStream {
    pub url: String,
    pub codec: Option<String>,
    pub codec_variant: Option<String>,
    pub raw_codec: Option<String>,
    pub extension: Option<String>,
    /// Average bitrate in kbps.
    pub bitrate: Option<f64>,
    /// Sample rate in Hz.
    pub sample_rate: Option<u32>,
    pub channels: Option<u32>,
    pub language: Option<String>,
    pub is_original_audio: bool,
    pub quality_note: Option<String>,
    pub size: Option<u64>,
    pub format_id: Option<String>
}

impl AudioStream {
    pub fn from_raw(raw: &Value) -> Option<Self> {
        let url = value::get_url(raw, &["url"])?;
        let raw_codec = value::get_str(raw, &["acodec"]).filter(|c| c != "none");
        let (codec, codec_variant) = value::split_codec(raw_codec.as_deref());
        let format_id = value::get_str(raw, &["format_id"]);
        let quality_note = value::get_str(raw, &["format_note"]);

        let extension = format_id
            .as_deref()
            .and_then(itag::parse_itag)
            .and_then(itag::audio_extension)
            .map(str::to_string)
            .or_else(|| value::get_str(raw, &["audio_ext", "ext"]));

        let is_original_audio = is_original_track(
            quality_note.as_deref(),
            value::get_i64(raw, &["language_preference"])
        );

        Some(Self {
            url,
            codec,
            codec_variant,
            raw_codec,
            extension,
            bitrate: value::get_f64(raw, &["abr", "tbr"]),
            sample_rate: value::get_u32(raw, &["asr"]),
            channels: value::get_u32(raw, &["audio_channels"]),
            language: value::get_str(raw, &["language"]).map(|l| l.to_ascii_lowercase()),
            is_original_audio,
            quality_note,
            size: value::get_u64(raw, &["filesize", "filesize_approx"]),
            format_id
        })
    }
}

/// Multi-language videos annotate the original track in the format note
/// (`"English (US) original (default), medium"`); single-track videos only
/// carry a lowercase quality word (`"medium"`), which is the original too.
fn is_original_track(note: Option<&str>, language_preference: Option<i64>) -> bool {
    if language_preference.is_some_and(|p| p >= ORIGINAL_LANGUAGE_PREFERENCE) {
        return true;
    }

    note.is_some_and(|note| {
        let lower = note.to_lowercase();
        lower.contains("original") || lower.contains("(default)") || lower == note
    })
}

impl Stream for AudioStream {
    fn url(&self) -> &str {
        &self.url
    }

    fn score(&self) -> Option<Score> {
        let bitrate = self.bitrate?;
        let sample_rate_khz = self.sample_rate.map_or(0.0, |sr| f64::from(sr) / 1000.0);
        let channels = self.channels.map_or(0.0, f64::from);

        Some(Score::new(bitrate * 1000.0 + sample_rate_khz * 10.0 + channels * 10.0))
    }

    fn codec(&self) -> Option<&str> {
        self.codec.as_deref()
    }

    fn extension(&self) -> Option<&str> {
        self.extension.as_deref()
    }

    fn size(&self) -> Option<u64> {
        self.size
    }

    fn bitrate(&self) -> Option<f64> {
        self.bitrate
    }

    fn language(&self) -> Option<&str> {
        self.language.as_deref()
    }

    fn is_source_language(&self) -> bool {
        self.is_original_audio
    }
}

#[cfg(test)]
pub(crate) fn sample(url: &str, bitrate: f64, sample_rate: u32, channels: u32) -> AudioStream {
    AudioStream {
        url: url.to_string(),
        codec: Some("opus".to_string()),
        codec_variant: None,
        raw_codec: Some("opus".to_string()),
        extension: Some("webm".to_string()),
        bitrate: Some(bitrate),
        sample_rate: Some(sample_rate),
        channels: Some(channels),
        language: None,
        is_original_audio: false,
        quality_note: None,
        size: None,
        format_id: None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_raw_multi_language_track() {
        let raw = json!({
            "format_id": "251-1",
            "url": "https://rr1.googlevideo.com/videoplayback?itag=251",
            "acodec": "opus",
            "vcodec": "none",
            "abr": 129.4,
            "asr": 48000,
            "audio_channels": 2,
            "language": "en-US",
            "format_note": "English (United States) original (default), medium",
            "filesize_approx": 4_000_000
        });

        let stream = AudioStream::from_raw(&raw).unwrap();
        assert_eq!(stream.extension.as_deref(), Some("webm"));
        assert_eq!(stream.language.as_deref(), Some("en-us"));
        assert_eq!(stream.size, Some(4_000_000));
        assert!(stream.is_source_language());
    }

    #[test]
    fn test_dubbed_track_is_not_original() {
        let raw = json!({
            "url": "https://example.com/a",
            "acodec": "mp4a.40.2",
            "abr": 128,
            "language": "de",
            "format_note": "German, medium",
            "language_preference": -1
        });
        let stream = AudioStream::from_raw(&raw).unwrap();
        assert_eq!(stream.codec.as_deref(), Some("mp4a"));
        assert!(!stream.is_original_audio);
    }

    #[test]
    fn test_single_track_note_is_original() {
        assert!(is_original_track(Some("medium"), None));
        assert!(is_original_track(None, Some(10)));
        assert!(!is_original_track(None, None));
    }

    #[test]
    fn test_bitrate_dominates_score() {
        let low = sample("a", 128.0, 48000, 6);
        let high = sample("b", 130.0, 44100, 2);
        assert!(high.score().unwrap() > low.score().unwrap());

        let same_bitrate_better_rate = sample("c", 128.0, 48000, 2);
        let same_bitrate_worse_rate = sample("d", 128.0, 44100, 2);
        assert!(same_bitrate_better_rate.score() > same_bitrate_worse_rate.score());
    }

    #[test]
    fn test_missing_bitrate_is_unscorable() {
        let mut stream = sample("a", 128.0, 48000, 2);
        stream.bitrate = None;
        assert!(stream.score().is_none());
    }
}
