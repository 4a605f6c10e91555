use serde::Serialize;
use serde_json::Value;

use super::{Score, Stream, codec_family};
use crate::{itag, value};

/// Framerates above this earn no additional bonus.
const MAX_BONUS_FRAMERATE: f64 = 60.0;
const FRAMERATE_WEIGHT: f64 = 0.20;
const HDR_BONUS: f64 = 0.10;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VideoStream {
    pub url: String,
    pub codec: Option<String>,
    pub codec_variant: Option<String>,
    pub raw_codec: Option<String>,
    pub extension: Option<String>,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub framerate: Option<f64>,
    /// Total bitrate in kbps.
    pub bitrate: Option<f64>,
    pub quality_note: Option<String>,
    pub is_hdr: bool,
    pub size: Option<u64>,
    pub language: Option<String>,
    pub format_id: Option<String>
}

impl VideoStream {
    /// Builds a stream from one yt-dlp format entry. Entries without a URL
    /// have no identity and yield `None`.
    pub fn from_raw(raw: &Value) -> Option<Self> {
        let url = value::get_url(raw, &["url"])?;
        let raw_codec = value::get_str(raw, &["vcodec"]).filter(|c| c != "none");
        let (codec, codec_variant) = value::split_codec(raw_codec.as_deref());
        let format_id = value::get_str(raw, &["format_id"]);
        let quality_note = value::get_str(raw, &["format_note"]);

        let extension = format_id
            .as_deref()
            .and_then(itag::parse_itag)
            .and_then(itag::video_extension)
            .map(str::to_string)
            .or_else(|| value::get_str(raw, &["ext", "video_ext"]));

        let dynamic_range = value::get_str(raw, &["dynamic_range"]);
        let is_hdr = dynamic_range.is_some_and(|range| !range.eq_ignore_ascii_case("sdr"))
            || quality_note
                .as_deref()
                .is_some_and(|note| note.to_ascii_lowercase().contains("hdr"));

        Some(Self {
            url,
            codec,
            codec_variant,
            raw_codec,
            extension,
            width: value::get_u32(raw, &["width"]),
            height: value::get_u32(raw, &["height"]),
            framerate: value::get_f64(raw, &["fps"]),
            bitrate: value::get_f64(raw, &["tbr", "vbr"]),
            quality_note,
            is_hdr,
            size: value::get_u64(raw, &["filesize", "filesize_approx"]),
            language: value::get_str(raw, &["language"]),
            format_id
        })
    }

    /// Resolution label in the `1080p` form.
    pub fn quality_label(&self) -> Option<String> {
        self.height.map(|height| format!("{height}p"))
    }

    /// `None` when either dimension is missing or zero.
    pub fn pixel_count(&self) -> Option<u64> {
        let width = self.width.filter(|w| *w > 0)?;
        let height = self.height.filter(|h| *h > 0)?;
        Some(u64::from(width) * u64::from(height))
    }

    fn bonus_factor(&self) -> f64 {
        let framerate = self
            .framerate
            .map_or(0.0, |fps| fps.clamp(0.0, MAX_BONUS_FRAMERATE) / MAX_BONUS_FRAMERATE);
        let hdr = if self.is_hdr { HDR_BONUS } else { 0.0 };
        let codec = self.codec.as_deref().map_or(0.0, codec_efficiency);

        1.0 + framerate * FRAMERATE_WEIGHT + hdr + codec
    }
}

/// Bonus for codecs that deliver more quality per bit. The largest bonus
/// factor a stream can reach stays below the smallest resolution ladder step
/// (1080p to 1440p, x1.78), so pixel count always dominates.
fn codec_efficiency(codec: &str) -> f64 {
    match codec_family(codec).as_str() {
        "av1" => 0.15,
        "vp9" => 0.10,
        "h265" => 0.07,
        "vp8" => 0.02,
        _ => 0.0
    }
}

impl Stream for VideoStream {
    fn url(&self) -> &str {
        &self.url
    }

    #[allow(clippy::cast_precision_loss)]
    fn score(&self) -> Option<Score> {
        let pixels = self.pixel_count()? as f64;
        let bitrate = self.bitrate.unwrap_or(0.0).max(0.0);

        Some(Score::new(pixels * self.bonus_factor() + bitrate / 1000.0))
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
}

#[cfg(test)]
pub(crate) fn sample(url: &str, width: u32, height: u32, codec: &str) -> VideoStream {
    VideoStream {
        url: url.to_string(),
        codec: Some(codec.to_string()),
        codec_variant: None,
        raw_codec: Some(codec.to_string()),
        extension: Some("mp4".to_string()),
        width: Some(width),
        height: Some(height),
        framerate: Some(30.0),
        bitrate: Some(2500.0),
        quality_note: None,
        is_hdr: false,
        size: None,
        language: None,
        format_id: None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_raw_youtube_format() {
        let raw = json!({
            "format_id": "337",
            "url": "https://rr1.googlevideo.com/videoplayback?itag=337",
            "vcodec": "vp09.02.51.10.01.09.16.09.00",
            "acodec": "none",
            "ext": "webm",
            "width": 3840,
            "height": 2160,
            "fps": 60,
            "tbr": 21000.5,
            "format_note": "2160p60 HDR",
            "dynamic_range": "HDR10",
            "filesize": 123456789
        });

        let stream = VideoStream::from_raw(&raw).unwrap();
        assert_eq!(stream.codec.as_deref(), Some("vp09"));
        assert_eq!(stream.codec_variant.as_deref(), Some("02.51.10.01.09.16.09.00"));
        assert_eq!(stream.extension.as_deref(), Some("webm"));
        assert_eq!(stream.quality_label().as_deref(), Some("2160p"));
        assert_eq!(stream.framerate, Some(60.0));
        assert_eq!(stream.size, Some(123_456_789));
        assert!(stream.is_hdr);
    }

    #[test]
    fn test_from_raw_without_url_is_skipped() {
        assert!(VideoStream::from_raw(&json!({ "vcodec": "avc1", "height": 720 })).is_none());
    }

    #[test]
    fn test_missing_dimensions_is_unscorable() {
        let raw = json!({ "url": "https://example.com/v", "vcodec": "avc1", "height": 720 });
        let stream = VideoStream::from_raw(&raw).unwrap();
        assert!(stream.score().is_none());
    }

    #[test]
    fn test_zero_dimension_is_unscorable() {
        let mut low = sample("low", 0, 720, "avc1");
        low.framerate = Some(30.0);
        low.bitrate = Some(5000.0);
        let mut high = sample("high", 0, 1080, "avc1");
        high.framerate = Some(30.0);
        high.bitrate = Some(1000.0);

        assert_eq!(low.pixel_count(), None);
        assert!(low.score().is_none());
        assert!(high.score().is_none());

        let raw = json!({ "url": "https://example.com/v", "vcodec": "avc1", "width": 1280, "height": 0 });
        assert!(VideoStream::from_raw(&raw).unwrap().score().is_none());
    }

    #[test]
    fn test_score_monotonic_in_height() {
        let mut previous = None;
        for height in [144, 240, 360, 480, 719, 720, 1080, 1440, 2160, 4320] {
            let score = sample("u", 1920, height, "avc1").score().unwrap();
            if let Some(prev) = previous {
                assert!(score >= prev, "height {height} scored lower than a smaller height");
            }
            previous = Some(score);
        }
    }

    #[test]
    fn test_resolution_dominates_bonuses() {
        let mut fancy = sample("a", 1920, 1080, "av01");
        fancy.framerate = Some(60.0);
        fancy.is_hdr = true;
        let plain = sample("b", 2560, 1440, "avc1");
        assert!(plain.score().unwrap() > fancy.score().unwrap());
    }

    #[test]
    fn test_efficient_codec_and_hdr_raise_score() {
        let h264 = sample("a", 1920, 1080, "avc1");
        let av1 = sample("b", 1920, 1080, "av01");
        let mut hdr = sample("c", 1920, 1080, "avc1");
        hdr.is_hdr = true;
        assert!(av1.score().unwrap() > h264.score().unwrap());
        assert!(hdr.score().unwrap() > h264.score().unwrap());
    }

    #[test]
    fn test_to_map_has_plain_keys() {
        let map = sample("https://example.com/v", 1280, 720, "avc1").to_map();
        assert_eq!(map["height"], json!(720));
        assert_eq!(map["url"], json!("https://example.com/v"));
        assert_eq!(map["is_hdr"], json!(false));
    }
}
