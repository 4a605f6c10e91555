//! Kind-specific queries and fixed-threshold views. Every threshold is
//! inclusive.

use super::{StreamCollection, dedup, float_range_is_satisfiable, in_range, pick};
use crate::error::{Error, Result};
use crate::streams::{AudioStream, Stream, SubtitleStream, VideoStream};

/// `hd_streams`: height of at least 720 pixels.
pub const HD_MIN_HEIGHT: u32 = 720;
/// `full_hd_streams`: height of at least 1080 pixels.
pub const FULL_HD_MIN_HEIGHT: u32 = 1080;
/// `uhd_streams`: height of at least 2160 pixels.
pub const UHD_MIN_HEIGHT: u32 = 2160;

/// `high_quality_streams`: at least 128 kbps.
pub const HIGH_QUALITY_MIN_BITRATE: f64 = 128.0;
/// `lossless_quality_streams`: at least 320 kbps...
pub const LOSSLESS_MIN_BITRATE: f64 = 320.0;
/// ...and at least 48 kHz.
pub const LOSSLESS_MIN_SAMPLE_RATE: u32 = 48_000;
/// `stereo_streams`: exactly two channels.
pub const STEREO_CHANNELS: u32 = 2;
/// `surround_streams`: six channels (5.1) or more.
pub const SURROUND_MIN_CHANNELS: u32 = 6;

impl StreamCollection<VideoStream> {
    /// Picks a stream by resolution label (`"1080p"` or `"1080"`).
    ///
    /// An exact height match returns the best stream of that height. Without
    /// one, `fallback` picks the nearest lower height, or the nearest higher
    /// height when nothing lower exists.
    pub fn get_by_resolution(&self, target: &str, fallback: bool) -> Result<Option<&VideoStream>> {
        let target_height = parse_resolution(target)?;

        if let Some(stream) = self.best_at_height(target_height) {
            return Ok(Some(stream));
        }

        if !fallback {
            return Ok(None);
        }

        let heights = || self.iter().filter_map(|s| s.height);
        let lower = heights().filter(|h| *h < target_height).max();
        let nearest = lower.or_else(|| heights().filter(|h| *h > target_height).min());

        tracing::debug!(target_height, ?nearest, "no exact resolution match, falling back");

        Ok(nearest.and_then(|height| self.best_at_height(height)))
    }

    /// Streams with a framerate inside the inclusive range.
    pub fn get_by_framerate_range(&self, min: Option<f64>, max: Option<f64>) -> Result<Self> {
        if !float_range_is_satisfiable("min_framerate", min, "max_framerate", max)? {
            return Ok(Self::default());
        }

        Ok(self.filter(|s| s.framerate.is_some_and(|fps| in_range(fps, min, max))))
    }

    /// Resolution labels (`"1080p"`) in first-seen order.
    pub fn available_qualities(&self) -> Vec<String> {
        dedup(self.iter().filter_map(VideoStream::quality_label))
    }

    pub fn hd_streams(&self) -> Self {
        self.filter(|s| s.height.is_some_and(|h| h >= HD_MIN_HEIGHT))
    }

    pub fn full_hd_streams(&self) -> Self {
        self.filter(|s| s.height.is_some_and(|h| h >= FULL_HD_MIN_HEIGHT))
    }

    pub fn uhd_streams(&self) -> Self {
        self.filter(|s| s.height.is_some_and(|h| h >= UHD_MIN_HEIGHT))
    }

    pub fn hdr_streams(&self) -> Self {
        self.filter(|s| s.is_hdr)
    }

    /// Exact-height streams; the best-scored one wins, or the first one when
    /// none of them can be scored.
    fn best_at_height(&self, height: u32) -> Option<&VideoStream> {
        let at_height = || self.iter().filter(move |s| s.height == Some(height));
        let scored = at_height().filter_map(|s| s.score().map(|score| (s, score)));

        pick(scored, |candidate, current| candidate > current).or_else(|| at_height().next())
    }
}

fn parse_resolution(label: &str) -> Result<u32> {
    let trimmed = label.trim().to_ascii_lowercase();
    let digits = trimmed.strip_suffix('p').unwrap_or(&trimmed);

    match digits.parse::<u32>() {
        Ok(height) if height > 0 => Ok(height),
        _ => Err(Error::invalid_query(
            "resolution",
            format!("\"{label}\" is not a resolution like 1080p")
        ))
    }
}

impl StreamCollection<AudioStream> {
    pub fn high_quality_streams(&self) -> Self {
        self.filter(|s| s.bitrate.is_some_and(|b| b >= HIGH_QUALITY_MIN_BITRATE))
    }

    pub fn lossless_quality_streams(&self) -> Self {
        self.filter(|s| {
            s.bitrate.is_some_and(|b| b >= LOSSLESS_MIN_BITRATE)
                && s.sample_rate.is_some_and(|sr| sr >= LOSSLESS_MIN_SAMPLE_RATE)
        })
    }

    pub fn stereo_streams(&self) -> Self {
        self.filter(|s| s.channels == Some(STEREO_CHANNELS))
    }

    pub fn surround_streams(&self) -> Self {
        self.filter(|s| s.channels.is_some_and(|c| c >= SURROUND_MIN_CHANNELS))
    }

    /// Streams of the original uploaded language.
    pub fn original_streams(&self) -> Self {
        self.filter(|s| s.is_original_audio)
    }
}

impl StreamCollection<SubtitleStream> {
    pub fn manual_subtitles(&self) -> Self {
        self.filter(SubtitleStream::is_manual)
    }

    pub fn auto_generated_subtitles(&self) -> Self {
        self.filter(|s| s.is_auto_generated)
    }

    /// Subtitle formats in first-seen order.
    pub fn available_formats(&self) -> Vec<String> {
        dedup(self.iter().filter_map(|s| s.extension.clone()))
    }
}
