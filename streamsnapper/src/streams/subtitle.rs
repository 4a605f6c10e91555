use serde::Serialize;
use serde_json::Value;

use super::{Score, Stream};
use crate::value;

/// Manual captions always outrank auto-generated ones; format richness only
/// orders captions of the same origin.
const MANUAL_BONUS: f64 = 100.0;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubtitleStream {
    pub url: String,
    /// Language code as keyed by the extractor (`en`, `pt-BR`, `en-orig`).
    pub language: String,
    /// Human readable language name.
    pub name: Option<String>,
    /// Subtitle format (`vtt`, `srv3`, `ttml`, ...).
    pub extension: Option<String>,
    pub is_auto_generated: bool,
    pub is_source: bool
}

impl SubtitleStream {
    /// Builds a stream from one entry of yt-dlp's `subtitles` or
    /// `automatic_captions` mapping.
    pub fn from_raw(
        language: &str,
        raw: &Value,
        is_auto_generated: bool,
        source_language: Option<&str>
    ) -> Option<Self> {
        let url = value::get_url(raw, &["url"])?;
        let language = language.trim().to_string();
        if language.is_empty() {
            return None;
        }

        let lower = language.to_ascii_lowercase();
        let is_source = lower.ends_with("-orig")
            || source_language.is_some_and(|source| source.eq_ignore_ascii_case(&language));

        Some(Self {
            url,
            language,
            name: value::get_str(raw, &["name"]),
            extension: value::get_str(raw, &["ext"]).map(|e| e.to_ascii_lowercase()),
            is_auto_generated,
            is_source
        })
    }

    pub fn is_manual(&self) -> bool {
        !self.is_auto_generated
    }

    /// Plain-text formats rank lowest, formats carrying positioning and
    /// styling highest.
    pub fn format_richness(&self) -> Option<u8> {
        let richness = match self.extension.as_deref()? {
            "ass" | "ssa" => 7,
            "ttml" | "dfxp" => 6,
            "srv3" => 5,
            "vtt" => 4,
            "json3" => 3,
            "srv2" => 2,
            "srv1" | "srt" => 1,
            _ => 0
        };
        Some(richness)
    }
}

impl Stream for SubtitleStream {
    fn url(&self) -> &str {
        &self.url
    }

    fn score(&self) -> Option<Score> {
        let richness = f64::from(self.format_richness()?);
        let origin = if self.is_manual() { MANUAL_BONUS } else { 0.0 };

        Some(Score::new(origin + richness))
    }

    fn codec(&self) -> Option<&str> {
        self.extension.as_deref()
    }

    fn extension(&self) -> Option<&str> {
        self.extension.as_deref()
    }

    fn size(&self) -> Option<u64> {
        None
    }

    fn language(&self) -> Option<&str> {
        Some(&self.language)
    }

    fn is_source_language(&self) -> bool {
        self.is_source
    }
}

#[cfg(test)]
pub(crate) fn sample(url: &str, language: &str, ext: &str, auto: bool) -> SubtitleStream {
    SubtitleStream {
        url: url.to_string(),
        language: language.to_string(),
        name: None,
        extension: Some(ext.to_string()),
        is_auto_generated: auto,
        is_source: false
    }
}
