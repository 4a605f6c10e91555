//! Read-only stream collections and the selection queries over them.
//!
//! A collection is built once per extraction and never mutated. Queries
//! either borrow a stream out of it or return a new sub-collection that keeps
//! the original relative order.

mod views;

use std::collections::HashSet;

use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::{Error, Result};
use crate::language::{self, LanguageFallback, LanguagePreference, LocaleResolver};
use crate::streams::{Score, Stream, codec_family};

pub use views::{
    FULL_HD_MIN_HEIGHT, HD_MIN_HEIGHT, HIGH_QUALITY_MIN_BITRATE, LOSSLESS_MIN_BITRATE,
    LOSSLESS_MIN_SAMPLE_RATE, STEREO_CHANNELS, SURROUND_MIN_CHANNELS, UHD_MIN_HEIGHT
};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct StreamCollection<S> {
    streams: Vec<S>
}

impl<S> Default for StreamCollection<S> {
    fn default() -> Self {
        Self {
            streams: Vec::new()
        }
    }
}

impl<S: Stream> StreamCollection<S> {
    /// Keeps the first stream seen for each URL.
    pub fn new(streams: impl IntoIterator<Item = S>) -> Self {
        let mut seen = HashSet::new();
        let streams = streams
            .into_iter()
            .filter(|stream| seen.insert(stream.url().to_string()))
            .collect();

        Self { streams }
    }

    pub fn len(&self) -> usize {
        self.streams.len()
    }

    pub fn is_empty(&self) -> bool {
        self.streams.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, S> {
        self.streams.iter()
    }

    pub fn as_slice(&self) -> &[S] {
        &self.streams
    }

    pub fn first(&self) -> Option<&S> {
        self.streams.first()
    }

    /// Streams that can be ranked, paired with their score.
    pub fn scored(&self) -> impl Iterator<Item = (&S, Score)> {
        self.streams
            .iter()
            .filter_map(|stream| stream.score().map(|score| (stream, score)))
    }

    /// Highest-scoring stream. On equal scores the earlier stream wins.
    pub fn best(&self) -> Option<&S> {
        pick(self.scored(), |candidate, current| candidate > current)
    }

    /// Lowest-scoring stream. On equal scores the earlier stream wins.
    pub fn worst(&self) -> Option<&S> {
        pick(self.scored(), |candidate, current| candidate < current)
    }

    /// Scorable streams from best to worst, earlier streams first on ties.
    /// Unscorable streams are left out.
    pub fn ranked(&self) -> Vec<&S> {
        let mut ranked: Vec<(&S, Score)> = self.scored().collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1));
        ranked.into_iter().map(|(stream, _)| stream).collect()
    }

    /// Walks `languages` in order and returns the streams of the first entry
    /// that matches anything. Entries are language codes or one of the
    /// sentinels `source`, `local` and `all`.
    pub fn get_by_language(
        &self,
        languages: &[&str],
        fallback: LanguageFallback,
        locale: &dyn LocaleResolver
    ) -> Result<Option<Self>> {
        let preferences = languages
            .iter()
            .map(|entry| LanguagePreference::parse(entry))
            .collect::<Result<Vec<_>>>()?;

        for preference in &preferences {
            let found = match preference {
                LanguagePreference::Source => self.source_language_streams(),
                LanguagePreference::All => self.clone(),
                LanguagePreference::Code(code) => self.language_streams(code),
                LanguagePreference::Local => match locale.locale() {
                    Some(tag) => {
                        let tag = language::normalize(&tag);
                        let full = self.language_streams(&tag);
                        if full.is_empty() {
                            let primary = tag.split('-').next().unwrap_or_default();
                            self.language_streams(primary)
                        } else {
                            full
                        }
                    }
                    None => Self::default()
                }
            };

            if !found.is_empty() {
                tracing::debug!(?preference, matched = found.len(), "language preference matched");
                return Ok(Some(found));
            }
        }

        let fallback = match fallback {
            LanguageFallback::None => Self::default(),
            LanguageFallback::Source => self.source_language_streams(),
            LanguageFallback::Any => self.clone()
        };

        Ok((!fallback.is_empty()).then_some(fallback))
    }

    /// Streams whose codec belongs to the same family as `codec`, so `h264`
    /// also finds `avc1`.
    pub fn get_by_codec(&self, codec: &str) -> Result<Self> {
        if codec.trim().is_empty() {
            return Err(Error::invalid_query("codec", "codec must not be empty"));
        }

        let family = codec_family(codec);
        Ok(self.filter(|stream| stream.codec().is_some_and(|c| codec_family(c) == family)))
    }

    /// Streams with a bitrate (kbps) inside the inclusive range.
    pub fn get_by_bitrate_range(&self, min: Option<f64>, max: Option<f64>) -> Result<Self> {
        if !float_range_is_satisfiable("min_bitrate", min, "max_bitrate", max)? {
            return Ok(Self::default());
        }

        Ok(self.filter(|stream| stream.bitrate().is_some_and(|b| in_range(b, min, max))))
    }

    /// Streams with a known size (bytes) inside the inclusive range.
    pub fn get_by_size_range(&self, min: Option<u64>, max: Option<u64>) -> Result<Self> {
        if let (Some(min), Some(max)) = (min, max)
            && min > max
        {
            return Ok(Self::default());
        }

        Ok(self.filter(|stream| {
            stream.size().is_some_and(|size| {
                min.is_none_or(|min| size >= min) && max.is_none_or(|max| size <= max)
            })
        }))
    }

    /// Codec names in first-seen order.
    pub fn available_codecs(&self) -> Vec<String> {
        dedup(self.streams.iter().filter_map(|s| s.codec().map(str::to_string)))
    }

    /// Lowercased language codes in first-seen order.
    pub fn available_languages(&self) -> Vec<String> {
        dedup(
            self.streams
                .iter()
                .filter_map(|s| s.language().map(str::to_ascii_lowercase))
        )
    }

    pub fn to_maps(&self) -> Vec<Map<String, Value>> {
        self.streams.iter().map(S::to_map).collect()
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.streams)?)
    }

    pub(crate) fn filter(&self, predicate: impl Fn(&S) -> bool) -> Self {
        Self {
            streams: self.streams.iter().filter(|s| predicate(s)).cloned().collect()
        }
    }

    fn source_language_streams(&self) -> Self {
        self.filter(S::is_source_language)
    }

    fn language_streams(&self, code: &str) -> Self {
        self.filter(|stream| stream.language().is_some_and(|l| language::matches(code, l)))
    }
}

impl<'a, S> IntoIterator for &'a StreamCollection<S> {
    type Item = &'a S;
    type IntoIter = std::slice::Iter<'a, S>;

    fn into_iter(self) -> Self::IntoIter {
        self.streams.iter()
    }
}

impl<S: Stream> FromIterator<S> for StreamCollection<S> {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self::new(iter)
    }
}

/// Keeps the first candidate unless a later one is strictly preferred.
pub(crate) fn pick<'a, S>(
    candidates: impl Iterator<Item = (&'a S, Score)>,
    prefer: impl Fn(Score, Score) -> bool
) -> Option<&'a S> {
    let mut chosen: Option<(&S, Score)> = None;
    for (stream, score) in candidates {
        match chosen {
            Some((_, current)) if !prefer(score, current) => {}
            _ => chosen = Some((stream, score))
        }
    }
    chosen.map(|(stream, _)| stream)
}

/// Validates a float range. Returns `false` for an inverted range, which
/// callers answer with an empty collection.
pub(crate) fn float_range_is_satisfiable(
    min_name: &'static str,
    min: Option<f64>,
    max_name: &'static str,
    max: Option<f64>
) -> Result<bool> {
    for (name, bound) in [(min_name, min), (max_name, max)] {
        if let Some(bound) = bound {
            if bound.is_nan() {
                return Err(Error::invalid_query(name, "bound must be a number"));
            }
            if bound < 0.0 {
                return Err(Error::invalid_query(name, format!("bound must not be negative, got {bound}")));
            }
        }
    }

    Ok(match (min, max) {
        (Some(min), Some(max)) => min <= max,
        _ => true
    })
}

pub(crate) fn in_range(value: f64, min: Option<f64>, max: Option<f64>) -> bool {
    min.is_none_or(|min| value >= min) && max.is_none_or(|max| value <= max)
}

pub(crate) fn dedup(values: impl Iterator<Item = String>) -> Vec<String> {
    let mut seen = HashSet::new();
    values.filter(|value| seen.insert(value.clone())).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::language::FixedLocale;
    use crate::streams::{AudioStream, SubtitleStream, VideoStream, audio, video};

    fn assert_send_sync<T: Send + Sync>() {}

    #[test]
    fn test_collections_are_send_and_sync() {
        assert_send_sync::<StreamCollection<VideoStream>>();
        assert_send_sync::<StreamCollection<AudioStream>>();
        assert_send_sync::<StreamCollection<SubtitleStream>>();
    }

    fn audio_with_language(url: &str, bitrate: f64, language: &str, source: bool) -> AudioStream {
        let mut stream = audio::sample(url, bitrate, 48000, 2);
        stream.language = Some(language.to_string());
        stream.is_original_audio = source;
        stream
    }

    #[test]
    fn test_duplicate_urls_keep_first() {
        let first = video::sample("same", 1280, 720, "avc1");
        let second = video::sample("same", 1920, 1080, "avc1");
        let collection = StreamCollection::new([first.clone(), second]);
        assert_eq!(collection.len(), 1);
        assert_eq!(collection.first(), Some(&first));
    }

    #[test]
    fn test_best_and_worst_bound_all_scores() {
        let collection = StreamCollection::new([
            video::sample("a", 1280, 720, "avc1"),
            video::sample("b", 3840, 2160, "vp9"),
            video::sample("c", 640, 360, "avc1"),
            video::sample("d", 1920, 1080, "av01")
        ]);

        let best = collection.best().unwrap().score().unwrap();
        let worst = collection.worst().unwrap().score().unwrap();
        for (_, score) in collection.scored() {
            assert!(best >= score);
            assert!(worst <= score);
        }
        assert_eq!(collection.best().unwrap().url, "b");
        assert_eq!(collection.worst().unwrap().url, "c");
    }

    #[test]
    fn test_ties_resolve_to_first_seen() {
        let collection = StreamCollection::new([
            video::sample("first", 1280, 720, "avc1"),
            video::sample("second", 1280, 720, "avc1")
        ]);
        assert_eq!(collection.best().unwrap().url, "first");
        assert_eq!(collection.worst().unwrap().url, "first");
    }

    #[test]
    fn test_unscorable_streams_are_enumerated_but_not_selected() {
        let mut broken = video::sample("broken", 1920, 1080, "avc1");
        broken.width = None;
        let collection = StreamCollection::new([broken, video::sample("ok", 640, 360, "avc1")]);

        assert_eq!(collection.len(), 2);
        assert_eq!(collection.best().unwrap().url, "ok");
        assert_eq!(collection.worst().unwrap().url, "ok");
        assert_eq!(collection.ranked().len(), 1);
    }

    #[test]
    fn test_empty_or_unscorable_collection_has_no_best() {
        let empty: StreamCollection<VideoStream> = StreamCollection::default();
        assert!(empty.best().is_none());
        assert!(empty.worst().is_none());

        let mut broken = video::sample("broken", 1920, 1080, "avc1");
        broken.height = None;
        assert!(StreamCollection::new([broken]).best().is_none());
    }

    #[test]
    fn test_ranked_orders_best_first() {
        let collection = StreamCollection::new([
            video::sample("a", 1280, 720, "avc1"),
            video::sample("b", 1920, 1080, "avc1"),
            video::sample("c", 1280, 720, "avc1")
        ]);
        let urls: Vec<_> = collection.ranked().iter().map(|s| s.url.as_str()).collect();
        assert_eq!(urls, ["b", "a", "c"]);
    }

    #[test]
    fn test_language_source_always_matches_when_tagged() {
        let collection = StreamCollection::new([
            audio_with_language("de", 128.0, "de", false),
            audio_with_language("en", 128.0, "en", true)
        ]);
        let locale = FixedLocale(None);

        let found = collection
            .get_by_language(&["xx", "source"], LanguageFallback::None, &locale)
            .unwrap()
            .unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found.first().unwrap().url, "en");
    }

    #[test]
    fn test_language_priority_order() {
        let collection = StreamCollection::new([
            audio_with_language("de", 128.0, "de", false),
            audio_with_language("en-us", 128.0, "en-US", true),
            audio_with_language("en-gb", 128.0, "en-GB", false)
        ]);
        let locale = FixedLocale(None);

        let found = collection
            .get_by_language(&["fr", "en", "de"], LanguageFallback::None, &locale)
            .unwrap()
            .unwrap();
        let urls: Vec<_> = found.iter().map(|s| s.url.as_str()).collect();
        assert_eq!(urls, ["en-us", "en-gb"]);

        let found = collection
            .get_by_language(&["en-GB"], LanguageFallback::None, &locale)
            .unwrap()
            .unwrap();
        assert_eq!(found.len(), 1);
    }

    #[test]
    fn test_language_exhausted_list() {
        let collection = StreamCollection::new([
            audio_with_language("de", 128.0, "de", false),
            audio_with_language("en", 128.0, "en", true)
        ]);
        let locale = FixedLocale(None);

        let none = collection
            .get_by_language(&["fr"], LanguageFallback::None, &locale)
            .unwrap();
        assert!(none.is_none());

        let source = collection
            .get_by_language(&["fr"], LanguageFallback::Source, &locale)
            .unwrap()
            .unwrap();
        assert_eq!(source.first().unwrap().url, "en");

        let any = collection
            .get_by_language(&["fr"], LanguageFallback::Any, &locale)
            .unwrap()
            .unwrap();
        assert_eq!(any.len(), 2);
    }

    #[test]
    fn test_language_local_uses_injected_locale() {
        let collection = StreamCollection::new([
            audio_with_language("en", 128.0, "en", true),
            audio_with_language("pt", 128.0, "pt", false)
        ]);

        let found = collection
            .get_by_language(&["local"], LanguageFallback::None, &FixedLocale::new("pt-BR"))
            .unwrap()
            .unwrap();
        assert_eq!(found.first().unwrap().url, "pt");

        let missing = collection
            .get_by_language(&["local"], LanguageFallback::None, &FixedLocale::new("ja-JP"))
            .unwrap();
        assert!(missing.is_none());
    }

    #[test]
    fn test_language_unknown_sentinel_is_error() {
        let collection = StreamCollection::new([audio_with_language("en", 128.0, "en", true)]);
        let result = collection.get_by_language(&["en", "best"], LanguageFallback::None, &FixedLocale(None));
        assert!(matches!(
            result,
            Err(Error::InvalidQuery { parameter: "languages", .. })
        ));
    }

    #[test]
    fn test_get_by_codec_uses_family() {
        let collection = StreamCollection::new([
            video::sample("a", 1280, 720, "avc1"),
            video::sample("b", 1280, 720, "vp09"),
            video::sample("c", 1920, 1080, "avc1")
        ]);
        let h264 = collection.get_by_codec("h264").unwrap();
        let urls: Vec<_> = h264.iter().map(|s| s.url.as_str()).collect();
        assert_eq!(urls, ["a", "c"]);
        assert!(collection.get_by_codec("av1").unwrap().is_empty());
        assert!(matches!(
            collection.get_by_codec(" "),
            Err(Error::InvalidQuery { parameter: "codec", .. })
        ));
    }

    #[test]
    fn test_bitrate_range_inclusive_and_unbounded() {
        let collection = StreamCollection::new([
            audio::sample("a", 50.0, 48000, 2),
            audio::sample("b", 128.0, 48000, 2),
            audio::sample("c", 256.0, 48000, 2)
        ]);

        let mid = collection.get_by_bitrate_range(Some(128.0), Some(256.0)).unwrap();
        assert_eq!(mid.len(), 2);

        let low = collection.get_by_bitrate_range(None, Some(128.0)).unwrap();
        let urls: Vec<_> = low.iter().map(|s| s.url.as_str()).collect();
        assert_eq!(urls, ["a", "b"]);

        assert_eq!(collection.get_by_bitrate_range(None, None).unwrap().len(), 3);
    }

    #[test]
    fn test_inverted_range_is_empty_not_error() {
        let collection = StreamCollection::new([audio::sample("a", 150.0, 48000, 2)]);
        let result = collection.get_by_bitrate_range(Some(200.0), Some(100.0)).unwrap();
        assert!(result.is_empty());

        let result = collection.get_by_size_range(Some(200), Some(100)).unwrap();
        assert!(result.is_empty());
    }

    #[test]
    fn test_negative_bound_is_error() {
        let collection = StreamCollection::new([audio::sample("a", 150.0, 48000, 2)]);
        assert!(matches!(
            collection.get_by_bitrate_range(Some(-1.0), None),
            Err(Error::InvalidQuery { parameter: "min_bitrate", .. })
        ));
        assert!(matches!(
            collection.get_by_bitrate_range(None, Some(f64::NAN)),
            Err(Error::InvalidQuery { parameter: "max_bitrate", .. })
        ));
    }

    #[test]
    fn test_size_range_skips_unknown_sizes() {
        let mut small = audio::sample("small", 128.0, 48000, 2);
        small.size = Some(1_000);
        let mut large = audio::sample("large", 128.0, 48000, 2);
        large.size = Some(9_000);
        let unknown = audio::sample("unknown", 128.0, 48000, 2);
        let collection = StreamCollection::new([small, large, unknown]);

        let found = collection.get_by_size_range(Some(1_000), None).unwrap();
        let urls: Vec<_> = found.iter().map(|s| s.url.as_str()).collect();
        assert_eq!(urls, ["small", "large"]);
    }

    #[test]
    fn test_available_codecs_dedup_in_order() {
        let collection = StreamCollection::new([
            video::sample("a", 1280, 720, "h264"),
            video::sample("b", 1920, 1080, "h264"),
            video::sample("c", 1920, 1080, "vp9")
        ]);
        assert_eq!(collection.available_codecs(), ["h264", "vp9"]);
    }

    #[test]
    fn test_available_languages_lowercased() {
        let collection = StreamCollection::new([
            audio_with_language("a", 128.0, "en-US", true),
            audio_with_language("b", 64.0, "en-us", true),
            audio_with_language("c", 128.0, "de", false)
        ]);
        assert_eq!(collection.available_languages(), ["en-us", "de"]);
    }

    #[test]
    fn test_to_json_and_maps() {
        let collection = StreamCollection::new([video::sample("a", 1280, 720, "avc1")]);
        let json: Value = serde_json::from_str(&collection.to_json().unwrap()).unwrap();
        assert_eq!(json[0]["width"], 1280);
        assert_eq!(collection.to_maps()[0]["codec"], "avc1");
    }
}
