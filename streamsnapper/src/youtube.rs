//! The entry point: extraction through yt-dlp and the per-video views over
//! its output.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use ::url::Url;
use serde_json::Value;
use yt_dlp::{FlatEntry, YtDlp};

use crate::collection::StreamCollection;
use crate::config::Config;
use crate::enrich::Enricher;
use crate::error::{Error, Result};
use crate::information::VideoInformation;
use crate::language::{LocaleResolver, SystemLocale};
use crate::streams::{AudioStream, RawStreams, SubtitleStream, VideoStream};
use crate::url;

/// Channel tab listed by [`YouTube::channel_videos`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChannelContent {
    #[default]
    Videos,
    Shorts,
    Streams
}

impl ChannelContent {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChannelContent::Videos => "videos",
            ChannelContent::Shorts => "shorts",
            ChannelContent::Streams => "streams"
        }
    }
}

/// Order of a channel tab listing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChannelSort {
    #[default]
    Newest,
    Oldest,
    Popular
}

impl ChannelSort {
    /// Value of the tab URL's `sort` parameter.
    pub fn as_str(&self) -> &'static str {
        match self {
            ChannelSort::Newest => "dd",
            ChannelSort::Oldest => "da",
            ChannelSort::Popular => "p"
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchSort {
    #[default]
    Relevance,
    UploadDate,
    ViewCount,
    Rating
}

impl SearchSort {
    /// First half of the `sp` search filter: sort field, then the start of
    /// the filter message. Both halves are three bytes, so their base64
    /// forms concatenate.
    fn filter_prefix(self) -> &'static str {
        match self {
            SearchSort::Relevance => "CAAS",
            SearchSort::UploadDate => "CAIS",
            SearchSort::ViewCount => "CAMS",
            SearchSort::Rating => "CAES"
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchResultType {
    #[default]
    Video,
    Channel,
    Playlist,
    Movie
}

impl SearchResultType {
    /// Second half of the `sp` search filter: the result type.
    fn filter_suffix(self) -> &'static str {
        match self {
            SearchResultType::Video => "AhAB",
            SearchResultType::Channel => "AhAC",
            SearchResultType::Playlist => "AhAD",
            SearchResultType::Movie => "AhAE"
        }
    }

    fn is_video(self) -> bool {
        matches!(self, SearchResultType::Video | SearchResultType::Movie)
    }
}

#[derive(Clone)]
pub struct YouTube {
    ytdlp: YtDlp,
    locale: Arc<dyn LocaleResolver>,
    enricher: Enricher
}

impl YouTube {
    pub fn new(config: &Config) -> Result<Self> {
        Self::with_locale(config, Arc::new(SystemLocale::new(config.fallback_locale.clone())))
    }

    pub fn with_locale(config: &Config, locale: Arc<dyn LocaleResolver>) -> Result<Self> {
        Ok(Self {
            ytdlp: config.build_client(),
            locale,
            enricher: Enricher::new(config.http_timeout())?
        })
    }

    pub fn ytdlp(&self) -> &YtDlp {
        &self.ytdlp
    }

    /// Extracts a single video. The URL must carry a YouTube video id.
    pub async fn extract(&self, url: &str) -> Result<Extraction> {
        let Some(video_id) = url::extract_video_id(url) else {
            return Err(Error::InvalidUrl(url.to_string()));
        };

        tracing::debug!(%video_id, "extracting video");
        let info = self.ytdlp.extract_info(url).await?;
        self.from_json(info, Some(url))
    }

    /// Wraps a previously extracted info document.
    #[allow(clippy::wrong_self_convention)]
    pub fn from_json(&self, info: Value, source_url: Option<&str>) -> Result<Extraction> {
        let streams = RawStreams::from_info(&info)?;

        Ok(Extraction {
            info,
            streams,
            source_url: source_url.map(str::to_string),
            locale: Arc::clone(&self.locale),
            enricher: self.enricher.clone()
        })
    }

    /// URLs of the first `limit` search results: watch URLs for videos and
    /// movies, channel or playlist URLs otherwise.
    pub async fn search(
        &self,
        query: &str,
        sort: SearchSort,
        results: SearchResultType,
        limit: usize
    ) -> Result<Vec<String>> {
        let (target, playlist_end) = search_target(query, sort, results, limit)?;
        let entries = self.ytdlp.extract_flat(&target, playlist_end).await?;

        if results.is_video() {
            Ok(watch_urls(&entries))
        } else {
            Ok(entries.into_iter().filter_map(|entry| entry.url).collect())
        }
    }

    /// Watch URLs of a public playlist.
    pub async fn playlist_videos(&self, url: &str, limit: Option<usize>) -> Result<Vec<String>> {
        let Some(playlist_id) = url::extract_playlist_id(url, false) else {
            return Err(Error::InvalidUrl(url.to_string()));
        };

        let playlist_url = format!("https://www.youtube.com/playlist?list={playlist_id}");
        let entries = self.ytdlp.extract_flat(&playlist_url, limit).await?;
        Ok(watch_urls(&entries))
    }

    /// Watch URLs from one tab of a channel. `channel` is a channel URL, an
    /// `@handle` or a `UC...` channel id.
    pub async fn channel_videos(
        &self,
        channel: &str,
        content: ChannelContent,
        sort: ChannelSort,
        limit: Option<usize>
    ) -> Result<Vec<String>> {
        let tab_url = channel_tab_url(channel, content, sort)?;
        tracing::debug!(%tab_url, "listing channel tab");
        let entries = self.ytdlp.extract_flat(&tab_url, limit).await?;
        Ok(watch_urls(&entries))
    }
}

fn watch_urls(entries: &[FlatEntry]) -> Vec<String> {
    entries
        .iter()
        .filter(|entry| entry.is_video())
        .map(FlatEntry::watch_url)
        .collect()
}

const YOUTUBE_ORIGIN: &str = "https://www.youtube.com";

/// yt-dlp target for a search. Plain video searches use the `ytsearch`
/// prefixes; every other combination goes through the results page with an
/// `sp` filter, capped by `--playlist-end`.
fn search_target(
    query: &str,
    sort: SearchSort,
    results: SearchResultType,
    limit: usize
) -> Result<(String, Option<usize>)> {
    let query = query.trim();
    if query.is_empty() {
        return Err(Error::invalid_query("query", "must not be empty"));
    }
    if limit == 0 {
        return Err(Error::invalid_query("limit", "must be at least 1"));
    }

    match (sort, results) {
        (SearchSort::Relevance, SearchResultType::Video) => Ok((format!("ytsearch{limit}:{query}"), None)),
        (SearchSort::UploadDate, SearchResultType::Video) => {
            Ok((format!("ytsearchdate{limit}:{query}"), None))
        }
        _ => {
            let filter = format!("{}{}", sort.filter_prefix(), results.filter_suffix());
            let url = Url::parse_with_params(
                &format!("{YOUTUBE_ORIGIN}/results"),
                &[("search_query", query), ("sp", filter.as_str())]
            )
            .map_err(|e| Error::invalid_query("query", e.to_string()))?;
            Ok((url.into(), Some(limit)))
        }
    }
}

fn channel_tab_url(channel: &str, content: ChannelContent, sort: ChannelSort) -> Result<String> {
    let channel = channel.trim();
    if channel.is_empty() {
        return Err(Error::invalid_query("channel", "must not be empty"));
    }

    let segments = if channel.contains("://") {
        channel_path(channel)?
    } else if channel.starts_with("UC") && channel.len() == 24 {
        vec!["channel".to_string(), channel.to_string()]
    } else {
        let handle = channel.trim_start_matches('@');
        if handle.is_empty() || handle.contains(['/', '?', '#', '&']) || handle.contains(char::is_whitespace) {
            return Err(Error::invalid_query(
                "channel",
                format!("\"{channel}\" is not a channel URL, handle or id")
            ));
        }
        vec![format!("@{handle}")]
    };

    let mut url = Url::parse(YOUTUBE_ORIGIN).map_err(|_| Error::InvalidUrl(channel.to_string()))?;
    url.set_path(&format!("/{}/{}", segments.join("/"), content.as_str()));
    url.query_pairs_mut().append_pair("sort", sort.as_str());

    Ok(url.into())
}

/// Path segments that identify the channel in a YouTube URL. Tabs, query
/// and fragment are dropped; URLs of anything but a channel are rejected.
fn channel_path(raw: &str) -> Result<Vec<String>> {
    let invalid = || Error::InvalidUrl(raw.to_string());

    let parsed = Url::parse(raw).map_err(|_| invalid())?;
    if !matches!(parsed.scheme(), "http" | "https") || !parsed.host_str().is_some_and(is_youtube_host) {
        return Err(invalid());
    }

    let segments: Vec<&str> = parsed
        .path_segments()
        .map(|segments| segments.filter(|s| !s.is_empty()).collect())
        .unwrap_or_default();

    match segments.as_slice() {
        [handle, ..] if handle.len() > 1 && handle.starts_with('@') => Ok(vec![(*handle).to_string()]),
        ["channel", id, ..] if id.starts_with("UC") => Ok(vec!["channel".to_string(), (*id).to_string()]),
        [kind @ ("c" | "user"), name, ..] => Ok(vec![(*kind).to_string(), (*name).to_string()]),
        _ => Err(invalid())
    }
}

fn is_youtube_host(host: &str) -> bool {
    matches!(host, "youtube.com" | "www.youtube.com" | "m.youtube.com" | "music.youtube.com")
}

/// One extracted video: its info document and the stream descriptors split
/// out of it.
#[derive(Clone)]
pub struct Extraction {
    info: Value,
    streams: RawStreams,
    source_url: Option<String>,
    locale: Arc<dyn LocaleResolver>,
    enricher: Enricher
}

impl Extraction {
    pub fn raw_info(&self) -> &Value {
        &self.info
    }

    pub fn raw_streams(&self) -> &RawStreams {
        &self.streams
    }

    pub fn information(&self) -> VideoInformation {
        VideoInformation::from_info(&self.info, self.source_url.as_deref())
    }

    /// [`information`](Self::information) completed over HTTP: thumbnails
    /// narrowed to those that exist and the dislike count filled in.
    pub async fn information_enriched(&self, check_thumbnails: bool, retrieve_dislikes: bool) -> VideoInformation {
        let mut information = self.information();
        self.enricher
            .enrich(&mut information, check_thumbnails, retrieve_dislikes)
            .await;
        information
    }

    pub fn video_streams(&self) -> StreamCollection<VideoStream> {
        self.streams.video_streams()
    }

    pub fn audio_streams(&self) -> StreamCollection<AudioStream> {
        self.streams.audio_streams()
    }

    pub fn subtitle_streams(&self) -> StreamCollection<SubtitleStream> {
        self.streams.subtitle_streams()
    }

    /// The resolver to hand to `get_by_language`.
    pub fn locale(&self) -> &dyn LocaleResolver {
        self.locale.as_ref()
    }
}
