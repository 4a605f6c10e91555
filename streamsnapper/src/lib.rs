//! Typed YouTube stream metadata with quality ranking and selection.
//!
//! yt-dlp does the extraction; this crate turns its info document into
//! video, audio and subtitle streams, scores them, and answers "which stream
//! should I take" queries over read-only collections.
//!
//! # Example
//!
//! ```no_run
//! use streamsnapper::{Config, LanguageFallback, YouTube};
//!
//! #[tokio::main]
//! async fn main() -> streamsnapper::Result<()> {
//!     let youtube = YouTube::new(&Config::from_env())?;
//!     let extraction = youtube.extract("https://www.youtube.com/watch?v=dQw4w9WgXcQ").await?;
//!
//!     let videos = extraction.video_streams();
//!     if let Some(stream) = videos.get_by_resolution("1080p", true)? {
//!         println!("video: {} {:?}", stream.url, stream.quality_label());
//!     }
//!
//!     let audio = extraction
//!         .audio_streams()
//!         .get_by_language(&["source", "local"], LanguageFallback::Any, extraction.locale())?;
//!     if let Some(best) = audio.as_ref().and_then(|streams| streams.best()) {
//!         println!("audio: {}", best.url);
//!     }
//!
//!     Ok(())
//! }
//! ```

pub mod collection;
pub mod config;
pub mod enrich;
pub mod error;
pub mod information;
mod itag;
pub mod language;
pub mod streams;
pub mod url;
pub mod utils;
mod value;
pub mod youtube;

pub use collection::StreamCollection;
pub use config::Config;
pub use enrich::Enricher;
pub use error::{Error, Result};
pub use information::{Chapter, VideoInformation};
pub use language::{FixedLocale, LanguageFallback, LanguagePreference, LocaleResolver, SystemLocale};
pub use streams::{AudioStream, RawStreams, Score, Stream, SubtitleStream, VideoStream};
pub use crate::url::Platform;
pub use youtube::{ChannelContent, ChannelSort, Extraction, SearchResultType, SearchSort, YouTube};
