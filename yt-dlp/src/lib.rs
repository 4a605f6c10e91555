//! Async Rust wrapper for the yt-dlp CLI, limited to metadata extraction.
//!
//! The client never downloads media: it asks yt-dlp for the JSON info
//! document of a video, or for the flat entry list of a playlist, channel or
//! search, and hands the result back untouched.
//!
//! # Example
//!
//! ```no_run
//! use yt_dlp::YtDlp;
//!
//! #[tokio::main]
//! async fn main() -> yt_dlp::Result<()> {
//!     let client = YtDlp::new();
//!
//!     let version = client.check_binary().await?;
//!     println!("yt-dlp version: {}", version);
//!
//!     let info = client.extract_info("https://www.youtube.com/watch?v=dQw4w9WgXcQ").await?;
//!     println!("Title: {}", info["title"]);
//!
//!     Ok(())
//! }
//! ```

mod client;
mod command;
pub mod error;
pub mod types;

pub use client::YtDlp;
pub use error::{Error, Result};
pub use types::{CookieBrowser, Cookies, FlatEntry};
