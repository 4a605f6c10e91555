use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, ValueEnum};
use serde_json::json;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use streamsnapper::{Config, LanguageFallback, Stream, YouTube};

/// Picks the best YouTube video and audio streams for a URL.
#[derive(Parser)]
#[command(name = "streamsnapper")]
#[command(version)]
struct Cli {
    /// YouTube video URL
    url: String,

    /// Target video resolution, e.g. 1080p. Picks the best stream when unset
    #[arg(short, long)]
    quality: Option<String>,

    /// Fall back to the nearest resolution when the target is missing
    #[arg(long)]
    fallback: bool,

    /// Audio language priority: a code, "source", "local" or "all"
    #[arg(short, long = "language", default_values_t = ["source".to_string(), "local".to_string()])]
    languages: Vec<String>,

    /// What to return when no listed language matches
    #[arg(long, value_enum, default_value_t = FallbackArg::Any)]
    language_fallback: FallbackArg,

    /// Path to the yt-dlp binary
    #[arg(long)]
    ytdlp_path: Option<PathBuf>,

    /// Netscape cookie file passed to yt-dlp
    #[arg(long)]
    cookies_file: Option<PathBuf>,

    /// Check thumbnails and fetch the dislike count over HTTP
    #[arg(long)]
    enrich: bool,

    /// Print JSON instead of a summary
    #[arg(long)]
    json: bool,

    #[arg(short, long)]
    verbose: bool
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
enum FallbackArg {
    None,
    Source,
    Any
}

impl From<FallbackArg> for LanguageFallback {
    fn from(arg: FallbackArg) -> Self {
        match arg {
            FallbackArg::None => LanguageFallback::None,
            FallbackArg::Source => LanguageFallback::Source,
            FallbackArg::Any => LanguageFallback::Any
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose {
        "streamsnapper=debug,yt_dlp=debug"
    } else {
        "streamsnapper=info,yt_dlp=info"
    };
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into())
        )
        .init();

    let mut config = Config::from_env();
    if let Some(path) = cli.ytdlp_path.clone() {
        config.ytdlp_path = Some(path);
    }
    if let Some(file) = cli.cookies_file.clone() {
        config.cookies = Some(yt_dlp::Cookies::File(file));
    }

    let youtube = YouTube::new(&config)?;
    let version = youtube
        .ytdlp()
        .check_binary()
        .await
        .context("yt-dlp is not available")?;
    tracing::debug!(%version, "found yt-dlp");

    let extraction = youtube
        .extract(&cli.url)
        .await
        .with_context(|| format!("failed to extract {}", cli.url))?;

    let information = if cli.enrich {
        extraction.information_enriched(true, true).await
    } else {
        extraction.information()
    };

    let videos = extraction.video_streams();
    let video = match &cli.quality {
        Some(quality) => videos.get_by_resolution(quality, cli.fallback)?,
        None => videos.best()
    };

    let languages: Vec<&str> = cli.languages.iter().map(String::as_str).collect();
    let audio_streams = extraction.audio_streams();
    let audio_candidates = audio_streams.get_by_language(
        &languages,
        cli.language_fallback.into(),
        extraction.locale()
    )?;
    let audio = audio_candidates.as_ref().and_then(|streams| streams.best());

    if cli.json {
        let output = json!({
            "information": information,
            "video": video,
            "audio": audio,
            "available_qualities": videos.available_qualities(),
            "available_languages": audio_streams.available_languages()
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    println!("Title:     {}", information.title.as_deref().unwrap_or("Unknown"));
    println!("Channel:   {}", information.channel_name.as_deref().unwrap_or("Unknown"));
    println!("Duration:  {}", streamsnapper::utils::format_duration(information.duration));
    println!("Qualities: {}", videos.available_qualities().join(", "));
    println!("Languages: {}", audio_streams.available_languages().join(", "));

    match video {
        Some(stream) => println!(
            "Video:     {} {} ({})",
            stream.quality_label().unwrap_or_default(),
            stream.codec().unwrap_or("unknown"),
            stream.url()
        ),
        None => println!("Video:     none")
    }

    match audio {
        Some(stream) => println!(
            "Audio:     {} kbps {} ({})",
            stream.bitrate().map_or_else(|| "?".to_string(), |b| format!("{b:.0}")),
            stream.codec().unwrap_or("unknown"),
            stream.url()
        ),
        None => println!("Audio:     none")
    }

    Ok(())
}
