//! Container lookup for YouTube DASH itags.
//!
//! yt-dlp reports `ext` for every format, but for DASH-only itags the
//! container is fixed by YouTube, so the table wins when the itag is known.

pub(crate) fn video_extension(itag: u32) -> Option<&'static str> {
    let ext = match itag {
        // AV1, all resolutions
        394..=402 | 571 | 694..=702 | 721 => "mp4",
        // H.264, 144p to 4320p
        133..=138 | 160 | 216 | 264 | 266 | 298 | 299 | 304 | 305 | 597 => "mp4",
        // VP9 and VP9.2 HDR
        242..=244 | 247 | 248 | 271 | 272 | 278 | 302 | 303 | 308 | 313 | 315 | 330..=337
        | 598 | 612 => "webm",
        // VP8
        167..=170 => "webm",
        _ => return None
    };
    Some(ext)
}

pub(crate) fn audio_extension(itag: u32) -> Option<&'static str> {
    let ext = match itag {
        // AAC, AC3, EAC3, DTS Express and IAMF
        139 | 140 | 141 | 256 | 258 | 325 | 327 | 328 | 380 | 599 | 773 => "mp4",
        // Opus
        249 | 250 | 251 | 338 | 600 | 774 => "webm",
        _ => return None
    };
    Some(ext)
}

/// Audio format ids carry a track suffix on multi-language videos
/// (`251-drc`, `140-1`); the itag is the leading number.
pub(crate) fn parse_itag(format_id: &str) -> Option<u32> {
    format_id.split('-').next()?.trim().parse().ok()
}
