pub const DEFAULT_MAX_FILENAME_LENGTH: usize = 255;

/// Turns arbitrary text into a filesystem-safe name.
///
/// Reserved and control characters become `_`, runs of whitespace and
/// underscores collapse into a single `_`, and leading or trailing `_`, `.`
/// and spaces are dropped. Over-long names are cut at the last separator
/// that fits. Returns `None` when nothing usable is left.
pub fn sanitize_filename(text: &str, max_length: Option<usize>) -> Option<String> {
    let mut sanitized = String::with_capacity(text.len());
    let mut pending_separator = false;

    for c in text.chars() {
        let replaced = match c {
            '<' | '>' | ':' | '"' | '/' | '\\' | '|' | '?' | '*' => '_',
            c if c.is_control() => '_',
            c => c
        };

        if replaced == '_' || replaced.is_whitespace() {
            pending_separator = true;
            continue;
        }

        if pending_separator && !sanitized.is_empty() {
            sanitized.push('_');
        }
        pending_separator = false;
        sanitized.push(replaced);
    }

    let mut sanitized = sanitized.trim_matches(['_', '.', ' ']).to_string();

    if let Some(max) = max_length
        && sanitized.chars().count() > max
    {
        let truncated: String = sanitized.chars().take(max).collect();
        sanitized = match truncated.rfind('_') {
            Some(cut) if cut > 0 => truncated[..cut].to_string(),
            _ => truncated
        };
        sanitized = sanitized.trim_end_matches(['_', '.', ' ']).to_string();
    }

    if sanitized.is_empty() { None } else { Some(sanitized) }
}

/// `HH:MM:SS`, or `Unknown` without a duration.
pub fn format_duration(seconds: Option<u64>) -> String {
    match seconds {
        Some(secs) => format!("{:02}:{:02}:{:02}", secs / 3600, (secs % 3600) / 60, secs % 60),
        None => "Unknown".to_string()
    }
}
