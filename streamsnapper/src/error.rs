#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Extractor(#[from] yt_dlp::Error),

    #[error("invalid YouTube URL: {0}")]
    InvalidUrl(String),

    #[error("invalid extractor data: {0}")]
    InvalidData(String),

    #[error("invalid query parameter `{parameter}`: {reason}")]
    InvalidQuery {
        parameter: &'static str,
        reason: String
    },

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("failed to serialize to JSON: {0}")]
    Json(#[from] serde_json::Error)
}

impl Error {
    pub(crate) fn invalid_query(parameter: &'static str, reason: impl Into<String>) -> Self {
        Error::InvalidQuery {
            parameter,
            reason: reason.into()
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
