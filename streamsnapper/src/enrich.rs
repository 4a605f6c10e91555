//! Optional HTTP lookups that complete a [`VideoInformation`].
//!
//! Every lookup is best effort: failures are traced and reported as "no
//! data", never as errors.

use std::time::Duration;

use serde_json::Value;

use crate::error::Result;
use crate::information::VideoInformation;
use crate::value;

const DISLIKE_API_URL: &str = "https://returnyoutubedislikeapi.com/votes";
const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/137.0.0.0 Safari/537.36";

#[derive(Debug, Clone)]
pub struct Enricher {
    http: reqwest::Client
}

impl Enricher {
    pub fn new(timeout: Duration) -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .redirect(reqwest::redirect::Policy::none())
            .build()?;

        Ok(Self { http })
    }

    /// Returns `urls` starting at the first one that answers a HEAD request
    /// successfully, or an empty list when none does.
    pub async fn filter_valid_thumbnails(&self, urls: &[String]) -> Vec<String> {
        for (index, url) in urls.iter().enumerate() {
            match self.http.head(url).send().await {
                Ok(response) if response.status().is_success() => {
                    tracing::trace!(%url, "first valid thumbnail");
                    return urls[index..].to_vec();
                }
                Ok(response) => {
                    tracing::trace!(%url, status = %response.status(), "thumbnail unavailable");
                }
                Err(e) => tracing::trace!(%url, error = %e, "thumbnail request failed")
            }
        }

        tracing::debug!("no valid thumbnails found");
        Vec::new()
    }

    pub async fn fetch_dislike_count(&self, video_id: &str) -> Option<u64> {
        let response = match self
            .http
            .get(DISLIKE_API_URL)
            .query(&[("videoId", video_id)])
            .send()
            .await
        {
            Ok(response) if response.status().is_success() => response,
            Ok(response) => {
                tracing::trace!(video_id, status = %response.status(), "dislike lookup rejected");
                return None;
            }
            Err(e) => {
                tracing::trace!(video_id, error = %e, "dislike lookup failed");
                return None;
            }
        };

        let body = response.bytes().await.ok()?;
        let dislikes = parse_dislikes(&body);
        if dislikes.is_none() {
            tracing::trace!(video_id, "no dislike data in response");
        }
        dislikes
    }

    /// Fills `dislike_count` and narrows `thumbnails` to those that exist.
    pub async fn enrich(&self, information: &mut VideoInformation, check_thumbnails: bool, dislikes: bool) {
        if dislikes && let Some(id) = information.id.clone() {
            information.dislike_count = self.fetch_dislike_count(&id).await;
            if information.dislike_count.is_none() {
                tracing::warn!(video_id = %id, "failed to retrieve dislike count");
            }
        }

        if check_thumbnails {
            information.thumbnails = self.filter_valid_thumbnails(&information.thumbnails).await;
        }
    }
}

fn parse_dislikes(body: &[u8]) -> Option<u64> {
    let json: Value = serde_json::from_slice(body).ok()?;
    value::get_u64(&json, &["dislikes"])
}
