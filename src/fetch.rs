// src/fetch.rs
use std::time::{Duration, SystemTime};

use chrono::{DateTime, Utc};
use reqwest::header::IF_MODIFIED_SINCE;
use reqwest::{Client, StatusCode};

/// Result of one conditional poll of the announcements page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    /// 2xx response with a fresh document body.
    Fresh(String),
    /// 304 or any other non-success status. Not an error: the cycle simply
    /// has nothing to process.
    NotModified,
}

#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("building http client: {0}")]
    Client(#[source] reqwest::Error),
    #[error("requesting {url}: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("reading response body from {url}: {source}")]
    Body {
        url: String,
        #[source]
        source: reqwest::Error,
    },
}

/// Conditional fetcher for the announcement feed. Owns a single client with
/// the configured timeout and user agent, mirroring one long-lived session
/// with persistent headers.
#[derive(Debug, Clone)]
pub struct Fetcher {
    client: Client,
    url: String,
}

impl Fetcher {
    pub fn new(url: &str, timeout_secs: u64, user_agent: &str) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .user_agent(user_agent)
            .build()
            .map_err(FetchError::Client)?;
        Ok(Self {
            client,
            url: url.to_string(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// RFC-7231 HTTP date, always UTC.
    pub fn http_date(t: SystemTime) -> String {
        let dt: DateTime<Utc> = t.into();
        dt.format("%a, %d %b %Y %H:%M:%S GMT").to_string()
    }

    /// One conditional GET. `last_poll` is the newest cache entry mtime and
    /// becomes the `If-Modified-Since` precondition, letting the server
    /// short-circuit unchanged content.
    pub async fn fetch(&self, last_poll: SystemTime) -> Result<FetchOutcome, FetchError> {
        let response = self
            .client
            .get(&self.url)
            .header(IF_MODIFIED_SINCE, Self::http_date(last_poll))
            .send()
            .await
            .map_err(|source| FetchError::Request {
                url: self.url.clone(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            if status == StatusCode::NOT_MODIFIED {
                tracing::debug!(url = %self.url, "feed not modified since last poll");
            } else {
                tracing::warn!(url = %self.url, %status, "feed returned non-success status");
            }
            return Ok(FetchOutcome::NotModified);
        }

        let body = response.text().await.map_err(|source| FetchError::Body {
            url: self.url.clone(),
            source,
        })?;
        Ok(FetchOutcome::Fresh(body))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::UNIX_EPOCH;

    #[test]
    fn http_date_renders_rfc7231_gmt() {
        assert_eq!(
            Fetcher::http_date(UNIX_EPOCH),
            "Thu, 01 Jan 1970 00:00:00 GMT"
        );
    }

    #[test]
    fn http_date_is_utc_regardless_of_local_offset() {
        let t = UNIX_EPOCH + Duration::from_secs(1_700_000_000);
        assert_eq!(Fetcher::http_date(t), "Tue, 14 Nov 2023 22:13:20 GMT");
    }
}
