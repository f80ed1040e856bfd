//! Live-mode poller over HTTP.
//!
//! Issues `GET {base_url}{state_path}` and decodes the body as a
//! [`GridSnapshot`]. The client carries the configured request timeout, so
//! a hung backend turns into a [`SourceError::Fetch`] instead of stalling
//! the poll loop.

use std::future::Future;
use std::time::Duration;

use fieldgrid_types::GridSnapshot;

use crate::error::SourceError;
use crate::source::StatePoller;

/// Polls the backend's current-state endpoint.
#[derive(Debug, Clone)]
pub struct HttpStatePoller {
    client: reqwest::Client,
    url: String,
}

impl HttpStatePoller {
    /// Create a poller for `url` with a per-request `timeout`.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::Fetch`] if the HTTP client cannot be built.
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, SourceError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(SourceError::Fetch)?;
        Ok(Self {
            client,
            url: url.into(),
        })
    }

    /// The endpoint being polled.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Fetch one snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::Fetch`] on transport failure or timeout,
    /// [`SourceError::Status`] on a non-2xx answer, and
    /// [`SourceError::Decode`] when the body is not a snapshot.
    pub async fn poll(&self) -> Result<GridSnapshot, SourceError> {
        let response = self
            .client
            .get(&self.url)
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(SourceError::Fetch)?;

        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::Status {
                status: status.as_u16(),
            });
        }

        let body = response.bytes().await.map_err(SourceError::Fetch)?;
        serde_json::from_slice(&body).map_err(|e| SourceError::Decode(e.to_string()))
    }
}

impl StatePoller for HttpStatePoller {
    fn poll_state(&self) -> impl Future<Output = Result<GridSnapshot, SourceError>> + Send {
        self.poll()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn unreachable_backend_is_a_fetch_error() {
        // Port 9 (discard) is not served on loopback in test environments.
        let poller =
            HttpStatePoller::new("http://127.0.0.1:9/state", Duration::from_millis(500)).unwrap();
        assert_eq!(poller.url(), "http://127.0.0.1:9/state");
        assert!(matches!(poller.poll().await, Err(SourceError::Fetch(_))));
    }
}
