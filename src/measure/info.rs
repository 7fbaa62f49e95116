use std::time::Duration;

use reqwest::{
    Client,
    header::{CONTENT_LENGTH, HeaderValue},
};
use tokio::time::Instant;
use tracing::debug;

use super::Error;

/// What a HEAD request tells about a measurement endpoint.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EndpointInfo {
    latency: Duration,
    content_length: Option<u64>,
}

impl EndpointInfo {
    fn new(latency: Duration) -> Self {
        Self {
            latency,
            content_length: None,
        }
    }

    fn extract_and_set_content_length(mut self, content_length: Option<&HeaderValue>) -> Self {
        self.content_length = content_length
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.parse::<u64>().ok());
        self
    }
}

impl EndpointInfo {
    /// Round trip of the HEAD request, headers included.
    pub fn latency(&self) -> Duration {
        self.latency
    }

    pub fn latency_ms(&self) -> f64 {
        self.latency.as_secs_f64() * 1000.
    }

    pub fn content_length(&self) -> Option<u64> {
        self.content_length
    }
}

/// Times a HEAD request against `url`. Any HTTP status counts as reachable.
pub async fn probe_endpoint(client: &Client, url: &str) -> Result<EndpointInfo, Error> {
    let started = Instant::now();
    let response = client.head(url).send().await?;
    let info = EndpointInfo::new(started.elapsed())
        .extract_and_set_content_length(response.headers().get(CONTENT_LENGTH));
    debug!(
        url,
        status = %response.status(),
        latency_ms = info.latency_ms(),
        content_length = ?info.content_length(),
        "endpoint probed"
    );
    Ok(info)
}
