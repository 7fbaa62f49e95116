use std::time::Duration;

use reqwest::Url;

use super::{ConfigError, Direction};

const DEFAULT_CONNECTION_COUNT: usize = 3;
const DEFAULT_SAMPLE_INTERVAL: Duration = Duration::from_millis(200);
const DEFAULT_MAX_DURATION: Duration = Duration::from_millis(15_000);
const DEFAULT_SMOOTHING_ALPHA: f64 = 0.2;

/// Parameters of one measurement session. Immutable once the session is running.
///
/// `payload_size_bytes` is per connection: the size each download expects to
/// receive, or the size of the synthetic body each upload sends.
#[derive(Debug, Clone, PartialEq)]
pub struct MeasurementConfig {
    pub target_url: String,
    pub payload_size_bytes: u64,
    pub connection_count: usize,
    pub sample_interval: Duration,
    pub max_duration: Duration,
    pub smoothing_alpha: f64,
    pub direction: Direction,
}

impl MeasurementConfig {
    fn new(direction: Direction, target_url: &str, payload_size_bytes: u64) -> Self {
        Self {
            target_url: String::from(target_url),
            payload_size_bytes,
            connection_count: DEFAULT_CONNECTION_COUNT,
            sample_interval: DEFAULT_SAMPLE_INTERVAL,
            max_duration: DEFAULT_MAX_DURATION,
            smoothing_alpha: DEFAULT_SMOOTHING_ALPHA,
            direction,
        }
    }

    pub fn download(target_url: &str, payload_size_bytes: u64) -> Self {
        Self::new(Direction::Download, target_url, payload_size_bytes)
    }

    pub fn upload(target_url: &str, payload_size_bytes: u64) -> Self {
        Self::new(Direction::Upload, target_url, payload_size_bytes)
    }

    pub fn with_connection_count(mut self, count: usize) -> Self {
        self.connection_count = count;
        self
    }

    pub fn with_sample_interval(mut self, interval: Duration) -> Self {
        self.sample_interval = interval;
        self
    }

    pub fn with_max_duration(mut self, duration: Duration) -> Self {
        self.max_duration = duration;
        self
    }

    pub fn with_smoothing_alpha(mut self, alpha: f64) -> Self {
        self.smoothing_alpha = alpha;
        self
    }

    /// Bytes after which the session has seen every connection's full share.
    pub(super) fn expected_total_bytes(&self) -> u64 {
        self.payload_size_bytes
            .saturating_mul(self.connection_count as u64)
    }

    /// In-memory size of the upload body, which must fit the address space.
    pub(super) fn upload_len(&self) -> Result<usize, ConfigError> {
        usize::try_from(self.payload_size_bytes)
            .map_err(|_| ConfigError::PayloadTooLarge(self.payload_size_bytes))
    }

    pub(super) fn validate(&self) -> Result<Url, ConfigError> {
        if self.target_url.trim().is_empty() {
            return Err(ConfigError::MissingUrl);
        }
        let url = Url::parse(&self.target_url).map_err(|err| ConfigError::InvalidUrl {
            url: self.target_url.clone(),
            reason: err.to_string(),
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ConfigError::UnsupportedScheme(url.scheme().to_string()));
        }
        if self.connection_count == 0 {
            return Err(ConfigError::InvalidConnectionCount);
        }
        if self.payload_size_bytes == 0 {
            return Err(ConfigError::InvalidPayloadSize);
        }
        if self.direction == Direction::Upload {
            self.upload_len()?;
        }
        if self.sample_interval.is_zero() {
            return Err(ConfigError::InvalidSampleInterval);
        }
        if self.max_duration.is_zero() {
            return Err(ConfigError::InvalidMaxDuration);
        }
        // NaN fails both comparisons
        if !(self.smoothing_alpha > 0. && self.smoothing_alpha <= 1.) {
            return Err(ConfigError::InvalidSmoothingAlpha(self.smoothing_alpha));
        }
        Ok(url)
    }
}
