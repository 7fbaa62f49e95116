mod bytes_aggregator;
mod config;
mod counters;
mod http_transport;
mod info;
mod payload;
mod pool;
mod progress;
mod report;
mod request_utils;
mod sampler;
mod session;
mod setup;
mod stop;
mod transport;

pub use config::MeasurementConfig;
pub use counters::{ConnectionProbe, ConnectionState, ConnectionStatus};
pub use http_transport::HttpTransport;
pub use info::{EndpointInfo, probe_endpoint};
pub use payload::UploadPayload;
pub use report::{SessionResult, StopReason, Update, format_speed, round_mbps};
pub use session::{SessionController, SessionHandle, start_session};
pub use setup::{ClientRequired, ConfigRequired, SessionSetupBuilder, SetupBuilder};
pub use speed_test::{ResultStore, SpeedTest, SpeedTestEvent, SpeedTestRecord, TestPhase};
pub use transport::{TransferKind, TransferRequest, Transport};

use parking_lot::Mutex;
use reqwest::StatusCode;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Download,
    Upload,
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Direction::Download => f.write_str("download"),
            Direction::Upload => f.write_str("upload"),
        }
    }
}

/// Lifecycle of one [`SessionController`]. Transitions only move forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    Idle,
    Running,
    Stopping,
    Completed,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("target url is empty")]
    MissingUrl,
    #[error("target url `{url}` is invalid: {reason}")]
    InvalidUrl { url: String, reason: String },
    #[error("unsupported url scheme `{0}`, expected http or https")]
    UnsupportedScheme(String),
    #[error("connection count must be at least 1")]
    InvalidConnectionCount,
    #[error("payload size must be greater than zero")]
    InvalidPayloadSize,
    #[error("upload payload of {0} bytes does not fit in memory")]
    PayloadTooLarge(u64),
    #[error("sample interval must be greater than zero")]
    InvalidSampleInterval,
    #[error("max duration must be greater than zero")]
    InvalidMaxDuration,
    #[error("smoothing alpha must be in (0, 1], got {0}")]
    InvalidSmoothingAlpha(f64),
}

/// Failure of a single connection. Absorbed by the pool, never returned from a session.
#[derive(Debug, thiserror::Error)]
pub enum ConnectionError {
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("endpoint answered with status {0}")]
    Status(StatusCode),
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("speed test cancelled")]
    Cancelled,
    #[error("failed to store speed test record: {0}")]
    Store(String),
}

trait PhaseMutexExt {
    fn get(&self) -> SessionPhase;
    fn update(&self, new: SessionPhase);
    fn stop_if_running(&self) -> bool;
}

impl PhaseMutexExt for Mutex<SessionPhase> {
    fn get(&self) -> SessionPhase {
        *self.lock()
    }

    fn update(&self, new: SessionPhase) {
        *self.lock() = new
    }

    fn stop_if_running(&self) -> bool {
        let mut guard = self.lock();
        if matches!(*guard, SessionPhase::Running) {
            *guard = SessionPhase::Stopping;
            return true;
        }
        false
    }
}
