use std::fmt;

/// Live reading emitted once per sample tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Update {
    pub instantaneous_mbps: f64,
    pub smoothed_mbps: f64,
    pub elapsed_seconds: f64,
    pub total_bytes_transferred: u64,
    pub progress: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// Elapsed time reached `max_duration`.
    Deadline,
    /// A download connection received its full payload.
    ConnectionFinished,
    /// Every connection completed or failed.
    AllConnectionsFinished,
    /// Total bytes reached `payload_size_bytes * connection_count`.
    ByteThreshold,
    /// Cancelled through a [`SessionHandle`](super::SessionHandle) or parent token.
    Cancelled,
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let reason = match self {
            StopReason::Deadline => "deadline",
            StopReason::ConnectionFinished => "connection finished",
            StopReason::AllConnectionsFinished => "all connections finished",
            StopReason::ByteThreshold => "byte threshold",
            StopReason::Cancelled => "cancelled",
        };
        f.write_str(reason)
    }
}

/// Final outcome of a session.
///
/// `average_mbps` is the arithmetic mean of the positive instantaneous samples,
/// not the smoothed value shown while running. It is `0.0` when no tick saw
/// any bytes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SessionResult {
    pub average_mbps: f64,
    pub total_bytes_transferred: u64,
    pub elapsed_seconds: f64,
    pub stop_reason: StopReason,
    pub failed_connections: usize,
}

pub(super) fn bytes_to_mbps(bytes: u64, seconds: f64) -> f64 {
    (bytes as f64 / seconds) * 8. / 1_000_000.
}

pub(super) fn mean(samples: &[f64]) -> f64 {
    if samples.is_empty() {
        return 0.;
    }
    samples.iter().sum::<f64>() / samples.len() as f64
}

/// Rounds to two decimal places, the precision speeds are reported at.
pub fn round_mbps(mbps: f64) -> f64 {
    (mbps * 100.).round() / 100.
}

/// Renders a speed for display; unknown or negative speeds become `--.--`.
pub fn format_speed(mbps: Option<f64>) -> String {
    match mbps {
        Some(value) if value.is_finite() && value >= 0. => format!("{:.2}", value),
        _ => String::from("--.--"),
    }
}
