use std::time::Duration;

use tracing::trace;

use super::{
    MeasurementConfig,
    bytes_aggregator::BytesAggregator,
    counters::ConnectionState,
    progress::ProgressEstimator,
    report::{Update, bytes_to_mbps, mean},
};

const MIN_ELAPSED_SECONDS: f64 = 0.001;

pub(super) struct SessionState {
    pub(super) total_bytes: u64,
    pub(super) last_sampled_total: u64,
    pub(super) smoothed_rate_mbps: f64,
    pub(super) samples: Vec<f64>,
    pub(super) stopped: bool,
}

impl SessionState {
    fn new() -> Self {
        Self {
            total_bytes: 0,
            last_sampled_total: 0,
            smoothed_rate_mbps: 0.,
            samples: vec![],
            stopped: false,
        }
    }
}

/// Single writer of [`SessionState`]; turns counter snapshots into [`Update`]s.
pub(super) struct Sampler {
    interval_seconds: f64,
    alpha: f64,
    progress: ProgressEstimator,
    pub(super) state: SessionState,
}

impl Sampler {
    pub(super) fn new(config: &MeasurementConfig) -> Self {
        Self {
            interval_seconds: config.sample_interval.as_secs_f64(),
            alpha: config.smoothing_alpha,
            progress: ProgressEstimator::new(
                config.direction,
                config.payload_size_bytes,
                config.connection_count,
            ),
            state: SessionState::new(),
        }
    }

    pub(super) fn tick(&mut self, connections: &[ConnectionState], elapsed: Duration) -> Update {
        debug_assert!(!self.state.stopped, "sampled a stopped session");
        let aggregate = BytesAggregator::new(connections);
        let state = &mut self.state;

        state.total_bytes = aggregate.total_bytes().max(state.total_bytes);
        let delta_bytes = state.total_bytes - state.last_sampled_total;
        state.last_sampled_total = state.total_bytes;

        let instantaneous_mbps = bytes_to_mbps(delta_bytes, self.interval_seconds);
        if instantaneous_mbps > 0. {
            state.samples.push(instantaneous_mbps);
        }
        state.smoothed_rate_mbps =
            self.alpha * instantaneous_mbps + (1. - self.alpha) * state.smoothed_rate_mbps;

        let update = Update {
            instantaneous_mbps,
            smoothed_mbps: state.smoothed_rate_mbps,
            elapsed_seconds: elapsed.as_secs_f64().max(MIN_ELAPSED_SECONDS),
            total_bytes_transferred: state.total_bytes,
            progress: self.progress.estimate(&aggregate),
        };
        trace!(
            delta_bytes,
            instantaneous_mbps,
            smoothed_mbps = update.smoothed_mbps,
            progress = update.progress,
            "sample"
        );
        update
    }

    pub(super) fn stop(&mut self) {
        self.state.stopped = true;
    }

    pub(super) fn average_mbps(&self) -> f64 {
        mean(&self.state.samples)
    }
}
