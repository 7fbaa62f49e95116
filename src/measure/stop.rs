use std::time::Duration;

use super::{
    Direction, MeasurementConfig, bytes_aggregator::BytesAggregator, counters::ConnectionState,
    report::StopReason,
};

pub(super) struct StopConditions {
    direction: Direction,
    payload_size_bytes: u64,
    expected_total_bytes: u64,
    max_duration: Duration,
}

impl StopConditions {
    pub(super) fn new(config: &MeasurementConfig) -> Self {
        Self {
            direction: config.direction,
            payload_size_bytes: config.payload_size_bytes,
            expected_total_bytes: config.expected_total_bytes(),
            max_duration: config.max_duration,
        }
    }

    /// Returns the first condition that ends the session, if any.
    pub(super) fn evaluate(
        &self,
        connections: &[ConnectionState],
        total_bytes: u64,
        elapsed: Duration,
    ) -> Option<StopReason> {
        let aggregate = BytesAggregator::new(connections);

        if elapsed >= self.max_duration {
            return Some(StopReason::Deadline);
        }
        if self.direction == Direction::Download
            && aggregate.max_connection_bytes() >= self.payload_size_bytes
        {
            return Some(StopReason::ConnectionFinished);
        }
        if aggregate.completed_count() == connections.len() {
            return Some(StopReason::AllConnectionsFinished);
        }
        if total_bytes >= self.expected_total_bytes {
            return Some(StopReason::ByteThreshold);
        }
        None
    }
}
