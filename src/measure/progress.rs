use super::{Direction, bytes_aggregator::BytesAggregator, counters::ConnectionStatus};

// An upload that has handed over its whole body is still waiting on the
// server's answer, so in-flight connections never count as fully done.
const IN_FLIGHT_CEILING: f64 = 0.9;

pub(super) struct ProgressEstimator {
    direction: Direction,
    payload_size_bytes: u64,
    connection_count: usize,
    previous: f64,
}

impl ProgressEstimator {
    pub(super) fn new(direction: Direction, payload_size_bytes: u64, connection_count: usize) -> Self {
        Self {
            direction,
            payload_size_bytes,
            connection_count,
            previous: 0.,
        }
    }

    pub(super) fn estimate(&mut self, aggregate: &BytesAggregator) -> f64 {
        let estimate = match self.direction {
            Direction::Download => self.download(aggregate),
            Direction::Upload => self.upload(aggregate),
        };
        let progress = self.previous.max(estimate.clamp(0., 1.));
        self.previous = progress;
        progress
    }

    /// The session may stop when the first connection finishes, so the
    /// furthest-ahead connection drives progress.
    fn download(&self, aggregate: &BytesAggregator) -> f64 {
        let furthest = aggregate.max_connection_bytes() as f64;
        (furthest / self.payload_size_bytes as f64).min(1.)
    }

    /// Finished connections count fully; in-flight ones are interpolated by
    /// how much of their body has been sent.
    fn upload(&self, aggregate: &BytesAggregator) -> f64 {
        let in_flight: f64 = aggregate
            .connections()
            .iter()
            .filter(|connection| connection.status == ConnectionStatus::Active)
            .map(|connection| {
                let sent = connection.bytes_transferred as f64 / self.payload_size_bytes as f64;
                sent.min(IN_FLIGHT_CEILING)
            })
            .sum();
        (aggregate.completed_count() as f64 + in_flight) / self.connection_count as f64
    }
}
