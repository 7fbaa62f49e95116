use super::counters::ConnectionState;

/// Read-only view over one snapshot of the pool's counters.
pub(super) struct BytesAggregator<'a> {
    connections: &'a [ConnectionState],
}

impl<'a> BytesAggregator<'a> {
    pub(super) fn new(connections: &'a [ConnectionState]) -> Self {
        Self { connections }
    }

    pub(super) fn total_bytes(&self) -> u64 {
        self.connections
            .iter()
            .map(|connection| connection.bytes_transferred)
            .sum()
    }

    pub(super) fn max_connection_bytes(&self) -> u64 {
        self.connections
            .iter()
            .map(|connection| connection.bytes_transferred)
            .max()
            .unwrap_or_default()
    }

    pub(super) fn completed_count(&self) -> usize {
        self.connections
            .iter()
            .filter(|connection| connection.completed())
            .count()
    }

    pub(super) fn failed_count(&self) -> usize {
        self.connections
            .iter()
            .filter(|connection| connection.failed())
            .count()
    }

    pub(super) fn connections(&self) -> &'a [ConnectionState] {
        self.connections
    }
}
