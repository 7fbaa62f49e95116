use std::sync::{
    Arc,
    atomic::{AtomicU8, AtomicU64, Ordering},
};

use tracing::{debug, warn};

use super::ConnectionError;

const ACTIVE: u8 = 0;
const COMPLETED: u8 = 1;
const FAILED: u8 = 2;
const ABORTED: u8 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionStatus {
    Active,
    Completed,
    Failed,
    Aborted,
}

impl ConnectionStatus {
    fn from_raw(raw: u8) -> Self {
        match raw {
            COMPLETED => ConnectionStatus::Completed,
            FAILED => ConnectionStatus::Failed,
            ABORTED => ConnectionStatus::Aborted,
            _ => ConnectionStatus::Active,
        }
    }
}

/// Point-in-time copy of one connection's counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConnectionState {
    pub index: usize,
    pub bytes_transferred: u64,
    pub status: ConnectionStatus,
}

impl ConnectionState {
    /// Finished on its own, successfully or not. An aborted connection is not completed.
    pub fn completed(&self) -> bool {
        matches!(
            self.status,
            ConnectionStatus::Completed | ConnectionStatus::Failed
        )
    }

    pub fn failed(&self) -> bool {
        self.status == ConnectionStatus::Failed
    }
}

#[derive(Debug, Default)]
pub(super) struct ConnectionCounter {
    bytes: AtomicU64,
    status: AtomicU8,
}

impl ConnectionCounter {
    fn snapshot(&self, index: usize) -> ConnectionState {
        // status first: a terminal status guarantees its final bytes are visible
        let status = ConnectionStatus::from_raw(self.status.load(Ordering::Acquire));
        ConnectionState {
            index,
            bytes_transferred: self.bytes.load(Ordering::Acquire),
            status,
        }
    }

    fn finish(&self, terminal: u8) -> bool {
        self.status
            .compare_exchange(ACTIVE, terminal, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }
}

pub(super) fn new_counters(count: usize) -> Arc<[ConnectionCounter]> {
    (0..count).map(|_| ConnectionCounter::default()).collect()
}

pub(super) fn snapshot(counters: &[ConnectionCounter]) -> Vec<ConnectionState> {
    counters
        .iter()
        .enumerate()
        .map(|(index, counter)| counter.snapshot(index))
        .collect()
}

/// Write handle a transport uses to report progress for exactly one connection.
///
/// Only the owning connection writes through its probe. Deltas reported after
/// the connection reached a terminal status are dropped.
#[derive(Debug, Clone)]
pub struct ConnectionProbe {
    counters: Arc<[ConnectionCounter]>,
    index: usize,
}

impl ConnectionProbe {
    pub(super) fn new(counters: Arc<[ConnectionCounter]>, index: usize) -> Self {
        Self { counters, index }
    }

    fn counter(&self) -> &ConnectionCounter {
        &self.counters[self.index]
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn on_byte_delta(&self, bytes: u64) {
        let counter = self.counter();
        if counter.status.load(Ordering::Acquire) == ACTIVE {
            counter.bytes.fetch_add(bytes, Ordering::Release);
        }
    }

    pub fn on_complete(&self) {
        if self.counter().finish(COMPLETED) {
            debug!(
                connection = self.index,
                bytes = self.counter().bytes.load(Ordering::Acquire),
                "connection completed"
            );
        }
    }

    pub fn on_error(&self, err: ConnectionError) {
        if self.counter().finish(FAILED) {
            warn!(connection = self.index, %err, "connection failed, continuing without it");
        }
    }

    pub(super) fn on_abort(&self) {
        if self.counter().finish(ABORTED) {
            debug!(connection = self.index, "connection aborted");
        }
    }
}
