use async_trait::async_trait;
use reqwest::Url;

use super::{ConnectionError, Direction, counters::ConnectionProbe, payload::UploadPayload};

#[derive(Debug, Clone)]
pub enum TransferKind {
    /// GET a body of at least `expected_bytes`.
    Download { expected_bytes: u64 },
    /// POST the shared payload.
    Upload { payload: UploadPayload },
}

impl TransferKind {
    pub fn direction(&self) -> Direction {
        match self {
            TransferKind::Download { .. } => Direction::Download,
            TransferKind::Upload { .. } => Direction::Upload,
        }
    }
}

/// One connection's worth of work, handed to a [`Transport`].
#[derive(Debug, Clone)]
pub struct TransferRequest {
    pub index: usize,
    pub url: Url,
    pub kind: TransferKind,
}

/// HTTP primitive the connection pool drives.
///
/// An implementation reports every received or sent chunk through
/// [`ConnectionProbe::on_byte_delta`] and returns once the transfer is over.
/// The pool marks the connection completed or failed from the returned result,
/// and drops the future when the session is cancelled.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn transfer(
        &self,
        request: TransferRequest,
        probe: ConnectionProbe,
    ) -> Result<(), ConnectionError>;
}
