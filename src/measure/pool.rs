use std::sync::Arc;

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use super::{
    counters::{self, ConnectionCounter, ConnectionProbe, ConnectionState},
    transport::{TransferRequest, Transport},
};

/// Runs one task per connection. Each task is the only writer of its counter.
pub(super) struct ConnectionPool {
    counters: Arc<[ConnectionCounter]>,
    handles: Vec<JoinHandle<()>>,
    token: CancellationToken,
}

impl ConnectionPool {
    pub(super) fn spawn(
        transport: Arc<dyn Transport>,
        requests: Vec<TransferRequest>,
        token: CancellationToken,
    ) -> Self {
        let counters = counters::new_counters(requests.len());
        let mut handles = Vec::with_capacity(requests.len());

        for request in requests {
            let probe = ConnectionProbe::new(Arc::clone(&counters), request.index);
            let transport = Arc::clone(&transport);
            let token = token.clone();
            handles.push(tokio::spawn(async move {
                ConnectionPool::drive(transport, request, probe, token).await
            }));
        }

        Self {
            counters,
            handles,
            token,
        }
    }

    async fn drive(
        transport: Arc<dyn Transport>,
        request: TransferRequest,
        probe: ConnectionProbe,
        token: CancellationToken,
    ) {
        debug!(connection = request.index, url = %request.url, "connection opened");
        tokio::select! {
            biased;
            _ = token.cancelled() => probe.on_abort(),
            result = transport.transfer(request, probe.clone()) => match result {
                Ok(()) => probe.on_complete(),
                Err(err) => probe.on_error(err),
            },
        }
    }

    pub(super) fn snapshot(&self) -> Vec<ConnectionState> {
        counters::snapshot(&self.counters)
    }

    /// Aborts every connection still open. Finished connections are unaffected.
    pub(super) fn cancel(&self) {
        self.token.cancel();
    }

    pub(super) async fn join(self) {
        for handle in self.handles {
            if let Err(err) = handle.await {
                warn!(%err, "connection task ended abnormally");
            }
        }
    }
}
