use std::{future::Future, sync::Arc};

use parking_lot::Mutex;
use reqwest::Url;
use tokio::time::{self, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};
use uuid::Uuid;

use super::{
    ConfigError, Direction, MeasurementConfig, PhaseMutexExt, SessionPhase,
    bytes_aggregator::BytesAggregator,
    http_transport::HttpTransport,
    payload::UploadPayload,
    pool::ConnectionPool,
    report::{SessionResult, StopReason, Update},
    request_utils,
    sampler::Sampler,
    setup::{ClientRequired, SessionSetupBuilder},
    stop::StopConditions,
    transport::{TransferKind, TransferRequest, Transport},
};

/// Drives one measurement from start to its single [`SessionResult`].
///
/// A controller runs at most once: [`run`](Self::run) consumes it. Start a new
/// controller for every measurement.
pub struct SessionController {
    transport: Arc<dyn Transport>,
    config: MeasurementConfig,
    url: Url,
    upload_len: Option<usize>,
    token: CancellationToken,
    phase: Arc<Mutex<SessionPhase>>,
}

impl SessionController {
    pub fn setup() -> SessionSetupBuilder<ClientRequired> {
        SessionSetupBuilder::default()
    }

    /// Validates `config` before any network I/O takes place.
    pub fn new(
        config: MeasurementConfig,
        transport: Arc<dyn Transport>,
    ) -> Result<Self, ConfigError> {
        Self::with_token(config, transport, CancellationToken::new())
    }

    pub(super) fn with_token(
        config: MeasurementConfig,
        transport: Arc<dyn Transport>,
        token: CancellationToken,
    ) -> Result<Self, ConfigError> {
        let url = config.validate()?;
        let upload_len = match config.direction {
            Direction::Upload => Some(config.upload_len()?),
            Direction::Download => None,
        };
        Ok(Self {
            transport,
            config,
            url,
            upload_len,
            token,
            phase: Arc::new(Mutex::new(SessionPhase::Idle)),
        })
    }

    pub fn config(&self) -> &MeasurementConfig {
        &self.config
    }

    pub fn handle(&self) -> SessionHandle {
        SessionHandle {
            token: self.token.clone(),
            phase: Arc::clone(&self.phase),
        }
    }

    async fn transfer_requests(&self) -> Vec<TransferRequest> {
        let nonce = Uuid::new_v4();
        let kind = match self.upload_len {
            Some(len) => TransferKind::Upload {
                payload: UploadPayload::generate(len).await,
            },
            None => TransferKind::Download {
                expected_bytes: self.config.payload_size_bytes,
            },
        };
        (0..self.config.connection_count)
            .map(|index| TransferRequest {
                index,
                url: request_utils::cache_busted_url(&self.url, &nonce, index),
                kind: kind.clone(),
            })
            .collect()
    }

    /// Runs the session, calling `on_update` once per sample tick in tick order.
    ///
    /// The clock starts before the upload body is generated, so a deadline or
    /// cancellation that lands during generation resolves with no samples.
    /// Connection failures are absorbed; the result reflects whatever was
    /// measured before the session stopped.
    pub async fn run<F>(self, mut on_update: F) -> SessionResult
    where
        F: FnMut(Update),
    {
        self.phase.update(SessionPhase::Running);
        let config = &self.config;
        info!(
            direction = %config.direction,
            url = %self.url,
            connections = config.connection_count,
            payload_bytes = config.payload_size_bytes,
            "measurement session started"
        );

        let started = Instant::now();
        let prepared = tokio::select! {
            biased;
            _ = self.token.cancelled() => Err(StopReason::Cancelled),
            _ = time::sleep_until(started + config.max_duration) => Err(StopReason::Deadline),
            requests = self.transfer_requests() => Ok(requests),
        };
        let result = match prepared {
            Ok(requests) => self.sample(requests, started, &mut on_update).await,
            Err(stop_reason) => {
                self.phase.stop_if_running();
                debug!(reason = %stop_reason, "session stopped while preparing transfers");
                SessionResult {
                    average_mbps: 0.,
                    total_bytes_transferred: 0,
                    elapsed_seconds: started.elapsed().as_secs_f64(),
                    stop_reason,
                    failed_connections: 0,
                }
            }
        };

        self.phase.update(SessionPhase::Completed);
        info!(
            direction = %config.direction,
            reason = %result.stop_reason,
            total_bytes = result.total_bytes_transferred,
            average_mbps = result.average_mbps,
            elapsed_seconds = result.elapsed_seconds,
            failed_connections = result.failed_connections,
            "measurement session finished"
        );
        result
    }

    async fn sample<F>(
        &self,
        requests: Vec<TransferRequest>,
        started: Instant,
        on_update: &mut F,
    ) -> SessionResult
    where
        F: FnMut(Update),
    {
        let config = &self.config;
        let pool = ConnectionPool::spawn(
            Arc::clone(&self.transport),
            requests,
            self.token.child_token(),
        );
        let mut sampler = Sampler::new(config);
        let stop_conditions = StopConditions::new(config);
        let mut ticker = time::interval_at(started + config.sample_interval, config.sample_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        let stop_reason = loop {
            tokio::select! {
                biased;
                _ = self.token.cancelled() => break StopReason::Cancelled,
                _ = ticker.tick() => {}
            }
            let connections = pool.snapshot();
            let elapsed = started.elapsed();
            let update = sampler.tick(&connections, elapsed);
            on_update(update);
            if let Some(reason) =
                stop_conditions.evaluate(&connections, sampler.state.total_bytes, elapsed)
            {
                break reason;
            }
        };

        sampler.stop();
        self.phase.stop_if_running();
        pool.cancel();
        let elapsed = started.elapsed();
        let failed_connections = BytesAggregator::new(&pool.snapshot()).failed_count();
        pool.join().await;

        SessionResult {
            average_mbps: sampler.average_mbps(),
            total_bytes_transferred: sampler.state.total_bytes,
            elapsed_seconds: elapsed.as_secs_f64(),
            stop_reason,
            failed_connections,
        }
    }
}

/// Cancels a running session or observes its phase from elsewhere.
#[derive(Debug, Clone)]
pub struct SessionHandle {
    token: CancellationToken,
    phase: Arc<Mutex<SessionPhase>>,
}

impl SessionHandle {
    /// Stops the session at its next opportunity. Safe to call repeatedly and
    /// after the session has completed.
    pub fn cancel(&self) {
        self.phase.stop_if_running();
        self.token.cancel();
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase.get()
    }
}

/// Validates `config` and returns the session future, using a default HTTP client.
///
/// Configuration errors surface here, before any request is sent.
pub fn start_session<F>(
    config: MeasurementConfig,
    on_update: F,
) -> Result<impl Future<Output = SessionResult> + Send, ConfigError>
where
    F: FnMut(Update) + Send,
{
    let controller = SessionController::new(config, Arc::new(HttpTransport::default()))?;
    Ok(controller.run(on_update))
}
