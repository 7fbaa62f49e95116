//! # NetGauge
//!
//! `NetGauge` measures real-world download and upload throughput by driving
//! several concurrent HTTP transfers against an endpoint, sampling byte
//! counters on a fixed interval and smoothing the live rate.
//!
//! Each measurement is one [`SessionController`]: it reports an [`Update`]
//! every sample tick and resolves to a single [`SessionResult`] whose
//! `average_mbps` is the mean of the positive per-tick samples.
//!
//! ```no_run
//! # async fn demo() -> Result<(), netgauge::Error> {
//! use netgauge::{MeasurementConfig, start_session};
//!
//! let config = MeasurementConfig::download("https://speed.cloudflare.com/__down?bytes=10000000", 10_000_000);
//! let result = start_session(config, |update| println!("{:.2} Mbps", update.smoothed_mbps))?.await;
//! println!("average: {:.2} Mbps", result.average_mbps);
//! # Ok(())
//! # }
//! ```
//!
//! # 💡 Tips
//!
//! **⚠️ Avoid Native TLS Memory Leaks**
//!
//! Long test loops over HTTPS are best run with `reqwest`'s **rustls-tls** backend:
//!
//! ```toml
//! reqwest = { version = "VERSION", default-features = false, features = ["rustls-tls", "stream"] }
//! ```
mod measure;
pub use measure::{
    ClientRequired, ConfigError, ConfigRequired, ConnectionError, ConnectionProbe,
    ConnectionState, ConnectionStatus, Direction, EndpointInfo, Error, HttpTransport,
    MeasurementConfig, ResultStore, SessionController, SessionHandle, SessionPhase,
    SessionResult, SessionSetupBuilder, SetupBuilder, SpeedTest, SpeedTestEvent,
    SpeedTestRecord, StopReason, TestPhase, TransferKind, TransferRequest, Transport, Update,
    UploadPayload, format_speed, probe_endpoint, round_mbps, start_session,
};
