use std::sync::Arc;

use solar_monitor_model::SensorReading;
use thiserror::Error;

/// A poll that failed to produce a decodable document.
///
/// Everything here is the transport/decode tier of the failure taxonomy
/// and renders as the inline error view. A document that decodes but holds
/// no sensor object is not an error; see [`FetchResult`].
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FetchError {
    /// The request never completed (DNS, TLS, connection, timeout).
    #[error("Failed to fetch data: {0}")]
    Transport(String),

    /// The server answered outside the 2xx range.
    #[error("Failed to fetch data: HTTP status {0}")]
    Status(u16),

    /// A body arrived but it was not the JSON document we expect.
    #[error("Failed to fetch data: {0}")]
    Decode(String),
}

/// The outcome of one poll. `Ok(None)` means the transport succeeded but
/// the document carried no `Single_Axis` object — the "no data" condition,
/// kept distinct from [`FetchError`] so an operator can tell a downed
/// backend from a changed schema.
pub type FetchResult = Result<Option<SensorReading>, FetchError>;

/// The data source behind the widget.
///
/// Implementations block until the round-trip finishes; the poller runs
/// them on worker threads, never on the UI thread.
pub trait SensorDataProvider {
    fn fetch_reading(&self) -> FetchResult;
}

pub type SharedSensorProvider = Arc<dyn SensorDataProvider + Send + Sync>;
