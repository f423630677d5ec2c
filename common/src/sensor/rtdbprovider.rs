use solar_monitor_model::RtdbSnapshot;

use crate::sensor::provider::{FetchError, FetchResult, SensorDataProvider};

/// Reads the latest document from a Firebase-style realtime database over
/// its public REST surface (`GET https://<host>/.json`). No auth, no query
/// parameters; the whole document comes back on every poll.
pub struct RtdbSensorProvider {
    endpoint: String,
    client: reqwest::Client,
    runtime: tokio::runtime::Runtime,
}

impl RtdbSensorProvider {
    pub fn new(endpoint: impl Into<String>) -> std::io::Result<Self> {
        Ok(Self {
            endpoint: endpoint.into(),
            client: reqwest::Client::new(),
            runtime: tokio::runtime::Runtime::new()?,
        })
    }

    async fn fetch_snapshot(&self) -> FetchResult {
        let response = self
            .client
            .get(&self.endpoint)
            .send()
            .await
            .map_err(|e| FetchError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        let snapshot: RtdbSnapshot = response
            .json()
            .await
            .map_err(|e| FetchError::Decode(e.to_string()))?;
        log::debug!("snapshot from {}: {snapshot:?}", self.endpoint);

        Ok(snapshot.single_axis)
    }
}

impl SensorDataProvider for RtdbSensorProvider {
    fn fetch_reading(&self) -> FetchResult {
        self.runtime.block_on(self.fetch_snapshot())
    }
}
