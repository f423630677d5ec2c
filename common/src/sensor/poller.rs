use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use crate::sensor::provider::{FetchResult, SharedSensorProvider};
use crate::LatestSlot;

/// How often the widget re-polls the endpoint.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PollConfig {
    pub interval: Duration,
}

impl Default for PollConfig {
    /// One second. The cadence is deliberately a configuration value so a
    /// deployment can slow it down without touching the poll loop.
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(1),
        }
    }
}

/// Issues sequence-numbered fetches on worker threads and retains only the
/// outcome of the newest poll.
///
/// Overlapping polls are allowed; when an older poll's response arrives
/// after a newer poll already completed, the old response is dropped, so
/// whoever drains the poller always observes the result of the most
/// recently issued poll. Outcomes land in an internal slot rather than in
/// any UI state, so a fetch finishing after the widget was torn down has
/// nothing left to corrupt.
pub struct SensorPoller {
    provider: SharedSensorProvider,
    next_seq: AtomicU64,
    outcomes: LatestSlot<FetchResult>,
}

impl SensorPoller {
    pub fn new(provider: SharedSensorProvider) -> Self {
        Self {
            provider,
            next_seq: AtomicU64::new(1),
            outcomes: LatestSlot::default(),
        }
    }

    /// Starts one poll and returns immediately; the outcome lands in the
    /// internal slot once the round-trip finishes. Sequence numbers are
    /// assigned here, in issuance order.
    pub fn issue(&self) {
        let seq = self.next_seq.fetch_add(1, Ordering::Relaxed);
        let provider = self.provider.clone();
        let outcomes = self.outcomes.clone();

        std::thread::spawn(move || {
            let result = provider.fetch_reading();
            if let Err(e) = &result {
                log::error!("poll {seq} failed: {e}");
            }
            outcomes.offer(seq, result);
        });
    }

    /// Drains the freshest completed poll, if one arrived since the last
    /// call.
    pub fn take_latest(&self) -> Option<FetchResult> {
        self.outcomes.take()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::mpsc;
    use std::sync::{Arc, Mutex};
    use std::time::{Duration, Instant};

    use solar_monitor_model::SensorReading;

    use super::*;
    use crate::sensor::provider::{FetchError, SensorDataProvider};
    use crate::sensor::DummySensorProvider;

    /// Hands each fetch call back to the test as a reply channel, so the
    /// test controls exactly when and with what every poll resolves.
    struct HandshakeProvider {
        calls: Mutex<mpsc::Sender<mpsc::Sender<FetchResult>>>,
    }

    impl SensorDataProvider for HandshakeProvider {
        fn fetch_reading(&self) -> FetchResult {
            let (reply_tx, reply_rx) = mpsc::channel();
            self.calls.lock().unwrap().send(reply_tx).unwrap();
            reply_rx.recv().unwrap()
        }
    }

    fn handshake_poller() -> (SensorPoller, mpsc::Receiver<mpsc::Sender<FetchResult>>) {
        let (calls_tx, calls_rx) = mpsc::channel();
        let provider = Arc::new(HandshakeProvider {
            calls: Mutex::new(calls_tx),
        });
        (SensorPoller::new(provider), calls_rx)
    }

    fn reading_with_humidity(humidity: f64) -> SensorReading {
        SensorReading {
            humidity: Some(humidity),
            ..Default::default()
        }
    }

    fn drain_within(poller: &SensorPoller, timeout: Duration) -> Option<FetchResult> {
        let deadline = Instant::now() + timeout;
        while Instant::now() < deadline {
            if let Some(result) = poller.take_latest() {
                return Some(result);
            }
            std::thread::sleep(Duration::from_millis(5));
        }
        None
    }

    #[test]
    fn a_completed_poll_is_drained_once() {
        let poller = SensorPoller::new(Arc::new(DummySensorProvider::new().unwrap()));

        poller.issue();

        let result = drain_within(&poller, Duration::from_secs(5)).unwrap();
        assert_eq!(result.unwrap().unwrap().humidity, Some(47.0));
        assert!(poller.take_latest().is_none());
    }

    #[test]
    fn a_failed_poll_surfaces_its_error() {
        let (poller, calls) = handshake_poller();

        poller.issue();
        let reply = calls.recv().unwrap();
        reply.send(Err(FetchError::Status(500))).unwrap();

        let result = drain_within(&poller, Duration::from_secs(5)).unwrap();
        let error = result.unwrap_err();
        assert!(error.to_string().contains("Failed to fetch data"));
        assert!(error.to_string().contains("500"));
    }

    #[test]
    fn an_older_poll_resolving_late_loses_to_the_newest_issued_poll() {
        let (poller, calls) = handshake_poller();

        // Waiting for the fetch call between issues pins down which reply
        // channel belongs to which sequence number.
        poller.issue();
        let first_reply = calls.recv().unwrap();
        poller.issue();
        let second_reply = calls.recv().unwrap();

        // The later poll resolves first and is what the UI must see.
        second_reply
            .send(Ok(Some(reading_with_humidity(60.0))))
            .unwrap();
        let result = drain_within(&poller, Duration::from_secs(5)).unwrap();
        assert_eq!(result.unwrap().unwrap().humidity, Some(60.0));

        // The earlier poll resolves afterwards and must be discarded.
        first_reply
            .send(Ok(Some(reading_with_humidity(10.0))))
            .unwrap();
        std::thread::sleep(Duration::from_millis(200));
        assert!(poller.take_latest().is_none());
    }
}
