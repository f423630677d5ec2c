use solar_monitor_model::{RtdbSnapshot, SensorReading};

use crate::sensor::provider::{FetchResult, SensorDataProvider};

/// Serves a canned snapshot bundled with the crate. Used when the app is
/// built for offline use and as a fixture in tests.
pub struct DummySensorProvider {
    reading: Option<SensorReading>,
}

impl DummySensorProvider {
    pub fn new() -> Result<Self, serde_json::Error> {
        let json_data = std::include_str!("./dummysensor.json");

        let snapshot = serde_json::from_str::<RtdbSnapshot>(json_data)?;
        Ok(Self {
            reading: snapshot.single_axis,
        })
    }
}

impl SensorDataProvider for DummySensorProvider {
    fn fetch_reading(&self) -> FetchResult {
        Ok(self.reading.clone())
    }
}

#[test]
fn test_dummy_sensor_provider() {
    let provider = DummySensorProvider::new().unwrap();
    let reading = provider.fetch_reading().unwrap().unwrap();

    assert_eq!(reading.humidity, Some(47.0));
    assert_eq!(reading.temperature, Some(23.5));
    assert!(!reading.is_raining());
    assert!(reading.status_is_ok());
}
