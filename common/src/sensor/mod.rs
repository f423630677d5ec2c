mod provider;
mod dummyprovider;
mod rtdbprovider;
mod poller;

pub use provider::FetchError;
pub use provider::FetchResult;
pub use provider::SensorDataProvider;
pub use provider::SharedSensorProvider;

pub use dummyprovider::DummySensorProvider;
pub use rtdbprovider::RtdbSensorProvider;

pub use poller::PollConfig;
pub use poller::SensorPoller;
