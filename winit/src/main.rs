// Prevent console window in addition to Slint window in Windows release builds when, e.g., starting the app via file manager. Ignored on other platforms.
#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

slint::include_modules!();

use std::sync::Arc;

use chrono::Local;
use solar_monitor_common::sensor::{
    DummySensorProvider, PollConfig, RtdbSensorProvider, SensorPoller, SharedSensorProvider,
};
use solar_monitor_model::view;
use solar_monitor_model::{SensorReading, ViewState};

/// The public read endpoint of the tracker's realtime database. Fixed
/// configuration: override at compile time via SENSOR_ENDPOINT_URL.
const DEFAULT_ENDPOINT: &str = "https://waterdtection-default-rtdb.firebaseio.com/.json";

/// Our App struct that holds the UI, the poller and the repeated timer
/// driving the poll/refresh/display cycle.
///
/// Dropping the App drops the timer, which cancels the cycle; polls still
/// in flight finish into the poller's internal slot and never touch the UI.
struct App {
    ui: AppWindow,
    poller: Arc<SensorPoller>,
    timer: slint::Timer,
}

impl App {
    /// Create a new App struct.
    ///
    /// Polls the real endpoint unless SENSOR_OFFLINE was set at compile
    /// time, in which case the bundled snapshot is served instead.
    fn new() -> anyhow::Result<Self> {
        // Make a new AppWindow
        let ui = AppWindow::new()?;

        let provider: SharedSensorProvider = if std::option_env!("SENSOR_OFFLINE").is_some() {
            Arc::new(DummySensorProvider::new()?)
        } else {
            let endpoint = std::option_env!("SENSOR_ENDPOINT_URL").unwrap_or(DEFAULT_ENDPOINT);
            log::info!("polling {endpoint}");
            Arc::new(RtdbSensorProvider::new(endpoint)?)
        };

        // Return the App struct
        Ok(Self {
            ui,
            poller: Arc::new(SensorPoller::new(provider)),
            timer: slint::Timer::default(),
        })
    }

    /// Run the App: poll once right away, then re-poll on every tick.
    fn run(&mut self, config: PollConfig) -> anyhow::Result<()> {
        // Get the handle to the UI as a weak reference for the timer closure.
        let ui_handle = self.ui.as_weak();
        let poller = self.poller.clone();

        // A visible loading indicator until the first poll completes.
        let mut state = ViewState::Loading;
        apply_view_state(&self.ui, &state);
        self.poller.issue();

        self.timer.start(slint::TimerMode::Repeated, config.interval, move || {
            let ui = ui_handle.unwrap();

            // Fold in the freshest completed poll, if one arrived. The
            // poller already dropped anything an even newer poll outran.
            if let Some(result) = poller.take_latest() {
                state.apply_poll(result.map_err(|e| e.to_string()), Local::now());
                apply_view_state(&ui, &state);
            }

            // Re-poll. A previous poll still in flight is simply outrun.
            poller.issue();
        });

        // Run the UI (and map an error to an anyhow::Error).
        self.ui.run().map_err(|e| e.into())
    }
}

/// Pushes the view state into the Slint view model. The only place UI
/// state is written.
fn apply_view_state(ui: &AppWindow, state: &ViewState) {
    let model = ui.global::<ViewModel>();

    match state {
        ViewState::Loading => model.set_phase(ViewPhase::Loading),
        ViewState::Error(message) => {
            model.set_error_message(message.as_str().into());
            model.set_phase(ViewPhase::Error);
        }
        ViewState::NoData { .. } => model.set_phase(ViewPhase::NoData),
        ViewState::Data {
            reading,
            observed_at,
        } => {
            model.set_header_text(
                format!(
                    "{} • {}",
                    view::header_date(observed_at),
                    view::header_time(observed_at)
                )
                .into(),
            );
            model.set_current(reading.into());
            model.set_phase(ViewPhase::Data);
        }
    }
}

/// Convert a reading into the record the Slint view model displays.
impl From<&SensorReading> for SensorRecord {
    fn from(reading: &SensorReading) -> Self {
        Self {
            humidity: view::humidity_text(reading).into(),
            temperature: view::temperature_text(reading).into(),
            rain_detected: reading.is_raining(),
            rain_intensity: reading.rain_intensity_text().into(),
            status_ok: reading.status_is_ok(),
            status_label: view::status_label(reading).into(),
            last_update: view::last_update_text(reading, &Local).into(),
        }
    }
}

/// A minimal main function that initializes the App and runs it.
fn main() -> anyhow::Result<()> {
    env_logger::init();

    let mut app = App::new()?;

    app.run(PollConfig::default())
}
