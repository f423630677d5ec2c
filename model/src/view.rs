use std::fmt;

use chrono::{DateTime, Local, TimeZone};

use crate::reading::{number_text, SensorReading};

/// What the widget currently shows. Exactly one branch is active.
#[derive(Clone, Debug, PartialEq)]
pub enum ViewState {
    /// The first poll has not completed yet. Only reachable on mount; a
    /// later poll always lands in one of the other branches.
    Loading,

    /// The last poll failed at the transport or decode layer. The message
    /// carries the failure description verbatim.
    Error(String),

    /// The last poll succeeded but the document had no `Single_Axis` key.
    /// Deliberately distinct from `Error`: the backend answered, the
    /// schema just held no reading.
    NoData { observed_at: DateTime<Local> },

    /// The last poll delivered a reading.
    Data {
        reading: SensorReading,
        observed_at: DateTime<Local>,
    },
}

impl ViewState {
    /// Folds one completed poll into the view state. `Err` is a failed
    /// transport or decode, `Ok(None)` a 2xx body without the sensor key.
    /// Each reading replaces the previous one wholesale; `now` is the
    /// client wall-clock time the outcome was observed at.
    pub fn apply_poll(&mut self, result: Result<Option<SensorReading>, String>, now: DateTime<Local>) {
        *self = match result {
            Ok(Some(reading)) => ViewState::Data {
                reading,
                observed_at: now,
            },
            Ok(None) => ViewState::NoData { observed_at: now },
            Err(message) => ViewState::Error(message),
        };
        log::debug!("view state is now {self:?}");
    }
}

/// The date half of the header, e.g. "Tuesday, Nov 14".
pub fn header_date<Tz: TimeZone>(when: &DateTime<Tz>) -> String
where
    Tz::Offset: fmt::Display,
{
    when.format("%A, %b %-d").to_string()
}

/// The clock half of the header, 12-hour, e.g. "10:13 PM".
pub fn header_time<Tz: TimeZone>(when: &DateTime<Tz>) -> String
where
    Tz::Offset: fmt::Display,
{
    when.format("%I:%M %p").to_string()
}

/// The humidity card value, e.g. "47%". Blank value when unreported.
pub fn humidity_text(reading: &SensorReading) -> String {
    format!("{}%", reading.humidity.map(number_text).unwrap_or_default())
}

/// The temperature card value, e.g. "23.5°C". Blank value when unreported.
pub fn temperature_text(reading: &SensorReading) -> String {
    format!(
        "{}°C",
        reading.temperature.map(number_text).unwrap_or_default()
    )
}

/// The status bar label for the unit's self-reported health.
pub fn status_label(reading: &SensorReading) -> &'static str {
    if reading.status_is_ok() {
        "System Online"
    } else {
        "System Error"
    }
}

/// The `LastUpdate` instant rendered in `tz`, 12-hour with seconds, e.g.
/// "10:13:20 PM". Blank when the timestamp is absent or unparsable.
pub fn last_update_text<Tz: TimeZone>(reading: &SensorReading, tz: &Tz) -> String
where
    Tz::Offset: fmt::Display,
{
    reading
        .last_update_utc()
        .map(|utc| utc.with_timezone(tz).format("%I:%M:%S %p").to_string())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use serde_json::Value;

    fn reading_with(build: impl FnOnce(&mut SensorReading)) -> SensorReading {
        let mut reading = SensorReading::default();
        build(&mut reading);
        reading
    }

    #[test]
    fn cards_show_the_raw_values_with_units() {
        let reading = reading_with(|r| {
            r.humidity = Some(47.0);
            r.temperature = Some(23.5);
        });

        assert_eq!(humidity_text(&reading), "47%");
        assert_eq!(temperature_text(&reading), "23.5°C");
    }

    #[test]
    fn unreported_values_render_blank_not_zero() {
        let reading = SensorReading::default();

        assert_eq!(humidity_text(&reading), "%");
        assert_eq!(temperature_text(&reading), "°C");
    }

    #[test]
    fn only_the_literal_ok_status_is_online() {
        let with_status = |status: Option<&str>| {
            reading_with(|r| r.sensor_status = status.map(str::to_string))
        };

        assert_eq!(status_label(&with_status(Some("OK"))), "System Online");
        assert_eq!(status_label(&with_status(Some("ERROR"))), "System Error");
        assert_eq!(status_label(&with_status(Some(""))), "System Error");
        assert_eq!(status_label(&with_status(None)), "System Error");
    }

    #[test]
    fn the_reference_timestamp_formats_as_expected_in_utc() {
        // 1700000000000 ms is 2023-11-14 22:13:20 UTC.
        let reading = reading_with(|r| r.last_update = Some(Value::from("1700000000000")));

        assert_eq!(last_update_text(&reading, &Utc), "10:13:20 PM");
    }

    #[test]
    fn an_unparsable_timestamp_renders_blank() {
        let reading = reading_with(|r| r.last_update = Some(Value::from("soon")));

        assert_eq!(last_update_text(&reading, &Utc), "");
    }

    #[test]
    fn the_header_uses_long_weekday_short_month_and_a_12_hour_clock() {
        let when = Utc.timestamp_millis_opt(1_700_000_000_000).unwrap();

        assert_eq!(header_date(&when), "Tuesday, Nov 14");
        assert_eq!(header_time(&when), "10:13 PM");
    }

    #[test]
    fn a_successful_poll_clears_a_previous_error() {
        let mut state = ViewState::Error("Failed to fetch data: timed out".into());

        state.apply_poll(Ok(Some(SensorReading::default())), Local::now());

        assert!(matches!(state, ViewState::Data { .. }));
    }

    #[test]
    fn a_document_without_the_sensor_key_is_no_data_not_error() {
        let mut state = ViewState::Loading;

        state.apply_poll(Ok(None), Local::now());

        assert!(matches!(state, ViewState::NoData { .. }));
    }

    #[test]
    fn a_failed_poll_carries_the_failure_text() {
        let mut state = ViewState::Data {
            reading: SensorReading::default(),
            observed_at: Local::now(),
        };

        state.apply_poll(Err("Failed to fetch data: HTTP status 500".into()), Local::now());

        match state {
            ViewState::Error(message) => assert!(message.contains("HTTP status 500")),
            other => panic!("expected error state, got {other:?}"),
        }
    }
}
