use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One telemetry snapshot of the axis-tracker unit, taken verbatim from the
/// `Single_Axis` object of the database document.
///
/// Every field is optional: a unit that has not published a value yet must
/// still decode, and the missing field renders blank. Fields the firmware
/// writes with an unstable type (`RainDetected`, `RainIntensity`,
/// `LastUpdate`) are kept as raw JSON values and interpreted by the
/// accessors below, so schema drift never lands in the error path.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(default)]
pub struct SensorReading {
    #[serde(rename = "Humidity")]
    pub humidity: Option<f64>,

    #[serde(rename = "Temperature")]
    pub temperature: Option<f64>,

    #[serde(rename = "RainDetected")]
    pub rain_detected: Option<Value>,

    #[serde(rename = "RainIntensity")]
    pub rain_intensity: Option<Value>,

    #[serde(rename = "SensorStatus")]
    pub sensor_status: Option<String>,

    /// Epoch milliseconds, written either as a string or as a number.
    #[serde(rename = "LastUpdate")]
    pub last_update: Option<Value>,
}

/// The whole database document. Sibling keys next to `Single_Axis` are
/// ignored; a document without the key decodes to `single_axis: None`.
#[derive(Deserialize, Debug, Default)]
pub struct RtdbSnapshot {
    #[serde(rename = "Single_Axis")]
    pub single_axis: Option<SensorReading>,
}

impl SensorReading {
    /// Rain counts as detected only when `RainDetected` is the number 1.
    /// Zero, strings, booleans and a missing field all mean "no rain".
    pub fn is_raining(&self) -> bool {
        matches!(&self.rain_detected, Some(v) if v.as_f64() == Some(1.0))
    }

    /// The rain intensity as display text, blank when absent.
    pub fn rain_intensity_text(&self) -> String {
        match &self.rain_intensity {
            Some(Value::String(s)) => s.clone(),
            Some(Value::Number(n)) => match n.as_f64() {
                Some(v) => number_text(v),
                None => n.to_string(),
            },
            _ => String::new(),
        }
    }

    /// Whether the unit reports itself healthy. Only the literal string
    /// `"OK"` counts; `"ERROR"`, the empty string and a missing field are
    /// all the error variant.
    pub fn status_is_ok(&self) -> bool {
        self.sensor_status.as_deref() == Some("OK")
    }

    /// The `LastUpdate` timestamp as an instant, if it parses as integer
    /// epoch milliseconds.
    pub fn last_update_utc(&self) -> Option<DateTime<Utc>> {
        let millis = match self.last_update.as_ref()? {
            Value::String(s) => s.trim().parse::<i64>().ok()?,
            other => other.as_i64()?,
        };
        Utc.timestamp_millis_opt(millis).single()
    }
}

/// Formats a reading value the way the endpoint writes it: integral values
/// without a trailing `.0`, fractional values as-is. No unit conversion.
pub fn number_text(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 {
        format!("{}", value as i64)
    } else {
        format!("{value}")
    }
}

#[test]
fn decodes_a_snapshot_and_ignores_sibling_keys() {
    let body = r#"{
        "Dual_Axis": { "Humidity": 12 },
        "Single_Axis": {
            "Humidity": 47,
            "Temperature": 23.5,
            "RainDetected": 1,
            "RainIntensity": "Heavy",
            "SensorStatus": "OK",
            "LastUpdate": "1700000000000",
            "FirmwareRev": 3
        }
    }"#;

    let snapshot: RtdbSnapshot = serde_json::from_str(body).unwrap();
    let reading = snapshot.single_axis.unwrap();

    assert_eq!(reading.humidity, Some(47.0));
    assert_eq!(reading.temperature, Some(23.5));
    assert!(reading.is_raining());
    assert_eq!(reading.rain_intensity_text(), "Heavy");
    assert!(reading.status_is_ok());
    assert_eq!(
        reading.last_update_utc().unwrap().timestamp_millis(),
        1_700_000_000_000
    );
}

#[test]
fn an_empty_document_has_no_reading() {
    let snapshot: RtdbSnapshot = serde_json::from_str("{}").unwrap();
    assert!(snapshot.single_axis.is_none());
}

#[test]
fn a_bare_sensor_object_decodes_with_every_field_absent() {
    let snapshot: RtdbSnapshot = serde_json::from_str(r#"{"Single_Axis": {}}"#).unwrap();
    let reading = snapshot.single_axis.unwrap();

    assert_eq!(reading, SensorReading::default());
    assert!(!reading.is_raining());
    assert!(!reading.status_is_ok());
    assert!(reading.last_update_utc().is_none());
    assert_eq!(reading.rain_intensity_text(), "");
}

#[test]
fn rain_is_detected_only_for_the_number_one() {
    let with = |value: Value| SensorReading {
        rain_detected: Some(value),
        ..Default::default()
    };

    assert!(with(Value::from(1)).is_raining());
    assert!(with(Value::from(1.0)).is_raining());

    assert!(!with(Value::from(0)).is_raining());
    assert!(!with(Value::from(2)).is_raining());
    assert!(!with(Value::from("1")).is_raining());
    assert!(!with(Value::from(true)).is_raining());
    assert!(!SensorReading::default().is_raining());
}

#[test]
fn last_update_tolerates_both_encodings_and_rejects_garbage() {
    let with = |value: Value| SensorReading {
        last_update: Some(value),
        ..Default::default()
    };

    let as_string = with(Value::from("1700000000000"));
    let as_number = with(Value::from(1_700_000_000_000_i64));
    assert_eq!(
        as_string.last_update_utc().unwrap().timestamp_millis(),
        1_700_000_000_000
    );
    assert_eq!(as_string.last_update_utc(), as_number.last_update_utc());

    assert!(with(Value::from("yesterday")).last_update_utc().is_none());
    assert!(with(Value::from(true)).last_update_utc().is_none());
}

#[test]
fn numbers_render_without_a_spurious_decimal_point() {
    assert_eq!(number_text(47.0), "47");
    assert_eq!(number_text(23.5), "23.5");
    assert_eq!(number_text(-4.0), "-4");
}
