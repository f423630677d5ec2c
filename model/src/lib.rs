//! Data and presentation model for the single-axis solar monitor widget.
//!
//! `reading` holds the wire entity as published by the realtime database,
//! `view` holds the loading/error/no-data/data state machine and the
//! formatting the renderer displays.

pub mod reading;
pub mod view;

pub use reading::{RtdbSnapshot, SensorReading};
pub use view::ViewState;
