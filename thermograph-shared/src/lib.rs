//! # Thermograph Shared
//!
//! Types shared by the thermograph crates:
//! - [`Logger`]: the status-line sink every gateway reports through
//! - [`Outcome`]: the result of a best-effort operation
//! - the temperature reading and time-series point data model

pub mod logger;
pub mod outcome;
pub mod types;

pub use logger::{ConsoleLogger, Logger, RecordingLogger, Status};
pub use outcome::{Outcome, Recovery, RecoveryKind};
pub use types::{
    BucketDescriptor, FieldValue, TemperatureReading, TimeSeriesPoint, BOHUMIN_TAG,
    TEMPERATURE_MEASUREMENT, TEMPERATURE_TAG_KEY, VALUE_FIELD,
};
