// Data model shared between ingest and the gateways
mod point;
mod reading;

pub use point::{
    BucketDescriptor, FieldValue, TimeSeriesPoint, BOHUMIN_TAG, TEMPERATURE_MEASUREMENT,
    TEMPERATURE_TAG_KEY, VALUE_FIELD,
};
pub use reading::TemperatureReading;
