use serde::{Deserialize, Serialize};

/// One reading as it appears in the XML temperature document.
///
/// All fields are kept as text; validation happens when the reading is
/// normalized into a [`crate::TimeSeriesPoint`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemperatureReading {
    pub date: String,
    pub time: String,
    pub value: String,
}

impl TemperatureReading {
    pub fn new(date: impl Into<String>, time: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            date: date.into(),
            time: time.into(),
            value: value.into(),
        }
    }

    /// Date and time joined the way the timestamp is parsed: `"<date> <time>"`.
    pub fn datetime_text(&self) -> String {
        format!("{} {}", self.date.trim(), self.time.trim())
    }
}
