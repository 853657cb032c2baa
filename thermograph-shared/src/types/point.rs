use serde::{Deserialize, Serialize};

/// Measurement name of every temperature point.
pub const TEMPERATURE_MEASUREMENT: &str = "temperature";
/// Tag key attached to every temperature point.
pub const TEMPERATURE_TAG_KEY: &str = "temperature";
/// Tag value attached to every temperature point. Hard-coded: every reading
/// comes from the Bohumin station.
pub const BOHUMIN_TAG: &str = "Bohumin";
/// Field holding the measured value.
pub const VALUE_FIELD: &str = "value";

/// A value that can be stored in a point field.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Float(f64),
    Integer(i64),
    Boolean(bool),
    String(String),
}

impl FieldValue {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            FieldValue::Float(v) => Some(*v),
            FieldValue::Integer(v) => Some(*v as f64),
            _ => None,
        }
    }
}

/// One time-stamped measurement ready for time-series storage.
///
/// Points have no identity beyond their fields; the database is the only
/// store of record.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeSeriesPoint {
    pub measurement: String,
    pub tags: Vec<(String, String)>,
    pub fields: Vec<(String, FieldValue)>,
    /// Milliseconds since the Unix epoch.
    pub timestamp_millis: i64,
}

impl TimeSeriesPoint {
    pub fn new(measurement: impl Into<String>, timestamp_millis: i64) -> Self {
        Self {
            measurement: measurement.into(),
            tags: Vec::new(),
            fields: Vec::new(),
            timestamp_millis,
        }
    }

    /// The point produced for one temperature reading.
    pub fn temperature(value: f64, timestamp_millis: i64) -> Self {
        Self::new(TEMPERATURE_MEASUREMENT, timestamp_millis)
            .tag(TEMPERATURE_TAG_KEY, BOHUMIN_TAG)
            .float_field(VALUE_FIELD, value)
    }

    pub fn tag(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.tags.push((key.into(), value.into()));
        self
    }

    pub fn float_field(self, name: impl Into<String>, value: f64) -> Self {
        self.field(name, FieldValue::Float(value))
    }

    pub fn field(mut self, name: impl Into<String>, value: FieldValue) -> Self {
        self.fields.push((name.into(), value));
        self
    }

    pub fn tag_value(&self, key: &str) -> Option<&str> {
        self.tags
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn field_value(&self, name: &str) -> Option<&FieldValue> {
        self.fields.iter().find(|(k, _)| k == name).map(|(_, v)| v)
    }
}

/// Organization-scoped bucket identity, used to check-then-create a bucket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BucketDescriptor {
    #[serde(rename = "orgID")]
    pub org_id: String,
    pub name: String,
}

impl BucketDescriptor {
    pub fn new(org_id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            org_id: org_id.into(),
            name: name.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_temperature_point_shape() {
        let point = TimeSeriesPoint::temperature(21.5, 1_694_692_800_000);

        assert_eq!(point.measurement, "temperature");
        assert_eq!(point.tag_value("temperature"), Some("Bohumin"));
        assert_eq!(point.field_value("value"), Some(&FieldValue::Float(21.5)));
        assert_eq!(point.timestamp_millis, 1_694_692_800_000);
    }

    #[test]
    fn test_bucket_descriptor_serializes_org_id() {
        let descriptor = BucketDescriptor::new("0a1b", "dummy-bucket");
        let json = serde_json::to_value(&descriptor).unwrap();

        assert_eq!(json["orgID"], "0a1b");
        assert_eq!(json["name"], "dummy-bucket");
    }
}
