//! InfluxDB line protocol encoding.
//!
//! ```text
//! measurement,tag1=val1,tag2=val2 field1=val1,field2=val2 timestamp
//! ```
//!
//! Timestamps are written as-is; the write request declares their precision.

use thermograph_shared::{FieldValue, TimeSeriesPoint};

/// Encode one point. Tags are sorted by key for the canonical form.
///
/// A point without fields is not representable in line protocol and yields
/// `None`.
pub fn encode_point(point: &TimeSeriesPoint) -> Option<String> {
    if point.fields.is_empty() {
        return None;
    }

    let mut line = escape_measurement(&point.measurement);

    let mut sorted_tags: Vec<_> = point.tags.iter().collect();
    sorted_tags.sort_by(|(a, _), (b, _)| a.cmp(b));
    for (key, value) in sorted_tags {
        line.push(',');
        line.push_str(&escape_key(key));
        line.push('=');
        line.push_str(&escape_key(value));
    }

    line.push(' ');
    let fields: Vec<String> = point
        .fields
        .iter()
        .map(|(name, value)| format!("{}={}", escape_key(name), encode_field_value(value)))
        .collect();
    line.push_str(&fields.join(","));

    line.push(' ');
    line.push_str(&point.timestamp_millis.to_string());

    Some(line)
}

/// Encode every point that has at least one field, in order.
pub fn encode_points(points: &[TimeSeriesPoint]) -> Vec<String> {
    points.iter().filter_map(encode_point).collect()
}

fn encode_field_value(value: &FieldValue) -> String {
    match value {
        FieldValue::Float(v) => format!("{}", v),
        FieldValue::Integer(v) => format!("{}i", v),
        FieldValue::Boolean(v) => v.to_string(),
        FieldValue::String(v) => {
            let escaped = v.replace('\\', "\\\\").replace('"', "\\\"");
            format!("\"{}\"", escaped)
        }
    }
}

/// Measurements escape commas and spaces.
fn escape_measurement(s: &str) -> String {
    s.replace(',', "\\,").replace(' ', "\\ ")
}

/// Tag keys, tag values and field keys escape commas, equals signs and spaces.
fn escape_key(s: &str) -> String {
    s.replace(',', "\\,")
        .replace('=', "\\=")
        .replace(' ', "\\ ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_temperature_point() {
        let point = TimeSeriesPoint::temperature(21.5, 1_694_692_800_000);
        assert_eq!(
            encode_point(&point).unwrap(),
            "temperature,temperature=Bohumin value=21.5 1694692800000"
        );
    }

    #[test]
    fn test_tags_sorted_and_escaped() {
        let point = TimeSeriesPoint::new("room temp", 5)
            .tag("zone", "north,east")
            .tag("a=b", "x y")
            .field("count", FieldValue::Integer(3))
            .field("ok", FieldValue::Boolean(true));

        assert_eq!(
            encode_point(&point).unwrap(),
            "room\\ temp,a\\=b=x\\ y,zone=north\\,east count=3i,ok=true 5"
        );
    }

    #[test]
    fn test_string_field_quoted() {
        let point =
            TimeSeriesPoint::new("m", 1).field("note", FieldValue::String("say \"hi\"".into()));
        assert_eq!(encode_point(&point).unwrap(), "m note=\"say \\\"hi\\\"\" 1");
    }

    #[test]
    fn test_point_without_fields_skipped() {
        let points = vec![
            TimeSeriesPoint::new("empty", 1),
            TimeSeriesPoint::temperature(-3.25, 2),
        ];
        assert_eq!(
            encode_points(&points),
            vec!["temperature,temperature=Bohumin value=-3.25 2"]
        );
    }
}
