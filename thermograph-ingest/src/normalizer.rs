// Temperature record normalization
use chrono::{Local, NaiveDateTime, TimeZone};
use thermograph_shared::{TemperatureReading, TimeSeriesPoint};

use crate::errors::IngestError;

/// Layouts accepted for `"<date> <time>"`, tried in order.
const DATETIME_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%d %H:%M"];

/// Normalize readings into points, interpreting timestamps in local time.
///
/// The batch is all-or-nothing: the first invalid reading aborts it and the
/// error carries that reading's index.
pub fn normalize(readings: &[TemperatureReading]) -> Result<Vec<TimeSeriesPoint>, IngestError> {
    normalize_in(readings, &Local)
}

/// Normalize readings into points, interpreting timestamps in `tz`.
pub fn normalize_in<Tz: TimeZone>(
    readings: &[TemperatureReading],
    tz: &Tz,
) -> Result<Vec<TimeSeriesPoint>, IngestError> {
    readings
        .iter()
        .enumerate()
        .map(|(index, reading)| normalize_reading(index, reading, tz))
        .collect()
}

/// Normalize a single reading; `index` is only used for error reporting.
pub fn normalize_reading<Tz: TimeZone>(
    index: usize,
    reading: &TemperatureReading,
    tz: &Tz,
) -> Result<TimeSeriesPoint, IngestError> {
    let value = parse_value(&reading.value)
        .ok_or_else(|| IngestError::invalid_value(index, &reading.value))?;

    let datetime = reading.datetime_text();
    let timestamp = parse_local_millis(&datetime, tz)
        .ok_or_else(|| IngestError::invalid_timestamp(index, &datetime))?;

    Ok(TimeSeriesPoint::temperature(value, timestamp))
}

fn parse_value(text: &str) -> Option<f64> {
    text.trim().parse::<f64>().ok().filter(|value| value.is_finite())
}

/// Milliseconds since the epoch for a wall-clock time in `tz`.
///
/// A time repeated by a DST fold resolves to its earliest instant; a time
/// skipped by a DST gap does not exist and yields `None`.
fn parse_local_millis<Tz: TimeZone>(text: &str, tz: &Tz) -> Option<i64> {
    let naive = DATETIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(text, format).ok())?;

    tz.from_local_datetime(&naive)
        .earliest()
        .map(|datetime| datetime.timestamp_millis())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, Utc};
    use chrono_tz::Europe::Prague;
    use thermograph_shared::FieldValue;

    #[test]
    fn test_normalize_single_reading_utc() {
        let readings = vec![TemperatureReading::new("2023-09-14", "12:00:00", "21.5")];

        let points = normalize_in(&readings, &Utc).unwrap();

        assert_eq!(points.len(), 1);
        assert_eq!(points[0].timestamp_millis, 1_694_692_800_000);
        assert_eq!(points[0].field_value("value"), Some(&FieldValue::Float(21.5)));
        assert_eq!(points[0].tag_value("temperature"), Some("Bohumin"));
    }

    #[test]
    fn test_offset_shifts_timestamp() {
        let prague_summer = FixedOffset::east_opt(2 * 3600).unwrap();
        let readings = vec![TemperatureReading::new("2023-09-14", "12:00:00", "21.5")];

        let points = normalize_in(&readings, &prague_summer).unwrap();

        assert_eq!(points[0].timestamp_millis, 1_694_692_800_000 - 2 * 3_600_000);
    }

    #[test]
    fn test_minutes_only_and_fraction() {
        let readings = vec![
            TemperatureReading::new("2023-09-14", "12:00", "1"),
            TemperatureReading::new("2023-09-14", "12:00:00.250", "2"),
        ];

        let points = normalize_in(&readings, &Utc).unwrap();

        assert_eq!(points[0].timestamp_millis, 1_694_692_800_000);
        assert_eq!(points[1].timestamp_millis, 1_694_692_800_250);
    }

    #[test]
    fn test_rejects_non_numeric_value() {
        let readings = vec![
            TemperatureReading::new("2023-09-14", "12:00:00", "21.5"),
            TemperatureReading::new("2023-09-14", "13:00:00", "warm"),
        ];

        let err = normalize_in(&readings, &Utc).unwrap_err();

        assert!(matches!(err, IngestError::InvalidValue { index: 1, .. }));
    }

    #[test]
    fn test_rejects_non_finite_value() {
        for value in ["NaN", "inf", "-infinity", ""] {
            let readings = vec![TemperatureReading::new("2023-09-14", "12:00:00", value)];
            assert!(
                normalize_in(&readings, &Utc).is_err(),
                "{value:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_rejects_invalid_calendar_date() {
        let readings = vec![TemperatureReading::new("2023-02-30", "12:00:00", "1.0")];

        let err = normalize_in(&readings, &Utc).unwrap_err();

        assert!(matches!(err, IngestError::InvalidTimestamp { index: 0, .. }));
    }

    #[test]
    fn test_rejects_time_skipped_by_spring_forward() {
        let readings = vec![TemperatureReading::new("2023-03-26", "02:30:00", "4.0")];

        let err = normalize_in(&readings, &Prague).unwrap_err();

        assert!(matches!(err, IngestError::InvalidTimestamp { index: 0, .. }));
    }

    #[test]
    fn test_repeated_fall_back_time_takes_earliest_instant() {
        let readings = vec![TemperatureReading::new("2023-10-29", "02:30:00", "9.5")];

        let points = normalize_in(&readings, &Prague).unwrap();

        // 00:30 UTC, still on summer time
        assert_eq!(points[0].timestamp_millis, 1_698_539_400_000);
    }
}
