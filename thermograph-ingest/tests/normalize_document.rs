//! End-to-end tests: XML document on disk to time-series points.

use std::io::Write;

use chrono::{Local, NaiveDate, TimeZone};
use thermograph_ingest::{normalize, parse_document, read_document, IngestError};
use thermograph_shared::{FieldValue, TemperatureReading};

fn document(readings: &[(&str, &str, &str)]) -> String {
    let body: String = readings
        .iter()
        .map(|(date, time, value)| {
            format!(
                "<teplota><datum>{date}</datum><cas>{time}</cas><hodnota>{value}</hodnota></teplota>"
            )
        })
        .collect();
    format!("<teploty>{body}</teploty>")
}

#[test]
fn reads_and_normalizes_a_file() {
    let xml = document(&[
        ("2023-09-14", "12:00:00", "21.5"),
        ("2023-09-14", "12:30:00", "21.9"),
        ("2023-09-14", "13:00:00", "22.4"),
    ]);
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(xml.as_bytes()).unwrap();

    let readings = read_document(file.path()).unwrap();
    let points = normalize(&readings).unwrap();

    assert_eq!(points.len(), readings.len());
    let values: Vec<f64> = points
        .iter()
        .filter_map(|p| p.field_value("value").and_then(FieldValue::as_f64))
        .collect();
    assert_eq!(values, vec![21.5, 21.9, 22.4]);
    assert!(points
        .windows(2)
        .all(|pair| pair[0].timestamp_millis < pair[1].timestamp_millis));
}

#[test]
fn normalizes_in_local_time() {
    let readings = vec![TemperatureReading::new("2023-09-14", "12:00:00", "21.5")];

    let points = normalize(&readings).unwrap();

    let expected = Local
        .from_local_datetime(
            &NaiveDate::from_ymd_opt(2023, 9, 14)
                .unwrap()
                .and_hms_opt(12, 0, 0)
                .unwrap(),
        )
        .earliest()
        .unwrap()
        .timestamp_millis();
    assert_eq!(points.len(), 1);
    assert_eq!(points[0].measurement, "temperature");
    assert_eq!(points[0].tag_value("temperature"), Some("Bohumin"));
    assert_eq!(points[0].field_value("value"), Some(&FieldValue::Float(21.5)));
    assert_eq!(points[0].timestamp_millis, expected);
}

#[test]
fn preserves_order_for_unsorted_input() {
    let readings = parse_document(&document(&[
        ("2023-09-15", "08:00:00", "3"),
        ("2023-09-14", "08:00:00", "1"),
        ("2023-09-16", "08:00:00", "2"),
    ]))
    .unwrap();

    let points = normalize(&readings).unwrap();

    let values: Vec<f64> = points
        .iter()
        .filter_map(|p| p.field_value("value").and_then(FieldValue::as_f64))
        .collect();
    assert_eq!(values, vec![3.0, 1.0, 2.0]);
}

#[test]
fn a_bad_value_aborts_the_batch() {
    let readings = parse_document(&document(&[
        ("2023-09-14", "12:00:00", "21.5"),
        ("2023-09-14", "13:00:00", "21,7"),
    ]))
    .unwrap();

    let err = normalize(&readings).unwrap_err();

    assert_eq!(err.reading_index(), Some(1));
    assert!(matches!(err, IngestError::InvalidValue { .. }));
}

#[test]
fn missing_file_is_an_io_error() {
    let err = read_document("/nonexistent/teploty.xml").unwrap_err();
    assert!(matches!(err, IngestError::Io { .. }));
}
