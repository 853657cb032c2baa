//! Flux query construction and annotated-CSV result decoding.
//!
//! The query endpoint answers with one CSV block per result table. Each block
//! starts with annotation rows (`#datatype`, `#group`, `#default`), followed
//! by a header row and the data rows. The first column is reserved for
//! annotations and is empty in header and data rows.

use std::fmt;

use chrono::SecondsFormat;
use serde_json::{Map, Number, Value};

use crate::config::TimeRange;
use crate::errors::{InfluxError, Result};

/// One row of a Flux result, columns in the order the server projected them.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FluxRecord {
    columns: Vec<(String, Value)>,
}

impl FluxRecord {
    pub fn new(columns: Vec<(String, Value)>) -> Self {
        Self { columns }
    }

    pub fn get(&self, column: &str) -> Option<&Value> {
        self.columns
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, value)| value)
    }

    pub fn columns(&self) -> &[(String, Value)] {
        &self.columns
    }

    /// The row as a JSON object keyed by column name.
    pub fn to_json(&self) -> Value {
        let map: Map<String, Value> = self.columns.iter().cloned().collect();
        Value::Object(map)
    }
}

impl fmt::Display for FluxRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_json())
    }
}

/// Quote a value as a Flux string literal.
pub fn string_literal(value: &str) -> String {
    let escaped = value
        .replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace("${", "\\${");
    format!("\"{}\"", escaped)
}

/// `from(bucket: ...) |> range(start: ..., stop: ...)` over `range`.
pub fn range_query(bucket: &str, range: &TimeRange) -> String {
    format!(
        "from(bucket: {}) |> range(start: {}, stop: {})",
        string_literal(bucket),
        range.start.to_rfc3339_opts(SecondsFormat::Millis, true),
        range.stop.to_rfc3339_opts(SecondsFormat::Millis, true),
    )
}

/// Decode an annotated-CSV query response into rows, in server order.
///
/// The whole body goes through one CSV reader so quoted values may span
/// lines, blank ones included. A new table starts at the first annotation
/// row after a header.
///
/// An error table (columns `error` and `reference`) becomes
/// [`InfluxError::Query`].
pub fn parse_annotated_csv(body: &str) -> Result<Vec<FluxRecord>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(body.as_bytes());

    let mut records = Vec::new();
    let mut table = Table::default();

    for row in reader.records() {
        let row = row?;
        let first = row.get(0).unwrap_or_default();

        if first.starts_with('#') {
            if table.header.is_some() {
                table = Table::default();
            }
            table.annotate(first, &row);
            continue;
        }

        if table.header.is_none() {
            table.header = Some(row.iter().map(str::to_string).collect());
            continue;
        }

        records.push(table.record(&row)?);
    }

    Ok(records)
}

/// Annotations and header of the table currently being read.
#[derive(Default)]
struct Table {
    datatypes: Option<Vec<String>>,
    defaults: Option<Vec<String>>,
    header: Option<Vec<String>>,
}

impl Table {
    fn annotate(&mut self, kind: &str, row: &csv::StringRecord) {
        let values = Some(row.iter().map(str::to_string).collect());
        match kind {
            "#datatype" => self.datatypes = values,
            "#default" => self.defaults = values,
            _ => {}
        }
    }

    fn record(&self, row: &csv::StringRecord) -> Result<FluxRecord> {
        let columns = self.header.as_deref().unwrap_or_default();

        if is_error_table(columns) {
            let message = column_value(columns, row, "error").unwrap_or("unknown query error");
            return Err(InfluxError::query(message));
        }

        let mut values = Vec::with_capacity(columns.len());
        for (index, name) in columns.iter().enumerate() {
            if name.is_empty() {
                continue;
            }
            let raw = match row.get(index).unwrap_or_default() {
                "" => annotation(&self.defaults, index).unwrap_or_default(),
                value => value,
            };
            let datatype = annotation(&self.datatypes, index).unwrap_or("string");
            values.push((name.clone(), typed_value(datatype, raw)));
        }
        Ok(FluxRecord::new(values))
    }
}

fn annotation(row: &Option<Vec<String>>, index: usize) -> Option<&str> {
    row.as_ref()
        .and_then(|values| values.get(index))
        .map(String::as_str)
}

fn is_error_table(columns: &[String]) -> bool {
    columns.iter().any(|c| c == "error") && columns.iter().any(|c| c == "reference")
}

fn column_value<'r>(columns: &[String], row: &'r csv::StringRecord, name: &str) -> Option<&'r str> {
    let index = columns.iter().position(|c| c == name)?;
    row.get(index).filter(|v| !v.is_empty())
}

/// Convert a raw CSV cell according to its `#datatype` annotation.
fn typed_value(datatype: &str, raw: &str) -> Value {
    if raw.is_empty() {
        return Value::Null;
    }

    let parsed = match datatype {
        "double" => raw
            .parse::<f64>()
            .ok()
            .and_then(Number::from_f64)
            .map(Value::Number),
        "long" => raw.parse::<i64>().ok().map(Value::from),
        "unsignedLong" => raw.parse::<u64>().ok().map(Value::from),
        "boolean" => raw.parse::<bool>().ok().map(Value::Bool),
        _ => None,
    };

    parsed.unwrap_or_else(|| Value::String(raw.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    const RESPONSE: &str = "#datatype,string,long,dateTime:RFC3339,dateTime:RFC3339,dateTime:RFC3339,double,string,string,string\r\n\
#group,false,false,true,true,false,false,true,true,true\r\n\
#default,_result,,,,,,,,\r\n\
,result,table,_start,_stop,_time,_value,_field,_measurement,temperature\r\n\
,,0,2023-09-14T12:00:00Z,2023-09-14T23:00:00Z,2023-09-14T12:00:00Z,21.5,value,temperature,Bohumin\r\n\
,,0,2023-09-14T12:00:00Z,2023-09-14T23:00:00Z,2023-09-14T13:00:00Z,22,value,temperature,Bohumin\r\n\
\r\n";

    #[test]
    fn test_parse_rows_with_types() {
        let records = parse_annotated_csv(RESPONSE).unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].get("_value"), Some(&Value::from(21.5)));
        assert_eq!(records[0].get("table"), Some(&Value::from(0)));
        assert_eq!(records[1].get("_time"), Some(&Value::from("2023-09-14T13:00:00Z")));
        assert_eq!(records[1].get("temperature"), Some(&Value::from("Bohumin")));
        assert_eq!(records[0].get("result"), Some(&Value::from("_result")));
        assert_eq!(records[0].columns()[0].0, "result");
    }

    #[test]
    fn test_multiple_tables_with_own_headers() {
        let body = "#datatype,string,long,long\n#group,false,false,false\n#default,_result,,\n\
,result,table,_value\n,,0,1\n\n\
#datatype,string,long,long,string\n#group,false,false,false,true\n#default,_result,,,\n\
,result,table,_value,host\n,,1,2,a\n";

        let records = parse_annotated_csv(body).unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].get("_value"), Some(&Value::from(1)));
        assert_eq!(records[0].get("host"), None);
        assert_eq!(records[1].get("host"), Some(&Value::from("a")));
        assert_eq!(records[1].get("table"), Some(&Value::from(1)));
    }

    #[test]
    fn test_quoted_value_spanning_blank_line() {
        let body = "#datatype,string,long,string\n#group,false,false,false\n#default,_result,,\n\
,result,table,_value\n,,0,\"line one\n\nline three\"\n,,0,next\n";

        let records = parse_annotated_csv(body).unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(
            records[0].get("_value"),
            Some(&Value::from("line one\n\nline three"))
        );
        assert_eq!(records[1].get("_value"), Some(&Value::from("next")));
        assert_eq!(records[1].get("result"), Some(&Value::from("_result")));
    }

    #[test]
    fn test_error_table() {
        let body = "#datatype,string,string\n#group,true,true\n#default,,\n,error,reference\n,\"bucket not found\",\n";

        let err = parse_annotated_csv(body).unwrap_err();
        assert!(matches!(err, InfluxError::Query(ref m) if m == "bucket not found"));
    }

    #[test]
    fn test_empty_response() {
        assert!(parse_annotated_csv("\r\n").unwrap().is_empty());
    }

    #[test]
    fn test_range_query_escapes_bucket() {
        let range = TimeRange::new(
            Utc.with_ymd_and_hms(2023, 9, 14, 12, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2023, 9, 14, 23, 0, 0).unwrap(),
        );

        assert_eq!(
            range_query("my \"bucket\"", &range),
            "from(bucket: \"my \\\"bucket\\\"\") |> range(start: 2023-09-14T12:00:00.000Z, stop: 2023-09-14T23:00:00.000Z)"
        );
    }

    #[test]
    fn test_record_display_is_json() {
        let record = FluxRecord::new(vec![("_value".into(), Value::from(1.5))]);
        assert_eq!(record.to_string(), "{\"_value\":1.5}");
    }
}
