use std::sync::Arc;

use influx_gateway::{
    InfluxConfig, InfluxGateway, MockInfluxApi, MockOperation, TimeRange, WritePrecision,
    WRITE_BATCH_SIZE,
};
use serde_json::Value;
use thermograph_shared::{RecordingLogger, RecoveryKind, Status, TimeSeriesPoint};

const QUERY_RESPONSE: &str = "#datatype,string,long,dateTime:RFC3339,double,string,string,string\r\n\
#group,false,false,false,false,true,true,true\r\n\
#default,_result,,,,,,\r\n\
,result,table,_time,_value,_field,_measurement,temperature\r\n\
,,0,2023-09-14T12:00:00Z,21.5,value,temperature,Bohumin\r\n\
,,0,2023-09-14T13:00:00Z,22.1,value,temperature,Bohumin\r\n\
\r\n";

fn setup(api: MockInfluxApi) -> (InfluxGateway, Arc<MockInfluxApi>, Arc<RecordingLogger>) {
    let api = Arc::new(api);
    let logger = Arc::new(RecordingLogger::new());
    let config = InfluxConfig::new("http://localhost:8086", "dummy-token", "dummy-organization");
    let gateway = InfluxGateway::with_api(config, api.clone(), logger.clone());
    (gateway, api, logger)
}

fn with_org() -> MockInfluxApi {
    MockInfluxApi::new().with_organization("0123456789abcdef", "dummy-organization")
}

#[tokio::test]
async fn test_create_bucket_twice_creates_one_bucket() {
    let (gateway, api, logger) = setup(with_org());

    let first = gateway.create_bucket_if_absent("dummy-bucket").await.unwrap();
    let second = gateway.create_bucket_if_absent("dummy-bucket").await.unwrap();

    assert!(first.is_completed());
    assert!(second.is_completed());
    assert_eq!(api.buckets().len(), 1);
    assert!(logger.contains("Bucket named \"dummy-bucket\" already exists"));
    assert_eq!(
        logger
            .entries()
            .iter()
            .filter(|(_, text)| text == "Create Bucket dummy-bucket")
            .count(),
        1
    );
}

#[tokio::test]
async fn test_create_bucket_log_sequence() {
    let (gateway, _, logger) = setup(with_org());

    assert!(gateway
        .create_bucket_if_absent("dummy-bucket")
        .await
        .unwrap()
        .is_completed());

    let lines = logger.lines();
    assert_eq!(
        lines[0],
        "[+] Using organization \"dummy-organization\" identified by \"0123456789abcdef\""
    );
    assert_eq!(lines[1], "[+] Bucket not found");
    assert_eq!(lines[2], "[+] Create Bucket dummy-bucket");
    assert!(lines[3].starts_with("[+] {"));
}

#[tokio::test]
async fn test_bucket_exists_is_false_on_404() {
    let (gateway, _, _) = setup(with_org());

    assert!(!gateway
        .bucket_exists("0123456789abcdef", "nope")
        .await
        .unwrap());
}

#[tokio::test]
async fn test_write_points_batches_with_millisecond_precision() {
    let (gateway, api, logger) = setup(with_org());
    let points: Vec<TimeSeriesPoint> = (0..WRITE_BATCH_SIZE as i64 + 5)
        .map(|i| TimeSeriesPoint::temperature(20.0 + i as f64 / 10.0, 1_694_692_800_000 + i))
        .collect();

    let outcome = gateway.write_points("dummy-bucket", &points).await.unwrap();

    assert_eq!(outcome.completed(), Some(WRITE_BATCH_SIZE + 5));
    let writes = api.writes();
    assert_eq!(writes.len(), 2);
    assert_eq!(writes[0].lines.len(), WRITE_BATCH_SIZE);
    assert_eq!(writes[1].lines.len(), 5);
    assert!(writes
        .iter()
        .all(|w| w.precision == WritePrecision::Milliseconds && w.bucket == "dummy-bucket"));
    assert_eq!(
        api.written_lines()[0],
        "temperature,temperature=Bohumin value=20 1694692800000"
    );
    assert_eq!(logger.count(Status::Error), 0);
}

#[tokio::test]
async fn test_write_unauthorized_is_absorbed() {
    let (gateway, api, logger) = setup(with_org());
    api.fail(MockOperation::Write, 401, "unauthorized access");

    let outcome = gateway
        .write_points("dummy-bucket", &[TimeSeriesPoint::temperature(21.5, 1)])
        .await
        .unwrap();

    assert_eq!(
        outcome.recovery().map(|r| r.kind),
        Some(RecoveryKind::Unauthorized)
    );
    assert!(logger.contains("InfluxDB credentials not configured"));
}

#[tokio::test]
async fn test_write_other_errors_propagate() {
    let (gateway, api, _) = setup(with_org());
    api.fail(MockOperation::Write, 500, "internal error");

    let result = gateway
        .write_points("dummy-bucket", &[TimeSeriesPoint::temperature(21.5, 1)])
        .await;

    assert_eq!(result.unwrap_err().status(), Some(500));
}

#[tokio::test]
async fn test_query_temperatures_returns_rows_in_order() {
    let (gateway, api, logger) = setup(with_org().with_query_response(QUERY_RESPONSE));

    let records = gateway
        .query_temperatures("dummy-bucket", &TimeRange::default())
        .await
        .unwrap();

    assert_eq!(records.len(), 2);
    assert_eq!(records[0].get("_value"), Some(&Value::from(21.5)));
    assert_eq!(records[1].get("_value"), Some(&Value::from(22.1)));

    let flux = &api.queries()[0];
    assert_eq!(
        flux,
        "from(bucket: \"dummy-bucket\") |> range(start: 2023-09-14T12:00:00.000Z, stop: 2023-09-14T23:00:00.000Z)"
    );
    assert_eq!(logger.lines()[0], format!("[+] Querying data with {}", flux));
    assert_eq!(logger.lines().last().unwrap(), "[+] Query completed");
}

#[tokio::test]
async fn test_ping_never_fails() {
    let (gateway, api, logger) = setup(MockInfluxApi::new());

    gateway.ping().await;
    api.fail(MockOperation::Ping, 503, "unavailable");
    gateway.ping().await;

    assert_eq!(
        logger.lines(),
        vec![
            "[+] Ping Pong SUCCESS".to_string(),
            "[!] Ping Pong ERROR HTTP 503: unavailable".to_string(),
        ]
    );
}
