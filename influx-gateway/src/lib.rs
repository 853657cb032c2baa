//! InfluxDB gateway for thermograph.
//!
//! This crate provides:
//! - [`InfluxGateway`]: bucket provisioning, point writes, Flux queries and ping
//! - [`InfluxApi`] trait abstracting the InfluxDB v2 HTTP API
//! - [`HttpInfluxApi`] production client built on `reqwest`
//! - [`MockInfluxApi`] in-memory server for tests
//! - line protocol encoding and annotated-CSV decoding of Flux results
//!
//! ## Usage
//!
//! ```ignore
//! use influx_gateway::{InfluxConfig, InfluxGateway};
//!
//! let config = InfluxConfig::new("http://localhost:8086", "token", "my-org");
//! let gateway = InfluxGateway::new(config, logger)?;
//!
//! gateway.create_bucket_if_absent("teploty").await?;
//! gateway.write_points("teploty", &points).await?;
//! gateway.ping().await;
//! ```

pub mod api;
pub mod config;
pub mod errors;
pub mod flux;
pub mod gateway;
pub mod line_protocol;

pub use api::{
    Bucket, HttpInfluxApi, InfluxApi, MockInfluxApi, MockOperation, Organization, WritePrecision,
    WriteRequest,
};
pub use config::{InfluxConfig, TimeRange, WRITE_BATCH_SIZE};
pub use errors::{InfluxError, Result};
pub use flux::{parse_annotated_csv, range_query, FluxRecord};
pub use gateway::InfluxGateway;
pub use line_protocol::{encode_point, encode_points};
