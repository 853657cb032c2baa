//! InfluxDB v2 API abstraction.
//!
//! [`InfluxApi`] covers the handful of endpoints the gateway needs. The
//! production implementation is [`HttpInfluxApi`]; [`MockInfluxApi`] keeps
//! organizations, buckets and writes in memory for tests.

mod http;
mod mock;

pub use http::HttpInfluxApi;
pub use mock::{MockInfluxApi, MockOperation, WriteRequest};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thermograph_shared::BucketDescriptor;

use crate::errors::Result;

/// Timestamp precision declared on a write request. Points carry
/// millisecond timestamps, so that is the only precision written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WritePrecision {
    Milliseconds,
}

impl WritePrecision {
    /// Value of the `precision` query parameter.
    pub fn as_str(&self) -> &'static str {
        match self {
            WritePrecision::Milliseconds => "ms",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Organization {
    pub id: String,
    pub name: String,
}

/// A bucket as returned by the server. Members the gateway does not use are
/// kept in `extra` so the bucket can be echoed back in full.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bucket {
    pub id: String,
    #[serde(rename = "orgID")]
    pub org_id: String,
    pub name: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Bucket {
    pub fn descriptor(&self) -> BucketDescriptor {
        BucketDescriptor::new(&self.org_id, &self.name)
    }

    /// The bucket as JSON without its `links` member.
    pub fn to_json_without_links(&self) -> Value {
        let mut value = serde_json::to_value(self).unwrap_or(Value::Null);
        if let Value::Object(map) = &mut value {
            map.remove("links");
        }
        value
    }
}

/// Abstracts the InfluxDB v2 HTTP API.
///
/// Implementations report every non-success response as
/// [`crate::InfluxError::Http`] so callers can branch on the status code.
#[async_trait]
pub trait InfluxApi: Send + Sync {
    /// Organizations matching `name`.
    async fn find_organizations(&self, name: &str) -> Result<Vec<Organization>>;

    /// Buckets of organization `org_id` named `name`.
    async fn find_buckets(&self, org_id: &str, name: &str) -> Result<Vec<Bucket>>;

    async fn create_bucket(&self, descriptor: &BucketDescriptor) -> Result<Bucket>;

    /// Write line protocol `lines` to `bucket` of `org`.
    async fn write(
        &self,
        org: &str,
        bucket: &str,
        precision: WritePrecision,
        lines: &[String],
    ) -> Result<()>;

    /// Run a Flux query and return the raw annotated-CSV response.
    async fn query(&self, org: &str, flux: &str) -> Result<String>;

    /// Liveness check.
    async fn ping(&self) -> Result<()>;
}
