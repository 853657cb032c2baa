//! In-memory InfluxDB API for tests.
//!
//! `MockInfluxApi` keeps organizations and buckets in memory, records every
//! write and answers queries with a canned annotated-CSV body. Individual
//! operations can be made to fail with a given HTTP status.
//!
//! # Example
//!
//! ```ignore
//! use influx_gateway::{InfluxApi, MockInfluxApi};
//!
//! let api = MockInfluxApi::new().with_organization("org-1", "my-org");
//! let orgs = api.find_organizations("my-org").await?;
//! assert_eq!(orgs[0].id, "org-1");
//! ```

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use serde_json::{json, Map};
use thermograph_shared::BucketDescriptor;

use super::{Bucket, InfluxApi, Organization, WritePrecision};
use crate::errors::{InfluxError, Result};

/// Operations whose failure can be injected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MockOperation {
    FindOrganizations,
    FindBuckets,
    CreateBucket,
    Write,
    Query,
    Ping,
}

/// A write request as received by the mock.
#[derive(Debug, Clone, PartialEq)]
pub struct WriteRequest {
    pub org: String,
    pub bucket: String,
    pub precision: WritePrecision,
    pub lines: Vec<String>,
}

#[derive(Default)]
struct State {
    organizations: Vec<Organization>,
    buckets: Vec<Bucket>,
    writes: Vec<WriteRequest>,
    queries: Vec<String>,
    query_response: String,
    failures: HashMap<MockOperation, (u16, String)>,
    next_bucket_id: u32,
}

/// Mock InfluxDB API backed by in-memory state.
#[derive(Default)]
pub struct MockInfluxApi {
    state: RwLock<State>,
}

impl MockInfluxApi {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an organization.
    pub fn with_organization(self, id: &str, name: &str) -> Self {
        self.state.write().unwrap().organizations.push(Organization {
            id: id.to_string(),
            name: name.to_string(),
        });
        self
    }

    /// Register an existing bucket.
    pub fn with_bucket(self, org_id: &str, name: &str) -> Self {
        {
            let mut state = self.state.write().unwrap();
            let bucket = new_bucket(&mut state, org_id, name);
            state.buckets.push(bucket);
        }
        self
    }

    /// Body returned by every query.
    pub fn with_query_response(self, body: &str) -> Self {
        self.state.write().unwrap().query_response = body.to_string();
        self
    }

    /// Make `operation` answer with HTTP `status` until cleared.
    pub fn fail(&self, operation: MockOperation, status: u16, message: &str) {
        self.state
            .write()
            .unwrap()
            .failures
            .insert(operation, (status, message.to_string()));
    }

    pub fn clear_failure(&self, operation: MockOperation) {
        self.state.write().unwrap().failures.remove(&operation);
    }

    pub fn buckets(&self) -> Vec<Bucket> {
        self.state.read().unwrap().buckets.clone()
    }

    pub fn writes(&self) -> Vec<WriteRequest> {
        self.state.read().unwrap().writes.clone()
    }

    /// Every line written so far, across requests.
    pub fn written_lines(&self) -> Vec<String> {
        self.state
            .read()
            .unwrap()
            .writes
            .iter()
            .flat_map(|w| w.lines.iter().cloned())
            .collect()
    }

    pub fn queries(&self) -> Vec<String> {
        self.state.read().unwrap().queries.clone()
    }

    fn check(&self, operation: MockOperation) -> Result<()> {
        match self.state.read().unwrap().failures.get(&operation) {
            Some((status, message)) => Err(InfluxError::http(*status, message.clone())),
            None => Ok(()),
        }
    }
}

fn new_bucket(state: &mut State, org_id: &str, name: &str) -> Bucket {
    state.next_bucket_id += 1;
    let id = format!("bucket-{:04}", state.next_bucket_id);

    let mut extra = Map::new();
    extra.insert("type".into(), json!("user"));
    extra.insert("retentionRules".into(), json!([]));
    extra.insert(
        "links".into(),
        json!({ "self": format!("/api/v2/buckets/{}", id) }),
    );

    Bucket {
        id,
        org_id: org_id.to_string(),
        name: name.to_string(),
        extra,
    }
}

#[async_trait]
impl InfluxApi for MockInfluxApi {
    async fn find_organizations(&self, name: &str) -> Result<Vec<Organization>> {
        self.check(MockOperation::FindOrganizations)?;
        let state = self.state.read().unwrap();
        let orgs: Vec<Organization> = state
            .organizations
            .iter()
            .filter(|o| o.name == name)
            .cloned()
            .collect();

        // The server answers an unknown organization name with 404.
        if orgs.is_empty() {
            return Err(InfluxError::http(
                404,
                format!("organization name \"{}\" not found", name),
            ));
        }
        Ok(orgs)
    }

    async fn find_buckets(&self, org_id: &str, name: &str) -> Result<Vec<Bucket>> {
        self.check(MockOperation::FindBuckets)?;
        let state = self.state.read().unwrap();
        let buckets: Vec<Bucket> = state
            .buckets
            .iter()
            .filter(|b| b.org_id == org_id && b.name == name)
            .cloned()
            .collect();

        if buckets.is_empty() {
            return Err(InfluxError::http(
                404,
                format!("bucket \"{}\" not found", name),
            ));
        }
        Ok(buckets)
    }

    async fn create_bucket(&self, descriptor: &BucketDescriptor) -> Result<Bucket> {
        self.check(MockOperation::CreateBucket)?;
        let mut state = self.state.write().unwrap();

        let exists = state
            .buckets
            .iter()
            .any(|b| b.org_id == descriptor.org_id && b.name == descriptor.name);
        if exists {
            return Err(InfluxError::http(
                422,
                format!("bucket with name {} already exists", descriptor.name),
            ));
        }

        let bucket = new_bucket(&mut state, &descriptor.org_id, &descriptor.name);
        state.buckets.push(bucket.clone());
        Ok(bucket)
    }

    async fn write(
        &self,
        org: &str,
        bucket: &str,
        precision: WritePrecision,
        lines: &[String],
    ) -> Result<()> {
        self.check(MockOperation::Write)?;
        self.state.write().unwrap().writes.push(WriteRequest {
            org: org.to_string(),
            bucket: bucket.to_string(),
            precision,
            lines: lines.to_vec(),
        });
        Ok(())
    }

    async fn query(&self, _org: &str, flux: &str) -> Result<String> {
        self.check(MockOperation::Query)?;
        let mut state = self.state.write().unwrap();
        state.queries.push(flux.to_string());
        Ok(state.query_response.clone())
    }

    async fn ping(&self) -> Result<()> {
        self.check(MockOperation::Ping)
    }
}
