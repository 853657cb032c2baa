//! High-level InfluxDB operations used by the CLI.

use std::sync::Arc;

use thermograph_shared::{BucketDescriptor, Logger, Outcome, RecoveryKind, TimeSeriesPoint};
use tracing::{debug, info, warn};

use crate::api::{HttpInfluxApi, InfluxApi, WritePrecision};
use crate::config::{InfluxConfig, TimeRange, WRITE_BATCH_SIZE};
use crate::errors::{InfluxError, Result};
use crate::flux::{parse_annotated_csv, range_query, FluxRecord};
use crate::line_protocol::encode_points;

const UNAUTHORIZED_MESSAGE: &str =
    "InfluxDB credentials not configured: set TOKEN or set up a new InfluxDB database";

/// Gateway bound to one InfluxDB instance, token and organization.
pub struct InfluxGateway {
    config: InfluxConfig,
    api: Arc<dyn InfluxApi>,
    logger: Arc<dyn Logger>,
}

impl InfluxGateway {
    /// Build a gateway talking HTTP to `config.url`.
    pub fn new(config: InfluxConfig, logger: Arc<dyn Logger>) -> Result<Self> {
        let api = HttpInfluxApi::new(&config)?;
        Ok(Self::with_api(config, Arc::new(api), logger))
    }

    /// Build a gateway over any [`InfluxApi`] implementation.
    pub fn with_api(config: InfluxConfig, api: Arc<dyn InfluxApi>, logger: Arc<dyn Logger>) -> Self {
        Self {
            config,
            api,
            logger,
        }
    }

    pub fn config(&self) -> &InfluxConfig {
        &self.config
    }

    /// Whether organization `org_id` has a bucket named `name`.
    ///
    /// A 404 from the lookup means the bucket does not exist.
    pub async fn bucket_exists(&self, org_id: &str, name: &str) -> Result<bool> {
        match self.api.find_buckets(org_id, name).await {
            Ok(buckets) if !buckets.is_empty() => {
                self.logger
                    .ok(&format!("Bucket named \"{}\" already exists", name));
                Ok(true)
            }
            Ok(_) => Ok(false),
            Err(e) if e.is_not_found() => {
                debug!(org_id, bucket = name, "Bucket lookup returned 404");
                Ok(false)
            }
            Err(e) => Err(e),
        }
    }

    /// Id of the configured organization, `None` when no organization has
    /// that name.
    pub async fn organization_id(&self) -> Result<Option<String>> {
        match self.api.find_organizations(&self.config.org).await {
            Ok(orgs) => Ok(orgs.into_iter().next().map(|org| org.id)),
            Err(e) if e.is_not_found() => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Create bucket `name` in the configured organization unless it already
    /// exists.
    ///
    /// A missing organization and HTTP failures of the create call are logged
    /// and returned as [`Outcome::Recovered`].
    pub async fn create_bucket_if_absent(&self, name: &str) -> Result<Outcome<BucketDescriptor>> {
        let Some(org_id) = self.organization_id().await? else {
            let reason = format!("No organization name \"{}\" found!", self.config.org);
            self.logger.error(&reason);
            return Ok(Outcome::recovered(RecoveryKind::MissingOrganization, reason));
        };

        self.logger.ok(&format!(
            "Using organization \"{}\" identified by \"{}\"",
            self.config.org, org_id
        ));

        let descriptor = BucketDescriptor::new(&org_id, name);
        if self.bucket_exists(&org_id, name).await? {
            return Ok(Outcome::Completed(descriptor));
        }
        self.logger.ok("Bucket not found");

        self.logger.ok(&format!("Create Bucket {}", name));
        match self.api.create_bucket(&descriptor).await {
            Ok(bucket) => {
                info!(bucket = %bucket.name, id = %bucket.id, "Bucket created");
                let rendered = serde_json::to_string_pretty(&bucket.to_json_without_links())?;
                self.logger.ok(&rendered);
                Ok(Outcome::Completed(bucket.descriptor()))
            }
            Err(e) if e.is_http() => {
                warn!(bucket = name, error = %e, "Bucket creation rejected");
                self.logger
                    .error(&format!("Bucket {} was not created: {}", name, e));
                Ok(Outcome::recovered(recovery_kind(&e), e.to_string()))
            }
            Err(e) => Err(e),
        }
    }

    /// Write `points` to `bucket` with millisecond precision, in batches of
    /// [`WRITE_BATCH_SIZE`].
    ///
    /// Rejected credentials are logged and returned as
    /// [`Outcome::Recovered`]; batches already sent stay written.
    pub async fn write_points(
        &self,
        bucket: &str,
        points: &[TimeSeriesPoint],
    ) -> Result<Outcome<usize>> {
        let lines = encode_points(points);

        for (index, batch) in lines.chunks(WRITE_BATCH_SIZE).enumerate() {
            debug!(bucket, batch = index, lines = batch.len(), "Writing batch");
            let written = self
                .api
                .write(&self.config.org, bucket, WritePrecision::Milliseconds, batch)
                .await;

            match written {
                Ok(()) => {}
                Err(e) if e.is_unauthorized() => {
                    self.logger.error(UNAUTHORIZED_MESSAGE);
                    return Ok(Outcome::recovered(RecoveryKind::Unauthorized, e.to_string()));
                }
                Err(e) => return Err(e),
            }
        }

        self.logger.ok(&format!(
            "Wrote {} points to bucket \"{}\"",
            lines.len(),
            bucket
        ));
        Ok(Outcome::Completed(lines.len()))
    }

    /// Run a Flux query and collect its rows in server order.
    pub async fn query(&self, flux: &str) -> Result<Vec<FluxRecord>> {
        self.logger.ok(&format!("Querying data with {}", flux));

        match self.fetch_records(flux).await {
            Ok(records) => {
                debug!(rows = records.len(), "Query returned rows");
                self.logger.ok("Query completed");
                Ok(records)
            }
            Err(e) => {
                self.logger.error(&format!("Query error: {}", e));
                Err(e)
            }
        }
    }

    async fn fetch_records(&self, flux: &str) -> Result<Vec<FluxRecord>> {
        let body = self.api.query(&self.config.org, flux).await?;
        parse_annotated_csv(&body)
    }

    /// Every point of `bucket` within `range`.
    pub async fn query_temperatures(
        &self,
        bucket: &str,
        range: &TimeRange,
    ) -> Result<Vec<FluxRecord>> {
        self.query(&range_query(bucket, range)).await
    }

    /// Liveness check. The result is only reported through the logger.
    pub async fn ping(&self) {
        match self.api.ping().await {
            Ok(()) => self.logger.ok("Ping Pong SUCCESS"),
            Err(e) => self.logger.error(&format!("Ping Pong ERROR {}", e)),
        }
    }
}

fn recovery_kind(error: &InfluxError) -> RecoveryKind {
    if error.is_unauthorized() {
        RecoveryKind::Unauthorized
    } else if error.is_not_found() {
        RecoveryKind::NotFound
    } else {
        RecoveryKind::Conflict
    }
}
