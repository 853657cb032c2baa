//! Runs parsed commands against the gateways.
//!
//! Every step is awaited before the next one starts, so the status log always
//! reflects completed work when the process exits.

use std::io::Write;
use std::sync::{Arc, Mutex};

use futures::TryStreamExt;
use influx_gateway::{FluxRecord, InfluxGateway};
use neo4j_gateway::{split_script, Neo4jGateway, QueryMode};
use serde_json::Value;
use thermograph_ingest::{normalize, read_document};
use thermograph_shared::{Logger, Outcome};
use tracing::{debug, info};

use crate::cli::{Commands, InfluxArgs, Neo4jArgs};
use crate::config::Settings;
use crate::errors::{CliError, Result};

pub struct Dispatcher {
    settings: Settings,
    logger: Arc<dyn Logger>,
    out: Mutex<Box<dyn Write + Send>>,
}

impl Dispatcher {
    /// Dispatcher printing query rows to standard output.
    pub fn new(settings: Settings, logger: Arc<dyn Logger>) -> Self {
        Self::with_output(settings, logger, Box::new(std::io::stdout()))
    }

    pub fn with_output(
        settings: Settings,
        logger: Arc<dyn Logger>,
        out: Box<dyn Write + Send>,
    ) -> Self {
        Self {
            settings,
            logger,
            out: Mutex::new(out),
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub async fn run(&self, command: Commands) -> Result<()> {
        match command {
            Commands::Influx(args) => {
                let gateway = InfluxGateway::new(self.settings.influx.clone(), self.logger.clone())?;
                self.run_influx(&gateway, &args).await
            }
            Commands::Neo4j(args) => {
                let config = self.settings.neo4j.clone();
                let debug = config.debug_logging || args.debug;
                let mut gateway =
                    Neo4jGateway::new(config.with_debug_logging(debug), self.logger.clone());
                self.run_neo4j(&mut gateway, &args).await
            }
        }
    }

    /// File, then query, then ping.
    pub async fn run_influx(&self, gateway: &InfluxGateway, args: &InfluxArgs) -> Result<()> {
        let bucket = args.bucket().unwrap_or(&self.settings.bucket);

        if let Some(path) = args.file_path() {
            let readings = read_document(path)?;
            let points = normalize(&readings)?;
            info!(file = %path.display(), points = points.len(), bucket, "Loaded temperature document");

            if args.ensure_bucket {
                if let Outcome::Recovered(recovery) = gateway.create_bucket_if_absent(bucket).await? {
                    return Err(CliError::halted("bucket provisioning", &recovery));
                }
            }

            if let Outcome::Recovered(recovery) = gateway.write_points(bucket, &points).await? {
                debug!(%recovery, "Write absorbed");
            }
        }

        if args.query {
            let records = gateway.query_temperatures(bucket, &args.time_range()).await?;
            self.print_records(&records)?;
        }

        if args.ping {
            gateway.ping().await;
        }

        Ok(())
    }

    /// Connect, run the script and the query, then close whatever happened.
    pub async fn run_neo4j(&self, gateway: &mut Neo4jGateway, args: &Neo4jArgs) -> Result<()> {
        let result = match gateway.connect().await {
            Ok(Outcome::Completed(())) => self.neo4j_steps(gateway, args).await,
            Ok(Outcome::Recovered(recovery)) => Err(CliError::halted("Neo4j connection", &recovery)),
            Err(e) => Err(e.into()),
        };

        gateway.close().await;
        result
    }

    async fn neo4j_steps(&self, gateway: &Neo4jGateway, args: &Neo4jArgs) -> Result<()> {
        if let Some(path) = &args.file {
            let script = std::fs::read_to_string(path).map_err(|e| CliError::io(path, e))?;
            for statement in split_script(&script) {
                gateway.run(&statement).await?;
            }
        }

        if let Some(text) = &args.query {
            let mode = args.single.clone().map(QueryMode::single).unwrap_or_default();
            let values: Vec<Value> = gateway.query(text, mode).await?.try_collect().await?;
            debug!(values = values.len(), "Query drained");
        }

        Ok(())
    }

    fn print_records(&self, records: &[FluxRecord]) -> Result<()> {
        let mut out = self
            .out
            .lock()
            .map_err(|_| CliError::Output(std::io::Error::other("output lock poisoned")))?;
        for record in records {
            writeln!(out, "{}", record).map_err(CliError::Output)?;
        }
        out.flush().map_err(CliError::Output)
    }
}
