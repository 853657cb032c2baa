//! Connection lifecycle and query execution against Neo4j.
//!
//! A gateway moves `Disconnected -> Connected -> Closed` and never leaves
//! `Closed`. Query results are lazy streams; every value is written to the
//! status log as it is produced.

use std::sync::Arc;

use futures::{StreamExt, TryStreamExt};
use serde_json::Value;
use thermograph_shared::{Logger, Outcome, RecoveryKind};
use tracing::{debug, info};

use crate::backend::{GraphBackend, GraphConnector, Neo4rsConnector, RecordStream};
use crate::config::Neo4jConfig;
use crate::errors::{Neo4jGatewayError, Result};
use crate::statement::{column, Projection, QueryMode, Statement};

enum State {
    Disconnected,
    Connected(Box<dyn GraphBackend>),
    Closed,
}

pub struct Neo4jGateway {
    config: Neo4jConfig,
    connector: Arc<dyn GraphConnector>,
    logger: Arc<dyn Logger>,
    state: State,
}

impl Neo4jGateway {
    /// Gateway connecting through the Bolt driver.
    pub fn new(config: Neo4jConfig, logger: Arc<dyn Logger>) -> Self {
        Self::with_connector(config, Arc::new(Neo4rsConnector::new()), logger)
    }

    pub fn with_connector(
        config: Neo4jConfig,
        connector: Arc<dyn GraphConnector>,
        logger: Arc<dyn Logger>,
    ) -> Self {
        Self {
            config,
            connector,
            logger,
            state: State::Disconnected,
        }
    }

    pub fn config(&self) -> &Neo4jConfig {
        &self.config
    }

    pub fn is_connected(&self) -> bool {
        matches!(self.state, State::Connected(_))
    }

    pub fn is_closed(&self) -> bool {
        matches!(self.state, State::Closed)
    }

    /// Open the connection and confirm the server answers.
    ///
    /// An unreachable server is logged and returned as
    /// [`Outcome::Recovered`]; the gateway stays disconnected.
    pub async fn connect(&mut self) -> Result<Outcome<()>> {
        match self.state {
            State::Closed => return Err(Neo4jGatewayError::AlreadyClosed),
            State::Connected(_) => return Ok(Outcome::Completed(())),
            State::Disconnected => {}
        }

        self.logger.ok("Connecting to Neo4j...");
        self.diagnostic(&format!(
            "Bolt URL {} as {}, database {}",
            self.config.url, self.config.user, self.config.database
        ));

        let backend = match self.connector.connect(&self.config).await {
            Ok(backend) => backend,
            Err(e) => return Ok(self.connect_failed(e)),
        };

        match backend.server_info().await {
            Ok(server) => {
                info!(address = %server.address, agent = %server.agent, "Connected to Neo4j");
                self.logger.ok("Connected to Neo4j");
                self.logger.ok(&format!("Neo4j Server info: {}", server));
                self.state = State::Connected(backend);
                Ok(Outcome::Completed(()))
            }
            Err(e) => {
                backend.close().await;
                Ok(self.connect_failed(e))
            }
        }
    }

    fn connect_failed(&self, error: Neo4jGatewayError) -> Outcome<()> {
        self.logger
            .error(&format!("Error connecting to Neo4j: {}", error));
        Outcome::recovered(RecoveryKind::Unreachable, error.to_string())
    }

    /// Run `text` and stream its values.
    ///
    /// `"architects"` runs the built-in architects query; any other text is
    /// executed verbatim against the configured database.
    pub async fn query(&self, text: &str, mode: QueryMode) -> Result<RecordStream> {
        let State::Connected(backend) = &self.state else {
            return Err(Neo4jGatewayError::NotConnected);
        };

        let statement = Statement::resolve(text);
        self.diagnostic(&format!(
            "Running on {}: {}",
            self.config.database, statement.cypher
        ));
        debug!(database = %self.config.database, cypher = %statement.cypher, "Executing statement");

        let rows = backend
            .execute(&self.config.database, &statement.cypher)
            .await?;
        let as_json = mode == QueryMode::Rows && statement.projection == Projection::Auto;

        let values = match mode {
            QueryMode::Rows => {
                let projection = statement.projection;
                rows.and_then(move |row| {
                    let value = projection.apply(row);
                    async move { value }
                })
                .boxed()
            }
            QueryMode::Single { field } => rows
                .take(1)
                .and_then(move |row| {
                    let value = column(row, &field);
                    async move { value }
                })
                .boxed(),
        };

        let logger = self.logger.clone();
        Ok(values
            .inspect_ok(move |value| logger.ok(&render(value, as_json)))
            .boxed())
    }

    /// Run `text` in row mode and collect every value.
    pub async fn run(&self, text: &str) -> Result<Vec<Value>> {
        let values: Vec<Value> = self.query(text, QueryMode::Rows).await?.try_collect().await?;
        self.diagnostic(&format!("{} rows", values.len()));
        Ok(values)
    }

    /// Release the connection. Safe to call in any state.
    pub async fn close(&mut self) {
        if let State::Connected(backend) = std::mem::replace(&mut self.state, State::Closed) {
            self.logger.ok("Closing Neo4j connection");
            backend.close().await;
            self.diagnostic("Connection released");
        }
    }

    fn diagnostic(&self, text: &str) {
        if self.config.debug_logging {
            self.logger.debug(text);
        }
    }
}

/// Generic rows are logged as JSON; named columns log strings as-is.
fn render(value: &Value, as_json: bool) -> String {
    match value {
        Value::String(s) if !as_json => s.clone(),
        other => other.to_string(),
    }
}
