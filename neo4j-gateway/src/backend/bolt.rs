// neo4rs-backed Bolt connection
use std::sync::Mutex;

use ::neo4rs::{query, ConfigBuilder, Graph, Row};
use async_trait::async_trait;
use futures::{StreamExt, TryStreamExt};
use serde_json::Value;
use tracing::debug;

use super::{GraphBackend, GraphConnector, RecordStream, ServerInfo};
use crate::config::Neo4jConfig;
use crate::errors::{Neo4jGatewayError, Result};

const SERVER_INFO_QUERY: &str =
    "CALL dbms.components() YIELD name, versions, edition RETURN name, versions, edition";

/// Opens connection pools with `neo4rs`.
#[derive(Debug, Default, Clone, Copy)]
pub struct Neo4rsConnector;

impl Neo4rsConnector {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl GraphConnector for Neo4rsConnector {
    async fn connect(&self, config: &Neo4jConfig) -> Result<Box<dyn GraphBackend>> {
        let driver_config = ConfigBuilder::default()
            .uri(config.url.as_str())
            .user(config.user.as_str())
            .password(config.password.as_str())
            .db(config.database.as_str())
            .build()?;

        let graph = Graph::connect(driver_config).await?;
        debug!(url = %config.url, database = %config.database, "Neo4j pool created");

        Ok(Box::new(Neo4rsBackend {
            address: config.url.clone(),
            graph: Mutex::new(Some(graph)),
        }))
    }
}

struct Neo4rsBackend {
    address: String,
    graph: Mutex<Option<Graph>>,
}

impl Neo4rsBackend {
    fn graph(&self) -> Result<Graph> {
        self.graph
            .lock()
            .map_err(|_| Neo4jGatewayError::driver("connection lock poisoned"))?
            .clone()
            .ok_or(Neo4jGatewayError::AlreadyClosed)
    }
}

fn row_to_value(row: Row) -> Result<Value> {
    row.to::<Value>()
        .map_err(|e| Neo4jGatewayError::decode(e.to_string()))
}

#[async_trait]
impl GraphBackend for Neo4rsBackend {
    async fn server_info(&self) -> Result<ServerInfo> {
        let graph = self.graph()?;
        let mut result = graph.execute(query(SERVER_INFO_QUERY)).await?;

        let Some(row) = result.next().await? else {
            return Err(Neo4jGatewayError::decode("dbms.components() returned no rows"));
        };

        let name: String = row
            .get("name")
            .map_err(|e| Neo4jGatewayError::decode(e.to_string()))?;
        let versions: Vec<String> = row.get("versions").unwrap_or_default();
        let edition: String = row.get("edition").unwrap_or_default();

        let agent = match versions.first() {
            Some(version) => format!("{}/{}", name, version),
            None => name,
        };

        Ok(ServerInfo {
            address: self.address.clone(),
            agent,
            edition,
        })
    }

    async fn execute(&self, database: &str, cypher: &str) -> Result<RecordStream> {
        let graph = self.graph()?;
        let rows = graph.execute_on(database, query(cypher)).await?;

        Ok(rows
            .into_stream()
            .map_err(Neo4jGatewayError::from)
            .and_then(|row| async move { row_to_value(row) })
            .boxed())
    }

    async fn close(&self) {
        if let Ok(mut graph) = self.graph.lock() {
            // Dropping the last Graph handle releases the pool.
            graph.take();
        }
    }
}
