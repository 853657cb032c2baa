//! In-memory graph for tests.
//!
//! `MockGraph` is both the connector and the backend: it answers registered
//! Cypher statements with canned rows and records every statement it ran.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use futures::stream::{self, StreamExt};
use serde_json::Value;

use super::{GraphBackend, GraphConnector, RecordStream, ServerInfo};
use crate::config::Neo4jConfig;
use crate::errors::{Neo4jGatewayError, Result};

#[derive(Default)]
struct State {
    rows: HashMap<String, Vec<Value>>,
    executed: Vec<(String, String)>,
    connect_error: Option<String>,
    server_info_error: Option<String>,
    connects: usize,
    closes: usize,
}

/// Mock Neo4j server shared between the test and the gateway.
#[derive(Clone, Default)]
pub struct MockGraph {
    state: Arc<RwLock<State>>,
}

impl MockGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rows (JSON objects keyed by column) returned for `cypher`.
    pub fn with_rows(self, cypher: &str, rows: Vec<Value>) -> Self {
        self.state
            .write()
            .unwrap()
            .rows
            .insert(cypher.to_string(), rows);
        self
    }

    /// Make opening a connection fail.
    pub fn refuse_connections(self, message: &str) -> Self {
        self.state.write().unwrap().connect_error = Some(message.to_string());
        self
    }

    /// Open connections, but fail the reachability check.
    pub fn fail_server_info(self, message: &str) -> Self {
        self.state.write().unwrap().server_info_error = Some(message.to_string());
        self
    }

    /// `(database, cypher)` pairs in execution order.
    pub fn executed(&self) -> Vec<(String, String)> {
        self.state.read().unwrap().executed.clone()
    }

    pub fn connects(&self) -> usize {
        self.state.read().unwrap().connects
    }

    pub fn closes(&self) -> usize {
        self.state.read().unwrap().closes
    }
}

#[async_trait]
impl GraphConnector for MockGraph {
    async fn connect(&self, _config: &Neo4jConfig) -> Result<Box<dyn GraphBackend>> {
        let mut state = self.state.write().unwrap();
        if let Some(message) = &state.connect_error {
            return Err(Neo4jGatewayError::driver(message.clone()));
        }
        state.connects += 1;
        Ok(Box::new(self.clone()))
    }
}

#[async_trait]
impl GraphBackend for MockGraph {
    async fn server_info(&self) -> Result<ServerInfo> {
        if let Some(message) = &self.state.read().unwrap().server_info_error {
            return Err(Neo4jGatewayError::driver(message.clone()));
        }
        Ok(ServerInfo {
            address: "localhost:7687".to_string(),
            agent: "Neo4j Kernel/5.13.0".to_string(),
            edition: "community".to_string(),
        })
    }

    async fn execute(&self, database: &str, cypher: &str) -> Result<RecordStream> {
        let mut state = self.state.write().unwrap();
        state
            .executed
            .push((database.to_string(), cypher.to_string()));

        let rows = state.rows.get(cypher).cloned().unwrap_or_default();
        Ok(stream::iter(rows.into_iter().map(Ok)).boxed())
    }

    async fn close(&self) {
        self.state.write().unwrap().closes += 1;
    }
}
