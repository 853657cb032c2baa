//! Seam between the gateway and the Bolt driver.
//!
//! A [`GraphConnector`] opens a [`GraphBackend`]; the backend executes Cypher
//! and streams every row as a JSON object keyed by column name. Production
//! code uses [`Neo4rsConnector`]; tests use [`MockGraph`].

mod mock;
mod bolt;

pub use self::mock::MockGraph;
pub use self::bolt::Neo4rsConnector;

use std::fmt;

use async_trait::async_trait;
use futures::stream::BoxStream;
use serde_json::Value;

use crate::config::Neo4jConfig;
use crate::errors::Result;

/// Lazily produced values of one query.
pub type RecordStream = BoxStream<'static, Result<Value>>;

/// What the server reported about itself when the connection was checked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerInfo {
    pub address: String,
    pub agent: String,
    pub edition: String,
}

impl fmt::Display for ServerInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, {}, {}", self.address, self.agent, self.edition)
    }
}

/// Opens backend handles.
#[async_trait]
pub trait GraphConnector: Send + Sync {
    async fn connect(&self, config: &Neo4jConfig) -> Result<Box<dyn GraphBackend>>;
}

/// An open driver handle.
#[async_trait]
pub trait GraphBackend: Send + Sync {
    /// Round trip to the server proving it is reachable.
    async fn server_info(&self) -> Result<ServerInfo>;

    /// Run `cypher` on `database`; rows are JSON objects.
    async fn execute(&self, database: &str, cypher: &str) -> Result<RecordStream>;

    /// Release the handle.
    async fn close(&self);
}
