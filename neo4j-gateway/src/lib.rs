//! Neo4j gateway for thermograph.
//!
//! - [`Neo4jGateway`]: connect, query and close with an explicit lifecycle
//! - [`GraphConnector`] / [`GraphBackend`]: seam over the Bolt driver
//! - [`Neo4rsConnector`] production driver built on `neo4rs`
//! - [`MockGraph`] in-memory graph for tests
//!
//! ```ignore
//! use neo4j_gateway::{Neo4jConfig, Neo4jGateway};
//!
//! let mut gateway = Neo4jGateway::new(config, logger);
//! if gateway.connect().await?.is_completed() {
//!     gateway.run("architects").await?;
//! }
//! gateway.close().await;
//! ```

pub mod backend;
pub mod config;
pub mod errors;
pub mod gateway;
pub mod statement;

pub use backend::{GraphBackend, GraphConnector, MockGraph, Neo4rsConnector, RecordStream, ServerInfo};
pub use config::{Neo4jConfig, DEFAULT_DATABASE};
pub use errors::{Neo4jGatewayError, Result};
pub use gateway::Neo4jGateway;
pub use statement::{split_script, Projection, QueryMode, Statement, ARCHITECTS};
