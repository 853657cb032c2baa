//! Error types for the Neo4j gateway.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Neo4jGatewayError {
    /// Failure reported by the Bolt driver.
    #[error("Neo4j driver error: {0}")]
    Driver(String),

    /// A statement was issued before a connection was established.
    #[error("Not connected to Neo4j")]
    NotConnected,

    /// The gateway was closed and cannot be reused.
    #[error("Neo4j connection already closed")]
    AlreadyClosed,

    /// A result row could not be mapped.
    #[error("Decode error: {0}")]
    Decode(String),
}

pub type Result<T> = std::result::Result<T, Neo4jGatewayError>;

impl Neo4jGatewayError {
    pub fn driver(msg: impl Into<String>) -> Self {
        Self::Driver(msg.into())
    }

    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }
}

impl From<neo4rs::Error> for Neo4jGatewayError {
    fn from(err: neo4rs::Error) -> Self {
        match err {
            neo4rs::Error::DeserializationError(e) => Self::Decode(e.to_string()),
            other => Self::Driver(other.to_string()),
        }
    }
}
