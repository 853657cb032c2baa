//! Errors surfaced by the command line.

use std::path::PathBuf;

use influx_gateway::InfluxError;
use neo4j_gateway::Neo4jGatewayError;
use thermograph_ingest::IngestError;
use thermograph_shared::Recovery;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Ingest(#[from] IngestError),

    #[error("InfluxDB: {0}")]
    Influx(#[from] InfluxError),

    #[error(transparent)]
    Neo4j(#[from] Neo4jGatewayError),

    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write output: {0}")]
    Output(#[source] std::io::Error),

    /// A step was absorbed by its gateway in a way that stops the command.
    #[error("{0}")]
    Halted(String),
}

impl CliError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub fn halted(step: &str, recovery: &Recovery) -> Self {
        Self::Halted(format!("{}: {}", step, recovery))
    }
}

pub type Result<T> = std::result::Result<T, CliError>;
