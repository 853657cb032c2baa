//! thermograph command line: argument parsing, environment settings and the
//! dispatcher driving the InfluxDB and Neo4j gateways.

pub mod cli;
pub mod config;
pub mod dispatcher;
pub mod errors;

pub use cli::{Cli, Commands, InfluxArgs, Neo4jArgs};
pub use config::Settings;
pub use dispatcher::Dispatcher;
pub use errors::CliError;
