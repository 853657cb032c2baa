use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use clap::{Args, Parser, Subcommand};
use influx_gateway::TimeRange;

#[derive(Parser, Debug)]
#[command(
    name = "thermograph",
    version,
    about = "Load temperature readings into InfluxDB and query Neo4j"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// CLI for InfluxDB
    Influx(InfluxArgs),
    /// CLI for Neo4j
    Neo4j(Neo4jArgs),
}

#[derive(Args, Debug, Default, Clone)]
pub struct InfluxArgs {
    /// XML file to parse, optionally followed by the bucket to write to
    #[arg(short, long, num_args = 1..=2, value_names = ["FILE", "BUCKET"])]
    pub file: Option<Vec<String>>,
    /// Query the bucket for the demonstration time range
    #[arg(short, long, default_value_t = false)]
    pub query: bool,
    /// Ping InfluxDB
    #[arg(short, long, default_value_t = false)]
    pub ping: bool,
    /// Create the bucket before writing when it does not exist
    #[arg(long, default_value_t = false)]
    pub ensure_bucket: bool,
    /// Start of the query range (RFC 3339)
    #[arg(long, value_parser = parse_instant)]
    pub start: Option<DateTime<Utc>>,
    /// End of the query range (RFC 3339)
    #[arg(long, value_parser = parse_instant)]
    pub stop: Option<DateTime<Utc>>,
}

impl InfluxArgs {
    pub fn file_path(&self) -> Option<&Path> {
        self.file
            .as_ref()
            .and_then(|values| values.first())
            .map(Path::new)
    }

    /// Bucket given after the file name, if any.
    pub fn bucket(&self) -> Option<&str> {
        self.file
            .as_ref()
            .and_then(|values| values.get(1))
            .map(String::as_str)
    }

    /// Query range, each bound falling back to the demonstration window.
    pub fn time_range(&self) -> TimeRange {
        let default = TimeRange::default();
        TimeRange::new(
            self.start.unwrap_or(default.start),
            self.stop.unwrap_or(default.stop),
        )
    }
}

#[derive(Args, Debug, Default, Clone)]
pub struct Neo4jArgs {
    /// Cypher script to run, statements separated by `;`
    #[arg(short, long)]
    pub file: Option<PathBuf>,
    /// Query to execute (`architects` lists every architect)
    #[arg(short, long)]
    pub query: Option<String>,
    /// Return only this field of the first record
    #[arg(long, requires = "query")]
    pub single: Option<String>,
    /// Forward driver diagnostics to the log
    #[arg(long, default_value_t = false)]
    pub debug: bool,
}

fn parse_instant(value: &str) -> Result<DateTime<Utc>, String> {
    DateTime::parse_from_rfc3339(value)
        .map(|instant| instant.with_timezone(&Utc))
        .map_err(|e| format!("expected an RFC 3339 timestamp: {}", e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn parse(args: &[&str]) -> Commands {
        let mut argv = vec!["thermograph"];
        argv.extend_from_slice(args);
        Cli::try_parse_from(argv).unwrap().command
    }

    #[test]
    fn test_influx_file_with_bucket() {
        let Commands::Influx(args) = parse(&["influx", "-f", "teploty.xml", "mesto", "-q", "-p"]) else {
            panic!("expected influx command");
        };

        assert_eq!(args.file_path(), Some(Path::new("teploty.xml")));
        assert_eq!(args.bucket(), Some("mesto"));
        assert!(args.query && args.ping);
        assert!(!args.ensure_bucket);
    }

    #[test]
    fn test_influx_range_bounds() {
        let Commands::Influx(args) = parse(&["influx", "-q", "--start", "2023-09-14T14:00:00+02:00"]) else {
            panic!("expected influx command");
        };

        let range = args.time_range();
        assert_eq!(range.start, Utc.with_ymd_and_hms(2023, 9, 14, 12, 0, 0).unwrap());
        assert_eq!(range.stop, TimeRange::default().stop);
        assert_eq!(args.bucket(), None);
    }

    #[test]
    fn test_rejects_bad_instant() {
        assert!(Cli::try_parse_from(["thermograph", "influx", "--stop", "yesterday"]).is_err());
    }

    #[test]
    fn test_neo4j_single_requires_query() {
        assert!(Cli::try_parse_from(["thermograph", "neo4j", "--single", "name"]).is_err());

        let Commands::Neo4j(args) = parse(&["neo4j", "-q", "architects", "--single", "name"]) else {
            panic!("expected neo4j command");
        };
        assert_eq!(args.query.as_deref(), Some("architects"));
        assert_eq!(args.single.as_deref(), Some("name"));
    }
}
