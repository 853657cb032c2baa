// Environment configuration and defaults
use influx_gateway::InfluxConfig;
use neo4j_gateway::{Neo4jConfig, DEFAULT_DATABASE};

pub const DEFAULT_INFLUX_URL: &str = "http://localhost:8086";
pub const DEFAULT_TOKEN: &str = "dummy-token";
pub const DEFAULT_ORGANIZATION: &str = "dummy-organization";
pub const DEFAULT_BUCKET: &str = "dummy-bucket";

pub const DEFAULT_NEO4J_URL: &str = "bolt://localhost:7687";
pub const DEFAULT_NEO4J_USER: &str = "neo4j";
pub const DEFAULT_NEO4J_PASSWORD: &str = "neo4j";

/// Set to `json` for JSON diagnostics on stderr.
pub const LOG_FORMAT_VAR: &str = "THERMOGRAPH_LOG_FORMAT";

/// Settings resolved from the environment at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub influx: InfluxConfig,
    pub bucket: String,
    pub neo4j: Neo4jConfig,
}

impl Settings {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolve settings through `lookup`; unset and empty variables take
    /// their defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let influx = InfluxConfig::new(
            get_or(&lookup, "URL", DEFAULT_INFLUX_URL),
            get_or(&lookup, "TOKEN", DEFAULT_TOKEN),
            get_or(&lookup, "ORGANIZATION", DEFAULT_ORGANIZATION),
        );

        let neo4j = Neo4jConfig::new(
            get_or(&lookup, "NEO4J_URL", DEFAULT_NEO4J_URL),
            get_or(&lookup, "NEO4J_USR", DEFAULT_NEO4J_USER),
            get_or(&lookup, "NEO4J_PWD", DEFAULT_NEO4J_PASSWORD),
        )
        .with_database(get_or(&lookup, "NEO4J_DATABASE", DEFAULT_DATABASE))
        .with_debug_logging(get_flag(&lookup, "NEO4J_DEBUG"));

        Self {
            influx,
            bucket: get_or(&lookup, "BUCKET", DEFAULT_BUCKET),
            neo4j,
        }
    }
}

/// Whether diagnostics should be written as JSON.
pub fn json_logs() -> bool {
    std::env::var(LOG_FORMAT_VAR)
        .map(|format| format.eq_ignore_ascii_case("json"))
        .unwrap_or(false)
}

fn get_or<F>(lookup: &F, key: &str, default: &str) -> String
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .filter(|value| !value.is_empty())
        .unwrap_or_else(|| default.to_string())
}

fn get_flag<F>(lookup: &F, key: &str) -> bool
where
    F: Fn(&str) -> Option<String>,
{
    matches!(
        lookup(key).map(|v| v.trim().to_ascii_lowercase()).as_deref(),
        Some("1" | "true" | "yes" | "on")
    )
}
