// Connection settings for Neo4j
use std::fmt;

/// Database every statement runs against unless configured otherwise.
pub const DEFAULT_DATABASE: &str = "neo4j";

/// Bolt endpoint, credentials and database for one gateway.
#[derive(Clone, PartialEq, Eq)]
pub struct Neo4jConfig {
    pub url: String,
    pub user: String,
    pub password: String,
    pub database: String,
    /// Forward connection-level diagnostics to the status log.
    pub debug_logging: bool,
}

impl Neo4jConfig {
    pub fn new(
        url: impl Into<String>,
        user: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            url: url.into(),
            user: user.into(),
            password: password.into(),
            database: DEFAULT_DATABASE.to_string(),
            debug_logging: false,
        }
    }

    pub fn with_database(mut self, database: impl Into<String>) -> Self {
        self.database = database.into();
        self
    }

    pub fn with_debug_logging(mut self, enabled: bool) -> Self {
        self.debug_logging = enabled;
        self
    }
}

impl fmt::Debug for Neo4jConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Neo4jConfig")
            .field("url", &self.url)
            .field("user", &self.user)
            .field("password", &"<redacted>")
            .field("database", &self.database)
            .field("debug_logging", &self.debug_logging)
            .finish()
    }
}
