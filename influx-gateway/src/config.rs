// Configuration constants and connection settings for InfluxDB
use std::fmt;

use chrono::{DateTime, TimeZone, Utc};

/// Maximum number of points sent in a single write request.
pub const WRITE_BATCH_SIZE: usize = 1000;

/// Connection settings for one gateway. Immutable once the gateway is built.
#[derive(Clone, PartialEq, Eq)]
pub struct InfluxConfig {
    pub url: String,
    pub token: String,
    pub org: String,
}

impl InfluxConfig {
    pub fn new(url: impl Into<String>, token: impl Into<String>, org: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            token: token.into(),
            org: org.into(),
        }
    }

    /// Base URL without a trailing slash.
    pub fn base_url(&self) -> &str {
        self.url.trim_end_matches('/')
    }
}

impl fmt::Debug for InfluxConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InfluxConfig")
            .field("url", &self.url)
            .field("token", &"<redacted>")
            .field("org", &self.org)
            .finish()
    }
}

/// Half-open time window `[start, stop)` for range queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeRange {
    pub start: DateTime<Utc>,
    pub stop: DateTime<Utc>,
}

impl TimeRange {
    pub fn new(start: DateTime<Utc>, stop: DateTime<Utc>) -> Self {
        Self { start, stop }
    }
}

impl Default for TimeRange {
    /// The afternoon of 2023-09-14, the window the demonstration query covers.
    fn default() -> Self {
        Self {
            start: Utc.with_ymd_and_hms(2023, 9, 14, 12, 0, 0).unwrap(),
            stop: Utc.with_ymd_and_hms(2023, 9, 14, 23, 0, 0).unwrap(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_redacts_token() {
        let config = InfluxConfig::new("http://localhost:8086/", "secret-token", "org");
        let debug = format!("{:?}", config);

        assert!(!debug.contains("secret-token"));
        assert_eq!(config.base_url(), "http://localhost:8086");
    }
}
