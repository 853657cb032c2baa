//! Error types for the InfluxDB gateway.

use thiserror::Error;

/// Errors from InfluxDB operations.
#[derive(Debug, Error)]
pub enum InfluxError {
    /// The request never produced an HTTP response (DNS, connect, TLS, timeout).
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The server answered with a non-success status.
    #[error("HTTP {status}: {message}")]
    Http { status: u16, message: String },

    /// A response body could not be decoded.
    #[error("Decode error: {0}")]
    Decode(String),

    /// The Flux query failed on the server.
    #[error("Query error: {0}")]
    Query(String),

    /// The gateway configuration is unusable.
    #[error("Invalid configuration: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, InfluxError>;

impl InfluxError {
    /// Create an HTTP status error.
    pub fn http(status: u16, message: impl Into<String>) -> Self {
        Self::Http {
            status,
            message: message.into(),
        }
    }

    /// Create a decode error.
    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }

    /// Create a query error.
    pub fn query(msg: impl Into<String>) -> Self {
        Self::Query(msg.into())
    }

    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// HTTP status of the failure, if the server answered.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            Self::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }

    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(401)
    }

    /// InfluxDB reports an existing bucket as 422, proxies in front of it as 409.
    pub fn is_conflict(&self) -> bool {
        matches!(self.status(), Some(409) | Some(422))
    }

    /// Whether the server produced a response at all.
    pub fn is_http(&self) -> bool {
        matches!(self, Self::Http { .. })
    }
}

impl From<serde_json::Error> for InfluxError {
    fn from(err: serde_json::Error) -> Self {
        Self::Decode(err.to_string())
    }
}

impl From<csv::Error> for InfluxError {
    fn from(err: csv::Error) -> Self {
        Self::Decode(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_classification() {
        assert!(InfluxError::http(404, "bucket not found").is_not_found());
        assert!(InfluxError::http(401, "unauthorized access").is_unauthorized());
        assert!(InfluxError::http(422, "bucket already exists").is_conflict());
        assert!(InfluxError::http(409, "conflict").is_conflict());
        assert!(!InfluxError::decode("bad json").is_http());
        assert_eq!(InfluxError::query("boom").status(), None);
    }
}
