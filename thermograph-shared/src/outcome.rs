//! Result of a best-effort operation.
//!
//! Gateway operations that may absorb a failure return
//! `Result<Outcome<T>, E>`:
//!
//! * `Ok(Outcome::Completed(value))`: the operation did what it was asked
//! * `Ok(Outcome::Recovered(recovery))`: it failed in a way that was logged
//!   and absorbed; the caller decides whether that halts its pipeline
//! * `Err(e)`: fatal, propagated to the caller

use std::fmt;

/// Category of an absorbed failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecoveryKind {
    /// The remote resource does not exist.
    NotFound,
    /// The remote resource already exists or the request conflicted with it.
    Conflict,
    /// Credentials were rejected.
    Unauthorized,
    /// No organization matched the configured name.
    MissingOrganization,
    /// The remote service could not be reached.
    Unreachable,
}

impl fmt::Display for RecoveryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RecoveryKind::NotFound => "not found",
            RecoveryKind::Conflict => "conflict",
            RecoveryKind::Unauthorized => "unauthorized",
            RecoveryKind::MissingOrganization => "missing organization",
            RecoveryKind::Unreachable => "unreachable",
        };
        write!(f, "{}", name)
    }
}

/// An absorbed failure and the reason it was absorbed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recovery {
    pub kind: RecoveryKind,
    pub reason: String,
}

impl Recovery {
    pub fn new(kind: RecoveryKind, reason: impl Into<String>) -> Self {
        Self {
            kind,
            reason: reason.into(),
        }
    }
}

impl fmt::Display for Recovery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.reason)
    }
}

#[derive(Debug, Clone, PartialEq)]
#[must_use = "a recovered outcome may need to halt the caller"]
pub enum Outcome<T> {
    Completed(T),
    Recovered(Recovery),
}

impl<T> Outcome<T> {
    pub fn recovered(kind: RecoveryKind, reason: impl Into<String>) -> Self {
        Self::Recovered(Recovery::new(kind, reason))
    }

    pub fn is_completed(&self) -> bool {
        matches!(self, Outcome::Completed(_))
    }

    pub fn is_recovered(&self) -> bool {
        matches!(self, Outcome::Recovered(_))
    }

    /// The completed value, if any.
    pub fn completed(self) -> Option<T> {
        match self {
            Outcome::Completed(value) => Some(value),
            Outcome::Recovered(_) => None,
        }
    }

    /// The recovery, if the operation was absorbed.
    pub fn recovery(&self) -> Option<&Recovery> {
        match self {
            Outcome::Completed(_) => None,
            Outcome::Recovered(recovery) => Some(recovery),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_completed_outcome() {
        let outcome = Outcome::Completed(3);
        assert!(outcome.is_completed());
        assert_eq!(outcome.clone().completed(), Some(3));
        assert!(outcome.recovery().is_none());
    }

    #[test]
    fn test_recovered_outcome() {
        let outcome: Outcome<()> = Outcome::recovered(RecoveryKind::Conflict, "bucket exists");
        assert!(outcome.is_recovered());

        let recovery = outcome.recovery().unwrap();
        assert_eq!(recovery.kind, RecoveryKind::Conflict);
        assert_eq!(recovery.to_string(), "conflict: bucket exists");
    }
}
