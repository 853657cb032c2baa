//! Status-line logger.
//!
//! Every user-facing event is a single line on standard output prefixed with
//! `[+] ` for [`Status::Ok`] and `[!] ` for anything else. Internal
//! diagnostics go through `tracing` instead and never reach this sink.

use std::io::Write;
use std::sync::Mutex;

/// Severity of a status line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Ok,
    Error,
    /// Connection-level diagnostics, only emitted when explicitly enabled.
    Debug,
}

impl Status {
    /// Line prefix for this status.
    pub fn prefix(&self) -> &'static str {
        match self {
            Status::Ok => "[+]",
            Status::Error | Status::Debug => "[!]",
        }
    }
}

/// Format a status line without the trailing newline.
pub fn format_line(text: &str, status: Status) -> String {
    format!("{} {}", status.prefix(), text)
}

/// Sink for status lines.
///
/// Gateways receive an `Arc<dyn Logger>` at construction instead of owning
/// their output, so tests can capture what would have been printed.
pub trait Logger: Send + Sync {
    fn log(&self, text: &str, status: Status);

    fn ok(&self, text: &str) {
        self.log(text, Status::Ok);
    }

    fn error(&self, text: &str) {
        self.log(text, Status::Error);
    }

    fn debug(&self, text: &str) {
        self.log(text, Status::Debug);
    }
}

/// Writes status lines to standard output.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleLogger;

impl ConsoleLogger {
    pub fn new() -> Self {
        Self
    }
}

impl Logger for ConsoleLogger {
    fn log(&self, text: &str, status: Status) {
        let mut stdout = std::io::stdout().lock();
        // A closed stdout (e.g. `| head`) must not abort the command.
        let _ = writeln!(stdout, "{}", format_line(text, status));
    }
}

/// Captures status lines in memory.
///
/// # Example
///
/// ```
/// use thermograph_shared::{Logger, RecordingLogger, Status};
///
/// let logger = RecordingLogger::new();
/// logger.ok("Query completed");
/// assert_eq!(logger.lines(), vec!["[+] Query completed".to_string()]);
/// assert!(logger.contains("completed"));
/// assert_eq!(logger.entries()[0].0, Status::Ok);
/// ```
#[derive(Debug, Default)]
pub struct RecordingLogger {
    entries: Mutex<Vec<(Status, String)>>,
}

impl RecordingLogger {
    pub fn new() -> Self {
        Self::default()
    }

    /// All captured `(status, text)` pairs in emission order.
    pub fn entries(&self) -> Vec<(Status, String)> {
        self.entries
            .lock()
            .map(|entries| entries.clone())
            .unwrap_or_default()
    }

    /// Captured entries rendered exactly as the console would print them.
    pub fn lines(&self) -> Vec<String> {
        self.entries()
            .iter()
            .map(|(status, text)| format_line(text, *status))
            .collect()
    }

    /// Whether any captured line contains `needle`.
    pub fn contains(&self, needle: &str) -> bool {
        self.entries().iter().any(|(_, text)| text.contains(needle))
    }

    /// Number of captured lines with the given status.
    pub fn count(&self, status: Status) -> usize {
        self.entries().iter().filter(|(s, _)| *s == status).count()
    }
}

impl Logger for RecordingLogger {
    fn log(&self, text: &str, status: Status) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.push((status, text.to_string()));
        }
    }
}
