//! Log records and the sinks that receive them.

use std::fmt;

/// Severity of a [`LogRecord`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Severity {
    /// Progress and informational lines.
    Info,
    /// An operation finished with work done.
    Success,
    /// Something was skipped or there was nothing to do.
    Warning,
    /// An operation or an entry failed.
    Error,
}

impl Severity {
    /// Lower-case name, as used in JSON output.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Success => "success",
            Self::Warning => "warning",
            Self::Error => "error",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A line of text with a severity, emitted by the core.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogRecord {
    /// Message text. May be empty (blank separator line).
    pub text: String,
    /// Severity of the message.
    pub severity: Severity,
}

impl LogRecord {
    /// Creates a record.
    pub fn new(text: impl Into<String>, severity: Severity) -> Self {
        Self {
            text: text.into(),
            severity,
        }
    }

    /// Creates an info record.
    pub fn info(text: impl Into<String>) -> Self {
        Self::new(text, Severity::Info)
    }

    /// Creates a warning record.
    pub fn warning(text: impl Into<String>) -> Self {
        Self::new(text, Severity::Warning)
    }

    /// Creates an error record.
    pub fn error(text: impl Into<String>) -> Self {
        Self::new(text, Severity::Error)
    }
}

/// Receiver of log records emitted during an operation.
///
/// The core never touches terminal or UI types; drivers implement this trait
/// to print, forward over a channel, or collect the records. The trait
/// requires `Send` so a sink can live on a worker thread.
///
/// Closures taking `(&str, Severity)` implement it directly:
///
/// ```
/// use aocomp_core::LogSink;
/// use aocomp_core::Severity;
///
/// let mut lines = Vec::new();
/// let mut sink = |text: &str, severity: Severity| lines.push(format!("[{severity}] {text}"));
/// sink.log("hello", Severity::Info);
/// assert_eq!(lines, vec!["[info] hello".to_string()]);
/// ```
pub trait LogSink: Send {
    /// Receives one record.
    fn log(&mut self, text: &str, severity: Severity);

    /// Convenience for [`Severity::Info`].
    fn info(&mut self, text: &str) {
        self.log(text, Severity::Info);
    }

    /// Convenience for [`Severity::Warning`].
    fn warn(&mut self, text: &str) {
        self.log(text, Severity::Warning);
    }

    /// Convenience for [`Severity::Error`].
    fn error(&mut self, text: &str) {
        self.log(text, Severity::Error);
    }

    /// Emits an empty info line.
    fn blank(&mut self) {
        self.log("", Severity::Info);
    }

    /// Forwards an owned record.
    fn record(&mut self, record: &LogRecord) {
        self.log(&record.text, record.severity);
    }
}

impl<F> LogSink for F
where
    F: FnMut(&str, Severity) + Send,
{
    fn log(&mut self, text: &str, severity: Severity) {
        self(text, severity);
    }
}

/// Sink that discards everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopSink;

impl LogSink for NoopSink {
    fn log(&mut self, _text: &str, _severity: Severity) {}
}

/// Sink that keeps every record in memory, in emission order.
#[derive(Debug, Default, Clone)]
pub struct CollectingSink {
    records: Vec<LogRecord>,
}

impl CollectingSink {
    /// Creates an empty sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records collected so far.
    #[must_use]
    pub fn records(&self) -> &[LogRecord] {
        &self.records
    }

    /// Consumes the sink, returning its records.
    #[must_use]
    pub fn into_records(self) -> Vec<LogRecord> {
        self.records
    }

    /// Returns the texts of all records, in order.
    #[must_use]
    pub fn texts(&self) -> Vec<&str> {
        self.records.iter().map(|r| r.text.as_str()).collect()
    }

    /// Returns records of the given severity.
    pub fn with_severity(&self, severity: Severity) -> impl Iterator<Item = &LogRecord> {
        self.records.iter().filter(move |r| r.severity == severity)
    }
}

impl LogSink for CollectingSink {
    fn log(&mut self, text: &str, severity: Severity) {
        self.records.push(LogRecord::new(text, severity));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collecting_sink_keeps_order() {
        let mut sink = CollectingSink::new();
        sink.info("first");
        sink.warn("second");
        sink.blank();
        sink.error("third");

        assert_eq!(sink.texts(), vec!["first", "second", "", "third"]);
        assert_eq!(sink.records()[1].severity, Severity::Warning);
        assert_eq!(sink.with_severity(Severity::Error).count(), 1);
    }

    #[test]
    fn test_closure_sink() {
        let mut count = 0;
        {
            let mut sink = |_: &str, _: Severity| count += 1;
            sink.info("a");
            sink.record(&LogRecord::warning("b"));
        }
        assert_eq!(count, 2);
    }

    #[test]
    fn test_noop_sink() {
        let mut sink = NoopSink;
        sink.error("ignored");
    }

    #[test]
    fn test_severity_names() {
        assert_eq!(Severity::Info.to_string(), "info");
        assert_eq!(Severity::Success.as_str(), "success");
        assert_eq!(Severity::Warning.as_str(), "warning");
        assert_eq!(Severity::Error.as_str(), "error");
    }
}
