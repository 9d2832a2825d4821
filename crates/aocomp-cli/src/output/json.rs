//! JSON output formatter for machine-readable results.
//!
//! Records are buffered and printed as one document when the command ends.

use super::formatter::JsonOutput;
use super::formatter::OutputFormatter;
use super::formatter::RunSummary;
use anyhow::Result;
use aocomp_core::LogRecord;
use serde::Serialize;
use std::io::Write;
use std::io::{self};

#[derive(Debug, Serialize)]
struct JsonRecord {
    severity: &'static str,
    text: String,
}

#[derive(Debug, Serialize)]
struct RunOutput<'a> {
    #[serde(flatten)]
    summary: &'a RunSummary,
    log: &'a [JsonRecord],
}

#[derive(Default)]
pub struct JsonFormatter {
    records: Vec<JsonRecord>,
}

impl JsonFormatter {
    pub fn new() -> Self {
        Self {
            records: Vec::new(),
        }
    }

    fn output<T: Serialize>(value: &T) -> Result<()> {
        let json = serde_json::to_string_pretty(value)?;
        writeln!(io::stdout(), "{json}")?;
        Ok(())
    }
}

impl OutputFormatter for JsonFormatter {
    fn record(&mut self, record: &LogRecord) {
        self.records.push(JsonRecord {
            severity: record.severity.as_str(),
            text: record.text.clone(),
        });
    }

    fn finish(&mut self, summary: &RunSummary) -> Result<()> {
        let data = RunOutput {
            summary,
            log: &self.records,
        };
        if summary.success {
            Self::output(&JsonOutput::success(summary.operation, data))
        } else {
            Self::output(&JsonOutput::failure(
                summary.operation,
                data,
                summary.message.clone(),
            ))
        }
    }

    fn format_error(&mut self, error: &anyhow::Error) {
        let output = JsonOutput::<()>::error("unknown", format!("{error:?}"));
        let _ = Self::output(&output);
    }
}
