//! Human-readable output formatter with colors and styling.
//!
//! Info and success lines go to stdout; warnings and errors to stderr.

use super::formatter::OutputFormatter;
use super::formatter::RunSummary;
use anyhow::Result;
use aocomp_core::LogRecord;
use aocomp_core::Severity;
use console::Term;
use console::style;

pub struct HumanFormatter {
    quiet: bool,
    use_colors: bool,
    out: Term,
    err: Term,
}

impl HumanFormatter {
    pub fn new(quiet: bool) -> Self {
        Self {
            quiet,
            use_colors: console::colors_enabled(),
            out: Term::stdout(),
            err: Term::stderr(),
        }
    }

    fn styled(&self, record: &LogRecord) -> String {
        let text = &record.text;
        if text.is_empty() {
            return String::new();
        }
        match (record.severity, self.use_colors) {
            (Severity::Info, _) => text.clone(),
            (Severity::Success, true) => format!("{} {text}", style("✓").green().bold()),
            (Severity::Success, false) => text.clone(),
            (Severity::Warning, true) => format!("{} {}", style("⚠").yellow().bold(), style(text).yellow()),
            (Severity::Warning, false) => format!("WARNING: {text}"),
            (Severity::Error, true) => format!("{} {}", style("✗").red().bold(), style(text).red()),
            (Severity::Error, false) => format!("ERROR: {text}"),
        }
    }
}

impl OutputFormatter for HumanFormatter {
    fn record(&mut self, record: &LogRecord) {
        let line = self.styled(record);
        match record.severity {
            Severity::Info | Severity::Success => {
                if !self.quiet {
                    let _ = self.out.write_line(&line);
                }
            }
            Severity::Warning | Severity::Error => {
                let _ = self.err.write_line(&line);
            }
        }
    }

    fn finish(&mut self, _summary: &RunSummary) -> Result<()> {
        self.out.flush()?;
        self.err.flush()?;
        Ok(())
    }

    fn format_error(&mut self, error: &anyhow::Error) {
        // Always show errors, even in quiet mode
        if self.use_colors {
            let _ = self
                .err
                .write_line(&format!("{} {error:?}", style("ERROR:").red().bold()));
        } else {
            let _ = self.err.write_line(&format!("ERROR: {error:?}"));
        }
    }
}
