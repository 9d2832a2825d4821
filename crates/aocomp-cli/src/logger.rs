//! Developer diagnostics for `--verbose`.
//!
//! Routes `log` records from the core to stderr, dimmed, so they never mix
//! with the product log on stdout.

use console::Term;
use console::style;
use log::Level;
use log::LevelFilter;
use log::Log;
use log::Metadata;
use log::Record;

struct StderrLogger;

static LOGGER: StderrLogger = StderrLogger;

impl Log for StderrLogger {
    fn enabled(&self, metadata: &Metadata<'_>) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record<'_>) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let level = match record.level() {
            Level::Error => style("error").red(),
            Level::Warn => style("warn").yellow(),
            Level::Info => style("info").green(),
            Level::Debug => style("debug").cyan(),
            Level::Trace => style("trace").dim(),
        };
        let line = format!(
            "[{level} {}] {}",
            record.target(),
            style(record.args()).dim()
        );
        let _ = Term::stderr().write_line(&line);
    }

    fn flush(&self) {}
}

/// Installs the logger: debug level when `verbose`, silent otherwise.
pub fn init(verbose: bool) {
    let level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Off
    };
    if log::set_logger(&LOGGER).is_ok() {
        log::set_max_level(level);
    }
}
