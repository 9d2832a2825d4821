//! Runs an archive operation off the main thread.
//!
//! The worker reports through a [`ChannelSink`]; the main thread owns the
//! terminal and forwards every record to the formatter as it arrives, with
//! the spinner suspended while the line is written.

use crate::output::OutputFormatter;
use crate::progress::CliSpinner;
use aocomp_core::LogRecord;
use aocomp_core::LogSink;
use aocomp_core::Outcome;
use aocomp_core::Severity;
use flume::Sender;
use std::thread;
use std::time::Duration;
use std::time::Instant;

/// Message reported when the worker dies instead of returning.
pub const UNEXPECTED_ERROR: &str = "Unexpected error.";

/// Message sent from the worker to the main thread.
#[derive(Debug)]
pub enum WorkerEvent<T> {
    /// A log line produced while working.
    Log(LogRecord),
    /// The task's result. Always the last event.
    Finished(T),
}

/// [`LogSink`] that ships records over a channel.
pub struct ChannelSink<T> {
    tx: Sender<WorkerEvent<T>>,
}

impl<T> ChannelSink<T> {
    pub const fn new(tx: Sender<WorkerEvent<T>>) -> Self {
        Self { tx }
    }
}

impl<T: Send> LogSink for ChannelSink<T> {
    fn log(&mut self, text: &str, severity: Severity) {
        // Receiver gone means the main thread is exiting.
        let _ = self.tx.send(WorkerEvent::Log(LogRecord::new(text, severity)));
    }
}

/// What a task hands back besides its log.
#[derive(Debug)]
pub struct TaskOutput {
    pub outcome: Outcome,
    /// Extra data for `--json`.
    pub details: Option<serde_json::Value>,
    /// Follow-up advice printed after a failure.
    pub hint: Option<String>,
}

impl From<Outcome> for TaskOutput {
    fn from(outcome: Outcome) -> Self {
        Self {
            outcome,
            details: None,
            hint: None,
        }
    }
}

/// Result of [`Operation::run`].
#[derive(Debug)]
pub struct Completed {
    pub outcome: Outcome,
    pub details: Option<serde_json::Value>,
    pub elapsed: Duration,
}

type PostLogs = Box<dyn FnOnce(&mut dyn LogSink) + Send>;

/// A timed archive task plus the lines published when it did work.
///
/// When the task succeeds with a non-zero count the worker publishes, in
/// order: the headline `"<verb> <n> file(s) to '<target>'"`, the post-logs,
/// then `"Time: <ms>ms"`. The outcome message always follows.
pub struct Operation {
    verb: &'static str,
    target: String,
    spinner_message: String,
    post_logs: Option<PostLogs>,
}

impl Operation {
    pub fn new(verb: &'static str) -> Self {
        Self {
            verb,
            target: String::new(),
            spinner_message: String::new(),
            post_logs: None,
        }
    }

    /// Destination shown in the headline.
    #[must_use]
    pub fn target(mut self, target: impl Into<String>) -> Self {
        self.target = target.into();
        self
    }

    #[must_use]
    pub fn spinner(mut self, message: impl Into<String>) -> Self {
        self.spinner_message = message.into();
        self
    }

    /// Lines published between the headline and the timing.
    #[must_use]
    pub fn post_logs<F>(mut self, f: F) -> Self
    where
        F: FnOnce(&mut dyn LogSink) + Send + 'static,
    {
        self.post_logs = Some(Box::new(f));
        self
    }

    /// Runs `task` on a worker thread and streams its log to `formatter`.
    pub fn run<F>(self, task: F, formatter: &mut dyn OutputFormatter) -> Completed
    where
        F: FnOnce(&mut dyn LogSink) -> TaskOutput + Send + 'static,
    {
        let Self {
            verb,
            target,
            spinner_message,
            post_logs,
        } = self;
        let (tx, rx) = flume::unbounded::<WorkerEvent<(TaskOutput, Duration)>>();

        let spawned = thread::Builder::new()
            .name("aocomp-worker".to_string())
            .spawn(move || {
                let mut sink = ChannelSink::new(tx.clone());
                let start = Instant::now();
                let output = task(&mut sink);
                let elapsed = start.elapsed();

                if let Some(count) = output.outcome.count().filter(|&n| n > 0) {
                    sink.info(&headline(verb, count, &target));
                    if let Some(post) = post_logs {
                        post(&mut sink);
                    }
                    sink.info(&format!("Time: {}ms", elapsed.as_millis()));
                }
                let _ = tx.send(WorkerEvent::Finished((output, elapsed)));
            });

        let handle = match spawned {
            Ok(handle) => handle,
            Err(e) => {
                log::debug!("cannot spawn worker: {e}");
                return finish(unexpected(), Duration::ZERO, formatter);
            }
        };

        let spinner = (CliSpinner::should_show() && !spinner_message.is_empty())
            .then(|| CliSpinner::new(&spinner_message));
        let mut finished = None;

        // Ends once the worker drops its senders, normally or by unwinding.
        for event in rx.iter() {
            match event {
                WorkerEvent::Log(record) => match &spinner {
                    Some(spinner) => spinner.suspend(|| formatter.record(&record)),
                    None => formatter.record(&record),
                },
                WorkerEvent::Finished(result) => finished = Some(result),
            }
        }
        drop(spinner);

        match (handle.join(), finished) {
            (Ok(()), Some((output, elapsed))) => finish(output, elapsed, formatter),
            (joined, _) => {
                if let Err(payload) = joined {
                    log::debug!("worker panicked: {}", panic_message(payload.as_ref()));
                }
                finish(unexpected(), Duration::ZERO, formatter)
            }
        }
    }
}

fn unexpected() -> TaskOutput {
    TaskOutput::from(Outcome::failure(UNEXPECTED_ERROR))
}

fn finish(
    output: TaskOutput,
    elapsed: Duration,
    formatter: &mut dyn OutputFormatter,
) -> Completed {
    formatter.record(&output.outcome.to_record());
    if let Some(hint) = output.hint.filter(|_| !output.outcome.is_success()) {
        formatter.record(&LogRecord::info(hint));
    }
    Completed {
        outcome: output.outcome,
        details: output.details,
        elapsed,
    }
}

/// `"Compressed 3 files to '/tmp/out.ao'"`.
pub fn headline(verb: &str, count: u64, target: &str) -> String {
    let plural = if count == 1 { "" } else { "s" };
    format!("{verb} {count} file{plural} to '{target}'")
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> &str {
    payload
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("<non-string panic>")
}
