//! Compress command implementation.

use crate::cli::CompressArgs;
use crate::error::hint;
use crate::output::OutputFormatter;
use crate::output::RunSummary;
use crate::runner::Operation;
use crate::runner::TaskOutput;
use anyhow::Result;
use aocomp_core::CreationConfig;
use aocomp_core::LogRecord;
use aocomp_core::LogSink;
use aocomp_core::create_archive;
use aocomp_core::creation_outcome;
use aocomp_core::format::format_percent;
use aocomp_core::format::format_size;
use aocomp_core::format::reduction_percentage;
use aocomp_core::signature::sha256_file_hex;
use aocomp_core::walker::SourceWalker;
use serde_json::json;
use std::fs;
use std::path::Path;
use std::path::PathBuf;

/// Extension every archive written by this tool carries.
const ARCHIVE_EXTENSION: &str = ".ao";

pub fn execute(args: &CompressArgs, formatter: &mut dyn OutputFormatter) -> Result<bool> {
    let source = args.source.clone();
    let output = with_archive_extension(&args.output);
    let config = CreationConfig::default()
        .with_compression_level(args.compression_level)
        .with_preserve_permissions(!args.no_permissions);

    let folder = display_name(&source);
    formatter.record(&LogRecord::info(format!(
        "Starting compression of '{folder}' folder..."
    )));

    let target = std::path::absolute(&output).unwrap_or_else(|_| output.clone());
    let stats_source = source.clone();
    let stats_archive = output.clone();

    let completed = Operation::new("Compressed")
        .target(target.display().to_string())
        .spinner(format!("Compressing {folder}"))
        .post_logs(move |sink| compression_stats(&stats_source, &stats_archive, sink))
        .run(
            move |sink| {
                let result = create_archive(&source, &output, &config);
                if let Ok(report) = &result {
                    for warning in &report.warnings {
                        sink.warn(warning);
                    }
                }
                TaskOutput {
                    outcome: creation_outcome(&result),
                    details: result.as_ref().ok().map(|report| {
                        json!({
                            "bytes_read": report.bytes_read,
                            "archive_size": report.archive_size,
                            "files_skipped": report.files_skipped,
                        })
                    }),
                    hint: result.as_ref().err().and_then(hint),
                }
            },
            formatter,
        );

    let success = completed.outcome.is_success();
    let mut summary = RunSummary::new("compress", success, completed.outcome.message());
    summary.count = completed.outcome.count();
    summary.target = completed.outcome.did_work().then(|| target.display().to_string());
    summary.duration_ms = completed.elapsed.as_millis();
    summary.details = completed.details;
    formatter.finish(&summary)?;

    Ok(success)
}

/// Appends `.ao` unless the name already ends with it, in any case.
fn with_archive_extension(path: &Path) -> PathBuf {
    let name = path.as_os_str().to_string_lossy();
    if name.to_ascii_lowercase().ends_with(ARCHIVE_EXTENSION) {
        path.to_path_buf()
    } else {
        let mut appended = path.as_os_str().to_os_string();
        appended.push(ARCHIVE_EXTENSION);
        PathBuf::from(appended)
    }
}

fn display_name(path: &Path) -> String {
    path.file_name().map_or_else(
        || path.display().to_string(),
        |name| name.to_string_lossy().into_owned(),
    )
}

fn compression_stats(source: &Path, archive: &Path, sink: &mut dyn LogSink) {
    let stats = (|| -> aocomp_core::Result<(u64, u64, String)> {
        let root = fs::canonicalize(source)?;
        let own = fs::canonicalize(archive)?;
        let original = SourceWalker::new(&root).exclude(&own).total_size()?;
        let compressed = fs::metadata(archive)?.len();
        let digest = sha256_file_hex(archive)?;
        Ok((original, compressed, digest))
    })();

    match stats {
        Ok((original, compressed, digest)) => {
            sink.info(&format!(
                "{} → {} ({} reduction)",
                format_size(original),
                format_size(compressed),
                format_percent(reduction_percentage(original, compressed))
            ));
            sink.info(&format!("SHA-256: {digest}"));
        }
        Err(e) => sink.warn(&format!("Could not calculate compression stats: {e}")),
    }
}
