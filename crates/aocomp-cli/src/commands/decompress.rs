//! Decompress command implementation.

use crate::cli::DecompressArgs;
use crate::error::hint;
use crate::output::OutputFormatter;
use crate::output::RunSummary;
use crate::runner::Operation;
use crate::runner::TaskOutput;
use anyhow::Result;
use aocomp_core::ExtractionConfig;
use aocomp_core::LogRecord;
use aocomp_core::LogSink;
use aocomp_core::extract::extraction_target;
use aocomp_core::extract_archive;
use aocomp_core::extraction_outcome;
use aocomp_core::format::format_timestamp;
use aocomp_core::signature::sha256_file_hex;
use serde_json::json;
use std::fs;
use std::path::Path;
use std::path::PathBuf;

pub fn execute(args: &DecompressArgs, formatter: &mut dyn OutputFormatter) -> Result<bool> {
    let archive = args.archive.clone();
    let dest = args.dest_dir.clone().unwrap_or_else(|| PathBuf::from("."));
    let config = extraction_config(args);

    let file = archive.file_name().map_or_else(
        || archive.display().to_string(),
        |name| name.to_string_lossy().into_owned(),
    );
    formatter.record(&LogRecord::info(format!(
        "Starting decompression of '{file}' file..."
    )));

    let target = extraction_target(&archive, &dest);
    let target = std::path::absolute(&target).unwrap_or(target);
    let stats_archive = archive.clone();

    let completed = Operation::new("Decompressed")
        .target(target.display().to_string())
        .spinner(format!("Decompressing {file}"))
        .post_logs(move |sink| decompression_stats(&stats_archive, sink))
        .run(
            move |sink| {
                let result = extract_archive(&archive, &dest, &config, sink);
                TaskOutput {
                    outcome: extraction_outcome(&result),
                    details: result.as_ref().ok().map(|report| {
                        json!({
                            "directories_created": report.directories_created,
                            "entries_skipped": report.entries_skipped,
                            "bytes_written": report.bytes_written,
                        })
                    }),
                    hint: result.as_ref().err().and_then(hint),
                }
            },
            formatter,
        );

    let success = completed.outcome.is_success();
    let mut summary = RunSummary::new("decompress", success, completed.outcome.message());
    summary.count = completed.outcome.count();
    summary.target = success.then(|| target.display().to_string());
    summary.duration_ms = completed.elapsed.as_millis();
    summary.details = completed.details;
    formatter.finish(&summary)?;

    Ok(success)
}

/// No limits unless `--guarded` or a `--max-*` flag asks for them.
fn extraction_config(args: &DecompressArgs) -> ExtractionConfig {
    let mut config = if args.guarded {
        ExtractionConfig::guarded()
    } else {
        ExtractionConfig::default()
    };
    if let Some(max) = args.max_total_size {
        config = config.with_max_total_size(Some(max));
    }
    if let Some(ratio) = args.max_compression_ratio {
        config = config.with_max_compression_ratio(Some(f64::from(ratio)));
    }
    config
}

fn decompression_stats(archive: &Path, sink: &mut dyn LogSink) {
    let stats = (|| -> aocomp_core::Result<(String, String)> {
        let modified = fs::metadata(archive)?.modified()?;
        let digest = sha256_file_hex(archive)?;
        Ok((format_timestamp(modified), digest))
    })();

    match stats {
        Ok((modified, digest)) => {
            sink.info(&format!("Last Modified: {modified}"));
            sink.info(&format!("SHA-256: {digest}"));
        }
        Err(e) => sink.warn(&format!("Could not read file stats: {e}")),
    }
}
