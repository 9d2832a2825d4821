//! Inspect command implementation.

use crate::cli::InspectArgs;
use crate::error::hint;
use crate::output::OutputFormatter;
use crate::output::RunSummary;
use crate::progress::CliSpinner;
use anyhow::Result;
use aocomp_core::ArchiveInspection;
use aocomp_core::CollectingSink;
use aocomp_core::LogRecord;
use aocomp_core::inspect::render;
use aocomp_core::inspect_archive;
use serde_json::Value;
use serde_json::json;
use std::time::Instant;

pub fn execute(args: &InspectArgs, formatter: &mut dyn OutputFormatter) -> Result<bool> {
    let start = Instant::now();
    let spinner = CliSpinner::should_show().then(|| {
        CliSpinner::new(&format!("Inspecting {}", args.archive.display()))
    });
    let result = inspect_archive(&args.archive);
    drop(spinner);

    let mut summary = match &result {
        Ok(inspection) => {
            let mut sink = CollectingSink::new();
            render(inspection, &mut sink);
            for record in sink.records() {
                formatter.record(record);
            }

            let mut summary = RunSummary::new(
                "inspect",
                true,
                format!("Inspected {}", inspection.name),
            );
            summary.count = Some(inspection.entries.len() as u64);
            summary.target = Some(inspection.path.display().to_string());
            summary.details = Some(details(inspection));
            summary
        }
        Err(e) => {
            let message = format!("Error inspecting file: {e}");
            formatter.record(&LogRecord::error(message.clone()));
            if let Some(hint) = hint(e) {
                formatter.record(&LogRecord::info(hint));
            }
            RunSummary::new("inspect", false, message)
        }
    };
    summary.duration_ms = start.elapsed().as_millis();
    formatter.finish(&summary)?;

    Ok(result.is_ok())
}

fn details(inspection: &ArchiveInspection) -> Value {
    let entries: Vec<Value> = inspection
        .entries
        .iter()
        .map(|entry| {
            let mut value = json!({
                "name": entry.name,
                "compressed_size": entry.compressed_size,
                "uncompressed_size": entry.uncompressed_size,
                "reduction_percent": entry.ratio(),
            });
            match &entry.content {
                Ok(content) => {
                    value["sha256"] = json!(content.sha256);
                    value["magic"] = json!(content.magic_hex);
                    value["detected_type"] = json!(content.detected.label());
                    value["empty"] = json!(content.is_empty);
                }
                Err(reason) => value["error"] = json!(reason),
            }
            value
        })
        .collect();

    json!({
        "size": inspection.size,
        "sha256": inspection.sha256.as_ref().ok(),
        "entries": entries,
    })
}
