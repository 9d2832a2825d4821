//! Integration tests for aocomp-cli.
//!
//! Note: Tests use `unwrap`/`expect` which is acceptable in test code.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

use assert_cmd::Command;
use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use std::fs;
use std::io::Write;
use std::path::Path;
use std::path::PathBuf;
use tempfile::TempDir;
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

fn aocomp_cmd() -> Command {
    cargo_bin_cmd!("aocomp")
}

/// `src/a.txt` and `src/sub/b.txt`.
fn sample_source(temp: &TempDir) -> PathBuf {
    let src = temp.path().join("src");
    fs::create_dir_all(src.join("sub")).expect("failed to create source");
    fs::write(src.join("a.txt"), "alpha ".repeat(200)).expect("failed to write a.txt");
    fs::write(src.join("sub/b.txt"), "beta").expect("failed to write b.txt");
    src
}

fn compress(src: &Path, out: &Path) {
    aocomp_cmd()
        .arg("compress")
        .arg(src)
        .arg(out)
        .assert()
        .success();
}

fn raw_archive(path: &Path, entries: &[(&str, &[u8])]) {
    let file = fs::File::create(path).expect("failed to create archive");
    let mut zip = ZipWriter::new(file);
    for (name, data) in entries {
        zip.start_file(*name, SimpleFileOptions::default()).unwrap();
        zip.write_all(data).unwrap();
    }
    zip.finish().unwrap();
}

#[test]
fn test_version_flag() {
    aocomp_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("aocomp"));
}

#[test]
fn test_help_lists_subcommands() {
    aocomp_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("compress"))
        .stdout(predicate::str::contains("decompress"))
        .stdout(predicate::str::contains("inspect"));
}

#[test]
fn test_compress_reports_and_appends_extension() {
    let temp = TempDir::new().expect("failed to create temp dir");
    let src = sample_source(&temp);

    aocomp_cmd()
        .arg("compress")
        .arg(&src)
        .arg(temp.path().join("out"))
        .assert()
        .success()
        .stdout(predicate::str::contains("Starting compression of 'src' folder..."))
        .stdout(predicate::str::contains("Compressed 2 files to '"))
        .stdout(predicate::str::contains("% reduction)"))
        .stdout(predicate::str::contains("SHA-256: "))
        .stdout(predicate::str::contains("Time: "))
        .stdout(predicate::str::contains("Compression successful!"));

    assert!(temp.path().join("out.ao").is_file());
    assert!(!temp.path().join("out").exists());
}

#[test]
fn test_compress_empty_source_warns() {
    let temp = TempDir::new().expect("failed to create temp dir");
    let src = temp.path().join("empty");
    fs::create_dir_all(src.join("nested")).unwrap();

    aocomp_cmd()
        .arg("compress")
        .arg(&src)
        .arg(temp.path().join("empty.ao"))
        .assert()
        .success()
        .stdout(predicate::str::contains("Compressed").not())
        .stderr(predicate::str::contains("WARNING: No files to compress."));

    assert!(!temp.path().join("empty.ao").exists());
}

#[test]
fn test_compress_invalid_source_fails() {
    let temp = TempDir::new().expect("failed to create temp dir");

    aocomp_cmd()
        .arg("compress")
        .arg(temp.path().join("missing"))
        .arg(temp.path().join("x.ao"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("ERROR: Invalid source directory."));

    assert!(!temp.path().join("x.ao").exists());
}

#[test]
fn test_compress_into_source_skips_archive() {
    let temp = TempDir::new().expect("failed to create temp dir");
    let src = sample_source(&temp);

    let output = aocomp_cmd()
        .arg("--json")
        .arg("compress")
        .arg(&src)
        .arg(src.join("self.ao"))
        .output()
        .expect("failed to run aocomp");
    assert!(output.status.success());

    let value: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("stdout is not JSON");
    assert_eq!(value["data"]["count"], 2);
    assert_eq!(value["data"]["details"]["files_skipped"], 1);

    aocomp_cmd()
        .arg("compress")
        .arg(&src)
        .arg(src.join("self.ao"))
        .assert()
        .success()
        .stderr(predicate::str::contains(
            "WARNING: Skipping archive (self.ao) inside source folder.",
        ))
        .stdout(predicate::str::contains("Compressed 2 files to '"));
}

#[test]
fn test_compress_rejects_bad_level() {
    let temp = TempDir::new().expect("failed to create temp dir");
    let src = sample_source(&temp);

    aocomp_cmd()
        .arg("compress")
        .arg(&src)
        .arg(temp.path().join("x.ao"))
        .args(["-l", "0"])
        .assert()
        .failure();
}

#[test]
fn test_quiet_suppresses_info() {
    let temp = TempDir::new().expect("failed to create temp dir");
    let src = sample_source(&temp);

    aocomp_cmd()
        .arg("--quiet")
        .arg("compress")
        .arg(&src)
        .arg(temp.path().join("q.ao"))
        .assert()
        .success()
        .stdout(predicate::str::is_empty());
}

#[test]
fn test_decompress_creates_suffixed_directory() {
    let temp = TempDir::new().expect("failed to create temp dir");
    let src = sample_source(&temp);
    let archive = temp.path().join("resources.ao");
    compress(&src, &archive);
    let dest = temp.path().join("dest");
    fs::create_dir(&dest).unwrap();

    aocomp_cmd()
        .arg("decompress")
        .arg(&archive)
        .arg(&dest)
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Starting decompression of 'resources.ao' file...",
        ))
        .stdout(predicate::str::contains("Decompressed 2 files to '"))
        .stdout(predicate::str::contains("resources-decompressed'"))
        .stdout(predicate::str::contains("Last Modified: "))
        .stdout(predicate::str::contains("Decompression successful!"));

    let out = dest.join("resources-decompressed");
    assert_eq!(
        fs::read_to_string(out.join("a.txt")).unwrap(),
        "alpha ".repeat(200)
    );
    assert_eq!(fs::read_to_string(out.join("sub/b.txt")).unwrap(), "beta");
}

#[test]
fn test_decompress_skips_traversal_entry() {
    let temp = TempDir::new().expect("failed to create temp dir");
    let archive = temp.path().join("evil.ao");
    raw_archive(&archive, &[("../evil.txt", b"x"), ("ok.txt", b"fine")]);

    aocomp_cmd()
        .arg("decompress")
        .arg(&archive)
        .arg(temp.path())
        .assert()
        .success()
        .stderr(predicate::str::contains(
            "WARNING: Skipping file (../evil.txt) outside folder.",
        ))
        .stdout(predicate::str::contains("Decompressed 1 file to '"));

    assert!(!temp.path().join("evil.txt").exists());
    assert_eq!(
        fs::read_to_string(temp.path().join("evil-decompressed/ok.txt")).unwrap(),
        "fine"
    );
}

#[test]
fn test_decompress_over_limit_fails_with_hint() {
    let temp = TempDir::new().expect("failed to create temp dir");
    let src = sample_source(&temp);
    let archive = temp.path().join("big.ao");
    compress(&src, &archive);

    aocomp_cmd()
        .arg("decompress")
        .arg(&archive)
        .arg(temp.path())
        .args(["--max-total-size", "100"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("archive too large"))
        .stdout(predicate::str::contains("HINT: Raise --max-total-size"));

    assert!(!temp.path().join("big-decompressed").exists());
}

#[test]
fn test_round_trip_zero_filled_file() {
    let temp = TempDir::new().expect("failed to create temp dir");
    let src = temp.path().join("maps");
    fs::create_dir(&src).unwrap();
    fs::write(src.join("blank.map"), vec![0u8; 8 * 1024 * 1024]).unwrap();
    let archive = temp.path().join("maps.ao");
    compress(&src, &archive);

    aocomp_cmd()
        .arg("decompress")
        .arg(&archive)
        .arg(temp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Decompressed 1 file to '"));

    let restored = fs::metadata(temp.path().join("maps-decompressed/blank.map")).unwrap();
    assert_eq!(restored.len(), 8 * 1024 * 1024);

    aocomp_cmd()
        .arg("decompress")
        .arg(&archive)
        .arg(temp.path().join("guarded"))
        .arg("--guarded")
        .assert()
        .failure()
        .stderr(predicate::str::contains("compression ratio of 'blank.map'"))
        .stdout(predicate::str::contains("HINT: Use --max-compression-ratio"));
}

#[test]
fn test_decompress_missing_archive_fails() {
    let temp = TempDir::new().expect("failed to create temp dir");

    aocomp_cmd()
        .arg("decompress")
        .arg(temp.path().join("none.ao"))
        .arg(temp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("ERROR: Invalid file path."));
}

#[test]
fn test_inspect_prints_entries() {
    let temp = TempDir::new().expect("failed to create temp dir");
    let src = sample_source(&temp);
    let archive = temp.path().join("src.ao");
    compress(&src, &archive);

    aocomp_cmd()
        .arg("inspect")
        .arg(&archive)
        .assert()
        .success()
        .stdout(predicate::str::contains("=== FILE INSPECTION ==="))
        .stdout(predicate::str::contains("File: src.ao"))
        .stdout(predicate::str::contains("=== ARCHIVE CONTENTS ==="))
        .stdout(predicate::str::contains("Total files: 2"))
        .stdout(predicate::str::contains("--- a.txt ---"))
        .stdout(predicate::str::contains("--- sub/b.txt ---"))
        .stdout(predicate::str::contains("Detected type: Unknown"));
}

#[test]
fn test_inspect_not_an_archive_fails() {
    let temp = TempDir::new().expect("failed to create temp dir");
    let bogus = temp.path().join("bogus.ao");
    fs::write(&bogus, "plain text").unwrap();

    aocomp_cmd()
        .arg("inspect")
        .arg(&bogus)
        .assert()
        .failure()
        .stderr(predicate::str::contains("ERROR: Error inspecting file: "));
}

#[test]
fn test_json_compress_output() {
    let temp = TempDir::new().expect("failed to create temp dir");
    let src = sample_source(&temp);

    let output = aocomp_cmd()
        .arg("--json")
        .arg("compress")
        .arg(&src)
        .arg(temp.path().join("j.ao"))
        .output()
        .expect("failed to run aocomp");
    assert!(output.status.success());

    let value: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("stdout is not JSON");
    assert_eq!(value["operation"], "compress");
    assert_eq!(value["status"], "success");
    assert_eq!(value["data"]["count"], 2);
    assert_eq!(value["data"]["message"], "Compression successful!");
    assert!(value["data"]["log"].as_array().is_some_and(|log| !log.is_empty()));
    assert!(value["data"]["details"]["archive_size"].as_u64().unwrap() > 0);
}

#[test]
fn test_json_failure_output() {
    let temp = TempDir::new().expect("failed to create temp dir");

    let output = aocomp_cmd()
        .arg("--json")
        .arg("inspect")
        .arg(temp.path().join("none.ao"))
        .output()
        .expect("failed to run aocomp");
    assert!(!output.status.success());

    let value: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("stdout is not JSON");
    assert_eq!(value["status"], "error");
    assert!(
        value["error"]
            .as_str()
            .unwrap()
            .starts_with("Error inspecting file: ")
    );
}

#[test]
fn test_completion_bash() {
    aocomp_cmd()
        .args(["completion", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("aocomp"));
}
