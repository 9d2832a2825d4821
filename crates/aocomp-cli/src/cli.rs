//! CLI argument parsing using clap.

use clap::Parser;
use clap::Subcommand;
use clap_complete::Shell;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "aocomp")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable debug logging of archive internals
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress informational output
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Output results in JSON format
    #[arg(short, long, global = true)]
    pub json: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Compress a directory into an .ao archive
    Compress(CompressArgs),
    /// Extract an .ao archive into <DEST_DIR>/<name>-decompressed
    Decompress(DecompressArgs),
    /// Show archive metadata, entry sizes, digests and content types
    Inspect(InspectArgs),
    /// Generate shell completions
    Completion(CompletionArgs),
}

#[derive(clap::Args)]
pub struct CompressArgs {
    /// Directory to compress
    #[arg(value_name = "SRC_DIR")]
    pub source: PathBuf,

    /// Output archive path (".ao" is appended when missing)
    #[arg(value_name = "OUT")]
    pub output: PathBuf,

    /// Compression level (1-9)
    #[arg(short = 'l', long, value_parser = clap::value_parser!(u8).range(1..=9))]
    pub compression_level: Option<u8>,

    /// Do not store Unix permission bits
    #[arg(long)]
    pub no_permissions: bool,
}

#[derive(clap::Args)]
pub struct DecompressArgs {
    /// Archive to extract
    #[arg(value_name = "ARCHIVE")]
    pub archive: PathBuf,

    /// Destination directory (default: current directory)
    #[arg(value_name = "DEST_DIR")]
    pub dest_dir: Option<PathBuf>,

    /// Maximum total extracted size (suffixes K, M, G, T)
    #[arg(long, value_parser = parse_byte_size)]
    pub max_total_size: Option<u64>,

    /// Maximum expansion ratio of a single entry
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
    pub max_compression_ratio: Option<u32>,

    /// Apply limits for untrusted archives (4G total, ratio 1000)
    #[arg(long)]
    pub guarded: bool,
}

#[derive(clap::Args)]
pub struct InspectArgs {
    /// Archive to inspect
    #[arg(value_name = "ARCHIVE")]
    pub archive: PathBuf,
}

#[derive(clap::Args)]
pub struct CompletionArgs {
    /// Target shell
    #[arg(value_enum)]
    pub shell: Shell,
}

/// Parse byte size with optional suffix (K, M, G, T)
#[allow(clippy::option_if_let_else)]
fn parse_byte_size(s: &str) -> Result<u64, String> {
    let s = s.trim();
    if s.is_empty() {
        return Err("empty byte size".to_string());
    }

    let upper = s.to_ascii_uppercase();
    let (num_str, multiplier) = if let Some(stripped) = upper.strip_suffix('T') {
        (stripped, 1024_u64.pow(4))
    } else if let Some(stripped) = upper.strip_suffix('G') {
        (stripped, 1024_u64.pow(3))
    } else if let Some(stripped) = upper.strip_suffix('M') {
        (stripped, 1024_u64.pow(2))
    } else if let Some(stripped) = upper.strip_suffix('K') {
        (stripped, 1024)
    } else {
        (upper.as_str(), 1)
    };

    num_str
        .parse::<u64>()
        .map_err(|_| format!("invalid byte size: {s}"))
        .and_then(|n| {
            n.checked_mul(multiplier)
                .ok_or_else(|| format!("byte size overflow: {s}"))
        })
}
