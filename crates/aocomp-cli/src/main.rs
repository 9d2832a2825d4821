//! aocomp - compress directories into `.ao` archives, extract and inspect
//! them.

mod cli;
mod commands;
mod error;
mod logger;
mod output;
mod progress;
mod runner;

use anyhow::Result;
use clap::Parser;
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = cli::Cli::parse();
    logger::init(cli.verbose);

    let mut formatter = output::create_formatter(cli.json, cli.quiet);

    match run(&cli, &mut *formatter) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            formatter.format_error(&e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &cli::Cli, formatter: &mut dyn output::OutputFormatter) -> Result<bool> {
    match &cli.command {
        cli::Commands::Compress(args) => commands::compress::execute(args, formatter),
        cli::Commands::Decompress(args) => commands::decompress::execute(args, formatter),
        cli::Commands::Inspect(args) => commands::inspect::execute(args, formatter),
        cli::Commands::Completion(args) => {
            commands::completion::execute(args.shell);
            Ok(true)
        }
    }
}
