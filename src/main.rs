mod args;
mod dispatcher;
mod error;
mod guard;
mod mode;
mod operation;
mod replacer;
mod scanner;

use anyhow::Result;
use clap::{CommandFactory, Parser};
use std::process;

use args::{Args, Command, Paths};
use error::{DnfError, EXIT_USAGE};
use guard::{ExecutionGuard, FileGuardStore};
use mode::Mode;
use operation::{Operation, NAMED_OPERATIONS};
use scanner::ScanOptions;

/// Main entry point of the application
/// Handles argument parsing and exits with a code matching the failure kind
fn main() {
    let args = Args::parse();

    let Some(command) = args.command.clone() else {
        if let Err(e) = Args::command().print_help() {
            eprintln!("Error: Failed to print help: {}", e);
        }
        println!();
        process::exit(EXIT_USAGE);
    };

    if let Err(e) = run(&args, command) {
        eprintln!("Error: {:#}", e);
        process::exit(error::exit_code_for(&e));
    }
}

/// Validate input, resolve paths, then dispatch
///
/// # Arguments
/// * `args` - Parsed command line arguments
/// * `command` - The command to execute
fn run(args: &Args, command: Command) -> Result<()> {
    match command {
        Command::Rename { mode, old, new } => {
            // Validation happens before any filesystem access
            let mode: Mode = mode.parse()?;
            let operation = Operation::new(mode, old, new)?;

            let paths = args.paths()?;
            let options = scan_options(args, &paths);
            let summary = dispatcher::run_direct(&paths.root, &operation, &options)?;
            report_summary(args, &summary);
        }
        Command::Named(words) => {
            let id = match words.as_slice() {
                [id] => id.clone(),
                _ => return Err(DnfError::InvalidCommandId(words.join(" ")).into()),
            };
            operation::find_named(&id)?;

            let paths = args.paths()?;
            let options = scan_options(args, &paths);
            let mut guard = ExecutionGuard::new(FileGuardStore::new(&paths.state_file));
            let summary = dispatcher::run_named(&paths.root, &id, &mut guard, &options)?;
            report_summary(args, &summary);
        }
        Command::List => {
            let paths = args.paths()?;
            let guard = ExecutionGuard::new(FileGuardStore::new(&paths.state_file));
            let last = guard.last()?;

            println!("Numbered commands:");
            for named in NAMED_OPERATIONS {
                let marker = if last.as_deref() == Some(named.id) { " (last executed)" } else { "" };
                println!("  {} = {}{}", named.id, named.description, marker);
            }
            if last.is_none() {
                println!("No numbered command has been executed yet.");
            }
        }
    }

    Ok(())
}

fn report_summary(args: &Args, summary: &dispatcher::RunSummary) {
    if args.verbose {
        println!(
            "Renamed {} paths, modified {} files, skipped {} non-text files.",
            summary.renamed, summary.modified, summary.undecodable
        );
    }
}

fn scan_options(args: &Args, paths: &Paths) -> ScanOptions {
    ScanOptions {
        exclude: vec![paths.state_file.clone()],
        verbose: args.verbose,
    }
}
