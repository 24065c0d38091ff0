//! @dose
//! purpose: This is the CLI entry point for amalgam. It parses command-line arguments using
//!     clap, sets up logging, determines the project root, and dispatches to build or check.
//!
//! when-editing:
//!     - !All command handlers are imported from the amalgam crate
//!     - !The root directory defaults to current working directory if not specified
//!     - Error messages are printed to stderr and exit with code 1
//!
//! invariants:
//!     - Running with no arguments builds the single header
//!     - The process exits with 0 on success, 1 on any error
//!
//! do-not:
//!     - Never add business logic here - delegate to command modules
//!
//! gotchas:
//!     - RUST_LOG overrides the level chosen by --verbose

use amalgam::cli::{Cli, Commands};
use amalgam::commands::{run_build, run_check};
use anyhow::Context;
use clap::Parser;
use std::env;
use tracing_subscriber::EnvFilter;

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose {
        "amalgam=debug"
    } else {
        "amalgam=info"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();

    // Determine root directory
    let root = match cli.root.clone() {
        Some(root) => root,
        None => env::current_dir().context("Failed to get current directory")?,
    };
    let config = cli.config.as_deref();

    match cli.command_or_default() {
        Commands::Build(args) => run_build(&args, &root, config),
        Commands::Check(args) => run_check(&args, &root, config),
    }
}
