//! @dose
//! purpose: This module defines the command-line interface for amalgam using the clap derive
//!     macros. Every argument is optional; a bare `amalgam` builds the single header.
//!
//! when-editing:
//!     - !Each command struct must derive Args and be added to the Commands enum
//!     - !Global flags (root, config, verbose) are defined on Cli and propagate to all subcommands
//!     - Flags only override amalgam.toml values; they never change the merge itself
//!
//! invariants:
//!     - A missing subcommand means Build with default arguments
//!     - PathBuf is used for all file/directory path arguments
//!
//! gotchas:
//!     - --output is relative to --root, just like the output key in amalgam.toml
//!     - --root can be placed before or after the subcommand

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "amalgam")]
#[command(author, version, about = "Single-header amalgamation for C libraries")]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to project root (defaults to current directory)
    #[arg(short, long, global = true)]
    pub root: Option<PathBuf>,

    /// Configuration file (defaults to <root>/amalgam.toml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Write the single-header distribution (default)
    Build(BuildArgs),

    /// Verify the single header is up to date without writing it
    Check(CheckArgs),
}

#[derive(Args, Default, Clone)]
pub struct BuildArgs {
    /// Output file, overriding amalgam.toml
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

#[derive(Args, Default, Clone)]
pub struct CheckArgs {
    /// Output file to compare against, overriding amalgam.toml
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

impl Cli {
    /// The subcommand to run, defaulting to Build
    pub fn command_or_default(&self) -> Commands {
        match &self.command {
            Some(Commands::Build(args)) => Commands::Build(args.clone()),
            Some(Commands::Check(args)) => Commands::Check(args.clone()),
            None => Commands::Build(BuildArgs::default()),
        }
    }
}
