//! @dose
//! purpose: Implements the check command that renders the single header in memory and
//!     compares it with the file on disk, for CI jobs that want to catch a stale header.
//!
//! invariants:
//!     - check never writes or modifies the destination
//!     - A missing destination counts as out of date

use super::load_config;
use crate::amalgamator::{Amalgamator, CheckStatus};
use crate::cli::CheckArgs;
use anyhow::{Context, Result};
use std::path::Path;

pub fn run_check(args: &CheckArgs, root: &Path, config: Option<&Path>) -> Result<()> {
    let config = load_config(root, config, args.output.as_ref())?;
    let amalgamator = Amalgamator::new(root, config);
    let output = amalgamator.output_path();

    let status = amalgamator
        .check()
        .context("Failed to render single header")?;

    match status {
        CheckStatus::UpToDate => {
            tracing::info!("{} is up to date", output.display());
            Ok(())
        }
        CheckStatus::Stale => anyhow::bail!(
            "{} is out of date; run `amalgam build` to regenerate it",
            output.display()
        ),
        CheckStatus::Missing => anyhow::bail!(
            "{} does not exist; run `amalgam build` to create it",
            output.display()
        ),
    }
}
