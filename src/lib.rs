//! @dose
//! purpose: Library crate root for amalgam, which packages a C library (public header,
//!     configuration header, implementation files) into one single-header distribution
//!     whose implementation is gated behind an opt-in macro.
//!
//! when-editing:
//!     - !All public modules must be declared here with pub mod
//!     - Keep the re-export list organized by module
//!
//! invariants:
//!     - The merge modules (directive, guard, includes, source) do no I/O beyond
//!       SourceDocument::load; everything else is pure over lines
//!
//! gotchas:
//!     - The lib.rs is separate from main.rs - library consumers get lib, CLI gets main

pub mod amalgamator;
pub mod cli;
pub mod commands;
pub mod config;
pub mod directive;
pub mod error;
pub mod guard;
pub mod includes;
pub mod source;

// Re-export main types for convenience
pub use amalgamator::{Amalgamator, CheckStatus, OutputDocument, RunSummary};
pub use cli::{BuildArgs, CheckArgs, Cli, Commands};
pub use config::{Config, LineEnding};
pub use error::{AmalgamError, GuardError, GuardPart};
pub use guard::{strip_include_guard, IncludeGuardSpan};
pub use includes::{hoist_includes, strip_self_include, HoistedIncludes};
pub use source::{ensure_trailing_newline, SourceDocument};
