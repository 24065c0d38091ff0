//! @dose
//! purpose: Error taxonomy for an amalgamation run. Every variant is fatal; the run
//!     stops before the output file is touched.
//!
//! invariants:
//!     - Every variant names the file or pattern it concerns
//!     - GuardError carries no path so guard stripping stays a pure function
//!
//! gotchas:
//!     - NoSources is the glob flavour of MissingInput: a pattern that matched nothing

use std::path::PathBuf;
use thiserror::Error;

/// Which part of the include guard triple could not be located
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardPart {
    Open,
    Define,
    Close,
}

impl std::fmt::Display for GuardPart {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GuardPart::Open => write!(f, "#ifndef"),
            GuardPart::Define => write!(f, "#define"),
            GuardPart::Close => write!(f, "#endif"),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GuardError {
    #[error("expected `{expected}` but got `{found}` (line {line})")]
    Mismatch {
        expected: String,
        found: String,
        line: usize,
    },
    #[error("include guard `{guard}` is missing its `{part}` line")]
    Missing { guard: String, part: GuardPart },
}

#[derive(Error, Debug)]
pub enum AmalgamError {
    #[error("malformed include guard in {}", path.display())]
    MalformedGuard {
        path: PathBuf,
        #[source]
        source: GuardError,
    },
    #[error("required input is missing: {}", path.display())]
    MissingInput { path: PathBuf },
    #[error("no implementation files match `{pattern}`")]
    NoSources { pattern: String },
    #[error("invalid glob pattern `{pattern}`: {message}")]
    Pattern { pattern: String, message: String },
    #[error("I/O error on {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {}", path.display())]
    Config {
        path: PathBuf,
        #[source]
        source: Box<toml::de::Error>,
    },
}

pub type Result<T, E = AmalgamError> = std::result::Result<T, E>;
