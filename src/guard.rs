//! @dose
//! purpose: Locates a header's include guard (`#ifndef G` / `#define G` / final `#endif`)
//!     and returns the body between them with the scaffolding removed.
//!
//! when-editing:
//!     - !The scan is an explicit three-state machine; keep inference out of line shape
//!     - !The LAST `#endif` closes the guard so nested conditionals in the body survive
//!
//! invariants:
//!     - open < define < close for every span returned
//!     - The `#define` is the first directive after the `#ifndef`; blank and comment
//!       lines in between are dropped along with the guard
//!     - A missing or mismatched part is an error, never an empty body
//!
//! gotchas:
//!     - Last-endif-wins also accepts a file with two top-level guarded blocks; the
//!       second block's content then lands in the body. This is a known looseness.

use crate::directive::Directive;
use crate::error::{GuardError, GuardPart};

/// Line positions of a header's include guard
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IncludeGuardSpan {
    pub open: usize,
    pub define: usize,
    pub close: usize,
}

enum ScanState {
    Searching,
    Opened { open: usize },
    Defined { open: usize, define: usize },
}

impl IncludeGuardSpan {
    /// Scan `lines` for the guard named `guard`
    pub fn find(guard: &str, lines: &[String]) -> Result<Self, GuardError> {
        let mut state = ScanState::Searching;
        let mut last_close = None;

        for (index, line) in lines.iter().enumerate() {
            let Some(directive) = Directive::parse(line) else {
                continue;
            };

            state = match state {
                ScanState::Searching if directive.is("ifndef") => {
                    if directive.symbol() != Some(guard) {
                        return Err(mismatch("#ifndef", guard, line, index));
                    }
                    ScanState::Opened { open: index }
                }
                ScanState::Searching => ScanState::Searching,
                ScanState::Opened { open } => {
                    if !directive.is("define") || directive.symbol() != Some(guard) {
                        return Err(mismatch("#define", guard, line, index));
                    }
                    ScanState::Defined {
                        open,
                        define: index,
                    }
                }
                ScanState::Defined { open, define } => {
                    if directive.is("endif") {
                        last_close = Some(index);
                    }
                    ScanState::Defined { open, define }
                }
            };
        }

        let missing = |part| GuardError::Missing {
            guard: guard.to_string(),
            part,
        };
        match state {
            ScanState::Searching => Err(missing(GuardPart::Open)),
            ScanState::Opened { .. } => Err(missing(GuardPart::Define)),
            ScanState::Defined { open, define } => {
                let close = last_close.ok_or_else(|| missing(GuardPart::Close))?;
                Ok(Self {
                    open,
                    define,
                    close,
                })
            }
        }
    }

    /// Lines strictly between the guard define and the guard close
    pub fn body<'a>(&self, lines: &'a [String]) -> &'a [String] {
        &lines[self.define + 1..self.close]
    }
}

fn mismatch(directive: &str, guard: &str, line: &str, index: usize) -> GuardError {
    GuardError::Mismatch {
        expected: format!("{} {}", directive, guard),
        found: line.trim().to_string(),
        line: index + 1,
    }
}

/// Strip the include guard named `guard` from `lines`, returning the guarded body
pub fn strip_include_guard(guard: &str, lines: &[String]) -> Result<Vec<String>, GuardError> {
    let span = IncludeGuardSpan::find(guard, lines)?;
    Ok(span.body(lines).to_vec())
}
