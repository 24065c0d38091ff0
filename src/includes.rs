//! @dose
//! purpose: Include-directive handling for the implementation block: dropping the
//!     library's own public header include and hoisting every other include to a single
//!     sorted, deduplicated block at the top.
//!
//! when-editing:
//!     - !Only the merged implementation body is hoisted; header bodies keep their includes
//!       in place
//!
//! invariants:
//!     - strip_self_include is idempotent
//!     - Non-include lines keep their relative order
//!     - The include block is byte-identical across runs for the same set of inputs
//!
//! gotchas:
//!     - Indented includes inside `#if` blocks are hoisted too; the block is opaque text

use crate::directive::{is_include, Directive};
use std::collections::BTreeSet;

/// Remove every `#include <marker>` / `#include "marker"` line
pub fn strip_self_include(marker: &str, lines: Vec<String>) -> Vec<String> {
    lines
        .into_iter()
        .filter(|line| {
            Directive::parse(line)
                .and_then(|d| d.include_target())
                .is_none_or(|target| target != marker)
        })
        .collect()
}

/// Sorted, deduplicated include lines plus everything else in original order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HoistedIncludes {
    pub includes: Vec<String>,
    pub remaining: Vec<String>,
}

impl HoistedIncludes {
    /// Include block followed by the remaining lines
    pub fn into_lines(self) -> Vec<String> {
        let mut lines = self.includes;
        lines.extend(self.remaining);
        lines
    }
}

/// Partition `lines` into a hoisted include block and the untouched remainder
pub fn hoist_includes(lines: Vec<String>) -> HoistedIncludes {
    let mut includes = BTreeSet::new();
    let mut remaining = Vec::with_capacity(lines.len());

    for line in lines {
        if is_include(&line) {
            includes.insert(format!("{}\n", line.trim()));
        } else {
            remaining.push(line);
        }
    }

    HoistedIncludes {
        includes: includes.into_iter().collect(),
        remaining,
    }
}
