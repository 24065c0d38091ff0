//! @dose
//! purpose: Loads an input file as a SourceDocument: an ordered list of lines, each
//!     keeping its `\n` terminator so bodies can be concatenated back verbatim.
//!
//! invariants:
//!     - `\r\n` is normalized to `\n` on read; the writer decides the output line ending
//!     - Every line but the last ends with `\n`
//!
//! gotchas:
//!     - A missing file is MissingInput, not Io, so the message says what was expected

use crate::error::{AmalgamError, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// One input file split into lines
#[derive(Debug, Clone)]
pub struct SourceDocument {
    pub path: PathBuf,
    pub lines: Vec<String>,
}

impl SourceDocument {
    /// Read a document from disk
    pub fn load(path: &Path) -> Result<Self> {
        if !path.is_file() {
            return Err(AmalgamError::MissingInput {
                path: path.to_path_buf(),
            });
        }
        let text = fs::read_to_string(path).map_err(|source| AmalgamError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::debug!("read {} ({} bytes)", path.display(), text.len());
        Ok(Self::from_text(path, &text))
    }

    /// Build a document from in-memory text
    pub fn from_text(path: impl Into<PathBuf>, text: &str) -> Self {
        Self {
            path: path.into(),
            lines: split_lines(text),
        }
    }
}

/// Split text into lines that keep their terminator, normalizing CRLF to LF
pub fn split_lines(text: &str) -> Vec<String> {
    text.replace("\r\n", "\n")
        .split_inclusive('\n')
        .map(str::to_string)
        .collect()
}

/// Give the last line a `\n` if it lacks one, so the next body cannot fuse onto it
pub fn ensure_trailing_newline(mut lines: Vec<String>) -> Vec<String> {
    if let Some(last) = lines.last_mut() {
        if !last.ends_with('\n') {
            last.push('\n');
        }
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_split_lines_keeps_terminators() {
        let lines = split_lines("a\nb\nc");
        assert_eq!(lines, vec!["a\n", "b\n", "c"]);
    }

    #[test]
    fn test_split_lines_normalizes_crlf() {
        let lines = split_lines("#ifndef X\r\n#define X\r\n#endif\r\n");
        assert_eq!(lines, vec!["#ifndef X\n", "#define X\n", "#endif\n"]);
    }

    #[test]
    fn test_split_lines_empty() {
        assert!(split_lines("").is_empty());
    }

    #[test]
    fn test_ensure_trailing_newline() {
        let lines = ensure_trailing_newline(vec!["a\n".to_string(), "b".to_string()]);
        assert_eq!(lines, vec!["a\n", "b\n"]);

        // Already terminated
        let lines = ensure_trailing_newline(vec!["a\n".to_string()]);
        assert_eq!(lines, vec!["a\n"]);

        // Empty input is a no-op
        assert!(ensure_trailing_newline(Vec::new()).is_empty());
    }

    #[test]
    fn test_load_missing_file() {
        let temp_dir = TempDir::new().unwrap();
        let err = SourceDocument::load(&temp_dir.path().join("nope.h")).unwrap_err();
        assert!(matches!(err, AmalgamError::MissingInput { .. }));
    }

    #[test]
    fn test_load_reads_lines() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("a.c");
        fs::write(&path, "int a;\nint b;\n").unwrap();

        let doc = SourceDocument::load(&path).unwrap();
        assert_eq!(doc.path, path);
        assert_eq!(doc.lines, vec!["int a;\n", "int b;\n"]);
    }
}
