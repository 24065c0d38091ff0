//! @dose
//! purpose: The amalgamation pipeline. Reads the public header, the configuration header
//!     and the implementation files, strips guards and self-includes, hoists includes, and
//!     writes one single-header distribution gated behind an implementation flag.
//!
//! when-editing:
//!     - !Every read and every transform happens before the write; a failure anywhere
//!       leaves the destination untouched
//!     - !The write goes through a temp file in the destination directory and a rename
//!     - Implementation files are concatenated in sorted path order for stable output
//!
//! invariants:
//!     - Same inputs produce byte-identical output
//!     - The output opens with the outer guard and closes with `#endif` plus a blank line
//!     - Config body precedes public body so configuration macros are visible to it
//!
//! do-not:
//!     - Never guard-strip implementation files; any guard inside one is opaque text
//!     - Never hoist includes out of the header bodies
//!
//! flows:
//!     - Headers: load, strip guard, ensure trailing newline, drop the config include
//!       from the public body
//!     - Sources: glob, sort, exclude, strip self-include, ensure newline, concatenate
//!     - Merge: hoist includes of the concatenated implementation body
//!     - Emit: render OutputDocument, write atomically

use crate::config::{Config, LineEnding};
use crate::error::{AmalgamError, Result};
use crate::guard::strip_include_guard;
use crate::includes::{hoist_includes, strip_self_include, HoistedIncludes};
use crate::source::{ensure_trailing_newline, SourceDocument};
use std::fmt;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

/// The assembled single header, before line endings are applied
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputDocument {
    pub outer_guard: String,
    pub usage: Vec<String>,
    pub config_body: Vec<String>,
    pub public_body: Vec<String>,
    pub implementation_flag: String,
    pub implementation: HoistedIncludes,
}

impl fmt::Display for OutputDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "#ifndef {}", self.outer_guard)?;
        writeln!(f, "#define {}", self.outer_guard)?;
        for line in self
            .usage
            .iter()
            .chain(&self.config_body)
            .chain(&self.public_body)
        {
            f.write_str(line)?;
        }
        writeln!(f, "#ifdef {}", self.implementation_flag)?;
        for line in self
            .implementation
            .includes
            .iter()
            .chain(&self.implementation.remaining)
        {
            f.write_str(line)?;
        }
        f.write_str("#endif\n\n#endif\n\n")
    }
}

impl OutputDocument {
    /// Render the document with the given line ending
    pub fn render(&self, line_ending: LineEnding) -> String {
        let out = self.to_string();
        match line_ending {
            LineEnding::Lf => out,
            ending => out.replace('\n', ending.as_str()),
        }
    }
}

/// What a completed run produced
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub output: PathBuf,
    pub sources: Vec<PathBuf>,
    pub includes: usize,
    pub bytes: usize,
}

/// Result of comparing a fresh render against the destination file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckStatus {
    UpToDate,
    Stale,
    Missing,
}

pub struct Amalgamator {
    root: PathBuf,
    config: Config,
}

impl Amalgamator {
    pub fn new(root: impl Into<PathBuf>, config: Config) -> Self {
        Self {
            root: root.into(),
            config,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Absolute destination path
    pub fn output_path(&self) -> PathBuf {
        self.resolve(&self.config.output())
    }

    fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.root.join(path)
        }
    }

    /// Load a header and return its body without the include guard
    fn header_body(&self, path: &Path, guard: &str) -> Result<Vec<String>> {
        let doc = SourceDocument::load(&self.resolve(path))?;
        let body = strip_include_guard(guard, &doc.lines).map_err(|source| {
            AmalgamError::MalformedGuard {
                path: doc.path.clone(),
                source,
            }
        })?;
        Ok(ensure_trailing_newline(body))
    }

    /// Implementation files matched by the source glob, minus exclusions, sorted by
    /// their path text (`src/a.c` before `src/a/x.c`)
    pub fn collect_sources(&self) -> Result<Vec<PathBuf>> {
        let pattern = self.source_pattern();
        let exclusions = self.config.exclusions()?;

        let entries = glob::glob(&pattern).map_err(|e| AmalgamError::Pattern {
            pattern: self.config.sources.clone(),
            message: e.to_string(),
        })?;

        let mut sources = Vec::new();
        for entry in entries {
            let path = entry.map_err(|e| AmalgamError::Io {
                path: e.path().to_path_buf(),
                source: e.into_error(),
            })?;
            if !path.is_file() {
                continue;
            }
            let relative = path.strip_prefix(&self.root).unwrap_or(&path);
            if exclusions.as_ref().is_some_and(|set| set.is_match(relative)) {
                tracing::debug!("excluding {}", relative.display());
                continue;
            }
            sources.push(path);
        }

        if sources.is_empty() {
            return Err(AmalgamError::NoSources {
                pattern: self.config.sources.clone(),
            });
        }

        sources.sort_by(|a, b| a.to_string_lossy().cmp(&b.to_string_lossy()));
        Ok(sources)
    }

    /// The source glob anchored at the root; the root itself is matched literally
    fn source_pattern(&self) -> String {
        let sources = Path::new(&self.config.sources);
        if sources.is_absolute() {
            return self.config.sources.clone();
        }
        let root = glob::Pattern::escape(&self.root.to_string_lossy());
        Path::new(&root).join(sources).to_string_lossy().into_owned()
    }

    /// Concatenate implementation files with self-includes removed
    fn implementation_body(&self, sources: &[PathBuf]) -> Result<Vec<String>> {
        let marker = self.config.self_include();
        let config_marker = self.config.config_include();
        let mut combined = Vec::new();
        for path in sources {
            let doc = SourceDocument::load(path)?;
            tracing::debug!("merging {} ({} lines)", path.display(), doc.lines.len());
            let lines = strip_self_include(&marker, doc.lines);
            let lines = strip_self_include(&config_marker, lines);
            combined.extend(ensure_trailing_newline(lines));
        }
        Ok(combined)
    }

    fn usage_comment(&self) -> Vec<String> {
        let output = self.config.output();
        let header_name = output
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| format!("{}.h", self.config.name));
        vec![
            format!("/* A single-header distribution of {}. */\n", self.config.name),
            "/* To use, there must be ONE source file that contains the library implementation: */\n"
                .to_string(),
            format!("/* #define {} */\n", self.config.implementation_flag()),
            format!("/* #include <{}> */\n", header_name),
        ]
    }

    /// Read every input and assemble the output document without writing anything
    pub fn assemble(&self) -> Result<(OutputDocument, Vec<PathBuf>)> {
        // The config body is inlined right above, so its include would dangle
        let public_body = strip_self_include(
            &self.config.config_include(),
            self.header_body(&self.config.public_header(), &self.config.public_guard())?,
        );
        let config_body =
            self.header_body(&self.config.config_header(), &self.config.config_guard())?;

        let sources = self.collect_sources()?;
        let implementation = hoist_includes(self.implementation_body(&sources)?);

        let document = OutputDocument {
            outer_guard: self.config.outer_guard(),
            usage: self.usage_comment(),
            config_body,
            public_body,
            implementation_flag: self.config.implementation_flag(),
            implementation,
        };
        Ok((document, sources))
    }

    /// Render the single header as text
    pub fn render(&self) -> Result<String> {
        let (document, _) = self.assemble()?;
        Ok(document.render(self.config.line_ending))
    }

    /// Build and write the single header
    pub fn run(&self) -> Result<RunSummary> {
        let (document, sources) = self.assemble()?;
        let text = document.render(self.config.line_ending);
        let output = self.output_path();
        write_atomic(&output, &text)?;

        Ok(RunSummary {
            output,
            sources,
            includes: document.implementation.includes.len(),
            bytes: text.len(),
        })
    }

    /// Compare a fresh render against the destination without writing
    pub fn check(&self) -> Result<CheckStatus> {
        let text = self.render()?;
        let output = self.output_path();
        if !output.is_file() {
            return Ok(CheckStatus::Missing);
        }
        let current = fs::read_to_string(&output).map_err(|source| AmalgamError::Io {
            path: output.clone(),
            source,
        })?;
        Ok(if current == text {
            CheckStatus::UpToDate
        } else {
            CheckStatus::Stale
        })
    }
}

/// Replace `path` with `contents` via a sibling temp file and rename
fn write_atomic(path: &Path, contents: &str) -> Result<()> {
    let io_err = |source| AmalgamError::Io {
        path: path.to_path_buf(),
        source,
    };

    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    };
    fs::create_dir_all(&parent).map_err(io_err)?;

    #[cfg_attr(not(unix), allow(unused_mut))]
    let mut builder = tempfile::Builder::new();
    // Same mode as a plain create: 0666 less the umask
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        builder.permissions(fs::Permissions::from_mode(0o666));
    }
    let mut tmp = builder.tempfile_in(&parent).map_err(io_err)?;
    tmp.write_all(contents.as_bytes()).map_err(io_err)?;
    tmp.as_file().sync_all().map_err(io_err)?;

    if let Ok(meta) = fs::metadata(path) {
        tmp.as_file()
            .set_permissions(meta.permissions())
            .map_err(io_err)?;
    }
    tmp.persist(path).map_err(|e| io_err(e.error))?;
    Ok(())
}
