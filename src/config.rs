//! @dose
//! purpose: Configuration file parsing for amalgam.toml. Names the library's inputs,
//!     guard symbols, implementation flag and output path; everything has a default
//!     derived from the library name.
//!
//! when-editing:
//!     - !Config is loaded once at startup and moved into the Amalgamator
//!     - !Unset fields are derived from `name`; add new fields as Option with an accessor
//!     - Exclusion patterns are matched against paths relative to the project root
//!
//! invariants:
//!     - Config::load returns the default config if amalgam.toml doesn't exist
//!     - A present but unparseable amalgam.toml is an error, never a silent fallback
//!
//! gotchas:
//!     - The default layout is include/<name>.h, include/<name>_config.h, src/*.c
//!     - outer_guard defaults to the public header's guard, so the single header is a
//!       drop-in replacement for the public one

use crate::error::{AmalgamError, Result};
use globset::{Glob, GlobSet, GlobSetBuilder};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

pub const CONFIG_FILE: &str = "amalgam.toml";

/// Output line terminator
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LineEnding {
    #[default]
    Lf,
    Crlf,
}

impl LineEnding {
    pub fn as_str(self) -> &'static str {
        match self {
            LineEnding::Lf => "\n",
            LineEnding::Crlf => "\r\n",
        }
    }
}

/// Main configuration structure matching amalgam.toml
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct Config {
    /// Library name, used for default paths and symbols
    pub name: String,

    /// Public header, relative to root
    pub public_header: Option<PathBuf>,

    /// Guard symbol of the public header
    pub public_guard: Option<String>,

    /// Private configuration header, relative to root
    pub config_header: Option<PathBuf>,

    /// Guard symbol of the configuration header
    pub config_guard: Option<String>,

    /// Glob selecting implementation files, relative to root
    pub sources: String,

    /// Implementation files to leave out (glob patterns)
    pub exclude: Vec<String>,

    /// Destination of the single header, relative to root
    pub output: Option<PathBuf>,

    /// Guard wrapping the whole single header
    pub outer_guard: Option<String>,

    /// Macro a consumer defines to compile the implementation
    pub implementation_flag: Option<String>,

    /// Include target treated as the library including itself
    pub self_include: Option<String>,

    /// Include target of the configuration header, inlined ahead of the public body
    pub config_include: Option<String>,

    pub line_ending: LineEnding,
}

impl Default for Config {
    fn default() -> Self {
        Self::named("fig")
    }
}

impl Config {
    /// Default configuration for the library `name`
    pub fn named(name: &str) -> Self {
        Self {
            name: name.to_string(),
            public_header: None,
            public_guard: None,
            config_header: None,
            config_guard: None,
            sources: "src/*.c".to_string(),
            exclude: Vec::new(),
            output: None,
            outer_guard: None,
            implementation_flag: None,
            self_include: None,
            config_include: None,
            line_ending: LineEnding::Lf,
        }
    }

    /// Load configuration from amalgam.toml in the given root directory
    pub fn load(root: &Path) -> Result<Self> {
        Self::load_from(&root.join(CONFIG_FILE))
    }

    /// Load configuration from an explicit file; a missing file yields defaults
    pub fn load_from(config_path: &Path) -> Result<Self> {
        if !config_path.exists() {
            tracing::debug!("{} not found, using defaults", config_path.display());
            return Ok(Self::default());
        }

        let content = fs::read_to_string(config_path).map_err(|source| AmalgamError::Io {
            path: config_path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| AmalgamError::Config {
            path: config_path.to_path_buf(),
            source: Box::new(source),
        })
    }

    fn upper(&self) -> String {
        self.name.to_ascii_uppercase().replace(['-', '.'], "_")
    }

    pub fn public_header(&self) -> PathBuf {
        self.public_header
            .clone()
            .unwrap_or_else(|| PathBuf::from(format!("include/{}.h", self.name)))
    }

    pub fn public_guard(&self) -> String {
        self.public_guard
            .clone()
            .unwrap_or_else(|| format!("{}_H", self.upper()))
    }

    pub fn config_header(&self) -> PathBuf {
        self.config_header
            .clone()
            .unwrap_or_else(|| PathBuf::from(format!("include/{}_config.h", self.name)))
    }

    pub fn config_guard(&self) -> String {
        self.config_guard
            .clone()
            .unwrap_or_else(|| format!("{}_CONFIG_H", self.upper()))
    }

    pub fn output(&self) -> PathBuf {
        self.output
            .clone()
            .unwrap_or_else(|| PathBuf::from(format!("single_header/{}.h", self.name)))
    }

    pub fn outer_guard(&self) -> String {
        self.outer_guard.clone().unwrap_or_else(|| self.public_guard())
    }

    pub fn implementation_flag(&self) -> String {
        self.implementation_flag
            .clone()
            .unwrap_or_else(|| format!("{}_IMPLEMENTATION", self.upper()))
    }

    /// Include target stripped from implementation files; defaults to the public
    /// header's file name
    pub fn self_include(&self) -> String {
        self.self_include.clone().unwrap_or_else(|| {
            self.public_header()
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| format!("{}.h", self.name))
        })
    }

    /// Include target of the configuration header; defaults to its file name
    pub fn config_include(&self) -> String {
        self.config_include.clone().unwrap_or_else(|| {
            self.config_header()
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| format!("{}_config.h", self.name))
        })
    }

    /// Compile the exclusion patterns
    pub fn exclusions(&self) -> Result<Option<GlobSet>> {
        if self.exclude.is_empty() {
            return Ok(None);
        }

        let mut builder = GlobSetBuilder::new();
        for pattern in &self.exclude {
            let glob = Glob::new(pattern).map_err(|e| AmalgamError::Pattern {
                pattern: pattern.clone(),
                message: e.to_string(),
            })?;
            builder.add(glob);
        }

        builder
            .build()
            .map(Some)
            .map_err(|e| AmalgamError::Pattern {
                pattern: self.exclude.join(", "),
                message: e.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.name, "fig");
        assert_eq!(config.public_header(), PathBuf::from("include/fig.h"));
        assert_eq!(config.public_guard(), "FIG_H");
        assert_eq!(config.config_header(), PathBuf::from("include/fig_config.h"));
        assert_eq!(config.config_guard(), "FIG_CONFIG_H");
        assert_eq!(config.sources, "src/*.c");
        assert_eq!(config.output(), PathBuf::from("single_header/fig.h"));
        assert_eq!(config.outer_guard(), "FIG_H");
        assert_eq!(config.implementation_flag(), "FIG_IMPLEMENTATION");
        assert_eq!(config.self_include(), "fig.h");
        assert_eq!(config.config_include(), "fig_config.h");
        assert_eq!(config.line_ending, LineEnding::Lf);
        assert!(config.exclude.is_empty());
    }

    #[test]
    fn test_load_missing_config() {
        let temp_dir = TempDir::new().unwrap();
        let config = Config::load(temp_dir.path()).unwrap();
        assert_eq!(config.name, "fig");
    }

    #[test]
    fn test_load_name_only_derives_everything() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join(CONFIG_FILE), "name = \"tiny-gif\"\n").unwrap();

        let config = Config::load(temp_dir.path()).unwrap();
        assert_eq!(config.public_header(), PathBuf::from("include/tiny-gif.h"));
        assert_eq!(config.public_guard(), "TINY_GIF_H");
        assert_eq!(config.config_guard(), "TINY_GIF_CONFIG_H");
        assert_eq!(config.implementation_flag(), "TINY_GIF_IMPLEMENTATION");
        assert_eq!(config.self_include(), "tiny-gif.h");
    }

    #[test]
    fn test_load_full_config() {
        let temp_dir = TempDir::new().unwrap();
        let config_content = r#"
name = "fig"
public_header = "inc/fig_public.h"
public_guard = "FIG_PUBLIC_H"
config_header = "inc/cfg.h"
config_guard = "CFG_H"
sources = "lib/**/*.c"
exclude = ["lib/test_*.c"]
output = "dist/fig.h"
outer_guard = "FIG_SINGLE_H"
implementation_flag = "FIG_IMPL"
self_include = "fig/fig.h"
config_include = "fig/cfg.h"
line_ending = "crlf"
"#;
        fs::write(temp_dir.path().join(CONFIG_FILE), config_content).unwrap();

        let config = Config::load(temp_dir.path()).unwrap();
        assert_eq!(config.public_header(), PathBuf::from("inc/fig_public.h"));
        assert_eq!(config.public_guard(), "FIG_PUBLIC_H");
        assert_eq!(config.config_header(), PathBuf::from("inc/cfg.h"));
        assert_eq!(config.config_guard(), "CFG_H");
        assert_eq!(config.sources, "lib/**/*.c");
        assert_eq!(config.exclude, vec!["lib/test_*.c"]);
        assert_eq!(config.output(), PathBuf::from("dist/fig.h"));
        assert_eq!(config.outer_guard(), "FIG_SINGLE_H");
        assert_eq!(config.implementation_flag(), "FIG_IMPL");
        assert_eq!(config.self_include(), "fig/fig.h");
        assert_eq!(config.config_include(), "fig/cfg.h");
        assert_eq!(config.line_ending, LineEnding::Crlf);
    }

    #[test]
    fn test_self_include_follows_public_header() {
        let config = Config {
            public_header: Some(PathBuf::from("include/other.h")),
            ..Config::default()
        };
        assert_eq!(config.self_include(), "other.h");
    }

    #[test]
    fn test_load_invalid_config_is_error() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join(CONFIG_FILE), "name = [\n").unwrap();

        let err = Config::load(temp_dir.path()).unwrap_err();
        assert!(matches!(err, AmalgamError::Config { .. }));
    }

    #[test]
    fn test_load_unknown_line_ending_is_error() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join(CONFIG_FILE), "line_ending = \"cr\"\n").unwrap();

        assert!(Config::load(temp_dir.path()).is_err());
    }

    #[test]
    fn test_exclusions() {
        let config = Config::default();
        assert!(config.exclusions().unwrap().is_none());

        let config = Config {
            exclude: vec!["src/*_test.c".to_string()],
            ..Config::default()
        };
        let set = config.exclusions().unwrap().unwrap();
        assert!(set.is_match("src/fig_test.c"));
        assert!(!set.is_match("src/fig.c"));

        let config = Config {
            exclude: vec!["src/[".to_string()],
            ..Config::default()
        };
        assert!(matches!(
            config.exclusions(),
            Err(AmalgamError::Pattern { .. })
        ));
    }
}
