//! @dose
//! purpose: Implements the build command (also the bare `amalgam` invocation) that writes
//!     the single-header distribution.
//!
//! invariants:
//!     - Nothing is written unless every input was read and stripped successfully
//!
//! flows:
//!     - Configure: load amalgam.toml, apply --output
//!     - Amalgamate: run the pipeline, which writes atomically
//!     - Report: log the destination and what went into it

use super::load_config;
use crate::amalgamator::Amalgamator;
use crate::cli::BuildArgs;
use anyhow::{Context, Result};
use std::path::Path;

pub fn run_build(args: &BuildArgs, root: &Path, config: Option<&Path>) -> Result<()> {
    let config = load_config(root, config, args.output.as_ref())?;
    let amalgamator = Amalgamator::new(root, config);

    let summary = amalgamator
        .run()
        .context("Failed to build single header")?;

    for source in &summary.sources {
        let relative = source.strip_prefix(root).unwrap_or(source);
        tracing::debug!("included {}", relative.display());
    }
    tracing::info!(
        "Wrote {} ({} sources, {} includes, {} bytes)",
        summary.output.display(),
        summary.sources.len(),
        summary.includes,
        summary.bytes
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn write_library(root: &Path) {
        fs::create_dir_all(root.join("include")).unwrap();
        fs::create_dir_all(root.join("src")).unwrap();
        fs::write(
            root.join("include/fig.h"),
            "#ifndef FIG_H\n#define FIG_H\nint fig(void);\n#endif\n",
        )
        .unwrap();
        fs::write(
            root.join("include/fig_config.h"),
            "#ifndef FIG_CONFIG_H\n#define FIG_CONFIG_H\n#define FIG_LOAD_GIF\n#endif\n",
        )
        .unwrap();
        fs::write(
            root.join("src/fig.c"),
            "#include <fig.h>\nint fig(void) { return 0; }\n",
        )
        .unwrap();
    }

    #[test]
    fn test_build_default_output() {
        let temp_dir = TempDir::new().unwrap();
        write_library(temp_dir.path());

        let result = run_build(&BuildArgs::default(), temp_dir.path(), None);
        assert!(result.is_ok());

        let output = fs::read_to_string(temp_dir.path().join("single_header/fig.h")).unwrap();
        assert!(output.starts_with("#ifndef FIG_H\n#define FIG_H\n"));
        assert!(output.contains("int fig(void) { return 0; }\n"));
        assert!(!output.contains("#include <fig.h>\n"));
    }

    #[test]
    fn test_build_output_override() {
        let temp_dir = TempDir::new().unwrap();
        write_library(temp_dir.path());

        let args = BuildArgs {
            output: Some(PathBuf::from("out/fig.h")),
        };
        run_build(&args, temp_dir.path(), None).unwrap();

        assert!(temp_dir.path().join("out/fig.h").exists());
        assert!(!temp_dir.path().join("single_header").exists());
    }

    #[test]
    fn test_build_with_config_file() {
        let temp_dir = TempDir::new().unwrap();
        write_library(temp_dir.path());
        let config_path = temp_dir.path().join("custom.toml");
        fs::write(&config_path, "implementation_flag = \"FIG_IMPL\"\n").unwrap();

        run_build(&BuildArgs::default(), temp_dir.path(), Some(&config_path)).unwrap();

        let output = fs::read_to_string(temp_dir.path().join("single_header/fig.h")).unwrap();
        assert!(output.contains("#ifdef FIG_IMPL\n"));
    }

    #[test]
    fn test_build_missing_config_file_fails() {
        let temp_dir = TempDir::new().unwrap();
        write_library(temp_dir.path());
        let config_path = temp_dir.path().join("missing.toml");

        let result = run_build(&BuildArgs::default(), temp_dir.path(), Some(&config_path));
        assert!(result.is_err());
    }

    #[test]
    fn test_build_missing_public_header_fails() {
        let temp_dir = TempDir::new().unwrap();
        write_library(temp_dir.path());
        fs::remove_file(temp_dir.path().join("include/fig.h")).unwrap();

        let err = run_build(&BuildArgs::default(), temp_dir.path(), None).unwrap_err();
        assert!(format!("{:#}", err).contains("fig.h"));
        assert!(!temp_dir.path().join("single_header").exists());
    }
}
