//! Configuration loading from a TOML file.
//!
//! Every key is optional; command-line flags override the file, and the file
//! overrides built-in defaults.
//!
//! ```toml
//! [source]
//! topology = "topology.json"
//! strategies = "strategies.json"
//!
//! [search]
//! mode = "exhaustive"
//! max_paths = 10000
//!
//! [output]
//! format = "text"
//! ```

use std::ops::RangeInclusive;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use strategy_paths_core::SearchMode;

use crate::output::OutputFormat;

/// Accepted values for `max_paths`, from the config file or `--max-paths`.
pub const MAX_PATHS_RANGE: RangeInclusive<usize> = 1..=1_000_000;

#[derive(Debug, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub source: SourceSection,
    #[serde(default)]
    pub search: SearchSection,
    #[serde(default)]
    pub output: OutputSection,
}

/// Descriptor file locations. Relative paths are taken from the config
/// file's directory.
#[derive(Debug, Deserialize, Default)]
pub struct SourceSection {
    #[serde(default)]
    pub topology: Option<PathBuf>,
    #[serde(default)]
    pub strategies: Option<PathBuf>,
}

#[derive(Debug, Deserialize, Default)]
pub struct SearchSection {
    /// Default mode for the `search` command.
    #[serde(default)]
    pub mode: Option<SearchMode>,
    /// Cap on paths collected per `search`. Absent means unlimited.
    #[serde(default)]
    pub max_paths: Option<usize>,
}

#[derive(Debug, Deserialize, Default)]
pub struct OutputSection {
    #[serde(default)]
    pub format: Option<OutputFormat>,
}

impl Config {
    /// Load and validate a config file. Unlike descriptor discovery, a config
    /// file named on the command line must exist and parse.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        let base = path.parent().unwrap_or_else(|| Path::new(""));
        Self::from_toml_str(&content, base)
            .with_context(|| format!("invalid config file {}", path.display()))
    }

    pub fn from_toml_str(content: &str, base: &Path) -> Result<Self> {
        let mut config: Config = toml::from_str(content)?;

        if let Some(max) = config.search.max_paths {
            check_max_paths(max)?;
        }

        config.source.topology = config.source.topology.map(|p| base.join(p));
        config.source.strategies = config.source.strategies.map(|p| base.join(p));

        tracing::debug!(?config, "config loaded");
        Ok(config)
    }
}

fn check_max_paths(value: usize) -> Result<()> {
    if !MAX_PATHS_RANGE.contains(&value) {
        bail!(
            "max_paths must be between {} and {}, got {}",
            MAX_PATHS_RANGE.start(),
            MAX_PATHS_RANGE.end(),
            value
        );
    }
    Ok(())
}

/// clap value parser for `--max-paths`.
pub fn parse_max_paths(s: &str) -> std::result::Result<usize, String> {
    let value: usize = s
        .parse()
        .map_err(|_| format!("'{}' is not a valid path count", s))?;
    check_max_paths(value).map_err(|e| e.to_string())?;
    Ok(value)
}

/// Effective settings after layering flags over the config file.
#[derive(Debug)]
pub struct Settings {
    pub topology: Option<PathBuf>,
    pub strategies: Option<PathBuf>,
    pub format: OutputFormat,
    pub mode: SearchMode,
    pub max_paths: Option<usize>,
}

/// Command-line values that take precedence over the config file.
#[derive(Debug, Default)]
pub struct Overrides {
    pub topology: Option<PathBuf>,
    pub strategies: Option<PathBuf>,
    pub format: Option<OutputFormat>,
    pub mode: Option<SearchMode>,
    pub max_paths: Option<usize>,
}

impl Settings {
    pub fn layer(config: Config, flags: Overrides) -> Self {
        Self {
            topology: flags.topology.or(config.source.topology),
            strategies: flags.strategies.or(config.source.strategies),
            format: flags.format.or(config.output.format).unwrap_or_default(),
            mode: flags.mode.or(config.search.mode).unwrap_or_default(),
            max_paths: flags.max_paths.or(config.search.max_paths),
        }
    }

    pub fn topology_path(&self) -> Result<&Path> {
        self.topology
            .as_deref()
            .context("no topology file: pass --topology or set [source] topology in the config")
    }

    pub fn strategies_path(&self) -> Result<&Path> {
        self.strategies
            .as_deref()
            .context("no strategy file: pass --strategies or set [source] strategies in the config")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = Config::from_toml_str("", Path::new("/etc")).unwrap();
        let settings = Settings::layer(config, Overrides::default());
        assert!(settings.topology.is_none());
        assert_eq!(settings.format, OutputFormat::Text);
        assert_eq!(settings.mode, SearchMode::Exhaustive);
        assert_eq!(settings.max_paths, None);
        assert!(settings.topology_path().is_err());
    }

    #[test]
    fn test_full_config() {
        let text = r#"
            [source]
            topology = "topology.json"
            strategies = "/abs/strategies.json"

            [search]
            mode = "bfs"
            max_paths = 50

            [output]
            format = "json"
        "#;
        let config = Config::from_toml_str(text, Path::new("/srv/paths")).unwrap();
        assert_eq!(config.source.topology, Some(PathBuf::from("/srv/paths/topology.json")));
        assert_eq!(config.source.strategies, Some(PathBuf::from("/abs/strategies.json")));

        let settings = Settings::layer(config, Overrides::default());
        assert_eq!(settings.mode, SearchMode::FirstFound);
        assert_eq!(settings.max_paths, Some(50));
        assert_eq!(settings.format, OutputFormat::Json);
    }

    #[test]
    fn test_flags_override_config() {
        let text = r#"
            [source]
            topology = "a.json"
            [search]
            mode = "first-found"
            [output]
            format = "json"
        "#;
        let config = Config::from_toml_str(text, Path::new("")).unwrap();
        let flags = Overrides {
            topology: Some(PathBuf::from("b.json")),
            format: Some(OutputFormat::Text),
            mode: Some(SearchMode::Exhaustive),
            ..Overrides::default()
        };
        let settings = Settings::layer(config, flags);
        assert_eq!(settings.topology_path().unwrap(), Path::new("b.json"));
        assert_eq!(settings.format, OutputFormat::Text);
        assert_eq!(settings.mode, SearchMode::Exhaustive);
    }

    #[test]
    fn test_max_paths_out_of_range() {
        let err = Config::from_toml_str("[search]\nmax_paths = 0", Path::new("")).unwrap_err();
        assert!(err.to_string().contains("max_paths"));
        assert!(Config::from_toml_str("[search]\nmax_paths = 1000001", Path::new("")).is_err());
        assert!(Config::from_toml_str("[search]\nmax_paths = 1000000", Path::new("")).is_ok());
    }

    #[test]
    fn test_invalid_mode_rejected() {
        assert!(Config::from_toml_str("[search]\nmode = \"sideways\"", Path::new("")).is_err());
    }

    #[test]
    fn test_parse_max_paths_flag() {
        assert_eq!(parse_max_paths("10"), Ok(10));
        assert!(parse_max_paths("0").is_err());
        assert!(parse_max_paths("ten").is_err());
    }

    #[test]
    fn test_load_missing_file() {
        let err = Config::load(Path::new("/nonexistent/strategy-paths.toml")).unwrap_err();
        assert!(err.to_string().contains("failed to read config file"));
    }
}
