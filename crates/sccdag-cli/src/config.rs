//! `sccdag.toml` loading and environment overrides.
//!
//! Every field carries a serde default, so a missing file, an empty file or a
//! file with only some sections all load. Precedence for each setting is
//! flag > environment > file > built-in default; flags are applied by the
//! command handlers, this module covers the rest.

use std::env;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use sccdag_core::{AnalysisOptions, ParallelEdgePolicy};
use serde::{Deserialize, Serialize};

use crate::output::OutputMode;

/// File looked up in the working directory when `--config` is absent.
pub const DEFAULT_CONFIG_FILE: &str = "sccdag.toml";

/// Environment variable overriding `[analysis] parallel_edges`.
pub const PARALLEL_EDGES_ENV: &str = "SCCDAG_PARALLEL_EDGES";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub analysis: AnalysisOptions,
    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Preferred output mode; TTY detection decides when unset.
    #[serde(default)]
    pub format: Option<OutputMode>,
    /// Indent JSON reports.
    #[serde(default = "default_true")]
    pub pretty_json: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: None,
            pretty_json: default_true(),
        }
    }
}

/// Load the config from `explicit`, or from `sccdag.toml` under `cwd` if it
/// exists, then apply environment overrides.
///
/// An explicit path that does not exist is an error; a missing default file
/// is not.
pub fn load_config(explicit: Option<&Path>, cwd: &Path) -> Result<Config> {
    let mut config = match explicit {
        Some(path) => read_config(path)?,
        None => {
            let path = cwd.join(DEFAULT_CONFIG_FILE);
            if path.exists() {
                read_config(&path)?
            } else {
                Config::default()
            }
        }
    };

    apply_env(&mut config, env::var(PARALLEL_EDGES_ENV).ok().as_deref())?;
    Ok(config)
}

fn read_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    toml::from_str::<Config>(&content)
        .with_context(|| format!("Failed to parse {}", path.display()))
}

fn apply_env(config: &mut Config, parallel_edges: Option<&str>) -> Result<()> {
    if let Some(raw) = parallel_edges {
        config.analysis.parallel_edges = raw
            .parse::<ParallelEdgePolicy>()
            .with_context(|| format!("invalid {PARALLEL_EDGES_ENV}"))?;
    }
    Ok(())
}

/// Path of the config file that [`load_config`] would read, if any.
pub fn config_path(explicit: Option<&Path>, cwd: &Path) -> Option<PathBuf> {
    explicit.map(Path::to_path_buf).or_else(|| {
        let path = cwd.join(DEFAULT_CONFIG_FILE);
        path.exists().then_some(path)
    })
}

const fn default_true() -> bool {
    true
}
