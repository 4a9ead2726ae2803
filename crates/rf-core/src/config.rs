//! Configuration types and parsing for raflow.yml

use crate::error::{CoreError, CoreResult};
use crate::schema::SchemaDirectory;
use crate::serde_helpers::default_true;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Main project configuration from raflow.yml
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Project name
    pub name: String,

    /// Where stage outputs are materialized
    #[serde(default)]
    pub environment: ExecEnv,

    /// Directory holding base datasets (`<relation>.json`) and, for the
    /// local environment, intermediate `tmp<stage>.tmp` files
    #[serde(default = "default_data_path")]
    pub data_path: String,

    /// Optimizer settings
    #[serde(default)]
    pub optimize: OptimizeConfig,

    /// Schema directory: relation -> attribute names
    #[serde(default)]
    pub schema: HashMap<String, Vec<String>>,

    /// Result output format for the CLI
    #[serde(default)]
    pub output: OutputFormat,
}

/// Execution environment selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ExecEnv {
    /// Read and write files under `data_path`
    #[default]
    Local,
    /// Keep everything in an in-memory store (tests, dry runs)
    Memory,
}

impl std::fmt::Display for ExecEnv {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExecEnv::Local => write!(f, "local"),
            ExecEnv::Memory => write!(f, "memory"),
        }
    }
}

/// Optimizer configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OptimizeConfig {
    /// Run the algebraic rewrite passes before compiling
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Fuse select/project/rename runs into chained stages
    #[serde(default = "default_true")]
    pub fold_chains: bool,

    /// Restrict the rewrite passes to these names (default: all)
    #[serde(default)]
    pub passes: Option<Vec<String>>,
}

impl Default for OptimizeConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            fold_chains: true,
            passes: None,
        }
    }
}

/// Result output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// `<label>\t<json>` lines
    #[default]
    Pretty,
    /// One JSON array of `{relation, tuple}` objects
    Json,
}

fn default_data_path() -> String {
    "data".to_string()
}

const CONFIG_FILE_NAMES: [&str; 2] = ["raflow.yml", "raflow.yaml"];

impl Config {
    /// Load configuration from a file path
    pub fn load(path: &Path) -> CoreResult<Self> {
        if !path.exists() {
            return Err(CoreError::ConfigNotFound {
                path: path.display().to_string(),
            });
        }

        let content = std::fs::read_to_string(path).map_err(|e| CoreError::IoWithPath {
            path: path.display().to_string(),
            source: e,
        })?;
        let config: Config = serde_yaml::from_str(&content)?;
        config.validate()?;
        log::debug!("Loaded config '{}' from {}", config.name, path.display());
        Ok(config)
    }

    /// Load configuration from a project directory
    /// Looks for raflow.yml or raflow.yaml
    pub fn load_from_dir(dir: &Path) -> CoreResult<Self> {
        for file in CONFIG_FILE_NAMES {
            let path = dir.join(file);
            if path.exists() {
                return Self::load(&path);
            }
        }
        Err(CoreError::ConfigNotFound {
            path: dir.join(CONFIG_FILE_NAMES[0]).display().to_string(),
        })
    }

    /// Validate the configuration
    fn validate(&self) -> CoreResult<()> {
        if self.name.is_empty() {
            return Err(CoreError::ConfigInvalid {
                message: "Project name cannot be empty".to_string(),
            });
        }
        if self.data_path.is_empty() {
            return Err(CoreError::ConfigInvalid {
                message: "data_path cannot be empty".to_string(),
            });
        }
        // Surface schema errors at load time rather than at first query
        SchemaDirectory::from_map(&self.schema)?;
        Ok(())
    }

    /// Build the schema directory declared in the config
    pub fn schema_directory(&self) -> CoreResult<SchemaDirectory> {
        SchemaDirectory::from_map(&self.schema)
    }

    /// Absolute data directory, resolved against the project root
    pub fn data_path_absolute(&self, root: &Path) -> PathBuf {
        let p = Path::new(&self.data_path);
        if p.is_absolute() {
            p.to_path_buf()
        } else {
            root.join(p)
        }
    }

    /// Whether chain folding should be applied when compiling tasks
    pub fn fold_chains(&self) -> bool {
        self.optimize.enabled && self.optimize.fold_chains
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
