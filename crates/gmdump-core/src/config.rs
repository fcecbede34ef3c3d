use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::decompiler::DEFAULT_DECOMPILER;
use crate::error::{GmDumpError, Result};

const CONFIG_FILE: &str = "config.toml";

/// Default config template with rich comments
const DEFAULT_CONFIG_TEMPLATE: &str = r#"# gmdump configuration file
# Location: ~/.gmdump/config.toml

[dump]
# External decompiler command, invoked once per code entry
# Default: "umt-decompile"
decompiler = "umt-decompile"

# Worker threads for the dump phase
# Default: 0 (one per logical CPU)
jobs = 0

# Glob filters applied to code entry names
# Example: include = ["gml_Object_*"]
include = []
exclude = []

[export]
# Rule file overriding the builtin category rules
# Default: "" (builtin rules)
# Example: rules = "/path/to/rules.toml"
rules = ""
"#;

/// Global configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub dump: DumpConfig,
    #[serde(default)]
    pub export: ExportConfig,
}

/// Dump-phase configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DumpConfig {
    /// External decompiler command
    #[serde(default = "default_decompiler")]
    pub decompiler: String,

    /// Worker threads; 0 lets rayon size the pool
    #[serde(default)]
    pub jobs: usize,

    /// Glob filters on code entry names
    #[serde(default)]
    pub include: Vec<String>,
    #[serde(default)]
    pub exclude: Vec<String>,
}

/// Export-phase configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ExportConfig {
    /// Path to a rule file; empty means builtin rules
    #[serde(default)]
    pub rules: String,
}

fn default_decompiler() -> String {
    DEFAULT_DECOMPILER.to_string()
}

impl Default for DumpConfig {
    fn default() -> Self {
        Self {
            decompiler: default_decompiler(),
            jobs: 0,
            include: Vec::new(),
            exclude: Vec::new(),
        }
    }
}

impl Config {
    /// Load config from base directory
    pub fn load(base_dir: &Path) -> Result<Self> {
        let path = base_dir.join(CONFIG_FILE);
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&path)?;
        let config: Config = toml::from_str(&content).map_err(|e| GmDumpError::ConfigParse {
            path: path.clone(),
            message: e.to_string(),
        })?;

        Ok(config)
    }

    /// Save config to base directory
    pub fn save(&self, base_dir: &Path) -> Result<()> {
        let path = base_dir.join(CONFIG_FILE);
        fs::create_dir_all(base_dir)?;

        let content = toml::to_string_pretty(self)?;
        fs::write(&path, content)?;
        Ok(())
    }

    /// Get config file path
    pub fn path(base_dir: &Path) -> PathBuf {
        base_dir.join(CONFIG_FILE)
    }

    /// Initialize config with the default template (rich comments)
    pub fn init(base_dir: &Path) -> Result<PathBuf> {
        let path = base_dir.join(CONFIG_FILE);
        fs::create_dir_all(base_dir)?;

        if !path.exists() {
            fs::write(&path, DEFAULT_CONFIG_TEMPLATE)?;
        }

        Ok(path)
    }
}
