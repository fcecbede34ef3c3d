use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GmDumpError {
    #[error("Database file not found: {path}")]
    DataNotFound { path: PathBuf },

    #[error("Failed to parse database {path}: {message}")]
    DataParse { path: PathBuf, message: String },

    #[error("Ancestry cycle detected while resolving parents of: {name}")]
    AncestryCycle { name: String },

    #[error("Rule file not found: {path}")]
    RuleFileNotFound { path: PathBuf },

    #[error("Failed to parse rule file {path}: {message}")]
    RuleParse { path: PathBuf, message: String },

    #[error("No output directory selected")]
    OutputCancelled,

    #[error("Decompiler command not found: {command}")]
    DecompilerNotFound { command: String },

    #[error("Decompiler execution failed: {message}")]
    DecompilerFailed { message: String },

    #[error("Config parse error in {path}: {message}")]
    ConfigParse { path: PathBuf, message: String },

    #[error("Invalid filter pattern: {0}")]
    Pattern(#[from] glob::PatternError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML serialization error: {0}")]
    TomlSer(#[from] toml::ser::Error),

    #[error("Home directory not found")]
    HomeNotFound,
}

pub type Result<T> = std::result::Result<T, GmDumpError>;

impl GmDumpError {
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::DataNotFound { .. } | Self::DataParse { .. } => 2,
            Self::OutputCancelled => 3,
            Self::AncestryCycle { .. } => 4,
            Self::RuleFileNotFound { .. } | Self::RuleParse { .. } => 5,
            Self::DecompilerNotFound { .. } => 6,
            _ => 1,
        }
    }
}
