//! Decompiler Bridge
//!
//! gmdump does not decompile GML itself; it drives an external decompiler
//! command and captures its output per code entry.
//!
//! ## Usage
//!
//! ```rust
//! use gmdump_core::decompiler::{check_decompiler, CommandDecompiler};
//!
//! let available = check_decompiler("umt-decompile");
//! let decompiler = CommandDecompiler::new("umt-decompile");
//! ```

use std::process::{Command, Stdio};

use crate::database::CodeEntry;
use crate::error::{GmDumpError, Result};

/// Default decompiler command
pub const DEFAULT_DECOMPILER: &str = "umt-decompile";

/// The external transform: code entry in, artifact text out.
///
/// Fallible per entry; a failure is captured by the batch dumper and never
/// aborts the run.
pub trait Decompile: Sync {
    fn decompile(&self, entry: &CodeEntry) -> Result<String>;
}

/// Runs an external decompiler command, one invocation per entry.
///
/// The entry name is passed as the single argument; the artifact text is
/// read from stdout. A non-zero exit status is a per-entry failure.
#[derive(Debug, Clone)]
pub struct CommandDecompiler {
    command: String,
}

impl CommandDecompiler {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
        }
    }

    pub fn command(&self) -> &str {
        &self.command
    }
}

impl Decompile for CommandDecompiler {
    fn decompile(&self, entry: &CodeEntry) -> Result<String> {
        let output = Command::new(&self.command)
            .arg(&entry.name)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .map_err(|e| GmDumpError::DecompilerFailed {
                message: format!("Failed to spawn {}: {}", self.command, e),
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(GmDumpError::DecompilerFailed {
                message: format!("{} exited with error: {}", self.command, stderr.trim()),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).to_string())
    }
}

/// Check whether the decompiler command is available
///
/// Runs `<command> --version`; true on a zero exit status
pub fn check_decompiler(command: &str) -> bool {
    Command::new(command)
        .arg("--version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}

/// Require the decompiler command, erroring when absent
pub fn require_decompiler(command: &str) -> Result<()> {
    if !check_decompiler(command) {
        return Err(GmDumpError::DecompilerNotFound {
            command: command.to_string(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_missing_command_is_false() {
        assert!(!check_decompiler("gmdump-no-such-decompiler"));
    }

    #[test]
    fn test_require_missing_command_errors() {
        let err = require_decompiler("gmdump-no-such-decompiler").unwrap_err();
        assert!(matches!(err, GmDumpError::DecompilerNotFound { .. }));
    }

    #[test]
    fn test_spawn_failure_is_per_entry_error() {
        let decompiler = CommandDecompiler::new("gmdump-no-such-decompiler");
        let entry = CodeEntry {
            name: "gml_Object_oItem_Create_0".to_string(),
            parent_entry: None,
        };
        let err = decompiler.decompile(&entry).unwrap_err();
        assert!(matches!(err, GmDumpError::DecompilerFailed { .. }));
    }
}
