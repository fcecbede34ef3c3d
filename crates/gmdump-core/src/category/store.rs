//! Rule Store
//!
//! Ordered runtime store for category rules, built from the builtin table
//! or a user rule file. Declaration order is preserved exactly: the first
//! matching rule wins, so reordering would change classification.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::builtin::{CategoryRule, BUILTIN_RULES};
use crate::error::{GmDumpError, Result};

/// Ordered rule list
#[derive(Debug, Clone)]
pub struct RuleStore {
    rules: Vec<CategoryRule>,
}

impl RuleStore {
    /// Builtin rule table
    pub fn builtin() -> Self {
        let rules = BUILTIN_RULES.iter().map(CategoryRule::from).collect();
        Self { rules }
    }

    /// Store an already-assembled rule list, keeping its order
    pub fn from_rules(rules: Vec<CategoryRule>) -> Self {
        Self { rules }
    }

    /// Load rules from a `[[rule]]` TOML file.
    ///
    /// The file replaces the builtin table wholesale. Order is semantic,
    /// so a per-name merge is not offered: it would silently reorder.
    pub fn from_toml_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(GmDumpError::RuleFileNotFound {
                path: path.to_path_buf(),
            });
        }

        let content = fs::read_to_string(path)?;
        let config: RulesConfig = toml::from_str(&content).map_err(|e| GmDumpError::RuleParse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        Ok(Self { rules: config.rule })
    }

    /// Rules in declaration order
    pub fn all(&self) -> &[CategoryRule] {
        &self.rules
    }

    pub fn get(&self, name: &str) -> Option<&CategoryRule> {
        self.rules.iter().find(|r| r.name == name)
    }

    pub fn names(&self) -> Vec<&str> {
        self.rules.iter().map(|r| r.name.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl Default for RuleStore {
    fn default() -> Self {
        Self::builtin()
    }
}

/// Rule file layout: a sequence of `[[rule]]` tables
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RulesConfig {
    #[serde(default)]
    pub rule: Vec<CategoryRule>,
}
