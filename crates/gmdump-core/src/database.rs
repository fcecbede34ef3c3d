//! Game Database
//!
//! One JSON document describing the dumped game: objects with their parent
//! links, code entries, and the per-object tag table. Collections keep the
//! document order; the export model's member lists inherit it.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{GmDumpError, Result};

/// A named object in the game's single-parent ancestry tree
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameObject {
    /// Object name (unique within the database)
    pub name: String,
    /// Opaque identifier, used as the tag lookup key
    pub id: u32,
    /// Owning parent, if any
    #[serde(default)]
    pub parent_id: Option<u32>,
}

/// An independently dumpable code entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CodeEntry {
    pub name: String,
    /// Sub-entries name their owner and are skipped by the dump worklist;
    /// they are reachable through the owner's artifact
    #[serde(default)]
    pub parent_entry: Option<String>,
}

/// The full database dump
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GameDatabase {
    #[serde(default)]
    pub objects: Vec<GameObject>,
    #[serde(default)]
    pub code: Vec<CodeEntry>,
    /// Tag table keyed by object id
    #[serde(default)]
    pub tags: HashMap<u32, Vec<String>>,

    #[serde(skip)]
    index: HashMap<u32, usize>,
}

impl GameDatabase {
    /// Load a database dump from a JSON file
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(GmDumpError::DataNotFound {
                path: path.to_path_buf(),
            });
        }

        let content = fs::read_to_string(path)?;
        let mut db: GameDatabase =
            serde_json::from_str(&content).map_err(|e| GmDumpError::DataParse {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?;
        db.rebuild_index();
        Ok(db)
    }

    /// Build a database from already-deserialized parts (used by tests)
    pub fn from_parts(
        objects: Vec<GameObject>,
        code: Vec<CodeEntry>,
        tags: HashMap<u32, Vec<String>>,
    ) -> Self {
        let mut db = Self {
            objects,
            code,
            tags,
            index: HashMap::new(),
        };
        db.rebuild_index();
        db
    }

    /// Rebuild the id lookup. Later duplicates win, matching a plain map.
    pub fn rebuild_index(&mut self) {
        self.index = self
            .objects
            .iter()
            .enumerate()
            .map(|(i, o)| (o.id, i))
            .collect();
    }

    pub fn object_by_id(&self, id: u32) -> Option<&GameObject> {
        self.index.get(&id).map(|&i| &self.objects[i])
    }

    /// Tag list for an object id; a missing or malformed entry yields an
    /// empty list, never an error
    pub fn tags_for(&self, id: u32) -> &[String] {
        self.tags.get(&id).map(|v| v.as_slice()).unwrap_or(&[])
    }
}
