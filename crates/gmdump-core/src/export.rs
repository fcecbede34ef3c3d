//! Export Model
//!
//! Aggregates per-object classification into the `data.json` document read
//! by downstream tooling. Field names and their order are part of the
//! contract; the maps are BTree-backed so the document is byte-stable
//! across runs.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::ancestry::resolve_chain;
use crate::category::{classify_index, RuleStore};
use crate::database::GameDatabase;
use crate::error::Result;

/// Subdirectory of the output dir holding data.json and the .gml artifacts
pub const EXPORT_SUBDIR: &str = "gml_code";

const DATA_FILE: &str = "data.json";

/// Sentinel parent name for root objects
pub const NO_PARENT: &str = "__NONE__";

/// Per-category slice of the export document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryData {
    pub name: String,
    #[serde(rename = "objPrefix")]
    pub obj_prefix: String,
    /// The rule's required ancestor names
    pub parents: Vec<String>,
    /// Claimed objects in database order
    #[serde(rename = "objNames")]
    pub obj_names: Vec<String>,
}

/// The aggregated export document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportModel {
    /// One entry per rule, in declaration order, empty categories included
    #[serde(rename = "objCatData")]
    pub obj_cat_data: Vec<CategoryData>,
    /// Every immediate parent observed, sorted, deduplicated
    pub parents: Vec<String>,
    /// Classified object -> immediate parent name, `__NONE__` for roots
    #[serde(rename = "objParentMap")]
    pub obj_parent_map: BTreeMap<String, String>,
    /// Classified object -> tag list (possibly empty)
    #[serde(rename = "objTagsMap")]
    pub obj_tags_map: BTreeMap<String, Vec<String>>,
}

impl ExportModel {
    /// Write the document to `<out_dir>/gml_code/data.json`
    pub fn write(&self, out_dir: &Path) -> Result<PathBuf> {
        let dir = out_dir.join(EXPORT_SUBDIR);
        fs::create_dir_all(&dir)?;

        let path = dir.join(DATA_FILE);
        let content = serde_json::to_string_pretty(self)?;
        fs::write(&path, content)?;
        Ok(path)
    }

    /// Objects that were claimed by any category
    pub fn classified_count(&self) -> usize {
        self.obj_parent_map.len()
    }
}

/// Builds the export model from a database and an ordered rule store.
///
/// Strictly sequential: rule order is externally meaningful, so the
/// classification pass is never parallelized.
pub struct ExportBuilder<'a> {
    db: &'a GameDatabase,
    rules: &'a RuleStore,
}

impl<'a> ExportBuilder<'a> {
    pub fn new(db: &'a GameDatabase, rules: &'a RuleStore) -> Self {
        Self { db, rules }
    }

    pub fn build(&self) -> Result<ExportModel> {
        let rules = self.rules.all();
        let mut members: Vec<Vec<String>> = vec![Vec::new(); rules.len()];
        let mut parent_map = BTreeMap::new();
        let mut tags_map = BTreeMap::new();
        let mut seen_parents: Vec<String> = Vec::new();

        for object in &self.db.objects {
            let chain = resolve_chain(self.db, object)?;

            let idx = match classify_index(&object.name, &chain, rules) {
                Some(idx) => idx,
                // Unmatched objects are silently left out of the model
                None => continue,
            };

            members[idx].push(object.name.clone());

            let immediate = chain.first().cloned();
            parent_map.insert(
                object.name.clone(),
                immediate.clone().unwrap_or_else(|| NO_PARENT.to_string()),
            );
            tags_map.insert(object.name.clone(), self.db.tags_for(object.id).to_vec());

            if let Some(parent) = immediate {
                seen_parents.push(parent);
            }
        }

        seen_parents.sort();
        seen_parents.dedup();

        let obj_cat_data = rules
            .iter()
            .zip(members)
            .map(|(rule, obj_names)| CategoryData {
                name: rule.name.clone(),
                obj_prefix: rule.prefix.clone(),
                parents: rule.parents.clone(),
                obj_names,
            })
            .collect();

        Ok(ExportModel {
            obj_cat_data,
            parents: seen_parents,
            obj_parent_map: parent_map,
            obj_tags_map: tags_map,
        })
    }
}
