//! Ancestor Chain Resolution
//!
//! Walks an object's parent links to the root. The source database is
//! expected to be acyclic; a revisited id is reported as `AncestryCycle`
//! instead of walking forever.

use std::collections::HashSet;

use crate::database::{GameDatabase, GameObject};
use crate::error::{GmDumpError, Result};

/// Resolve the full ancestor chain for an object, nearest ancestor first.
///
/// An empty chain means the object is itself a root. A parent id with no
/// matching object ends the chain as if that ancestor were a root.
pub fn resolve_chain(db: &GameDatabase, object: &GameObject) -> Result<Vec<String>> {
    let mut chain = Vec::new();
    let mut visited = HashSet::new();
    visited.insert(object.id);

    let mut current = object.parent_id;
    while let Some(id) = current {
        if !visited.insert(id) {
            return Err(GmDumpError::AncestryCycle {
                name: object.name.clone(),
            });
        }
        let parent = match db.object_by_id(id) {
            Some(p) => p,
            None => break,
        };
        chain.push(parent.name.clone());
        current = parent.parent_id;
    }

    Ok(chain)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn obj(name: &str, id: u32, parent_id: Option<u32>) -> GameObject {
        GameObject {
            name: name.to_string(),
            id,
            parent_id,
        }
    }

    fn db_of(objects: Vec<GameObject>) -> GameDatabase {
        GameDatabase::from_parts(objects, Vec::new(), HashMap::new())
    }

    #[test]
    fn test_root_has_empty_chain() {
        let db = db_of(vec![obj("oItem", 1, None)]);
        let chain = resolve_chain(&db, db.object_by_id(1).unwrap()).unwrap();
        assert!(chain.is_empty());
    }

    #[test]
    fn test_chain_nearest_first() {
        let db = db_of(vec![
            obj("oItem", 1, None),
            obj("oItemWeapon", 2, Some(1)),
            obj("oItemSword", 3, Some(2)),
        ]);
        let chain = resolve_chain(&db, db.object_by_id(3).unwrap()).unwrap();
        assert_eq!(chain, ["oItemWeapon", "oItem"]);
    }

    #[test]
    fn test_dangling_parent_ends_chain() {
        let db = db_of(vec![obj("oOrphan", 1, Some(42))]);
        let chain = resolve_chain(&db, db.object_by_id(1).unwrap()).unwrap();
        assert!(chain.is_empty());
    }

    #[test]
    fn test_cycle_is_detected() {
        let db = db_of(vec![obj("oA", 1, Some(2)), obj("oB", 2, Some(1))]);
        let err = resolve_chain(&db, db.object_by_id(1).unwrap()).unwrap_err();
        assert!(matches!(err, GmDumpError::AncestryCycle { .. }));
    }

    #[test]
    fn test_self_parent_is_detected() {
        let db = db_of(vec![obj("oSelf", 1, Some(1))]);
        let err = resolve_chain(&db, db.object_by_id(1).unwrap()).unwrap_err();
        assert!(matches!(err, GmDumpError::AncestryCycle { name } if name == "oSelf"));
    }
}
