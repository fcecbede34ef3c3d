//! Builtin Category Rules
//!
//! The ordered rule table used when no rule file is supplied. Order is
//! semantic: the first matching rule claims an object, so Commanders must
//! precede Crew and the oItem* rules run from specific to general.

use serde::{Deserialize, Serialize};

/// Builtin rule table, evaluated top to bottom
pub const BUILTIN_RULES: &[BuiltinRule] = &[
    BuiltinRule {
        name: "Systems",
        prefix: "oSys",
        parents: &["oSysMain", "oSys"],
    },
    BuiltinRule {
        name: "Subsystems",
        prefix: "oSys",
        parents: &["oSysSub", "oSys"],
    },
    BuiltinRule {
        name: "Modules",
        prefix: "oModule",
        parents: &["oModule"],
    },
    BuiltinRule {
        name: "Armaments",
        prefix: "oShipWeapon",
        parents: &["oShipWeapon"],
    },
    BuiltinRule {
        name: "Missiles",
        prefix: "oMissile",
        parents: &["oMissile"],
    },
    BuiltinRule {
        name: "Commanders",
        prefix: "oCrew",
        parents: &["oCrewPlayer", "oCrew"],
    },
    BuiltinRule {
        name: "Crew",
        prefix: "oCrew",
        parents: &["oCrew"],
    },
    BuiltinRule {
        name: "Consumables",
        prefix: "oConsumable",
        parents: &["oConsumable"],
    },
    BuiltinRule {
        name: "Armor",
        prefix: "oItem",
        parents: &["oItemArmor", "oItem"],
    },
    BuiltinRule {
        name: "Psychomancies",
        prefix: "oAbl",
        parents: &["oAbl"],
    },
    BuiltinRule {
        name: "Weapons",
        prefix: "oItem",
        parents: &["oItemWeapon", "oItem"],
    },
    BuiltinRule {
        name: "Tools",
        prefix: "oItem",
        parents: &["oItemTool", "oItem"],
    },
    BuiltinRule {
        name: "Keywords",
        prefix: "oKW",
        parents: &["oKW"],
    },
    BuiltinRule {
        name: "Effects",
        prefix: "oEF",
        parents: &["oEF"],
    },
];

/// Static builtin rule definition
#[derive(Debug, Clone)]
pub struct BuiltinRule {
    /// Category display name
    pub name: &'static str,
    /// Required object name prefix
    pub prefix: &'static str,
    /// Names that must all appear in the object's ancestor chain
    pub parents: &'static [&'static str],
}

/// Runtime category rule
///
/// Builtin or loaded from a `[[rule]]` file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryRule {
    /// Category display name
    pub name: String,
    /// Required object name prefix
    pub prefix: String,
    /// Required ancestor names (unordered subset of the chain)
    #[serde(default)]
    pub parents: Vec<String>,
}

impl From<&BuiltinRule> for CategoryRule {
    fn from(builtin: &BuiltinRule) -> Self {
        Self {
            name: builtin.name.to_string(),
            prefix: builtin.prefix.to_string(),
            parents: builtin.parents.iter().map(|s| s.to_string()).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_rules_exist() {
        assert!(!BUILTIN_RULES.is_empty());
        assert!(BUILTIN_RULES.iter().any(|r| r.name == "Weapons"));
        assert!(BUILTIN_RULES.iter().any(|r| r.name == "Tools"));
        assert!(BUILTIN_RULES.iter().any(|r| r.name == "Keywords"));
    }

    #[test]
    fn test_specific_rules_precede_general() {
        let pos = |name: &str| BUILTIN_RULES.iter().position(|r| r.name == name).unwrap();
        assert!(pos("Commanders") < pos("Crew"));
        assert!(pos("Armor") < pos("Weapons"));
        assert!(pos("Weapons") < pos("Tools"));
    }

    #[test]
    fn test_rule_from_builtin() {
        let rule = CategoryRule::from(&BUILTIN_RULES[0]);
        assert_eq!(rule.name, BUILTIN_RULES[0].name);
        assert_eq!(rule.parents.len(), BUILTIN_RULES[0].parents.len());
    }
}
