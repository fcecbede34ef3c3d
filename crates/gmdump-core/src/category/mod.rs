//! # Category Module
//!
//! Classifies game objects into named categories from an ordered
//! prefix+ancestry rule set.
//!
//! A rule claims an object when every required ancestor appears in the
//! object's chain and the object's name carries the rule's prefix (or is
//! itself one of the required ancestors). Rules are evaluated strictly in
//! declaration order and the first match wins, so a more specific rule
//! must precede a general one sharing its ancestors.
//!
//! ## Module layout
//!
//! - `builtin`: the builtin ordered rule table
//! - `store`: runtime rule store, builtin or loaded from a rule file
//! - `matcher`: the pure first-match classifier

mod builtin;
mod matcher;
mod store;

// Re-exports
pub use builtin::{BuiltinRule, CategoryRule, BUILTIN_RULES};
pub use matcher::{classify, classify_index, rule_matches};
pub use store::{RuleStore, RulesConfig};
