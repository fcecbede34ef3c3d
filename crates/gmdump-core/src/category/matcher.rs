//! Category Matcher
//!
//! Pure first-match classification of an object against the ordered rule
//! list. Classification never mutates the rules; membership accumulation
//! happens in the export builder.

use super::builtin::CategoryRule;

/// Test one rule against an object name and its ancestor chain.
///
/// Matches when every required parent appears somewhere in the chain
/// (unordered subset test) and the name either is itself one of the
/// required parents or starts with the rule's prefix.
pub fn rule_matches(rule: &CategoryRule, name: &str, chain: &[String]) -> bool {
    let parents_ok = rule.parents.iter().all(|p| chain.iter().any(|c| c == p));
    if !parents_ok {
        return false;
    }

    rule.parents.iter().any(|p| p == name) || name.starts_with(&rule.prefix)
}

/// Index of the first matching rule in declaration order, if any
pub fn classify_index(name: &str, chain: &[String], rules: &[CategoryRule]) -> Option<usize> {
    rules.iter().position(|r| rule_matches(r, name, chain))
}

/// First matching rule in declaration order, if any.
///
/// Deterministic and side-effect free; an unmatched object is not an
/// error, it is simply left out of the export model.
pub fn classify<'a>(
    name: &str,
    chain: &[String],
    rules: &'a [CategoryRule],
) -> Option<&'a CategoryRule> {
    classify_index(name, chain, rules).map(|i| &rules[i])
}
