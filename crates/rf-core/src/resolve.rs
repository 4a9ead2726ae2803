//! Attribute resolution against concrete tuples
//!
//! Every operator and the scalar evaluator resolve attribute names through
//! [`resolve`], which applies one precedence order:
//!
//! 1. exact key match (`Person.id` finds `Person.id`, `id` finds `id`)
//! 2. unique suffix match on the column part (`Person.id` finds `P.id`,
//!    `id` finds `Person.id`) when exactly one key carries that column
//! 3. unresolved
//!
//! Ambiguous suffix matches are unresolved rather than first-wins, so the
//! outcome never depends on key iteration order.

use crate::record::Tuple;
use serde_json::Value;

/// Outcome of resolving an attribute name against a tuple.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Resolved<'a> {
    /// The tuple has a key spelled exactly like the attribute
    Exact { key: &'a str, value: &'a Value },
    /// Exactly one key has the attribute's column as its suffix
    Suffix { key: &'a str, value: &'a Value },
    /// No key (or more than one suffix candidate) matched
    Unresolved,
}

impl<'a> Resolved<'a> {
    /// The tuple key that matched, if any
    pub fn key(&self) -> Option<&'a str> {
        match self {
            Resolved::Exact { key, .. } | Resolved::Suffix { key, .. } => Some(key),
            Resolved::Unresolved => None,
        }
    }

    /// The matched value, if any
    pub fn value(&self) -> Option<&'a Value> {
        match self {
            Resolved::Exact { value, .. } | Resolved::Suffix { value, .. } => Some(value),
            Resolved::Unresolved => None,
        }
    }

    /// True for an exact key match
    pub fn is_exact(&self) -> bool {
        matches!(self, Resolved::Exact { .. })
    }
}

/// Resolve `name` (qualified or bare) against `tuple`.
pub fn resolve<'a>(tuple: &'a Tuple, name: &str) -> Resolved<'a> {
    if let Some((key, value)) = tuple.get_key_value(name) {
        return Resolved::Exact {
            key: key.as_str(),
            value,
        };
    }

    let column = suffix(name);
    let mut candidates = tuple.iter().filter(|(k, _)| suffix(k) == column);
    match (candidates.next(), candidates.next()) {
        (Some((key, value)), None) => Resolved::Suffix {
            key: key.as_str(),
            value,
        },
        _ => Resolved::Unresolved,
    }
}

/// Column part of an attribute name: everything after the last `.`
pub fn suffix(name: &str) -> &str {
    name.rsplit_once('.').map_or(name, |(_, col)| col)
}

/// Relation qualifier of an attribute name: everything before the first `.`
pub fn qualifier(name: &str) -> Option<&str> {
    name.split_once('.').map(|(rel, _)| rel)
}

/// Re-qualify a key under `alias`, keeping everything after the first `.`
pub fn requalify(name: &str, alias: &str) -> String {
    let rest = name.split_once('.').map_or(name, |(_, rest)| rest);
    format!("{alias}.{rest}")
}
