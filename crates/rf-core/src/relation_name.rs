//! Strongly-typed relation name wrapper.

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;
use std::ops::Deref;

/// Name of a base relation or rename alias.
///
/// Relation names double as qualifiers in tuple keys (`Person.id`) and as
/// file stems for base datasets (`Person.json`), so they must be plain
/// identifiers: a letter or underscore followed by letters, digits or
/// underscores.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RelationName(String);

impl RelationName {
    /// Try to create a new `RelationName`, returning `None` if the name is
    /// not a valid identifier.
    pub fn try_new(name: impl Into<String>) -> Option<Self> {
        let s = name.into();
        if is_identifier(&s) {
            Some(Self(s))
        } else {
            None
        }
    }

    /// Return the underlying name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// File name of the base dataset backing this relation.
    pub fn dataset_file(&self) -> String {
        format!("{}.json", self.0)
    }

    /// Qualify a column with this relation (`rel.column`).
    pub fn qualify(&self, column: &str) -> String {
        format!("{}.{}", self.0, column)
    }
}

/// Check whether `s` is a plain identifier.
pub fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

impl fmt::Display for RelationName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Deref for RelationName {
    type Target = str;
    fn deref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for RelationName {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for RelationName {
    type Error = String;
    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::try_new(s.clone()).ok_or_else(|| format!("'{s}' is not a valid relation name"))
    }
}

impl From<RelationName> for String {
    fn from(name: RelationName) -> Self {
        name.0
    }
}

impl PartialEq<str> for RelationName {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for RelationName {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}
