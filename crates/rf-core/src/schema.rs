//! Schema directory: relation name -> attribute names
//!
//! The optimizer only uses the directory for legality checks (can a
//! selection move below a cross product, which branch owns an attribute).
//! It is built once and never mutated while a query is optimized.

use crate::error::{CoreError, CoreResult};
use crate::relation_name::RelationName;
use std::collections::{BTreeMap, BTreeSet, HashMap};

/// Read-only mapping from relation name to its attribute names.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SchemaDirectory {
    relations: BTreeMap<RelationName, BTreeSet<String>>,
}

impl SchemaDirectory {
    /// Create an empty directory
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert, panicking on an invalid relation name.
    ///
    /// Intended for tests and literal fixtures; use [`Self::from_map`] for
    /// untrusted input.
    pub fn with_relation<I, S>(mut self, name: &str, attributes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let Some(rel) = RelationName::try_new(name) else {
            panic!("invalid relation name '{name}' in schema fixture");
        };
        self.relations
            .insert(rel, attributes.into_iter().map(Into::into).collect());
        self
    }

    /// Build a directory from a name -> attribute list map (e.g. config YAML)
    pub fn from_map(map: &HashMap<String, Vec<String>>) -> CoreResult<Self> {
        let mut relations = BTreeMap::new();
        for (name, attrs) in map {
            let rel = RelationName::try_new(name.as_str()).ok_or_else(|| {
                CoreError::ConfigInvalid {
                    message: format!("schema: '{name}' is not a valid relation name"),
                }
            })?;
            if let Some(bad) = attrs.iter().find(|a| a.contains('.') || a.is_empty()) {
                return Err(CoreError::ConfigInvalid {
                    message: format!(
                        "schema: attribute '{bad}' of '{name}' must be a bare, non-empty name"
                    ),
                });
            }
            relations.insert(rel, attrs.iter().cloned().collect());
        }
        Ok(Self { relations })
    }

    /// Attribute names of a relation, if it is known
    pub fn attributes(&self, relation: &str) -> Option<&BTreeSet<String>> {
        self.relations.get(relation)
    }

    /// Check whether the relation is known
    pub fn contains(&self, relation: &str) -> bool {
        self.relations.contains_key(relation)
    }

    /// Iterate relation names in sorted order
    pub fn relations(&self) -> impl Iterator<Item = &RelationName> {
        self.relations.keys()
    }

    /// Number of relations in the directory
    pub fn len(&self) -> usize {
        self.relations.len()
    }

    /// True if no relations are registered
    pub fn is_empty(&self) -> bool {
        self.relations.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_relation_and_lookup() {
        let dd = SchemaDirectory::new()
            .with_relation("Person", ["id", "name"])
            .with_relation("Dept", ["id", "pid"]);
        assert_eq!(dd.len(), 2);
        assert!(dd.contains("Person"));
        let attrs = dd.attributes("Dept").unwrap();
        assert!(attrs.contains("pid"));
        assert!(dd.attributes("Missing").is_none());
    }

    #[test]
    fn test_from_map_rejects_qualified_attribute() {
        let mut map = HashMap::new();
        map.insert("Person".to_string(), vec!["Person.id".to_string()]);
        let err = SchemaDirectory::from_map(&map).unwrap_err();
        assert!(matches!(err, CoreError::ConfigInvalid { .. }));
    }

    #[test]
    fn test_from_map_rejects_bad_relation() {
        let mut map = HashMap::new();
        map.insert("not valid".to_string(), vec!["a".to_string()]);
        assert!(SchemaDirectory::from_map(&map).is_err());
    }

    #[test]
    fn test_relations_sorted() {
        let dd = SchemaDirectory::new()
            .with_relation("b", ["x"])
            .with_relation("a", ["y"]);
        let names: Vec<&str> = dd.relations().map(|r| r.as_str()).collect();
        assert_eq!(names, ["a", "b"]);
    }
}
