//! Deterministic names for base datasets and stage outputs

use rf_core::RelationName;
use std::fmt;

/// A storage location
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum StorageLocation {
    /// Base dataset of a relation (`<name>.json`)
    Dataset(RelationName),
    /// Output of the stage with this index (`tmp<stage>.tmp`)
    Stage(u32),
}

impl StorageLocation {
    /// File name of the location, unique per dataset and per stage index
    pub fn file_name(&self) -> String {
        match self {
            StorageLocation::Dataset(name) => name.dataset_file(),
            StorageLocation::Stage(stage) => format!("tmp{stage}.tmp"),
        }
    }
}

impl fmt::Display for StorageLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.file_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_names() {
        let person = RelationName::try_new("Person").unwrap();
        assert_eq!(StorageLocation::Dataset(person).file_name(), "Person.json");
        assert_eq!(StorageLocation::Stage(3).to_string(), "tmp3.tmp");
    }
}
