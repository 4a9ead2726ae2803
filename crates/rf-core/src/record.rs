//! Tuples and relation-labeled records
//!
//! Stage outputs are newline-delimited `<label>\t<json-object>` lines. A
//! record's label names the relation the tuple currently belongs to; the
//! tuple keys are usually qualified (`Person.id`) but consumers must cope
//! with bare or re-qualified keys (see [`crate::resolve`]).

use crate::error::{CoreError, CoreResult};
use crate::resolve::qualifier;
use serde_json::Value;

/// A tuple: attribute name -> scalar value, keys kept in sorted order
pub type Tuple = serde_json::Map<String, Value>;

/// Label of the placeholder record a chained stage emits when nothing survived
pub const EMPTY_LABEL: &str = "__empty__";

/// Label used when a projected tuple retains no qualified attribute
pub const RESULT_LABEL: &str = "result";

/// A tuple together with its relation label
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    /// Relation label
    pub relation: String,
    /// Attribute values
    pub tuple: Tuple,
}

impl Record {
    /// Create a record
    pub fn new(relation: impl Into<String>, tuple: Tuple) -> Self {
        Self {
            relation: relation.into(),
            tuple,
        }
    }

    /// The empty-placeholder record (`__empty__\t{}`)
    pub fn placeholder() -> Self {
        Self::new(EMPTY_LABEL, Tuple::new())
    }

    /// True for the empty-placeholder record; consumers skip these
    pub fn is_placeholder(&self) -> bool {
        self.relation == EMPTY_LABEL
    }

    /// Parse a `<label>\t<json-object>` line
    pub fn parse_line(line: &str) -> CoreResult<Self> {
        let Some((label, payload)) = line.split_once('\t') else {
            return Err(malformed(line, "missing tab separator"));
        };
        Ok(Self::new(label, parse_tuple(line, payload)?))
    }

    /// Parse a base-dataset line for `relation`.
    ///
    /// Accepts the labeled form as well as a bare JSON object. A bare
    /// object is labeled with `relation` and its unqualified keys are
    /// qualified as `relation.key`.
    pub fn parse_dataset_line(line: &str, relation: &str) -> CoreResult<Self> {
        if line.trim_start().starts_with('{') {
            let raw = parse_tuple(line, line)?;
            let tuple = raw
                .into_iter()
                .map(|(k, v)| {
                    if k.contains('.') {
                        (k, v)
                    } else {
                        (format!("{relation}.{k}"), v)
                    }
                })
                .collect();
            return Ok(Self::new(relation, tuple));
        }
        Self::parse_line(line)
    }

    /// Serialize the tuple as a JSON object with sorted keys
    pub fn payload(&self) -> String {
        encode_tuple(&self.tuple)
    }

    /// Render as a `<label>\t<json-object>` line
    pub fn to_line(&self) -> String {
        format!("{}\t{}", self.relation, self.payload())
    }
}

/// Encode a tuple as compact JSON with sorted keys.
pub fn encode_tuple(tuple: &Tuple) -> String {
    Value::Object(tuple.clone()).to_string()
}

/// Decode a JSON object into a tuple
pub fn decode_tuple(payload: &str) -> CoreResult<Tuple> {
    parse_tuple(payload, payload)
}

/// Relation label for a tuple: the qualifier of its first qualified key
/// (keys are sorted), or `"result"` if no key is qualified.
pub fn label_for(tuple: &Tuple) -> String {
    tuple
        .keys()
        .find_map(|k| qualifier(k))
        .unwrap_or(RESULT_LABEL)
        .to_string()
}

fn parse_tuple(line: &str, payload: &str) -> CoreResult<Tuple> {
    match serde_json::from_str::<Value>(payload) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(other) => Err(malformed(
            line,
            &format!("expected a JSON object, found {other}"),
        )),
        Err(e) => Err(malformed(line, &e.to_string())),
    }
}

fn malformed(line: &str, reason: &str) -> CoreError {
    CoreError::MalformedRecord {
        line: line.to_string(),
        reason: reason.to_string(),
    }
}
