use super::{Emit, StageOperator};
use crate::eval::holds;
use rf_algebra::attrs::{primary_relation, relations};
use rf_algebra::{AttrRef, BinOp, RaExpr, ScalarExpr};
use rf_core::record::encode_tuple;
use rf_core::{qualifier, resolve, Record, Tuple, RESULT_LABEL};
use serde_json::Value;
use std::collections::{BTreeSet, HashSet};

/// Reduce-side equi-join.
///
/// The map keys each record on the values of the condition's top-level
/// `attr = attr` conjuncts; the reduce splits each group into left and
/// right records, cross-multiplies them and re-checks the full condition
/// on every merged tuple.
#[derive(Debug, Clone)]
pub struct JoinOp {
    cond: ScalarExpr,
    pairs: Vec<(AttrRef, AttrRef)>,
    left_relations: BTreeSet<String>,
    right_relations: BTreeSet<String>,
    label: String,
}

impl JoinOp {
    pub fn new(cond: ScalarExpr, left: &RaExpr, right: &RaExpr) -> Self {
        let pairs = equality_pairs(&cond);
        Self {
            cond,
            pairs,
            left_relations: relations(left),
            right_relations: relations(right),
            label: primary_relation(left).unwrap_or_else(|| RESULT_LABEL.to_string()),
        }
    }

    /// Which sides a record belongs to. An exact label match wins; a label
    /// known to both sides (a self-join) feeds both. Otherwise fall back to
    /// the qualifiers of the tuple's keys.
    fn sides(&self, record: &Record) -> (bool, bool) {
        let by_label = (
            self.left_relations.contains(&record.relation),
            self.right_relations.contains(&record.relation),
        );
        if by_label.0 || by_label.1 {
            return by_label;
        }
        let prefixes: BTreeSet<&str> = record.tuple.keys().filter_map(|k| qualifier(k)).collect();
        (
            prefixes.iter().any(|p| self.left_relations.contains(*p)),
            prefixes.iter().any(|p| self.right_relations.contains(*p)),
        )
    }
}

/// Top-level `attr = attr` conjuncts of a join condition
fn equality_pairs(cond: &ScalarExpr) -> Vec<(AttrRef, AttrRef)> {
    cond.conjuncts()
        .into_iter()
        .filter_map(|c| match c {
            ScalarExpr::Binary {
                left,
                op: BinOp::Eq,
                right,
            } => match (left.as_ref(), right.as_ref()) {
                (ScalarExpr::Attr(l), ScalarExpr::Attr(r)) => Some((l.clone(), r.clone())),
                _ => None,
            },
            _ => None,
        })
        .collect()
}

/// Join key of a tuple: one value per equality pair, joined into a compact
/// JSON array when there is more than one. `None` when no pair resolves.
///
/// For each pair both attributes are tried for an exact key match before
/// either is tried by suffix, so a record from one side never picks up the
/// other side's column through a looser match.
pub fn join_key(tuple: &Tuple, pairs: &[(AttrRef, AttrRef)]) -> Option<String> {
    let values: Vec<String> = pairs
        .iter()
        .filter_map(|(l, r)| {
            let (l, r) = (resolve(tuple, &l.name()), resolve(tuple, &r.name()));
            let hit = [l, r]
                .into_iter()
                .find(|res| res.is_exact())
                .or_else(|| [l, r].into_iter().find(|res| res.value().is_some()))?;
            hit.value().and_then(key_text)
        })
        .collect();
    match values.len() {
        0 => None,
        1 => values.into_iter().next(),
        _ => Some(Value::from(values).to_string()),
    }
}

/// Text form of a key value. Integral floats render like integers so `1`
/// and `1.0` land in the same group; null never joins.
fn key_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => match (n.as_i64(), n.as_f64()) {
            (Some(i), _) => Some(i.to_string()),
            (None, Some(f)) if f.fract() == 0.0 && f.abs() < 9.0e15 => {
                Some(format!("{}", f as i64))
            }
            _ => Some(n.to_string()),
        },
        other => Some(other.to_string()),
    }
}

impl StageOperator for JoinOp {
    fn name(&self) -> &'static str {
        "join"
    }

    fn map(&self, record: &Record) -> Vec<Emit> {
        match join_key(&record.tuple, &self.pairs) {
            Some(key) => vec![Emit::record(key, record.clone())],
            None => {
                log::trace!("Join map dropping record without a key: {}", record.to_line());
                Vec::new()
            }
        }
    }

    fn has_reduce(&self) -> bool {
        true
    }

    fn reduce(&self, _key: &str, values: &[Record]) -> Vec<Record> {
        let mut left = Vec::new();
        let mut right = Vec::new();
        for record in values {
            let (is_left, is_right) = self.sides(record);
            if is_left {
                left.push(&record.tuple);
            }
            if is_right {
                right.push(&record.tuple);
            }
        }

        let mut seen = HashSet::new();
        let mut out = Vec::new();
        for l in &left {
            for r in &right {
                let mut merged = (*l).clone();
                merged.extend(r.iter().map(|(k, v)| (k.clone(), v.clone())));
                if holds(&self.cond, &merged) && seen.insert(encode_tuple(&merged)) {
                    out.push(Record::new(self.label.clone(), merged));
                }
            }
        }
        out
    }
}

#[cfg(test)]
#[path = "join_test.rs"]
mod tests;
