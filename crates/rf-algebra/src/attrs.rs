//! Attribute and relation-name analysis used by the optimizer passes
//!
//! Attribute sets mix bare (`id`) and qualified (`Person.id`) names: a
//! condition attribute contributes both forms, and a subtree's derivable
//! set carries both forms for every schema attribute. Legality checks are
//! plain subset tests over these mixed sets.

use crate::expr::ScalarExpr;
use crate::ra::{ChainStep, RaExpr};
use rf_core::{qualifier, SchemaDirectory};
use std::collections::BTreeSet;

/// Attributes a condition references, each as written plus its bare column
pub fn condition_attrs(cond: &ScalarExpr) -> BTreeSet<String> {
    let mut out = BTreeSet::new();
    for attr in cond.attr_refs() {
        out.insert(attr.name());
        if attr.is_qualified() {
            out.insert(attr.column.clone());
        }
    }
    out
}

/// Relation qualifiers appearing in a condition
pub fn condition_prefixes(cond: &ScalarExpr) -> BTreeSet<String> {
    cond.attr_refs()
        .into_iter()
        .filter_map(|a| a.relation.clone())
        .collect()
}

/// Every attribute name a subtree can produce, from schema provenance.
///
/// Projections do not narrow the set; this is only used for legality
/// checks, never to compute an output schema.
pub fn derivable_attrs(expr: &RaExpr, dd: &SchemaDirectory) -> BTreeSet<String> {
    match expr {
        RaExpr::Relation(name) => dd
            .attributes(name)
            .into_iter()
            .flatten()
            .flat_map(|a| [a.clone(), format!("{name}.{a}")])
            .collect(),
        RaExpr::Rename { spec, input } => match &spec.alias {
            Some(alias) => requalify_all(derivable_attrs(input, dd), alias),
            None => derivable_attrs(input, dd),
        },
        RaExpr::Select { input, .. } | RaExpr::Project { input, .. } => {
            derivable_attrs(input, dd)
        }
        RaExpr::Cross { left, right } | RaExpr::Join { left, right, .. } => {
            let mut out = derivable_attrs(left, dd);
            out.extend(derivable_attrs(right, dd));
            out
        }
        RaExpr::Chained { steps, input } => {
            steps
                .iter()
                .fold(derivable_attrs(input, dd), |acc, step| match step {
                    ChainStep::Rename(spec) => match &spec.alias {
                        Some(alias) => requalify_all(acc, alias),
                        None => acc,
                    },
                    ChainStep::Select(_) | ChainStep::Project(_) => acc,
                })
        }
    }
}

/// Re-qualify every name under `alias`, keeping the bare form too
fn requalify_all(attrs: BTreeSet<String>, alias: &str) -> BTreeSet<String> {
    let mut out = BTreeSet::new();
    for name in attrs {
        let base = name
            .split_once('.')
            .map_or(name.as_str(), |(_, rest)| rest)
            .to_string();
        out.insert(format!("{alias}.{base}"));
        out.insert(base);
    }
    out
}

/// Relation names visible at the root of a subtree
pub fn relations(expr: &RaExpr) -> BTreeSet<String> {
    match expr {
        RaExpr::Relation(name) => BTreeSet::from([name.clone()]),
        RaExpr::Rename { spec, input } => match &spec.alias {
            Some(alias) => BTreeSet::from([alias.clone()]),
            None => relations(input),
        },
        RaExpr::Select { input, .. } | RaExpr::Project { input, .. } => relations(input),
        RaExpr::Cross { left, right } | RaExpr::Join { left, right, .. } => {
            let mut out = relations(left);
            out.extend(relations(right));
            out
        }
        RaExpr::Chained { steps, input } => {
            steps.iter().fold(relations(input), |acc, step| match step {
                ChainStep::Rename(spec) => match &spec.alias {
                    Some(alias) => BTreeSet::from([alias.clone()]),
                    None => acc,
                },
                _ => acc,
            })
        }
    }
}

/// The first relation name in a left-to-right traversal
pub fn primary_relation(expr: &RaExpr) -> Option<String> {
    match expr {
        RaExpr::Relation(name) => Some(name.clone()),
        RaExpr::Rename { spec, input } => spec.alias.clone().or_else(|| primary_relation(input)),
        RaExpr::Select { input, .. } | RaExpr::Project { input, .. } => primary_relation(input),
        RaExpr::Cross { left, .. } | RaExpr::Join { left, .. } => primary_relation(left),
        RaExpr::Chained { steps, input } => steps
            .iter()
            .rev()
            .find_map(|step| match step {
                ChainStep::Rename(spec) => spec.alias.clone(),
                _ => None,
            })
            .or_else(|| primary_relation(input)),
    }
}

/// Whether every attribute the condition references is derivable from `expr`
pub fn can_push_down(cond: &ScalarExpr, expr: &RaExpr, dd: &SchemaDirectory) -> bool {
    condition_attrs(cond).is_subset(&derivable_attrs(expr, dd))
}

/// Whether a condition relates both sides of a cross product.
///
/// Qualified references are compared by relation prefix; a condition with
/// only bare references falls back to raw attribute-name membership.
pub fn is_join_condition(
    cond: &ScalarExpr,
    left_attrs: &BTreeSet<String>,
    right_attrs: &BTreeSet<String>,
) -> bool {
    let cond_attrs = condition_attrs(cond);
    let cond_prefixes = condition_prefixes(cond);

    if cond_prefixes.is_empty() {
        return !cond_attrs.is_disjoint(left_attrs) && !cond_attrs.is_disjoint(right_attrs);
    }

    let prefixes_of = |attrs: &BTreeSet<String>| -> BTreeSet<String> {
        attrs
            .iter()
            .filter_map(|a| qualifier(a))
            .map(str::to_string)
            .collect()
    };

    !cond_prefixes.is_disjoint(&prefixes_of(left_attrs))
        && !cond_prefixes.is_disjoint(&prefixes_of(right_attrs))
}
