//! Narrow join inputs to the attributes a projection above the join needs

use super::RewritePass;
use crate::attrs::{condition_attrs, derivable_attrs};
use crate::expr::AttrRef;
use crate::ra::RaExpr;
use rf_core::SchemaDirectory;
use std::collections::BTreeSet;

/// Inserts narrowing projections under π(L ⋈ R)
pub struct PushDownProjections;

impl RewritePass for PushDownProjections {
    fn name(&self) -> &'static str {
        "push_down_projections"
    }

    fn description(&self) -> &'static str {
        "Projects join inputs down to the attributes the join and its consumer need"
    }

    fn rewrite(&self, expr: RaExpr, dd: &SchemaDirectory) -> RaExpr {
        push_down_projections(expr, dd)
    }
}

/// Bottom-up projection push-down through joins.
///
/// Required attributes are those the join condition references plus those
/// the outer projection requests. A branch only gets a new projection when
/// that strictly shrinks its derivable attribute count. The outer
/// projection is kept.
pub fn push_down_projections(expr: RaExpr, dd: &SchemaDirectory) -> RaExpr {
    match expr.map_inputs(|e| push_down_projections(e, dd)) {
        RaExpr::Project { attrs, input } => match *input {
            RaExpr::Join { left, cond, right } => {
                let mut required = condition_attrs(&cond);
                required.extend(attrs.iter().map(AttrRef::name));

                let left = narrow(*left, &required, dd);
                let right = narrow(*right, &required, dd);
                RaExpr::project(attrs, RaExpr::join(left, cond, right))
            }
            other => RaExpr::project(attrs, other),
        },
        other => other,
    }
}

fn narrow(branch: RaExpr, required: &BTreeSet<String>, dd: &SchemaDirectory) -> RaExpr {
    let all = derivable_attrs(&branch, dd);
    // BTreeSet iteration keeps the inserted list sorted
    let needed: Vec<AttrRef> = required
        .iter()
        .filter(|a| all.contains(*a))
        .map(|a| AttrRef::from_name(a))
        .collect();

    if needed.len() < all.len() {
        RaExpr::project(needed, branch)
    } else {
        branch
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::parse_statement;

    fn dd() -> SchemaDirectory {
        SchemaDirectory::new()
            .with_relation("Person", ["id", "name", "age"])
            .with_relation("Dept", ["id", "pid"])
    }

    #[test]
    fn test_narrows_wide_branch() {
        let e = parse_statement(
            "\\project_{Person.name} (Person \\join_{Person.id = Dept.pid} Dept)",
        )
        .unwrap();
        let out = push_down_projections(e, &dd());
        assert_eq!(
            out.to_string(),
            "\\project_{Person.name} (\\project_{Person.id, Person.name, id} (Person) \\join_{Person.id = Dept.pid} \\project_{Dept.pid, id, pid} (Dept))"
        );
    }

    #[test]
    fn test_no_projection_without_join() {
        let e = parse_statement("\\project_{name} (Person \\cross Dept)").unwrap();
        assert_eq!(push_down_projections(e.clone(), &dd()), e);
    }

    #[test]
    fn test_branch_kept_when_nothing_pruned() {
        let d = SchemaDirectory::new()
            .with_relation("A", ["x"])
            .with_relation("B", ["x", "y"]);
        let e = parse_statement("\\project_{A.x, B.y} (A \\join_{A.x = B.x} B)").unwrap();
        let out = push_down_projections(e, &d);
        match out {
            RaExpr::Project { input, .. } => match *input {
                RaExpr::Join { left, right, .. } => {
                    assert_eq!(*left, RaExpr::relation("A"));
                    assert_eq!(right.kind(), "project");
                }
                other => panic!("expected join, got {other:?}"),
            },
            other => panic!("expected project, got {other:?}"),
        }
    }

    #[test]
    fn test_nested_joins_rewritten_bottom_up() {
        let e = parse_statement(
            "\\project_{Person.name} (\\project_{Person.name, Dept.id} (Person \\join_{Person.id = Dept.pid} Dept) \\join_{Dept.id = Dept.pid} Dept)",
        )
        .unwrap();
        let out = push_down_projections(e, &dd());
        assert!(out.count_kind("project") > 2);
    }
}
