//! Push selections below cross products

use super::RewritePass;
use crate::attrs::{can_push_down, derivable_attrs, is_join_condition};
use crate::expr::ScalarExpr;
use crate::ra::RaExpr;
use rf_core::SchemaDirectory;

/// Moves each non-join selection onto the cross-product branch that can
/// derive all of its attributes
pub struct PushDownSelections;

impl RewritePass for PushDownSelections {
    fn name(&self) -> &'static str {
        "push_down_selections"
    }

    fn description(&self) -> &'static str {
        "Pushes single-branch selections below cross products"
    }

    fn rewrite(&self, expr: RaExpr, dd: &SchemaDirectory) -> RaExpr {
        push_down_selections(expr, dd)
    }
}

/// Push selections down through cross products.
///
/// A join condition (one relating both branches) stays directly above its
/// cross product so that join introduction can promote it later.
pub fn push_down_selections(expr: RaExpr, dd: &SchemaDirectory) -> RaExpr {
    match expr {
        RaExpr::Select { cond, input } => {
            let child = push_down_selections(*input, dd);
            push_select(cond, child, dd)
        }
        other => other.map_inputs(|e| push_down_selections(e, dd)),
    }
}

fn push_select(cond: ScalarExpr, child: RaExpr, dd: &SchemaDirectory) -> RaExpr {
    match child {
        RaExpr::Cross { left, right } => {
            let left_attrs = derivable_attrs(&left, dd);
            let right_attrs = derivable_attrs(&right, dd);

            if is_join_condition(&cond, &left_attrs, &right_attrs) {
                return RaExpr::select(cond, RaExpr::cross(*left, *right));
            }
            match push_into_branch(cond, *left, *right, dd) {
                Ok(cross) => cross,
                Err((cond, left, right)) => RaExpr::select(cond, RaExpr::cross(left, right)),
            }
        }

        // σ_outer(σ_inner(L × R)) with a join-triggering inner condition:
        // move only the outer condition past the cross product
        RaExpr::Select {
            cond: inner_cond,
            input,
        } => match *input {
            RaExpr::Cross { left, right } => {
                let left_attrs = derivable_attrs(&left, dd);
                let right_attrs = derivable_attrs(&right, dd);
                let outer_join = is_join_condition(&cond, &left_attrs, &right_attrs);
                let inner_join = is_join_condition(&inner_cond, &left_attrs, &right_attrs);

                if !outer_join && inner_join {
                    match push_into_branch(cond, *left, *right, dd) {
                        Ok(cross) => RaExpr::select(inner_cond, cross),
                        Err((cond, left, right)) => RaExpr::select(
                            cond,
                            RaExpr::select(inner_cond, RaExpr::cross(left, right)),
                        ),
                    }
                } else {
                    RaExpr::select(
                        cond,
                        RaExpr::select(inner_cond, RaExpr::cross(*left, *right)),
                    )
                }
            }
            other => RaExpr::select(cond, RaExpr::select(inner_cond, other)),
        },

        other => RaExpr::select(cond, other),
    }
}

type Unpushed = (ScalarExpr, RaExpr, RaExpr);

/// Wrap `cond` around whichever branch derives all of its attributes,
/// left first. Hands the pieces back if neither branch qualifies.
fn push_into_branch(
    cond: ScalarExpr,
    left: RaExpr,
    right: RaExpr,
    dd: &SchemaDirectory,
) -> Result<RaExpr, Unpushed> {
    if can_push_down(&cond, &left, dd) {
        let left = push_down_selections(RaExpr::select(cond, left), dd);
        return Ok(RaExpr::cross(left, right));
    }
    if can_push_down(&cond, &right, dd) {
        let right = push_down_selections(RaExpr::select(cond, right), dd);
        return Ok(RaExpr::cross(left, right));
    }
    Err((cond, left, right))
}

#[cfg(test)]
#[path = "push_down_selections_test.rs"]
mod tests;
