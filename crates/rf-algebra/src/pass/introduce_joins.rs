//! Promote selections over cross products to joins

use super::RewritePass;
use crate::attrs::{condition_prefixes, relations};
use crate::ra::RaExpr;
use rf_core::SchemaDirectory;

/// Rewrites σ_c(L × R) to L ⋈_c R when `c` references relations of both
/// branches
pub struct IntroduceJoins;

impl RewritePass for IntroduceJoins {
    fn name(&self) -> &'static str {
        "introduce_joins"
    }

    fn description(&self) -> &'static str {
        "Turns selections that relate both sides of a cross product into joins"
    }

    fn rewrite(&self, expr: RaExpr, _dd: &SchemaDirectory) -> RaExpr {
        introduce_joins(expr)
    }
}

/// Bottom-up join introduction
pub fn introduce_joins(expr: RaExpr) -> RaExpr {
    match expr {
        RaExpr::Select { cond, input } => match introduce_joins(*input) {
            RaExpr::Cross { left, right } => {
                let prefixes = condition_prefixes(&cond);
                if !prefixes.is_disjoint(&relations(&left))
                    && !prefixes.is_disjoint(&relations(&right))
                {
                    RaExpr::join(*left, cond, *right)
                } else {
                    RaExpr::select(cond, RaExpr::cross(*left, *right))
                }
            }
            other => RaExpr::select(cond, other),
        },
        other => other.map_inputs(introduce_joins),
    }
}
