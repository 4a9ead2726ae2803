//! Break up conjunctive selections: σ_{A ∧ B}(R) → σ_A(σ_B(R))

use super::RewritePass;
use crate::expr::{BinOp, ScalarExpr};
use crate::ra::RaExpr;
use rf_core::SchemaDirectory;

/// Splits every top-level AND at a Select into stacked Selects
pub struct DecomposeSelections;

impl RewritePass for DecomposeSelections {
    fn name(&self) -> &'static str {
        "decompose_selections"
    }

    fn description(&self) -> &'static str {
        "Splits conjunctive selection conditions into a stack of selections"
    }

    fn rewrite(&self, expr: RaExpr, _dd: &SchemaDirectory) -> RaExpr {
        decompose_selections(expr)
    }
}

/// Decompose every conjunctive selection in the tree
pub fn decompose_selections(expr: RaExpr) -> RaExpr {
    match expr {
        RaExpr::Select { cond, input } => split(cond, decompose_selections(*input)),
        other => other.map_inputs(decompose_selections),
    }
}

/// Wrap `input` in one Select per conjunct, leftmost conjunct outermost
fn split(cond: ScalarExpr, input: RaExpr) -> RaExpr {
    match cond {
        ScalarExpr::Binary {
            left,
            op: BinOp::And,
            right,
        } => {
            let inner = split(*right, input);
            split(*left, inner)
        }
        cond => RaExpr::select(cond, input),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::parse_statement;

    #[test]
    fn test_decompose_nested_conjunction() {
        let e = parse_statement("\\select_{a = 1 and b = 2 and c = 3} R").unwrap();
        let out = decompose_selections(e);
        assert_eq!(
            out.to_string(),
            "\\select_{a = 1} \\select_{b = 2} \\select_{c = 3} (R)"
        );
    }

    #[test]
    fn test_or_is_left_alone() {
        let e = parse_statement("\\select_{a = 1 or b = 2} R").unwrap();
        assert_eq!(decompose_selections(e.clone()), e);
    }

    #[test]
    fn test_decompose_below_binary_operators() {
        let e = parse_statement("\\project_{a} (\\select_{a = 1 and b = 2} R \\cross S)").unwrap();
        let out = decompose_selections(e);
        assert_eq!(out.count_kind("select"), 2);
        assert_eq!(out.count_kind("cross"), 1);
    }
}
