//! Merge stacked selections: σ_A(σ_B(R)) → σ_{A ∧ B}(R)

use super::RewritePass;
use crate::expr::ScalarExpr;
use crate::ra::RaExpr;
use rf_core::SchemaDirectory;

/// Collapses each vertical run of Selects into a single Select
pub struct MergeSelections;

impl RewritePass for MergeSelections {
    fn name(&self) -> &'static str {
        "merge_selections"
    }

    fn description(&self) -> &'static str {
        "Conjoins vertical runs of selections into one selection"
    }

    fn rewrite(&self, expr: RaExpr, _dd: &SchemaDirectory) -> RaExpr {
        merge_selections(expr)
    }
}

/// Merge every run of stacked selections; conditions are conjoined outer
/// to inner and left-associated.
pub fn merge_selections(expr: RaExpr) -> RaExpr {
    match expr {
        RaExpr::Select { cond, input } => {
            let mut conditions = vec![cond];
            let mut current = *input;
            while let RaExpr::Select { cond, input } = current {
                conditions.push(cond);
                current = *input;
            }
            let base = merge_selections(current);

            let mut iter = conditions.into_iter();
            match iter.next() {
                Some(first) => RaExpr::select(iter.fold(first, ScalarExpr::and), base),
                None => base,
            }
        }
        other => other.map_inputs(merge_selections),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::parse_statement;
    use crate::pass::decompose::decompose_selections;

    #[test]
    fn test_merge_preserves_order() {
        let e = parse_statement("\\select_{a = 1} \\select_{b = 2} \\select_{c = 3} R").unwrap();
        assert_eq!(
            merge_selections(e).to_string(),
            "\\select_{((a = 1) and (b = 2)) and (c = 3)} (R)"
        );
    }

    #[test]
    fn test_merge_inverts_decompose() {
        let e = parse_statement("\\select_{a = 1 and (b = 2 or c = 3) and d = 4} R").unwrap();
        assert_eq!(merge_selections(decompose_selections(e.clone())), e);
    }

    #[test]
    fn test_single_select_untouched() {
        let e = parse_statement("\\select_{a = 1} R \\cross \\select_{b = 1} S").unwrap();
        assert_eq!(merge_selections(e.clone()), e);
    }
}
