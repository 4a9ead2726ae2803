//! Chain folding: fuse vertical runs of row-wise operators
//!
//! Each physical operator costs one shuffle barrier, so a run of N
//! select/project/rename nodes collapses into one [`RaExpr::Chained`]
//! stage. Folding is local: runs are collected per subtree and the
//! terminal below a run is folded independently.

use crate::ra::{ChainStep, RaExpr};

/// Fold every maximal run of at least two row-wise operators
pub fn fold_chains(expr: RaExpr) -> RaExpr {
    // Collected outer to inner
    let mut steps = Vec::new();
    let mut current = expr;
    let terminal = loop {
        match current {
            RaExpr::Select { cond, input } => {
                steps.push(ChainStep::Select(cond));
                current = *input;
            }
            RaExpr::Project { attrs, input } => {
                steps.push(ChainStep::Project(attrs));
                current = *input;
            }
            RaExpr::Rename { spec, input } => {
                steps.push(ChainStep::Rename(spec));
                current = *input;
            }
            other => break other,
        }
    };

    let terminal = terminal.map_inputs(fold_chains);

    if steps.len() >= 2 {
        steps.reverse();
        log::debug!("Folded {} operators into one chained stage", steps.len());
        return RaExpr::Chained {
            steps,
            input: Box::new(terminal),
        };
    }

    steps
        .into_iter()
        .rev()
        .fold(terminal, |input, step| step.wrap(input))
}
