//! Optimizer passes: composable, schema-aware rewrites of the RA tree
//!
//! Each pass is a pure function from tree to tree. Node kinds a pass does
//! not transform are rebuilt unchanged around their rewritten inputs.

pub mod decompose;
pub mod introduce_joins;
pub mod merge;
pub mod push_down_projections;
pub mod push_down_selections;

use crate::error::{AlgebraError, AlgebraResult};
use crate::ra::RaExpr;
use rf_core::SchemaDirectory;

/// A tree-rewrite pass
pub trait RewritePass: Send + Sync {
    /// Pass name (used for filtering and display)
    fn name(&self) -> &'static str;
    /// Human-readable description
    fn description(&self) -> &'static str;
    /// Rewrite a whole tree
    fn rewrite(&self, expr: RaExpr, dd: &SchemaDirectory) -> RaExpr;
}

/// Runs rewrite passes in registration order
pub struct PassManager {
    passes: Vec<Box<dyn RewritePass>>,
}

impl PassManager {
    /// Create a PassManager with the built-in passes in their canonical order
    pub fn with_defaults() -> Self {
        Self {
            passes: vec![
                Box::new(decompose::DecomposeSelections),
                Box::new(push_down_selections::PushDownSelections),
                Box::new(merge::MergeSelections),
                Box::new(introduce_joins::IntroduceJoins),
                Box::new(push_down_projections::PushDownProjections),
            ],
        }
    }

    /// Run the passes over `expr`.
    ///
    /// With a filter, only passes whose name is listed run; their relative
    /// order is still the registration order.
    pub fn run(
        &self,
        mut expr: RaExpr,
        dd: &SchemaDirectory,
        pass_filter: Option<&[String]>,
    ) -> RaExpr {
        for pass in &self.passes {
            if let Some(filter) = pass_filter {
                if !filter.iter().any(|f| f == pass.name()) {
                    continue;
                }
            }
            let before = expr.clone();
            expr = pass.rewrite(expr, dd);
            if expr != before {
                log::debug!("Pass '{}' rewrote tree: {}", pass.name(), expr);
            }
        }
        expr
    }

    /// Reject filter entries that name no registered pass
    pub fn validate_filter(&self, pass_filter: &[String]) -> AlgebraResult<()> {
        let names = self.pass_names();
        match pass_filter.iter().find(|f| !names.contains(&f.as_str())) {
            Some(unknown) => Err(AlgebraError::UnknownPass {
                name: unknown.clone(),
                available: names.join(", "),
            }),
            None => Ok(()),
        }
    }

    /// List all available pass names
    pub fn pass_names(&self) -> Vec<&'static str> {
        self.passes.iter().map(|p| p.name()).collect()
    }

    /// Name and description of each registered pass
    pub fn describe(&self) -> Vec<(&'static str, &'static str)> {
        self.passes
            .iter()
            .map(|p| (p.name(), p.description()))
            .collect()
    }
}

impl Default for PassManager {
    fn default() -> Self {
        Self::with_defaults()
    }
}

/// Run every built-in pass over `expr`
pub fn optimize(expr: RaExpr, dd: &SchemaDirectory) -> RaExpr {
    PassManager::with_defaults().run(expr, dd, None)
}

#[cfg(test)]
#[path = "pass_test.rs"]
mod tests;
