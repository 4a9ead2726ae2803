//! Relational algebra operator tree
//!
//! Every non-leaf node exclusively owns its input subtree(s); trees are
//! built once and rewritten wholesale, never mutated in place. `Display`
//! renders the RA grammar accepted by [`crate::parse`], so any tree can be
//! shipped to a stateless task as text and re-parsed there.

use crate::error::{AlgebraError, AlgebraResult};
use crate::expr::{AttrRef, ScalarExpr};
use std::fmt;

/// Attribute part of a rename
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenameAttrs {
    /// No attribute list (`\rename_{P}`)
    None,
    /// All attributes (`\rename_{P:*}`)
    Wildcard,
    /// Explicit attribute list (`\rename_{P:a,b}`)
    List(Vec<String>),
}

/// Parameters of a rename: an optional new relation name plus attributes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenameSpec {
    /// New relation name; `None` leaves the relation label untouched
    pub alias: Option<String>,
    /// Attribute specification
    pub attrs: RenameAttrs,
}

impl RenameSpec {
    /// `alias:*`, the form aliased SQL tables translate to
    pub fn alias_all(alias: impl Into<String>) -> Self {
        Self {
            alias: Some(alias.into()),
            attrs: RenameAttrs::Wildcard,
        }
    }
}

impl fmt::Display for RenameSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(alias) = &self.alias {
            f.write_str(alias)?;
        }
        match &self.attrs {
            RenameAttrs::None => Ok(()),
            RenameAttrs::Wildcard => f.write_str(":*"),
            RenameAttrs::List(names) => write!(f, ":{}", names.join(",")),
        }
    }
}

/// One row-wise step inside a fused chain
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChainStep {
    /// Keep the tuple iff the condition holds
    Select(ScalarExpr),
    /// Narrow the tuple to the listed attributes
    Project(Vec<AttrRef>),
    /// Re-qualify the tuple under a new relation name
    Rename(RenameSpec),
}

impl ChainStep {
    /// Lowercase operator kind
    pub fn kind(&self) -> &'static str {
        match self {
            ChainStep::Select(_) => "select",
            ChainStep::Project(_) => "project",
            ChainStep::Rename(_) => "rename",
        }
    }

    /// Rebuild the unfused node this step stands for
    pub fn wrap(self, input: RaExpr) -> RaExpr {
        let input = Box::new(input);
        match self {
            ChainStep::Select(cond) => RaExpr::Select { cond, input },
            ChainStep::Project(attrs) => RaExpr::Project { attrs, input },
            ChainStep::Rename(spec) => RaExpr::Rename { spec, input },
        }
    }

    fn write_prefix(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChainStep::Select(cond) => write!(f, "\\select_{{{cond}}}"),
            ChainStep::Project(attrs) => write!(f, "\\project_{{{}}}", join_attrs(attrs)),
            ChainStep::Rename(spec) => write!(f, "\\rename_{{{spec}}}"),
        }
    }
}

impl fmt::Display for ChainStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChainStep::Select(cond) => write!(f, "select {cond}"),
            ChainStep::Project(attrs) => write!(f, "project {}", join_attrs(attrs)),
            ChainStep::Rename(spec) => write!(f, "rename {spec}"),
        }
    }
}

/// Relational algebra node
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RaExpr {
    /// Base relation reference
    Relation(String),

    /// Selection
    Select {
        cond: ScalarExpr,
        input: Box<RaExpr>,
    },

    /// Projection onto an ordered attribute list
    Project {
        attrs: Vec<AttrRef>,
        input: Box<RaExpr>,
    },

    /// Rename
    Rename {
        spec: RenameSpec,
        input: Box<RaExpr>,
    },

    /// Cartesian product
    Cross {
        left: Box<RaExpr>,
        right: Box<RaExpr>,
    },

    /// Theta join
    Join {
        left: Box<RaExpr>,
        cond: ScalarExpr,
        right: Box<RaExpr>,
    },

    /// Fused run of row-wise operators.
    ///
    /// `steps` are stored inner to outer: `steps[0]` is applied first.
    Chained {
        steps: Vec<ChainStep>,
        input: Box<RaExpr>,
    },
}

impl RaExpr {
    /// Base relation
    pub fn relation(name: impl Into<String>) -> Self {
        RaExpr::Relation(name.into())
    }

    /// Selection over `input`
    pub fn select(cond: ScalarExpr, input: RaExpr) -> Self {
        RaExpr::Select {
            cond,
            input: Box::new(input),
        }
    }

    /// Projection over `input`
    pub fn project(attrs: Vec<AttrRef>, input: RaExpr) -> Self {
        RaExpr::Project {
            attrs,
            input: Box::new(input),
        }
    }

    /// Rename over `input`
    pub fn rename(spec: RenameSpec, input: RaExpr) -> Self {
        RaExpr::Rename {
            spec,
            input: Box::new(input),
        }
    }

    /// Cartesian product
    pub fn cross(left: RaExpr, right: RaExpr) -> Self {
        RaExpr::Cross {
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    /// Theta join
    pub fn join(left: RaExpr, cond: ScalarExpr, right: RaExpr) -> Self {
        RaExpr::Join {
            left: Box::new(left),
            cond,
            right: Box::new(right),
        }
    }

    /// Fused chain; `steps` must be in inner-to-outer order and hold at
    /// least two operators.
    pub fn chained(steps: Vec<ChainStep>, input: RaExpr) -> AlgebraResult<Self> {
        if steps.len() < 2 {
            return Err(AlgebraError::InvalidChain {
                reason: format!("a chain needs at least 2 operators, got {}", steps.len()),
            });
        }
        Ok(RaExpr::Chained {
            steps,
            input: Box::new(input),
        })
    }

    /// Lowercase operator kind, used in plans and error messages
    pub fn kind(&self) -> &'static str {
        match self {
            RaExpr::Relation(_) => "relation",
            RaExpr::Select { .. } => "select",
            RaExpr::Project { .. } => "project",
            RaExpr::Rename { .. } => "rename",
            RaExpr::Cross { .. } => "cross",
            RaExpr::Join { .. } => "join",
            RaExpr::Chained { .. } => "chained",
        }
    }

    /// Immediate inputs, left to right
    pub fn inputs(&self) -> Vec<&RaExpr> {
        match self {
            RaExpr::Relation(_) => Vec::new(),
            RaExpr::Select { input, .. }
            | RaExpr::Project { input, .. }
            | RaExpr::Rename { input, .. }
            | RaExpr::Chained { input, .. } => vec![input],
            RaExpr::Cross { left, right } | RaExpr::Join { left, right, .. } => vec![left, right],
        }
    }

    /// Rebuild this node with `f` applied to each immediate input.
    ///
    /// Rewrite passes use this as their identity passthrough for node kinds
    /// they do not transform.
    pub fn map_inputs<F>(self, mut f: F) -> RaExpr
    where
        F: FnMut(RaExpr) -> RaExpr,
    {
        match self {
            RaExpr::Relation(_) => self,
            RaExpr::Select { cond, input } => RaExpr::select(cond, f(*input)),
            RaExpr::Project { attrs, input } => RaExpr::project(attrs, f(*input)),
            RaExpr::Rename { spec, input } => RaExpr::rename(spec, f(*input)),
            RaExpr::Cross { left, right } => {
                let left = f(*left);
                RaExpr::cross(left, f(*right))
            }
            RaExpr::Join { left, cond, right } => {
                let left = f(*left);
                RaExpr::join(left, cond, f(*right))
            }
            RaExpr::Chained { steps, input } => RaExpr::Chained {
                steps,
                input: Box::new(f(*input)),
            },
        }
    }

    /// Render as a statement terminated by `;`
    pub fn to_statement(&self) -> String {
        format!("{self};")
    }

    /// Number of nodes of the given kind in the tree
    pub fn count_kind(&self, kind: &str) -> usize {
        let own = usize::from(self.kind() == kind);
        own + self.inputs().iter().map(|i| i.count_kind(kind)).sum::<usize>()
    }
}

fn join_attrs(attrs: &[AttrRef]) -> String {
    attrs
        .iter()
        .map(|a| a.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Unary operands are written bare, except a relation reference which is
/// parenthesized.
fn write_unary_operand(f: &mut fmt::Formatter<'_>, input: &RaExpr) -> fmt::Result {
    match input {
        RaExpr::Relation(name) => write!(f, " ({name})"),
        other => write!(f, " {other}"),
    }
}

impl fmt::Display for RaExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RaExpr::Relation(name) => f.write_str(name),
            RaExpr::Select { cond, input } => {
                write!(f, "\\select_{{{cond}}}")?;
                write_unary_operand(f, input)
            }
            RaExpr::Project { attrs, input } => {
                write!(f, "\\project_{{{}}}", join_attrs(attrs))?;
                write_unary_operand(f, input)
            }
            RaExpr::Rename { spec, input } => {
                write!(f, "\\rename_{{{spec}}}")?;
                write_unary_operand(f, input)
            }
            RaExpr::Cross { left, right } => write!(f, "({left} \\cross {right})"),
            RaExpr::Join { left, cond, right } => {
                write!(f, "({left} \\join_{{{cond}}} {right})")
            }
            RaExpr::Chained { steps, input } => {
                // Outer to inner as nested prefix operators
                for (i, step) in steps.iter().rev().enumerate() {
                    if i > 0 {
                        f.write_str(" ")?;
                    }
                    step.write_prefix(f)?;
                }
                write_unary_operand(f, input)
            }
        }
    }
}
