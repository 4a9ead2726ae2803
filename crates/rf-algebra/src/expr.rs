//! Scalar expression tree used by selection and join conditions

use std::fmt;

/// Reference to an attribute, optionally qualified by a relation name
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AttrRef {
    /// Relation qualifier (`Person` in `Person.id`)
    pub relation: Option<String>,
    /// Column name
    pub column: String,
}

impl AttrRef {
    /// An unqualified attribute
    pub fn bare(column: impl Into<String>) -> Self {
        Self {
            relation: None,
            column: column.into(),
        }
    }

    /// A relation-qualified attribute
    pub fn qualified(relation: impl Into<String>, column: impl Into<String>) -> Self {
        Self {
            relation: Some(relation.into()),
            column: column.into(),
        }
    }

    /// Split a textual name at its first `.` into qualifier and column
    pub fn from_name(name: &str) -> Self {
        match name.split_once('.') {
            Some((rel, col)) => Self::qualified(rel, col),
            None => Self::bare(name),
        }
    }

    /// The attribute's textual name, `relation.column` or `column`
    pub fn name(&self) -> String {
        self.to_string()
    }

    /// True if the attribute carries a relation qualifier
    pub fn is_qualified(&self) -> bool {
        self.relation.is_some()
    }
}

impl fmt::Display for AttrRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.relation {
            Some(rel) => write!(f, "{rel}.{}", self.column),
            None => write!(f, "{}", self.column),
        }
    }
}

/// Lexical kind of a literal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LiteralKind {
    /// Single-quoted string
    Str,
    /// Numeric text
    Num,
}

/// A literal as written in the source text.
///
/// String literals keep their surrounding quotes in `raw`; the evaluator
/// unquotes them. Numbers are parsed lazily at evaluation time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Literal {
    /// Source text of the literal
    pub raw: String,
    /// Lexical kind
    pub kind: LiteralKind,
}

impl Literal {
    /// A string literal holding `value`
    pub fn string(value: &str) -> Self {
        Self {
            raw: format!("'{}'", value.replace('\'', "''")),
            kind: LiteralKind::Str,
        }
    }

    /// A numeric literal from its text
    pub fn number(raw: impl Into<String>) -> Self {
        Self {
            raw: raw.into(),
            kind: LiteralKind::Num,
        }
    }

    /// The literal text with string quoting removed
    pub fn unquoted(&self) -> String {
        match self.kind {
            LiteralKind::Str => {
                let inner = self
                    .raw
                    .strip_prefix('\'')
                    .and_then(|s| s.strip_suffix('\''))
                    .unwrap_or(&self.raw);
                inner.replace("''", "'")
            }
            LiteralKind::Num => self.raw.clone(),
        }
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

/// Binary operator in a condition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinOp {
    /// Equality (=)
    Eq,
    /// Inequality (<>)
    Ne,
    /// Less than (<)
    Lt,
    /// Less than or equal (<=)
    Le,
    /// Greater than (>)
    Gt,
    /// Greater than or equal (>=)
    Ge,
    /// Logical AND
    And,
    /// Logical OR
    Or,
}

impl BinOp {
    /// Check if this is a logical connective
    pub fn is_logical(&self) -> bool {
        matches!(self, BinOp::And | BinOp::Or)
    }

    /// Grammar symbol for this operator
    pub fn symbol(&self) -> &'static str {
        match self {
            BinOp::Eq => "=",
            BinOp::Ne => "<>",
            BinOp::Lt => "<",
            BinOp::Le => "<=",
            BinOp::Gt => ">",
            BinOp::Ge => ">=",
            BinOp::And => "and",
            BinOp::Or => "or",
        }
    }
}

impl fmt::Display for BinOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Scalar expression: attribute, literal, or binary operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScalarExpr {
    /// Attribute reference
    Attr(AttrRef),
    /// Literal value
    Literal(Literal),
    /// Binary operation
    Binary {
        left: Box<ScalarExpr>,
        op: BinOp,
        right: Box<ScalarExpr>,
    },
}

impl ScalarExpr {
    /// Build a binary operation
    pub fn binary(left: ScalarExpr, op: BinOp, right: ScalarExpr) -> Self {
        ScalarExpr::Binary {
            left: Box::new(left),
            op,
            right: Box::new(right),
        }
    }

    /// Conjoin two conditions
    pub fn and(left: ScalarExpr, right: ScalarExpr) -> Self {
        Self::binary(left, BinOp::And, right)
    }

    /// `left = right` shorthand used heavily by tests and the SQL translator
    pub fn eq(left: ScalarExpr, right: ScalarExpr) -> Self {
        Self::binary(left, BinOp::Eq, right)
    }

    /// Attribute shorthand; accepts `rel.col` or `col`
    pub fn attr(name: &str) -> Self {
        ScalarExpr::Attr(AttrRef::from_name(name))
    }

    /// Split a condition into its top-level AND conjuncts, left to right
    pub fn conjuncts(&self) -> Vec<&ScalarExpr> {
        let mut out = Vec::new();
        collect_conjuncts(self, &mut out);
        out
    }

    /// All attribute references in the expression, left to right
    pub fn attr_refs(&self) -> Vec<&AttrRef> {
        let mut out = Vec::new();
        collect_attr_refs(self, &mut out);
        out
    }
}

fn collect_conjuncts<'a>(expr: &'a ScalarExpr, out: &mut Vec<&'a ScalarExpr>) {
    match expr {
        ScalarExpr::Binary {
            left,
            op: BinOp::And,
            right,
        } => {
            collect_conjuncts(left, out);
            collect_conjuncts(right, out);
        }
        other => out.push(other),
    }
}

fn collect_attr_refs<'a>(expr: &'a ScalarExpr, out: &mut Vec<&'a AttrRef>) {
    match expr {
        ScalarExpr::Attr(attr) => out.push(attr),
        ScalarExpr::Literal(_) => {}
        ScalarExpr::Binary { left, right, .. } => {
            collect_attr_refs(left, out);
            collect_attr_refs(right, out);
        }
    }
}

impl fmt::Display for ScalarExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScalarExpr::Attr(attr) => write!(f, "{attr}"),
            ScalarExpr::Literal(lit) => write!(f, "{lit}"),
            ScalarExpr::Binary { left, op, right } => {
                write_operand(f, left)?;
                write!(f, " {op} ")?;
                write_operand(f, right)
            }
        }
    }
}

/// Nested binary operands are always parenthesized so rendering never
/// depends on operator precedence.
fn write_operand(f: &mut fmt::Formatter<'_>, expr: &ScalarExpr) -> fmt::Result {
    match expr {
        ScalarExpr::Binary { .. } => write!(f, "({expr})"),
        _ => write!(f, "{expr}"),
    }
}
