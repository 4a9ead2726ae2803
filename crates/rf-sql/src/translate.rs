//! SELECT-to-RA translation
//!
//! FROM items become a left-deep cross product (aliased tables are wrapped
//! in `\rename_{alias:*}`), WHERE becomes one selection, and the select
//! list becomes a projection unless it is a lone `*`.

use crate::error::{SqlError, SqlResult};
use crate::parser::parse_single;
use rf_algebra::{AttrRef, BinOp, Literal, RaExpr, RenameSpec, ScalarExpr};
use rf_core::relation_name::is_identifier;
use sqlparser::ast::{
    BinaryOperator, Distinct, Expr, GroupByExpr, Ident, Query, Select, SelectItem, SetExpr,
    Statement, TableFactor, TableWithJoins, UnaryOperator, Value,
};

/// Parse and translate one SQL query
pub fn translate_sql(sql: &str) -> SqlResult<RaExpr> {
    let stmt = parse_single(sql)?;
    let expr = translate_statement(&stmt)?;
    log::debug!("Translated SQL to RA: {expr}");
    Ok(expr)
}

/// Translate a parsed statement; only queries are accepted
pub fn translate_statement(stmt: &Statement) -> SqlResult<RaExpr> {
    match stmt {
        Statement::Query(query) => translate_query(query),
        other => Err(SqlError::UnsupportedStatement(statement_kind(other))),
    }
}

fn statement_kind(stmt: &Statement) -> String {
    stmt.to_string()
        .split_whitespace()
        .next()
        .unwrap_or_default()
        .to_uppercase()
}

fn unsupported(what: impl Into<String>) -> SqlError {
    SqlError::UnsupportedConstruct(what.into())
}

fn translate_query(query: &Query) -> SqlResult<RaExpr> {
    if query.with.is_some() {
        return Err(unsupported("WITH clause"));
    }
    if query.order_by.is_some() {
        return Err(unsupported("ORDER BY"));
    }
    if query.limit_clause.is_some() {
        return Err(unsupported("LIMIT/OFFSET"));
    }

    match query.body.as_ref() {
        SetExpr::Select(select) => translate_select(select),
        SetExpr::Query(inner) => translate_query(inner),
        SetExpr::SetOperation { op, .. } => Err(unsupported(format!("set operation {op}"))),
        other => Err(unsupported(format!("query body '{other}'"))),
    }
}

fn translate_select(select: &Select) -> SqlResult<RaExpr> {
    if let Some(Distinct::On(_)) = &select.distinct {
        return Err(unsupported("DISTINCT ON"));
    }
    match &select.group_by {
        GroupByExpr::Expressions(exprs, _) if exprs.is_empty() => {}
        _ => return Err(unsupported("GROUP BY")),
    }
    if select.having.is_some() {
        return Err(unsupported("HAVING"));
    }

    let mut base = translate_from(&select.from)?;

    if let Some(selection) = &select.selection {
        base = RaExpr::select(condition(selection)?, base);
    }

    match projection(&select.projection)? {
        Some(attrs) => Ok(RaExpr::project(attrs, base)),
        None => Ok(base),
    }
}

fn translate_from(from: &[TableWithJoins]) -> SqlResult<RaExpr> {
    let mut relations = Vec::with_capacity(from.len());
    for item in from {
        if !item.joins.is_empty() {
            return Err(unsupported("explicit JOIN; list tables in FROM instead"));
        }
        relations.push(table_factor(&item.relation)?);
    }

    let mut iter = relations.into_iter();
    let first = iter
        .next()
        .ok_or_else(|| unsupported("SELECT without FROM"))?;
    Ok(iter.fold(first, RaExpr::cross))
}

fn table_factor(factor: &TableFactor) -> SqlResult<RaExpr> {
    let TableFactor::Table { name, alias, .. } = factor else {
        return Err(unsupported(format!("table factor '{factor}'")));
    };

    // Schema-qualified names resolve to their last part
    let table = name
        .0
        .last()
        .and_then(|part| part.as_ident())
        .map(|ident| ident.value.clone())
        .ok_or_else(|| unsupported(format!("table name '{name}'")))?;
    checked_identifier(&table, "table name")?;

    let relation = RaExpr::relation(table);
    match alias {
        Some(alias) => {
            let alias = checked_identifier(&alias.name.value, "table alias")?;
            Ok(RaExpr::rename(RenameSpec::alias_all(alias), relation))
        }
        None => Ok(relation),
    }
}

fn checked_identifier<'a>(name: &'a str, what: &str) -> SqlResult<&'a str> {
    if is_identifier(name) {
        Ok(name)
    } else {
        Err(unsupported(format!("{what} '{name}' is not a plain identifier")))
    }
}

/// `None` for a lone `*`
fn projection(items: &[SelectItem]) -> SqlResult<Option<Vec<AttrRef>>> {
    if let [SelectItem::Wildcard(_)] = items {
        return Ok(None);
    }

    items
        .iter()
        .map(|item| match item {
            SelectItem::UnnamedExpr(expr) => match attr_ref(expr)? {
                Some(attr) => Ok(attr),
                None => Err(unsupported(format!("select item '{expr}'"))),
            },
            SelectItem::ExprWithAlias { alias, .. } => {
                Err(unsupported(format!("column alias '{}'", alias.value)))
            }
            other => Err(unsupported(format!("select item '{other}'"))),
        })
        .collect::<SqlResult<Vec<_>>>()
        .map(Some)
}

fn attr_ref(expr: &Expr) -> SqlResult<Option<AttrRef>> {
    let attr = match expr {
        Expr::Identifier(ident) => AttrRef::bare(column_name(ident)?),
        // schema.table.column uses the last two parts
        Expr::CompoundIdentifier(idents) => match idents.as_slice() {
            [.., rel, col] => AttrRef::qualified(column_name(rel)?, column_name(col)?),
            _ => return Ok(None),
        },
        Expr::Nested(inner) => return attr_ref(inner),
        _ => return Ok(None),
    };
    Ok(Some(attr))
}

fn column_name(ident: &Ident) -> SqlResult<&str> {
    checked_identifier(&ident.value, "identifier")
}

fn binary_op(op: &BinaryOperator) -> SqlResult<BinOp> {
    match op {
        BinaryOperator::Eq => Ok(BinOp::Eq),
        BinaryOperator::NotEq => Ok(BinOp::Ne),
        BinaryOperator::Lt => Ok(BinOp::Lt),
        BinaryOperator::LtEq => Ok(BinOp::Le),
        BinaryOperator::Gt => Ok(BinOp::Gt),
        BinaryOperator::GtEq => Ok(BinOp::Ge),
        BinaryOperator::And => Ok(BinOp::And),
        BinaryOperator::Or => Ok(BinOp::Or),
        other => Err(unsupported(format!("operator {other}"))),
    }
}

fn condition(expr: &Expr) -> SqlResult<ScalarExpr> {
    match expr {
        Expr::Nested(inner) => condition(inner),
        Expr::BinaryOp { left, op, right } => {
            let op = binary_op(op)?;
            let (left, right) = if op.is_logical() {
                (condition(left)?, condition(right)?)
            } else {
                (operand(left)?, operand(right)?)
            };
            Ok(ScalarExpr::binary(left, op, right))
        }
        other => Err(unsupported(format!("WHERE expression '{other}'"))),
    }
}

fn operand(expr: &Expr) -> SqlResult<ScalarExpr> {
    if let Some(attr) = attr_ref(expr)? {
        return Ok(ScalarExpr::Attr(attr));
    }
    match expr {
        Expr::Value(v) => match &v.value {
            Value::Number(n, _) => Ok(ScalarExpr::Literal(Literal::number(n.clone()))),
            Value::SingleQuotedString(s) => Ok(ScalarExpr::Literal(Literal::string(s))),
            other => Err(unsupported(format!("literal {other}"))),
        },
        Expr::UnaryOp {
            op: UnaryOperator::Minus,
            expr: inner,
        } => match inner.as_ref() {
            Expr::Value(v) => match &v.value {
                Value::Number(n, _) => Ok(ScalarExpr::Literal(Literal::number(format!("-{n}")))),
                other => Err(unsupported(format!("negated literal {other}"))),
            },
            other => Err(unsupported(format!("negated expression '{other}'"))),
        },
        Expr::Nested(inner) => operand(inner),
        other => Err(unsupported(format!("comparison operand '{other}'"))),
    }
}

#[cfg(test)]
#[path = "translate_test.rs"]
mod tests;
