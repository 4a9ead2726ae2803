//! SQL parser wrapper

use crate::error::{SqlError, SqlResult};
use sqlparser::ast::Statement;
use sqlparser::dialect::GenericDialect;
use sqlparser::parser::Parser;

/// Parse exactly one SQL statement with the generic dialect
pub fn parse_single(sql: &str) -> SqlResult<Statement> {
    let sql = sql.trim();
    if sql.is_empty() {
        return Err(SqlError::EmptySql);
    }

    let mut stmts = Parser::parse_sql(&GenericDialect {}, sql).map_err(|e| {
        let message = e.to_string();
        let (line, column) = parse_location_from_error(&message);
        SqlError::ParseError {
            message,
            line,
            column,
        }
    })?;

    match stmts.len() {
        0 => Err(SqlError::EmptySql),
        1 => Ok(stmts.remove(0)),
        n => Err(SqlError::MultipleStatements(n)),
    }
}

/// Pull "Line: N, Column: M" out of a sqlparser error message.
///
/// `ParserError` carries no structured location, only message text.
fn parse_location_from_error(msg: &str) -> (usize, usize) {
    let number_after = |label: &str| -> Option<usize> {
        let start = msg.find(label)? + label.len();
        let digits: String = msg[start..]
            .trim_start()
            .chars()
            .take_while(|c| c.is_ascii_digit())
            .collect();
        digits.parse().ok()
    };
    match (number_after("Line:"), number_after("Column:")) {
        (Some(line), Some(column)) => (line, column),
        _ => (0, 0),
    }
}
