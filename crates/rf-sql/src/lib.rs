//! rf-sql - SQL-to-RA translation for raflow
//!
//! Turns `SELECT [DISTINCT] cols FROM t [alias], ... [WHERE cond]` into a
//! cross/select/project tree that the optimizer takes as input.

pub mod error;
pub mod parser;
pub mod translate;

pub use error::{SqlError, SqlResult};
pub use parser::parse_single;
pub use translate::{translate_sql, translate_statement};
