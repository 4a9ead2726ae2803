//! RA grammar parser
//!
//! ```text
//! statement  := expr [';']
//! expr       := unary { '\cross' unary | '\join_{' cond '}' unary }
//! unary      := '\select_{' cond '}' unary
//!             | '\project_{' attr {',' attr} '}' unary
//!             | '\rename_{' [name] [':' ('*' | name {',' name})] '}' unary
//!             | '(' expr ')' | name
//! cond       := conj { 'or' conj }
//! conj       := term { 'and' term }
//! term       := '(' cond ')' | operand cmp operand
//! operand    := 'string' | number | [rel '.'] attr
//! ```
//!
//! Unary operators bind tighter than the binary ones, and binary operators
//! associate to the left, so `\select_{c} A \join_{d} B \cross C` reads as
//! `((\select_{c} A) \join_{d} B) \cross C`.

use crate::error::{AlgebraError, AlgebraResult};
use crate::expr::{AttrRef, BinOp, Literal, LiteralKind, ScalarExpr};
use crate::ra::{RaExpr, RenameAttrs, RenameSpec};
use nom::{
    branch::alt,
    bytes::complete::{is_not, tag, tag_no_case, take_while, take_while1},
    character::complete::{char, digit1, multispace0},
    combinator::{map, not, opt, recognize, value},
    multi::{many0, separated_list1},
    sequence::{delimited, pair, preceded, terminated, tuple},
    IResult,
};

/// Parse one RA statement, optionally terminated by `;`
pub fn parse_statement(text: &str) -> AlgebraResult<RaExpr> {
    let parser = terminated(
        delimited(multispace0, expr, multispace0),
        opt(terminated(char(';'), multispace0)),
    );
    run_complete(text, parser)
}

/// Parse a standalone condition
pub fn parse_condition(text: &str) -> AlgebraResult<ScalarExpr> {
    run_complete(text, delimited(multispace0, condition, multispace0))
}

fn run_complete<'a, T, P>(text: &'a str, mut parser: P) -> AlgebraResult<T>
where
    P: FnMut(&'a str) -> IResult<&'a str, T>,
{
    match parser(text) {
        Ok(("", out)) => Ok(out),
        Ok((rest, _)) => Err(AlgebraError::TrailingInput {
            position: text.len() - rest.len(),
            rest: rest.to_string(),
        }),
        Err(nom::Err::Error(e)) | Err(nom::Err::Failure(e)) => Err(AlgebraError::Parse {
            position: text.len() - e.input.len(),
            message: format!("{:?} near '{}'", e.code, snippet(e.input)),
        }),
        Err(nom::Err::Incomplete(_)) => Err(AlgebraError::Parse {
            position: text.len(),
            message: "unexpected end of input".to_string(),
        }),
    }
}

fn snippet(input: &str) -> &str {
    match input.char_indices().nth(24) {
        Some((idx, _)) => &input[..idx],
        None => input,
    }
}

/// Skip surrounding whitespace
fn ws<'a, T, P>(parser: P) -> impl FnMut(&'a str) -> IResult<&'a str, T>
where
    P: FnMut(&'a str) -> IResult<&'a str, T>,
{
    delimited(multispace0, parser, multispace0)
}

// --- Relational expressions ---

enum BinaryTail {
    Cross(RaExpr),
    Join(ScalarExpr, RaExpr),
}

fn expr(input: &str) -> IResult<&str, RaExpr> {
    let (input, first) = unary(input)?;
    let (input, tails) = many0(preceded(
        multispace0,
        alt((
            map(preceded(ws(tag("\\cross")), unary), BinaryTail::Cross),
            map(
                pair(
                    delimited(tag("\\join_{"), ws(condition), char('}')),
                    preceded(multispace0, unary),
                ),
                |(cond, right)| BinaryTail::Join(cond, right),
            ),
        )),
    ))(input)?;

    let tree = tails.into_iter().fold(first, |left, tail| match tail {
        BinaryTail::Cross(right) => RaExpr::cross(left, right),
        BinaryTail::Join(cond, right) => RaExpr::join(left, cond, right),
    });
    Ok((input, tree))
}

fn unary(input: &str) -> IResult<&str, RaExpr> {
    alt((select, project, rename, parenthesized, relation))(input)
}

fn select(input: &str) -> IResult<&str, RaExpr> {
    let (input, cond) = delimited(tag("\\select_{"), ws(condition), char('}'))(input)?;
    let (input, operand) = preceded(multispace0, unary)(input)?;
    Ok((input, RaExpr::select(cond, operand)))
}

fn project(input: &str) -> IResult<&str, RaExpr> {
    let (input, attrs) = delimited(
        tag("\\project_{"),
        ws(separated_list1(ws(char(',')), attr_ref)),
        char('}'),
    )(input)?;
    let (input, operand) = preceded(multispace0, unary)(input)?;
    Ok((input, RaExpr::project(attrs, operand)))
}

fn rename(input: &str) -> IResult<&str, RaExpr> {
    let (input, spec) = delimited(tag("\\rename_{"), ws(rename_spec), char('}'))(input)?;
    let (input, operand) = preceded(multispace0, unary)(input)?;
    Ok((input, RaExpr::rename(spec, operand)))
}

fn rename_spec(input: &str) -> IResult<&str, RenameSpec> {
    let (input, alias) = opt(identifier)(input)?;
    let (input, attrs) = opt(preceded(
        ws(char(':')),
        alt((
            value(RenameAttrs::Wildcard, char('*')),
            map(separated_list1(ws(char(',')), identifier), |names| {
                RenameAttrs::List(names.into_iter().map(str::to_string).collect())
            }),
        )),
    ))(input)?;
    Ok((
        input,
        RenameSpec {
            alias: alias.map(str::to_string),
            attrs: attrs.unwrap_or(RenameAttrs::None),
        },
    ))
}

fn parenthesized(input: &str) -> IResult<&str, RaExpr> {
    delimited(char('('), ws(expr), char(')'))(input)
}

fn relation(input: &str) -> IResult<&str, RaExpr> {
    map(identifier, |name| RaExpr::relation(name))(input)
}

fn identifier(input: &str) -> IResult<&str, &str> {
    recognize(pair(
        take_while1(|c: char| c.is_ascii_alphabetic() || c == '_'),
        take_while(|c: char| c.is_ascii_alphanumeric() || c == '_'),
    ))(input)
}

fn attr_ref(input: &str) -> IResult<&str, AttrRef> {
    let (input, first) = identifier(input)?;
    let (input, second) = opt(preceded(char('.'), identifier))(input)?;
    let attr = match second {
        Some(column) => AttrRef::qualified(first, column),
        None => AttrRef::bare(first),
    };
    Ok((input, attr))
}

// --- Conditions ---

fn keyword<'a>(word: &'static str) -> impl FnMut(&'a str) -> IResult<&'a str, &'a str> {
    terminated(
        tag_no_case(word),
        not(take_while1(|c: char| c.is_ascii_alphanumeric() || c == '_')),
    )
}

fn condition(input: &str) -> IResult<&str, ScalarExpr> {
    left_assoc(input, conjunction, "or", BinOp::Or)
}

fn conjunction(input: &str) -> IResult<&str, ScalarExpr> {
    left_assoc(input, term, "and", BinOp::And)
}

fn left_assoc<'a>(
    input: &'a str,
    operand: fn(&'a str) -> IResult<&'a str, ScalarExpr>,
    word: &'static str,
    op: BinOp,
) -> IResult<&'a str, ScalarExpr> {
    let (input, first) = operand(input)?;
    let (input, rest) = many0(preceded(ws(keyword(word)), operand))(input)?;
    let expr = rest
        .into_iter()
        .fold(first, |left, right| ScalarExpr::binary(left, op, right));
    Ok((input, expr))
}

fn term(input: &str) -> IResult<&str, ScalarExpr> {
    alt((delimited(char('('), ws(condition), char(')')), comparison))(input)
}

fn comparison(input: &str) -> IResult<&str, ScalarExpr> {
    let (input, (left, op, right)) = tuple((operand, ws(comparison_op), operand))(input)?;
    Ok((input, ScalarExpr::binary(left, op, right)))
}

fn comparison_op(input: &str) -> IResult<&str, BinOp> {
    alt((
        value(BinOp::Ne, tag("<>")),
        value(BinOp::Ne, tag("!=")),
        value(BinOp::Le, tag("<=")),
        value(BinOp::Ge, tag(">=")),
        value(BinOp::Eq, tag("=")),
        value(BinOp::Lt, tag("<")),
        value(BinOp::Gt, tag(">")),
    ))(input)
}

fn operand(input: &str) -> IResult<&str, ScalarExpr> {
    alt((
        map(string_literal, |raw| {
            ScalarExpr::Literal(Literal {
                raw: raw.to_string(),
                kind: LiteralKind::Str,
            })
        }),
        map(number_literal, |raw| {
            ScalarExpr::Literal(Literal::number(raw))
        }),
        map(attr_ref, ScalarExpr::Attr),
    ))(input)
}

fn string_literal(input: &str) -> IResult<&str, &str> {
    recognize(delimited(
        char('\''),
        many0(alt((is_not("'"), tag("''")))),
        char('\''),
    ))(input)
}

fn number_literal(input: &str) -> IResult<&str, &str> {
    recognize(tuple((
        opt(char('-')),
        digit1,
        opt(pair(char('.'), digit1)),
    )))(input)
}

#[cfg(test)]
#[path = "parse_test.rs"]
mod tests;
