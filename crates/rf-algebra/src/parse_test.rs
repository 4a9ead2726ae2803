use super::*;
use crate::fold::fold_chains;
use crate::ra::ChainStep;

fn lit(n: &str) -> ScalarExpr {
    ScalarExpr::Literal(Literal::number(n))
}

#[test]
fn test_parse_relation() {
    assert_eq!(parse_statement("Person;").unwrap(), RaExpr::relation("Person"));
    assert_eq!(parse_statement("  (Person)  ").unwrap(), RaExpr::relation("Person"));
}

#[test]
fn test_parse_select_over_cross() {
    let e = parse_statement("\\select_{Person.id = Dept.pid} (Person \\cross Dept);").unwrap();
    assert_eq!(
        e,
        RaExpr::select(
            ScalarExpr::eq(ScalarExpr::attr("Person.id"), ScalarExpr::attr("Dept.pid")),
            RaExpr::cross(RaExpr::relation("Person"), RaExpr::relation("Dept")),
        )
    );
}

#[test]
fn test_unary_binds_tighter_than_binary() {
    let e = parse_statement("\\select_{id = 1} Person \\cross Dept").unwrap();
    assert_eq!(
        e,
        RaExpr::cross(
            RaExpr::select(ScalarExpr::eq(ScalarExpr::attr("id"), lit("1")), RaExpr::relation("Person")),
            RaExpr::relation("Dept"),
        )
    );
}

#[test]
fn test_binary_operators_left_associative() {
    let e = parse_statement("A \\cross B \\join_{B.x = C.x} C").unwrap();
    match e {
        RaExpr::Join { left, right, .. } => {
            assert_eq!(left.kind(), "cross");
            assert_eq!(*right, RaExpr::relation("C"));
        }
        other => panic!("expected join, got {other:?}"),
    }
}

#[test]
fn test_parse_condition_precedence() {
    let c = parse_condition("a = 1 or b = 2 and c = 3").unwrap();
    assert_eq!(c.to_string(), "(a = 1) or ((b = 2) and (c = 3))");

    let c = parse_condition("a = 1 AND b <> 'x' and c >= -2.5").unwrap();
    assert_eq!(c.to_string(), "((a = 1) and (b <> 'x')) and (c >= -2.5)");
}

#[test]
fn test_parse_condition_operators() {
    for (text, op) in [
        ("a = b", BinOp::Eq),
        ("a != b", BinOp::Ne),
        ("a <> b", BinOp::Ne),
        ("a < b", BinOp::Lt),
        ("a <= b", BinOp::Le),
        ("a > b", BinOp::Gt),
        ("a >= b", BinOp::Ge),
    ] {
        match parse_condition(text).unwrap() {
            ScalarExpr::Binary { op: parsed, .. } => assert_eq!(parsed, op, "{text}"),
            other => panic!("expected binary op for {text}, got {other:?}"),
        }
    }
}

#[test]
fn test_parse_string_literal_with_escaped_quote() {
    let c = parse_condition("name = 'O''Hara'").unwrap();
    match c {
        ScalarExpr::Binary { right, .. } => match *right {
            ScalarExpr::Literal(lit) => {
                assert_eq!(lit.kind, LiteralKind::Str);
                assert_eq!(lit.unquoted(), "O'Hara");
            }
            other => panic!("expected literal, got {other:?}"),
        },
        other => panic!("expected binary op, got {other:?}"),
    }
}

#[test]
fn test_parse_rename_forms() {
    let forms = [
        ("\\rename_{P:*} Person", Some("P"), RenameAttrs::Wildcard),
        (
            "\\rename_{P: a, b} Person",
            Some("P"),
            RenameAttrs::List(vec!["a".into(), "b".into()]),
        ),
        ("\\rename_{P} Person", Some("P"), RenameAttrs::None),
        (
            "\\rename_{:a} Person",
            None,
            RenameAttrs::List(vec!["a".into()]),
        ),
    ];
    for (text, alias, attrs) in forms {
        match parse_statement(text).unwrap() {
            RaExpr::Rename { spec, .. } => {
                assert_eq!(spec.alias.as_deref(), alias, "{text}");
                assert_eq!(spec.attrs, attrs, "{text}");
            }
            other => panic!("expected rename for {text}, got {other:?}"),
        }
    }
}

#[test]
fn test_parse_project_list() {
    let e = parse_statement("\\project_{Person.name, id} Person").unwrap();
    assert_eq!(
        e,
        RaExpr::project(
            vec![AttrRef::qualified("Person", "name"), AttrRef::bare("id")],
            RaExpr::relation("Person"),
        )
    );
}

#[test]
fn test_parse_errors() {
    assert!(matches!(
        parse_statement("\\select_{id = } Person"),
        Err(AlgebraError::Parse { .. })
    ));
    assert!(matches!(
        parse_statement("Person Dept"),
        Err(AlgebraError::TrailingInput { position: 7, .. })
    ));
    assert!(parse_statement("").is_err());
    assert!(parse_statement("\\project_{} Person").is_err());
}

#[test]
fn test_render_reparse_structural_roundtrip() {
    let queries = [
        "\\project_{name} \\select_{id = 1} Person",
        "\\select_{(Person.id = Dept.pid) and (Dept.id > 10)} (Person \\cross Dept)",
        "\\rename_{P:*} Person \\join_{P.id = Dept.pid} \\project_{Dept.pid} Dept",
        "\\select_{name = 'Ana' or name = 'Bob'} \\rename_{:a,b} Person",
    ];
    for q in queries {
        let tree = parse_statement(q).unwrap();
        let again = parse_statement(&tree.to_statement()).unwrap();
        assert_eq!(again, tree, "{q}");
    }
}

#[test]
fn test_folded_render_reparses_to_same_fold() {
    let tree = parse_statement(
        "\\project_{name} \\select_{id = 1} \\rename_{P:*} Person \\join_{P.id = Dept.pid} Dept",
    )
    .unwrap();
    let folded = fold_chains(tree);
    let reparsed = parse_statement(&folded.to_statement()).unwrap();
    assert_eq!(fold_chains(reparsed), folded);
}

#[test]
fn test_chain_rendering_reparses_as_nested_unary() {
    let chain = RaExpr::chained(
        vec![
            ChainStep::Select(ScalarExpr::eq(ScalarExpr::attr("id"), lit("1"))),
            ChainStep::Project(vec![AttrRef::bare("name")]),
        ],
        RaExpr::relation("Person"),
    )
    .unwrap();
    let reparsed = parse_statement(&chain.to_statement()).unwrap();
    assert_eq!(reparsed.kind(), "project");
    assert_eq!(fold_chains(reparsed), chain);
}
