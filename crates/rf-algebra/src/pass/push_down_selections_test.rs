use super::*;
use crate::parse::parse_statement;

fn dd() -> SchemaDirectory {
    SchemaDirectory::new()
        .with_relation("Person", ["id", "name"])
        .with_relation("Dept", ["id", "pid"])
        .with_relation("Site", ["sid", "city"])
}

fn push(query: &str) -> String {
    push_down_selections(parse_statement(query).unwrap(), &dd()).to_string()
}

#[test]
fn test_single_branch_condition_is_pushed() {
    assert_eq!(
        push("\\select_{Person.id = 5} (Person \\cross Dept)"),
        "(\\select_{Person.id = 5} (Person) \\cross Dept)"
    );
}

#[test]
fn test_right_branch_condition_is_pushed() {
    assert_eq!(
        push("\\select_{pid = 2} (Person \\cross Dept)"),
        "(Person \\cross \\select_{pid = 2} (Dept))"
    );
}

#[test]
fn test_join_condition_stays_above_cross() {
    let q = "\\select_{Person.id = Dept.pid} (Person \\cross Dept)";
    assert_eq!(push(q), parse_statement(q).unwrap().to_string());
}

#[test]
fn test_pushes_through_nested_cross() {
    assert_eq!(
        push("\\select_{Site.city = 'Oslo'} (Person \\cross (Dept \\cross Site))"),
        "(Person \\cross (Dept \\cross \\select_{Site.city = 'Oslo'} (Site)))"
    );
}

#[test]
fn test_ambiguous_bare_condition_stays() {
    // `id` exists on both sides, so the bare condition is a join condition
    let q = "\\select_{id = 1} (Person \\cross Dept)";
    assert_eq!(push(q), parse_statement(q).unwrap().to_string());
}

#[test]
fn test_outer_condition_skips_inner_join_condition() {
    assert_eq!(
        push("\\select_{Person.name = 'Ana'} \\select_{Person.id = Dept.pid} (Person \\cross Dept)"),
        "\\select_{Person.id = Dept.pid} (\\select_{Person.name = 'Ana'} (Person) \\cross Dept)"
    );
}

#[test]
fn test_decomposed_conjunction_pushes_local_part() {
    let tree = crate::pass::decompose::decompose_selections(
        parse_statement("\\select_{Person.id = Dept.pid and Dept.id = 10} (Person \\cross Dept)")
            .unwrap(),
    );
    assert_eq!(
        push_down_selections(tree, &dd()).to_string(),
        "\\select_{Person.id = Dept.pid} (Person \\cross \\select_{Dept.id = 10} (Dept))"
    );
}

#[test]
fn test_renamed_branch_uses_alias() {
    assert_eq!(
        push("\\select_{P.name = 'Bob'} (\\rename_{P:*} Person \\cross Dept)"),
        "(\\select_{P.name = 'Bob'} \\rename_{P:*} (Person) \\cross Dept)"
    );
}

#[test]
fn test_unknown_attribute_stays_in_place() {
    let q = "\\select_{Other.x = 1} (Person \\cross Dept)";
    assert_eq!(push(q), parse_statement(q).unwrap().to_string());
}
