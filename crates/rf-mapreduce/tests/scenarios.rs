//! End-to-end scenarios over the Person/Dept fixture: parse, optimize,
//! compile and run against the in-memory store.

use rf_algebra::{fold_chains, optimize, parse_statement, ChainStep, RaExpr};
use rf_mapreduce::test_utils::{person_dept_schema, person_dept_store, run_ra, tuple_set};
use rf_mapreduce::{JobRunner, TaskDag, TaskKind};
use std::collections::BTreeSet;

fn set(items: &[&str]) -> BTreeSet<String> {
    items.iter().map(|s| s.to_string()).collect()
}

#[tokio::test]
async fn test_selection_over_cross_becomes_a_join() {
    let dd = person_dept_schema();
    let tree = optimize(
        parse_statement("\\select_{Person.id = Dept.pid} (Person \\cross Dept)").unwrap(),
        &dd,
    );
    assert!(matches!(tree, RaExpr::Join { .. }), "got {tree}");
    assert_eq!(tree.count_kind("cross"), 0);

    let out = JobRunner::new(person_dept_store())
        .run(&tree, true)
        .await
        .unwrap();
    assert_eq!(
        tuple_set(&out),
        set(&[
            r#"{"Dept.id":10,"Dept.pid":1,"Person.id":1,"Person.name":"Ana"}"#,
            r#"{"Dept.id":20,"Dept.pid":2,"Person.id":2,"Person.name":"Bob"}"#,
        ])
    );
}

#[tokio::test]
async fn test_projection_over_selection_folds_into_one_stage() {
    let tree = parse_statement("\\project_{name} \\select_{id = 1} Person").unwrap();
    match fold_chains(tree.clone()) {
        RaExpr::Chained { steps, input } => {
            assert_eq!(steps.len(), 2);
            assert!(matches!(steps[0], ChainStep::Select(_)));
            assert!(matches!(steps[1], ChainStep::Project(_)));
            assert_eq!(*input, RaExpr::relation("Person"));
        }
        other => panic!("expected a chain, got {other}"),
    }

    let dag = TaskDag::build(&tree, true).unwrap();
    assert_eq!(dag.len(), 2);
    assert_eq!(dag.root().map(|t| t.kind), Some(TaskKind::Chained));

    let out = run_ra(
        person_dept_store(),
        &person_dept_schema(),
        "\\project_{name} \\select_{id = 1} Person",
        true,
    )
    .await;
    assert_eq!(out.len(), 1);
    assert_eq!(tuple_set(&out), set(&[r#"{"Person.name":"Ana"}"#]));
    assert_eq!(out[0].relation, "Person");
}

#[test]
fn test_single_relation_selection_is_pushed_not_joined() {
    let dd = person_dept_schema();
    let tree = optimize(
        parse_statement("\\select_{Person.id = 5} (Person \\cross Dept)").unwrap(),
        &dd,
    );
    let RaExpr::Cross { left, right } = &tree else {
        panic!("expected the cross to stay, got {tree}");
    };
    assert_eq!(
        left.as_ref(),
        &parse_statement("\\select_{Person.id = 5} Person").unwrap()
    );
    assert_eq!(right.as_ref(), &RaExpr::relation("Dept"));
    assert_eq!(tree.count_kind("join"), 0);
}

#[tokio::test]
async fn test_unsupported_cross_names_the_operator() {
    let dd = person_dept_schema();
    let tree = optimize(
        parse_statement("\\select_{Person.id = 5} (Person \\cross Dept)").unwrap(),
        &dd,
    );
    let err = JobRunner::new(person_dept_store())
        .run(&tree, true)
        .await
        .unwrap_err();
    assert!(err.to_string().contains("cross"), "{err}");
}

#[tokio::test]
async fn test_sql_matches_hand_written_ra() {
    let dd = person_dept_schema();
    let sql = rf_sql::translate_sql(
        "SELECT Person.name FROM Person, Dept WHERE Person.id = Dept.pid AND Dept.id = 20",
    )
    .unwrap();
    let sql_tree = optimize(sql, &dd);
    let from_sql = JobRunner::new(person_dept_store())
        .run(&sql_tree, true)
        .await
        .unwrap();

    let from_ra = run_ra(
        person_dept_store(),
        &dd,
        "\\project_{Person.name} (Person \\join_{Person.id = Dept.pid} \\select_{Dept.id = 20} Dept)",
        true,
    )
    .await;

    assert_eq!(tuple_set(&from_sql), set(&[r#"{"Person.name":"Bob"}"#]));
    assert_eq!(tuple_set(&from_sql), tuple_set(&from_ra));
}

#[tokio::test]
async fn test_sql_aliases_drive_a_renamed_join() {
    let dd = person_dept_schema();
    let tree = optimize(
        rf_sql::translate_sql("SELECT p.name FROM Person p, Dept d WHERE p.id = d.pid").unwrap(),
        &dd,
    );
    assert_eq!(tree.count_kind("join"), 1, "got {tree}");

    let out = JobRunner::new(person_dept_store())
        .run(&tree, true)
        .await
        .unwrap();
    assert_eq!(
        tuple_set(&out),
        set(&[r#"{"p.name":"Ana"}"#, r#"{"p.name":"Bob"}"#])
    );
}
