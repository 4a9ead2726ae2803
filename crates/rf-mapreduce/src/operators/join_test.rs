use super::*;
use rf_algebra::{parse_condition, parse_statement};
use serde_json::json;

fn record(label: &str, value: Value) -> Record {
    Record::new(label, value.as_object().cloned().unwrap())
}

fn person_dept(cond: &str) -> JoinOp {
    JoinOp::new(
        parse_condition(cond).unwrap(),
        &RaExpr::relation("Person"),
        &RaExpr::relation("Dept"),
    )
}

#[test]
fn test_equality_pairs_ignore_non_equalities() {
    let cond = parse_condition("Person.dept = Dept.id and Person.age > 3 and Dept.id = 1").unwrap();
    let pairs = equality_pairs(&cond);
    assert_eq!(pairs.len(), 1);
    assert_eq!(pairs[0].0.name(), "Person.dept");
    assert_eq!(pairs[0].1.name(), "Dept.id");
}

#[test]
fn test_both_sides_produce_the_same_key() {
    let op = person_dept("Person.dept = Dept.id");
    let p = op.map(&record("Person", json!({"Person.id": 1, "Person.dept": 10})));
    let d = op.map(&record("Dept", json!({"Dept.id": 10, "Dept.name": "Ops"})));
    assert_eq!(p[0].key, "10");
    assert_eq!(d[0].key, "10");
}

#[test]
fn test_exact_match_preferred_over_suffix() {
    // Person.id would suffix-match `Dept.id`; the exact `Person.dept` must win
    let pairs = equality_pairs(&parse_condition("Dept.id = Person.dept").unwrap());
    let tuple = json!({"Person.id": 1, "Person.dept": 10})
        .as_object()
        .cloned()
        .unwrap();
    assert_eq!(join_key(&tuple, &pairs).as_deref(), Some("10"));
}

#[test]
fn test_composite_key_and_missing_key() {
    let pairs =
        equality_pairs(&parse_condition("R.a = S.a and R.b = S.b").unwrap());
    let tuple = json!({"R.a": 1, "R.b": "x"}).as_object().cloned().unwrap();
    assert_eq!(join_key(&tuple, &pairs).as_deref(), Some(r#"["1","x"]"#));

    let unrelated = json!({"T.c": 1}).as_object().cloned().unwrap();
    assert_eq!(join_key(&unrelated, &pairs), None);
}

#[test]
fn test_integral_float_keys_match_integers() {
    let pairs = equality_pairs(&parse_condition("R.a = S.a").unwrap());
    let a = json!({"R.a": 1}).as_object().cloned().unwrap();
    let b = json!({"S.a": 1.0}).as_object().cloned().unwrap();
    assert_eq!(join_key(&a, &pairs), join_key(&b, &pairs));
}

#[test]
fn test_record_without_key_is_dropped() {
    let op = person_dept("Person.dept = Dept.id");
    assert!(op.map(&record("Other", json!({"Other.x": 1}))).is_empty());
}

#[test]
fn test_reduce_cross_multiplies_and_rechecks_condition() {
    let op = person_dept("Person.dept = Dept.id and Person.age > 30");
    let values = vec![
        record("Person", json!({"Person.id": 1, "Person.dept": 10, "Person.age": 40})),
        record("Person", json!({"Person.id": 2, "Person.dept": 10, "Person.age": 20})),
        record("Dept", json!({"Dept.id": 10, "Dept.name": "Ops"})),
    ];
    let out = op.reduce("10", &values);
    assert_eq!(out.len(), 1);
    assert_eq!(out[0].relation, "Person");
    assert_eq!(
        Value::Object(out[0].tuple.clone()),
        json!({"Person.id": 1, "Person.dept": 10, "Person.age": 40, "Dept.id": 10, "Dept.name": "Ops"})
    );
}

#[test]
fn test_reduce_with_one_side_missing_is_empty() {
    let op = person_dept("Person.dept = Dept.id");
    let values = vec![record("Person", json!({"Person.id": 1, "Person.dept": 10}))];
    assert!(op.reduce("10", &values).is_empty());
}

#[test]
fn test_classification_falls_back_to_key_prefixes() {
    let op = person_dept("Person.dept = Dept.id");
    // a projection with no qualified key left would be labeled `result`
    let relabeled = record("result", json!({"Dept.id": 10}));
    assert_eq!(op.sides(&relabeled), (false, true));
}

#[test]
fn test_renamed_self_join_uses_aliases() {
    let tree = parse_statement(
        "\\rename_{A:*} Person \\join_{A.boss = B.id} \\rename_{B:*} Person",
    )
    .unwrap();
    let RaExpr::Join { left, cond, right } = tree else {
        panic!("expected a join");
    };
    let op = JoinOp::new(cond, &left, &right);
    let values = vec![
        record("A", json!({"A.id": 2, "A.boss": 1})),
        record("B", json!({"B.id": 1, "B.boss": 0})),
    ];
    let out = op.reduce("1", &values);
    assert_eq!(out.len(), 1);
    assert_eq!(out[0].relation, "A");
}

#[test]
fn test_shared_label_feeds_both_sides() {
    let op = JoinOp::new(
        parse_condition("Person.id = Person.id").unwrap(),
        &RaExpr::relation("Person"),
        &RaExpr::relation("Person"),
    );
    assert_eq!(
        op.sides(&record("Person", json!({"Person.id": 1}))),
        (true, true)
    );
}
