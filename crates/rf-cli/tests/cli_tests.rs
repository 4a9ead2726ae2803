//! CLI integration tests for `rf optimize`, `rf plan` and `rf run`

use std::process::{Command, Output};
use tempfile::TempDir;

/// Path to the compiled rf binary (resolved at compile time)
fn rf_bin() -> String {
    env!("CARGO_BIN_EXE_rf").to_string()
}

fn fixture_dir() -> &'static str {
    "tests/fixtures/person_dept"
}

fn rf(project_dir: &str, args: &[&str]) -> Output {
    Command::new(rf_bin())
        .args(["--project-dir", project_dir])
        .args(args)
        .output()
        .expect("Failed to run rf")
}

fn stdout_of(output: &Output) -> String {
    assert!(
        output.status.success(),
        "rf failed.\nstdout: {}\nstderr: {}",
        String::from_utf8_lossy(&output.stdout),
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8_lossy(&output.stdout).into_owned()
}

#[test]
fn test_optimize_turns_cross_into_join() {
    let out = stdout_of(&rf(
        fixture_dir(),
        &["optimize", "\\select_{Person.id = Dept.pid} (Person \\cross Dept);"],
    ));
    assert!(out.contains("\\join_{"), "{out}");
    assert!(!out.contains("\\cross"), "{out}");
}

#[test]
fn test_plan_json_lists_every_stage() {
    let out = stdout_of(&rf(
        fixture_dir(),
        &[
            "plan",
            "SELECT Person.name FROM Person, Dept WHERE Person.id = Dept.pid",
            "--sql",
            "-o",
            "json",
        ],
    ));
    let stages: serde_json::Value = serde_json::from_str(&out).unwrap();
    let stages = stages.as_array().unwrap();
    assert!(stages.len() >= 4);
    let last = stages.last().unwrap();
    assert_eq!(last["stage"], 1);
}

#[test]
fn test_run_in_memory_environment() {
    let out = stdout_of(&rf(
        fixture_dir(),
        &["run", "\\project_{name} \\select_{id = 1} Person;"],
    ));
    let lines: Vec<&str> = out.lines().collect();
    assert_eq!(lines, vec!["Person\t{\"Person.name\":\"Ana\"}"]);
}

#[test]
fn test_run_sql_json_output() {
    let out = stdout_of(&rf(
        fixture_dir(),
        &[
            "run",
            "--sql",
            "SELECT * FROM Person p, Dept d WHERE p.id = d.pid",
            "--output",
            "json",
        ],
    ));
    let rows: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(rows.as_array().unwrap().len(), 2);
    assert_eq!(rows[0]["relation"], "p");
}

#[test]
fn test_unsupported_cross_fails_with_operator_name() {
    let output = rf(fixture_dir(), &["run", "Person \\cross Dept;"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("cross"), "{stderr}");
}

#[test]
fn test_run_local_environment_writes_stage_files() {
    let dir = TempDir::new().unwrap();
    let root = dir.path();
    std::fs::write(root.join("raflow.yml"), "name: local_demo\nenvironment: local\n").unwrap();
    std::fs::create_dir_all(root.join("data")).unwrap();
    std::fs::write(
        root.join("data/Person.json"),
        "{\"id\": 1, \"name\": \"Ana\"}\n{\"id\": 2, \"name\": \"Bob\"}\n",
    )
    .unwrap();

    let project_dir = root.display().to_string();
    let out = stdout_of(&rf(
        &project_dir,
        &["run", "--no-fold", "\\project_{name} \\select_{id = 2} Person;"],
    ));
    assert_eq!(out.trim_end(), "Person\t{\"Person.name\":\"Bob\"}");
    assert!(root.join("data/tmp1.tmp").exists());
    assert!(root.join("data/tmp2.tmp").exists());
}
