//! Plan command implementation

use anyhow::{Context, Result};
use rf_core::OutputFormat;
use rf_mapreduce::{TaskDag, TaskDescriptor};
use serde::Serialize;

use crate::cli::{GlobalArgs, PlanArgs};
use crate::commands::common::{
    fold_enabled, load_project, output_format, prepare_query, print_table,
};

/// One stage of the plan, as printed
#[derive(Serialize)]
pub(crate) struct PlanStage {
    stage: u32,
    kind: String,
    depends_on: Vec<u32>,
    output: String,
    query: String,
}

/// Execute the plan command
pub async fn execute(args: &PlanArgs, global: &GlobalArgs) -> Result<()> {
    let project = load_project(global)?;
    let tree = prepare_query(&args.query, &project, global)?;
    let fold = fold_enabled(&project.config, args.no_fold);

    let dag = TaskDag::build(&tree, fold).context("Failed to compile query")?;
    let stages = plan_stages(&dag)?;

    match output_format(args.output, &project.config) {
        OutputFormat::Pretty => {
            let rows: Vec<Vec<String>> = stages
                .iter()
                .map(|s| {
                    vec![
                        s.stage.to_string(),
                        s.kind.clone(),
                        join_stages(&s.depends_on),
                        s.output.clone(),
                        s.query.clone(),
                    ]
                })
                .collect();
            print_table(&["STAGE", "KIND", "DEPENDS ON", "OUTPUT", "QUERY"], &rows);
        }
        OutputFormat::Json => {
            let json =
                serde_json::to_string_pretty(&stages).context("Failed to serialize plan")?;
            println!("{json}");
        }
    }
    Ok(())
}

/// Stages in execution order, dependencies first
pub(crate) fn plan_stages(dag: &TaskDag) -> Result<Vec<PlanStage>> {
    dag.execution_order()?
        .into_iter()
        .map(|task| plan_stage(dag, task))
        .collect()
}

fn plan_stage(dag: &TaskDag, task: &TaskDescriptor) -> Result<PlanStage> {
    Ok(PlanStage {
        stage: task.stage,
        kind: task.kind.to_string(),
        depends_on: dag.dependencies(task.stage).to_vec(),
        output: task.output_location()?.to_string(),
        query: task.query.clone(),
    })
}

fn join_stages(stages: &[u32]) -> String {
    if stages.is_empty() {
        return "-".to_string();
    }
    stages
        .iter()
        .map(u32::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}
