//! Run command implementation

use anyhow::{Context, Result};
use rf_core::{OutputFormat, Record, Tuple};
use rf_mapreduce::JobRunner;
use serde::Serialize;
use std::time::Instant;

use crate::cli::{GlobalArgs, RunArgs};
use crate::commands::common::{fold_enabled, load_project, open_store, output_format, prepare_query};

#[derive(Serialize)]
struct ResultRow<'a> {
    relation: &'a str,
    tuple: &'a Tuple,
}

/// Execute the run command
pub async fn execute(args: &RunArgs, global: &GlobalArgs) -> Result<()> {
    let project = load_project(global)?;
    let tree = prepare_query(&args.query, &project, global)?;
    let fold = fold_enabled(&project.config, args.no_fold);

    let store = open_store(&project).await?;
    let runner = JobRunner::new(store);

    let start = Instant::now();
    let records = runner
        .run(&tree, fold)
        .await
        .context("Query execution failed")?;

    if global.verbose {
        eprintln!(
            "[verbose] {} record(s) in {}ms",
            records.len(),
            start.elapsed().as_millis()
        );
    }

    print_records(&records, output_format(args.output, &project.config))
}

fn print_records(records: &[Record], format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Pretty => {
            for record in records {
                println!("{}", record.to_line());
            }
        }
        OutputFormat::Json => {
            let rows: Vec<ResultRow<'_>> = records
                .iter()
                .map(|r| ResultRow {
                    relation: &r.relation,
                    tuple: &r.tuple,
                })
                .collect();
            let json = serde_json::to_string_pretty(&rows).context("Failed to serialize results")?;
            println!("{json}");
        }
    }
    Ok(())
}
