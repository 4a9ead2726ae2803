//! Optimize command implementation

use anyhow::{Context, Result};
use rf_core::OutputFormat;
use serde::Serialize;

use crate::cli::{GlobalArgs, OptimizeArgs};
use crate::commands::common::{load_project, output_format, parse_query, prepare_query};

#[derive(Serialize)]
struct OptimizeOutput {
    input: String,
    optimized: String,
}

/// Execute the optimize command
pub async fn execute(args: &OptimizeArgs, global: &GlobalArgs) -> Result<()> {
    let project = load_project(global)?;
    let input = parse_query(&args.query)?;
    let optimized = prepare_query(&args.query, &project, global)?;

    match output_format(args.output, &project.config) {
        OutputFormat::Pretty => println!("{}", optimized.to_statement()),
        OutputFormat::Json => {
            let out = OptimizeOutput {
                input: input.to_statement(),
                optimized: optimized.to_statement(),
            };
            let json = serde_json::to_string_pretty(&out).context("Failed to serialize output")?;
            println!("{json}");
        }
    }
    Ok(())
}
