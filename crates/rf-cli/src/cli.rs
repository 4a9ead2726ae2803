//! CLI argument definitions using clap derive API

use clap::{Args, Parser, Subcommand, ValueEnum};

/// raflow - optimize relational algebra and run it as map/reduce stages
#[derive(Parser, Debug)]
#[command(name = "rf")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Global options
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Global arguments available to all commands
#[derive(Args, Debug, Clone)]
pub struct GlobalArgs {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to project directory
    #[arg(short = 'p', long, global = true, default_value = ".")]
    pub project_dir: String,

    /// Override config file path
    #[arg(short, long, global = true)]
    pub config: Option<String>,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the optimized RA text of a query
    Optimize(OptimizeArgs),

    /// Print the stage DAG of a query in execution order
    Plan(PlanArgs),

    /// Execute a query against the configured store
    Run(RunArgs),

    /// List the optimizer passes
    Passes,
}

/// The query every command takes
#[derive(Args, Debug, Clone)]
pub struct QueryArgs {
    /// RA statement, or SQL with --sql
    pub query: String,

    /// Treat the query as SQL and translate it to RA first
    #[arg(long)]
    pub sql: bool,
}

/// Arguments for the optimize command
#[derive(Args, Debug)]
pub struct OptimizeArgs {
    #[command(flatten)]
    pub query: QueryArgs,

    /// Output format (default: from config)
    #[arg(short, long, value_enum)]
    pub output: Option<OutputArg>,
}

/// Arguments for the plan command
#[derive(Args, Debug)]
pub struct PlanArgs {
    #[command(flatten)]
    pub query: QueryArgs,

    /// Compile without folding unary chains into single stages
    #[arg(long)]
    pub no_fold: bool,

    /// Output format (default: from config)
    #[arg(short, long, value_enum)]
    pub output: Option<OutputArg>,
}

/// Arguments for the run command
#[derive(Args, Debug)]
pub struct RunArgs {
    #[command(flatten)]
    pub query: QueryArgs,

    /// Compile without folding unary chains into single stages
    #[arg(long)]
    pub no_fold: bool,

    /// Output format (default: from config)
    #[arg(short, long, value_enum)]
    pub output: Option<OutputArg>,
}

/// Output format override
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputArg {
    /// Human-readable text
    Pretty,
    /// JSON
    Json,
}

#[cfg(test)]
#[path = "cli_test.rs"]
mod tests;
