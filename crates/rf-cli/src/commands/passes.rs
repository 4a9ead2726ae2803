//! Passes command implementation

use anyhow::Result;
use rf_algebra::PassManager;

use crate::cli::GlobalArgs;
use crate::commands::common::print_table;

/// Execute the passes command
pub async fn execute(_global: &GlobalArgs) -> Result<()> {
    let manager = PassManager::with_defaults();
    let rows: Vec<Vec<String>> = manager
        .describe()
        .into_iter()
        .map(|(name, description)| vec![name.to_string(), description.to_string()])
        .collect();
    print_table(&["PASS", "DESCRIPTION"], &rows);
    Ok(())
}
