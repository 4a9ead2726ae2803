//! Shared utilities for CLI commands

use anyhow::{Context, Result};
use rf_algebra::{parse_statement, PassManager, RaExpr};
use rf_core::{Config, ExecEnv, OutputFormat, RelationName, SchemaDirectory};
use rf_store::{LocalStore, MemoryStore, StageStore, StorageLocation};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::cli::{GlobalArgs, OutputArg, QueryArgs};

/// A loaded project: its configuration and root directory
pub(crate) struct Project {
    pub(crate) root: PathBuf,
    pub(crate) config: Config,
}

impl Project {
    /// Where base datasets and stage outputs live
    pub(crate) fn data_dir(&self) -> PathBuf {
        self.config.data_path_absolute(&self.root)
    }
}

/// Load the project config, honoring `--config` over `--project-dir`
pub(crate) fn load_project(global: &GlobalArgs) -> Result<Project> {
    let root = PathBuf::from(&global.project_dir);
    let config = match &global.config {
        Some(path) => Config::load(Path::new(path)),
        None => Config::load_from_dir(&root),
    }
    .context("Failed to load project config")?;

    if global.verbose {
        eprintln!(
            "[verbose] Loaded project '{}' ({} environment)",
            config.name, config.environment
        );
    }
    Ok(Project { root, config })
}

/// Parse the query text as RA, or translate it from SQL with `--sql`
pub(crate) fn parse_query(args: &QueryArgs) -> Result<RaExpr> {
    if args.sql {
        rf_sql::translate_sql(&args.query).context("Failed to translate SQL query")
    } else {
        parse_statement(&args.query).context("Failed to parse RA query")
    }
}

/// Run the configured optimizer passes, if optimization is enabled
pub(crate) fn optimize_query(
    tree: RaExpr,
    config: &Config,
    dd: &SchemaDirectory,
    global: &GlobalArgs,
) -> Result<RaExpr> {
    if !config.optimize.enabled {
        return Ok(tree);
    }
    let manager = PassManager::with_defaults();
    let filter = config.optimize.passes.as_deref();
    if let Some(filter) = filter {
        manager
            .validate_filter(filter)
            .context("Invalid optimize.passes in config")?;
    }
    let optimized = manager.run(tree, dd, filter);
    if global.verbose {
        eprintln!("[verbose] Optimized: {}", optimized);
    }
    Ok(optimized)
}

/// Parse and optimize the query against the project's schema
pub(crate) fn prepare_query(
    args: &QueryArgs,
    project: &Project,
    global: &GlobalArgs,
) -> Result<RaExpr> {
    let dd = project
        .config
        .schema_directory()
        .context("Invalid schema in config")?;
    let tree = parse_query(args)?;
    optimize_query(tree, &project.config, &dd, global)
}

/// Chain folding applies when the config allows it and `--no-fold` is absent
pub(crate) fn fold_enabled(config: &Config, no_fold: bool) -> bool {
    config.fold_chains() && !no_fold
}

/// Resolve the output format from the flag, falling back to the config
pub(crate) fn output_format(arg: Option<OutputArg>, config: &Config) -> OutputFormat {
    match arg {
        Some(OutputArg::Pretty) => OutputFormat::Pretty,
        Some(OutputArg::Json) => OutputFormat::Json,
        None => config.output,
    }
}

/// Open the stage store for the configured environment.
///
/// The memory environment starts empty, so every `<name>.json` file in the
/// data directory is preloaded as a base dataset.
pub(crate) async fn open_store(project: &Project) -> Result<Arc<dyn StageStore>> {
    let data_dir = project.data_dir();
    match project.config.environment {
        ExecEnv::Local => Ok(Arc::new(LocalStore::new(&data_dir))),
        ExecEnv::Memory => {
            let store = MemoryStore::new();
            preload_datasets(&store, &data_dir).await?;
            Ok(Arc::new(store))
        }
    }
}

/// Copy every base dataset under `data_dir` into `store`; returns how many
pub(crate) async fn preload_datasets(store: &MemoryStore, data_dir: &Path) -> Result<usize> {
    let mut entries = match tokio::fs::read_dir(data_dir).await {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(0),
        Err(e) => {
            return Err(e).with_context(|| format!("Failed to read {}", data_dir.display()))
        }
    };

    let mut loaded = 0;
    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        if path.extension().and_then(|e| e.to_str()) != Some("json") {
            continue;
        }
        let Some(name) = path
            .file_stem()
            .and_then(|s| s.to_str())
            .and_then(RelationName::try_new)
        else {
            log::warn!("Skipping dataset with a non-identifier name: {}", path.display());
            continue;
        };
        let content = tokio::fs::read_to_string(&path)
            .await
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let lines = content.lines().map(String::from).collect();
        store.insert(StorageLocation::Dataset(name), lines)?;
        loaded += 1;
    }
    Ok(loaded)
}

// ---------------------------------------------------------------------------
// Table-printing utilities
// ---------------------------------------------------------------------------

/// Calculate column widths for a table given headers and row data.
pub(crate) fn calculate_column_widths(headers: &[&str], rows: &[Vec<String>]) -> Vec<usize> {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.len()).collect();
    for row in rows {
        for (w, cell) in widths.iter_mut().zip(row.iter()) {
            *w = (*w).max(cell.len());
        }
    }
    widths
}

/// Print a left-aligned table with a dashed separator under the header
pub(crate) fn print_table(headers: &[&str], rows: &[Vec<String>]) {
    let widths = calculate_column_widths(headers, rows);

    let header_parts: Vec<String> = headers
        .iter()
        .zip(&widths)
        .map(|(h, &w)| format!("{:<width$}", h, width = w))
        .collect();
    println!("{}", header_parts.join("  "));

    let sep_parts: Vec<String> = widths.iter().map(|&w| "-".repeat(w)).collect();
    println!("{}", sep_parts.join("  "));

    for row in rows {
        let row_parts: Vec<String> = row
            .iter()
            .zip(&widths)
            .map(|(cell, &w)| format!("{:<width$}", cell, width = w))
            .collect();
        println!("{}", row_parts.join("  ").trim_end());
    }
}

#[cfg(test)]
#[path = "common_test.rs"]
mod tests;
