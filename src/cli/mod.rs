//! Command-line front end: terminal player and stage checker

pub mod play;
pub mod view_state;

use crate::loader::{self, check::CheckResult};
use std::path::Path;

/// Validate a stage file and print its warnings
///
/// Fails only when the file cannot be read or is not stage JSON.
pub async fn run_check(path: &Path) -> anyhow::Result<CheckResult> {
    let content = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| anyhow::anyhow!("failed to read '{}': {e}", path.display()))?;
    let graph = loader::parse_stage(&content)?;
    let result = loader::check::check(&graph);

    println!(
        "{}: {} nodes, {} characters",
        path.display(),
        graph.len(),
        graph.characters.len()
    );
    if result.warnings.is_empty() {
        println!("OK");
    }
    for warning in &result.warnings {
        println!("warning: {warning}");
    }
    Ok(result)
}
