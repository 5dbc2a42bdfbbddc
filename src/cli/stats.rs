use anyhow::Result;

use crate::cli::{format_bytes, modified_at};
use crate::config::MemdirConfig;

/// Display co-visitation statistics in the terminal.
pub fn stats(config: &MemdirConfig, top: usize) -> Result<()> {
    let recorder = crate::cli::query_recorder(config, &config.resolved_memory_dir());
    let response = recorder.stats(top)?;

    let size = std::fs::metadata(&response.index_path)
        .map(|m| m.len())
        .unwrap_or(0);

    println!("Associative Memory Statistics");
    println!("{}", "=".repeat(40));
    println!("  Tracked files:       {}", response.index.files);
    println!("  Co-visited pairs:    {}", response.index.pairs);
    println!("  Total co-visits:     {}", response.index.total_co_visits);
    println!();

    if !response.index.strongest.is_empty() {
        println!("Strongest pairs:");
        for pair in &response.index.strongest {
            println!("  {:>4}x  {} <-> {}", pair.count, pair.a, pair.b);
        }
        println!();
    }

    println!("Index file:            {}", response.index_path.display());
    println!("Index size:            {}", format_bytes(size));
    if let Some(saved) = modified_at(&response.index_path) {
        println!("Last saved:            {saved}");
    }

    Ok(())
}
