//! CLI `reset` command: delete the co-visitation index after user confirmation.

use anyhow::{bail, Result};
use std::io::Write;

use crate::config::MemdirConfig;
use crate::recall::IndexStore;

/// Delete all learned associations after user confirmation. Memory files are
/// not touched.
pub fn reset(config: &MemdirConfig) -> Result<()> {
    let store = IndexStore::in_dir(config.resolved_memory_dir(), &config.storage.index_file);

    println!("WARNING: This will permanently delete ALL learned file associations.");
    println!("Index: {}", store.path().display());
    print!("\nType YES to confirm: ");
    std::io::stdout().flush()?;

    let mut input = String::new();
    std::io::stdin().read_line(&mut input)?;

    if input.trim() != "YES" {
        bail!("reset cancelled");
    }

    if store.remove()? {
        println!("Co-visitation index deleted.");
    } else {
        println!("No co-visitation index to delete.");
    }
    Ok(())
}
