//! CLI `related` command: list the files most often used together with one file.

use anyhow::Result;

use crate::config::MemdirConfig;
use crate::files::guard::PathGuard;

/// Print the strongest associations of `path` without recording an access.
pub fn related(config: &MemdirConfig, path: &str, limit: Option<usize>) -> Result<()> {
    let root = config.resolved_memory_dir();
    if !root.is_dir() {
        println!("No memory directory at {}", root.display());
        return Ok(());
    }

    let guard = PathGuard::open(&root)?;
    let target = guard.validate(Some(path))?;
    let recorder = crate::cli::query_recorder(config, guard.root());

    let limit = limit.unwrap_or(config.recall.max_recommendations);
    let related = recorder.related(target.rel(), limit)?;

    if related.is_empty() {
        println!("No related files for {}", target.display());
        return Ok(());
    }

    println!("Related to {}:", target.display());
    for (i, rec) in related.iter().enumerate() {
        println!("  [{}] {:<40} co-visited {}x", i + 1, rec.path, rec.count);
    }
    Ok(())
}
