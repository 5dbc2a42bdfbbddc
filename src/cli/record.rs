//! CLI `record` command: feed accesses through the recorder, e.g. to seed
//! associations from a script.

use anyhow::Result;

use crate::config::MemdirConfig;
use crate::files::guard::PathGuard;
use crate::recall::recommend::format_related;

/// Record `paths`, in order, as accesses of `kind` by `session`.
pub fn record(config: &MemdirConfig, session: &str, kind: &str, paths: &[String]) -> Result<()> {
    let guard = PathGuard::new(config.resolved_memory_dir())?;
    let recorder = crate::server::recorder_for(&guard, config);

    for raw in paths {
        let target = guard.validate(Some(raw))?;
        match recorder.on_access_named(Some(session), target.rel(), kind)? {
            Some(related) if !related.is_empty() => {
                println!("{} ({kind})", target.display());
                print!("{}", format_related(&related));
            }
            _ => println!("{} ({kind})", target.display()),
        }
    }

    let stats = recorder.stats(0)?;
    println!(
        "Index now tracks {} files, {} pairs.",
        stats.index.files, stats.index.pairs
    );
    Ok(())
}
