pub mod doctor;
pub mod record;
pub mod related;
pub mod reset;
pub mod stats;

use std::path::Path;

use crate::config::MemdirConfig;
use crate::recall::{IndexStore, MemoryAccessRecorder, RecorderOptions};

/// Recorder over `root` for commands that only query the index. It never
/// saves, so nothing is created on disk.
pub fn query_recorder(config: &MemdirConfig, root: &Path) -> MemoryAccessRecorder {
    let store = IndexStore::in_dir(root, &config.storage.index_file);
    MemoryAccessRecorder::new(root, store, RecorderOptions::from(&config.recall))
}

/// Human-readable size, e.g. `12.4 KB`.
pub fn format_bytes(bytes: u64) -> String {
    if bytes < 1024 {
        format!("{bytes} B")
    } else if bytes < 1024 * 1024 {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    } else {
        format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
    }
}

/// Local modification time of a file, if it can be read.
pub fn modified_at(path: &Path) -> Option<String> {
    let modified = std::fs::metadata(path).and_then(|m| m.modified()).ok()?;
    let local: chrono::DateTime<chrono::Local> = modified.into();
    Some(local.format("%Y-%m-%d %H:%M:%S").to_string())
}
