#![allow(dead_code)]

use memdir::config::FilesConfig;
use memdir::files::guard::PathGuard;
use memdir::files::MemoryFiles;
use memdir::recall::persistence::DEFAULT_INDEX_FILE;
use memdir::recall::{IndexStore, MemoryAccessRecorder, RecorderOptions};
use std::path::Path;
use std::sync::Arc;
use tempfile::TempDir;

/// Recorder over `root` that does not check whether recommended files exist.
pub fn test_recorder(root: &Path) -> MemoryAccessRecorder {
    test_recorder_with(
        root,
        RecorderOptions {
            skip_missing: false,
            ..RecorderOptions::default()
        },
    )
}

pub fn test_recorder_with(root: &Path, options: RecorderOptions) -> MemoryAccessRecorder {
    MemoryAccessRecorder::new(root, IndexStore::in_dir(root, DEFAULT_INDEX_FILE), options)
}

/// File layer over a fresh temp directory with default limits and recorder options.
pub fn test_files() -> (TempDir, MemoryFiles) {
    let tmp = TempDir::new().unwrap();
    let guard = PathGuard::new(tmp.path()).unwrap();
    let recorder = Arc::new(test_recorder_with(
        guard.root(),
        RecorderOptions::default(),
    ));
    let files = MemoryFiles::new(guard, recorder, FilesConfig::default());
    (tmp, files)
}

/// Write `content` to `rel` under `root`, creating parent directories.
pub fn write_file(root: &Path, rel: &str, content: &str) {
    let path = root.join(rel);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(path, content).unwrap();
}
