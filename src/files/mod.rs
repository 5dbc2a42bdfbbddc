//! Sandboxed file operations on the memory directory.
//!
//! [`MemoryFiles`] implements the file tools. `view`, `create`, `str_replace`
//! and `insert` report each touched file to the [`MemoryAccessRecorder`] after
//! their own I/O; `delete`, `rename` and `clear_all` do not take part in
//! co-visitation tracking. A tracking failure is logged and never fails the
//! file operation that triggered it.

pub mod guard;
pub mod render;

use anyhow::{bail, Context, Result};
use std::sync::Arc;

use crate::config::FilesConfig;
use crate::recall::recommend::format_related;
use crate::recall::{AccessKind, MemoryAccessRecorder, Recommendation};
use guard::{is_internal_name, GuardedPath, PathGuard};

/// File operations bound to one memory root.
#[derive(Debug)]
pub struct MemoryFiles {
    guard: PathGuard,
    recorder: Arc<MemoryAccessRecorder>,
    limits: FilesConfig,
}

impl MemoryFiles {
    pub fn new(guard: PathGuard, recorder: Arc<MemoryAccessRecorder>, limits: FilesConfig) -> Self {
        Self {
            guard,
            recorder,
            limits,
        }
    }

    pub fn recorder(&self) -> &Arc<MemoryAccessRecorder> {
        &self.recorder
    }

    /// Validate `raw` and refuse internal entries.
    fn resolve(&self, raw: Option<&str>, verb: &str) -> Result<GuardedPath> {
        let target = self.guard.validate(raw)?;
        if target.is_internal() {
            bail!("Cannot {verb} internal file: {}", target.display());
        }
        Ok(target)
    }

    /// Report an access to the recorder. Failures are logged, not returned.
    fn track(
        &self,
        session: Option<&str>,
        target: &GuardedPath,
        kind: AccessKind,
    ) -> Option<Vec<Recommendation>> {
        match self.recorder.on_access(session, target.rel(), kind) {
            Ok(recs) => recs,
            Err(e) => {
                tracing::warn!(path = target.rel(), error = %e, "co-visitation tracking failed");
                None
            }
        }
    }

    /// Directory tree, or file content (optionally a 0-based inclusive line
    /// range) followed by related files.
    pub fn view(
        &self,
        path: Option<&str>,
        start_line: Option<usize>,
        end_line: Option<usize>,
        session: Option<&str>,
    ) -> Result<String> {
        let target = self.resolve(path, "access")?;
        let abs = target.abs();

        if abs.is_dir() {
            let lines = render::build_tree(abs, 0);
            let listing = if lines.is_empty() {
                "(empty)".to_string()
            } else {
                lines.join("\n")
            };
            return Ok(render::truncate_response(
                listing,
                self.limits.max_response_chars,
            ));
        }

        if !abs.is_file() {
            bail!("Path not found: {}", target.display());
        }

        let content = std::fs::read_to_string(abs)
            .with_context(|| format!("Cannot read file {}", target.display()))?;
        let mut result = render::slice_lines(&content, start_line, end_line);

        let related = self
            .track(session, &target, AccessKind::Read)
            .unwrap_or_default();
        if !related.is_empty() {
            result.push_str("\n\n");
            result.push_str(&format_related(&related));
        }

        Ok(render::truncate_response(
            result,
            self.limits.max_response_chars,
        ))
    }

    /// Create or overwrite a file.
    pub fn create(&self, path: &str, file_text: &str, session: Option<&str>) -> Result<String> {
        let target = self.resolve(Some(path), "create")?;
        if target.is_root() || target.abs().is_dir() {
            bail!("Cannot create {}: is a directory", target.display());
        }

        if let Some(parent) = target.abs().parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Cannot create directories for {}", target.display()))?;
        }
        std::fs::write(target.abs(), file_text)
            .with_context(|| format!("Cannot write {}", target.display()))?;

        self.track(session, &target, AccessKind::Write);

        Ok(self.with_size_warning(format!("Created: {}", target.display()), file_text))
    }

    /// Replace the single occurrence of `old_str` with `new_str`.
    pub fn str_replace(
        &self,
        path: &str,
        old_str: &str,
        new_str: &str,
        session: Option<&str>,
    ) -> Result<String> {
        let target = self.resolve(Some(path), "edit")?;
        let content = self.read_existing(&target)?;

        if old_str.is_empty() {
            bail!("old_str must not be empty");
        }
        match content.matches(old_str).count() {
            0 => bail!("Text not found in {}", target.display()),
            1 => {}
            n => bail!("Text appears {n} times in {}. Must be unique.", target.display()),
        }

        let updated = content.replacen(old_str, new_str, 1);
        std::fs::write(target.abs(), &updated)
            .with_context(|| format!("Cannot write {}", target.display()))?;

        self.track(session, &target, AccessKind::Write);

        Ok(self.with_size_warning(format!("Updated: {}", target.display()), &updated))
    }

    /// Insert `insert_text` before 0-based line `insert_line`.
    pub fn insert(
        &self,
        path: &str,
        insert_line: usize,
        insert_text: &str,
        session: Option<&str>,
    ) -> Result<String> {
        let target = self.resolve(Some(path), "edit")?;
        let content = self.read_existing(&target)?;

        let mut lines: Vec<&str> = content.lines().collect();
        if insert_line > lines.len() {
            bail!(
                "Invalid insert_line {insert_line}. Must be 0-{}",
                lines.len()
            );
        }
        lines.insert(insert_line, insert_text.trim_end_matches('\n'));
        let updated = lines.join("\n") + "\n";

        std::fs::write(target.abs(), &updated)
            .with_context(|| format!("Cannot write {}", target.display()))?;

        self.track(session, &target, AccessKind::Write);

        Ok(self.with_size_warning(
            format!("Inserted at line {insert_line}: {}", target.display()),
            &updated,
        ))
    }

    /// Delete a file, or a directory recursively.
    pub fn delete(&self, path: &str) -> Result<String> {
        let target = self.resolve(Some(path), "delete")?;
        if target.is_root() {
            bail!("Cannot delete the memory directory itself");
        }

        let abs = target.abs();
        if abs.is_file() {
            std::fs::remove_file(abs)
                .with_context(|| format!("Cannot delete {}", target.display()))?;
        } else if abs.is_dir() {
            std::fs::remove_dir_all(abs)
                .with_context(|| format!("Cannot delete {}", target.display()))?;
        } else {
            bail!("Path not found: {}", target.display());
        }

        tracing::info!(path = target.rel(), "deleted");
        Ok(format!("Deleted: {}", target.display()))
    }

    /// Rename or move a file or directory. The destination must not exist.
    pub fn rename(&self, old_path: &str, new_path: &str) -> Result<String> {
        let src = self.resolve(Some(old_path), "rename")?;
        let dst = self.resolve(Some(new_path), "rename to")?;

        if src.is_root() || dst.is_root() {
            bail!("Cannot rename the memory directory itself");
        }
        if !src.abs().exists() {
            bail!("Source path not found: {}", src.display());
        }
        if dst.abs().exists() {
            bail!("Destination already exists: {}", dst.display());
        }

        if let Some(parent) = dst.abs().parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Cannot create directories for {}", dst.display()))?;
        }
        std::fs::rename(src.abs(), dst.abs())
            .with_context(|| format!("Cannot rename {} to {}", src.display(), dst.display()))?;

        tracing::info!(from = src.rel(), to = dst.rel(), "renamed");
        Ok(format!("Renamed: {} -> {}", src.display(), dst.display()))
    }

    /// Remove every visible entry under the root. Internal files, including
    /// the co-visitation document, are kept.
    pub fn clear_all(&self) -> Result<String> {
        let root = self.guard.root();
        let entries = std::fs::read_dir(root)
            .with_context(|| format!("Cannot read memory directory {}", root.display()))?;

        let mut removed = 0usize;
        for entry in entries {
            let entry = entry?;
            if is_internal_name(&entry.file_name().to_string_lossy()) {
                continue;
            }
            let path = entry.path();
            let outcome = if entry.file_type()?.is_dir() {
                std::fs::remove_dir_all(&path)
            } else {
                std::fs::remove_file(&path)
            };
            outcome.with_context(|| format!("Cannot delete {}", path.display()))?;
            removed += 1;
        }

        tracing::info!(removed, "memory cleared");
        Ok("Cleared all memory".to_string())
    }

    fn read_existing(&self, target: &GuardedPath) -> Result<String> {
        if !target.abs().is_file() {
            bail!("File not found: {}", target.display());
        }
        std::fs::read_to_string(target.abs())
            .with_context(|| format!("Cannot read file {}", target.display()))
    }

    fn with_size_warning(&self, message: String, content: &str) -> String {
        match render::large_file_warning(content, self.limits.large_file_threshold) {
            Some(warning) => format!("{message}\n{warning}"),
            None => message,
        }
    }
}
