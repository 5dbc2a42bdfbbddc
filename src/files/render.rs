//! Text rendering helpers for file tool responses: directory trees, line
//! ranges and response truncation.

use std::path::Path;

use crate::files::guard::is_internal_name;

/// Recursive listing of `dir`, one space of indentation per level.
///
/// Directories sort before files, names compare case-insensitively, and
/// internal entries are skipped. Unreadable directories are skipped silently.
pub fn build_tree(dir: &Path, indent: usize) -> Vec<String> {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return Vec::new();
    };

    let mut items: Vec<(bool, String, std::path::PathBuf)> = entries
        .filter_map(|e| e.ok())
        .filter_map(|e| {
            let name = e.file_name().to_string_lossy().into_owned();
            if is_internal_name(&name) {
                return None;
            }
            let path = e.path();
            Some((path.is_file(), name, path))
        })
        .collect();
    items.sort_by(|(a_file, a_name, _), (b_file, b_name, _)| {
        a_file
            .cmp(b_file)
            .then_with(|| a_name.to_lowercase().cmp(&b_name.to_lowercase()))
    });

    let prefix = " ".repeat(indent);
    let mut lines = Vec::new();
    for (is_file, name, path) in items {
        if is_file {
            lines.push(format!("{prefix}{name}"));
        } else {
            lines.push(format!("{prefix}{name}/"));
            lines.extend(build_tree(&path, indent + 1));
        }
    }
    lines
}

/// Lines `start..=end` of `text` (0-based). Out-of-range bounds are clamped.
pub fn slice_lines(text: &str, start: Option<usize>, end: Option<usize>) -> String {
    let lines: Vec<&str> = text.lines().collect();
    let start = start.unwrap_or(0).min(lines.len());
    let end = end
        .map(|e| e.saturating_add(1))
        .unwrap_or(lines.len())
        .min(lines.len());
    if start >= end {
        return String::new();
    }
    lines[start..end].join("\n")
}

/// Cut `text` to `max_chars` characters, appending a pagination hint.
pub fn truncate_response(text: String, max_chars: usize) -> String {
    let Some((cut, _)) = text.char_indices().nth(max_chars) else {
        return text;
    };

    let total_lines = text.matches('\n').count() + 1;
    let kept = &text[..cut];
    let kept_lines = kept.matches('\n').count() + 1;
    format!(
        "{kept}\n...(truncated to {max_chars} chars, showing ~{kept_lines}/{total_lines} lines)\n\
         TIP: Use start_line/end_line parameters to view specific sections of large files."
    )
}

/// Warning appended to write responses when a file grows past `threshold` chars.
pub fn large_file_warning(content: &str, threshold: usize) -> Option<String> {
    let size = content.chars().count();
    if size <= threshold {
        return None;
    }
    let lines = content.matches('\n').count() + 1;
    Some(format!(
        "WARNING: File is large ({size} chars, ~{lines} lines). \
         Consider using start_line/end_line when viewing to avoid truncation."
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_build_tree_orders_and_hides_internal() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path();
        std::fs::create_dir_all(root.join("projects/alpha")).unwrap();
        std::fs::write(root.join("projects/alpha/plan.md"), "").unwrap();
        std::fs::write(root.join("Zeta.md"), "").unwrap();
        std::fs::write(root.join("alpha.md"), "").unwrap();
        std::fs::write(root.join("_covis.json"), "{}").unwrap();
        std::fs::write(root.join(".hidden"), "").unwrap();

        assert_eq!(
            build_tree(root, 0),
            vec!["projects/", " alpha/", "  plan.md", "alpha.md", "Zeta.md"]
        );
    }

    #[test]
    fn test_slice_lines() {
        let text = "l0\nl1\nl2\nl3";
        assert_eq!(slice_lines(text, None, None), text);
        assert_eq!(slice_lines(text, Some(1), Some(2)), "l1\nl2");
        assert_eq!(slice_lines(text, Some(2), None), "l2\nl3");
        assert_eq!(slice_lines(text, None, Some(0)), "l0");
        assert_eq!(slice_lines(text, Some(3), Some(99)), "l3");
        assert_eq!(slice_lines(text, Some(3), Some(1)), "");
        assert_eq!(slice_lines(text, Some(10), None), "");
    }

    #[test]
    fn test_truncate_response() {
        assert_eq!(truncate_response("short".into(), 10), "short");
        let out = truncate_response("ab\ncd\nef".into(), 4);
        assert!(out.starts_with("ab\nc\n...(truncated to 4 chars, showing ~2/3 lines)"));
        // multi-byte characters are never split
        let out = truncate_response("ééé".into(), 2);
        assert!(out.starts_with("éé\n"));
    }

    #[test]
    fn test_large_file_warning() {
        assert!(large_file_warning("small", 10).is_none());
        let warning = large_file_warning("a\nb\nc", 2).unwrap();
        assert!(warning.contains("5 chars, ~3 lines"));
    }
}
