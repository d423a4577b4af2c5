use std::cmp::Ordering;
use std::fs::DirEntry;
use std::path::Path;

use crate::error::ToolError;
use crate::sandbox::WorkspaceRoot;

const TRUNCATION_MARKER: &str = "... (list truncated)";

pub fn list_dir(root: &WorkspaceRoot, path: &str, limit: usize, recursive: bool) -> Result<String, ToolError> {
    let resolved = root.resolve(path)?;
    if !resolved.is_dir() {
        return Err(ToolError::NotADirectory(path.to_string()));
    }

    let mut lines = Vec::new();
    let mut truncated = false;
    render(&resolved, "", recursive, limit, &mut lines, &mut truncated)?;
    if truncated {
        lines.push(TRUNCATION_MARKER.to_string());
    }
    Ok(lines.join("\n"))
}

fn render(
    dir: &Path,
    prefix: &str,
    recursive: bool,
    limit: usize,
    lines: &mut Vec<String>,
    truncated: &mut bool,
) -> Result<(), ToolError> {
    if *truncated {
        return Ok(());
    }

    let mut entries: Vec<DirEntry> = std::fs::read_dir(dir)
        .map_err(|e| ToolError::io(dir.display().to_string(), e))?
        .filter_map(Result::ok)
        .collect();
    entries.sort_by(|a, b| {
        let a_is_dir = a.path().is_dir();
        let b_is_dir = b.path().is_dir();
        match (a_is_dir, b_is_dir) {
            (true, false) => Ordering::Less,
            (false, true) => Ordering::Greater,
            _ => a
                .file_name()
                .to_string_lossy()
                .to_lowercase()
                .cmp(&b.file_name().to_string_lossy().to_lowercase()),
        }
    });

    for (index, entry) in entries.iter().enumerate() {
        if lines.len() >= limit {
            *truncated = true;
            return Ok(());
        }

        let is_last = index + 1 == entries.len();
        let connector = if is_last { "└───" } else { "├───" };
        let name = entry.file_name().to_string_lossy().into_owned();
        lines.push(format!("{prefix}{connector}{name}"));

        if recursive && entry.path().is_dir() {
            let child_prefix = format!("{prefix}{}", if is_last { "    " } else { "│   " });
            render(&entry.path(), &child_prefix, recursive, limit, lines, truncated)?;
            if *truncated {
                return Ok(());
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lists_directories_before_files_case_insensitively() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("Beta")).unwrap();
        std::fs::write(dir.path().join("alpha.txt"), b"").unwrap();
        std::fs::create_dir(dir.path().join("alpha_dir")).unwrap();

        let root = WorkspaceRoot::new(dir.path()).unwrap();
        let listing = list_dir(&root, ".", 100, false).unwrap();
        let lines: Vec<&str> = listing.lines().collect();

        assert!(lines[0].ends_with("alpha_dir"));
        assert!(lines[1].ends_with("Beta"));
        assert!(lines[2].ends_with("alpha.txt"));
    }

    #[test]
    fn truncates_when_limit_exceeded() {
        let dir = tempfile::tempdir().unwrap();
        for i in 0..5 {
            std::fs::write(dir.path().join(format!("f{i}.txt")), b"").unwrap();
        }
        let root = WorkspaceRoot::new(dir.path()).unwrap();
        let listing = list_dir(&root, ".", 2, false).unwrap();
        assert!(listing.ends_with(TRUNCATION_MARKER));
    }
}
