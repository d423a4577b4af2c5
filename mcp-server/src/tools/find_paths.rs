use regex::Regex;

use crate::error::ToolError;
use crate::sandbox::WorkspaceRoot;

enum Matcher {
    Substring(String),
    Regex(Regex),
}

impl Matcher {
    fn is_match(&self, text: &str) -> bool {
        match self {
            Matcher::Substring(needle) => text.contains(needle.as_str()),
            Matcher::Regex(re) => re.is_match(text),
        }
    }
}

fn build_matchers(keywords: &[String], regex_keywords: bool) -> Result<Vec<Matcher>, ToolError> {
    keywords
        .iter()
        .map(|keyword| {
            if regex_keywords {
                Regex::new(keyword)
                    .map(Matcher::Regex)
                    .map_err(|e| ToolError::Regex(e.to_string()))
            } else {
                Ok(Matcher::Substring(keyword.clone()))
            }
        })
        .collect()
}

/// Recursively walks `path`, returning files matching all the name/content
/// criteria. A name keyword matches if it matches *any* path component
/// relative to the workspace root - the file's own name or any ancestor
/// directory's name - not just the basename. A file whose content is not
/// valid UTF-8 is silently skipped when a content keyword is supplied (it
/// just can't match); any other I/O error on a given file is logged and the
/// walk continues.
pub fn find_paths(
    root: &WorkspaceRoot,
    path: &str,
    keywords_path_name: &[String],
    keywords_file_content: &[String],
    regex_keywords: bool,
) -> Result<Vec<String>, ToolError> {
    let resolved = root.resolve(path)?;
    let name_matchers = build_matchers(keywords_path_name, regex_keywords)?;
    let content_matchers = build_matchers(keywords_file_content, regex_keywords)?;

    let mut matches = Vec::new();
    for entry in walkdir::WalkDir::new(&resolved).into_iter() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                tracing::warn!("skipping entry during find_paths walk: {e}");
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }

        if !name_matchers.is_empty() {
            let relative = entry.path().strip_prefix(root.path()).unwrap_or(entry.path());
            let matches_any_component = relative
                .components()
                .filter_map(|c| c.as_os_str().to_str())
                .any(|component| name_matchers.iter().any(|m| m.is_match(component)));
            if !matches_any_component {
                continue;
            }
        }

        if !content_matchers.is_empty() {
            let bytes = match std::fs::read(entry.path()) {
                Ok(bytes) => bytes,
                Err(e) => {
                    tracing::warn!("skipping {}: {e}", entry.path().display());
                    continue;
                }
            };
            let text = match String::from_utf8(bytes) {
                Ok(text) => text,
                Err(_) => continue,
            };
            if !content_matchers.iter().any(|m| m.is_match(&text)) {
                continue;
            }
        }

        matches.push(entry.path().display().to_string());
    }

    Ok(matches)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn returns_every_file_when_unconstrained() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.txt"), b"hello").unwrap();
        std::fs::create_dir(dir.path().join("sub")).unwrap();
        std::fs::write(dir.path().join("sub/b.txt"), b"world").unwrap();

        let root = WorkspaceRoot::new(dir.path()).unwrap();
        let found = find_paths(&root, ".", &[], &[], false).unwrap();
        assert_eq!(found.len(), 2);
    }

    #[test]
    fn filters_by_content_keyword() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.txt"), b"needle here").unwrap();
        std::fs::write(dir.path().join("b.txt"), b"nothing").unwrap();

        let root = WorkspaceRoot::new(dir.path()).unwrap();
        let found = find_paths(&root, ".", &[], &["needle".to_string()], false).unwrap();
        assert_eq!(found.len(), 1);
        assert!(found[0].ends_with("a.txt"));
    }

    #[test]
    fn matches_name_keyword_against_ancestor_directory() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("src")).unwrap();
        std::fs::write(dir.path().join("src/lib.rs"), b"fn main() {}").unwrap();
        std::fs::write(dir.path().join("top.rs"), b"fn main() {}").unwrap();

        let root = WorkspaceRoot::new(dir.path()).unwrap();
        let found = find_paths(&root, ".", &["src".to_string()], &[], false).unwrap();
        assert_eq!(found.len(), 1);
        assert!(found[0].ends_with("lib.rs"));
    }

    #[test]
    fn skips_non_utf8_content_when_content_keywords_given() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("binary.dat"), [0xff, 0xfe, 0x00, 0xff]).unwrap();

        let root = WorkspaceRoot::new(dir.path()).unwrap();
        let found = find_paths(&root, ".", &[], &["anything".to_string()], false).unwrap();
        assert!(found.is_empty());
    }
}
