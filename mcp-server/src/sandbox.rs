use std::path::Path;
use std::path::PathBuf;

use path_absolutize::Absolutize;

use crate::error::ToolError;

/// The immutable filesystem root the Tool-Server Runtime is allowed to touch.
/// Chosen by the embedder at startup; every tool argument is resolved
/// against it before any syscall that would otherwise touch the real
/// filesystem.
#[derive(Debug, Clone)]
pub struct WorkspaceRoot {
    resolved: PathBuf,
}

impl WorkspaceRoot {
    pub fn new(root: impl AsRef<Path>) -> std::io::Result<Self> {
        let absolute = root.as_ref().absolutize()?.into_owned();
        let resolved = canonicalize_best_effort(&absolute);
        Ok(WorkspaceRoot { resolved })
    }

    pub fn path(&self) -> &Path {
        &self.resolved
    }

    /// Resolves `candidate` (absolute or relative to the root) and verifies
    /// the result is within the root *after* symlink resolution, per the
    /// workspace-root invariant: a symlink whose target escapes the root is
    /// rejected exactly like a literal `../` escape - even when the
    /// candidate's final component doesn't exist yet, since a symlinked
    /// *ancestor* is enough to escape.
    pub fn resolve(&self, candidate: &str) -> Result<PathBuf, ToolError> {
        let absolutized = self.absolutize(candidate)?;
        let resolved = canonicalize_with_nonexistent_tail(&absolutized);

        if resolved.starts_with(&self.resolved) {
            Ok(resolved)
        } else {
            Err(ToolError::Sandbox(candidate.to_string()))
        }
    }

    /// Like `resolve`, but the returned path is expected to be created next
    /// (it may not exist at all). Still canonicalizes the longest existing
    /// ancestor and re-appends the non-existent tail lexically, so a
    /// symlinked ancestor directory cannot be used to smuggle the eventual
    /// write outside the root - there is no lexical-only fallback.
    pub fn resolve_for_create(&self, candidate: &str) -> Result<PathBuf, ToolError> {
        let absolutized = self.absolutize(candidate)?;
        let resolved = canonicalize_with_nonexistent_tail(&absolutized);

        if resolved.starts_with(&self.resolved) {
            Ok(resolved)
        } else {
            Err(ToolError::Sandbox(candidate.to_string()))
        }
    }

    fn absolutize(&self, candidate: &str) -> Result<PathBuf, ToolError> {
        let candidate_path = Path::new(candidate);
        let joined = if candidate_path.is_absolute() {
            candidate_path.to_path_buf()
        } else {
            self.resolved.join(candidate_path)
        };
        Ok(joined
            .absolutize()
            .map_err(|e| ToolError::Sandbox(format!("{candidate}: {e}")))?
            .into_owned())
    }
}

fn canonicalize_best_effort(path: &Path) -> PathBuf {
    std::fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
}

/// Canonicalizes the longest prefix of `path` that actually exists, then
/// re-appends the remaining (non-existent) components lexically. This is
/// the only sound way to containment-check a path whose leaf - or whose
/// leaf's parent - hasn't been created yet: `fs::canonicalize` itself fails
/// on any non-existent component, so falling back to the purely lexical
/// path (as a naive implementation would) lets a symlinked ancestor escape
/// the root undetected.
fn canonicalize_with_nonexistent_tail(path: &Path) -> PathBuf {
    let mut existing = path;
    let mut tail: Vec<&std::ffi::OsStr> = Vec::new();

    while !existing.exists() {
        match existing.parent() {
            Some(parent) => {
                if let Some(name) = existing.file_name() {
                    tail.push(name);
                }
                existing = parent;
            }
            None => break,
        }
    }

    let canonical_existing = canonicalize_best_effort(existing);
    tail.into_iter().rev().fold(canonical_existing, |acc, name| acc.join(name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_path_inside_root() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.txt"), b"hi").unwrap();
        let root = WorkspaceRoot::new(dir.path()).unwrap();
        assert!(root.resolve("a.txt").is_ok());
    }

    #[test]
    fn rejects_escape_via_dotdot() {
        let dir = tempfile::tempdir().unwrap();
        let root = WorkspaceRoot::new(dir.path()).unwrap();
        let err = root.resolve("../../etc/passwd").unwrap_err();
        assert!(matches!(err, ToolError::Sandbox(_)));
    }

    #[cfg(unix)]
    #[test]
    fn rejects_symlink_escape() {
        let dir = tempfile::tempdir().unwrap();
        let outside = tempfile::tempdir().unwrap();
        std::os::unix::fs::symlink(outside.path(), dir.path().join("escape")).unwrap();
        let root = WorkspaceRoot::new(dir.path()).unwrap();
        let err = root.resolve("escape/anything.txt").unwrap_err();
        assert!(matches!(err, ToolError::Sandbox(_)));
    }

    #[cfg(unix)]
    #[test]
    fn rejects_symlink_escape_for_create_with_nonexistent_leaf() {
        let dir = tempfile::tempdir().unwrap();
        let outside = tempfile::tempdir().unwrap();
        std::os::unix::fs::symlink(outside.path(), dir.path().join("escape")).unwrap();
        let root = WorkspaceRoot::new(dir.path()).unwrap();
        let err = root.resolve_for_create("escape/evil.txt").unwrap_err();
        assert!(matches!(err, ToolError::Sandbox(_)));
    }

    #[test]
    fn resolve_for_create_accepts_nested_nonexistent_path_inside_root() {
        let dir = tempfile::tempdir().unwrap();
        let root = WorkspaceRoot::new(dir.path()).unwrap();
        let resolved = root.resolve_for_create("a/b/new.txt").unwrap();
        assert!(resolved.starts_with(root.path()));
    }
}
