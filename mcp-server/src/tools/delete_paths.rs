use crate::error::ToolError;
use crate::sandbox::WorkspaceRoot;

/// Deletes each path, removing directories recursively. Every path is
/// attempted independently; a failure on one never stops the rest. If any
/// failed, the combined message lists both the successes and the failures
/// so the caller can see exactly what state the filesystem ended up in.
pub fn delete_paths(root: &WorkspaceRoot, paths: &[String]) -> Result<String, ToolError> {
    let mut succeeded = Vec::new();
    let mut failed = Vec::new();

    for path in paths {
        match delete_one(root, path) {
            Ok(()) => succeeded.push(path.clone()),
            Err(e) => failed.push(format!("{path}: {e}")),
        }
    }

    if failed.is_empty() {
        Ok(format!("Deleted {} path(s): {}", succeeded.len(), succeeded.join(", ")))
    } else {
        Err(ToolError::InvalidArgument(format!(
            "Deleted {} of {} path(s); failures: {}",
            succeeded.len(),
            paths.len(),
            failed.join("; ")
        )))
    }
}

fn delete_one(root: &WorkspaceRoot, path: &str) -> Result<(), ToolError> {
    let resolved = root.resolve(path)?;
    let metadata = std::fs::symlink_metadata(&resolved).map_err(|e| ToolError::io(path.to_string(), e))?;

    if metadata.is_dir() {
        std::fs::remove_dir_all(&resolved).map_err(|e| ToolError::io(path.to_string(), e))
    } else {
        std::fs::remove_file(&resolved).map_err(|e| ToolError::io(path.to_string(), e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deletes_files_and_directories() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.txt"), b"x").unwrap();
        std::fs::create_dir(dir.path().join("sub")).unwrap();
        std::fs::write(dir.path().join("sub/b.txt"), b"y").unwrap();
        let root = WorkspaceRoot::new(dir.path()).unwrap();

        delete_paths(&root, &["a.txt".to_string(), "sub".to_string()]).unwrap();

        assert!(!dir.path().join("a.txt").exists());
        assert!(!dir.path().join("sub").exists());
    }

    #[test]
    fn reports_partial_failure() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.txt"), b"x").unwrap();
        let root = WorkspaceRoot::new(dir.path()).unwrap();

        let err = delete_paths(&root, &["a.txt".to_string(), "missing.txt".to_string()]).unwrap_err();
        assert!(err.to_string().contains("Deleted 1 of 2"));
        assert!(!dir.path().join("a.txt").exists());
    }
}
