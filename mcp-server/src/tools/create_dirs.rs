use crate::error::ToolError;
use crate::sandbox::WorkspaceRoot;

/// Creates `path` and all missing parents. Succeeds idempotently if it
/// already exists as a directory; fails if it exists as something else.
pub fn create_dirs(root: &WorkspaceRoot, path: &str) -> Result<String, ToolError> {
    let resolved = root.resolve_for_create(path)?;

    if resolved.exists() {
        if resolved.is_dir() {
            return Ok(format!("Directory already exists: {path}"));
        }
        return Err(ToolError::NotADirectory(path.to_string()));
    }

    std::fs::create_dir_all(&resolved).map_err(|e| ToolError::io(path.to_string(), e))?;
    Ok(format!("Created directory: {path}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn creates_nested_directories() {
        let dir = tempfile::tempdir().unwrap();
        let root = WorkspaceRoot::new(dir.path()).unwrap();
        create_dirs(&root, "a/b/c").unwrap();
        assert!(dir.path().join("a/b/c").is_dir());
    }

    #[test]
    fn is_idempotent_for_existing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let root = WorkspaceRoot::new(dir.path()).unwrap();
        create_dirs(&root, "a").unwrap();
        assert!(create_dirs(&root, "a").is_ok());
    }

    #[test]
    fn fails_when_path_is_a_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a"), b"x").unwrap();
        let root = WorkspaceRoot::new(dir.path()).unwrap();
        assert!(create_dirs(&root, "a").is_err());
    }
}
