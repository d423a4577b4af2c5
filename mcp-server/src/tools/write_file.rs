use crate::content::decode_input;
use crate::content::ContentFormat;
use crate::content::FileMode;
use crate::diff::unified_diff;
use crate::error::ToolError;
use crate::sandbox::WorkspaceRoot;
use crate::tools::staged_mutation::write_validate_replace;
use crate::validator::ValidatorTable;

pub async fn write_to_file(
    root: &WorkspaceRoot,
    validators: &ValidatorTable,
    path: &str,
    new_content: &str,
    mode: FileMode,
    input_format: ContentFormat,
) -> Result<String, ToolError> {
    let resolved = root.resolve_for_create(path)?;
    let decoded = decode_input(new_content, input_format)?;

    let original_text = if mode == FileMode::Text && resolved.is_file() {
        tokio::fs::read_to_string(&resolved).await.ok()
    } else {
        None
    };

    write_validate_replace(root, validators, &resolved, "write", mode, &decoded).await?;

    match mode {
        FileMode::Text => {
            let new_text = String::from_utf8_lossy(&decoded).into_owned();
            let diff = unified_diff(path, original_text.as_deref().unwrap_or(""), &new_text);
            Ok(format!("Wrote {} bytes to {path}.\n{diff}", decoded.len()))
        }
        FileMode::Binary => Ok(format!("Wrote {} bytes to {path}.", decoded.len())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn writes_new_text_file_and_reports_a_diff() {
        let dir = tempfile::tempdir().unwrap();
        let root = WorkspaceRoot::new(dir.path()).unwrap();
        let validators = ValidatorTable::empty();

        let message = write_to_file(&root, &validators, "a.txt", "hello\n", FileMode::Text, ContentFormat::RawUtf8)
            .await
            .unwrap();

        assert_eq!(std::fs::read_to_string(dir.path().join("a.txt")).unwrap(), "hello\n");
        assert!(message.contains("+hello"));
    }

    #[tokio::test]
    async fn writes_binary_content_from_base64() {
        let dir = tempfile::tempdir().unwrap();
        let root = WorkspaceRoot::new(dir.path()).unwrap();
        let validators = ValidatorTable::empty();

        let encoded = crate::content::encode_output(&[0u8, 1, 2, 255], ContentFormat::Base64).unwrap();
        write_to_file(&root, &validators, "b.bin", &encoded, FileMode::Binary, ContentFormat::Base64)
            .await
            .unwrap();

        assert_eq!(std::fs::read(dir.path().join("b.bin")).unwrap(), vec![0u8, 1, 2, 255]);
    }
}
