use crate::content::decode_input;
use crate::content::normalize_line_endings;
use crate::content::resolve_range;
use crate::content::split_keeping_newlines;
use crate::content::ContentFormat;
use crate::content::FileMode;
use crate::content::OffsetKind;
use crate::diff::unified_diff;
use crate::error::ToolError;
use crate::sandbox::WorkspaceRoot;
use crate::tools::staged_mutation::write_validate_replace;
use crate::validator::ValidatorTable;

#[allow(clippy::too_many_arguments)]
pub async fn modify_file(
    root: &WorkspaceRoot,
    validators: &ValidatorTable,
    path: &str,
    start_offset_inclusive: i64,
    end_offset_inclusive: i64,
    new_content: &str,
    offset_type: OffsetKind,
    input_format: ContentFormat,
    mode: FileMode,
) -> Result<String, ToolError> {
    let resolved = root.resolve(path)?;
    if !resolved.is_file() {
        return Err(ToolError::NotFound(path.to_string()));
    }
    let decoded_new = decode_input(new_content, input_format)?;

    match mode {
        FileMode::Binary => {
            if offset_type != OffsetKind::Byte {
                return Err(ToolError::InvalidArgument(
                    "modifying a binary file requires offset_type=byte".to_string(),
                ));
            }
            let original = tokio::fs::read(&resolved)
                .await
                .map_err(|e| ToolError::io(path.to_string(), e))?;
            let (start, end) = resolve_range(start_offset_inclusive, end_offset_inclusive, original.len())?;

            let mut spliced = original[..start].to_vec();
            spliced.extend_from_slice(&decoded_new);
            spliced.extend_from_slice(&original[end..]);

            write_validate_replace(root, validators, &resolved, "modify", mode, &spliced).await?;
            Ok(format!("Modified bytes [{start}, {end}) of {path}."))
        }
        FileMode::Text => {
            let original = tokio::fs::read_to_string(&resolved)
                .await
                .map_err(|e| ToolError::io(path.to_string(), e))?;
            let normalized = normalize_line_endings(&original);
            let new_text = String::from_utf8_lossy(&decoded_new).into_owned();

            let spliced = match offset_type {
                OffsetKind::Line => {
                    let lines = split_keeping_newlines(&normalized);
                    let (start, end) = resolve_range(start_offset_inclusive, end_offset_inclusive, lines.len())?;
                    format!("{}{}{}", lines[..start].concat(), new_text, lines[end..].concat())
                }
                OffsetKind::Char => {
                    let chars: Vec<char> = normalized.chars().collect();
                    let (start, end) = resolve_range(start_offset_inclusive, end_offset_inclusive, chars.len())?;
                    let before: String = chars[..start].iter().collect();
                    let after: String = chars[end..].iter().collect();
                    format!("{before}{new_text}{after}")
                }
                OffsetKind::Byte => {
                    let bytes = normalized.as_bytes();
                    let (start, end) = resolve_range(start_offset_inclusive, end_offset_inclusive, bytes.len())?;
                    let mut spliced_bytes = bytes[..start].to_vec();
                    spliced_bytes.extend_from_slice(decoded_new.as_slice());
                    spliced_bytes.extend_from_slice(&bytes[end..]);
                    String::from_utf8_lossy(&spliced_bytes).into_owned()
                }
            };

            write_validate_replace(root, validators, &resolved, "modify", mode, spliced.as_bytes()).await?;
            let diff = unified_diff(path, &original, &spliced);
            Ok(format!("Modified {path}.\n{diff}"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn modifies_a_line_range() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.txt"), "one\ntwo\nthree\n").unwrap();
        let root = WorkspaceRoot::new(dir.path()).unwrap();

        modify_file(
            &root,
            &ValidatorTable::empty(),
            "a.txt",
            1,
            1,
            "TWO\n",
            OffsetKind::Line,
            ContentFormat::RawUtf8,
            FileMode::Text,
        )
        .await
        .unwrap();

        assert_eq!(
            std::fs::read_to_string(dir.path().join("a.txt")).unwrap(),
            "one\nTWO\nthree\n"
        );
    }

    #[tokio::test]
    async fn modifies_a_binary_byte_range() {
        let dir = tempfile::tempdir().unwrap();
        let original = vec![0u8, 1, 2, 3, 4, 5, 6, 7, 8, 9];
        std::fs::write(dir.path().join("b.bin"), &original).unwrap();
        let root = WorkspaceRoot::new(dir.path()).unwrap();

        let new_content = crate::content::encode_output(&[0xff, 0xee], ContentFormat::Base64).unwrap();
        modify_file(
            &root,
            &ValidatorTable::empty(),
            "b.bin",
            2,
            3,
            &new_content,
            OffsetKind::Byte,
            ContentFormat::Base64,
            FileMode::Binary,
        )
        .await
        .unwrap();

        assert_eq!(
            std::fs::read(dir.path().join("b.bin")).unwrap(),
            vec![0u8, 1, 0xff, 0xee, 4, 5, 6, 7, 8, 9]
        );
    }
}
