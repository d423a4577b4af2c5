use crate::content::encode_output;
use crate::content::normalize_line_endings;
use crate::content::resolve_range;
use crate::content::split_keeping_newlines;
use crate::content::ContentFormat;
use crate::content::OffsetKind;
use crate::error::ToolError;
use crate::sandbox::WorkspaceRoot;

const SIZE_CAP_BYTES: u64 = 100 * 1024 * 1024;
const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "bmp", "webp", "svg"];
const BINARY_EXTENSIONS: &[&str] = &["bin", "exe", "dll", "zip", "tar", "gz", "7z", "rar", "pdf"];

enum FileKind {
    Image,
    Binary,
    Text,
}

fn classify(path: &std::path::Path) -> FileKind {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();
    if IMAGE_EXTENSIONS.contains(&extension.as_str()) {
        FileKind::Image
    } else if BINARY_EXTENSIONS.contains(&extension.as_str()) {
        FileKind::Binary
    } else {
        FileKind::Text
    }
}

#[allow(clippy::too_many_arguments)]
pub async fn read_from_file(
    root: &WorkspaceRoot,
    path: &str,
    start_offset_inclusive: i64,
    end_offset_inclusive: i64,
    offset_type: OffsetKind,
    output_format: ContentFormat,
) -> Result<String, ToolError> {
    let resolved = root.resolve(path)?;
    let metadata = tokio::fs::metadata(&resolved)
        .await
        .map_err(|e| ToolError::io(path.to_string(), e))?;
    if !metadata.is_file() {
        return Err(ToolError::NotAFile(path.to_string()));
    }
    if metadata.len() > SIZE_CAP_BYTES {
        return Err(ToolError::Capacity(path.to_string()));
    }

    let bytes = tokio::fs::read(&resolved)
        .await
        .map_err(|e| ToolError::io(path.to_string(), e))?;

    match classify(&resolved) {
        FileKind::Image => encode_output(&bytes, output_format),
        FileKind::Binary => read_binary(&bytes, start_offset_inclusive, end_offset_inclusive, offset_type, output_format),
        FileKind::Text => read_text(&bytes, start_offset_inclusive, end_offset_inclusive, offset_type, output_format),
    }
}

fn read_binary(
    bytes: &[u8],
    start: i64,
    end: i64,
    offset_type: OffsetKind,
    output_format: ContentFormat,
) -> Result<String, ToolError> {
    if output_format == ContentFormat::RawUtf8 {
        // The data model's "return raw bytes untouched" cannot travel as a
        // JSON string verbatim when the bytes aren't valid UTF-8; this is
        // the wire-safe equivalent of that rule.
        return Ok(String::from_utf8(bytes.to_vec()).unwrap_or_else(|e| {
            String::from_utf8_lossy(e.as_bytes()).into_owned()
        }));
    }

    if offset_type != OffsetKind::Byte {
        return Err(ToolError::InvalidArgument(
            "binary reads with a non-raw output format require offset_type=byte".to_string(),
        ));
    }

    let (start, end) = resolve_range(start, end, bytes.len())?;
    encode_output(&bytes[start..end], output_format)
}

fn read_text(
    bytes: &[u8],
    start: i64,
    end: i64,
    offset_type: OffsetKind,
    output_format: ContentFormat,
) -> Result<String, ToolError> {
    let selected_and_base_line = match offset_type {
        OffsetKind::Line => {
            let normalized = normalize_line_endings(&String::from_utf8_lossy(bytes));
            let lines: Vec<&str> = split_keeping_newlines(&normalized);
            let (start, end) = resolve_range(start, end, lines.len())?;
            (lines[start..end].concat(), start)
        }
        OffsetKind::Char => {
            let normalized = normalize_line_endings(&String::from_utf8_lossy(bytes));
            let chars: Vec<char> = normalized.chars().collect();
            let (start, end) = resolve_range(start, end, chars.len())?;
            let selected: String = chars[start..end].iter().collect();
            let base_line = normalized[..normalized.char_indices().nth(start).map(|(i, _)| i).unwrap_or(normalized.len())]
                .matches('\n')
                .count();
            (selected, base_line)
        }
        OffsetKind::Byte => {
            let (start, end) = resolve_range(start, end, bytes.len())?;
            let selected = String::from_utf8_lossy(&bytes[start..end]).into_owned();
            let base_line = String::from_utf8_lossy(&bytes[..start]).matches('\n').count();
            (selected, base_line)
        }
    };

    let (selected, base_line) = selected_and_base_line;

    if output_format == ContentFormat::RawUtf8 {
        return Ok(selected);
    }

    let rendered = render_line_numbered(&selected, base_line);
    encode_output(rendered.as_bytes(), output_format)
}

fn render_line_numbered(selected: &str, base_line: usize) -> String {
    split_keeping_newlines(selected)
        .iter()
        .enumerate()
        .map(|(i, line)| format!("{:>4} | {}", base_line + i + 1, line.trim_end_matches('\n')))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn reads_line_range_with_line_numbers() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.txt"), "Line 1\nLine 2\nLine 3\n").unwrap();
        let root = WorkspaceRoot::new(dir.path()).unwrap();

        let encoded = read_from_file(&root, "a.txt", 1, 2, OffsetKind::Line, ContentFormat::QuotedPrintable)
            .await
            .unwrap();
        let decoded = crate::content::decode_input(&encoded, ContentFormat::QuotedPrintable).unwrap();
        assert_eq!(
            String::from_utf8(decoded).unwrap(),
            "   2 | Line 2\n   3 | Line 3"
        );
    }

    #[tokio::test]
    async fn raw_utf8_returns_unrendered_text() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.txt"), "hello\nworld\n").unwrap();
        let root = WorkspaceRoot::new(dir.path()).unwrap();

        let text = read_from_file(&root, "a.txt", 0, -1, OffsetKind::Line, ContentFormat::RawUtf8)
            .await
            .unwrap();
        assert_eq!(text, "hello\nworld\n");
    }

    #[tokio::test]
    async fn rejects_files_over_the_size_cap() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("big.bin");
        let file = std::fs::File::create(&path).unwrap();
        file.set_len(SIZE_CAP_BYTES + 1).unwrap();
        let root = WorkspaceRoot::new(dir.path()).unwrap();

        let err = read_from_file(&root, "big.bin", 0, -1, OffsetKind::Byte, ContentFormat::RawUtf8)
            .await
            .unwrap_err();
        assert!(matches!(err, ToolError::Capacity(_)));
    }
}
