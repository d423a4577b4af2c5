use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use serde::Deserialize;
use serde::Serialize;

use crate::error::ToolError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OffsetKind {
    Byte,
    Char,
    Line,
}

impl Default for OffsetKind {
    fn default() -> Self {
        OffsetKind::Line
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentFormat {
    RawUtf8,
    Base64,
    QuotedPrintable,
}

impl Default for ContentFormat {
    fn default() -> Self {
        ContentFormat::RawUtf8
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileMode {
    Text,
    Binary,
}

impl Default for FileMode {
    fn default() -> Self {
        FileMode::Text
    }
}

/// Normalizes `\r\n` and lone `\r` to `\n`, the line-ending rule applied to
/// every TEXT read before indexing.
pub fn normalize_line_endings(text: &str) -> String {
    text.replace("\r\n", "\n").replace('\r', "\n")
}

/// Decodes bytes the caller sent in `input_format` into the raw bytes to
/// write/splice into a file.
pub fn decode_input(bytes: &str, format: ContentFormat) -> Result<Vec<u8>, ToolError> {
    match format {
        ContentFormat::RawUtf8 => Ok(bytes.as_bytes().to_vec()),
        ContentFormat::Base64 => BASE64
            .decode(bytes.trim())
            .map_err(|e| ToolError::Encoding(format!("invalid base64 input: {e}"))),
        ContentFormat::QuotedPrintable => quoted_printable::decode(bytes.as_bytes(), quoted_printable::ParseMode::Robust)
            .map_err(|e| ToolError::Encoding(format!("invalid quoted-printable input: {e:?}"))),
    }
}

/// Encodes raw output bytes into `output_format` for the wire.
pub fn encode_output(bytes: &[u8], format: ContentFormat) -> Result<String, ToolError> {
    match format {
        ContentFormat::RawUtf8 => String::from_utf8(bytes.to_vec())
            .map_err(|e| ToolError::Encoding(format!("output is not valid UTF-8: {e}"))),
        ContentFormat::Base64 => Ok(BASE64.encode(bytes)),
        ContentFormat::QuotedPrintable => Ok(quoted_printable::encode(bytes)
            .iter()
            .map(|&b| b as char)
            .collect()),
    }
}

/// Resolves a `(start_offset_inclusive, end_offset_inclusive)` pair against
/// `total` units, where `-1` for the end means "through end". Shared by
/// every offset-kind-aware read/modify path.
pub fn resolve_range(start: i64, end: i64, total: usize) -> Result<(usize, usize), ToolError> {
    if start < 0 {
        return Err(ToolError::InvalidArgument(
            "start_offset_inclusive must be >= 0".to_string(),
        ));
    }
    let start = (start as usize).min(total);
    let end_exclusive = if end == -1 {
        total
    } else {
        ((end as usize).saturating_add(1)).min(total)
    };
    if end_exclusive <= start {
        Ok((start, start))
    } else {
        Ok((start, end_exclusive))
    }
}

/// Splits `text` into lines, keeping each line's trailing `\n` (if any) -
/// the slicing unit `LINE` offsets operate on.
pub fn split_keeping_newlines(text: &str) -> Vec<&str> {
    let mut lines = Vec::new();
    let mut start = 0;
    for (index, byte) in text.bytes().enumerate() {
        if byte == b'\n' {
            lines.push(&text[start..=index]);
            start = index + 1;
        }
    }
    if start < text.len() {
        lines.push(&text[start..]);
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base64_round_trips() {
        let original = b"hello \x00\x01 world";
        let encoded = encode_output(original, ContentFormat::Base64).unwrap();
        let decoded = decode_input(&encoded, ContentFormat::Base64).unwrap();
        assert_eq!(decoded, original);
    }

    #[test]
    fn quoted_printable_round_trips() {
        let original = b"line one\nline=two\n";
        let encoded = encode_output(original, ContentFormat::QuotedPrintable).unwrap();
        let decoded = decode_input(&encoded, ContentFormat::QuotedPrintable).unwrap();
        assert_eq!(decoded, original);
    }

    #[test]
    fn normalizes_crlf_and_cr() {
        assert_eq!(normalize_line_endings("a\r\nb\rc\n"), "a\nb\nc\n");
    }
}
