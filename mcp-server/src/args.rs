use serde_json::Map;
use serde_json::Value;

use crate::content::ContentFormat;
use crate::content::FileMode;
use crate::content::OffsetKind;
use crate::error::ToolError;

pub fn require_str(args: &Map<String, Value>, key: &str) -> Result<String, ToolError> {
    args.get(key)
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| ToolError::InvalidArgument(format!("missing required argument '{key}'")))
}

pub fn require_i64(args: &Map<String, Value>, key: &str) -> Result<i64, ToolError> {
    args.get(key)
        .and_then(Value::as_i64)
        .ok_or_else(|| ToolError::InvalidArgument(format!("missing required argument '{key}'")))
}

pub fn get_str<'a>(args: &'a Map<String, Value>, key: &str, default: &'a str) -> String {
    args.get(key).and_then(Value::as_str).unwrap_or(default).to_string()
}

pub fn get_i64(args: &Map<String, Value>, key: &str, default: i64) -> i64 {
    args.get(key).and_then(Value::as_i64).unwrap_or(default)
}

pub fn get_usize(args: &Map<String, Value>, key: &str, default: usize) -> usize {
    args.get(key)
        .and_then(Value::as_u64)
        .map(|v| v as usize)
        .unwrap_or(default)
}

pub fn get_bool(args: &Map<String, Value>, key: &str, default: bool) -> bool {
    args.get(key).and_then(Value::as_bool).unwrap_or(default)
}

pub fn get_string_array(args: &Map<String, Value>, key: &str) -> Vec<String> {
    args.get(key)
        .and_then(Value::as_array)
        .map(|values| values.iter().filter_map(|v| v.as_str().map(str::to_string)).collect())
        .unwrap_or_default()
}

pub fn get_offset_kind(args: &Map<String, Value>, key: &str, default: OffsetKind) -> Result<OffsetKind, ToolError> {
    match args.get(key).and_then(Value::as_str) {
        None => Ok(default),
        Some("byte") => Ok(OffsetKind::Byte),
        Some("char") => Ok(OffsetKind::Char),
        Some("line") => Ok(OffsetKind::Line),
        Some(other) => Err(ToolError::InvalidArgument(format!("invalid offset_type '{other}'"))),
    }
}

pub fn get_content_format(
    args: &Map<String, Value>,
    key: &str,
    default: ContentFormat,
) -> Result<ContentFormat, ToolError> {
    match args.get(key).and_then(Value::as_str) {
        None => Ok(default),
        Some("raw_utf8") => Ok(ContentFormat::RawUtf8),
        Some("base64") => Ok(ContentFormat::Base64),
        Some("quoted_printable") => Ok(ContentFormat::QuotedPrintable),
        Some(other) => Err(ToolError::InvalidArgument(format!("invalid content format '{other}'"))),
    }
}

pub fn get_file_mode(args: &Map<String, Value>, key: &str, default: FileMode) -> Result<FileMode, ToolError> {
    match args.get(key).and_then(Value::as_str) {
        None => Ok(default),
        Some("text") => Ok(FileMode::Text),
        Some("binary") => Ok(FileMode::Binary),
        Some(other) => Err(ToolError::InvalidArgument(format!("invalid mode '{other}'"))),
    }
}

/// Text tools only ever read/write UTF-8 - there is no transcoding step in
/// this implementation. A caller naming any other `file_encoding` gets a
/// hard `Encoding` error rather than having the argument silently ignored.
pub fn require_utf8_file_encoding(args: &Map<String, Value>, key: &str) -> Result<(), ToolError> {
    match args.get(key).and_then(Value::as_str) {
        None => Ok(()),
        Some(value) if value.eq_ignore_ascii_case("utf-8") || value.eq_ignore_ascii_case("utf8") => Ok(()),
        Some(other) => Err(ToolError::Encoding(format!(
            "unsupported file_encoding '{other}': only utf-8 is supported"
        ))),
    }
}
