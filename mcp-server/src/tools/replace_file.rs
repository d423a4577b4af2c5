use regex::bytes::Regex as BytesRegex;
use regex::Regex;

use crate::content::decode_input;
use crate::content::normalize_line_endings;
use crate::content::ContentFormat;
use crate::content::FileMode;
use crate::diff::unified_diff;
use crate::error::ToolError;
use crate::sandbox::WorkspaceRoot;
use crate::tools::staged_mutation::write_validate_replace;
use crate::validator::ValidatorTable;

#[allow(clippy::too_many_arguments)]
pub async fn replace_in_file(
    root: &WorkspaceRoot,
    validators: &ValidatorTable,
    path: &str,
    old_content: &str,
    new_content: &str,
    number_of_occurrences: i64,
    is_regex: bool,
    mode: FileMode,
    input_format: ContentFormat,
) -> Result<String, ToolError> {
    let resolved = root.resolve(path)?;
    if !resolved.is_file() {
        return Err(ToolError::NotFound(path.to_string()));
    }

    let decoded_new = decode_input(new_content, input_format)?;
    let limit = if number_of_occurrences < 0 {
        usize::MAX
    } else {
        number_of_occurrences as usize
    };

    match mode {
        FileMode::Binary => {
            let original = tokio::fs::read(&resolved)
                .await
                .map_err(|e| ToolError::io(path.to_string(), e))?;
            let decoded_old = decode_input(old_content, input_format)?;
            let (replaced, count) = if is_regex {
                replace_binary_regex(&original, &decoded_old, &decoded_new, limit)?
            } else {
                replace_bytes(&original, &decoded_old, &decoded_new, limit)
            };
            write_validate_replace(root, validators, &resolved, "replace", mode, &replaced).await?;
            Ok(format!("Replaced {count} occurrence(s) in {path}."))
        }
        FileMode::Text => {
            let original = tokio::fs::read_to_string(&resolved)
                .await
                .map_err(|e| ToolError::io(path.to_string(), e))?;
            let new_text = String::from_utf8_lossy(&decoded_new).into_owned();

            // Normalize the haystack and both needle/replacement text to `\n`
            // before matching, same as the original: a CRLF file must still
            // match an LF `old_content`.
            let original_normalized = normalize_line_endings(&original);
            let old_normalized = normalize_line_endings(old_content);
            let new_normalized = normalize_line_endings(&new_text);

            let (replaced, count) = if is_regex {
                replace_text_regex(&original_normalized, &old_normalized, &new_normalized, limit)?
            } else {
                replace_text_substring(&original_normalized, &old_normalized, &new_normalized, limit)
            };
            write_validate_replace(root, validators, &resolved, "replace", mode, replaced.as_bytes()).await?;
            let diff = unified_diff(path, &original, &replaced);
            Ok(format!("Replaced {count} occurrence(s) in {path}.\n{diff}"))
        }
    }
}

fn replace_text_substring(text: &str, old: &str, new: &str, limit: usize) -> (String, usize) {
    if old.is_empty() {
        return (text.to_string(), 0);
    }
    let mut result = String::with_capacity(text.len());
    let mut remaining = text;
    let mut count = 0;
    while count < limit {
        match remaining.find(old) {
            Some(index) => {
                result.push_str(&remaining[..index]);
                result.push_str(new);
                remaining = &remaining[index + old.len()..];
                count += 1;
            }
            None => break,
        }
    }
    result.push_str(remaining);
    (result, count)
}

fn replace_text_regex(text: &str, pattern: &str, new: &str, limit: usize) -> Result<(String, usize), ToolError> {
    let re = Regex::new(pattern).map_err(|e| ToolError::Regex(e.to_string()))?;
    if limit == 0 {
        // The regex crate treats a `replacen` limit of 0 as "unlimited", the
        // opposite of what a caller asking for zero occurrences means.
        return Ok((text.to_string(), 0));
    }
    let count = re.find_iter(text).take(limit).count();
    let replaced = re.replacen(text, limit, new).into_owned();
    Ok((replaced, count))
}

fn replace_bytes(haystack: &[u8], old: &[u8], new: &[u8], limit: usize) -> (Vec<u8>, usize) {
    if old.is_empty() {
        return (haystack.to_vec(), 0);
    }
    let mut result = Vec::with_capacity(haystack.len());
    let mut remaining = haystack;
    let mut count = 0;
    while count < limit {
        match find_subslice(remaining, old) {
            Some(index) => {
                result.extend_from_slice(&remaining[..index]);
                result.extend_from_slice(new);
                remaining = &remaining[index + old.len()..];
                count += 1;
            }
            None => break,
        }
    }
    result.extend_from_slice(remaining);
    (result, count)
}

fn find_subslice(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack.windows(needle.len()).position(|window| window == needle)
}

fn replace_binary_regex(
    haystack: &[u8],
    pattern: &[u8],
    new: &[u8],
    limit: usize,
) -> Result<(Vec<u8>, usize), ToolError> {
    let pattern_str = String::from_utf8_lossy(pattern);
    let re = BytesRegex::new(&pattern_str).map_err(|e| ToolError::Regex(e.to_string()))?;
    if limit == 0 {
        return Ok((haystack.to_vec(), 0));
    }
    let count = re.find_iter(haystack).take(limit).count();
    let replaced = re.replacen(haystack, limit, new).into_owned();
    Ok((replaced, count))
}
