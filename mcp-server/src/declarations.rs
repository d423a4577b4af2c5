use mcp_types::ToolDeclaration;
use mcp_types::ToolInputSchema;
use serde_json::json;
use std::collections::BTreeMap;

fn schema(properties: &[(&str, serde_json::Value)], required: &[&str]) -> ToolInputSchema {
    ToolInputSchema {
        schema_type: "object".to_string(),
        properties: properties
            .iter()
            .map(|(name, schema)| (name.to_string(), schema.clone()))
            .collect::<BTreeMap<_, _>>(),
        required: required.iter().map(|s| s.to_string()).collect(),
    }
}

/// The closed set of tools the Tool-Server Runtime declares. Field names and
/// defaults match the tool surface exactly; unlike the source this is built
/// around, `keywords_file_content` is spelled correctly here.
pub fn tool_declarations() -> Vec<ToolDeclaration> {
    vec![
        ToolDeclaration {
            name: "list_dir".to_string(),
            description: "List a directory as an ASCII tree, directories before files, case-insensitive name order.".to_string(),
            input_schema: schema(
                &[
                    ("path", json!({"type": "string", "description": "Directory to list"})),
                    ("limit", json!({"type": "integer", "description": "Maximum lines to emit", "default": 100})),
                    ("recursive", json!({"type": "boolean", "description": "Recurse into subdirectories", "default": false})),
                ],
                &["path"],
            ),
        },
        ToolDeclaration {
            name: "create_dirs".to_string(),
            description: "Create a directory and all missing parents. Idempotent if it already exists as a directory.".to_string(),
            input_schema: schema(&[("path", json!({"type": "string"}))], &["path"]),
        },
        ToolDeclaration {
            name: "find_paths".to_string(),
            description: "Recursively search for files whose name and/or content match keyword or regex criteria.".to_string(),
            input_schema: schema(
                &[
                    ("path", json!({"type": "string"})),
                    ("keywords_path_name", json!({"type": "array", "items": {"type": "string"}, "default": []})),
                    ("keywords_file_content", json!({"type": "array", "items": {"type": "string"}, "default": []})),
                    ("regex_keywords", json!({"type": "boolean", "default": false})),
                ],
                &["path"],
            ),
        },
        ToolDeclaration {
            name: "read_from_file".to_string(),
            description: "Read a range of a file, with selectable offset kind and output encoding.".to_string(),
            input_schema: schema(
                &[
                    ("path", json!({"type": "string"})),
                    ("start_offset_inclusive", json!({"type": "integer", "default": 0})),
                    ("end_offset_inclusive", json!({"type": "integer", "default": -1})),
                    ("offset_type", json!({"type": "string", "enum": ["byte", "char", "line"], "default": "line"})),
                    ("file_encoding", json!({"type": "string", "default": "utf-8"})),
                    ("output_format", json!({"type": "string", "enum": ["raw_utf8", "base64", "quoted_printable"], "default": "raw_utf8"})),
                ],
                &["path"],
            ),
        },
        ToolDeclaration {
            name: "write_to_file".to_string(),
            description: "Overwrite a file's full contents via the staged write/validate/replace protocol.".to_string(),
            input_schema: schema(
                &[
                    ("path", json!({"type": "string"})),
                    ("new_content", json!({"type": "string"})),
                    ("mode", json!({"type": "string", "enum": ["text", "binary"], "default": "text"})),
                    ("input_format", json!({"type": "string", "enum": ["raw_utf8", "base64", "quoted_printable"], "default": "raw_utf8"})),
                    ("file_encoding", json!({"type": "string", "default": "utf-8"})),
                ],
                &["path", "new_content"],
            ),
        },
        ToolDeclaration {
            name: "modify_file".to_string(),
            description: "Replace a byte/char/line range of a file with new content via the staged write/validate/replace protocol.".to_string(),
            input_schema: schema(
                &[
                    ("path", json!({"type": "string"})),
                    ("start_offset_inclusive", json!({"type": "integer"})),
                    ("end_offset_inclusive", json!({"type": "integer"})),
                    ("new_content", json!({"type": "string"})),
                    ("offset_type", json!({"type": "string", "enum": ["byte", "char", "line"], "default": "line"})),
                    ("input_format", json!({"type": "string", "enum": ["raw_utf8", "base64", "quoted_printable"], "default": "raw_utf8"})),
                    ("file_encoding", json!({"type": "string", "default": "utf-8"})),
                    ("mode", json!({"type": "string", "enum": ["text", "binary"], "default": "text"})),
                ],
                &["path", "start_offset_inclusive", "end_offset_inclusive", "new_content"],
            ),
        },
        ToolDeclaration {
            name: "replace_in_file".to_string(),
            description: "Replace occurrences of a substring or regex within a file via the staged write/validate/replace protocol.".to_string(),
            input_schema: schema(
                &[
                    ("path", json!({"type": "string"})),
                    ("old_content", json!({"type": "string"})),
                    ("new_content", json!({"type": "string"})),
                    ("number_of_occurrences", json!({"type": "integer", "default": -1})),
                    ("is_regex", json!({"type": "boolean", "default": false})),
                    ("mode", json!({"type": "string", "enum": ["text", "binary"], "default": "text"})),
                    ("input_format", json!({"type": "string", "enum": ["raw_utf8", "base64", "quoted_printable"], "default": "raw_utf8"})),
                    ("file_encoding", json!({"type": "string", "default": "utf-8"})),
                ],
                &["path", "old_content", "new_content"],
            ),
        },
        ToolDeclaration {
            name: "delete_paths".to_string(),
            description: "Delete each given path; directories are removed recursively. Reports combined per-path outcomes.".to_string(),
            input_schema: schema(
                &[("paths", json!({"type": "array", "items": {"type": "string"}}))],
                &["paths"],
            ),
        },
    ]
}
