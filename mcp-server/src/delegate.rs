use mcp_types::CallToolParams;
use mcp_types::CallToolResult;
use mcp_types::ClientCapabilities;
use mcp_types::Implementation;
use mcp_types::InitializeResult;
use mcp_types::ListToolsResult;
use mcp_types::RequestError;
use mcp_types::ServerCapabilities;
use mcp_types::ToolDeclaration;
use mcp_types::ToolsCapability;
use mcp_types::NOTIFICATION_INITIALIZED;
use serde_json::Map;
use serde_json::Value;
use stdio_peer::Delegate;

use crate::args;
use crate::content::ContentFormat;
use crate::content::FileMode;
use crate::content::OffsetKind;
use crate::declarations::tool_declarations;
use crate::error::ToolError;
use crate::sandbox::WorkspaceRoot;
use crate::tools;
use crate::validator::ValidatorTable;

const PROTOCOL_VERSION: &str = "2024-11-05";
const SERVER_NAME: &str = "mcp-server";

pub struct ToolServerDelegate {
    root: WorkspaceRoot,
    validators: ValidatorTable,
    declarations: Vec<ToolDeclaration>,
}

impl ToolServerDelegate {
    pub fn new(root: WorkspaceRoot, validators: ValidatorTable) -> Self {
        ToolServerDelegate {
            root,
            validators,
            declarations: tool_declarations(),
        }
    }

    fn declaration_for<'a>(&'a self, name: &str) -> Option<&'a ToolDeclaration> {
        self.declarations.iter().find(|d| d.name == name)
    }

    /// Filters `arguments` to the declared tool's schema properties, dropping
    /// unknown keys silently and rejecting a call outright if a required key
    /// is missing once filtered.
    fn filter_arguments(&self, declaration: &ToolDeclaration, arguments: Map<String, Value>) -> Result<Map<String, Value>, ToolError> {
        let filtered: Map<String, Value> = arguments
            .into_iter()
            .filter(|(key, _)| declaration.input_schema.properties.contains_key(key))
            .collect();

        for required in &declaration.input_schema.required {
            if !filtered.contains_key(required) {
                return Err(ToolError::InvalidArgument(format!(
                    "'{}' is missing required argument '{required}'",
                    declaration.name
                )));
            }
        }
        Ok(filtered)
    }

    async fn call_tool(&self, name: &str, arguments: Map<String, Value>) -> Result<CallToolResult, ToolError> {
        let message = match name {
            "list_dir" => {
                let path = args::require_str(&arguments, "path")?;
                let limit = args::get_usize(&arguments, "limit", 100);
                let recursive = args::get_bool(&arguments, "recursive", false);
                tools::list_dir::list_dir(&self.root, &path, limit, recursive)?
            }
            "create_dirs" => {
                let path = args::require_str(&arguments, "path")?;
                tools::create_dirs::create_dirs(&self.root, &path)?
            }
            "find_paths" => {
                let path = args::require_str(&arguments, "path")?;
                let keywords_path_name = args::get_string_array(&arguments, "keywords_path_name");
                let keywords_file_content = args::get_string_array(&arguments, "keywords_file_content");
                let regex_keywords = args::get_bool(&arguments, "regex_keywords", false);
                let matches = tools::find_paths::find_paths(
                    &self.root,
                    &path,
                    &keywords_path_name,
                    &keywords_file_content,
                    regex_keywords,
                )?;
                serde_json::to_string(&matches).map_err(|e| ToolError::Encoding(e.to_string()))?
            }
            "read_from_file" => {
                args::require_utf8_file_encoding(&arguments, "file_encoding")?;
                let path = args::require_str(&arguments, "path")?;
                let start = args::get_i64(&arguments, "start_offset_inclusive", 0);
                let end = args::get_i64(&arguments, "end_offset_inclusive", -1);
                let offset_type = args::get_offset_kind(&arguments, "offset_type", OffsetKind::Line)?;
                let output_format = args::get_content_format(&arguments, "output_format", ContentFormat::RawUtf8)?;
                tools::read_file::read_from_file(&self.root, &path, start, end, offset_type, output_format).await?
            }
            "write_to_file" => {
                args::require_utf8_file_encoding(&arguments, "file_encoding")?;
                let path = args::require_str(&arguments, "path")?;
                let new_content = args::require_str(&arguments, "new_content")?;
                let mode = args::get_file_mode(&arguments, "mode", FileMode::Text)?;
                let input_format = args::get_content_format(&arguments, "input_format", ContentFormat::RawUtf8)?;
                tools::write_file::write_to_file(&self.root, &self.validators, &path, &new_content, mode, input_format).await?
            }
            "modify_file" => {
                args::require_utf8_file_encoding(&arguments, "file_encoding")?;
                let path = args::require_str(&arguments, "path")?;
                let start = args::require_i64(&arguments, "start_offset_inclusive")?;
                let end = args::require_i64(&arguments, "end_offset_inclusive")?;
                let new_content = args::require_str(&arguments, "new_content")?;
                let offset_type = args::get_offset_kind(&arguments, "offset_type", OffsetKind::Line)?;
                let input_format = args::get_content_format(&arguments, "input_format", ContentFormat::RawUtf8)?;
                let mode = args::get_file_mode(&arguments, "mode", FileMode::Text)?;
                tools::modify_file::modify_file(
                    &self.root,
                    &self.validators,
                    &path,
                    start,
                    end,
                    &new_content,
                    offset_type,
                    input_format,
                    mode,
                )
                .await?
            }
            "replace_in_file" => {
                args::require_utf8_file_encoding(&arguments, "file_encoding")?;
                let path = args::require_str(&arguments, "path")?;
                let old_content = args::require_str(&arguments, "old_content")?;
                let new_content = args::require_str(&arguments, "new_content")?;
                let number_of_occurrences = args::get_i64(&arguments, "number_of_occurrences", -1);
                let is_regex = args::get_bool(&arguments, "is_regex", false);
                let mode = args::get_file_mode(&arguments, "mode", FileMode::Text)?;
                let input_format = args::get_content_format(&arguments, "input_format", ContentFormat::RawUtf8)?;
                tools::replace_file::replace_in_file(
                    &self.root,
                    &self.validators,
                    &path,
                    &old_content,
                    &new_content,
                    number_of_occurrences,
                    is_regex,
                    mode,
                    input_format,
                )
                .await?
            }
            "delete_paths" => {
                let paths = args::get_string_array(&arguments, "paths");
                tools::delete_paths::delete_paths(&self.root, &paths)?
            }
            other => return Err(ToolError::InvalidArgument(format!("unknown tool '{other}'"))),
        };
        Ok(CallToolResult::text(message))
    }
}

#[async_trait::async_trait]
impl Delegate for ToolServerDelegate {
    async fn handle_request(&self, method: &str, params: Option<Value>) -> Result<Value, RequestError> {
        match method {
            "initialize" => {
                let result = InitializeResult {
                    protocol_version: PROTOCOL_VERSION.to_string(),
                    server_info: Implementation {
                        name: SERVER_NAME.to_string(),
                        version: env!("CARGO_PKG_VERSION").to_string(),
                    },
                    capabilities: ServerCapabilities {
                        tools: ToolsCapability::default(),
                    },
                };
                serde_json::to_value(result).map_err(|e| RequestError::internal(e.to_string()))
            }
            "tools/list" => {
                let result = ListToolsResult {
                    tools: self.declarations.clone(),
                };
                serde_json::to_value(result).map_err(|e| RequestError::internal(e.to_string()))
            }
            "tools/call" => {
                let params: CallToolParams = serde_json::from_value(params.unwrap_or(Value::Null))
                    .map_err(|e| RequestError::internal(format!("invalid tools/call params: {e}")))?;

                let declaration = self
                    .declaration_for(&params.name)
                    .ok_or_else(|| RequestError::method_not_found(&params.name))?;
                let filtered = self
                    .filter_arguments(declaration, params.arguments)
                    .map_err(RequestError::from)?;

                let result = self.call_tool(&params.name, filtered).await.map_err(RequestError::from)?;
                serde_json::to_value(result).map_err(|e| RequestError::internal(e.to_string()))
            }
            other => Err(RequestError::method_not_found(other)),
        }
    }

    async fn handle_notification(&self, method: &str, _params: Option<Value>) {
        if method == NOTIFICATION_INITIALIZED {
            tracing::info!("client reported initialized");
        } else {
            tracing::debug!("ignoring unknown notification '{method}'");
        }
    }
}
