use mcp_types::RequestError;

/// The stable error taxonomy from the tool surface down to the JSON-RPC
/// boundary. Every variant names its class in `Display` so a failing call's
/// `message` always begins with a recognizable class name, per the
/// user-visible error convention.
#[derive(Debug, thiserror::Error)]
pub enum ToolError {
    #[error("Path outside root directory: {0}")]
    Sandbox(String),
    #[error("File not found: {0}")]
    NotFound(String),
    #[error("Not a file: {0}")]
    NotAFile(String),
    #[error("Not a directory: {0}")]
    NotADirectory(String),
    #[error("Permission denied: {0}")]
    Permission(String),
    #[error("File exceeds the 100 MiB size cap: {0}")]
    Capacity(String),
    #[error("Encoding error: {0}")]
    Encoding(String),
    #[error("Invalid regular expression: {0}")]
    Regex(String),
    #[error("Validation failed for {path}: {reason} (original file was not modified)")]
    Validation { path: String, reason: String },
    #[error("Timeout: {0}")]
    Timeout(String),
    #[error("{0}")]
    InvalidArgument(String),
    #[error("I/O error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

impl ToolError {
    pub fn io(path: impl Into<String>, source: std::io::Error) -> Self {
        let path = path.into();
        match source.kind() {
            std::io::ErrorKind::NotFound => ToolError::NotFound(path),
            std::io::ErrorKind::PermissionDenied => ToolError::Permission(path),
            _ => ToolError::Io { path, source },
        }
    }
}

impl From<ToolError> for RequestError {
    fn from(error: ToolError) -> Self {
        RequestError::internal(error.to_string())
    }
}
