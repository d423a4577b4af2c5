use std::collections::BTreeMap;

use serde::Deserialize;
use serde::Serialize;
use serde_json::Value;

/// A single declared tool, as returned by `tools/list`.
///
/// `input_schema` is a plain JSON Schema object (`{type: "object",
/// properties: {...}, required: [...]}`); the Tool-Server Runtime builds
/// these by hand rather than deriving them with `schemars`, since every
/// declared property must carry its own documented default and description,
/// which a derived schema would not reproduce faithfully.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolDeclaration {
    pub name: String,
    pub description: String,
    #[serde(rename = "inputSchema")]
    pub input_schema: ToolInputSchema,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolInputSchema {
    #[serde(rename = "type")]
    pub schema_type: String,
    pub properties: BTreeMap<String, Value>,
    pub required: Vec<String>,
}

impl ToolInputSchema {
    pub fn property_names(&self) -> impl Iterator<Item = &str> {
        self.properties.keys().map(String::as_str)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListToolsResult {
    pub tools: Vec<ToolDeclaration>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CallToolParams {
    pub name: String,
    #[serde(default)]
    pub arguments: serde_json::Map<String, Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", tag = "type")]
pub enum ContentBlock {
    Text { text: String },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CallToolResult {
    pub content: Vec<ContentBlock>,
}

impl CallToolResult {
    pub fn text(message: impl Into<String>) -> Self {
        CallToolResult {
            content: vec![ContentBlock::Text {
                text: message.into(),
            }],
        }
    }
}
