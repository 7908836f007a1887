//! Response payload types for tools, login, and server info.

use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const SERVER_NAME: &str = "fi-mcp";
pub const SERVER_VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    #[serde(rename = "inputSchema")]
    pub input_schema: Value,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolListResult {
    pub tools: Vec<ToolDefinition>,
}

/// Result returned to sessions that have not logged in yet.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginChallenge {
    pub login_url: String,
}

/// Outcome of `POST /login`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginResult {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl LoginResult {
    pub fn succeeded() -> Self {
        Self {
            success: true,
            message: Some("Login successful".to_string()),
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: Some(message.into()),
        }
    }
}
