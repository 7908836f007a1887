//! Error types and JSON-RPC error codes for the MCP server.

use fi_data::FixtureError;

use super::message::{JsonRpcError, JsonRpcErrorObject, RequestId, JSONRPC_VERSION};

/// Standard JSON-RPC 2.0 error codes.
pub mod error_codes {
    pub const PARSE_ERROR: i32 = -32700;
    pub const METHOD_NOT_FOUND: i32 = -32601;
    pub const INTERNAL_ERROR: i32 = -32603;
}

/// Application-defined error codes.
pub mod mcp_error_codes {
    /// Tool call could not be resolved to fixture data.
    pub const TOOL_DISPATCH: i32 = -1;
}

/// All errors that can occur in the MCP server.
#[derive(thiserror::Error, Debug)]
pub enum McpError {
    /// Malformed request body. Surfaced as HTTP 400, never as a JSON-RPC envelope.
    #[error("Invalid JSON: {0}")]
    ParseError(String),

    #[error("Method not found")]
    MethodNotFound(String),

    #[error("Invalid tool call: {0}")]
    InvalidToolCall(String),

    #[error(transparent)]
    Fixture(#[from] FixtureError),

    #[error("timed out loading data for {0}")]
    FixtureTimeout(String),

    #[error("Internal error: {0}")]
    InternalError(String),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl McpError {
    pub fn code(&self) -> i32 {
        use error_codes::*;
        use mcp_error_codes::*;
        match self {
            McpError::ParseError(_) => PARSE_ERROR,
            McpError::MethodNotFound(_) => METHOD_NOT_FOUND,
            McpError::InvalidToolCall(_)
            | McpError::Fixture(_)
            | McpError::FixtureTimeout(_) => TOOL_DISPATCH,
            McpError::InternalError(_) | McpError::Transport(_) | McpError::Io(_) => {
                INTERNAL_ERROR
            }
        }
    }

    /// Whether this error fails the HTTP exchange instead of producing a
    /// JSON-RPC error object.
    pub fn is_transport_level(&self) -> bool {
        matches!(self, McpError::ParseError(_))
    }

    pub fn to_json_rpc_error(&self, id: RequestId) -> JsonRpcError {
        JsonRpcError {
            jsonrpc: JSONRPC_VERSION.to_string(),
            id,
            error: JsonRpcErrorObject {
                code: self.code(),
                message: self.to_string(),
            },
        }
    }
}

pub type McpResult<T> = Result<T, McpError>;
