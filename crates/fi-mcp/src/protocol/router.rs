//! Session-gated request router for the MCP stream endpoint.

use std::sync::Arc;
use std::time::Duration;

use serde_json::{Map, Value};

use fi_data::FixtureStore;

use crate::session::SessionRegistry;
use crate::tools::ToolRegistry;
use crate::types::*;

/// Session id used when a request carries no `Mcp-Session-Id` header.
pub const DEFAULT_SESSION_ID: &str = "mcp-session-demo";

/// Id carried by every login challenge; the request body is never read there.
pub const LOGIN_CHALLENGE_ID: i64 = 1;

/// Path of the mock login page.
pub const LOGIN_PAGE_PATH: &str = "/mockWebPage";

/// Routes one stream request to a login challenge or a tool dispatch.
///
/// Holds no per-request state; the only state shared between requests is
/// the session registry.
#[derive(Clone)]
pub struct RpcRouter {
    sessions: Arc<SessionRegistry>,
    fixtures: Arc<FixtureStore>,
    default_session_id: String,
    read_timeout: Duration,
}

impl RpcRouter {
    pub fn new(sessions: Arc<SessionRegistry>, fixtures: Arc<FixtureStore>) -> Self {
        Self {
            sessions,
            fixtures,
            default_session_id: DEFAULT_SESSION_ID.to_string(),
            read_timeout: Duration::from_secs(5),
        }
    }

    pub fn with_default_session_id(mut self, session_id: impl Into<String>) -> Self {
        self.default_session_id = session_id.into();
        self
    }

    pub fn with_read_timeout(mut self, timeout: Duration) -> Self {
        self.read_timeout = timeout;
        self
    }

    /// Session id for a request, falling back to the default when the header
    /// is missing or empty.
    pub fn resolve_session_id(&self, header: Option<&str>) -> String {
        match header {
            Some(id) if !id.is_empty() => id.to_string(),
            _ => self.default_session_id.clone(),
        }
    }

    /// Handle one request body.
    ///
    /// Returns the JSON body to send back. Only a malformed body from an
    /// authenticated session produces `Err`, which callers turn into an HTTP
    /// client error.
    pub async fn handle(&self, session_header: Option<&str>, body: &[u8]) -> McpResult<Value> {
        let session_id = self.resolve_session_id(session_header);

        let Some(phone_number) = self.sessions.get(&session_id).await else {
            tracing::debug!("Session '{session_id}' not logged in, issuing login challenge");
            return to_value(JsonRpcResponse::new(
                RequestId::Number(LOGIN_CHALLENGE_ID),
                to_value(login_challenge(&session_id))?,
            ));
        };

        let request =
            JsonRpcRequest::from_slice(body).map_err(|e| McpError::ParseError(e.to_string()))?;

        if request.jsonrpc != JSONRPC_VERSION {
            tracing::warn!(
                "Session '{session_id}' sent jsonrpc version {:?}, expected \"{JSONRPC_VERSION}\"",
                request.jsonrpc
            );
        }

        let id = request.id.clone();
        match self.dispatch(&request, &phone_number).await {
            Ok(result) => to_value(JsonRpcResponse::new(id, result)),
            Err(e) => {
                tracing::warn!("Request {id} ({}) failed: {e}", request.method);
                to_value(e.to_json_rpc_error(id))
            }
        }
    }

    async fn dispatch(&self, request: &JsonRpcRequest, phone_number: &str) -> McpResult<Value> {
        tracing::debug!("Dispatching {} for {phone_number}", request.method);
        match request.method.as_str() {
            "tools/list" => self.handle_tools_list(),
            "tools/call" => {
                self.handle_tools_call(request.params.as_ref(), phone_number)
                    .await
            }
            _ => Err(McpError::MethodNotFound(request.method.clone())),
        }
    }

    fn handle_tools_list(&self) -> McpResult<Value> {
        to_value(ToolListResult {
            tools: ToolRegistry::list_tools(),
        })
    }

    async fn handle_tools_call(
        &self,
        params: Option<&Map<String, Value>>,
        phone_number: &str,
    ) -> McpResult<Value> {
        let params = params
            .ok_or_else(|| McpError::InvalidToolCall("params are required".to_string()))?;
        let call_params: ToolCallParams = serde_json::from_value(Value::Object(params.clone()))
            .map_err(|e| McpError::InvalidToolCall(format!("params.name must be a string: {e}")))?;

        if let Some(arguments) = &call_params.arguments {
            tracing::debug!("Ignoring arguments for {}: {arguments}", call_params.name);
        }

        ToolRegistry::call(
            &call_params.name,
            phone_number,
            &self.fixtures,
            self.read_timeout,
        )
        .await
    }
}

/// Login challenge for a session that has not logged in.
pub fn login_challenge(session_id: &str) -> LoginChallenge {
    LoginChallenge {
        login_url: format!("{LOGIN_PAGE_PATH}?sessionId={session_id}"),
    }
}

fn to_value(value: impl serde::Serialize) -> McpResult<Value> {
    serde_json::to_value(value).map_err(|e| McpError::InternalError(e.to_string()))
}
