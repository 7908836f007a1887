//! HTTP transport: MCP stream endpoint, mock login, health, and front-end files.

use std::path::PathBuf;
use std::sync::Arc;

use askama::Template;
use axum::{
    body::Bytes,
    extract::{Query, State},
    http::{header, HeaderMap, StatusCode},
    response::{Html, IntoResponse, Json as AxumJson, Response},
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{
    cors::CorsLayer,
    services::{ServeDir, ServeFile},
    trace::TraceLayer,
};

use fi_data::FixtureStore;

use crate::config::ServerConfig;
use crate::protocol::router::LOGIN_PAGE_PATH;
use crate::protocol::RpcRouter;
use crate::session::{LoginService, SessionRegistry};
use crate::types::{LoginPageQuery, LoginRequest, McpError, McpResult};

use super::login_page::LoginPageTemplate;

/// Header carrying the caller's session id.
pub const SESSION_HEADER: &str = "mcp-session-id";

/// Shared server state passed to all handlers via axum State.
pub struct ServerState {
    pub router: RpcRouter,
    pub login: LoginService,
    pub sessions: Arc<SessionRegistry>,
    pub fixtures: Arc<FixtureStore>,
}

/// HTTP transport for the mock MCP server.
pub struct HttpTransport {
    state: Arc<ServerState>,
    dist_dir: Option<PathBuf>,
}

impl HttpTransport {
    /// Create a transport with a fresh session registry.
    pub fn new(config: &ServerConfig) -> Self {
        Self::with_sessions(config, Arc::new(SessionRegistry::new()))
    }

    /// Create a transport over an existing session registry.
    pub fn with_sessions(config: &ServerConfig, sessions: Arc<SessionRegistry>) -> Self {
        let fixtures = Arc::new(FixtureStore::new(config.data_roots.iter().cloned()));

        let router = RpcRouter::new(Arc::clone(&sessions), Arc::clone(&fixtures))
            .with_default_session_id(config.default_session_id.clone())
            .with_read_timeout(config.read_timeout);
        let login = LoginService::new(Arc::clone(&sessions), Arc::clone(&fixtures));

        Self {
            state: Arc::new(ServerState {
                router,
                login,
                sessions,
                fixtures,
            }),
            dist_dir: config.dist_dir.clone(),
        }
    }

    /// Build the axum router.
    pub fn router(&self) -> Router {
        let api = Router::new()
            .route("/mcp/stream", post(handle_stream))
            .route("/login", post(handle_login))
            .route(LOGIN_PAGE_PATH, get(handle_login_page))
            .route("/health", get(handle_health))
            .with_state(Arc::clone(&self.state));

        let app = match &self.dist_dir {
            Some(dist) => api
                .nest_service("/assets", ServeDir::new(dist.join("assets")))
                .fallback_service(ServeFile::new(dist.join("index.html"))),
            None => api,
        };

        app.layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::very_permissive()),
        )
    }

    /// Run the HTTP server on the given address.
    pub async fn run(&self, addr: std::net::SocketAddr) -> McpResult<()> {
        let app = self.router();

        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .map_err(McpError::Io)?;

        tracing::info!("HTTP transport listening on {addr}");

        axum::serve(listener, app)
            .await
            .map_err(|e| McpError::Transport(e.to_string()))?;

        Ok(())
    }
}

impl IntoResponse for McpError {
    fn into_response(self) -> Response {
        let status = if self.is_transport_level() {
            StatusCode::BAD_REQUEST
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        };
        (status, AxumJson(serde_json::json!({ "error": self.to_string() }))).into_response()
    }
}

/// MCP stream endpoint. The body is read raw so it is only parsed once the
/// session is known to be logged in.
async fn handle_stream(
    State(state): State<Arc<ServerState>>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<AxumJson<serde_json::Value>, McpError> {
    let session_header = headers.get(SESSION_HEADER).and_then(|v| v.to_str().ok());
    let response = state.router.handle(session_header, &body).await?;
    Ok(AxumJson(response))
}

async fn handle_login(
    State(state): State<Arc<ServerState>>,
    body: Bytes,
) -> Result<AxumJson<serde_json::Value>, McpError> {
    let request: LoginRequest = serde_json::from_slice(&body).map_err(|e| {
        tracing::warn!("Rejected malformed login body: {e}");
        McpError::ParseError(e.to_string())
    })?;

    let result = state.login.login(&request).await;
    serde_json::to_value(result)
        .map(AxumJson)
        .map_err(|e| McpError::InternalError(e.to_string()))
}

async fn handle_login_page(
    State(state): State<Arc<ServerState>>,
    Query(query): Query<LoginPageQuery>,
) -> Result<Response, McpError> {
    let session_id = state
        .router
        .resolve_session_id(query.session_id.as_deref());

    let fixtures = Arc::clone(&state.fixtures);
    let profiles = tokio::task::spawn_blocking(move || fixtures.summaries())
        .await
        .unwrap_or_else(|e| {
            tracing::error!("Listing profiles failed: {e}");
            Vec::new()
        });

    let page = LoginPageTemplate {
        session_id,
        profiles,
    }
    .render()
    .map_err(|e| McpError::InternalError(format!("login page: {e}")))?;

    Ok(([(header::CACHE_CONTROL, "no-store")], Html(page)).into_response())
}

/// Health check endpoint.
async fn handle_health(State(state): State<Arc<ServerState>>) -> AxumJson<serde_json::Value> {
    AxumJson(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "sessions": state.sessions.len().await,
    }))
}
