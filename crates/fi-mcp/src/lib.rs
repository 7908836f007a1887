//! Fi MCP mock server: session-gated JSON-RPC access to per-user financial fixtures.

pub mod config;
pub mod protocol;
pub mod session;
pub mod tools;
pub mod transport;
pub mod types;

pub use config::{resolve_data_roots, ServerConfig};
pub use protocol::RpcRouter;
pub use session::{LoginService, SessionRegistry};
pub use transport::HttpTransport;
