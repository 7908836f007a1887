//! Transport layer for MCP communication.

pub mod http;
pub mod login_page;

pub use http::HttpTransport;
