//! Fi data: fixture storage for the Fi MCP mock server.

pub mod store;
pub mod types;

pub use store::FixtureStore;
pub use types::*;
