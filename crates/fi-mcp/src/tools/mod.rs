//! MCP tool catalog.

pub mod registry;

pub use registry::ToolRegistry;
