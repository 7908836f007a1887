//! MCP protocol handling: session gate and JSON-RPC dispatch.

pub mod router;

pub use router::RpcRouter;
