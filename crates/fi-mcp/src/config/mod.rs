//! Configuration loading and resolution.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use crate::protocol::router::DEFAULT_SESSION_ID;

/// Fixture roots probed when nothing is configured, highest priority first.
///
/// Covers running from the repository root, from inside `server/`, and from
/// a sibling directory.
pub const DEFAULT_DATA_ROOTS: &[&str] = &[
    "server/test_data_dir",
    "test_data_dir",
    "../server/test_data_dir",
];

pub const DEFAULT_PORT: u16 = 3001;
pub const DEFAULT_READ_TIMEOUT_MS: u64 = 5_000;

/// Everything the HTTP transport needs to start.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub addr: SocketAddr,
    pub data_roots: Vec<PathBuf>,
    pub dist_dir: Option<PathBuf>,
    pub default_session_id: String,
    pub read_timeout: Duration,
}

impl ServerConfig {
    /// Configuration with default values over the given data roots.
    pub fn with_data_roots(data_roots: Vec<PathBuf>) -> Self {
        Self {
            addr: SocketAddr::from(([0, 0, 0, 0], DEFAULT_PORT)),
            data_roots,
            dist_dir: None,
            default_session_id: DEFAULT_SESSION_ID.to_string(),
            read_timeout: Duration::from_millis(DEFAULT_READ_TIMEOUT_MS),
        }
    }
}

/// Resolve the ordered fixture roots.
pub fn resolve_data_roots(explicit: &[String]) -> Vec<PathBuf> {
    if !explicit.is_empty() {
        return explicit.iter().map(PathBuf::from).collect();
    }

    if let Some(env_roots) = std::env::var_os("FI_MCP_DATA_DIRS") {
        let roots: Vec<PathBuf> = std::env::split_paths(&env_roots)
            .filter(|p| !p.as_os_str().is_empty())
            .collect();
        if !roots.is_empty() {
            return roots;
        }
    }

    DEFAULT_DATA_ROOTS.iter().map(PathBuf::from).collect()
}

/// Resolve the listen address.
pub fn resolve_listen_addr(explicit: Option<&str>) -> anyhow::Result<SocketAddr> {
    if let Some(addr) = explicit {
        return addr
            .parse()
            .map_err(|e| anyhow::anyhow!("invalid listen address {addr:?}: {e}"));
    }

    let port = match std::env::var("PORT") {
        Ok(port) if !port.is_empty() => port
            .parse::<u16>()
            .map_err(|e| anyhow::anyhow!("invalid PORT {port:?}: {e}"))?,
        _ => DEFAULT_PORT,
    };

    Ok(SocketAddr::from(([0, 0, 0, 0], port)))
}

/// Resolve the built front-end directory, if any.
pub fn resolve_dist_dir(explicit: Option<&str>) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return Some(PathBuf::from(path));
    }

    if let Ok(env_path) = std::env::var("FI_MCP_DIST_DIR") {
        if !env_path.is_empty() {
            return Some(PathBuf::from(env_path));
        }
    }

    let cwd_dist = PathBuf::from("dist");
    cwd_dist.is_dir().then_some(cwd_dist)
}
