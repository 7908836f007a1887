//! Core data types for fixture lookup.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// File extension every fixture carries on disk.
pub const FIXTURE_EXTENSION: &str = "json";

/// Optional one-line label stored beside a profile's fixtures.
pub const PROFILE_DESCRIPTION_FILE: &str = "profile.txt";

/// Summary of one phone-number profile found under the data roots.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileSummary {
    pub phone_number: String,
    /// Tool names with a fixture file for this profile, sorted.
    pub tools: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Errors that can occur while resolving fixtures.
#[derive(thiserror::Error, Debug)]
pub enum FixtureError {
    #[error("failed to load data for {tool} from any path")]
    NotFound { phone_number: String, tool: String },

    #[error("failed to read data for {tool} at {}: {source}", .path.display())]
    Read {
        tool: String,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse data for {tool}: {source}")]
    Parse {
        tool: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid fixture key: {0:?}")]
    InvalidKey(String),
}

/// Convenience result type.
pub type FixtureResult<T> = Result<T, FixtureError>;

/// Returns true when `segment` can be used as a single path component.
///
/// Rejects empty strings, `.`/`..`, and anything containing a separator so a
/// lookup can never leave the configured roots.
pub fn is_valid_key(segment: &str) -> bool {
    !segment.is_empty()
        && segment != "."
        && segment != ".."
        && !segment.contains(['/', '\\', '\0'])
}
