//! Layered fixture store: `<root>/<phone_number>/<tool>.json` across ordered roots.

use std::collections::BTreeSet;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde_json::Value;

use crate::types::{
    is_valid_key, FixtureError, FixtureResult, ProfileSummary, FIXTURE_EXTENSION,
    PROFILE_DESCRIPTION_FILE,
};

/// Read-only view over one or more fixture roots.
///
/// Roots are probed in the order given on every call; the first root that
/// holds the requested file wins. Nothing is cached.
#[derive(Debug, Clone)]
pub struct FixtureStore {
    roots: Vec<PathBuf>,
}

impl FixtureStore {
    /// Create a store over the given roots, highest priority first.
    pub fn new<I, P>(roots: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        Self {
            roots: roots.into_iter().map(Into::into).collect(),
        }
    }

    /// Configured roots in priority order.
    pub fn roots(&self) -> &[PathBuf] {
        &self.roots
    }

    /// Whether any root holds a profile directory for `phone_number`.
    pub fn exists(&self, phone_number: &str) -> bool {
        if !is_valid_key(phone_number) {
            return false;
        }
        self.roots
            .iter()
            .any(|root| root.join(phone_number).is_dir())
    }

    /// Load the raw bytes of the fixture for `(phone_number, tool)`.
    pub fn load(&self, phone_number: &str, tool: &str) -> FixtureResult<Vec<u8>> {
        if !is_valid_key(phone_number) {
            return Err(FixtureError::InvalidKey(phone_number.to_string()));
        }
        if !is_valid_key(tool) {
            return Err(FixtureError::InvalidKey(tool.to_string()));
        }

        let file_name = format!("{tool}.{FIXTURE_EXTENSION}");
        let mut read_failure = None;

        for root in &self.roots {
            let path = root.join(phone_number).join(&file_name);
            match std::fs::read(&path) {
                Ok(bytes) => {
                    tracing::debug!("Loaded fixture {}", path.display());
                    return Ok(bytes);
                }
                Err(e) if e.kind() == ErrorKind::NotFound => continue,
                Err(e) => {
                    tracing::warn!("Failed to read fixture {}: {e}", path.display());
                    read_failure.get_or_insert((path, e));
                }
            }
        }

        Err(match read_failure {
            Some((path, source)) => FixtureError::Read {
                tool: tool.to_string(),
                path,
                source,
            },
            None => FixtureError::NotFound {
                phone_number: phone_number.to_string(),
                tool: tool.to_string(),
            },
        })
    }

    /// Load and parse the fixture for `(phone_number, tool)` as JSON.
    pub fn load_json(&self, phone_number: &str, tool: &str) -> FixtureResult<Value> {
        let bytes = self.load(phone_number, tool)?;
        serde_json::from_slice(&bytes).map_err(|source| FixtureError::Parse {
            tool: tool.to_string(),
            source,
        })
    }

    /// All profile directories across every root, sorted and de-duplicated.
    pub fn profiles(&self) -> Vec<String> {
        let mut found = BTreeSet::new();
        for root in &self.roots {
            let Ok(entries) = std::fs::read_dir(root) else {
                continue;
            };
            for entry in entries.flatten() {
                if !entry.path().is_dir() {
                    continue;
                }
                if let Some(name) = entry.file_name().to_str() {
                    found.insert(name.to_string());
                }
            }
        }
        found.into_iter().collect()
    }

    /// Tool names that have a fixture for `phone_number` under any root.
    pub fn available_tools(&self, phone_number: &str) -> Vec<String> {
        if !is_valid_key(phone_number) {
            return Vec::new();
        }
        let mut tools = BTreeSet::new();
        for root in &self.roots {
            collect_fixture_names(&root.join(phone_number), &mut tools);
        }
        tools.into_iter().collect()
    }

    /// First non-empty line of the profile's description file, from the
    /// highest-priority root that has one.
    pub fn description(&self, phone_number: &str) -> Option<String> {
        if !is_valid_key(phone_number) {
            return None;
        }
        self.roots.iter().find_map(|root| {
            let path = root.join(phone_number).join(PROFILE_DESCRIPTION_FILE);
            let text = std::fs::read_to_string(path).ok()?;
            text.lines()
                .map(str::trim)
                .find(|line| !line.is_empty())
                .map(str::to_string)
        })
    }

    /// Summaries for every profile.
    pub fn summaries(&self) -> Vec<ProfileSummary> {
        self.profiles()
            .into_iter()
            .map(|phone_number| ProfileSummary {
                tools: self.available_tools(&phone_number),
                description: self.description(&phone_number),
                phone_number,
            })
            .collect()
    }
}

fn collect_fixture_names(dir: &Path, into: &mut BTreeSet<String>) {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return;
    };
    for entry in entries.flatten() {
        let path = entry.path();
        if path.extension().and_then(|e| e.to_str()) != Some(FIXTURE_EXTENSION) {
            continue;
        }
        if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
            into.insert(stem.to_string());
        }
    }
}
