//! Session registry: maps caller-supplied session ids to logged-in phone numbers.

use std::collections::HashMap;

use tokio::sync::RwLock;

/// Concurrent session id → phone number map.
///
/// Entries live for the lifetime of the process: no expiry, no eviction.
#[derive(Debug, Default)]
pub struct SessionRegistry {
    sessions: RwLock<HashMap<String, String>>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `session_id` to `phone_number`, replacing any previous binding.
    pub async fn put(&self, session_id: &str, phone_number: &str) {
        let previous = self
            .sessions
            .write()
            .await
            .insert(session_id.to_string(), phone_number.to_string());

        if let Some(previous) = previous {
            tracing::debug!("Session '{session_id}' rebound from {previous} to {phone_number}");
        }
    }

    /// Phone number bound to `session_id`, if any.
    pub async fn get(&self, session_id: &str) -> Option<String> {
        self.sessions.read().await.get(session_id).cloned()
    }

    /// Number of sessions.
    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }
}
