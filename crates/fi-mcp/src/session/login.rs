//! Mock phone + OTP login.

use std::sync::Arc;

use fi_data::FixtureStore;

use super::SessionRegistry;
use crate::types::{LoginRequest, LoginResult};

pub const INVALID_PHONE_MESSAGE: &str =
    "Invalid phone number. Please select from available test numbers.";

/// Validates a login against the fixture store and records the session.
///
/// The OTP is never checked: any value is accepted for a phone number that
/// has a fixture directory.
#[derive(Clone)]
pub struct LoginService {
    sessions: Arc<SessionRegistry>,
    fixtures: Arc<FixtureStore>,
}

impl LoginService {
    pub fn new(sessions: Arc<SessionRegistry>, fixtures: Arc<FixtureStore>) -> Self {
        Self { sessions, fixtures }
    }

    pub async fn login(&self, request: &LoginRequest) -> LoginResult {
        if !self.fixtures.exists(&request.phone_number) {
            tracing::info!(
                "Rejected login for session '{}': no data for {}",
                request.session_id,
                request.phone_number
            );
            return LoginResult::failed(INVALID_PHONE_MESSAGE);
        }

        self.sessions
            .put(&request.session_id, &request.phone_number)
            .await;

        tracing::info!(
            "Session '{}' logged in as {}",
            request.session_id,
            request.phone_number
        );
        LoginResult::succeeded()
    }
}
