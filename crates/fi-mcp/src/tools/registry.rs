//! Tool registration and dispatch.

use std::sync::Arc;
use std::time::Duration;

use serde_json::{json, Value};

use fi_data::FixtureStore;

use crate::types::{McpError, McpResult, ToolDefinition};

/// Catalog entries in declaration order: `(name, description)`.
///
/// Each name doubles as the fixture file stem under a profile directory.
const CATALOG: &[(&str, &str)] = &[
    (
        "fetch_net_worth",
        "Fetch user's net worth including assets and liabilities",
    ),
    ("fetch_credit_report", "Fetch user's credit report and score"),
    ("fetch_epf_details", "Fetch user's EPF account details"),
    (
        "fetch_mutual_fund_transactions",
        "Fetch user's mutual fund transactions",
    ),
    ("fetch_bank_transactions", "Fetch user's bank transactions"),
];

pub struct ToolRegistry;

impl ToolRegistry {
    pub fn list_tools() -> Vec<ToolDefinition> {
        CATALOG
            .iter()
            .map(|(name, description)| ToolDefinition {
                name: name.to_string(),
                description: description.to_string(),
                input_schema: json!({
                    "type": "object",
                    "properties": {},
                    "required": []
                }),
            })
            .collect()
    }

    /// Names of every catalog tool, in catalog order.
    pub fn tool_names() -> impl Iterator<Item = &'static str> {
        CATALOG.iter().map(|(name, _)| *name)
    }

    /// Resolve a tool call to the caller's fixture.
    ///
    /// Names are not checked against the catalog; an unknown tool simply has
    /// no fixture and fails the lookup.
    pub async fn call(
        name: &str,
        phone_number: &str,
        fixtures: &Arc<FixtureStore>,
        read_timeout: Duration,
    ) -> McpResult<Value> {
        let store = Arc::clone(fixtures);
        let phone = phone_number.to_string();
        let tool = name.to_string();
        let read = tokio::task::spawn_blocking(move || store.load_json(&phone, &tool));

        match tokio::time::timeout(read_timeout, read).await {
            Ok(Ok(result)) => result.map_err(McpError::from),
            Ok(Err(e)) => Err(McpError::InternalError(format!(
                "fixture read for {name} aborted: {e}"
            ))),
            Err(_) => Err(McpError::FixtureTimeout(name.to_string())),
        }
    }
}
