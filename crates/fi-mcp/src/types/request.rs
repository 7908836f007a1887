//! Request parameter types.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Parameters of a `tools/call` request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolCallParams {
    pub name: String,
    #[serde(default)]
    pub arguments: Option<Value>,
}

/// Body of `POST /login`. Missing or `null` fields read as empty strings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub session_id: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub phone_number: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub otp: String,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// Query string of `GET /mockWebPage`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginPageQuery {
    #[serde(default)]
    pub session_id: Option<String>,
}
