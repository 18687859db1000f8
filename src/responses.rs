//! Response bodies
//!
//! Responses are validated strictly: a missing field or a type mismatch is a
//! hard failure. Nullable fields are `Option<T>` but must still be present on
//! the wire (`"expires_at": null` is accepted, an absent `expires_at` is not).

use crate::types::UIConfig;
use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// A service that agents in your organization can use.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Service {
    pub service_name: String,
    #[serde(default)]
    pub description: Option<String>,
}

/// Envelope of `GET /v1/services`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ListResponse {
    pub data: Vec<Service>,
}

/// A session returned by `create_session` or `clone_session`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Session {
    pub id: String,
    /// Unix timestamp, seconds.
    #[serde(deserialize_with = "integer_or_numeric_string")]
    pub created_at: i64,
    #[serde(deserialize_with = "nullable")]
    pub project_id: Option<String>,
    pub metadata: BTreeMap<String, String>,
    #[serde(deserialize_with = "nullable")]
    pub expires_at: Option<i64>,
    #[serde(deserialize_with = "nullable")]
    pub max_requests: Option<i64>,
}

/// Raw body of the create-agent endpoint; see [`Agent`].
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CreateAgentResponse {
    pub id: String,
    pub session_id: String,
    pub moment_id: i64,
    pub moment_uuid: String,
    pub ui_config: UIConfig,
}

/// Identity of a freshly created agent: where it lives and its first moment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Agent {
    pub session_id: String,
    pub agent_id: String,
    pub moment_id: i64,
    pub moment_uuid: String,
}

impl From<CreateAgentResponse> for Agent {
    fn from(response: CreateAgentResponse) -> Self {
        Self {
            session_id: response.session_id,
            agent_id: response.id,
            moment_id: response.moment_id,
            moment_uuid: response.moment_uuid,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct MessagesAdded {
    pub moment_id: String,
}

/// Deprecated: returned by `update_history`; use `add_messages` and [`MessagesAdded`].
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct HistoryUpdated {
    pub moment_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TextGenerated {
    pub moment_id: String,
    pub text: String,
}

/// The function the agent chose, with its arguments.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct FunctionCall {
    pub id: String,
    pub name: String,
    pub args: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct FunctionCallGenerated {
    pub moment_id: String,
    pub function_call: FunctionCall,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct JsonGenerated {
    pub moment_id: String,
    /// Generated value; conforms to the schema sent with the request.
    pub json: Value,
}

/// Like `Option::deserialize`, but the field is required.
///
/// serde fills absent `Option` fields with `None` unless a custom
/// deserializer is attached, so attaching this one makes absence an error.
fn nullable<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer)
}

/// Accepts `1680318000` as well as `"1680318000"`.
fn integer_or_numeric_string<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum IntOrString {
        Int(i64),
        Str(String),
    }

    match IntOrString::deserialize(deserializer)? {
        IntOrString::Int(v) => Ok(v),
        IntOrString::Str(s) => s
            .trim()
            .parse::<i64>()
            .map_err(|_| serde::de::Error::custom(format!("invalid integer string: {s:?}"))),
    }
}
