//! Request bodies
//!
//! Every request is a plain struct with public fields plus a few builder
//! setters. Fields typed [`Given`] are dropped from the body while they are
//! `NotGiven`; setters for nullable fields take an `Option`, where `None`
//! sends an explicit `null`.
//!
//! ```rust
//! use artificial_agency::CreateSessionRequest;
//! use serde_json::json;
//!
//! let request = CreateSessionRequest::new("proj_1234")
//!     .metadata([("client", "testing")])
//!     .max_requests(None);
//!
//! assert_eq!(
//!     serde_json::to_value(&request).unwrap(),
//!     json!({"project_id": "proj_1234", "metadata": {"client": "testing"}, "max_requests": null})
//! );
//! ```

use crate::given::Given;
use crate::types::{
    ComponentConfig, FunctionDescription, GameMessage, PresentationConfig, RoleConfig,
    ServiceConfig, UIConfig,
};
use crate::variant::ConfigEntry;
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;

/// Body of `POST /v1/sessions`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CreateSessionRequest {
    pub project_id: String,
    #[serde(skip_serializing_if = "Given::is_not_given")]
    pub metadata: Given<BTreeMap<String, String>>,
    /// Seconds the session stays active; `Null` means no time limit.
    #[serde(skip_serializing_if = "Given::is_not_given")]
    pub expires_in: Given<u64>,
    /// Requests the session accepts; `Null` means no request limit.
    #[serde(skip_serializing_if = "Given::is_not_given")]
    pub max_requests: Given<u64>,
}

impl CreateSessionRequest {
    pub fn new(project_id: impl Into<String>) -> Self {
        Self {
            project_id: project_id.into(),
            ..Default::default()
        }
    }

    pub fn metadata<I, K, V>(mut self, metadata: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.metadata = Given::Value(collect_metadata(metadata));
        self
    }

    pub fn expires_in(mut self, seconds: Option<u64>) -> Self {
        self.expires_in = Given::from_option(seconds);
        self
    }

    pub fn max_requests(mut self, requests: Option<u64>) -> Self {
        self.max_requests = Given::from_option(requests);
        self
    }
}

/// Body of `POST /v1/sessions/{session}/clone`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CloneSessionRequest {
    /// Moment to clone from; `Null` clones the most recent state.
    #[serde(skip_serializing_if = "Given::is_not_given")]
    pub moment_id: Given<String>,
    /// Per-agent origin moments, keyed by agent id.
    #[serde(skip_serializing_if = "Given::is_not_given")]
    pub origin_moments: Given<BTreeMap<String, i64>>,
    /// Project to attribute the clone to; `Null` keeps the original project.
    #[serde(skip_serializing_if = "Given::is_not_given")]
    pub project_id: Given<String>,
    #[serde(skip_serializing_if = "Given::is_not_given")]
    pub metadata: Given<BTreeMap<String, String>>,
    #[serde(skip_serializing_if = "Given::is_not_given")]
    pub expires_in: Given<u64>,
    #[serde(skip_serializing_if = "Given::is_not_given")]
    pub max_requests: Given<u64>,
}

impl CloneSessionRequest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn moment_id(mut self, moment_id: Option<String>) -> Self {
        self.moment_id = Given::from_option(moment_id);
        self
    }

    pub fn origin_moments<I, K>(mut self, origin_moments: Option<I>) -> Self
    where
        I: IntoIterator<Item = (K, i64)>,
        K: Into<String>,
    {
        self.origin_moments = Given::from_option(
            origin_moments.map(|m| m.into_iter().map(|(k, v)| (k.into(), v)).collect()),
        );
        self
    }

    pub fn project_id(mut self, project_id: Option<String>) -> Self {
        self.project_id = Given::from_option(project_id);
        self
    }

    pub fn metadata<I, K, V>(mut self, metadata: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.metadata = Given::Value(collect_metadata(metadata));
        self
    }

    pub fn expires_in(mut self, seconds: Option<u64>) -> Self {
        self.expires_in = Given::from_option(seconds);
        self
    }

    pub fn max_requests(mut self, requests: Option<u64>) -> Self {
        self.max_requests = Given::from_option(requests);
        self
    }
}

/// Body of `POST /v1/advanced/sessions/{session}/agents`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CreateAgentRequest {
    #[serde(skip_serializing_if = "Given::is_not_given")]
    pub ui_config: Given<UIConfig>,
    pub role_config: RoleConfig,
    pub presentation_config: PresentationConfig,
    pub component_configs: Vec<ConfigEntry<ComponentConfig>>,
    pub service_configs: Vec<ConfigEntry<ServiceConfig>>,
    /// Id of the entry in `service_configs` used for generation.
    pub agent_llm: String,
}

impl CreateAgentRequest {
    pub fn new(
        role_config: RoleConfig,
        presentation_config: PresentationConfig,
        agent_llm: impl Into<String>,
    ) -> Self {
        Self {
            ui_config: Given::NotGiven,
            role_config,
            presentation_config,
            component_configs: Vec::new(),
            service_configs: Vec::new(),
            agent_llm: agent_llm.into(),
        }
    }

    pub fn ui_config(mut self, ui_config: UIConfig) -> Self {
        self.ui_config = Given::Value(ui_config);
        self
    }

    /// Add a component; accepts any component variant or a raw JSON object.
    pub fn component(mut self, component: impl Into<ConfigEntry<ComponentConfig>>) -> Self {
        self.component_configs.push(component.into());
        self
    }

    /// Add a service; accepts a [`ServiceConfig`] or a raw JSON object.
    pub fn service(mut self, service: impl Into<ConfigEntry<ServiceConfig>>) -> Self {
        self.service_configs.push(service.into());
        self
    }
}

/// Body of `POST /v1/sessions/{session}/agents/{agent}/messages`.
///
/// Shared by `add_messages` and the deprecated `update_history`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AddMessagesRequest {
    pub messages: Vec<GameMessage>,
}

impl AddMessagesRequest {
    pub fn new<I, M>(messages: I) -> Self
    where
        I: IntoIterator<Item = M>,
        M: Into<GameMessage>,
    {
        Self {
            messages: messages.into_iter().map(Into::into).collect(),
        }
    }
}

/// Fields common to the three generation requests.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GenerationOptions {
    /// Messages ingested immediately before generating.
    #[serde(skip_serializing_if = "Given::is_not_given")]
    pub messages: Given<Vec<GameMessage>>,
    #[serde(skip_serializing_if = "Given::is_not_given")]
    pub cue: Given<String>,
    /// Overrides `agent_llm` for this call.
    #[serde(skip_serializing_if = "Given::is_not_given")]
    pub service_id: Given<String>,
    /// Overrides the agent's presentation config for this call.
    #[serde(skip_serializing_if = "Given::is_not_given")]
    pub presentation_config: Given<PresentationConfig>,
}

/// Implements the [`GenerationOptions`] setters on a request with an
/// `options` field.
macro_rules! generation_setters {
    ($request:ty) => {
        impl $request {
            pub fn messages<I, M>(mut self, messages: I) -> Self
            where
                I: IntoIterator<Item = M>,
                M: Into<GameMessage>,
            {
                self.options.messages = Given::Value(messages.into_iter().map(Into::into).collect());
                self
            }

            pub fn cue(mut self, cue: Option<String>) -> Self {
                self.options.cue = Given::from_option(cue);
                self
            }

            pub fn service_id(mut self, service_id: Option<String>) -> Self {
                self.options.service_id = Given::from_option(service_id);
                self
            }

            pub fn presentation_config(mut self, presentation_config: PresentationConfig) -> Self {
                self.options.presentation_config = Given::Value(presentation_config);
                self
            }
        }
    };
}

/// Body of `.../generate_text`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GenerateTextRequest {
    #[serde(flatten)]
    pub options: GenerationOptions,
}

impl GenerateTextRequest {
    pub fn new() -> Self {
        Self::default()
    }
}

generation_setters!(GenerateTextRequest);

/// Body of `.../generate_function_call`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenerateFunctionCallRequest {
    pub functions: Vec<FunctionDescription>,
    #[serde(flatten)]
    pub options: GenerationOptions,
}

impl GenerateFunctionCallRequest {
    pub fn new(functions: Vec<FunctionDescription>) -> Self {
        Self {
            functions,
            options: GenerationOptions::default(),
        }
    }
}

generation_setters!(GenerateFunctionCallRequest);

/// Body of `.../generate_json`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenerateJsonRequest {
    /// JSON Schema the generated value must satisfy. Sent as `schema`.
    #[serde(rename = "schema")]
    pub json_schema: Value,
    #[serde(flatten)]
    pub options: GenerationOptions,
}

impl GenerateJsonRequest {
    pub fn new(json_schema: Value) -> Self {
        Self {
            json_schema,
            options: GenerationOptions::default(),
        }
    }
}

generation_setters!(GenerateJsonRequest);

fn collect_metadata<I, K, V>(metadata: I) -> BTreeMap<String, String>
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<String>,
{
    metadata
        .into_iter()
        .map(|(k, v)| (k.into(), v.into()))
        .collect()
}
