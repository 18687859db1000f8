//! Agent configuration, game messages and function descriptions
//!
//! These are the nested shapes carried inside request bodies. The polymorphic
//! ones ([`ComponentConfig`], [`GameMessage`], [`FunctionParameter`]) are
//! [`Family`] enums; build them from their variant structs.

use crate::given::Given;
use crate::variant::{ConfigEntry, Family, Variant};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

// ============================================================================
// AGENT CONFIGURATION
// ============================================================================

/// Describes the agent's role.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoleConfig {
    pub core: String,
    #[serde(default, skip_serializing_if = "Given::is_not_given")]
    pub characterization: Given<String>,
}

impl RoleConfig {
    pub fn new(core: impl Into<String>) -> Self {
        Self {
            core: core.into(),
            characterization: Given::NotGiven,
        }
    }

    pub fn characterization(mut self, characterization: impl Into<String>) -> Self {
        self.characterization = Given::Value(characterization.into());
        self
    }
}

/// One `(component id, component field)` pair in the presentation order.
///
/// Serialized as a two-element array, e.g. `["history", "items"]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PresentationOrderItem(pub String, pub String);

impl PresentationOrderItem {
    pub fn new(component_id: impl Into<String>, field: impl Into<String>) -> Self {
        Self(component_id.into(), field.into())
    }
}

/// Controls which component data is shown to the agent, and in what order.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PresentationConfig {
    pub presentation_order: Vec<PresentationOrderItem>,
}

impl PresentationConfig {
    pub fn new(presentation_order: Vec<PresentationOrderItem>) -> Self {
        Self { presentation_order }
    }

    pub fn item(mut self, component_id: impl Into<String>, field: impl Into<String>) -> Self {
        self.presentation_order
            .push(PresentationOrderItem::new(component_id, field));
        self
    }
}

/// Display data used when the agent is shown in the dashboard.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct UIConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub friendly_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub emoji: Option<String>,
    #[serde(default)]
    pub metadata: BTreeMap<String, String>,
}

impl UIConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn friendly_name(mut self, name: impl Into<String>) -> Self {
        self.friendly_name = Some(name.into());
        self
    }

    pub fn emoji(mut self, emoji: impl Into<String>) -> Self {
        self.emoji = Some(emoji.into());
        self
    }

    pub fn metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }
}

/// Binds a local service id (referenced by `agent_llm` and `service_id`) to a
/// named backend service such as `"agency/torque-prime"`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceConfig {
    pub id: String,
    pub service_name: String,
    /// Service-specific settings, written alongside `id` and `service_name`.
    #[serde(flatten)]
    pub settings: Map<String, Value>,
}

impl ServiceConfig {
    pub fn new(id: impl Into<String>, service_name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            service_name: service_name.into(),
            settings: Map::new(),
        }
    }

    /// Add a setting. `id` and `service_name` are ignored here.
    pub fn setting(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        insert_setting(
            &mut self.settings,
            SERVICE_RESERVED_KEYS,
            "ServiceConfig",
            key.into(),
            value.into(),
        );
        self
    }
}

impl From<ServiceConfig> for ConfigEntry<ServiceConfig> {
    fn from(config: ServiceConfig) -> Self {
        ConfigEntry::Typed(config)
    }
}

// ============================================================================
// COMPONENT CONFIGURATION FAMILY
// ============================================================================

/// Agent memory components, discriminated by `type`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ComponentConfig {
    #[serde(rename = "function_hinter")]
    FunctionHinter(FunctionHinterConfig),
    #[serde(rename = "kv_store")]
    KvStore(KVStoreConfig),
    #[serde(rename = "limited_list")]
    LimitedList(LimitedListConfig),
    #[serde(rename = "puppeteer_kv_store")]
    PuppeteerKvStore(PuppeteerKVStoreConfig),
    #[serde(rename = "puppeteer_limited_list")]
    PuppeteerLimitedList(PuppeteerLimitedListConfig),
    #[serde(rename = "static_text")]
    StaticText(StaticTextConfig),
    #[serde(rename = "text_block")]
    TextBlock(TextBlockConfig),
}

impl ComponentConfig {
    /// The component's id, whatever its variant.
    pub fn id(&self) -> &str {
        match self {
            ComponentConfig::FunctionHinter(c) => &c.id,
            ComponentConfig::KvStore(c) => &c.id,
            ComponentConfig::LimitedList(c) => &c.id,
            ComponentConfig::PuppeteerKvStore(c) => &c.id,
            ComponentConfig::PuppeteerLimitedList(c) => &c.id,
            ComponentConfig::StaticText(c) => &c.id,
            ComponentConfig::TextBlock(c) => &c.id,
        }
    }
}

impl Family for ComponentConfig {
    const TAG_FIELD: &'static str = "type";
    const TAGS: &'static [&'static str] = &[
        FunctionHinterConfig::TAG,
        KVStoreConfig::TAG,
        LimitedListConfig::TAG,
        PuppeteerKVStoreConfig::TAG,
        PuppeteerLimitedListConfig::TAG,
        StaticTextConfig::TAG,
        TextBlockConfig::TAG,
    ];

    fn discriminant(&self) -> &'static str {
        match self {
            ComponentConfig::FunctionHinter(_) => FunctionHinterConfig::TAG,
            ComponentConfig::KvStore(_) => KVStoreConfig::TAG,
            ComponentConfig::LimitedList(_) => LimitedListConfig::TAG,
            ComponentConfig::PuppeteerKvStore(_) => PuppeteerKVStoreConfig::TAG,
            ComponentConfig::PuppeteerLimitedList(_) => PuppeteerLimitedListConfig::TAG,
            ComponentConfig::StaticText(_) => StaticTextConfig::TAG,
            ComponentConfig::TextBlock(_) => TextBlockConfig::TAG,
        }
    }
}

/// Registers a component variant: its family conversion and its tag.
macro_rules! component_variant {
    ($name:ident, $variant:ident, $tag:literal) => {
        impl Variant for $name {
            type Family = ComponentConfig;
            const TAG: &'static str = $tag;
        }

        impl From<$name> for ComponentConfig {
            fn from(config: $name) -> Self {
                ComponentConfig::$variant(config)
            }
        }

        impl From<$name> for ConfigEntry<ComponentConfig> {
            fn from(config: $name) -> Self {
                ConfigEntry::Typed(config.into())
            }
        }
    };
}

/// Declares a component whose only required field is its `id`; any further
/// settings are written next to it.
macro_rules! settings_component {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
        pub struct $name {
            pub id: String,
            #[serde(flatten)]
            pub settings: Map<String, Value>,
        }

        impl $name {
            pub fn new(id: impl Into<String>) -> Self {
                Self {
                    id: id.into(),
                    settings: Map::new(),
                }
            }

            /// Add a setting. `type` and `id` are owned by the component and
            /// are ignored here.
            pub fn setting(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
                insert_setting(
                    &mut self.settings,
                    COMPONENT_RESERVED_KEYS,
                    stringify!($name),
                    key.into(),
                    value.into(),
                );
                self
            }
        }
    };
}

const COMPONENT_RESERVED_KEYS: &[&str] = &["type", "id"];
const SERVICE_RESERVED_KEYS: &[&str] = &["id", "service_name"];

/// Flattened settings are written after the fixed fields, so a reserved key
/// here would override them on the wire.
fn insert_setting(
    settings: &mut Map<String, Value>,
    reserved: &[&str],
    owner: &str,
    key: String,
    value: Value,
) {
    if reserved.contains(&key.as_str()) {
        log::warn!("{owner}: ignoring setting {key:?}, it is a reserved field");
        return;
    }
    settings.insert(key, value);
}

settings_component!(
    /// Surfaces hints about the functions the agent can call.
    FunctionHinterConfig
);
settings_component!(
    /// Key/value memory written by `KVMessage` and `KVDelTreeMessage`.
    KVStoreConfig
);
settings_component!(
    /// Bounded list of recent messages; `"items"` is its presentable field.
    LimitedListConfig
);
settings_component!(
    /// Key/value memory controlled directly by the game.
    PuppeteerKVStoreConfig
);
settings_component!(
    /// Bounded list controlled directly by the game via `PuppeteerMessage`.
    PuppeteerLimitedListConfig
);
settings_component!(
    /// Free-form text block the agent can read.
    TextBlockConfig
);

/// Fixed text presented to the agent verbatim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StaticTextConfig {
    pub id: String,
    pub text: String,
}

impl StaticTextConfig {
    pub fn new(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
        }
    }
}

component_variant!(FunctionHinterConfig, FunctionHinter, "function_hinter");
component_variant!(KVStoreConfig, KvStore, "kv_store");
component_variant!(LimitedListConfig, LimitedList, "limited_list");
component_variant!(PuppeteerKVStoreConfig, PuppeteerKvStore, "puppeteer_kv_store");
component_variant!(
    PuppeteerLimitedListConfig,
    PuppeteerLimitedList,
    "puppeteer_limited_list"
);
component_variant!(StaticTextConfig, StaticText, "static_text");
component_variant!(TextBlockConfig, TextBlock, "text_block");

// ============================================================================
// GAME MESSAGE FAMILY
// ============================================================================

/// Messages ingested into an agent's state, discriminated by `message_type`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "message_type")]
pub enum GameMessage {
    #[serde(rename = "ContentMessage")]
    Content(ContentMessage),
    #[serde(rename = "KVMessage")]
    KeyValue(KVMessage),
    #[serde(rename = "KVDelTreeMessage")]
    KeyValueDeleteTree(KVDelTreeMessage),
    #[serde(rename = "PuppeteerMessage")]
    Puppeteer(PuppeteerMessage),
}

impl GameMessage {
    /// Shorthand for a plain text [`ContentMessage`].
    pub fn content(content: impl Into<String>) -> Self {
        ContentMessage::new(content).into()
    }
}

impl Family for GameMessage {
    const TAG_FIELD: &'static str = "message_type";
    const TAGS: &'static [&'static str] = &[
        ContentMessage::TAG,
        KVMessage::TAG,
        KVDelTreeMessage::TAG,
        PuppeteerMessage::TAG,
    ];

    fn discriminant(&self) -> &'static str {
        match self {
            GameMessage::Content(_) => ContentMessage::TAG,
            GameMessage::KeyValue(_) => KVMessage::TAG,
            GameMessage::KeyValueDeleteTree(_) => KVDelTreeMessage::TAG,
            GameMessage::Puppeteer(_) => PuppeteerMessage::TAG,
        }
    }
}

/// Free text delivered to the agent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentMessage {
    pub content: String,
}

impl ContentMessage {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
        }
    }
}

/// Sets `key` in a key/value component.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KVMessage {
    pub component_id: String,
    pub key: String,
    pub value: Value,
}

impl KVMessage {
    pub fn new(
        component_id: impl Into<String>,
        key: impl Into<String>,
        value: impl Into<Value>,
    ) -> Self {
        Self {
            component_id: component_id.into(),
            key: key.into(),
            value: value.into(),
        }
    }
}

/// Removes `key` and everything beneath it from a key/value component.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KVDelTreeMessage {
    pub component_id: String,
    pub key: String,
}

impl KVDelTreeMessage {
    pub fn new(component_id: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            component_id: component_id.into(),
            key: key.into(),
        }
    }
}

/// Content written straight into a puppeteer component.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PuppeteerMessage {
    pub component_id: String,
    pub content: Value,
}

impl PuppeteerMessage {
    pub fn new(component_id: impl Into<String>, content: impl Into<Value>) -> Self {
        Self {
            component_id: component_id.into(),
            content: content.into(),
        }
    }
}

macro_rules! message_variant {
    ($name:ident, $variant:ident, $tag:literal) => {
        impl Variant for $name {
            type Family = GameMessage;
            const TAG: &'static str = $tag;
        }

        impl From<$name> for GameMessage {
            fn from(message: $name) -> Self {
                GameMessage::$variant(message)
            }
        }
    };
}

message_variant!(ContentMessage, Content, "ContentMessage");
message_variant!(KVMessage, KeyValue, "KVMessage");
message_variant!(KVDelTreeMessage, KeyValueDeleteTree, "KVDelTreeMessage");
message_variant!(PuppeteerMessage, Puppeteer, "PuppeteerMessage");

// ============================================================================
// FUNCTION DESCRIPTIONS
// ============================================================================

/// A function the agent may choose in `generate_function_call`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionDescription {
    pub name: String,
    pub docs: String,
    pub parameters: BTreeMap<String, FunctionParameter>,
    pub required: Vec<String>,
}

impl FunctionDescription {
    pub fn new(name: impl Into<String>, docs: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            docs: docs.into(),
            parameters: BTreeMap::new(),
            required: Vec::new(),
        }
    }

    /// Add an optional parameter.
    pub fn parameter(
        mut self,
        name: impl Into<String>,
        parameter: impl Into<FunctionParameter>,
    ) -> Self {
        self.parameters.insert(name.into(), parameter.into());
        self
    }

    /// Add a parameter and list it in `required`.
    pub fn required_parameter(
        mut self,
        name: impl Into<String>,
        parameter: impl Into<FunctionParameter>,
    ) -> Self {
        let name = name.into();
        if !self.required.contains(&name) {
            self.required.push(name.clone());
        }
        self.parameters.insert(name, parameter.into());
        self
    }
}

/// Function parameter shapes, discriminated by `type`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum FunctionParameter {
    #[serde(rename = "simple")]
    Simple(SimpleParameter),
    #[serde(rename = "array")]
    Array(ArrayParameter),
    #[serde(rename = "object")]
    Object(ObjectParameter),
}

impl Family for FunctionParameter {
    const TAG_FIELD: &'static str = "type";
    const TAGS: &'static [&'static str] =
        &[SimpleParameter::TAG, ArrayParameter::TAG, ObjectParameter::TAG];

    fn discriminant(&self) -> &'static str {
        match self {
            FunctionParameter::Simple(_) => SimpleParameter::TAG,
            FunctionParameter::Array(_) => ArrayParameter::TAG,
            FunctionParameter::Object(_) => ObjectParameter::TAG,
        }
    }
}

/// A scalar parameter (`"string"`, `"integer"`, `"number"`, `"boolean"`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimpleParameter {
    pub value_type: String,
    pub docs: String,
    /// Closed set of accepted values.
    #[serde(default, skip_serializing_if = "Given::is_not_given")]
    pub enumeration: Given<Vec<String>>,
}

impl SimpleParameter {
    pub fn new(value_type: impl Into<String>, docs: impl Into<String>) -> Self {
        Self {
            value_type: value_type.into(),
            docs: docs.into(),
            enumeration: Given::NotGiven,
        }
    }

    pub fn enumeration<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.enumeration = Given::Value(values.into_iter().map(Into::into).collect());
        self
    }
}

/// A list parameter whose elements all match `items`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArrayParameter {
    pub items: Box<FunctionParameter>,
    pub docs: String,
}

impl ArrayParameter {
    pub fn new(items: impl Into<FunctionParameter>, docs: impl Into<String>) -> Self {
        Self {
            items: Box::new(items.into()),
            docs: docs.into(),
        }
    }
}

/// A nested object parameter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectParameter {
    pub properties: BTreeMap<String, FunctionParameter>,
    pub required: Vec<String>,
    pub docs: String,
}

impl ObjectParameter {
    pub fn new(docs: impl Into<String>) -> Self {
        Self {
            properties: BTreeMap::new(),
            required: Vec::new(),
            docs: docs.into(),
        }
    }

    pub fn property(mut self, name: impl Into<String>, parameter: impl Into<FunctionParameter>) -> Self {
        self.properties.insert(name.into(), parameter.into());
        self
    }

    pub fn required_property(
        mut self,
        name: impl Into<String>,
        parameter: impl Into<FunctionParameter>,
    ) -> Self {
        let name = name.into();
        if !self.required.contains(&name) {
            self.required.push(name.clone());
        }
        self.properties.insert(name, parameter.into());
        self
    }
}

macro_rules! parameter_variant {
    ($name:ident, $variant:ident, $tag:literal) => {
        impl Variant for $name {
            type Family = FunctionParameter;
            const TAG: &'static str = $tag;
        }

        impl From<$name> for FunctionParameter {
            fn from(parameter: $name) -> Self {
                FunctionParameter::$variant(parameter)
            }
        }
    };
}

parameter_variant!(SimpleParameter, Simple, "simple");
parameter_variant!(ArrayParameter, Array, "array");
parameter_variant!(ObjectParameter, Object, "object");
