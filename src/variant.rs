//! Discriminated union registry
//!
//! Polymorphic payloads (component configurations, game messages, function
//! parameters) are families of shapes that share a discriminant field whose
//! literal value names the concrete variant, e.g. `{"type": "limited_list", ...}`.
//!
//! Each family is an internally tagged serde enum, so the discriminant is
//! written from the enum variant itself and can never be left unset. Variant
//! structs implement [`Variant`] and only reach the wire through their family
//! (`From<Variant> for Family`). Deserialization dispatches on the tag alone
//! and rejects anything outside [`Family::TAGS`].

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A polymorphic family with a closed set of discriminant values.
pub trait Family: Serialize {
    /// Wire name of the discriminant field.
    const TAG_FIELD: &'static str;

    /// Every discriminant value the family accepts.
    const TAGS: &'static [&'static str];

    /// Discriminant of this instance.
    fn discriminant(&self) -> &'static str;
}

/// A concrete member of a [`Family`].
pub trait Variant: Sized {
    type Family: Family + From<Self>;

    /// Literal discriminant value for this variant.
    const TAG: &'static str;

    /// Wrap the variant in its family so it serializes with its discriminant.
    fn into_family(self) -> Self::Family {
        Self::Family::from(self)
    }
}

/// Returns `true` if `tag` names a member of family `F`.
pub fn is_known_tag<F: Family>(tag: &str) -> bool {
    F::TAGS.contains(&tag)
}

/// Reads the discriminant out of a raw JSON object, if it names a member of `F`.
pub fn discriminant_of<F: Family>(value: &Value) -> Option<&str> {
    value
        .get(F::TAG_FIELD)
        .and_then(Value::as_str)
        .filter(|tag| is_known_tag::<F>(tag))
}

/// A list entry that is either a typed shape or a caller-supplied JSON object.
///
/// Raw entries are passed through untouched; they exist for configuration
/// the typed model does not cover yet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ConfigEntry<T> {
    Typed(T),
    Raw(Map<String, Value>),
}

impl<T> ConfigEntry<T> {
    pub fn as_typed(&self) -> Option<&T> {
        match self {
            ConfigEntry::Typed(t) => Some(t),
            ConfigEntry::Raw(_) => None,
        }
    }
}

impl<T> From<Map<String, Value>> for ConfigEntry<T> {
    fn from(raw: Map<String, Value>) -> Self {
        ConfigEntry::Raw(raw)
    }
}
