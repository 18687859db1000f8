//! Tri-state request fields
//!
//! Several request fields have three meaningful states on the wire:
//!
//! - the caller did not mention the field at all (the key is omitted and the
//!   server applies its own default),
//! - the caller explicitly asked for "nothing" (the key is sent as `null`, e.g.
//!   "this session never expires"),
//! - the caller supplied a value.
//!
//! `Option<T>` can only express two of these, so request shapes use [`Given<T>`]
//! instead. Every `Given` field on a request is annotated with
//! `#[serde(skip_serializing_if = "Given::is_not_given")]`, which is
//! what removes `NotGiven` keys from the serialized body.
//!
//! ```rust
//! use artificial_agency::Given;
//!
//! let unset: Given<u64> = Given::default();
//! assert!(unset.is_not_given());
//!
//! let no_limit: Given<u64> = Given::from_option(None);
//! assert!(no_limit.is_null());
//!
//! let sixty: Given<u64> = 60.into();
//! assert_eq!(sixty.as_value(), Some(&60));
//! ```

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A request field that is either omitted, explicitly null, or set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Given<T> {
    /// Omitted from the serialized payload.
    NotGiven,
    /// Serialized as JSON `null`.
    Null,
    /// Serialized as the wrapped value.
    Value(T),
}

impl<T> Given<T> {
    /// `None` becomes an explicit [`Given::Null`], `Some(v)` becomes [`Given::Value`].
    pub fn from_option(value: Option<T>) -> Self {
        match value {
            Some(v) => Given::Value(v),
            None => Given::Null,
        }
    }

    pub fn is_not_given(&self) -> bool {
        matches!(self, Given::NotGiven)
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Given::Null)
    }

    pub fn is_value(&self) -> bool {
        matches!(self, Given::Value(_))
    }

    /// Borrow the value, if one was set.
    pub fn as_value(&self) -> Option<&T> {
        match self {
            Given::Value(v) => Some(v),
            _ => None,
        }
    }

    /// Map the contained value, leaving `NotGiven` and `Null` untouched.
    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> Given<U> {
        match self {
            Given::NotGiven => Given::NotGiven,
            Given::Null => Given::Null,
            Given::Value(v) => Given::Value(f(v)),
        }
    }
}

impl<T> Default for Given<T> {
    fn default() -> Self {
        Given::NotGiven
    }
}

impl<T> From<T> for Given<T> {
    fn from(value: T) -> Self {
        Given::Value(value)
    }
}

impl<T: Serialize> Serialize for Given<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Given::Value(v) => v.serialize(serializer),
            Given::Null => serializer.serialize_none(),
            // A field reaching this point is missing its skip attribute.
            Given::NotGiven => Err(serde::ser::Error::custom(
                "NotGiven field was not skipped during serialization",
            )),
        }
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for Given<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        // Missing keys never reach here; `#[serde(default)]` yields NotGiven.
        Option::<T>::deserialize(deserializer).map(Given::from_option)
    }
}
