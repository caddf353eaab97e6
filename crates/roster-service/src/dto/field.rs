//! Loosely typed request fields.
//!
//! A request body is parsed into [`Field`] values rather than typed options,
//! so a value of the wrong JSON type is reported against its own field and a
//! key sent as `null` is told apart from a key that was left out.

use roster_core::{messages, FieldErrors};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

/// One request field: left out of the body, or present with any JSON value.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Field {
    #[default]
    Absent,
    Present(Value),
}

impl Field {
    /// Returns true if the key was not in the body.
    #[must_use]
    pub fn is_absent(&self) -> bool {
        matches!(self, Self::Absent)
    }

    /// Borrows the value if it is a JSON string.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Present(Value::String(s)) => Some(s),
            _ => None,
        }
    }

    /// Reads a string field.
    ///
    /// `null` counts as a missing required value. Any other non-string is a
    /// type error. Both are recorded in `errors` and yield `None`.
    pub fn into_string(self, name: &str, errors: &mut FieldErrors) -> Option<String> {
        match self {
            Self::Absent => None,
            Self::Present(Value::String(s)) => Some(s),
            Self::Present(Value::Null) => {
                errors.add(name, messages::required(name));
                None
            }
            Self::Present(_) => {
                errors.add(name, messages::string(name));
                None
            }
        }
    }

    /// Reads a boolean field. Accepts `true`, `false`, `1`, `0`, `"1"` and `"0"`.
    pub fn into_bool(self, name: &str, errors: &mut FieldErrors) -> Option<bool> {
        let parsed = match &self {
            Self::Absent => return None,
            Self::Present(Value::Bool(b)) => Some(*b),
            Self::Present(Value::Number(n)) => match n.as_u64() {
                Some(1) => Some(true),
                Some(0) => Some(false),
                _ => None,
            },
            Self::Present(Value::String(s)) => match s.as_str() {
                "1" => Some(true),
                "0" => Some(false),
                _ => None,
            },
            Self::Present(_) => None,
        };
        if parsed.is_none() {
            errors.add(name, messages::boolean(name));
        }
        parsed
    }
}

impl<'de> Deserialize<'de> for Field {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Value::deserialize(deserializer).map(Self::Present)
    }
}

impl Serialize for Field {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Absent => serializer.serialize_none(),
            Self::Present(value) => value.serialize(serializer),
        }
    }
}

impl From<Value> for Field {
    fn from(value: Value) -> Self {
        Self::Present(value)
    }
}

impl From<&str> for Field {
    fn from(value: &str) -> Self {
        Self::Present(Value::String(value.to_string()))
    }
}

impl From<String> for Field {
    fn from(value: String) -> Self {
        Self::Present(Value::String(value))
    }
}

impl From<bool> for Field {
    fn from(value: bool) -> Self {
        Self::Present(Value::Bool(value))
    }
}
