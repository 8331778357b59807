//! Inbound webhook payloads.

use std::collections::BTreeMap;

use serde_json::{Number, Value};

use crate::error::RelayError;
use crate::schema::ColumnType;

/// Payload key routed to the title column instead of a column of its own.
pub const CALLER_NAME_KEY: &str = "callerName";

/// A single payload value, tagged by its runtime JSON type.
#[derive(Debug, Clone, PartialEq)]
pub enum PayloadValue {
    Text(String),
    Number(Number),
    Bool(bool),
    Null,
    /// Arrays and objects. Carried through as text.
    Nested(Value),
}

impl PayloadValue {
    /// Column type to create for a key that the database doesn't have yet.
    pub fn infer_column_type(&self) -> ColumnType {
        match self {
            Self::Number(_) => ColumnType::Number,
            Self::Bool(_) => ColumnType::Boolean,
            Self::Text(s) if has_date_prefix(s) => ColumnType::Date,
            Self::Text(_) | Self::Null | Self::Nested(_) => ColumnType::Text,
        }
    }

    /// JavaScript-style truthiness: `""`, `0`, `false` and `null` are false.
    pub fn is_truthy(&self) -> bool {
        match self {
            Self::Text(s) => !s.is_empty(),
            Self::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
            Self::Bool(b) => *b,
            Self::Null => false,
            Self::Nested(_) => true,
        }
    }

    /// Display form used for text columns and titles.
    pub fn to_text(&self) -> String {
        match self {
            Self::Text(s) => s.clone(),
            Self::Number(n) => n.to_string(),
            Self::Bool(b) => b.to_string(),
            Self::Null => "null".to_string(),
            Self::Nested(v) => v.to_string(),
        }
    }
}

impl From<Value> for PayloadValue {
    fn from(value: Value) -> Self {
        match value {
            Value::String(s) => Self::Text(s),
            Value::Number(n) => Self::Number(n),
            Value::Bool(b) => Self::Bool(b),
            Value::Null => Self::Null,
            nested @ (Value::Array(_) | Value::Object(_)) => Self::Nested(nested),
        }
    }
}

/// Whether `s` starts with a `YYYY-MM-DD` date.
pub fn has_date_prefix(s: &str) -> bool {
    let b = s.as_bytes();
    b.len() >= 10
        && b[..4].iter().all(u8::is_ascii_digit)
        && b[4] == b'-'
        && b[5..7].iter().all(u8::is_ascii_digit)
        && b[7] == b'-'
        && b[8..10].iter().all(u8::is_ascii_digit)
}

/// Field name → value for one inbound request.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Payload {
    fields: BTreeMap<String, PayloadValue>,
}

impl Payload {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a request body. The body must be a JSON object.
    pub fn from_slice(body: &[u8]) -> Result<Self, RelayError> {
        let value: Value = serde_json::from_slice(body)
            .map_err(|e| RelayError::MalformedRequest(e.to_string()))?;
        Self::from_json(value)
    }

    pub fn from_json(value: Value) -> Result<Self, RelayError> {
        match value {
            Value::Object(map) => Ok(map.into_iter().map(|(k, v)| (k, v.into())).collect()),
            _ => Err(RelayError::MalformedRequest(
                "expected a JSON object".to_string(),
            )),
        }
    }

    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        let value: Value = value.into();
        self.fields.insert(key.into(), PayloadValue::from(value));
        self
    }

    pub fn get(&self, key: &str) -> Option<&PayloadValue> {
        self.fields.get(key)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Every field except [`CALLER_NAME_KEY`].
    pub fn column_fields(&self) -> impl Iterator<Item = (&str, &PayloadValue)> {
        self.fields
            .iter()
            .filter(|(k, _)| k.as_str() != CALLER_NAME_KEY)
            .map(|(k, v)| (k.as_str(), v))
    }

    /// The caller name, when present and truthy.
    pub fn caller_name(&self) -> Option<String> {
        self.get(CALLER_NAME_KEY)
            .filter(|v| v.is_truthy())
            .map(PayloadValue::to_text)
    }
}

impl FromIterator<(String, PayloadValue)> for Payload {
    fn from_iter<I: IntoIterator<Item = (String, PayloadValue)>>(iter: I) -> Self {
        Self {
            fields: iter.into_iter().collect(),
        }
    }
}
