//! Bound query parameters

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use strum::{AsRefStr, Display};

/// Declared warehouse type of a bound parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, AsRefStr)]
#[strum(serialize_all = "UPPERCASE")]
pub enum ParamType {
    String,
    Int64,
    Float64,
    Date,
}

/// One named parameter: `@name` in the query text binds to `value`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryParam {
    pub name: String,
    pub param_type: ParamType,
    pub value: Value,
}

impl QueryParam {
    pub fn new(name: impl Into<String>, param_type: ParamType, value: impl Into<Value>) -> Self {
        Self {
            name: name.into(),
            param_type,
            value: value.into(),
        }
    }

    /// STRING parameter; every user-supplied value in the catalog is bound this way.
    pub fn string(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self::new(name, ParamType::String, Value::String(value.into()))
    }

    /// Value as the warehouse expects it on the wire (a plain string, or none for NULL).
    pub fn wire_value(&self) -> Option<String> {
        match &self.value {
            Value::Null => None,
            Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }
}

impl fmt::Display for QueryParam {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "@{} {} = {}", self.name, self.param_type, self.value)
    }
}
