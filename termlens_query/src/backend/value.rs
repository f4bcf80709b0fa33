use std::fmt;
use std::fmt::Display;

use serde::{Deserialize, Serialize};

/// Right-hand side of a WHERE condition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Hash)]
pub enum SqlValue {
    /// Fixed literal owned by the template, never user input
    Literal(i64),
    /// Named placeholder, rendered as `@name`
    Param(String),
    /// Placeholder pair for BETWEEN, rendered as `@low AND @high`
    Between(String, String),
}

impl Display for SqlValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SqlValue::Literal(v) => write!(f, "{}", v),
            SqlValue::Param(p) => write!(f, "@{}", p),
            SqlValue::Between(low, high) => write!(f, "@{} AND @{}", low, high),
        }
    }
}
