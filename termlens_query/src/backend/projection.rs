use std::fmt;
use std::fmt::Display;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Projection {
    Field(String),
    FieldAs(String, String),
}

impl Display for Projection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Projection::Field(expr) => write!(f, "{}", expr),
            Projection::FieldAs(expr, alias) => write!(f, "{} AS {}", expr, alias),
        }
    }
}
