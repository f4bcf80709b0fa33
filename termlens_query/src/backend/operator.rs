use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Copy, PartialOrd, Ord)]
pub enum Operator {
    Eq,
    NotEq,
    Gt,
    Lt,
    Gte,
    Lte,
    Between, // Right-hand side is a SqlValue::Between pair
}

impl From<Operator> for String {
    fn from(value: Operator) -> Self {
        match value {
            Operator::Eq => "=".into(),
            Operator::NotEq => "!=".into(),
            Operator::Gt => ">".into(),
            Operator::Lt => "<".into(),
            Operator::Gte => ">=".into(),
            Operator::Lte => "<=".into(),
            Operator::Between => "BETWEEN".into(),
        }
    }
}
