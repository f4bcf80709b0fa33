use thiserror::Error;

/// Errors raised while constructing an analytical query.
///
/// All of these are construction-time defects: they mean a template or its
/// configuration is wrong, never that the warehouse rejected the query.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum QueryError {
    #[error("Placeholder @{0} has no bound parameter")]
    UnboundPlaceholder(String),

    #[error("Parameter {0} is never referenced by the query text")]
    UnusedParameter(String),

    #[error("Parameter {0} is bound more than once")]
    DuplicateParameter(String),

    #[error("Invalid table identifier: \"{0}\"")]
    InvalidIdentifier(String),

    #[error("SELECT requires a FROM table")]
    MissingTable,

    #[error("Template {template} expects {expected} input")]
    InputMismatch {
        template: String,
        expected: &'static str,
    },
}

pub type Result<T> = std::result::Result<T, QueryError>;
