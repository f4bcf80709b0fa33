pub mod select;
pub mod spec;

pub use select::*;
pub use spec::*;

/// Shorthand for constructing a query
#[derive(Debug, Clone)]
pub struct Query;

impl Query {
    /// SELECT statement [`SelectStatement`]
    pub fn select() -> SelectStatement {
        SelectStatement::new()
    }
}
