pub mod operator;
pub mod param;
pub mod projection;
pub mod value;

pub use operator::Operator;
pub use param::{ParamType, QueryParam};
pub use projection::Projection;
pub use value::SqlValue;
