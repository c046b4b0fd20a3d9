//! Condition domain module
//!
//! Typed comparison rules over path-addressed metadata. Rules never fail to
//! evaluate: anything that cannot be compared resolves to `false`.

pub mod coerce;
mod path;
mod rule;

pub use path::{get_path, set_path};
pub use rule::{ConditionOperator, ConditionRule, DataType};
