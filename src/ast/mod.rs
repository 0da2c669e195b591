//! Data model for selectors, query configurations and query descriptors.
//!
//! Inputs ([`Selector`], [`QueryConfig`]) are what route handlers hand to the
//! translator; the output ([`QueryDescriptor`]) is what a persistence layer's
//! `find` consumes.

pub mod config;
pub mod descriptor;
pub mod operators;
pub mod selector;
pub mod values;

pub use self::config::{OrderBy, QueryConfig};
pub use self::descriptor::{PathTree, QueryDescriptor, WhereNode, WhereTree};
pub use self::operators::{FindOperator, RangeOp, SortOrder};
pub use self::selector::{FilterValue, Selector};
pub use self::values::Scalar;
