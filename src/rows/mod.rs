//! Generic table access for the back-office data endpoints.

pub mod query;
pub mod store;

pub use query::{Filter, Operator, OrderBy, QueryKind, RowQuery};
pub use store::{RowStore, TableAllowList};
