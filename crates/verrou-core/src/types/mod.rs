//! Core type definitions used across the Verrou workspace.

pub mod filter;
pub mod pagination;
pub mod sorting;

pub use filter::{Filter, FilterOp, FilterValue};
pub use pagination::{Page, PageMeta, PageQuery};
pub use sorting::SortDirection;
