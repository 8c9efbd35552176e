//! Data structures behind the queries
//!
//! - `branch`: Current-branch resolution, its cache and branch namespaces
//! - `core`: Shared utilities (pager wrapper, etc.)

pub mod branch;
pub mod core;
