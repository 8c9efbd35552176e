//! Porcelain commands (user-facing queries)
//!
//! Each query is exposed twice on [`Repository`](crate::areas::repository::Repository):
//! once returning plain data for library callers, and once as a `show_*`
//! command printing through the repository writer.
//!
//! ## Commands
//!
//! - `branch`: Current branch, HEAD state and branch listings
//! - `files`: Tracked files and changed files
//! - `remote`: Default remote and tracked remote branch

pub mod branch;
pub mod files;
pub mod remote;
