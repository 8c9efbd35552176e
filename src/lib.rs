//! Branch and file queries for git repositories
//!
//! The current branch is read straight from HEAD and cached against HEAD's
//! modification time; branch listings, tracked files and diff file lists are
//! obtained from the git binary.

pub mod areas;
pub mod artifacts;
pub mod commands;
