//! Command implementations
//!
//! All commands are read-only queries over a repository and live under
//! `porcelain`.

pub mod porcelain;
