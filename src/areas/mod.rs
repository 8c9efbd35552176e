//! Core repository components
//!
//! This module contains the building blocks the queries are made of:
//!
//! - `file_stat`: Read-only filesystem primitives used to inspect HEAD
//! - `git`: Invocation of the external git binary
//! - `refs`: Git directory layout and HEAD content
//! - `repository`: High-level repository handle tying the pieces together

pub mod file_stat;
pub mod git;
pub mod refs;
pub mod repository;
