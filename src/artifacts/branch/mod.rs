pub mod branch_cache;
pub mod ref_namespace;
pub mod resolver;

pub const REMOTE_HEAD_NAME: &str = "HEAD";
pub const DEFAULT_REMOTE: &str = "origin";
