//! Current branch resolution
//!
//! [`BranchResolver`] answers "which branch is checked out?" by looking at HEAD
//! directly instead of spawning git. Answers are cached against HEAD's
//! modification time, so repeated queries cost one `stat` as long as nobody
//! switches branches.
//!
//! ## Resolution
//!
//! 1. stat HEAD (following symlinks); failure means there is nothing to resolve
//! 2. a cached answer taken at the same modification time is returned as is
//! 3. a symlinked HEAD (legacy layout) names the branch through its target path
//!    below `refs/heads/`
//! 4. a regular HEAD file is parsed as a [`HeadRef`]
//!
//! Filesystem failures never escape [`BranchResolver::resolve_current_branch`];
//! they degrade to an empty branch name. [`BranchResolver::resolve_head_state`]
//! keeps them apart for callers that need to know why.

use crate::areas::file_stat::{FileStat, LocalFileStat};
use crate::areas::refs::{HeadRef, Refs};
use crate::artifacts::branch::branch_cache::{BranchCache, BranchCacheEntry};
use std::fmt;
use std::io;
use std::path::{Component, Path};
use std::sync::{Mutex, MutexGuard};
use std::time::SystemTime;
use tracing::debug;

/// Why HEAD could not be turned into a branch or commit
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum UnresolvableReason {
    #[error("HEAD not found")]
    NotFound,
    #[error("failed to access HEAD: {0}")]
    Io(io::ErrorKind),
    #[error("HEAD symlink points outside refs/heads")]
    OutsideHeads,
    #[error("HEAD content is malformed")]
    Malformed,
    #[error("HEAD is neither a symlink nor a regular file")]
    UnknownFileType,
}

impl From<&io::Error> for UnresolvableReason {
    fn from(err: &io::Error) -> Self {
        match err.kind() {
            io::ErrorKind::NotFound => UnresolvableReason::NotFound,
            kind => UnresolvableReason::Io(kind),
        }
    }
}

/// What HEAD currently designates
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HeadState {
    Branch(String),
    /// HEAD holds something other than a branch reference, usually a commit id
    Detached(String),
    Unresolvable(UnresolvableReason),
}

impl HeadState {
    /// Collapse into the plain branch-name form
    ///
    /// Detached values are returned verbatim; unresolvable states become empty.
    pub fn into_branch_string(self) -> String {
        match self {
            HeadState::Branch(name) | HeadState::Detached(name) => name,
            HeadState::Unresolvable(_) => String::new(),
        }
    }

    fn to_cache_entry(&self, mod_time: SystemTime) -> Option<BranchCacheEntry> {
        match self {
            HeadState::Branch(name) => Some(BranchCacheEntry::new(mod_time, name.clone(), false)),
            HeadState::Detached(value) => {
                Some(BranchCacheEntry::new(mod_time, value.clone(), true))
            }
            HeadState::Unresolvable(_) => None,
        }
    }
}

impl From<&BranchCacheEntry> for HeadState {
    fn from(entry: &BranchCacheEntry) -> Self {
        if entry.detached {
            HeadState::Detached(entry.branch_name.clone())
        } else {
            HeadState::Branch(entry.branch_name.clone())
        }
    }
}

impl From<HeadRef> for HeadState {
    fn from(head_ref: HeadRef) -> Self {
        match head_ref {
            HeadRef::SymbolicRef(name) => HeadState::Branch(name),
            HeadRef::RawRef(value) => HeadState::Detached(value),
            HeadRef::Malformed => HeadState::Unresolvable(UnresolvableReason::Malformed),
        }
    }
}

impl fmt::Display for HeadState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HeadState::Branch(name) => write!(f, "branch {}", name),
            HeadState::Detached(value) => write!(f, "detached {}", value),
            HeadState::Unresolvable(reason) => write!(f, "unresolvable {}", reason),
        }
    }
}

/// Resolves and caches the currently checked-out branch of one repository
pub struct BranchResolver<F: FileStat = LocalFileStat> {
    refs: Refs,
    file_stat: F,
    cache: Mutex<BranchCache>,
}

impl BranchResolver<LocalFileStat> {
    pub fn new(refs: Refs) -> Self {
        Self::with_file_stat(refs, LocalFileStat)
    }
}

impl<F: FileStat> BranchResolver<F> {
    pub fn with_file_stat(refs: Refs, file_stat: F) -> Self {
        Self {
            refs,
            file_stat,
            cache: Mutex::new(BranchCache::default()),
        }
    }

    pub fn refs(&self) -> &Refs {
        &self.refs
    }

    /// Name of the checked-out branch
    ///
    /// Returns the raw HEAD value when HEAD is detached and an empty string when
    /// HEAD cannot be resolved at all.
    pub fn resolve_current_branch(&self) -> String {
        self.resolve_head_state().into_branch_string()
    }

    /// Resolve HEAD, keeping the reason when it cannot be resolved
    pub fn resolve_head_state(&self) -> HeadState {
        let head = self.refs.head_path();

        // the slot stays locked from the staleness check until the update
        let mut cache = self.lock_cache();

        let mod_time = match self.file_stat.stat(&head) {
            Ok(mod_time) => mod_time,
            Err(err) => {
                debug!(path = ?head, error = %err, "failed to stat HEAD");
                return HeadState::Unresolvable((&err).into());
            }
        };

        if let Some(entry) = cache.lookup(mod_time) {
            debug!(branch = %entry.branch_name, "current branch served from cache");
            return entry.into();
        }

        let state = if self.file_stat.is_symlink(&head) {
            self.resolve_symlinked_head(&head)
        } else if self.file_stat.is_regular_file(&head) {
            self.resolve_head_file(&head)
        } else {
            HeadState::Unresolvable(UnresolvableReason::UnknownFileType)
        };

        // a symlink pointing outside refs/heads is recomputed on every call
        if let Some(entry) = state.to_cache_entry(mod_time) {
            debug!(branch = %entry.branch_name, "current branch resolved from HEAD");
            cache.store(entry);
        } else {
            debug!(%state, "HEAD did not resolve to a branch");
        }

        state
    }

    pub fn clear_cache(&self) {
        self.lock_cache().clear();
    }

    /// Timestamp and name currently held by the cache
    pub fn cached(&self) -> Option<(SystemTime, String)> {
        self.lock_cache()
            .entry()
            .map(|entry| (entry.last_mod_time, entry.branch_name.clone()))
    }

    fn lock_cache(&self) -> MutexGuard<'_, BranchCache> {
        // the slot holds plain data, so a poisoned lock is still consistent
        self.cache
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn resolve_symlinked_head(&self, head: &Path) -> HeadState {
        let target = match self.file_stat.real_path(head) {
            Ok(target) => target,
            Err(err) => return HeadState::Unresolvable((&err).into()),
        };
        let refs_heads = match self.file_stat.real_path(&self.refs.heads_path()) {
            Ok(refs_heads) => refs_heads,
            Err(err) => return HeadState::Unresolvable((&err).into()),
        };

        match target.strip_prefix(&refs_heads) {
            Ok(rest) if rest.components().next().is_some() => {
                HeadState::Branch(Self::join_components(rest))
            }
            _ => HeadState::Unresolvable(UnresolvableReason::OutsideHeads),
        }
    }

    fn resolve_head_file(&self, head: &Path) -> HeadState {
        match self.file_stat.read_all(head) {
            Ok(content) => HeadRef::parse(&String::from_utf8_lossy(&content)).into(),
            Err(err) => {
                debug!(path = ?head, error = %err, "failed to read HEAD");
                HeadState::Unresolvable((&err).into())
            }
        }
    }

    // branch names always use forward slashes, whatever the platform separator
    fn join_components(path: &Path) -> String {
        path.components()
            .filter_map(|component| match component {
                Component::Normal(part) => Some(part.to_string_lossy()),
                _ => None,
            })
            .collect::<Vec<_>>()
            .join("/")
    }
}
