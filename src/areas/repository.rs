//! Entry point tying a working tree to its git directory
//!
//! A [`Repository`] is opened from any path inside a working tree. HEAD is
//! resolved through the discovered git directory, and git commands run at the
//! top level of the working tree so their output covers the whole repository.

use crate::areas::git::{Git, GitConfig};
use crate::areas::refs::Refs;
use crate::artifacts::branch::resolver::BranchResolver;
use std::cell::{RefCell, RefMut};
use std::path::Path;

pub struct Repository {
    path: Box<Path>,
    writer: RefCell<Box<dyn std::io::Write>>,
    resolver: BranchResolver,
    git: Git,
}

impl Repository {
    pub fn new(
        path: &Path,
        writer: Box<dyn std::io::Write>,
        git_config: GitConfig,
    ) -> anyhow::Result<Self> {
        let (work_tree, refs) = Refs::discover_work_tree(path)?;
        let resolver = BranchResolver::new(refs);
        let git = Git::new(work_tree.clone().into_boxed_path(), git_config);

        Ok(Repository {
            path: work_tree.into_boxed_path(),
            writer: RefCell::new(writer),
            resolver,
            git,
        })
    }

    /// Top-level directory of the working tree
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn writer(&'_ self) -> RefMut<'_, Box<dyn std::io::Write>> {
        self.writer.borrow_mut()
    }

    pub fn refs(&self) -> &Refs {
        self.resolver.refs()
    }

    pub fn resolver(&self) -> &BranchResolver {
        &self.resolver
    }

    pub fn git(&self) -> &Git {
        &self.git
    }

    /// Name of the checked-out branch, empty when HEAD does not name one
    pub fn current_branch(&self) -> String {
        self.resolver.resolve_current_branch()
    }
}
