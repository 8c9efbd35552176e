//! Branch namespaces and the parsing of `git for-each-ref` listings

use crate::areas::refs::HEADS_PREFIX;
use crate::artifacts::branch::REMOTE_HEAD_NAME;

const REMOTES_PREFIX: &str = "refs/remotes/";

/// Where a family of branches lives in the ref store
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefNamespace {
    /// `refs/heads/`
    Local,
    /// `refs/remotes/`
    Remote,
}

impl RefNamespace {
    pub fn from_remote_flag(remote: bool) -> Self {
        if remote {
            RefNamespace::Remote
        } else {
            RefNamespace::Local
        }
    }

    pub fn prefix(self) -> &'static str {
        match self {
            RefNamespace::Local => HEADS_PREFIX,
            RefNamespace::Remote => REMOTES_PREFIX,
        }
    }

    /// Short branch names from `git for-each-ref --format=%(refname)` output
    ///
    /// The namespace prefix is stripped from each line. Empty names and a bare
    /// `HEAD` are dropped; `origin/HEAD` is kept.
    pub fn parse_listing(self, output: &str) -> Vec<String> {
        let prefix = self.prefix();

        output
            .lines()
            .map(|line| line.strip_prefix(prefix).unwrap_or(line))
            .filter(|name| !name.is_empty() && *name != REMOTE_HEAD_NAME)
            .map(str::to_string)
            .collect()
    }
}

/// Remote ref most likely tracked by `branch` on `remote`
///
/// Prefers `<remote>/<branch>`, then the first remote branch, then the bare
/// remote name when no remote branches exist.
pub fn pick_tracking_ref(remote: &str, branch: &str, remote_branches: &[String]) -> String {
    let best_match = format!("{}/{}", remote, branch);

    if remote_branches.iter().any(|name| *name == best_match) {
        return best_match;
    }

    remote_branches
        .first()
        .cloned()
        .unwrap_or_else(|| remote.to_string())
}
