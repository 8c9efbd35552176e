//! Git directory layout and HEAD content
//!
//! This module maps logical repository paths (`HEAD`, `refs/heads`, ...) onto the
//! filesystem and parses the content of the HEAD file.
//!
//! ## HEAD File Format
//!
//! HEAD is either a symbolic link into `refs/heads/` (legacy layout) or a text
//! file containing one of:
//! - `ref: refs/heads/<branch>` for a checked-out branch
//! - anything else, usually a 40-character SHA-1 for a detached HEAD

use anyhow::Context;
use derive_new::new;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

/// Name of the HEAD reference
pub const HEAD_REF_NAME: &str = "HEAD";

/// Namespace holding local branches
pub const HEADS_PREFIX: &str = "refs/heads/";

/// Regex pattern for a symbolic reference to a local branch
///
/// Everything after the literal prefix is the branch, newlines included.
const SYMREF_REGEX: &str = r"(?s)^ref: refs/heads/(.*)$";

static SYMREF: LazyLock<regex::Regex> =
    LazyLock::new(|| regex::Regex::new(SYMREF_REGEX).expect("symref regex is valid"));

/// Parsed content of a HEAD file
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HeadRef {
    /// `ref: refs/heads/<name>`
    SymbolicRef(String),
    /// Any other non-empty content, e.g. a detached commit id
    RawRef(String),
    /// Empty or whitespace-only content
    Malformed,
}

impl HeadRef {
    pub fn parse(content: &str) -> Self {
        let content = content.trim();

        if content.is_empty() {
            return HeadRef::Malformed;
        }

        match SYMREF.captures(content) {
            Some(symref_match) if symref_match[1].is_empty() => HeadRef::Malformed,
            Some(symref_match) => HeadRef::SymbolicRef(symref_match[1].to_string()),
            None => HeadRef::RawRef(content.to_string()),
        }
    }
}

/// Resolves repository-relative paths inside a git directory
#[derive(Debug, Clone, PartialEq, Eq, new)]
pub struct Refs {
    /// Path to the git directory (typically `.git`)
    path: Box<Path>,
}

impl Refs {
    /// Locate the git directory for a working tree
    ///
    /// Walks up from `start` looking for a `.git` directory, or a `.git` file
    /// holding a `gitdir: <path>` pointer (worktrees and submodules).
    pub fn discover(start: &Path) -> anyhow::Result<Self> {
        Self::discover_work_tree(start).map(|(_, refs)| refs)
    }

    /// Like [`Refs::discover`], also returning the top-level directory of the
    /// working tree the git directory belongs to
    pub fn discover_work_tree(start: &Path) -> anyhow::Result<(PathBuf, Self)> {
        let start = start
            .canonicalize()
            .with_context(|| format!("failed to resolve repository path {:?}", start))?;

        for dir in start.ancestors() {
            let dot_git = dir.join(".git");

            if dot_git.is_dir() {
                return Ok((dir.to_path_buf(), Self::new(dot_git.into_boxed_path())));
            }

            if dot_git.is_file() {
                let content = std::fs::read_to_string(&dot_git)
                    .with_context(|| format!("failed to read gitdir file at {:?}", dot_git))?;
                let gitdir = content
                    .trim()
                    .strip_prefix("gitdir:")
                    .map(str::trim)
                    .with_context(|| format!("malformed gitdir file at {:?}", dot_git))?;

                let refs = Self::new(dir.join(gitdir).into_boxed_path());
                return Ok((dir.to_path_buf(), refs));
            }
        }

        anyhow::bail!("not a git repository (or any of the parent directories): {:?}", start)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Absolute path of a logical location such as `["refs", "heads"]`
    pub fn resolve<I, S>(&self, segments: I) -> PathBuf
    where
        I: IntoIterator<Item = S>,
        S: AsRef<Path>,
    {
        segments
            .into_iter()
            .fold(self.path.to_path_buf(), |acc, segment| acc.join(segment))
    }

    pub fn head_path(&self) -> PathBuf {
        self.resolve([HEAD_REF_NAME])
    }

    pub fn refs_path(&self) -> PathBuf {
        self.resolve(["refs"])
    }

    pub fn heads_path(&self) -> PathBuf {
        self.resolve(["refs", "heads"])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_fs::TempDir;
    use assert_fs::prelude::{FileWriteStr, PathChild, PathCreateDir};
    use pretty_assertions::assert_eq;
    use proptest::proptest;

    proptest! {
        #[test]
        fn symbolic_ref_yields_branch_name(name in "[a-zA-Z0-9_-]+(/[a-zA-Z0-9_-]+)*") {
            let content = format!("ref: refs/heads/{}\n", name);
            assert_eq!(HeadRef::parse(&content), HeadRef::SymbolicRef(name));
        }

        #[test]
        fn hex_content_is_raw_ref(oid in "[0-9a-f]{40}") {
            let content = format!("{}\n", oid);
            assert_eq!(HeadRef::parse(&content), HeadRef::RawRef(oid));
        }
    }

    #[test]
    fn parse_trims_surrounding_whitespace() {
        assert_eq!(
            HeadRef::parse("  ref: refs/heads/main \n\n"),
            HeadRef::SymbolicRef("main".to_string())
        );
    }

    #[test]
    fn symref_outside_heads_is_raw_ref() {
        assert_eq!(
            HeadRef::parse("ref: refs/remotes/origin/main\n"),
            HeadRef::RawRef("ref: refs/remotes/origin/main".to_string())
        );
    }

    #[test]
    fn empty_content_is_malformed() {
        assert_eq!(HeadRef::parse(""), HeadRef::Malformed);
        assert_eq!(HeadRef::parse(" \n\t"), HeadRef::Malformed);
    }

    #[test]
    fn bare_heads_prefix_is_malformed() {
        assert_eq!(HeadRef::parse("ref: refs/heads/\n"), HeadRef::Malformed);
        assert_eq!(HeadRef::parse("  ref: refs/heads/  "), HeadRef::Malformed);
    }

    #[test]
    fn branch_is_everything_after_prefix() {
        assert_eq!(
            HeadRef::parse("ref: refs/heads/main\nextra\n"),
            HeadRef::SymbolicRef("main\nextra".to_string())
        );
    }

    #[test]
    fn resolve_joins_segments_under_git_dir() {
        let refs = Refs::new(Path::new("/repo/.git").into());

        assert_eq!(refs.head_path(), PathBuf::from("/repo/.git/HEAD"));
        assert_eq!(refs.heads_path(), PathBuf::from("/repo/.git/refs/heads"));
        assert_eq!(
            refs.resolve(["refs", "remotes", "origin"]),
            PathBuf::from("/repo/.git/refs/remotes/origin")
        );
    }

    #[test]
    fn discover_finds_git_dir_from_nested_path() -> anyhow::Result<()> {
        let dir = TempDir::new()?;
        dir.child(".git").create_dir_all()?;
        dir.child("a/b").create_dir_all()?;

        let refs = Refs::discover(dir.child("a/b").path())?;

        assert_eq!(refs.path(), dir.path().canonicalize()?.join(".git"));
        Ok(())
    }

    #[test]
    fn discover_work_tree_reports_top_level_from_nested_path() -> anyhow::Result<()> {
        let dir = TempDir::new()?;
        dir.child(".git").create_dir_all()?;
        dir.child("a/b").create_dir_all()?;

        let (work_tree, refs) = Refs::discover_work_tree(dir.child("a/b").path())?;

        assert_eq!(work_tree, dir.path().canonicalize()?);
        assert_eq!(refs.path(), work_tree.join(".git"));
        Ok(())
    }

    #[test]
    fn discover_work_tree_of_gitdir_file_is_its_directory() -> anyhow::Result<()> {
        let dir = TempDir::new()?;
        dir.child("actual").create_dir_all()?;
        dir.child("tree/sub").create_dir_all()?;
        dir.child("tree/.git").write_str("gitdir: ../actual\n")?;

        let (work_tree, _) = Refs::discover_work_tree(dir.child("tree/sub").path())?;

        assert_eq!(work_tree, dir.path().canonicalize()?.join("tree"));
        Ok(())
    }

    #[test]
    fn discover_follows_gitdir_file() -> anyhow::Result<()> {
        let dir = TempDir::new()?;
        dir.child("actual").create_dir_all()?;
        dir.child("tree").create_dir_all()?;
        dir.child("tree/.git").write_str("gitdir: ../actual\n")?;

        let refs = Refs::discover(dir.child("tree").path())?;

        assert_eq!(refs.path().canonicalize()?, dir.path().canonicalize()?.join("actual"));
        Ok(())
    }

    #[test]
    fn discover_outside_repository_fails() -> anyhow::Result<()> {
        let dir = TempDir::new()?;
        // a temp dir may itself live inside a git checkout, so only assert when it does not
        if dir.path().ancestors().all(|p| !p.join(".git").exists()) {
            assert!(Refs::discover(dir.path()).is_err());
        }
        Ok(())
    }
}
