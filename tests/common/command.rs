use crate::common::file::{FileSpec, write_file};
use crate::common::redirect_temp_dir;
use assert_cmd::Command;
use assert_fs::TempDir;
use rstest::fixture;
use std::path::Path;

#[fixture]
pub fn repository_dir() -> TempDir {
    redirect_temp_dir();
    TempDir::new().expect("Failed to create temp dir")
}

/// Empty repository whose HEAD points at `main`
#[fixture]
pub fn empty_repository_dir(repository_dir: TempDir) -> TempDir {
    run_git_command(repository_dir.path(), &["init", "-q"])
        .assert()
        .success();
    run_git_command(
        repository_dir.path(),
        &["symbolic-ref", "HEAD", "refs/heads/main"],
    )
    .assert()
    .success();

    repository_dir
}

/// Repository on `main` with one commit of three files
#[fixture]
pub fn init_repository_dir(empty_repository_dir: TempDir) -> TempDir {
    let repository_dir = empty_repository_dir;

    write_file(FileSpec::new(
        repository_dir.path().join("1.txt"),
        "one".to_string(),
    ));
    write_file(FileSpec::new(
        repository_dir.path().join("a").join("2.txt"),
        "two".to_string(),
    ));
    write_file(FileSpec::new(
        repository_dir.path().join("a").join("b").join("3.txt"),
        "three".to_string(),
    ));

    run_git_command(repository_dir.path(), &["add", "."])
        .assert()
        .success();
    git_commit(repository_dir.path(), "Initial commit")
        .assert()
        .success();

    repository_dir
}

pub fn run_headref_command(dir: &Path, args: &[&str]) -> Command {
    let mut cmd = Command::cargo_bin("headref").expect("Failed to find headref binary");
    cmd.envs(vec![("NO_PAGER", "1")]);
    cmd.env_remove("HEADREF_LOG");
    cmd.current_dir(dir);
    for arg in args {
        cmd.arg(arg);
    }
    cmd
}

pub fn run_git_command(dir: &Path, args: &[&str]) -> Command {
    let mut cmd = Command::new("git");
    cmd.current_dir(dir);
    cmd.envs(vec![
        ("GIT_CONFIG_NOSYSTEM", "1"),
        ("GIT_CONFIG_GLOBAL", "/dev/null"),
        ("GIT_AUTHOR_NAME", "fake_user"),
        ("GIT_AUTHOR_EMAIL", "fake_email@email.com"),
        ("GIT_AUTHOR_DATE", "2023-01-01 12:00:00 +0000"),
        ("GIT_COMMITTER_NAME", "fake_user"),
        ("GIT_COMMITTER_EMAIL", "fake_email@email.com"),
        ("GIT_COMMITTER_DATE", "2023-01-01 12:00:00 +0000"),
    ]);
    for arg in args {
        cmd.arg(arg);
    }
    cmd
}

pub fn git_commit(dir: &Path, message: &str) -> Command {
    run_git_command(dir, &["commit", "-q", "-m", message])
}

/// Output of a git command with surrounding whitespace removed
pub fn git_stdout(dir: &Path, args: &[&str]) -> String {
    let output = run_git_command(dir, args)
        .output()
        .unwrap_or_else(|e| panic!("Failed to run git {:?}: {}", args, e));

    String::from_utf8_lossy(&output.stdout).trim().to_string()
}

/// Point a remote-tracking ref at the current HEAD commit
pub fn create_remote_ref(dir: &Path, remote_branch: &str) {
    run_git_command(
        dir,
        &[
            "update-ref",
            &format!("refs/remotes/{}", remote_branch),
            "HEAD",
        ],
    )
    .assert()
    .success();
}
