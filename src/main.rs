use anyhow::Result;
use clap::{Parser, Subcommand};
use headref::areas::git::GitConfig;
use headref::areas::repository::Repository;
use headref::artifacts::core::{PagerWriter, should_page};
use minus::Pager;
use std::path::{Path, PathBuf};
use tracing::level_filters::LevelFilter;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Environment variable holding the log filter directives
const LOG_ENV: &str = "HEADREF_LOG";

#[derive(Parser)]
#[command(
    name = "headref",
    version = "0.1.0",
    about = "Query the branch and file state of a git repository",
    long_about = "Reports the current branch straight from HEAD, and lists branches, \
    tracked files and changed files with the help of the git binary.",
    help_template = r"
{name} {version} - {about}

USAGE:
    {usage}

OPTIONS:
    {all-args}
"
)]
struct Cli {
    #[arg(
        short = 'C',
        long = "repo",
        global = true,
        help = "Path inside the repository to query (defaults to the current directory)"
    )]
    repo: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(
        name = "current-branch",
        about = "Print the checked-out branch",
        long_about = "Prints the name of the checked-out branch. A detached HEAD prints its raw value \
        and an unresolvable HEAD prints an empty line."
    )]
    CurrentBranch,
    #[command(
        name = "head-state",
        about = "Print what HEAD designates",
        long_about = "Prints `branch <name>`, `detached <value>` or `unresolvable <reason>`."
    )]
    HeadState,
    #[command(
        name = "branches",
        about = "List branches",
        long_about = "Lists local branches, marking the current one with `*`, or remote-tracking \
        branches with --remote."
    )]
    Branches {
        #[arg(short, long, help = "List remote-tracking branches")]
        remote: bool,
    },
    #[command(name = "files", about = "List tracked files")]
    Files,
    #[command(
        name = "diff-files",
        about = "List files changed by a diff",
        long_about = "Lists the files reported by `git diff --name-only <rev>`."
    )]
    DiffFiles {
        #[arg(index = 1, help = "Revision or range passed to git diff")]
        rev: String,
    },
    #[command(
        name = "default-remote",
        about = "Print the remote tracked by the current branch"
    )]
    DefaultRemote,
    #[command(
        name = "tracking-ref",
        about = "Print the remote branch tracked by the current branch"
    )]
    TrackingRef,
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_level(true)
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .with(
            EnvFilter::builder()
                .with_env_var(LOG_ENV)
                .with_default_directive(LevelFilter::WARN.into())
                .from_env_lossy(),
        )
        .init();
}

fn open_repository(repo: Option<&Path>, writer: Box<dyn std::io::Write>) -> Result<Repository> {
    let git_config = GitConfig::from_env()?;

    match repo {
        Some(path) => Repository::new(path, writer, git_config),
        None => {
            let pwd = std::env::current_dir()?;
            Repository::new(&pwd, writer, git_config)
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let pager = should_page().then(Pager::new);
    let writer: Box<dyn std::io::Write> = match &pager {
        Some(pager) => Box::new(PagerWriter::new(pager.clone())),
        None => Box::new(std::io::stdout()),
    };
    let repository = open_repository(cli.repo.as_deref(), writer)?;

    match &cli.command {
        Commands::CurrentBranch => repository.show_current_branch()?,
        Commands::HeadState => repository.show_head_state()?,
        Commands::Branches { remote } => repository.show_branches(*remote).await?,
        Commands::Files => repository.show_files().await?,
        Commands::DiffFiles { rev } => repository.show_diff_files(rev).await?,
        Commands::DefaultRemote => repository.show_default_remote().await?,
        Commands::TrackingRef => repository.show_tracking_ref().await?,
    }

    if let Some(pager) = pager {
        drop(repository);
        minus::page_all(pager)?;
    }

    Ok(())
}
