//! Command-line interface for verso.

use std::path::{Path, PathBuf};
use std::process;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use verso_core::Repository;

#[derive(Parser)]
#[command(name = "verso", about = "verso: local file versioning", version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize a new verso repository in the current directory.
    Init,

    /// Start tracking a file.
    Track {
        /// Path of the file, relative to the repository root.
        path: PathBuf,
    },

    /// List tracked files and their commit statistics.
    Files,

    /// Manage groups.
    Group {
        #[command(subcommand)]
        action: GroupCommands,
    },

    /// Record a new version of a group.
    Commit {
        /// Group to commit to.
        group: String,

        /// Commit message.
        #[arg(long, short)]
        message: String,

        /// Files to include. Defaults to every file the group has committed before.
        paths: Vec<PathBuf>,
    },

    /// Show a group's history, oldest first.
    Log {
        group: String,

        /// Maximum number of versions to show (newest kept).
        #[arg(long, short)]
        limit: Option<usize>,
    },

    /// Show what changed in a file.
    ///
    /// With no versions, compares the last commit against the working tree.
    Diff {
        path: PathBuf,

        /// Version id of the "before" side.
        #[arg(long)]
        from: Option<String>,

        /// Version id of the "after" side.
        #[arg(long)]
        to: Option<String>,
    },
}

#[derive(Subcommand)]
enum GroupCommands {
    /// Create a new group.
    Init { name: String },
    /// List all groups.
    List,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| "verso_core=info".into()),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let cli = Cli::parse();
    let cwd = std::env::current_dir().unwrap_or_else(|e| {
        eprintln!("error: cannot determine current directory: {e}");
        process::exit(1);
    });
    tracing::debug!(cwd = %cwd.display(), "resolved working directory");

    let result = match cli.command {
        Commands::Init => cmd_init(&cwd),
        Commands::Track { path } => cmd_track(&cwd, &path),
        Commands::Files => cmd_files(&cwd),
        Commands::Group { action } => match action {
            GroupCommands::Init { name } => cmd_group_init(&cwd, &name),
            GroupCommands::List => cmd_group_list(&cwd),
        },
        Commands::Commit {
            group,
            message,
            paths,
        } => cmd_commit(&cwd, &group, &message, &paths),
        Commands::Log { group, limit } => cmd_log(&cwd, &group, limit),
        Commands::Diff { path, from, to } => cmd_diff(
            &cwd,
            &path,
            from.as_deref().unwrap_or_default(),
            to.as_deref().unwrap_or_default(),
        ),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        process::exit(1);
    }
}

type CmdResult = Result<(), Box<dyn std::error::Error>>;

fn cmd_init(cwd: &Path) -> CmdResult {
    Repository::init(cwd)?;
    println!("initialized verso repository in .verso/");
    Ok(())
}

fn cmd_track(cwd: &Path, path: &Path) -> CmdResult {
    let repo = Repository::open(cwd)?;
    let id = repo.track(path)?;
    println!("tracking {} ({})", path.display(), &id[..12]);
    Ok(())
}

fn cmd_files(cwd: &Path) -> CmdResult {
    let repo = Repository::open(cwd)?;
    let registry = repo.tracked_files()?;

    if registry.is_empty() {
        println!("no tracked files");
        return Ok(());
    }

    let mut records: Vec<_> = registry.entries.values().collect();
    records.sort_by(|a, b| a.path.cmp(&b.path));
    for record in records {
        let when = record
            .last_commit_timestamp
            .map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string())
            .unwrap_or_else(|| "-".to_string());
        let message = record.last_commit_message.as_deref().unwrap_or("-");
        println!(
            "{}  commits:{}  last:{}  {}",
            record.path, record.commit_count, when, message
        );
    }
    Ok(())
}

fn cmd_group_init(cwd: &Path, name: &str) -> CmdResult {
    let repo = Repository::open(cwd)?;
    let group = repo.group_init(name)?;
    println!("initialized group {} at version {}", group.name, group.current);
    Ok(())
}

fn cmd_group_list(cwd: &Path) -> CmdResult {
    let repo = Repository::open(cwd)?;
    let groups = repo.groups()?;
    if groups.is_empty() {
        println!("no groups");
    }
    for group in groups {
        println!("{}  ({} version(s))", group.name, group.version_order.len());
    }
    Ok(())
}

fn cmd_commit(cwd: &Path, group: &str, message: &str, paths: &[PathBuf]) -> CmdResult {
    let repo = Repository::open(cwd)?;
    let version = repo.commit(group, message, paths)?;
    println!(
        "committed {} file(s) to {} as {}",
        version.files.len(),
        group,
        version.id
    );
    Ok(())
}

fn cmd_log(cwd: &Path, group: &str, limit: Option<usize>) -> CmdResult {
    let repo = Repository::open(cwd)?;
    let versions = repo.log(group)?;
    let skip = limit.map_or(0, |n| versions.len().saturating_sub(n));

    for version in &versions[skip..] {
        println!(
            "{}  {}  {} file(s)  {}",
            version.id,
            version.timestamp.format("%Y-%m-%d %H:%M:%S"),
            version.files.len(),
            version.message
        );
    }
    Ok(())
}

fn cmd_diff(cwd: &Path, path: &Path, from: &str, to: &str) -> CmdResult {
    let repo = Repository::open(cwd)?;
    let diff = repo.diff(path, from, to)?;

    if diff.is_unchanged() {
        println!("no changes in {}", diff.path);
        return Ok(());
    }
    print!("{}", diff.render(repo.config().diff_context_lines));
    Ok(())
}
