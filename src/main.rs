//! `dlms` command line: build portable library snapshots and clone versions.

use clap::{Parser, Subcommand};
use derive_more::{Display, Error};
use dlms_config::Config;
use dlms_library::{Context, build_snapshot, clone_version};
use dlms_store::{Database, Repository};
use exn::ResultExt;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Display, Error)]
enum ErrorKind {
    #[display("configuration error")]
    Config,
    #[display("could not open the content store")]
    Store,
    #[display("build of version {_0} failed")]
    Build(#[error(not(source))] i64),
    #[display("clone of version {_0} failed")]
    Clone(#[error(not(source))] i64),
}

type Result<T> = std::result::Result<T, exn::Exn<ErrorKind>>;

#[derive(Debug, Parser)]
#[command(name = "dlms", version, about = "Content library curation and snapshot builds")]
struct Cli {
    /// Configuration file (TOML, YAML or JSON).
    #[arg(long, short, global = true, env = "DLMS_CONFIG")]
    config: Option<PathBuf>,

    /// Log at debug level (unless `RUST_LOG` is set).
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand, PartialEq, Eq)]
enum Command {
    /// Build the portable snapshot of a version.
    Build { version_id: i64 },
    /// Deep-copy a version into a new one.
    Clone { version_id: i64 },
    /// List all library versions.
    Versions,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    let level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)))
        .with_writer(std::io::stderr)
        .init();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!("{err:?}");
            ExitCode::FAILURE
        },
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = Config::load(cli.config.as_deref()).or_raise(|| ErrorKind::Config)?;
    if let Some(parent) = config.database.parent() {
        tokio::fs::create_dir_all(parent).await.or_raise(|| ErrorKind::Store)?;
    }
    let db = Database::connect(&config.database).await.or_raise(|| ErrorKind::Store)?;
    let repo = Repository::from(&db);

    let outcome = execute(&repo, &config, cli.command).await;
    db.close().await;
    outcome
}

async fn execute(repo: &Repository, config: &Config, command: Command) -> Result<()> {
    match command {
        Command::Build { version_id } => {
            let ctx = Context::new(&config.builds_root)
                .with_content_prefix(&config.content_prefix)
                .with_artifact_name(&config.artifact_name);
            let artifact = build_snapshot(repo, &ctx, version_id).await.or_raise(|| ErrorKind::Build(version_id))?;
            println!("{}\t{}", artifact.path.display(), artifact.manifest.checksum);
        },
        Command::Clone { version_id } => {
            let cloned = clone_version(repo, version_id).await.or_raise(|| ErrorKind::Clone(version_id))?;
            println!("{}\t{}", cloned.version.id, cloned.version.version_number);
        },
        Command::Versions => {
            for version in repo.list_versions().await.or_raise(|| ErrorKind::Store)? {
                println!("{}\t{}\t{}", version.id, version.library_name, version.version_number);
            }
        },
    }
    Ok(())
}
