//! `anicomplete`: report completed AniList manga whose progress disagrees
//! with the chapter count.
#![cfg_attr(not(any(test, doctest)), deny(clippy::unwrap_used))]
#![cfg_attr(not(any(test, doctest)), deny(clippy::expect_used))]

use std::ffi::OsString;
use std::io;
use std::process::ExitCode;
use std::sync::Arc;

use anicomplete::config::{LogFormat, TrackerSettings};
use anicomplete::inbound::terminal::{CommandOutcome, TerminalCommand, execute};
use anicomplete::outbound::anilist::AniListHttpSource;
use anicomplete::outbound::persistence::JsonFileIdentityStore;
use camino::Utf8PathBuf;
use clap::{Parser, Subcommand};
use color_eyre::eyre::{Context, Result, eyre};
use ortho_config::OrthoConfig;
use tokio::runtime::Builder;
use tracing::{debug, warn};
use tracing_subscriber::{EnvFilter, fmt};

/// `anicomplete` command arguments.
#[derive(Debug, Parser)]
#[command(
    name = "anicomplete",
    about = "List completed manga whose read progress differs from the chapter count",
    version
)]
struct CliArgs {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Show the report for the saved username (default).
    Show,
    /// Look up a username, save it, and show its report.
    Set {
        /// AniList username.
        #[arg(value_name = "USERNAME")]
        username: String,
    },
    /// Forget the saved username.
    Clear,
}

impl From<Command> for TerminalCommand {
    fn from(command: Command) -> Self {
        match command {
            Command::Show => Self::Show,
            Command::Set { username } => Self::Set { username },
            Command::Clear => Self::Clear,
        }
    }
}

fn main() -> Result<ExitCode> {
    color_eyre::install()?;
    let args = CliArgs::parse();
    let settings = TrackerSettings::load_from_iter([OsString::from("anicomplete")])
        .map_err(|err| eyre!("failed to load settings: {err}"))?;
    init_tracing(settings.log_format());

    let runtime = Builder::new_current_thread()
        .enable_all()
        .build()
        .wrap_err("failed to build Tokio runtime")?;
    let command = args.command.map_or(TerminalCommand::Show, TerminalCommand::from);
    runtime.block_on(run(command, &settings))
}

fn init_tracing(format: LogFormat) {
    let builder = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr);
    let installed = match format {
        LogFormat::Json => builder.json().try_init(),
        LogFormat::Text => builder.try_init(),
    };
    if let Err(e) = installed {
        warn!(error = %e, "tracing init failed");
    }
}

async fn run(command: TerminalCommand, settings: &TrackerSettings) -> Result<ExitCode> {
    let endpoint = settings
        .endpoint()
        .wrap_err("ANICOMPLETE_ENDPOINT is not a valid URL")?;
    let source = AniListHttpSource::new(
        endpoint,
        settings.request_timeout(),
        settings.user_agent(),
    )
    .wrap_err("failed to build HTTP client")?;

    let store_dir = Utf8PathBuf::from_path_buf(settings.store_dir())
        .map_err(|path| eyre!("store directory {} is not UTF-8", path.display()))?;
    let store = JsonFileIdentityStore::open(&store_dir)
        .wrap_err_with(|| format!("failed to open identity store at {store_dir}"))?;
    debug!(%store_dir, "identity store opened");

    let mut stdout = io::stdout().lock();
    let outcome = execute(&command, Arc::new(source), Arc::new(store), &mut stdout).await?;
    Ok(match outcome {
        CommandOutcome::Completed => ExitCode::SUCCESS,
        CommandOutcome::Failed => ExitCode::FAILURE,
    })
}
