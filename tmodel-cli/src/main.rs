//! tmodel CLI — inspect training configuration and checkpoint paths.
//!
//! Prints the effective configuration and resolves the save/resume paths the
//! training loop uses, so scripts can find checkpoints without reimplementing
//! the naming rules.

mod commands;

use clap::Parser;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tmodel_core::ConfigOverrides;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

/// tmodel: training configuration and checkpoint paths for the translation model
#[derive(Parser, Debug)]
#[command(name = "tmodel", version, about, long_about = None)]
pub(crate) struct Cli {
    /// Workspace directory (checkpoint paths and `.env` are resolved against it)
    #[arg(short, long, default_value = ".")]
    workspace: PathBuf,

    /// Configuration file path
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Checkpoint label to resume from, or "latest"
    #[arg(long)]
    preload: Option<String>,

    /// Dataset identifier (prefix of the resume directory)
    #[arg(long)]
    datasource: Option<String>,

    /// Checkpoint folder name
    #[arg(long)]
    model_folder: Option<String>,

    /// Increase verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-essential output
    #[arg(short, long)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            preload: self.preload.clone(),
            datasource: self.datasource.clone(),
            model_folder: self.model_folder.clone(),
        }
    }
}

#[derive(clap::Subcommand, Debug)]
pub(crate) enum Commands {
    /// Print the effective configuration
    Config {
        /// Print JSON instead of TOML
        #[arg(long)]
        json: bool,
    },
    /// Resolve checkpoint file paths
    Weights {
        #[command(subcommand)]
        action: WeightsAction,
    },
    /// Print tokenizer file paths (source and target if LANG is omitted)
    Tokenizer {
        /// Language code
        lang: Option<String>,
    },
}

#[derive(clap::Subcommand, Debug)]
pub(crate) enum WeightsAction {
    /// Save path for an epoch label
    Path {
        /// Epoch label, e.g. "02"
        epoch: String,
    },
    /// Most recent checkpoint in the resume directory
    Latest,
    /// All checkpoints in the resume directory
    List,
    /// Checkpoint selected by the preload setting
    Resume,
}

fn init_tracing(verbose: u8, quiet: bool) -> Option<tracing_appender::non_blocking::WorkerGuard> {
    let filter = match verbose {
        0 if quiet => "error",
        0 => "warn",
        1 => "info",
        _ => "debug",
    };

    // Human-readable layer for stderr (always active)
    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::new(filter));

    // JSON file layer for structured logging
    let log_dir = directories::ProjectDirs::from("dev", "tmodel", "tmodel")
        .map(|d| d.data_dir().join("logs"));
    let (json_layer, guard) = match log_dir {
        Some(dir) if std::fs::create_dir_all(&dir).is_ok() => {
            let file_appender = tracing_appender::rolling::daily(&dir, "tmodel.log");
            let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
            let layer = tracing_subscriber::fmt::layer()
                .json()
                .with_writer(non_blocking)
                .with_filter(EnvFilter::new("debug"));
            (Some(layer), Some(guard))
        }
        _ => (None, None),
    };

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    guard
}

/// Load `<workspace>/.env`, falling back to a `.env` found from the current
/// directory. Variables already set in the environment are never replaced.
fn load_dotenv(workspace: &Path) -> Option<PathBuf> {
    let workspace_env = workspace.join(".env");
    if dotenvy::from_path(&workspace_env).is_ok() {
        return Some(workspace_env);
    }
    dotenvy::dotenv().ok()
}

fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();
    let dotenv_path = load_dotenv(&cli.workspace);
    let _guard = init_tracing(cli.verbose, cli.quiet);
    if let Some(path) = &dotenv_path {
        tracing::debug!(path = %path.display(), "Loaded .env file");
    }

    let overrides = cli.overrides();
    let config = tmodel_core::load_config(
        Some(cli.workspace.as_path()),
        cli.config.as_deref(),
        Some(&overrides),
    )
    .map_err(|e| anyhow::anyhow!("Configuration error: {}", e))?;

    tracing::info!(
        workspace = %cli.workspace.display(),
        datasource = %config.datasource,
        "Loaded configuration"
    );

    let mut stdout = std::io::stdout().lock();
    let found = commands::handle_command(cli.command, &config, &cli.workspace, &mut stdout)?;
    Ok(if found {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
