//! gibson - install Godot Asset Library addons from the command line.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use gibson::{AssetReference, InstallOptions, Installer, Phase, PhaseEvent, ProgressReporter};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[clap(name = "gibson", version, about = "Install Godot Asset Library addons")]
struct Cli {
    #[clap(subcommand)]
    command: Command,

    /// Log verbosity (logs go to stderr)
    #[clap(long, value_enum, default_value = "warn", global = true)]
    log_level: LogLevel,

    /// Archive cache directory [default: <user cache dir>/gibson/addons]
    #[clap(long, env = "GIBSON_CACHE_DIR", global = true)]
    cache_dir: Option<PathBuf>,

    /// Directory addons are extracted into
    #[clap(long, default_value = gibson::DEFAULT_INSTALL_DIR, global = true)]
    install_dir: PathBuf,

    /// Asset library API base URL
    #[clap(long, env = "GIBSON_REGISTRY_URL", default_value = gibson::DEFAULT_REGISTRY_URL, global = true)]
    registry_url: String,

    /// Godot version used to filter author searches
    #[clap(long, default_value = gibson::DEFAULT_GODOT_VERSION, global = true)]
    godot_version: String,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Install an addon by id (42) or by author/title (jane/Widget)
    Install {
        /// The addon to install
        reference: String,

        /// Discard cached archives of this addon and download it again
        #[clap(long)]
        clear_cache: bool,
    },

    /// Remove an addon's cached archives
    Uninstall {
        /// The addon to uninstall, as author/title
        reference: String,
    },

    /// List cached addons
    List,
}

/// Log levels
#[derive(Debug, Clone, ValueEnum)]
enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    fn to_filter_directive(&self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}

/// Prints one status line per phase event on stderr.
struct ConsoleReporter;

impl ConsoleReporter {
    fn print(symbol: &str, phase: Phase, message: &str) {
        eprintln!("{symbol} [{phase}] {message}");
    }
}

impl ProgressReporter for ConsoleReporter {
    fn begin(&self, phase: Phase, message: &str) {
        Self::print("…", phase, message);
    }

    fn succeed(&self, phase: Phase, message: &str) {
        Self::print("✓", phase, message);
    }

    fn fail(&self, phase: Phase, message: &str) {
        Self::print("✗", phase, message);
    }
}

fn initialize_tracing(log_level: &LogLevel) {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(log_level.to_filter_directive()))
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn build_options(cli: &Cli) -> InstallOptions {
    let mut options = InstallOptions {
        install_dir: cli.install_dir.clone(),
        base_url: cli.registry_url.clone(),
        godot_version: cli.godot_version.clone(),
        ..Default::default()
    };
    if let Some(cache_dir) = &cli.cache_dir {
        options.cache_root = cache_dir.clone();
    }
    options
}

fn parse_reference(raw: &str) -> Result<AssetReference> {
    raw.parse::<AssetReference>()
        .map_err(|e| anyhow::anyhow!("{e}\n  fix: {}", e.fix_suggestion()))
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    initialize_tracing(&cli.log_level);

    let options = build_options(&cli);
    tracing::debug!(cache_root = %options.cache_root.display(), "Using cache");

    let installer = Installer::new(options)
        .context("Failed to set up the installer")?
        .with_reporter(ConsoleReporter);

    match cli.command {
        Command::Install {
            reference,
            clear_cache,
        } => {
            let reference = parse_reference(&reference)?;
            installer
                .install(&reference, clear_cache)
                .await
                .map_err(|e| anyhow::anyhow!("{e}\n  fix: {}", e.fix_suggestion()))?;
        }
        Command::Uninstall { reference } => {
            let reference = parse_reference(&reference)?;
            installer
                .uninstall(&reference)
                .map_err(|e| anyhow::anyhow!("{e}\n  fix: {}", e.fix_suggestion()))?;
        }
        Command::List => {
            let assets = installer
                .cache()
                .cached_assets()
                .context("Failed to read the cache")?;
            for (author, title) in assets {
                let versions: Vec<String> = installer
                    .cache()
                    .entries(&author, &title)?
                    .iter()
                    .map(|entry| match entry.version_commit() {
                        Some((version, commit)) => format!("{version} ({commit})"),
                        None => entry.file_name.clone(),
                    })
                    .collect();
                println!("{author}/{title}: {}", versions.join(", "));
            }
        }
    }

    Ok(())
}
