//! MoodLens CLI (moodlens) - Main entry point
//!
//! Thin command-line front end over the fusion, check-in and pattern engines.
//! Results are printed as pretty JSON on stdout; logs go to stderr or to the
//! configured log file.
//!
//! ```bash
//! moodlens fuse --signal questions=anxious:0.8 --signal journaling=anxious:0.9
//! moodlens check-in --input request.json
//! moodlens summarize --window 7d
//! moodlens history --emotion anxious --window 30d
//! ```

use std::fs::OpenOptions;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::{info, warn};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use moodlens_common::config::{LoggingConfig, RootFolderInitializer, RootFolderResolver, TomlConfig};
use moodlens_common::{EmotionLabel, ModalitySignal};
use moodlens_engine::{
    CheckInRequest, CheckInService, Error, FusionEngine, JsonlEventStore, SummaryWindow,
};

/// Command-line arguments for moodlens
#[derive(Parser, Debug)]
#[command(name = "moodlens")]
#[command(about = "Multi-modality emotion fusion and pattern tracking")]
#[command(version)]
struct Args {
    /// Root folder holding the event journal
    #[arg(short, long, global = true)]
    root_folder: Option<PathBuf>,

    /// TOML configuration file
    #[arg(short, long, global = true, env = "MOODLENS_CONFIG")]
    config: Option<PathBuf>,

    /// Minimum records a trigger needs before it is correlated
    #[arg(long, global = true)]
    min_support: Option<usize>,

    /// Maximum recommendations per check-in
    #[arg(long, global = true)]
    max_recommendations: Option<usize>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Fuse modality signals without storing anything
    Fuse {
        /// Signal as modality=label:confidence (repeatable)
        #[arg(short, long = "signal", required = true)]
        signals: Vec<ModalitySignal>,
    },

    /// Run and persist a check-in from a JSON request ("-" reads stdin)
    CheckIn {
        #[arg(short, long)]
        input: PathBuf,
    },

    /// Summarize emotion patterns over a window (7d, 14d, 30d)
    Summarize {
        #[arg(short, long, default_value = "7d")]
        window: SummaryWindow,
    },

    /// List check-ins with the given dominant emotion
    History {
        #[arg(short, long)]
        emotion: EmotionLabel,

        #[arg(short, long, default_value = "30d")]
        window: SummaryWindow,
    },
}

fn main() -> Result<()> {
    let args = Args::parse();

    let (mut config, config_source) = TomlConfig::load_with_source(args.config.as_deref())
        .context("Failed to load configuration")?;
    if let Some(min_support) = args.min_support {
        config.patterns.min_support = min_support;
    }
    if let Some(max_recommendations) = args.max_recommendations {
        config.recommendations.max_recommendations = max_recommendations;
    }

    init_logging(&config.logging)?;
    config_source.log();

    match args.command {
        Command::Fuse { signals } => {
            let engine =
                FusionEngine::new(config.fusion.weights).context("Invalid fusion weights")?;
            let result = engine.fuse(&signals)?;
            print_json(&result)
        }
        Command::CheckIn { input } => {
            let service = open_service(args.root_folder, &config)?;
            let request = read_request(&input)?;
            check_in(&service, request)
        }
        Command::Summarize { window } => {
            let service = open_service(args.root_folder, &config)?;
            let summary = service.summarize(window)?;
            print_json(&summary)
        }
        Command::History { emotion, window } => {
            let service = open_service(args.root_folder, &config)?;
            let records = service.emotion_history(emotion, window)?;
            print_json(&records)
        }
    }
}

/// Install the tracing subscriber
///
/// `RUST_LOG` wins over the configured level.
fn init_logging(logging: &LoggingConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&logging.level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let file_layer = match &logging.file {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Failed to open log file {}", path.display()))?;
            Some(fmt::layer().with_ansi(false).with_writer(Mutex::new(file)))
        }
        None => None,
    };
    let stderr_layer = file_layer
        .is_none()
        .then(|| fmt::layer().with_writer(std::io::stderr));

    tracing_subscriber::registry()
        .with(filter)
        .with(file_layer)
        .with(stderr_layer)
        .init();

    Ok(())
}

fn open_service(cli_root: Option<PathBuf>, config: &TomlConfig) -> Result<CheckInService> {
    let root_folder = RootFolderResolver::new("moodlens")
        .with_cli_override(cli_root)
        .with_toml_root(config.root_folder.clone())
        .resolve();

    let initializer = RootFolderInitializer::new(root_folder);
    initializer
        .ensure_directory_exists()
        .context("Failed to create root folder")?;
    info!("Root folder: {}", initializer.root_folder().display());

    let store = JsonlEventStore::open(initializer.events_path())
        .context("Failed to open event journal")?;

    CheckInService::from_config(Arc::new(store), config)
        .context("Failed to initialize check-in service")
}

fn read_request(input: &Path) -> Result<CheckInRequest> {
    let content = if input.as_os_str() == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("Failed to read request from stdin")?;
        buf
    } else {
        std::fs::read_to_string(input)
            .with_context(|| format!("Failed to read request {}", input.display()))?
    };

    serde_json::from_str(&content).context("Invalid check-in request JSON")
}

fn check_in(service: &CheckInService, request: CheckInRequest) -> Result<()> {
    match service.check_in(request) {
        Ok(outcome) => print_json(&outcome),
        Err(Error::Unpersisted { record, source }) => {
            warn!("Append failed ({}), retrying once", source);
            match service.retry_append(*record) {
                Ok(outcome) => print_json(&outcome),
                Err(Error::Unpersisted { record, source }) => {
                    // Still emit the finished record so the result is not lost
                    print_json(&record)?;
                    Err(anyhow::Error::new(*source).context("Check-in was not persisted"))
                }
                Err(e) => Err(e.into()),
            }
        }
        Err(e) => Err(e.into()),
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("Failed to serialize output")?;
    println!("{}", json);
    Ok(())
}
