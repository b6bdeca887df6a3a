//! media-import - command-line runner for clip descriptor batches
//!
//! Runs a JSON payload through the import bridge against the in-memory
//! editor, so payloads can be checked without a live editor. It handles:
//! - Configuration loading
//! - Application-level logging initialization
//! - Dry-run import and per-item reporting

use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde_json::Value;
use tracing::{error, info};

use media_import_core::bridge::{summarize, ImportBridge};
use media_import_core::config::ConfigManager;
use media_import_core::host::{EditorHost, MemoryEditor};
use media_import_core::logging::{init_tracing, init_tracing_with_file, LogLevel};
use media_import_core::orchestrator::{BatchImporter, ItemOutcome};

/// Command-line arguments for media-import
#[derive(Parser, Debug)]
#[command(name = "media-import")]
#[command(about = "Import clip descriptor batches into an editor media pool")]
#[command(version)]
struct Cli {
    /// Settings file
    #[arg(
        short,
        long,
        global = true,
        default_value = ".config/media-import.toml",
        env = "MEDIA_IMPORT_CONFIG"
    )]
    config: PathBuf,

    /// Log at debug level regardless of the configured level
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Dry-run a payload file against an in-memory editor
    Import {
        /// JSON file holding an array of clip descriptors
        payload: PathBuf,

        /// Resolve relative media paths against this directory
        #[arg(long)]
        media_root: Option<PathBuf>,
    },

    /// Manage the settings file
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigAction {
    /// Write the default settings file if it does not exist
    Init,
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    match cli.command {
        Command::Config {
            action: ConfigAction::Init,
        } => init_config(&cli.config),
        Command::Import {
            ref payload,
            ref media_root,
        } => run_import(&cli, payload, media_root.as_deref()),
    }
}

fn init_config(path: &Path) -> Result<ExitCode> {
    let existed = path.exists();
    let mut manager = ConfigManager::new(path);
    manager
        .load_or_create()
        .with_context(|| format!("Failed to initialize config at {}", path.display()))?;

    if existed {
        println!("Config already present: {}", path.display());
    } else {
        println!("Wrote default config: {}", path.display());
    }
    Ok(ExitCode::SUCCESS)
}

fn run_import(cli: &Cli, payload_path: &Path, media_root: Option<&Path>) -> Result<ExitCode> {
    let mut config = ConfigManager::new(&cli.config);
    if let Err(e) = config.load_or_create() {
        eprintln!("Warning: Failed to load config: {}. Using defaults.", e);
    }

    let settings = config.settings();
    let level = if cli.verbose {
        LogLevel::Debug
    } else {
        settings.logging.level
    };
    let _log_guard = if settings.logging.file_logging {
        init_tracing_with_file(level, &config.logs_folder())
    } else {
        init_tracing(level);
        None
    };

    info!("media-import {}", media_import_core::version());
    info!("Config: {}", cli.config.display());

    if let Err(e) = config.ensure_dirs_exist() {
        error!("Failed to create directories: {}", e);
    }

    let mut json = fs::read_to_string(payload_path)
        .with_context(|| format!("Failed to read payload {}", payload_path.display()))?;
    if let Some(root) = media_root {
        json = rebase_media_paths(&json, root)?;
    }

    let importer = BatchImporter::new(settings.import_context());
    let mut bridge = ImportBridge::new(MemoryEditor::new(), importer);

    let result = bridge.run(&json);
    let response = summarize(&result);
    println!(
        "{}",
        serde_json::to_string_pretty(&response).context("Failed to encode response")?
    );

    let Ok(outcome) = result else {
        return Ok(ExitCode::FAILURE);
    };

    for (index, item) in outcome.items.iter().enumerate() {
        match item {
            ItemOutcome::Imported(clip) => {
                let name = bridge.host().clip_name(*clip).unwrap_or_default();
                println!("[{}] ok {}", index, name);
            }
            ItemOutcome::Failed(e) => println!("[{}] error {}: {}", index, e.kind(), e),
        }
    }

    if outcome.failed() > 0 {
        Ok(ExitCode::FAILURE)
    } else {
        Ok(ExitCode::SUCCESS)
    }
}

/// Join relative `media.filePath` values onto `root`.
///
/// Text that is not a JSON array is returned untouched so the bridge
/// reports it the usual way.
fn rebase_media_paths(json: &str, root: &Path) -> Result<String> {
    let Ok(mut payload) = serde_json::from_str::<Value>(json) else {
        return Ok(json.to_string());
    };
    let Some(descriptors) = payload.as_array_mut() else {
        return Ok(json.to_string());
    };

    for descriptor in descriptors {
        let Some(path) = descriptor.pointer_mut("/media/filePath") else {
            continue;
        };
        let relative = path
            .as_str()
            .filter(|p| Path::new(p).is_relative())
            .map(str::to_string);
        if let Some(relative) = relative {
            *path = Value::String(root.join(relative).display().to_string());
        }
    }

    serde_json::to_string(&payload).context("Failed to re-encode payload")
}
