//! subs-export - Export YouTube subscriptions and extract channel IDs.
//!
//! Fetches the authenticated user's subscription list page by page, keeps a
//! JSON snapshot of the raw items, and derives a deduplicated list of
//! channel IDs for downstream tools.
//!
//!   subs-export sync                      # fetch, save snapshot, print IDs
//!   subs-export sync -o channels.txt      # write IDs to a file instead
//!   subs-export extract -f json           # IDs from an existing snapshot
//!   subs-export check-config              # verify credentials resolve

mod application;
mod cli;
mod domain;
mod infrastructure;

use std::fs;
use std::path::Path;

use clap::Parser;
use colored::Colorize;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use application::{
    extract_from_snapshot, format_channel_ids, format_summary, OutputFormat, Pipeline,
    SubscriptionFetcher,
};
use cli::{Cli, Commands};
use domain::{AppConfig, AppError, CredentialSource, Credentials, ExtractionReport, PipelineError};
use infrastructure::{
    ensure_settings_exist, load_settings, settings_file_path, ConfigLoader, HttpSubscriptionsApi,
    TracingReporter,
};

/// How a successful invocation ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RunStatus {
    Success,
    /// IDs were produced but the snapshot could not be saved.
    Degraded,
}

impl RunStatus {
    const fn code(self) -> i32 {
        match self {
            Self::Success => 0,
            Self::Degraded => 2,
        }
    }
}

fn main() {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose);

    match run(cli) {
        Ok(status) => std::process::exit(status.code()),
        Err(e) => {
            eprintln!("{} {}", "Error:".red().bold(), e);
            if let AppError::Pipeline {
                source: PipelineError::Fetch(fetch),
            } = &e
            {
                if fetch.is_retryable() {
                    eprintln!("{} Transient failure, safe to retry later", "↻".yellow());
                }
            }
            std::process::exit(1);
        }
    }
}

/// Main application logic.
fn run(cli: Cli) -> domain::Result<RunStatus> {
    let format = cli
        .output_format()
        .map_err(|message| AppError::Config { message })?;

    let mut config = load_settings(cli.settings.as_deref())?;
    if let Some(path) = cli.credentials {
        config.credentials.file = path;
    }

    match cli.command {
        Commands::Sync {
            snapshot,
            page_size,
            output,
        } => {
            if let Some(path) = snapshot {
                config.paths.snapshot = path;
            }
            if let Some(size) = page_size {
                config.api.page_size = size;
            }
            cmd_sync(&config, output.as_deref(), format)
        }
        Commands::Extract { snapshot, output } => {
            let path = snapshot.unwrap_or_else(|| config.paths.snapshot.clone());
            cmd_extract(&path, output.as_deref(), format)
        }
        Commands::CheckConfig => cmd_check_config(&config),
        Commands::Paths => cmd_paths(&config, cli.settings.as_deref()),
        Commands::Init => cmd_init(cli.settings.as_deref()),
    }
}

/// Full sync: credentials, fetch, snapshot, extract.
fn cmd_sync(
    config: &AppConfig,
    output: Option<&Path>,
    format: OutputFormat,
) -> domain::Result<RunStatus> {
    let api = HttpSubscriptionsApi::new(&config.api).map_err(|e| AppError::Config {
        message: e.message,
    })?;
    let reporter = TracingReporter;

    let mut pipeline = Pipeline::new(
        ConfigLoader::from_settings(&config.credentials),
        SubscriptionFetcher::new(api, config.effective_page_size()),
        config.paths.snapshot.clone(),
        &reporter,
    );
    let outcome = pipeline.run()?;

    emit_channel_ids(&outcome.report, output, format)?;
    eprintln!("{}", format_summary(&outcome.report));

    match &outcome.persist_error {
        None => {
            eprintln!(
                "{} Snapshot saved to {}",
                "✓".green().bold(),
                outcome.snapshot_path.display()
            );
            Ok(RunStatus::Success)
        }
        Some(err) => {
            eprintln!(
                "{} Snapshot not saved ({}): {}",
                "⚠".yellow().bold(),
                err.kind(),
                err
            );
            Ok(RunStatus::Degraded)
        }
    }
}

/// Extract channel IDs from a snapshot on disk.
fn cmd_extract(
    snapshot: &Path,
    output: Option<&Path>,
    format: OutputFormat,
) -> domain::Result<RunStatus> {
    let report = extract_from_snapshot(snapshot, &TracingReporter)?;

    emit_channel_ids(&report, output, format)?;
    eprintln!("{}", format_summary(&report));

    Ok(RunStatus::Success)
}

/// Resolve credentials without touching the network.
fn cmd_check_config(config: &AppConfig) -> domain::Result<RunStatus> {
    let loader = ConfigLoader::from_settings(&config.credentials);
    let (credentials, source) = loader.load_with_source().map_err(PipelineError::from)?;

    println!("{} Credentials resolved", "✓".green().bold());
    println!("  Kind: {}", credentials.kind().cyan());
    println!("  Source: {}", source.to_string().cyan());
    println!("  File: {}", loader.path().display());
    println!("  Environment variable: {}", loader.secret_env());

    if let Credentials::OAuth { .. } = credentials {
        // The bearer header carries the secret verbatim.
        println!(
            "{} OAuth requests send the secret as a bearer token; {} must hold an access token",
            "⚠".yellow().bold(),
            loader.secret_env()
        );
        if source == CredentialSource::File {
            println!(
                "  A client secret from {} alone will be rejected by the API",
                loader.path().display()
            );
        }
    }

    Ok(RunStatus::Success)
}

/// Show paths command.
fn cmd_paths(config: &AppConfig, settings: Option<&Path>) -> domain::Result<RunStatus> {
    let settings = settings.map_or_else(settings_file_path, Path::to_path_buf);

    println!("{}", "📂 subs-export paths".bold());
    println!();
    println!("  Settings:    {}", path_with_status(&settings));
    println!("  Credentials: {}", path_with_status(&config.credentials.file));
    println!("  Snapshot:    {}", path_with_status(&config.paths.snapshot));
    println!("  Secret env:  {}", config.credentials.secret_env);

    Ok(RunStatus::Success)
}

/// Create default settings command.
fn cmd_init(settings: Option<&Path>) -> domain::Result<RunStatus> {
    let path = settings.map_or_else(settings_file_path, Path::to_path_buf);

    if ensure_settings_exist(&path)? {
        println!("{} Created {}", "✓".green().bold(), path.display());
    } else {
        println!("{} {} already exists", "•".blue(), path.display());
    }

    Ok(RunStatus::Success)
}

/// Print channel IDs to stdout or write them to `output`.
fn emit_channel_ids(
    report: &ExtractionReport,
    output: Option<&Path>,
    format: OutputFormat,
) -> domain::Result<()> {
    let content = format_channel_ids(&report.channel_ids, format).map_err(AppError::json_parse)?;

    match output {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent).map_err(|e| {
                    AppError::io(format!("Failed to create {}", parent.display()), e)
                })?;
            }
            fs::write(path, format!("{content}\n"))
                .map_err(|e| AppError::io(format!("Failed to write {}", path.display()), e))?;
            eprintln!(
                "{} Wrote {} channel IDs to {}",
                "✓".green().bold(),
                report.channel_ids.len(),
                path.display()
            );
        }
        None => {
            if !content.is_empty() {
                println!("{content}");
            }
        }
    }

    Ok(())
}

fn path_with_status(path: &Path) -> String {
    let label = if path.exists() {
        "found".green()
    } else {
        "missing".yellow()
    };
    format!("{} [{}]", path.display(), label)
}

/// Setup tracing/logging based on verbosity level.
fn setup_logging(verbosity: u8) {
    let filter = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(false)
                .without_time()
                .with_writer(std::io::stderr),
        )
        .with(filter)
        .init();
}
