//! dsync CLI - one-way local-to-Dropbox directory synchronization
//!
//! Wires configuration, token acquisition, and tracing around the
//! engine's single `synchronize` entry point, then prints the report.
//! The process exits 0 even when individual files failed; the report
//! enumerates every failure.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use dsync_core::config::SyncConfig;
use dsync_core::domain::ignore::IgnoreSet;
use dsync_core::domain::report::SyncReport;
use dsync_dropbox::{resolve_token, DropboxClient};
use dsync_sync::synchronize;

#[derive(Debug, Parser)]
#[command(name = "dsync", version, about = "Sync a given directory to Dropbox")]
struct Cli {
    /// Local directory to upload
    directory: PathBuf,

    /// Compute and report decisions without uploading anything
    #[arg(short = 'n', long)]
    dryrun: bool,

    /// Access token (see https://www.dropbox.com/developers/apps); falls
    /// back to the DSYNC_ACCESS_TOKEN environment variable
    #[arg(short = 't', long)]
    access_token: Option<String>,

    /// Path to the ignore file, one path segment per line
    #[arg(short = 'i', long)]
    ignore: Option<PathBuf>,

    /// Upload chunk size in MiB
    #[arg(short = 's', long)]
    chunk_size_mb: Option<u64>,

    /// Maximum number of concurrent transfers
    #[arg(short = 'j', long)]
    concurrency: Option<u32>,

    /// Remote destination folder name (defaults to the directory's base name)
    #[arg(short = 'd', long)]
    destination: Option<String>,

    /// Use alternate config file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Print the final report as JSON
    #[arg(long)]
    json: bool,

    /// Verbose output (can be repeated: -v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    /// Resolves the effective config: file first, flags override
    fn resolve_config(&self) -> Result<SyncConfig> {
        let mut config = match &self.config {
            Some(path) => SyncConfig::load(path)
                .with_context(|| format!("Failed to load config from {}", path.display()))?,
            None => SyncConfig::default(),
        };
        if let Some(destination) = &self.destination {
            config.destination = Some(destination.clone());
        }
        if let Some(chunk_size_mb) = self.chunk_size_mb {
            config.chunk_size_mb = chunk_size_mb;
        }
        if let Some(concurrency) = self.concurrency {
            config.max_concurrent = concurrency;
        }
        config.validate()?;
        Ok(config)
    }

    /// Loads the ignore set from the flag, the config, or nothing
    fn resolve_ignore(&self, config: &SyncConfig) -> Result<IgnoreSet> {
        match self.ignore.as_ref().or(config.ignore_file.as_ref()) {
            Some(path) => Ok(IgnoreSet::load(path)?),
            None => Ok(IgnoreSet::empty()),
        }
    }
}

fn print_report(report: &SyncReport, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(report)?);
        return Ok(());
    }
    println!(
        "{} created, {} overwritten, {} skipped, {} failed ({} files in {} ms)",
        report.created,
        report.overwritten,
        report.skipped,
        report.failed,
        report.total(),
        report.duration_ms,
    );
    for failure in &report.failures {
        eprintln!("  failed: {}: {}", failure.path, failure.error);
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup tracing
    let filter = match cli.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .init();

    let config = cli.resolve_config()?;
    let ignore = cli.resolve_ignore(&config)?;
    let token = resolve_token(cli.access_token.clone())?;
    let store = Arc::new(DropboxClient::new(token));

    let report = synchronize(store, &config, &cli.directory, cli.dryrun, ignore).await?;
    print_report(&report, cli.json)?;

    // Per-file failures are reported, not fatal
    Ok(())
}
