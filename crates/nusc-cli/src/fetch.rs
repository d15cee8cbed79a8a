//! Fetch command - download, verify, and extract the catalog.

use anyhow::Result;
use clap::Args;
use console::style;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use nusc_fetch::{
    AbandonReason, ArchiveCatalog, EntryState, FetchError, Fetcher, FileConfig, HttpClient, Region,
};

use crate::progress::ProgressManager;

#[derive(Args, Debug)]
pub struct FetchArgs {
    /// Path to the config file (defaults to ./nusc.toml, then the user config dir)
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Directory archives are downloaded to and extracted into
    #[arg(long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Download region (us or asia)
    #[arg(long, value_name = "REGION")]
    pub region: Option<Region>,

    /// Delete each archive after successful extraction
    #[arg(long, conflicts_with = "keep_archives")]
    pub delete_after_extract: bool,

    /// Keep archives after extraction (overrides the config file)
    #[arg(long)]
    pub keep_archives: bool,

    /// Restrict the run to the named catalog entries (repeatable)
    #[arg(long, value_name = "FILENAME")]
    pub only: Vec<String>,

    /// Disable download progress bars
    #[arg(long)]
    pub no_progress: bool,
}

/// Apply command-line flags over the file/env configuration.
fn apply_flags(config: &mut FileConfig, args: &FetchArgs) {
    if let Some(dir) = &args.output_dir {
        config.output_dir = Some(dir.clone());
    }
    if let Some(region) = args.region {
        config.region = Some(region);
    }
    if args.delete_after_extract {
        config.delete_after_extract = Some(true);
    }
    if args.keep_archives {
        config.delete_after_extract = Some(false);
    }
}

fn abandon_label(reason: AbandonReason) -> &'static str {
    match reason {
        AbandonReason::UrlResolution => "no url",
        AbandonReason::Download => "download failed",
        AbandonReason::IntegrityMismatch => "checksum mismatch",
        AbandonReason::Extraction => "extraction failed",
        AbandonReason::Filesystem => "io error",
    }
}

pub async fn run(args: FetchArgs) -> Result<ExitCode> {
    let mut file_config = FileConfig::discover(args.config.as_deref())?;
    file_config.merge_env();
    apply_flags(&mut file_config, &args);
    let config = file_config.into_fetch_config()?;

    let mut catalog = ArchiveCatalog::trainval();
    if !args.only.is_empty() {
        for name in catalog.retain(&args.only) {
            eprintln!(
                "{} {} is not in the catalog",
                style("warning:").yellow().bold(),
                name
            );
        }
        if catalog.is_empty() {
            anyhow::bail!("no catalog entries left to fetch");
        }
    }

    println!(
        "{} fetching {} archive(s) into {}",
        style("nusc").green().bold(),
        catalog.len(),
        config.output_dir.display()
    );

    let transport = Arc::new(HttpClient::new()?);
    let progress = ProgressManager::new(!args.no_progress);
    let fetcher =
        Fetcher::new(config, catalog, transport).with_progress(progress.download_callback());

    let report = match fetcher.run().await {
        Ok(report) => report,
        Err(e @ FetchError::AuthenticationFailed { .. }) => {
            // Fatal before any download; surfaces as a non-zero exit.
            return Err(anyhow::Error::new(e).context("nothing was downloaded"));
        }
        Err(e) => return Err(e.into()),
    };
    progress.clear();

    for outcome in &report.outcomes {
        match outcome.state {
            EntryState::Done => {
                println!("  {} {}", style("done   ").green(), outcome.filename)
            }
            EntryState::Abandoned(reason) => println!(
                "  {} {} ({})",
                style("skipped").red().bold(),
                outcome.filename,
                abandon_label(reason)
            ),
            // run() only ever reports terminal states.
            _ => {}
        }
    }

    let failed = report.abandoned().count();
    if failed > 0 {
        println!(
            "{} {} of {} archive(s) were not processed; rerun to retry them",
            style("warning:").yellow().bold(),
            failed,
            report.outcomes.len()
        );
    } else {
        println!("{} all archives processed", style("nusc").green().bold());
    }

    // Per-entry failures are reported above but never change the exit status.
    Ok(ExitCode::SUCCESS)
}
