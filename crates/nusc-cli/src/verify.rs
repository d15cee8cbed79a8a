//! Verify command - check local archives against the catalog.

use anyhow::Result;
use clap::Args;
use console::style;
use std::path::PathBuf;
use std::process::ExitCode;

use nusc_fetch::{verify_checksum, ArchiveCatalog, ChecksumType, FileConfig};

#[derive(Args, Debug)]
pub struct VerifyArgs {
    /// Path to the config file (defaults to ./nusc.toml, then the user config dir)
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Directory holding the downloaded archives
    #[arg(long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Restrict to the named catalog entries (repeatable)
    #[arg(long, value_name = "FILENAME")]
    pub only: Vec<String>,
}

pub async fn run(args: VerifyArgs) -> Result<ExitCode> {
    let file_config = FileConfig::discover(args.config.as_deref())?;
    let output_dir = args
        .output_dir
        .unwrap_or_else(|| file_config.resolved_output_dir());

    let mut catalog = ArchiveCatalog::trainval();
    if !args.only.is_empty() {
        for name in catalog.retain(&args.only) {
            eprintln!(
                "{} {} is not in the catalog",
                style("warning:").yellow().bold(),
                name
            );
        }
    }

    let mut mismatched = 0usize;
    for (filename, expected) in catalog.iter() {
        let path = output_dir.join(filename);
        if !path.exists() {
            println!("  {} {}", style("missing ").dim(), filename);
            continue;
        }

        let checksum_type = ChecksumType::from_hex_length(expected.len())
            .ok_or_else(|| anyhow::anyhow!("unrecognized digest length for {}", filename))?;
        if verify_checksum(&path, expected, checksum_type).await? {
            println!("  {} {}", style("verified").green(), filename);
        } else {
            mismatched += 1;
            println!("  {} {}", style("corrupt ").red().bold(), filename);
        }
    }

    if mismatched > 0 {
        println!(
            "{} {} archive(s) failed verification",
            style("error:").red().bold(),
            mismatched
        );
        return Ok(ExitCode::FAILURE);
    }
    Ok(ExitCode::SUCCESS)
}
