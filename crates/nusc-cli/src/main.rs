mod catalog_cmd;
mod fetch;
mod progress;
mod verify;

use clap::{Parser, Subcommand};
use console::style;
use std::process::ExitCode;

#[derive(Parser, Debug)]
#[command(name = "nusc")]
#[command(about = "Batch downloader for nuScenes dataset archives")]
#[command(version)]
struct Args {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Download, verify, and extract the archive catalog
    Fetch(fetch::FetchArgs),
    /// Check local archives against the catalog without downloading
    Verify(verify::VerifyArgs),
    /// Print the built-in archive catalog
    Catalog,
}

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::init();

    let args = Args::parse();
    log::debug!("parsed arguments: {:?}", args);

    let result = match args.command {
        Commands::Fetch(args) => fetch::run(args).await,
        Commands::Verify(args) => verify::run(args).await,
        Commands::Catalog => catalog_cmd::run(),
    };

    match result {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{} {:#}", style("error:").red().bold(), e);
            ExitCode::FAILURE
        }
    }
}
