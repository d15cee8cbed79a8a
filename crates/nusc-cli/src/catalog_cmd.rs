//! Catalog command - print the built-in archive catalog.

use anyhow::Result;
use console::style;
use std::process::ExitCode;

use nusc_fetch::ArchiveCatalog;

pub fn run() -> Result<ExitCode> {
    for (filename, digest) in ArchiveCatalog::trainval().iter() {
        println!("{}  {}", style(digest).dim(), filename);
    }
    Ok(ExitCode::SUCCESS)
}
