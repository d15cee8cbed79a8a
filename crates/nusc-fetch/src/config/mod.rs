//! Configuration for the fetcher.
//!
//! Settings are merged from three sources (highest priority first):
//!
//! 1. Command-line flags (applied by the caller on the loaded config)
//! 2. Environment variables (`NUSC_USERNAME`, `NUSC_PASSWORD`)
//! 3. A TOML config file
//!
//! The config file is located from an explicit path, else `./nusc.toml`,
//! else `<platform config dir>/nusc/config.toml`.
//!
//! # nusc.toml format
//!
//! ```toml
//! username = "user@example.org"
//! password = "secret"
//! output_dir = "/data/nuscenes"
//! region = "us"              # "us" or "asia"
//! delete_after_extract = true
//! ```

mod config;
mod credentials;

pub use config::{FetchConfig, FileConfig, Region, DEFAULT_OUTPUT_DIR};
pub use credentials::Credentials;
