use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use super::credentials::Credentials;
use crate::error::{FetchError, Result};

/// Default output directory when neither config nor flags set one.
pub const DEFAULT_OUTPUT_DIR: &str = "nuscenes";

const CONFIG_FILE_NAME: &str = "nusc.toml";

/// Download region selector, sent verbatim in the URL-resolution request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Region {
    #[default]
    Us,
    Asia,
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Region::Us => write!(f, "us"),
            Region::Asia => write!(f, "asia"),
        }
    }
}

impl FromStr for Region {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "us" => Ok(Region::Us),
            "asia" => Ok(Region::Asia),
            other => Err(format!("unknown region '{}', expected 'us' or 'asia'", other)),
        }
    }
}

/// Raw, partially-specified settings as read from a config file.
///
/// Every field is optional; `into_fetch_config` applies defaults and
/// validates that credentials ended up present.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FileConfig {
    pub username: Option<String>,
    pub password: Option<String>,
    pub output_dir: Option<PathBuf>,
    pub region: Option<Region>,
    pub delete_after_extract: Option<bool>,
}

impl FileConfig {
    /// Parse a TOML config file.
    pub fn load(path: &Path) -> Result<Self> {
        let data = fs::read_to_string(path)?;
        toml::from_str(&data)
            .map_err(|e| FetchError::Config(format!("{}: {}", path.display(), e)))
    }

    /// Locate and load the config file.
    ///
    /// An explicit path must exist; otherwise `./nusc.toml` and the platform
    /// config dir are tried in order, and an empty config is returned when
    /// none is found.
    pub fn discover(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            if !path.exists() {
                return Err(FetchError::Config(format!(
                    "config file not found: {}",
                    path.display()
                )));
            }
            return Self::load(path);
        }

        let local = Path::new(CONFIG_FILE_NAME);
        if local.exists() {
            return Self::load(local);
        }

        if let Some(path) = Self::global_path() {
            if path.exists() {
                return Self::load(&path);
            }
        }

        Ok(Self::default())
    }

    /// Platform config location, e.g. `~/.config/nusc/config.toml` on Linux.
    pub fn global_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("", "", "nusc")
            .map(|dirs| dirs.config_dir().join("config.toml"))
    }

    /// Apply `NUSC_USERNAME` / `NUSC_PASSWORD` over file values.
    pub fn merge_env(&mut self) {
        if let Some(creds) = Credentials::from_env() {
            log::debug!("using credentials from environment");
            self.username = Some(creds.username);
            self.password = Some(creds.password);
        }
    }

    /// The output directory this config resolves to, defaults applied.
    pub fn resolved_output_dir(&self) -> PathBuf {
        self.output_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_DIR))
    }

    /// Finalize into a validated `FetchConfig`.
    pub fn into_fetch_config(self) -> Result<FetchConfig> {
        let output_dir = self.resolved_output_dir();
        let (username, password) = match (self.username, self.password) {
            (Some(u), Some(p)) => (u, p),
            _ => {
                return Err(FetchError::Config(
                    "no credentials configured; set username/password in nusc.toml \
                     or NUSC_USERNAME/NUSC_PASSWORD in the environment"
                        .to_string(),
                ))
            }
        };

        Ok(FetchConfig {
            credentials: Credentials::new(username, password),
            output_dir,
            region: self.region.unwrap_or_default(),
            delete_after_extract: self.delete_after_extract.unwrap_or(false),
        })
    }
}

/// Fully-resolved settings handed to the fetcher.
#[derive(Debug, Clone)]
pub struct FetchConfig {
    pub credentials: Credentials,
    pub output_dir: PathBuf,
    pub region: Region,
    pub delete_after_extract: bool,
}
