use thiserror::Error;

#[derive(Error, Debug)]
pub enum FetchError {
    // Authentication errors (fatal at startup, before any entry is processed)
    #[error("Authentication failed: {reason}")]
    AuthenticationFailed { reason: String },

    // Per-entry errors
    #[error("Extraction failed for {archive}: {reason}")]
    ExtractionFailed { archive: String, reason: String },

    #[error("Download failed for {filename}: {reason}")]
    DownloadFailed { filename: String, reason: String },

    // Network errors
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("HTTP {status}: {url}")]
    HttpStatus { status: u16, url: String },

    // IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // Config errors
    #[error("Configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, FetchError>;
