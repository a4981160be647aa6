use thiserror::Error;

/// Errors surfaced by the seasonal playlist sync.
///
/// Data anomalies in playlist listings (local files, missing track ids) are not
/// errors; they are skipped while the listing is turned into tracks. Everything
/// here aborts the current run and bubbles up to the CLI command.
#[derive(Error, Debug)]
pub enum SeasonifyError {
    /// Network or transport failure reported by reqwest.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The Spotify Web API answered with a non-success status.
    #[error("Spotify API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// Spotify kept answering 429 or asked for an unreasonable wait.
    #[error("Rate limited by Spotify, retry after {retry_after} seconds")]
    RateLimited { retry_after: u64 },

    /// No usable token. Run `seasonify auth` first.
    #[error("Authentication required: {0}")]
    Auth(String),

    #[error("Missing configuration value {0}")]
    MissingConfig(&'static str),

    #[error("Invalid configuration value for {key}: {value}")]
    InvalidConfig { key: &'static str, value: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, SeasonifyError>;
