//! Seasonal Playlist Sorter Library
//!
//! This library sorts the songs of one shared Spotify playlist into seasonal
//! playlists ("<pair> spring 2025", "<pair> winter 2026", ...) based on the
//! moment each song was added. It includes the season calendar, the
//! reconciliation between the main playlist and the seasonal playlists, a
//! Spotify Web API client and the OAuth glue needed to talk to it.
//!
//! # Modules
//!
//! - `api` - HTTP endpoints for the local OAuth callback server
//! - `cli` - Command-line interface implementations
//! - `config` - Configuration loading from `.env` files and environment variables
//! - `error` - Error type shared by every fallible operation
//! - `management` - Token cache and the seasonal playlist sync engine
//! - `season` - Season calendar: windows, boundaries and year labels
//! - `server` - Local HTTP server for OAuth callbacks
//! - `spotify` - Spotify Web API client implementation
//! - `types` - Data structures and type definitions
//! - `utils` - PKCE helpers and pure track list operations
//!
//! # Example
//!
//! ```
//! use seasonify::{config, management::SeasonalSync, spotify::SpotifyClient};
//!
//! #[tokio::main]
//! async fn main() -> seasonify::error::Result<()> {
//!     config::load_env().await?;
//!     let api = config::ApiConfig::from_env()?;
//!     let sync = SeasonalSync::new(
//!         SpotifyClient::connect(&api).await?,
//!         config::SyncConfig::from_env()?,
//!     );
//!     sync.run_incremental_and_check(chrono::Utc::now()).await?;
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod cli;
pub mod config;
pub mod error;
pub mod management;
pub mod season;
pub mod server;
pub mod spotify;
pub mod types;
pub mod utils;

/// Prints an informational message with a blue bullet point.
///
/// Creates a formatted output line with a distinctive blue "o" indicator
/// followed by the provided message. Used for general information and
/// status updates throughout the application.
///
/// # Example
///
/// ```
/// info!("Current season: {} {}", season, year);
/// ```
#[macro_export]
macro_rules! info {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "o".blue().bold(), std::format_args!($($arg)*));
  })
}

/// Prints a success message with a green checkmark.
///
/// Used to provide positive feedback when operations complete successfully.
///
/// # Example
///
/// ```
/// success!("Added {} tracks to {}", count, playlist_name);
/// ```
#[macro_export]
macro_rules! success {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "✓".green().bold(), std::format_args!($($arg)*));
  })
}

/// Prints an error message with a red exclamation mark and exits the program.
///
/// Terminates the program with exit code 1 right after printing. Only the CLI
/// layer uses this; library code returns errors instead.
///
/// # Example
///
/// ```
/// error!("Sync failed: {}", e);
/// // Program exits here - code after this will not execute
/// ```
#[macro_export]
macro_rules! error {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "!".red().bold(), std::format_args!($($arg)*));
    std::process::exit(1);
  })
}

/// Prints a warning message with a yellow exclamation mark.
///
/// Used for recoverable issues, for example a failed best-effort share call.
///
/// # Example
///
/// ```
/// warning!("Could not share playlist {}: {}", id, e);
/// ```
#[macro_export]
macro_rules! warning {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "!".yellow().bold(), std::format_args!($($arg)*));
  })
}
