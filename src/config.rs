//! Configuration management for the seasonal playlist sorter.
//!
//! Values come from environment variables, optionally seeded by a `.env` file
//! in the local data directory. They are read once into immutable structs that
//! are handed to the components needing them:
//!
//! - [`SyncConfig`] - which playlist to sort and who owns the results
//! - [`ApiConfig`] - Spotify endpoints, OAuth client settings and the callback address
//!
//! Both can be built from an arbitrary lookup function, which keeps tests away
//! from the process environment.

use std::{env, path::PathBuf};

use crate::error::{Result, SeasonifyError};

pub const DEFAULT_API_URL: &str = "https://api.spotify.com/v1";
pub const DEFAULT_AUTH_URL: &str = "https://accounts.spotify.com/authorize";
pub const DEFAULT_TOKEN_URL: &str = "https://accounts.spotify.com/api/token";
pub const DEFAULT_REDIRECT_URI: &str = "http://127.0.0.1:8888/callback";
pub const DEFAULT_SERVER_ADDRESS: &str = "127.0.0.1:8888";
pub const DEFAULT_SCOPE: &str = "playlist-read-collaborative playlist-read-private playlist-modify-public playlist-modify-private user-library-read";

/// Loads environment variables from a `.env` file in the local data directory.
///
/// The file lives at `seasonify/.env` below the platform data directory:
/// - Linux: `~/.local/share/seasonify/.env`
/// - macOS: `~/Library/Application Support/seasonify/.env`
/// - Windows: `%LOCALAPPDATA%/seasonify/.env`
///
/// The directory is created when missing. A missing file is fine since every
/// value may also come straight from the environment; a file that exists but
/// cannot be parsed is reported.
pub async fn load_env() -> Result<()> {
    let path = env_path();
    if let Some(parent) = path.parent() {
        async_fs::create_dir_all(parent).await?;
    }

    if path.is_file() {
        dotenv::from_path(&path).map_err(|e| SeasonifyError::InvalidConfig {
            key: ".env",
            value: e.to_string(),
        })?;
    }

    Ok(())
}

/// Location of the `.env` file read by [`load_env`].
pub fn env_path() -> PathBuf {
    let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push("seasonify/.env");
    path
}

/// Settings of the sync engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncConfig {
    /// `SPOTIFY_MAIN_PLAYLIST_ID` - the shared playlist that is sorted, never modified.
    pub main_playlist_id: String,
    /// `SPOTIFY_USER_ID` - owner of the seasonal playlists.
    pub user_id: String,
    /// `SPOTIFY_PARTNER_USER_ID` - the second person new playlists are shared with.
    pub partner_user_id: Option<String>,
    /// `SEASONIFY_PAIR_LABEL` - prefix of every seasonal playlist name.
    pub pair_label: String,
}

impl SyncConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        Ok(Self {
            main_playlist_id: required(&lookup, "SPOTIFY_MAIN_PLAYLIST_ID")?,
            user_id: required(&lookup, "SPOTIFY_USER_ID")?,
            partner_user_id: optional(&lookup, "SPOTIFY_PARTNER_USER_ID"),
            pair_label: required(&lookup, "SEASONIFY_PAIR_LABEL")?,
        })
    }
}

/// Spotify endpoints and OAuth settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    /// `SPOTIFY_API_URL`
    pub api_url: String,
    /// `SPOTIFY_API_AUTH_URL`
    pub auth_url: String,
    /// `SPOTIFY_API_TOKEN_URL`
    pub token_url: String,
    /// `SPOTIFY_API_AUTH_CLIENT_ID`
    pub client_id: String,
    /// `SPOTIFY_API_REDIRECT_URI`, must match the redirect registered with Spotify.
    pub redirect_uri: String,
    /// `SPOTIFY_API_AUTH_SCOPE`
    pub scope: String,
    /// `SERVER_ADDRESS`, where the OAuth callback listener binds.
    pub server_addr: String,
}

impl ApiConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        Ok(Self {
            api_url: optional(&lookup, "SPOTIFY_API_URL")
                .unwrap_or_else(|| DEFAULT_API_URL.to_string())
                .trim_end_matches('/')
                .to_string(),
            auth_url: optional(&lookup, "SPOTIFY_API_AUTH_URL")
                .unwrap_or_else(|| DEFAULT_AUTH_URL.to_string()),
            token_url: optional(&lookup, "SPOTIFY_API_TOKEN_URL")
                .unwrap_or_else(|| DEFAULT_TOKEN_URL.to_string()),
            client_id: required(&lookup, "SPOTIFY_API_AUTH_CLIENT_ID")?,
            redirect_uri: optional(&lookup, "SPOTIFY_API_REDIRECT_URI")
                .unwrap_or_else(|| DEFAULT_REDIRECT_URI.to_string()),
            scope: optional(&lookup, "SPOTIFY_API_AUTH_SCOPE")
                .unwrap_or_else(|| DEFAULT_SCOPE.to_string()),
            server_addr: optional(&lookup, "SERVER_ADDRESS")
                .unwrap_or_else(|| DEFAULT_SERVER_ADDRESS.to_string()),
        })
    }
}

fn optional<F>(lookup: &F, key: &str) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn required<F>(lookup: &F, key: &'static str) -> Result<String>
where
    F: Fn(&str) -> Option<String>,
{
    optional(lookup, key).ok_or(SeasonifyError::MissingConfig(key))
}
