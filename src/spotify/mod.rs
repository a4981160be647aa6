//! # Spotify Integration Module
//!
//! This module is the integration layer between seasonify and the Spotify Web
//! API. It holds the OAuth flow, the HTTP client and the playlist endpoints the
//! sync engine depends on.
//!
//! ## Architecture
//!
//! ```text
//! CLI Layer
//!     ↓
//! SeasonalSync (generic over SpotifyApi)
//!     ↓
//! SpotifyClient (reqwest, bearer token from TokenManager)
//!     ↓
//! Spotify Web API
//! ```
//!
//! The engine only ever sees the [`SpotifyApi`] trait, so it can run against an
//! in-memory fake in tests and against [`SpotifyClient`] in production.
//!
//! ## Core Modules
//!
//! - [`auth`] - OAuth 2.0 PKCE: browser launch, local callback, code exchange and refresh
//! - [`client`] - authenticated requests with rate limit and gateway retries
//! - [`playlist`] - the playlist endpoints, implementing [`SpotifyApi`] for [`SpotifyClient`]
//!
//! ## Error Handling
//!
//! The client retries 429 responses that carry a `Retry-After` of at most two
//! minutes and 502/503 responses after a short pause, three attempts in total.
//! Anything else is returned to the caller as a [`SeasonifyError`]; the sync
//! engine never retries on its own.
//!
//! ## API Coverage
//!
//! - `GET /me/playlists` - playlists of the current user
//! - `POST /users/{user_id}/playlists` - create a playlist
//! - `GET /playlists/{playlist_id}/tracks` - paginated playlist items
//! - `POST /playlists/{playlist_id}/tracks` - add up to 100 items
//! - `PUT /{path}` - raw escape hatch used by the best-effort share call
//! - `POST /api/token` - token exchange and refresh

use async_trait::async_trait;
use serde_json::Value;

use crate::{
    error::{Result, SeasonifyError},
    types::{
        AddTracksResponse, CreatePlaylistRequest, CreatePlaylistResponse, Page, PlaylistItem,
        PlaylistSummary,
    },
};

pub mod auth;
pub mod client;
pub mod playlist;

pub use client::SpotifyClient;

/// Maximum number of items Spotify accepts in one add-items call.
pub const MAX_ITEMS_PER_REQUEST: usize = 100;

/// Page size used when listing playlist items.
pub const PLAYLIST_ITEMS_PAGE_SIZE: u32 = 100;

/// Page size used when listing the user's playlists.
pub const PLAYLISTS_PAGE_SIZE: u32 = 50;

/// The slice of the Spotify Web API the sync engine needs.
///
/// Pagination is driven by the caller through `offset`/`limit`; a page with
/// `next == None` is the last one.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SpotifyApi {
    /// One page of the current user's playlists.
    async fn list_owned_playlists(&self, offset: u32, limit: u32) -> Result<Page<PlaylistSummary>>;

    async fn create_playlist(
        &self,
        owner: &str,
        request: &CreatePlaylistRequest,
    ) -> Result<CreatePlaylistResponse>;

    /// One page of a playlist's items with `added_at` and the track's id, name and artists.
    async fn get_playlist_items(
        &self,
        playlist_id: &str,
        offset: u32,
        limit: u32,
    ) -> Result<Page<PlaylistItem>>;

    /// Appends at most [`MAX_ITEMS_PER_REQUEST`] uris.
    async fn add_items_to_playlist(
        &self,
        playlist_id: &str,
        uris: &[String],
    ) -> Result<AddTracksResponse>;

    /// Raw `PUT` against a path relative to the API base url.
    async fn put(&self, path: &str, payload: &Value) -> Result<()>;
}

pub(crate) fn api_error(status: u16, message: impl Into<String>) -> SeasonifyError {
    SeasonifyError::Api {
        status,
        message: message.into(),
    }
}
