use async_trait::async_trait;
use serde_json::Value;

use crate::{
    error::Result,
    spotify::{SpotifyApi, SpotifyClient, api_error, MAX_ITEMS_PER_REQUEST},
    types::{
        AddTracksRequest, AddTracksResponse, CreatePlaylistRequest, CreatePlaylistResponse, Page,
        PlaylistItem, PlaylistSummary,
    },
};

/// Only the fields the sync needs, which keeps large playlists cheap to list.
const PLAYLIST_ITEM_FIELDS: &str = "items(added_at,track(id,name,artists(name))),total,next";

#[async_trait]
impl SpotifyApi for SpotifyClient {
    async fn list_owned_playlists(&self, offset: u32, limit: u32) -> Result<Page<PlaylistSummary>> {
        self.get_json(
            "me/playlists",
            &[("offset", offset.to_string()), ("limit", limit.to_string())],
        )
        .await
    }

    async fn create_playlist(
        &self,
        owner: &str,
        request: &CreatePlaylistRequest,
    ) -> Result<CreatePlaylistResponse> {
        self.post_json(&format!("users/{}/playlists", owner), request)
            .await
    }

    async fn get_playlist_items(
        &self,
        playlist_id: &str,
        offset: u32,
        limit: u32,
    ) -> Result<Page<PlaylistItem>> {
        self.get_json(
            &format!("playlists/{}/tracks", playlist_id),
            &[
                ("fields", PLAYLIST_ITEM_FIELDS.to_string()),
                ("additional_types", "track".to_string()),
                ("offset", offset.to_string()),
                ("limit", limit.to_string()),
            ],
        )
        .await
    }

    async fn add_items_to_playlist(
        &self,
        playlist_id: &str,
        uris: &[String],
    ) -> Result<AddTracksResponse> {
        if uris.len() > MAX_ITEMS_PER_REQUEST {
            return Err(api_error(
                400,
                format!(
                    "at most {} items can be added per request, got {}",
                    MAX_ITEMS_PER_REQUEST,
                    uris.len()
                ),
            ));
        }

        let request = AddTracksRequest {
            uris: uris.to_vec(),
        };

        self.post_json(&format!("playlists/{}/tracks", playlist_id), &request)
            .await
    }

    async fn put(&self, path: &str, payload: &Value) -> Result<()> {
        self.put_json(path, payload).await
    }
}
