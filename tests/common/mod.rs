#![allow(dead_code)]

use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use serde_json::Value;

use seasonify::{
    config::SyncConfig,
    error::{Result, SeasonifyError},
    spotify::SpotifyApi,
    types::{
        AddTracksResponse, CreatePlaylistRequest, CreatePlaylistResponse, ItemArtist, ItemTrack,
        Page, PlaylistItem, PlaylistOwner, PlaylistSummary,
    },
};

pub const USER: &str = "me";
pub const MAIN: &str = "main";

pub fn at(year: i32, month: u32, day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, 12, 0, 0).unwrap()
}

pub fn config(partner: Option<&str>) -> SyncConfig {
    SyncConfig {
        main_playlist_id: MAIN.to_string(),
        user_id: USER.to_string(),
        partner_user_id: partner.map(str::to_string),
        pair_label: "a + b".to_string(),
    }
}

pub fn item(id: &str, added_at: DateTime<Utc>) -> PlaylistItem {
    PlaylistItem {
        added_at: Some(added_at),
        track: Some(ItemTrack {
            id: Some(id.to_string()),
            name: format!("Song {}", id),
            artists: vec![ItemArtist {
                name: "Artist".to_string(),
            }],
        }),
    }
}

pub fn local_item(added_at: DateTime<Utc>) -> PlaylistItem {
    PlaylistItem {
        added_at: Some(added_at),
        track: Some(ItemTrack {
            id: None,
            name: "local file".to_string(),
            artists: Vec::new(),
        }),
    }
}

pub fn empty_item(added_at: DateTime<Utc>) -> PlaylistItem {
    PlaylistItem {
        added_at: Some(added_at),
        track: None,
    }
}

pub struct FakePlaylist {
    pub summary: PlaylistSummary,
    pub items: Vec<PlaylistItem>,
}

#[derive(Default)]
pub struct FakeState {
    pub playlists: Vec<FakePlaylist>,
    pub created: Vec<CreatePlaylistRequest>,
    pub item_requests: Vec<(String, u32, u32)>,
    pub add_calls: Vec<(String, Vec<String>)>,
    pub put_calls: Vec<String>,
    pub fail_put: bool,
}

/// In-memory Spotify account with paginated listings.
#[derive(Default)]
pub struct FakeSpotify {
    pub state: Mutex<FakeState>,
}

impl FakeSpotify {
    pub fn with_main(items: Vec<PlaylistItem>) -> Self {
        let fake = Self::default();
        fake.add_playlist(MAIN, "our playlist", "partner", items);
        fake
    }

    pub fn add_playlist(&self, id: &str, name: &str, owner: &str, items: Vec<PlaylistItem>) {
        self.state.lock().unwrap().playlists.push(FakePlaylist {
            summary: PlaylistSummary {
                id: id.to_string(),
                name: name.to_string(),
                owner: PlaylistOwner {
                    id: owner.to_string(),
                },
            },
            items,
        });
    }

    pub fn playlist_names(&self) -> Vec<String> {
        self.state
            .lock()
            .unwrap()
            .playlists
            .iter()
            .map(|p| p.summary.name.clone())
            .collect()
    }

    pub fn track_ids_of(&self, name: &str) -> Vec<String> {
        self.state
            .lock()
            .unwrap()
            .playlists
            .iter()
            .find(|p| p.summary.name == name)
            .map(|p| {
                p.items
                    .iter()
                    .filter_map(|i| i.track.as_ref()?.id.clone())
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn created_count(&self) -> usize {
        self.state.lock().unwrap().created.len()
    }

    pub fn add_call_sizes(&self) -> Vec<usize> {
        self.state
            .lock()
            .unwrap()
            .add_calls
            .iter()
            .map(|(_, uris)| uris.len())
            .collect()
    }
}

fn page_of<T: Clone>(all: &[T], offset: u32, limit: u32) -> Page<T> {
    let start = (offset as usize).min(all.len());
    let end = (start + limit as usize).min(all.len());
    Page {
        items: all[start..end].to_vec(),
        total: Some(all.len() as u64),
        next: (end < all.len()).then(|| format!("offset={}", end)),
    }
}

fn not_found(id: &str) -> SeasonifyError {
    SeasonifyError::Api {
        status: 404,
        message: format!("no playlist {}", id),
    }
}

#[async_trait]
impl SpotifyApi for FakeSpotify {
    async fn list_owned_playlists(&self, offset: u32, limit: u32) -> Result<Page<PlaylistSummary>> {
        let state = self.state.lock().unwrap();
        let summaries: Vec<PlaylistSummary> =
            state.playlists.iter().map(|p| p.summary.clone()).collect();
        Ok(page_of(&summaries, offset, limit))
    }

    async fn create_playlist(
        &self,
        owner: &str,
        request: &CreatePlaylistRequest,
    ) -> Result<CreatePlaylistResponse> {
        let mut state = self.state.lock().unwrap();
        let id = format!("created-{}", state.created.len());
        state.created.push(request.clone());
        state.playlists.push(FakePlaylist {
            summary: PlaylistSummary {
                id: id.clone(),
                name: request.name.clone(),
                owner: PlaylistOwner {
                    id: owner.to_string(),
                },
            },
            items: Vec::new(),
        });

        Ok(CreatePlaylistResponse {
            id,
            name: request.name.clone(),
        })
    }

    async fn get_playlist_items(
        &self,
        playlist_id: &str,
        offset: u32,
        limit: u32,
    ) -> Result<Page<PlaylistItem>> {
        let mut state = self.state.lock().unwrap();
        state
            .item_requests
            .push((playlist_id.to_string(), offset, limit));
        let playlist = state
            .playlists
            .iter()
            .find(|p| p.summary.id == playlist_id)
            .ok_or_else(|| not_found(playlist_id))?;
        Ok(page_of(&playlist.items, offset, limit))
    }

    async fn add_items_to_playlist(
        &self,
        playlist_id: &str,
        uris: &[String],
    ) -> Result<AddTracksResponse> {
        let mut state = self.state.lock().unwrap();
        state
            .add_calls
            .push((playlist_id.to_string(), uris.to_vec()));
        let playlist = state
            .playlists
            .iter_mut()
            .find(|p| p.summary.id == playlist_id)
            .ok_or_else(|| not_found(playlist_id))?;
        for uri in uris {
            let id = uri.trim_start_matches("spotify:track:");
            playlist.items.push(item(id, Utc::now()));
        }

        Ok(AddTracksResponse {
            snapshot_id: format!("snapshot-{}", playlist.items.len()),
        })
    }

    async fn put(&self, path: &str, _payload: &Value) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        state.put_calls.push(path.to_string());
        if state.fail_put {
            return Err(SeasonifyError::Api {
                status: 403,
                message: "not allowed".to_string(),
            });
        }
        Ok(())
    }
}
