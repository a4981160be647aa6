//! Seasonal playlist sync.
//!
//! [`SeasonalSync`] keeps no state between runs. Each run re-reads the main
//! playlist and the seasonal playlists it touches, recomputes what is missing
//! and appends it, so repeated runs without new songs change nothing.

use std::collections::HashSet;

use chrono::{DateTime, Datelike, Utc};
use serde_json::json;

use crate::{
    config::SyncConfig,
    error::Result,
    info,
    season::{self, Season, SeasonWindow},
    spotify::{MAX_ITEMS_PER_REQUEST, PLAYLIST_ITEMS_PAGE_SIZE, PLAYLISTS_PAGE_SIZE, SpotifyApi},
    success,
    types::{CreatePlaylistRequest, PlaylistItem, SeasonalPlaylist, Track},
    utils, warning,
};

/// Outcome of syncing one season window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncReport {
    pub window: SeasonWindow,
    pub playlist: SeasonalPlaylist,
    pub added: usize,
}

/// Outcome of a retroactive replay over past windows.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RetroactiveReport {
    pub windows: Vec<SyncReport>,
}

impl RetroactiveReport {
    pub fn added(&self) -> usize {
        self.windows.iter().map(|w| w.added).sum()
    }

    pub fn created(&self) -> usize {
        self.windows.iter().filter(|w| w.playlist.created).count()
    }
}

pub struct SeasonalSync<C> {
    client: C,
    config: SyncConfig,
}

impl<C: SpotifyApi> SeasonalSync<C> {
    pub fn new(client: C, config: SyncConfig) -> Self {
        Self { client, config }
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    /// Every item of a playlist, following pagination until Spotify reports no next page.
    pub async fn load_playlist_items(&self, playlist_id: &str) -> Result<Vec<PlaylistItem>> {
        let mut items = Vec::new();
        let mut offset = 0;

        loop {
            let page = self
                .client
                .get_playlist_items(playlist_id, offset, PLAYLIST_ITEMS_PAGE_SIZE)
                .await?;
            let received = page.items.len() as u32;
            items.extend(page.items);

            if page.next.is_none() || received == 0 {
                break;
            }
            offset += received;
        }

        Ok(items)
    }

    /// Tracks of `playlist_id` added at or after `since` (all of them without it), newest first.
    pub async fn list_tracks_added_since(
        &self,
        playlist_id: &str,
        since: Option<DateTime<Utc>>,
    ) -> Result<Vec<Track>> {
        let items = self.load_playlist_items(playlist_id).await?;
        let tracks = utils::tracks_from_items(items, since);

        if !tracks.is_empty() {
            info!("Most recently added tracks:");
            for (i, track) in tracks.iter().take(5).enumerate() {
                info!("  {}. {} (added {})", i + 1, track.name, track.added_at);
            }
        }

        Ok(tracks)
    }

    /// Ids of the tracks currently in `playlist_id`.
    pub async fn load_membership(&self, playlist_id: &str) -> Result<HashSet<String>> {
        let items = self.load_playlist_items(playlist_id).await?;
        Ok(utils::track_ids(&items))
    }

    /// Looks up the playlist for `season`/`year` owned by the configured user,
    /// creating it when none exists yet.
    pub async fn find_or_create_seasonal_playlist(
        &self,
        season: Season,
        year: i32,
    ) -> Result<SeasonalPlaylist> {
        let name = utils::playlist_name(&self.config.pair_label, season, year);

        if let Some(id) = self.find_owned_playlist(&name).await? {
            info!("Found existing playlist: {}", name);
            return Ok(SeasonalPlaylist {
                id,
                name,
                created: false,
            });
        }

        info!("Creating new playlist: {}", name);
        let request = CreatePlaylistRequest {
            name: name.clone(),
            description: utils::playlist_description(season, year),
            public: false,
            collaborative: false,
        };
        let created = self
            .client
            .create_playlist(&self.config.user_id, &request)
            .await?;

        if let Some(partner) = &self.config.partner_user_id {
            match self.share_playlist(&created.id, partner).await {
                Ok(()) => info!("Shared playlist with user: {}", partner),
                Err(e) => warning!("Could not share playlist {}: {}", name, e),
            }
        }

        Ok(SeasonalPlaylist {
            id: created.id,
            name,
            created: true,
        })
    }

    async fn find_owned_playlist(&self, name: &str) -> Result<Option<String>> {
        let mut offset = 0;

        loop {
            let page = self
                .client
                .list_owned_playlists(offset, PLAYLISTS_PAGE_SIZE)
                .await?;

            let found = page
                .items
                .iter()
                .find(|p| p.name == name && p.owner.id == self.config.user_id);
            if let Some(playlist) = found {
                return Ok(Some(playlist.id.clone()));
            }

            let received = page.items.len() as u32;
            if page.next.is_none() || received == 0 {
                return Ok(None);
            }
            offset += received;
        }
    }

    /// Best-effort attempt at sharing a playlist with `partner`.
    ///
    /// Following the playlist as a private follower does not make it show up
    /// for the partner yet; callers log the result and carry on either way.
    pub async fn share_playlist(&self, playlist_id: &str, partner: &str) -> Result<()> {
        let playlist_id = utils::strip_playlist_uri(playlist_id);
        info!("Sharing playlist {} with {}", playlist_id, partner);

        self.client
            .put(
                &format!("playlists/{}/followers", playlist_id),
                &json!({ "public": false }),
            )
            .await
    }

    /// Appends `tracks` in order, in chunks of at most 100.
    ///
    /// Chunks already sent stay in the playlist when a later one fails.
    pub async fn apply_additions(&self, playlist_id: &str, tracks: &[Track]) -> Result<usize> {
        let uris: Vec<String> = tracks.iter().map(|t| t.uri.clone()).collect();

        for chunk in uris.chunks(MAX_ITEMS_PER_REQUEST) {
            self.client.add_items_to_playlist(playlist_id, chunk).await?;
        }

        Ok(uris.len())
    }

    /// Brings the playlist of `window` up to date with `source`.
    async fn sync_window(&self, window: SeasonWindow, source: &[Track]) -> Result<SyncReport> {
        let playlist = self
            .find_or_create_seasonal_playlist(window.season, window.year)
            .await?;
        let membership = self.load_membership(&playlist.id).await?;
        info!(
            "Found {} existing tracks in {}",
            membership.len(),
            playlist.name
        );

        let missing = utils::reconcile(&window, source, &membership);
        let added = if missing.is_empty() {
            info!("No new tracks to add to {}", playlist.name);
            0
        } else {
            for track in &missing {
                info!("  - {} (added {})", track.name, track.added_at);
            }
            let added = self.apply_additions(&playlist.id, &missing).await?;
            success!("Added {} new tracks to {}", added, playlist.name);
            added
        };

        Ok(SyncReport {
            window,
            playlist,
            added,
        })
    }

    /// Syncs the playlist of the season containing `now`.
    ///
    /// The main playlist is read before the seasonal playlist is resolved, so a
    /// failed read leaves no new playlist behind.
    pub async fn run_incremental(&self, now: DateTime<Utc>) -> Result<SyncReport> {
        let window = SeasonWindow::containing(now);
        info!("Current season: {}", window);
        info!("Season date range: {} to {}", window.start, window.end);

        let source = self
            .list_tracks_added_since(&self.config.main_playlist_id, None)
            .await?;
        info!("Retrieved {} tracks from main playlist", source.len());

        self.sync_window(window, &source).await
    }

    /// Creates the next season's playlist ahead of time when the change is a day away or less.
    pub async fn check_for_season_change(
        &self,
        now: DateTime<Utc>,
    ) -> Result<Option<SeasonalPlaylist>> {
        let change = season::next_season_change(now);
        if !season::is_within_a_day(now, change.at) {
            return Ok(None);
        }

        let playlist = self
            .find_or_create_seasonal_playlist(change.season, change.year)
            .await?;
        info!(
            "Playlist for upcoming season {} {} is ready",
            change.season, change.year
        );
        Ok(Some(playlist))
    }

    /// The regular scheduled run: sync the current season, then prepare the next one.
    pub async fn run_incremental_and_check(
        &self,
        now: DateTime<Utc>,
    ) -> Result<(SyncReport, Option<SeasonalPlaylist>)> {
        let report = self.run_incremental(now).await?;
        let upcoming = self.check_for_season_change(now).await?;
        Ok((report, upcoming))
    }

    /// Replays the sync over every past window holding tracks of the main playlist.
    ///
    /// `start_year` defaults to last year; windows from spring of the year
    /// before `max(start_year, year of the earliest track)` up to next year are
    /// considered. Future windows and windows without tracks are skipped, so no
    /// empty playlists get created.
    pub async fn run_retroactive(
        &self,
        start_year: Option<i32>,
        now: DateTime<Utc>,
    ) -> Result<RetroactiveReport> {
        let start_year = start_year.unwrap_or(now.year() - 1);

        let source = self
            .list_tracks_added_since(&self.config.main_playlist_id, None)
            .await?;
        info!("Retrieved {} tracks from main playlist", source.len());

        let Some(earliest) = source.iter().map(|t| t.added_at).min() else {
            info!("No tracks found in the main playlist");
            return Ok(RetroactiveReport::default());
        };
        info!("Earliest track date: {}", earliest);

        let from_year = earliest.year().max(start_year) - 1;
        let to_year = now.year() + 1;
        let mut report = RetroactiveReport::default();

        for window in season::season_windows(from_year, to_year) {
            if window.start > now || window.end <= earliest {
                continue;
            }

            let in_window = source.iter().filter(|t| window.contains(t.added_at)).count();
            info!(
                "Processing {}: {} to {} ({} tracks)",
                window, window.start, window.end, in_window
            );
            if in_window == 0 {
                continue;
            }

            report.windows.push(self.sync_window(window, &source).await?);
        }

        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        error::SeasonifyError,
        spotify::MockSpotifyApi,
        types::{CreatePlaylistResponse, Page, PlaylistOwner, PlaylistSummary},
    };
    use chrono::TimeZone;

    fn config() -> SyncConfig {
        SyncConfig {
            main_playlist_id: "main".to_string(),
            user_id: "me".to_string(),
            partner_user_id: Some("partner".to_string()),
            pair_label: "a + b".to_string(),
        }
    }

    fn page<T>(items: Vec<T>) -> Page<T> {
        Page {
            total: Some(items.len() as u64),
            items,
            next: None,
        }
    }

    #[tokio::test]
    async fn share_failure_does_not_abort_creation() {
        let mut client = MockSpotifyApi::new();
        client
            .expect_list_owned_playlists()
            .returning(|_, _| Ok(page(Vec::new())));
        client
            .expect_create_playlist()
            .withf(|owner, request| {
                owner == "me" && request.name == "a + b winter 2025" && !request.public
            })
            .times(1)
            .returning(|_, request| {
                Ok(CreatePlaylistResponse {
                    id: "new-id".to_string(),
                    name: request.name.clone(),
                })
            });
        client
            .expect_put()
            .withf(|path, _| path == "playlists/new-id/followers")
            .times(1)
            .returning(|_, _| {
                Err(SeasonifyError::Api {
                    status: 403,
                    message: "forbidden".to_string(),
                })
            });

        let sync = SeasonalSync::new(client, config());
        let playlist = sync
            .find_or_create_seasonal_playlist(Season::Winter, 2025)
            .await
            .expect("creation succeeds despite the share failure");

        assert_eq!(playlist.id, "new-id");
        assert!(playlist.created);
    }

    #[tokio::test]
    async fn existing_playlist_is_reused_only_for_the_owner() {
        let mut client = MockSpotifyApi::new();
        client.expect_list_owned_playlists().returning(|_, _| {
            Ok(page(vec![
                PlaylistSummary {
                    id: "foreign".to_string(),
                    name: "a + b summer 2024".to_string(),
                    owner: PlaylistOwner {
                        id: "someone-else".to_string(),
                    },
                },
                PlaylistSummary {
                    id: "mine".to_string(),
                    name: "a + b summer 2024".to_string(),
                    owner: PlaylistOwner {
                        id: "me".to_string(),
                    },
                },
            ]))
        });
        client.expect_create_playlist().times(0);
        client.expect_put().times(0);

        let sync = SeasonalSync::new(client, config());
        let playlist = sync
            .find_or_create_seasonal_playlist(Season::Summer, 2024)
            .await
            .expect("lookup succeeds");

        assert_eq!(playlist.id, "mine");
        assert!(!playlist.created);
    }

    #[tokio::test]
    async fn api_errors_abort_the_run() {
        let mut client = MockSpotifyApi::new();
        client
            .expect_get_playlist_items()
            .returning(|_, _, _| Err(SeasonifyError::RateLimited { retry_after: 600 }));
        client.expect_list_owned_playlists().times(0);
        client.expect_create_playlist().times(0);
        client.expect_add_items_to_playlist().times(0);

        let sync = SeasonalSync::new(client, config());
        let now = Utc.with_ymd_and_hms(2024, 7, 1, 12, 0, 0).unwrap();
        let result = sync.run_incremental(now).await;

        assert!(matches!(
            result,
            Err(SeasonifyError::RateLimited { retry_after: 600 })
        ));
    }
}
