use std::collections::HashSet;

use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use chrono::{DateTime, Utc};
use rand::{Rng, distr::Alphanumeric};
use sha2::{Digest, Sha256};

use crate::{
    season::{Season, SeasonWindow},
    types::{PlaylistItem, Track},
};

pub fn generate_code_verifier() -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(128)
        .map(char::from)
        .collect()
}

pub fn generate_code_challenge(verifier: &str) -> String {
    let hash = Sha256::digest(verifier.as_bytes());
    URL_SAFE_NO_PAD.encode(hash)
}

/// Canonical name of a seasonal playlist, e.g. `"anna + ben winter 2025"`.
pub fn playlist_name(pair_label: &str, season: Season, year: i32) -> String {
    format!("{} {} {}", pair_label, season, year)
}

pub fn playlist_description(season: Season, year: i32) -> String {
    format!("songs from our playlist during {} {}", season, year)
}

/// Accepts either a bare playlist id or a `spotify:playlist:<id>` URI.
pub fn strip_playlist_uri(playlist_id: &str) -> &str {
    playlist_id.rsplit(':').next().unwrap_or(playlist_id)
}

/// Turns raw playlist items into tracks, newest first.
///
/// Items without a track, without a catalog id (local files) or without an
/// add timestamp are skipped. With `since` set only tracks added at or after
/// that instant are kept.
pub fn tracks_from_items(items: Vec<PlaylistItem>, since: Option<DateTime<Utc>>) -> Vec<Track> {
    let mut tracks: Vec<Track> = items
        .into_iter()
        .filter_map(|item| {
            let added_at = item.added_at?;
            let track = item.track?;
            let id = track.id.filter(|id| !id.is_empty())?;
            Some(Track::new(
                id,
                track.name,
                track.artists.into_iter().map(|a| a.name).collect(),
                added_at,
            ))
        })
        .filter(|track| since.is_none_or(|since| track.added_at >= since))
        .collect();

    sort_tracks_newest_first(&mut tracks);
    tracks
}

/// Stable sort by add timestamp, most recent first.
pub fn sort_tracks_newest_first(tracks: &mut [Track]) {
    tracks.sort_by(|a, b| b.added_at.cmp(&a.added_at));
}

/// Keeps the first occurrence of every track id.
pub fn remove_duplicate_tracks(tracks: &mut Vec<Track>) {
    let mut seen_ids = HashSet::new();
    tracks.retain(|track| seen_ids.insert(track.id.clone()));
}

/// Tracks of `source` added inside `window` that `membership` does not hold yet.
///
/// The result keeps the order of `source` and lists every id at most once.
pub fn reconcile(window: &SeasonWindow, source: &[Track], membership: &HashSet<String>) -> Vec<Track> {
    let mut missing: Vec<Track> = source
        .iter()
        .filter(|track| window.contains(track.added_at))
        .filter(|track| !membership.contains(&track.id))
        .cloned()
        .collect();

    remove_duplicate_tracks(&mut missing);
    missing
}

/// Ids found in a listing of playlist items, skipping local files and gaps.
pub fn track_ids(items: &[PlaylistItem]) -> HashSet<String> {
    items
        .iter()
        .filter_map(|item| item.track.as_ref()?.id.clone())
        .filter(|id| !id.is_empty())
        .collect()
}
