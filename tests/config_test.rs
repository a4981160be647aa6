use std::collections::HashMap;

use seasonify::config::*;
use seasonify::error::SeasonifyError;

fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |key| map.get(key).cloned()
}

#[test]
fn test_sync_config_reads_all_values() {
    let config = SyncConfig::from_lookup(lookup(&[
        ("SPOTIFY_MAIN_PLAYLIST_ID", "main123"),
        ("SPOTIFY_USER_ID", "me"),
        ("SPOTIFY_PARTNER_USER_ID", "you"),
        ("SEASONIFY_PAIR_LABEL", "me + you"),
    ]))
    .unwrap();

    assert_eq!(config.main_playlist_id, "main123");
    assert_eq!(config.user_id, "me");
    assert_eq!(config.partner_user_id.as_deref(), Some("you"));
    assert_eq!(config.pair_label, "me + you");
}

#[test]
fn test_sync_config_partner_is_optional() {
    let config = SyncConfig::from_lookup(lookup(&[
        ("SPOTIFY_MAIN_PLAYLIST_ID", "main123"),
        ("SPOTIFY_USER_ID", "me"),
        ("SPOTIFY_PARTNER_USER_ID", "  "),
        ("SEASONIFY_PAIR_LABEL", "us"),
    ]))
    .unwrap();

    assert_eq!(config.partner_user_id, None);
}

#[test]
fn test_sync_config_reports_missing_key() {
    let result = SyncConfig::from_lookup(lookup(&[
        ("SPOTIFY_MAIN_PLAYLIST_ID", "main123"),
        ("SEASONIFY_PAIR_LABEL", "us"),
    ]));

    assert!(matches!(
        result,
        Err(SeasonifyError::MissingConfig("SPOTIFY_USER_ID"))
    ));
}

#[test]
fn test_api_config_defaults() {
    let api = ApiConfig::from_lookup(lookup(&[("SPOTIFY_API_AUTH_CLIENT_ID", "client")])).unwrap();

    assert_eq!(api.client_id, "client");
    assert_eq!(api.api_url, DEFAULT_API_URL);
    assert_eq!(api.token_url, DEFAULT_TOKEN_URL);
    assert_eq!(api.redirect_uri, DEFAULT_REDIRECT_URI);
    assert_eq!(api.server_addr, DEFAULT_SERVER_ADDRESS);
    assert!(api.scope.contains("playlist-modify-private"));
}

#[test]
fn test_api_config_trims_trailing_slash() {
    let api = ApiConfig::from_lookup(lookup(&[
        ("SPOTIFY_API_AUTH_CLIENT_ID", "client"),
        ("SPOTIFY_API_URL", "http://localhost:9000/v1/"),
    ]))
    .unwrap();

    assert_eq!(api.api_url, "http://localhost:9000/v1");
}

#[test]
fn test_api_config_requires_client_id() {
    assert!(matches!(
        ApiConfig::from_lookup(lookup(&[])),
        Err(SeasonifyError::MissingConfig("SPOTIFY_API_AUTH_CLIENT_ID"))
    ));
}
