use std::{sync::Arc, time::Duration};

use chrono::Utc;
use reqwest::Client;
use tokio::sync::{Mutex, oneshot};

use crate::{
    config::ApiConfig,
    error::{Result, SeasonifyError},
    info,
    management::TokenManager,
    server::start_api_server,
    success,
    types::{PkceToken, Token, TokenResponse},
    utils, warning,
};

const CALLBACK_TIMEOUT: Duration = Duration::from_secs(60);

/// Runs the complete OAuth 2.0 PKCE flow and caches the resulting token.
///
/// 1. Generates the PKCE code verifier and its SHA256 challenge
/// 2. Starts the local callback server
/// 3. Opens the authorization URL in the default browser
/// 4. Waits up to a minute for the callback to exchange the code
/// 5. Shuts the callback server down and persists the token
///
/// When the browser cannot be opened the URL is printed so it can be visited
/// by hand.
pub async fn auth(api: &ApiConfig, shared_state: Arc<Mutex<Option<PkceToken>>>) -> Result<()> {
    let code_verifier = utils::generate_code_verifier();
    let code_challenge = utils::generate_code_challenge(&code_verifier);

    // store verifier before the browser can hit the callback
    {
        let mut lock = shared_state.lock().await;
        *lock = Some(PkceToken {
            code_verifier,
            token: None,
        });
    }

    let (shutdown_tx, shutdown_rx) = oneshot::channel();
    let server_state = Arc::clone(&shared_state);
    let server_api = Arc::new(api.clone());
    let server = tokio::spawn(async move {
        start_api_server(server_api, server_state, shutdown_rx).await
    });

    let auth_url = authorize_url(api, &code_challenge);
    info!("Waiting for authorization on {}", api.redirect_uri);
    if webbrowser::open(&auth_url).is_err() {
        warning!(
            "Failed to open browser. Please navigate to the following URL manually:\n{}",
            auth_url
        )
    }

    let token = wait_for_token(shared_state).await;

    // the listener is only needed for this one redirect
    let _ = shutdown_tx.send(());
    match server.await {
        Ok(Err(e)) => warning!("Callback server stopped with an error: {}", e),
        Err(e) => warning!("Callback server task failed: {}", e),
        Ok(Ok(())) => {}
    }

    let token = token.ok_or_else(|| SeasonifyError::Auth("authentication timed out".to_string()))?;
    TokenManager::new(api.clone(), token).persist().await?;

    success!("Authentication successful!");
    Ok(())
}

/// Authorization URL carrying the PKCE challenge.
pub fn authorize_url(api: &ApiConfig, code_challenge: &str) -> String {
    format!(
        "{auth_url}?client_id={client_id}&response_type=code&redirect_uri={redirect_uri}&code_challenge={code_challenge}&code_challenge_method=S256&scope={scope}",
        auth_url = api.auth_url,
        client_id = api.client_id,
        redirect_uri = api.redirect_uri,
        code_challenge = code_challenge,
        scope = api.scope.replace(' ', "%20"),
    )
}

/// Polls the shared state once per second until the callback stored a token.
async fn wait_for_token(shared_state: Arc<Mutex<Option<PkceToken>>>) -> Option<Token> {
    use std::time::Instant;

    let start = Instant::now();

    while start.elapsed() < CALLBACK_TIMEOUT {
        let lock = shared_state.lock().await;
        if let Some(token) = lock.as_ref().and_then(|pkce| pkce.token.clone()) {
            return Some(token);
        }
        drop(lock);
        tokio::time::sleep(Duration::from_secs(1)).await;
    }

    None
}

/// Exchanges a refresh token for a fresh access token.
///
/// Spotify may or may not rotate the refresh token; the old one is kept when
/// the response carries none.
pub async fn refresh_token(api: &ApiConfig, refresh_token: &str) -> Result<Token> {
    let response = Client::new()
        .post(&api.token_url)
        .form(&[
            ("grant_type", "refresh_token"),
            ("refresh_token", refresh_token),
            ("client_id", api.client_id.as_str()),
        ])
        .send()
        .await?
        .error_for_status()?;

    let body: TokenResponse = response.json().await?;
    Ok(into_token(body, Some(refresh_token)))
}

/// Exchanges the authorization code from the callback for a token, proving
/// possession of the PKCE verifier.
pub async fn exchange_code_pkce(api: &ApiConfig, code: &str, verifier: &str) -> Result<Token> {
    let response = Client::new()
        .post(&api.token_url)
        .form(&[
            ("grant_type", "authorization_code"),
            ("client_id", api.client_id.as_str()),
            ("code", code),
            ("code_verifier", verifier),
            ("redirect_uri", api.redirect_uri.as_str()),
        ])
        .send()
        .await?
        .error_for_status()?;

    let body: TokenResponse = response.json().await?;
    Ok(into_token(body, None))
}

fn into_token(body: TokenResponse, previous_refresh: Option<&str>) -> Token {
    Token {
        access_token: body.access_token,
        refresh_token: body
            .refresh_token
            .or_else(|| previous_refresh.map(str::to_string))
            .unwrap_or_default(),
        scope: body.scope,
        expires_in: body.expires_in,
        obtained_at: Utc::now().timestamp() as u64,
    }
}
