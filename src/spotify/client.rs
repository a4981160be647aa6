use std::time::Duration;

use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde::{Serialize, de::DeserializeOwned};
use tokio::{sync::Mutex, time::sleep};

use crate::{
    config::ApiConfig,
    error::{Result, SeasonifyError},
    management::TokenManager,
    spotify::api_error,
    warning,
};

const MAX_ATTEMPTS: u32 = 3;
const MAX_RETRY_AFTER_SECS: u64 = 120;
const GATEWAY_RETRY_DELAY: Duration = Duration::from_secs(10);

/// Authenticated client for the Spotify Web API.
///
/// Every request picks a valid access token from the [`TokenManager`],
/// refreshing it first when it is about to expire.
pub struct SpotifyClient {
    http: Client,
    api_url: String,
    tokens: Mutex<TokenManager>,
    gateway_retry_delay: Duration,
}

impl SpotifyClient {
    pub fn new(api_url: impl Into<String>, tokens: TokenManager) -> Self {
        Self {
            http: Client::new(),
            api_url: api_url.into().trim_end_matches('/').to_string(),
            tokens: Mutex::new(tokens),
            gateway_retry_delay: GATEWAY_RETRY_DELAY,
        }
    }

    /// Overrides the pause before retrying a 502/503.
    pub fn with_gateway_retry_delay(mut self, delay: Duration) -> Self {
        self.gateway_retry_delay = delay;
        self
    }

    /// Builds a client from the cached token. Fails when `seasonify auth` has not run yet.
    pub async fn connect(api: &ApiConfig) -> Result<Self> {
        let tokens = TokenManager::load(api.clone()).await.map_err(|e| {
            SeasonifyError::Auth(format!(
                "no cached token, run `seasonify auth` first ({})",
                e
            ))
        })?;

        Ok(Self::new(api.api_url.clone(), tokens))
    }

    pub(crate) fn url(&self, path: &str) -> String {
        format!("{}/{}", self.api_url, path.trim_start_matches('/'))
    }

    pub(crate) async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T> {
        let url = self.url(path);
        let response = self
            .send(|| self.http.get(&url).query(query))
            .await?;
        Ok(response.json::<T>().await?)
    }

    pub(crate) async fn post_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T> {
        let url = self.url(path);
        let response = self
            .send(|| self.http.request(Method::POST, &url).json(body))
            .await?;
        Ok(response.json::<T>().await?)
    }

    pub(crate) async fn put_json<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<()> {
        let url = self.url(path);
        self.send(|| self.http.request(Method::PUT, &url).json(body))
            .await?;
        Ok(())
    }

    /// Sends the request built by `build`, retrying rate limits and gateway errors.
    ///
    /// A 429 means Spotify did not process the request, so it is retried for
    /// every method. A 502/503 may arrive after a write was applied, so POSTs
    /// are never retried on those.
    async fn send<F>(&self, build: F) -> Result<Response>
    where
        F: Fn() -> RequestBuilder,
    {
        let mut attempt = 1;

        loop {
            let token = self.tokens.lock().await.get_valid_token().await;
            let request = build().bearer_auth(token).build()?;
            let retry_gateway = *request.method() != Method::POST;
            let response = self.http.execute(request).await?;
            let status = response.status();

            if status.is_success() {
                return Ok(response);
            }

            if status == StatusCode::TOO_MANY_REQUESTS {
                let retry_after = response
                    .headers()
                    .get("retry-after")
                    .and_then(|value| value.to_str().ok())
                    .and_then(|value| value.parse::<u64>().ok())
                    .unwrap_or(1);

                if retry_after > MAX_RETRY_AFTER_SECS || attempt >= MAX_ATTEMPTS {
                    return Err(SeasonifyError::RateLimited { retry_after });
                }

                warning!(
                    "Rate limited by Spotify, retrying in {} seconds",
                    retry_after
                );
                sleep(Duration::from_secs(retry_after)).await;
                attempt += 1;
                continue;
            }

            if retry_gateway
                && matches!(
                    status,
                    StatusCode::BAD_GATEWAY | StatusCode::SERVICE_UNAVAILABLE
                )
                && attempt < MAX_ATTEMPTS
            {
                warning!("Spotify answered {}, retrying", status);
                sleep(self.gateway_retry_delay).await;
                attempt += 1;
                continue;
            }

            let message = response.text().await.unwrap_or_default();
            return Err(api_error(status.as_u16(), message));
        }
    }
}
