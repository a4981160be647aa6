use axum::{Extension, Router, routing::get};
use std::{net::SocketAddr, str::FromStr, sync::Arc};
use tokio::sync::{Mutex, oneshot};

use crate::{
    api,
    config::ApiConfig,
    error::{Result, SeasonifyError},
    types::PkceToken,
};

/// Serves `/callback` until `shutdown` fires.
pub async fn start_api_server(
    api_config: Arc<ApiConfig>,
    state: Arc<Mutex<Option<PkceToken>>>,
    shutdown: oneshot::Receiver<()>,
) -> Result<()> {
    let addr = SocketAddr::from_str(&api_config.server_addr).map_err(|e| {
        SeasonifyError::InvalidConfig {
            key: "SERVER_ADDRESS",
            value: format!("{} ({})", api_config.server_addr, e),
        }
    })?;

    let app = Router::new()
        .route("/callback", get(api::callback))
        .layer(Extension(state))
        .layer(Extension(api_config));

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            let _ = shutdown.await;
        })
        .await?;

    Ok(())
}
