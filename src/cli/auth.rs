use std::sync::Arc;

use tokio::sync::Mutex;

use crate::{config::ApiConfig, error, spotify, types::PkceToken};

pub async fn auth(shared_state: Arc<Mutex<Option<PkceToken>>>) {
    let api = match ApiConfig::from_env() {
        Ok(api) => api,
        Err(e) => error!("Cannot load API configuration: {}", e),
    };

    if let Err(e) = spotify::auth::auth(&api, shared_state).await {
        error!("Authentication failed: {}", e);
    }
}
