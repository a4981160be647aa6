use chrono::Utc;

use crate::{
    config::{ApiConfig, SyncConfig},
    error,
    error::Result,
    management::SeasonalSync,
    spotify::SpotifyClient,
    success,
};

async fn connect() -> Result<SeasonalSync<SpotifyClient>> {
    let api = ApiConfig::from_env()?;
    let config = SyncConfig::from_env()?;
    let client = SpotifyClient::connect(&api).await?;
    Ok(SeasonalSync::new(client, config))
}

pub async fn sync() {
    let sync = match connect().await {
        Ok(sync) => sync,
        Err(e) => error!("Cannot start sync: {}", e),
    };

    match sync.run_incremental_and_check(Utc::now()).await {
        Ok((report, upcoming)) => {
            success!(
                "Sync of {} completed, {} tracks added",
                report.window,
                report.added
            );
            if let Some(playlist) = upcoming {
                success!("Upcoming playlist ready: {}", playlist.name);
            }
            success!("Run completed at {}", Utc::now());
        }
        Err(e) => error!("Sync failed: {}", e),
    }
}

pub async fn retroactive(start_year: Option<i32>) {
    let sync = match connect().await {
        Ok(sync) => sync,
        Err(e) => error!("Cannot start sync: {}", e),
    };

    match sync.run_retroactive(start_year, Utc::now()).await {
        Ok(report) => success!(
            "Retroactive playlist creation completed: {} seasons, {} playlists created, {} tracks added",
            report.windows.len(),
            report.created(),
            report.added()
        ),
        Err(e) => error!("Retroactive sync failed: {}", e),
    }
}
