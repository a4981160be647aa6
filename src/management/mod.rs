mod auth;
mod seasonal;

pub use auth::TokenManager;
pub use seasonal::RetroactiveReport;
pub use seasonal::SeasonalSync;
pub use seasonal::SyncReport;
