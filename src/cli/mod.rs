//! # CLI Module
//!
//! Command implementations behind the `seasonify` binary. Each command loads
//! the configuration it needs, hands it to the library components and turns
//! errors into a message plus a non-zero exit code.
//!
//! ## Commands
//!
//! - [`auth`] - interactive Spotify login, caches the token
//! - [`sync`] - sorts new songs into the current season's playlist and prepares the next one
//! - [`retroactive`] - replays the sort over all past seasons
//! - [`season`] - prints the season calendar for a date or a year
//!
//! ## Usage Patterns
//!
//! ```bash
//! seasonify auth                          # once, opens the browser
//! seasonify sync                          # from cron, e.g. daily
//! seasonify sync --retroactive 2022       # backfill older seasons
//! seasonify season --date 2024-12-25      # which season is that?
//! ```

mod auth;
mod season;
mod sync;

pub use auth::auth;
pub use season::season;
pub use sync::retroactive;
pub use sync::sync;
