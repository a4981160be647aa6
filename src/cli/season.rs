use chrono::{DateTime, NaiveDate, Utc};
use tabled::Table;

use crate::{
    error, info,
    season::{self, Season, SeasonWindow},
    types::SeasonTableRow,
};

pub fn season(date: Option<String>, year: Option<i32>) {
    let now = match instant_from_date(date) {
        Ok(now) => now,
        Err(e) => error!("{}", e),
    };

    let window = SeasonWindow::containing(now);
    let change = season::next_season_change(now);
    info!("Season on {}: {}", now.date_naive(), window);
    info!("Window: {} to {}", window.start, window.end);
    info!(
        "Next change: {} {} on {}",
        change.season, change.year, change.at
    );

    let year = year.unwrap_or_else(|| season::current_season_year(now));
    let rows: Vec<SeasonTableRow> = Season::ALL
        .iter()
        .map(|s| SeasonWindow::new(*s, year))
        .map(|w| SeasonTableRow {
            season: w.to_string(),
            start: w.start.date_naive().to_string(),
            end: w.end.date_naive().to_string(),
        })
        .collect();

    println!("{}", Table::new(rows));
}

/// Midnight UTC of `YYYY-MM-DD`, or the current instant when no date is given.
pub fn instant_from_date(date: Option<String>) -> Result<DateTime<Utc>, String> {
    match date {
        Some(date_str) => NaiveDate::parse_from_str(&date_str, "%Y-%m-%d")
            .ok()
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .map(|d| d.and_utc())
            .ok_or_else(|| format!("Invalid date {}, expected YYYY-MM-DD", date_str)),
        None => Ok(Utc::now()),
    }
}
