//! Season calendar.
//!
//! Every boundary is derived from four fixed (month, day) anchors at 00:00 UTC.
//! Winter is the only season crossing a calendar-year boundary: it starts on
//! December 21st and is labelled with the year it ends in, so "winter 2025"
//! runs from 2024-12-21 to 2025-03-20. All functions here follow that single
//! associated-year rule.

use std::{fmt, str::FromStr};

use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Season {
    Spring,
    Summer,
    Fall,
    Winter,
}

impl Season {
    /// Seasons in ascending anchor order within a calendar year.
    pub const ALL: [Season; 4] = [Season::Spring, Season::Summer, Season::Fall, Season::Winter];

    /// (month, day) on which the season begins.
    pub fn anchor(self) -> (u32, u32) {
        match self {
            Season::Spring => (3, 20),
            Season::Summer => (6, 21),
            Season::Fall => (9, 22),
            Season::Winter => (12, 21),
        }
    }

    /// The season that follows, cycling winter back to spring.
    pub fn next(self) -> Season {
        match self {
            Season::Spring => Season::Summer,
            Season::Summer => Season::Fall,
            Season::Fall => Season::Winter,
            Season::Winter => Season::Spring,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Season::Spring => "spring",
            Season::Summer => "summer",
            Season::Fall => "fall",
            Season::Winter => "winter",
        }
    }

    /// Anchor instant of this season inside the given calendar year.
    fn starts_in(self, calendar_year: i32) -> DateTime<Utc> {
        let (month, day) = self.anchor();
        NaiveDate::from_ymd_opt(calendar_year, month, day)
            .and_then(|date| date.and_hms_opt(0, 0, 0))
            .map(|naive| naive.and_utc())
            .expect("season anchors are valid dates in every supported year")
    }
}

impl fmt::Display for Season {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Season {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "spring" => Ok(Season::Spring),
            "summer" => Ok(Season::Summer),
            "fall" | "autumn" => Ok(Season::Fall),
            "winter" => Ok(Season::Winter),
            other => Err(format!("unknown season: {}", other)),
        }
    }
}

/// A half-open interval `[start, end)` owned by one season of one associated year.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeasonWindow {
    pub season: Season,
    pub year: i32,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl SeasonWindow {
    /// Builds the window for `season` labelled `year`.
    ///
    /// Winter starts in December of `year - 1`; every other season starts in
    /// `year` itself. The end is always the start of the following window.
    pub fn new(season: Season, year: i32) -> Self {
        let start = window_start(season, year);
        let (next_season, next_year) = following(season, year);

        SeasonWindow {
            season,
            year,
            start,
            end: window_start(next_season, next_year),
        }
    }

    /// The window containing `now`.
    pub fn containing(now: DateTime<Utc>) -> Self {
        Self::new(current_season(now), current_season_year(now))
    }

    /// The window starting where this one ends.
    pub fn next(&self) -> Self {
        let (season, year) = following(self.season, self.year);
        Self::new(season, year)
    }

    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        self.start <= instant && instant < self.end
    }
}

impl fmt::Display for SeasonWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.season, self.year)
    }
}

/// The upcoming season boundary relative to some instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeasonChange {
    pub season: Season,
    pub year: i32,
    pub at: DateTime<Utc>,
}

fn window_start(season: Season, year: i32) -> DateTime<Utc> {
    match season {
        Season::Winter => season.starts_in(year - 1),
        _ => season.starts_in(year),
    }
}

// (season, associated year) of the window that follows. Only fall -> winter
// moves the label forward since winter carries the year it ends in.
fn following(season: Season, year: i32) -> (Season, i32) {
    match season {
        Season::Fall => (Season::Winter, year + 1),
        other => (other.next(), year),
    }
}

/// The season whose window contains `now`.
///
/// Before the spring anchor of `now`'s year the answer is winter, continued
/// from the previous December.
pub fn current_season(now: DateTime<Utc>) -> Season {
    let year = now.year();

    Season::ALL
        .iter()
        .rev()
        .find(|season| now >= season.starts_in(year))
        .copied()
        .unwrap_or(Season::Winter)
}

/// The associated year of the season containing `now`.
///
/// Winter started in December is already labelled with the following year.
pub fn current_season_year(now: DateTime<Utc>) -> i32 {
    let year = now.year();
    if now >= Season::Winter.starts_in(year) {
        year + 1
    } else {
        year
    }
}

/// The next boundary strictly after `now`, labelled per the associated-year rule.
pub fn next_season_change(now: DateTime<Utc>) -> SeasonChange {
    let next = SeasonWindow::containing(now).next();

    SeasonChange {
        season: next.season,
        year: next.year,
        at: next.start,
    }
}

/// Window for `season` labelled `year`. See [`SeasonWindow::new`].
pub fn season_window(season: Season, year: i32) -> SeasonWindow {
    SeasonWindow::new(season, year)
}

/// Ordered, contiguous windows whose start lies in calendar years
/// `from_year..=to_year`, beginning with spring of `from_year`.
pub fn season_windows(from_year: i32, to_year: i32) -> Vec<SeasonWindow> {
    let mut windows = Vec::new();
    if from_year > to_year {
        return windows;
    }

    let mut window = SeasonWindow::new(Season::Spring, from_year);
    while window.start.year() <= to_year {
        let next = window.next();
        windows.push(window);
        window = next;
    }

    windows
}

/// Whether `now` lies within one day of `at`, on either side.
pub fn is_within_a_day(now: DateTime<Utc>, at: DateTime<Utc>) -> bool {
    (at - now).abs() <= Duration::days(1)
}
