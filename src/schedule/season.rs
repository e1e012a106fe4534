//! Season and week resolution
//!
//! Turns "now" plus an optional configured week override into the
//! [`WeekContext`] a run operates on.

use chrono::{DateTime, Datelike, Utc};

use super::{ScheduleProvider, SeasonWindow};
use crate::error::{PreconditionError, Result};
use crate::models::WeekContext;

/// Season year for `now`, given the window of the season starting in `now.year()`
///
/// Inside the window the season is the calendar year. After the window ends
/// the next season is targeted; before it starts, the previous season is
/// still the current one.
pub fn season_year(now: DateTime<Utc>, window: &SeasonWindow) -> i32 {
    let year = now.year();
    if now > window.start {
        if now < window.end {
            year
        } else {
            year + 1
        }
    } else {
        year - 1
    }
}

/// Parse the configured week override
///
/// Blank or missing input means "no override".
pub fn parse_week_override(raw: Option<&str>) -> std::result::Result<Option<u32>, PreconditionError> {
    let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
        return Ok(None);
    };

    raw.parse::<u32>()
        .map(Some)
        .map_err(|_| PreconditionError::InvalidWeekOverride(raw.to_string()))
}

/// Resolve the season year and week for a run
///
/// The override is validated before any request is made. The week count is
/// only fetched when no override is configured.
///
/// # Errors
///
/// - `Error::Precondition` for an unparseable override
/// - `Error::Provider` when season or week data cannot be retrieved
pub async fn resolve_season_week<P: ScheduleProvider + ?Sized>(
    provider: &P,
    now: DateTime<Utc>,
    week_override: Option<&str>,
) -> Result<WeekContext> {
    let override_week = parse_week_override(week_override)?;

    let window = provider.fetch_season_window(now.year()).await?;
    let year = season_year(now, &window);

    let week = match override_week {
        Some(week) => {
            tracing::info!(week = %week, "Using configured week override");
            week
        }
        None => provider.fetch_week_count(year).await?,
    };

    let ctx = WeekContext::new(year, week);
    tracing::info!(year = %ctx.year, week = %ctx.week, "Resolved NFL season week");
    Ok(ctx)
}
