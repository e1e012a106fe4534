//! Bye fairness bookkeeping
//!
//! Bye teams are handed to players in ascending ID order, continuing from
//! wherever the previous weeks of the season left off. The starting point is
//! the number of bye teams in all earlier weeks, recomputed from the provider
//! on every run.

use std::collections::HashMap;

use crate::models::{TeamName, WeekContext};
use crate::schedule::{ProviderResult, ScheduleProvider};

/// Number of bye slots a 16-player league rotates through before wrapping
pub const BYE_SLOTS_PER_ROTATION: usize = 16;

/// Apply the 16-player wrap to a bye marker
///
/// A single subtraction, not a modulo: a marker of 35 becomes 19.
pub fn wrap_marker(marker: usize, player_count: usize) -> usize {
    if marker >= BYE_SLOTS_PER_ROTATION && player_count <= BYE_SLOTS_PER_ROTATION {
        marker - BYE_SLOTS_PER_ROTATION
    } else {
        marker
    }
}

/// Per-run view of bye data, memoized by `(year, week)`
pub struct FairnessTracker<'a, P: ScheduleProvider + ?Sized> {
    provider: &'a P,
    byes: HashMap<WeekContext, Vec<TeamName>>,
}

impl<'a, P: ScheduleProvider + ?Sized> FairnessTracker<'a, P> {
    pub fn new(provider: &'a P) -> Self {
        Self {
            provider,
            byes: HashMap::new(),
        }
    }

    /// Teams on bye for a week, fetched at most once per run
    pub async fn bye_teams(&mut self, ctx: WeekContext) -> ProviderResult<Vec<TeamName>> {
        if let Some(cached) = self.byes.get(&ctx) {
            return Ok(cached.clone());
        }

        let teams = self.provider.fetch_bye_teams(ctx).await?;
        tracing::debug!(year = %ctx.year, week = %ctx.week, count = teams.len(), "Fetched bye teams");
        self.byes.insert(ctx, teams.clone());
        Ok(teams)
    }

    /// Bye teams assigned in weeks `1..ctx.week` of the same season
    ///
    /// Weeks are visited from the most recent backwards; the sum is order
    /// independent. Returns 0 for week 1 and below.
    pub async fn bye_debt_to_date(&mut self, ctx: WeekContext) -> ProviderResult<usize> {
        let mut count = 0;
        for prior in ctx.prior_weeks() {
            count += self.bye_teams(prior).await?.len();
        }
        Ok(count)
    }

    /// Number of weeks with cached bye data
    pub fn cached_weeks(&self) -> usize {
        self.byes.len()
    }
}
