//! One weekly run, end to end
//!
//! ```text
//! roster gate ─► resolve week ─► week gate ─► teams + byes ─► distribute ─► notify
//!      │               │              │              │              │
//!      └── Skipped ◄───┴──────────────┘              └── Failed (admin notified)
//! ```
//!
//! Preconditions stop the run quietly. Retrieval and assignment faults are
//! reported to the administrator instead of sending the weekly notification.
//! A failed weekly notification is returned as an error.

use chrono::{DateTime, Utc};

use crate::assignment::{AssignmentEngine, FairnessTracker};
use crate::error::{AssignerErrorTrait, Error, PreconditionError, Result};
use crate::models::{AssignmentResult, Player, WeekContext, SUPPORTED_ROSTER_SIZES};
use crate::notifications::{DeliveryStatus, Notification, NotificationManager};
use crate::schedule::{resolve_season_week, ScheduleProvider};

/// Message sent to the administrator when week resolution fails
pub const WEEK_FAILURE_MESSAGE: &str = "An error occurred getting the NFL Season and Week info.";

/// Message sent to the administrator when retrieval or distribution fails
pub const RUN_FAILURE_MESSAGE: &str = "An error occurred running the app.";

/// How a run ended
#[derive(Debug)]
pub enum RunOutcome {
    /// Assignments were sent to every player
    Delivered {
        ctx: WeekContext,
        result: AssignmentResult,
        statuses: Vec<DeliveryStatus>,
    },
    /// Assignments were computed but not sent
    DryRun {
        ctx: WeekContext,
        result: AssignmentResult,
    },
    /// A precondition stopped the run; nothing was sent
    Skipped(PreconditionError),
    /// A fault stopped the run and the administrator was (maybe) told
    Failed { error: Error, admin_notified: bool },
}

impl RunOutcome {
    /// Whether the run should be reported as successful
    pub fn is_success(&self) -> bool {
        !matches!(self, Self::Failed { .. })
    }
}

/// Roster size gate
pub fn check_roster(players: &[Player]) -> std::result::Result<(), PreconditionError> {
    if SUPPORTED_ROSTER_SIZES.contains(&players.len()) {
        Ok(())
    } else {
        Err(PreconditionError::RosterSize {
            count: players.len(),
        })
    }
}

/// Regular season gate
pub fn check_week(ctx: WeekContext) -> std::result::Result<(), PreconditionError> {
    if ctx.is_regular_season() {
        Ok(())
    } else {
        Err(PreconditionError::NotRegularSeason {
            year: ctx.year,
            week: ctx.week,
        })
    }
}

/// Orchestrates a weekly assignment run
pub struct TeamAssigner<P: ScheduleProvider> {
    provider: P,
    notifier: NotificationManager,
    players: Vec<Player>,
    admin_email: String,
    week_override: Option<String>,
    engine: AssignmentEngine,
    dry_run: bool,
}

impl<P: ScheduleProvider> TeamAssigner<P> {
    pub fn new(
        provider: P,
        notifier: NotificationManager,
        players: Vec<Player>,
        admin_email: impl Into<String>,
    ) -> Self {
        Self {
            provider,
            notifier,
            players,
            admin_email: admin_email.into(),
            week_override: None,
            engine: AssignmentEngine::new(),
            dry_run: false,
        }
    }

    /// Use a fixed week instead of the live one
    pub fn with_week_override(mut self, week: Option<String>) -> Self {
        self.week_override = week;
        self
    }

    /// Replace the entropy-seeded engine, e.g. with a seeded one
    pub fn with_engine(mut self, engine: AssignmentEngine) -> Self {
        self.engine = engine;
        self
    }

    /// Compute assignments without sending anything
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Access the schedule provider
    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Execute one run as of `now`
    ///
    /// # Errors
    ///
    /// Returns `Error::Notification` when the weekly notification could not be
    /// delivered. All other failures are reported through [`RunOutcome`].
    pub async fn run(&mut self, now: DateTime<Utc>) -> Result<RunOutcome> {
        if let Err(precondition) = check_roster(&self.players) {
            tracing::warn!("{precondition}");
            return Ok(RunOutcome::Skipped(precondition));
        }

        let ctx = match resolve_season_week(&self.provider, now, self.week_override.as_deref()).await {
            Ok(ctx) => ctx,
            Err(Error::Precondition(precondition)) => {
                tracing::warn!("{precondition}");
                return Ok(RunOutcome::Skipped(precondition));
            }
            Err(e) => return Ok(self.fail(WEEK_FAILURE_MESSAGE, e).await),
        };

        if let Err(precondition) = check_week(ctx) {
            tracing::warn!("{precondition}");
            return Ok(RunOutcome::Skipped(precondition));
        }

        let result = match self.assign(ctx).await {
            Ok(result) => result,
            Err(e) => return Ok(self.fail(RUN_FAILURE_MESSAGE, e).await),
        };

        tracing::info!(week = %ctx.week, players = result.len(), "Assignments ready\n{result}");

        if self.dry_run {
            return Ok(RunOutcome::DryRun { ctx, result });
        }

        let recipients = self.players.iter().map(|p| p.email.clone()).collect();
        let notification = Notification::weekly(recipients, ctx.week, result.to_string());

        match self.notifier.send(&notification).await {
            Ok(statuses) => Ok(RunOutcome::Delivered {
                ctx,
                result,
                statuses,
            }),
            Err(e) => {
                tracing::error!(week = %ctx.week, error = %e, "Weekly notification was not delivered");
                Err(e.into())
            }
        }
    }

    /// Fetch teams and byes, then distribute
    async fn assign(&mut self, ctx: WeekContext) -> Result<AssignmentResult> {
        let mut tracker = FairnessTracker::new(&self.provider);

        let all_teams = self.provider.fetch_all_teams().await?;
        tracing::debug!(count = all_teams.len(), "Fetched all teams");

        let bye_teams = tracker.bye_teams(ctx).await?;
        for team in &bye_teams {
            tracing::info!("Bye Team: {team}");
        }

        let bye_debt = if bye_teams.is_empty() {
            0
        } else {
            let debt = tracker.bye_debt_to_date(ctx).await?;
            tracing::info!(weeks_fetched = tracker.cached_weeks(), "Bye Team Count To Date: {debt}");
            debt
        };

        Ok(self
            .engine
            .distribute(&self.players, &all_teams, &bye_teams, bye_debt)?)
    }

    /// Log a fault and report it to the administrator
    async fn fail(&self, message: &str, error: Error) -> RunOutcome {
        tracing::error!(
            category = error.category().as_str(),
            error = ?error,
            "{message}"
        );

        if self.dry_run || !error.notifies_admin() {
            return RunOutcome::Failed {
                error,
                admin_notified: false,
            };
        }

        let notification = Notification::admin_error(self.admin_email.clone(), message, Some(&error));
        let admin_notified = match self.notifier.send(&notification).await {
            Ok(_) => true,
            Err(e) => {
                tracing::error!(error = %e, "Administrative error notification was not delivered");
                false
            }
        };

        RunOutcome::Failed {
            error,
            admin_notified,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roster(n: u32) -> Vec<Player> {
        (1..=n)
            .map(|id| Player::new(id, format!("P{id}"), format!("p{id}@example.com")))
            .collect()
    }

    #[test]
    fn test_check_roster() {
        assert!(check_roster(&roster(16)).is_ok());
        assert!(check_roster(&roster(32)).is_ok());
        for n in [0, 15, 17, 31, 33] {
            assert_eq!(
                check_roster(&roster(n)),
                Err(PreconditionError::RosterSize { count: n as usize })
            );
        }
    }

    #[test]
    fn test_check_week() {
        assert!(check_week(WeekContext::new(2024, 1)).is_ok());
        assert!(check_week(WeekContext::new(2024, 18)).is_ok());
        assert!(check_week(WeekContext::new(2024, 0)).is_err());
        assert!(check_week(WeekContext::new(2024, 19)).is_err());
    }
}
