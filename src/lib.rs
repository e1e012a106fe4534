//! team-assigner - weekly NFL team draw with fair bye rotation
//!
//! Every week each player in a fixed 16 or 32 player roster is handed two NFL
//! teams at random. Teams on bye are rotated through the roster in player ID
//! order across the season so nobody is stuck with bye teams more often than
//! anyone else. The result is emailed to every player.
//!
//! # Architecture
//!
//! The library is organized into several modules:
//!
//! - [`config`] - Configuration file, environment overrides and validation
//! - [`schedule`] - Season, week, team and bye data from the ESPN API
//! - [`assignment`] - Bye fairness bookkeeping and the distribution engine
//! - [`notifications`] - Email delivery of assignments and error reports
//! - [`runner`] - One weekly run, from roster gate to notification
//! - [`models`] - Core data structures and types
//! - [`error`] - Unified error type and categories
//!
//! # Example
//!
//! ```no_run
//! use team_assigner::config::Config;
//! use team_assigner::notifications::NotificationManager;
//! use team_assigner::runner::TeamAssigner;
//! use team_assigner::schedule::EspnClient;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::load("config.toml".as_ref())?;
//!     let provider = EspnClient::with_base_url(&config.app.base_url, config.request_timeout())?;
//!
//!     let mut notifier = NotificationManager::new();
//!     notifier.add_email_channel(config.email.clone())?;
//!
//!     let mut assigner = TeamAssigner::new(provider, notifier, config.players.clone(), &config.app.admin_email);
//!     let outcome = assigner.run(chrono::Utc::now()).await?;
//!     println!("success: {}", outcome.is_success());
//!     Ok(())
//! }
//! ```

pub mod assignment;
pub mod config;
pub mod error;
pub mod models;
pub mod notifications;
pub mod runner;
pub mod schedule;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::assignment::{AssignmentEngine, AssignmentError, FairnessTracker};
    pub use crate::config::Config;
    pub use crate::error::{AssignerErrorTrait, Error, ErrorCategory, PreconditionError, Result};
    pub use crate::models::{Assignment, AssignmentResult, Player, TeamName, WeekContext};
    pub use crate::notifications::{Notification, NotificationManager};
    pub use crate::runner::{RunOutcome, TeamAssigner};
    pub use crate::schedule::{EspnClient, ScheduleProvider};
}

// Direct re-exports for convenience
pub use models::{AssignmentResult, Player, WeekContext};
