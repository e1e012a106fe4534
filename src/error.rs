//! Unified error handling for the team assigner
//!
//! Domain errors from each subsystem are folded into a single [`Error`] enum so
//! the runner can decide, per [`ErrorCategory`], whether a failure is an
//! expected precondition (log and stop) or a fault that the administrator
//! has to hear about.
//!
//! # Usage
//!
//! ```rust
//! use team_assigner::error::{AssignerErrorTrait, Error, ErrorCategory, PreconditionError};
//!
//! let err: Error = PreconditionError::RosterSize { count: 15 }.into();
//! assert_eq!(err.category(), ErrorCategory::Precondition);
//! assert!(!err.notifies_admin());
//! ```

use thiserror::Error;

pub use crate::assignment::AssignmentError;
pub use crate::notifications::NotificationError;
pub use crate::schedule::ProviderError;

/// Common trait for all team assigner error types
pub trait AssignerErrorTrait: std::error::Error {
    /// Get the error category for handling strategies
    fn category(&self) -> ErrorCategory;

    /// Whether this failure warrants an administrative notification
    fn notifies_admin(&self) -> bool {
        matches!(
            self.category(),
            ErrorCategory::Retrieval | ErrorCategory::Assignment
        )
    }
}

/// Classification of errors for handling strategies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// Expected conditions that stop a run quietly (roster size, off-season)
    Precondition,
    /// Schedule data could not be retrieved
    Retrieval,
    /// Roster and team data are inconsistent
    Assignment,
    /// Delivery of a notification failed
    Notification,
}

impl ErrorCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Precondition => "precondition",
            Self::Retrieval => "retrieval",
            Self::Assignment => "assignment",
            Self::Notification => "notification",
        }
    }
}

/// Conditions under which a run stops without notifying anyone
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PreconditionError {
    #[error("For equal distribution of byes there must be either 16 or 32 players. There are currently {count} players.")]
    RosterSize { count: usize },

    #[error("year: {year} week: {week}\nNot in a regular season week.")]
    NotRegularSeason { year: i32, week: u32 },

    #[error("Could not convert '{0}' to a week number.")]
    InvalidWeekOverride(String),
}

/// Unified error type for the team assigner
#[derive(Error, Debug)]
pub enum Error {
    /// Run stopped before doing any work
    #[error(transparent)]
    Precondition(#[from] PreconditionError),

    /// Schedule data retrieval errors
    #[error("Data retrieval error: {0}")]
    Provider(#[from] ProviderError),

    /// Roster/team inconsistencies found while distributing
    #[error("Assignment error: {0}")]
    Assignment(#[from] AssignmentError),

    /// Notification delivery errors
    #[error("Notification error: {0}")]
    Notification(#[from] NotificationError),
}

impl AssignerErrorTrait for Error {
    fn category(&self) -> ErrorCategory {
        match self {
            Self::Precondition(_) => ErrorCategory::Precondition,
            Self::Provider(_) => ErrorCategory::Retrieval,
            Self::Assignment(_) => ErrorCategory::Assignment,
            Self::Notification(_) => ErrorCategory::Notification,
        }
    }
}

/// Result type alias using the unified Error type
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_category() {
        let err: Error = ProviderError::Timeout("http://x".to_string()).into();
        assert_eq!(err.category(), ErrorCategory::Retrieval);
        assert_eq!(err.category().as_str(), "retrieval");

        let err: Error = AssignmentError::no_player_for_marker(17, 16).into();
        assert_eq!(err.category(), ErrorCategory::Assignment);

        let err: Error = NotificationError::NoChannels.into();
        assert_eq!(err.category(), ErrorCategory::Notification);
    }

    #[test]
    fn test_admin_routing() {
        let retrieval: Error = ProviderError::InvalidDate("x".to_string()).into();
        assert!(retrieval.notifies_admin());

        let assignment: Error = AssignmentError::queue_exhausted(30, 31).into();
        assert!(assignment.notifies_admin());

        let precondition: Error = PreconditionError::RosterSize { count: 17 }.into();
        assert!(!precondition.notifies_admin());

        let notification: Error = NotificationError::NoChannels.into();
        assert!(!notification.notifies_admin());
    }

    #[test]
    fn test_precondition_messages() {
        let err = PreconditionError::RosterSize { count: 15 };
        assert!(err.to_string().contains("There are currently 15 players."));

        let err = PreconditionError::NotRegularSeason { year: 2024, week: 19 };
        assert!(err.to_string().contains("Not in a regular season week."));

        let err: Error = err.into();
        assert_eq!(err.category(), ErrorCategory::Precondition);
    }
}
