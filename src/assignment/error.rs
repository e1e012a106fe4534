//! Error types for the assignment engine

use std::fmt;

/// Result type for assignment operations
pub type EngineResult<T> = Result<T, AssignmentError>;

/// Data inconsistencies between the roster and the live team list
///
/// None of these are recoverable within a run: they mean the configured
/// roster and the provider's teams cannot be distributed as required.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssignmentError {
    /// The shuffled team queue ran dry before every player was served
    TeamQueueExhausted {
        available: usize,
        requested: usize,
    },

    /// No player carries the ID the bye marker pointed at
    NoPlayerForMarker {
        marker: usize,
        player_count: usize,
    },

    /// Two roster entries share an ID
    DuplicatePlayerId {
        id: u32,
    },
}

impl fmt::Display for AssignmentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TeamQueueExhausted {
                available,
                requested,
            } => {
                write!(
                    f,
                    "Team queue exhausted: requested team #{} but only {} were available",
                    requested, available
                )
            }
            Self::NoPlayerForMarker {
                marker,
                player_count,
            } => {
                write!(
                    f,
                    "No player with ID {} for bye marker (roster has {} players)",
                    marker, player_count
                )
            }
            Self::DuplicatePlayerId { id } => {
                write!(f, "Player ID {} appears more than once in the roster", id)
            }
        }
    }
}

impl std::error::Error for AssignmentError {}

impl AssignmentError {
    /// Create a queue exhaustion error
    pub fn queue_exhausted(available: usize, requested: usize) -> Self {
        Self::TeamQueueExhausted {
            available,
            requested,
        }
    }

    /// Create a missing bye recipient error
    pub fn no_player_for_marker(marker: usize, player_count: usize) -> Self {
        Self::NoPlayerForMarker {
            marker,
            player_count,
        }
    }
}
