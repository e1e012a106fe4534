//! Weekly team assignment
//!
//! # Overview
//!
//! The assignment subsystem maps a fixed roster of players to two NFL teams
//! each, such that teams on bye rotate fairly through the roster over the
//! season.
//!
//! - [`fairness`] - byes-to-date bookkeeping and the 16-player wrap
//! - [`engine`] - the randomized distribution itself
//! - [`error`] - data inconsistencies detected while distributing
//!
//! # Example
//!
//! ```
//! use team_assigner::assignment::AssignmentEngine;
//! use team_assigner::models::Player;
//!
//! let players: Vec<Player> = (1..=16)
//!     .map(|id| Player::new(id, format!("Player {id}"), format!("p{id}@example.com")))
//!     .collect();
//! let teams: Vec<String> = (0..32).map(|i| format!("Team {i}")).collect();
//! let byes = vec![teams[0].clone(), teams[1].clone()];
//!
//! let result = AssignmentEngine::with_seed(1)
//!     .distribute(&players, &teams, &byes, 3)
//!     .unwrap();
//!
//! assert_eq!(result.len(), 16);
//! assert_eq!(result.for_player(4).unwrap().teams[0], "Team 0");
//! assert_eq!(result.for_player(5).unwrap().teams[0], "Team 1");
//! ```

pub mod engine;
pub mod error;
pub mod fairness;

pub use engine::AssignmentEngine;
pub use error::{AssignmentError, EngineResult};
pub use fairness::{wrap_marker, FairnessTracker, BYE_SLOTS_PER_ROTATION};
