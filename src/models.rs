// Core data structures for the team assigner

use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque team identifier (the ESPN team nickname, e.g. "Lions")
pub type TeamName = String;

/// Number of weeks in the NFL regular season
pub const REGULAR_SEASON_WEEKS: u32 = 18;

/// Roster sizes that allow bye teams to rotate evenly across players
pub const SUPPORTED_ROSTER_SIZES: [usize; 2] = [16, 32];

/// A participant in the weekly draw
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub id: u32, // Dense 1..N, drives bye rotation order
    pub name: String,
    pub email: String,
}

impl Player {
    pub fn new(id: u32, name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            email: email.into(),
        }
    }
}

/// Season year and regular-season week for a single run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WeekContext {
    pub year: i32,
    pub week: u32,
}

impl WeekContext {
    pub fn new(year: i32, week: u32) -> Self {
        Self { year, week }
    }

    /// Whether the week falls inside weeks 1..=18
    pub fn is_regular_season(&self) -> bool {
        (1..=REGULAR_SEASON_WEEKS).contains(&self.week)
    }

    /// Weeks of the same season that precede this one, most recent first
    pub fn prior_weeks(&self) -> impl Iterator<Item = WeekContext> {
        let year = self.year;
        (1..self.week).rev().map(move |week| WeekContext::new(year, week))
    }
}

impl fmt::Display for WeekContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "year: {} week: {}", self.year, self.week)
    }
}

/// Two teams handed to one player
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assignment {
    pub player_id: u32,
    pub player_name: String,
    pub teams: [TeamName; 2],
}

impl Assignment {
    pub fn new(player: &Player, first: TeamName, second: TeamName) -> Self {
        Self {
            player_id: player.id,
            player_name: player.name.clone(),
            teams: [first, second],
        }
    }

    /// Whether this assignment carries one of the given bye teams
    pub fn has_any(&self, teams: &[TeamName]) -> bool {
        self.teams.iter().any(|t| teams.contains(t))
    }
}

impl fmt::Display for Assignment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {} & {}",
            self.player_name, self.teams[0], self.teams[1]
        )
    }
}

/// Ordered output of one distribution run
///
/// Rendering with `Display` yields the notification body: one
/// `"<name>: <team A> & <team B>"` line per player, each newline-terminated.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssignmentResult {
    pub assignments: Vec<Assignment>,
}

impl AssignmentResult {
    pub fn new(assignments: Vec<Assignment>) -> Self {
        Self { assignments }
    }

    pub fn len(&self) -> usize {
        self.assignments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assignments.is_empty()
    }

    /// Formatted lines in output order
    pub fn lines(&self) -> Vec<String> {
        self.assignments.iter().map(ToString::to_string).collect()
    }

    /// Every team handed out, in output order
    pub fn teams(&self) -> impl Iterator<Item = &TeamName> {
        self.assignments.iter().flat_map(|a| a.teams.iter())
    }

    /// Look up the assignment for a player ID
    pub fn for_player(&self, player_id: u32) -> Option<&Assignment> {
        self.assignments.iter().find(|a| a.player_id == player_id)
    }
}

impl fmt::Display for AssignmentResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for assignment in &self.assignments {
            writeln!(f, "{assignment}")?;
        }
        Ok(())
    }
}
