//! Team distribution
//!
//! Hands two teams to every player for the week. Two mutually exclusive
//! strategies exist:
//!
//! - **No byes**: teams and players are both shuffled and teams are dealt in
//!   pairs. Output follows the shuffled player order.
//! - **Byes**: each bye team goes to the next player in ID order after the
//!   season's bye marker, paired with a random non-bye team; everyone else
//!   gets two random non-bye teams. Output follows ascending player ID.
//!
//! The ordering difference between the two strategies is part of the
//! observable contract and is kept as is.

use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::collections::{BTreeMap, HashSet, VecDeque};

use super::error::{AssignmentError, EngineResult};
use super::fairness::wrap_marker;
use crate::models::{Assignment, AssignmentResult, Player, TeamName};

/// FIFO of shuffled teams that reports exhaustion as a typed error
#[derive(Debug)]
struct TeamQueue {
    teams: VecDeque<TeamName>,
    available: usize,
    dealt: usize,
}

impl TeamQueue {
    fn new(teams: Vec<TeamName>) -> Self {
        let available = teams.len();
        Self {
            teams: teams.into(),
            available,
            dealt: 0,
        }
    }

    fn dequeue(&mut self) -> EngineResult<TeamName> {
        self.dealt += 1;
        self.teams
            .pop_front()
            .ok_or_else(|| AssignmentError::queue_exhausted(self.available, self.dealt))
    }
}

/// Randomized team distribution engine
///
/// Holds its own RNG so that a run can be reproduced from a seed.
#[derive(Debug, Clone)]
pub struct AssignmentEngine {
    rng: ChaCha8Rng,
}

impl AssignmentEngine {
    /// Engine seeded from system entropy
    pub fn new() -> Self {
        Self {
            rng: ChaCha8Rng::from_entropy(),
        }
    }

    /// Engine with a fixed seed
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Distribute teams for one week
    ///
    /// `bye_debt` is the number of bye teams handed out earlier in the season;
    /// it is ignored when `bye_teams` is empty.
    ///
    /// # Errors
    ///
    /// - `AssignmentError::DuplicatePlayerId` if two players share an ID
    /// - `AssignmentError::TeamQueueExhausted` if there are fewer teams than
    ///   the roster needs
    /// - `AssignmentError::NoPlayerForMarker` if a bye marker points past the
    ///   roster's IDs
    pub fn distribute(
        &mut self,
        players: &[Player],
        all_teams: &[TeamName],
        bye_teams: &[TeamName],
        bye_debt: usize,
    ) -> EngineResult<AssignmentResult> {
        ensure_unique_ids(players)?;

        if bye_teams.is_empty() {
            self.distribute_evenly(players, all_teams)
        } else {
            self.distribute_with_byes(players, all_teams, bye_teams, bye_debt)
        }
    }

    fn distribute_evenly(
        &mut self,
        players: &[Player],
        all_teams: &[TeamName],
    ) -> EngineResult<AssignmentResult> {
        let mut queue = TeamQueue::new(self.shuffled_unique(all_teams));

        let mut order: Vec<&Player> = players.iter().collect();
        order.shuffle(&mut self.rng);

        let mut assignments = Vec::with_capacity(order.len());
        for player in order {
            let first = queue.dequeue()?;
            let second = queue.dequeue()?;
            assignments.push(Assignment::new(player, first, second));
        }

        Ok(AssignmentResult::new(assignments))
    }

    fn distribute_with_byes(
        &mut self,
        players: &[Player],
        all_teams: &[TeamName],
        bye_teams: &[TeamName],
        bye_debt: usize,
    ) -> EngineResult<AssignmentResult> {
        let non_bye: Vec<TeamName> = all_teams
            .iter()
            .filter(|team| !bye_teams.contains(team))
            .cloned()
            .collect();
        let mut queue = TeamQueue::new(self.shuffled_unique(&non_bye));

        let mut ordered: Vec<&Player> = players.iter().collect();
        ordered.sort_by_key(|p| p.id);

        let mut marker = wrap_marker(bye_debt, players.len());
        if marker != bye_debt {
            tracing::info!(bye_debt = %bye_debt, marker = %marker, "Bye Team Marker Set To: {}", marker);
        }

        // Keyed by ID so the final output is in ascending ID order
        let mut filled: BTreeMap<u32, Assignment> = BTreeMap::new();

        for bye_team in bye_teams {
            marker += 1;

            let player = ordered
                .iter()
                .find(|p| p.id as usize == marker)
                .ok_or_else(|| AssignmentError::no_player_for_marker(marker, players.len()))?;

            let partner = queue.dequeue()?;
            tracing::debug!(player_id = player.id, bye_team = %bye_team, "Assigned bye team");
            filled.insert(player.id, Assignment::new(player, bye_team.clone(), partner));
        }

        for player in &ordered {
            if filled.contains_key(&player.id) {
                continue;
            }
            let first = queue.dequeue()?;
            let second = queue.dequeue()?;
            filled.insert(player.id, Assignment::new(player, first, second));
        }

        Ok(AssignmentResult::new(filled.into_values().collect()))
    }

    /// Uniform shuffle, keeping the first occurrence of each team
    fn shuffled_unique(&mut self, teams: &[TeamName]) -> Vec<TeamName> {
        let mut shuffled = teams.to_vec();
        shuffled.shuffle(&mut self.rng);

        let mut seen = HashSet::with_capacity(shuffled.len());
        shuffled.retain(|team| seen.insert(team.clone()));
        shuffled
    }
}

impl Default for AssignmentEngine {
    fn default() -> Self {
        Self::new()
    }
}

fn ensure_unique_ids(players: &[Player]) -> EngineResult<()> {
    let mut ids = HashSet::with_capacity(players.len());
    for player in players {
        if !ids.insert(player.id) {
            return Err(AssignmentError::DuplicatePlayerId { id: player.id });
        }
    }
    Ok(())
}
