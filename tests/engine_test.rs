//! Distribution engine behaviour over full rosters

mod common;

use common::{roster, teams};
use proptest::prelude::*;
use statrs::distribution::{ChiSquared, ContinuousCDF};
use std::collections::{HashMap, HashSet};
use team_assigner::assignment::{AssignmentEngine, AssignmentError};
use team_assigner::models::TeamName;

fn names(list: &[&str]) -> Vec<TeamName> {
    list.iter().map(|s| s.to_string()).collect()
}

/// 32 teams where the given names are the first entries
fn league_with(byes: &[&str]) -> Vec<TeamName> {
    let mut all = names(byes);
    all.extend(teams(32 - byes.len()));
    all
}

proptest! {
    #[test]
    fn every_player_gets_two_distinct_teams(
        seed in any::<u64>(),
        bye_count in 0usize..=6,
        base_debt in 0usize..=10,
        wrapped in any::<bool>(),
    ) {
        let players = roster(16);
        let all = teams(32);
        let byes: Vec<TeamName> = all[..bye_count].to_vec();
        let debt = base_debt + if wrapped { 16 } else { 0 };

        let mut engine = AssignmentEngine::with_seed(seed);
        let result = engine.distribute(&players, &all, &byes, debt).unwrap();

        // coverage
        prop_assert_eq!(result.len(), 16);
        let ids: HashSet<u32> = result.assignments.iter().map(|a| a.player_id).collect();
        prop_assert_eq!(ids, (1..=16).collect::<HashSet<u32>>());

        // no team handed out twice, and 16 players use up all 32
        let handed: Vec<&TeamName> = result.teams().collect();
        let unique: HashSet<&TeamName> = handed.iter().copied().collect();
        prop_assert_eq!(handed.len(), 32);
        prop_assert_eq!(unique.len(), 32);

        for assignment in &result.assignments {
            prop_assert_ne!(&assignment.teams[0], &assignment.teams[1]);
            let bye_held = assignment.teams.iter().filter(|t| byes.contains(t)).count();
            prop_assert!(bye_held <= 1);
        }

        // bye teams go to consecutive ids after the marker
        for (offset, bye) in byes.iter().enumerate() {
            let id = (base_debt + offset + 1) as u32;
            let holder = result.for_player(id).unwrap();
            prop_assert_eq!(&holder.teams[0], bye);
        }
    }

    #[test]
    fn bye_branch_output_is_in_id_order(seed in any::<u64>(), debt in 0usize..=14) {
        let mut engine = AssignmentEngine::with_seed(seed);
        let result = engine
            .distribute(&roster(16), &league_with(&["Lions", "Bears"]), &names(&["Lions", "Bears"]), debt)
            .unwrap();

        let ids: Vec<u32> = result.assignments.iter().map(|a| a.player_id).collect();
        prop_assert_eq!(ids, (1..=16).collect::<Vec<u32>>());
    }
}

#[test]
fn test_byes_continue_from_debt() {
    let mut engine = AssignmentEngine::with_seed(11);
    let result = engine
        .distribute(&roster(16), &league_with(&["A", "B"]), &names(&["A", "B"]), 3)
        .unwrap();

    assert_eq!(result.for_player(4).unwrap().teams[0], "A");
    assert_eq!(result.for_player(5).unwrap().teams[0], "B");
    for id in (1..=16).filter(|id| *id != 4 && *id != 5) {
        assert!(!result.for_player(id).unwrap().has_any(&names(&["A", "B"])));
    }
}

#[test]
fn test_sixteen_player_wrap() {
    let mut engine = AssignmentEngine::with_seed(5);
    let result = engine
        .distribute(&roster(16), &league_with(&["A", "B"]), &names(&["A", "B"]), 20)
        .unwrap();

    assert_eq!(result.for_player(5).unwrap().teams[0], "A");
    assert_eq!(result.for_player(6).unwrap().teams[0], "B");
}

#[test]
fn test_thirty_two_players_do_not_wrap() {
    // 32 players need 64 teams; the league only has 32 so give it enough
    let mut all = names(&["A"]);
    all.extend(teams(64));
    let mut engine = AssignmentEngine::with_seed(5);
    let result = engine
        .distribute(&roster(32), &all, &names(&["A"]), 20)
        .unwrap();

    assert_eq!(result.for_player(21).unwrap().teams[0], "A");
}

#[test]
fn test_end_of_rotation_scenario() {
    // 14 byes handed out so far: players 15 and 16 are next
    let mut engine = AssignmentEngine::with_seed(2024);
    let result = engine
        .distribute(
            &roster(16),
            &league_with(&["Lions", "Bears"]),
            &names(&["Lions", "Bears"]),
            14,
        )
        .unwrap();

    let lines = result.lines();
    assert_eq!(lines.len(), 16);
    assert!(lines[14].starts_with("Player 15: Lions & "));
    assert!(lines[15].starts_with("Player 16: Bears & "));
}

#[test]
fn test_marker_past_roster_is_an_error() {
    let mut engine = AssignmentEngine::with_seed(1);
    let err = engine
        .distribute(&roster(16), &league_with(&["A", "B"]), &names(&["A", "B"]), 15)
        .unwrap_err();

    assert_eq!(
        err,
        AssignmentError::NoPlayerForMarker {
            marker: 17,
            player_count: 16
        }
    );
}

#[test]
fn test_full_roster_exhausts_league() {
    let mut engine = AssignmentEngine::with_seed(1);
    let err = engine
        .distribute(&roster(32), &teams(32), &[], 0)
        .unwrap_err();

    assert!(matches!(err, AssignmentError::TeamQueueExhausted { available: 32, .. }));
}

#[test]
fn test_no_bye_draw_is_unbiased() {
    const TRIALS: usize = 16_000;

    let players = roster(16);
    let all = teams(32);
    let mut engine = AssignmentEngine::with_seed(0xC0FFEE);

    // which player ends up holding Team 0
    let mut holders: HashMap<u32, usize> = HashMap::new();
    for _ in 0..TRIALS {
        let result = engine.distribute(&players, &all, &[], 0).unwrap();
        let holder = result
            .assignments
            .iter()
            .find(|a| a.teams.contains(&"Team 0".to_string()))
            .unwrap();
        *holders.entry(holder.player_id).or_default() += 1;
    }

    let expected = TRIALS as f64 / 16.0;
    let statistic: f64 = (1..=16)
        .map(|id| {
            let observed = *holders.get(&id).unwrap_or(&0) as f64;
            (observed - expected).powi(2) / expected
        })
        .sum();

    let critical = ChiSquared::new(15.0).unwrap().inverse_cdf(0.999);
    assert!(
        statistic < critical,
        "chi-squared {statistic:.2} exceeds {critical:.2}"
    );
}

#[test]
fn test_no_bye_pairing_is_unbiased() {
    const TRIALS: usize = 31_000;

    let players = roster(16);
    let all = teams(32);
    let mut engine = AssignmentEngine::with_seed(0xBADA55);

    // which team ends up sharing a player with Team 0
    let mut partners: HashMap<TeamName, usize> = HashMap::new();
    for _ in 0..TRIALS {
        let result = engine.distribute(&players, &all, &[], 0).unwrap();
        let [first, second] = &result
            .assignments
            .iter()
            .find(|a| a.teams.contains(&"Team 0".to_string()))
            .unwrap()
            .teams;
        let partner = if first == "Team 0" { second } else { first };
        *partners.entry(partner.clone()).or_default() += 1;
    }

    assert!(!partners.contains_key("Team 0"));

    let expected = TRIALS as f64 / 31.0;
    let statistic: f64 = all[1..]
        .iter()
        .map(|team| {
            let observed = *partners.get(team).unwrap_or(&0) as f64;
            (observed - expected).powi(2) / expected
        })
        .sum();

    let critical = ChiSquared::new(30.0).unwrap().inverse_cdf(0.999);
    assert!(
        statistic < critical,
        "chi-squared {statistic:.2} exceeds {critical:.2}"
    );
}
