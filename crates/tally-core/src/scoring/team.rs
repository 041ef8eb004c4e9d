// Team-aware wrappers: collapse each team to one unit, rank and scale the
// units, then broadcast the team's values back to its members.

use std::collections::HashMap;

use tracing::warn;

use super::{individual_units, placement, scaling, DominanceMap, Placements, ScaledScores, Unit};
use crate::session::{is_team_game, EntrantScore, TeamId, DEFAULT_TEAM};

/// Collapse entrants into team units.
///
/// Teams appear in order of their first member. A team's score is its first
/// member's score; teammates are expected to share it, and a mismatch is
/// logged but otherwise ignored. An entrant without a team id in a team game
/// plays for `DEFAULT_TEAM`, the same team the log loader assigns it.
pub fn team_units(entrants: &[EntrantScore]) -> Vec<Unit> {
    let mut units: Vec<Unit> = Vec::new();
    let mut unit_of_team: HashMap<TeamId, usize> = HashMap::new();

    for entrant in entrants {
        let team = entrant.team.unwrap_or(DEFAULT_TEAM);
        match unit_of_team.get(&team) {
            Some(&idx) => {
                let unit = &mut units[idx];
                if unit.score != entrant.score {
                    warn!(
                        "Team {} member '{}' scored {} but the team scores {}; using the team score",
                        team, entrant.name, entrant.score, unit.score
                    );
                }
                unit.members.push(entrant.name.clone());
            }
            None => {
                unit_of_team.insert(team, units.len());
                units.push(Unit {
                    score: entrant.score,
                    members: vec![entrant.name.clone()],
                });
            }
        }
    }

    units
}

/// Units for an entrant list: teams if any entrant carries a team id,
/// individuals otherwise.
pub fn units_for(entrants: &[EntrantScore]) -> Vec<Unit> {
    if is_team_game(entrants) {
        team_units(entrants)
    } else {
        individual_units(entrants)
    }
}

/// Placements, ranking teams as single units when the game is a team game.
pub fn rank_team_aware(entrants: &[EntrantScore]) -> Placements {
    placement::rank_units(&units_for(entrants))
}

/// Placement-based game score over teams (or individuals).
pub fn team_game_score(entrants: &[EntrantScore]) -> ScaledScores {
    scaling::game_score_units(&units_for(entrants))
}

/// Min-max weighted game score over teams (or individuals).
pub fn team_weighted_game_score(entrants: &[EntrantScore]) -> ScaledScores {
    scaling::weighted_game_score_units(&units_for(entrants))
}

/// Dominance over team totals (or individuals). Each team counts its score
/// once, however many members it has.
pub fn team_dominance(entrants: &[EntrantScore]) -> DominanceMap {
    scaling::dominance_units(&units_for(entrants))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::placement::rank_individual;
    use crate::scoring::scaling::{dominance, game_score, weighted_game_score};

    fn two_v_one() -> Vec<EntrantScore> {
        vec![
            EntrantScore::on_team("A", 10, 1),
            EntrantScore::on_team("B", 10, 1),
            EntrantScore::on_team("C", 5, 2),
        ]
    }

    #[test]
    fn teams_ranked_as_units() {
        let placements = rank_team_aware(&two_v_one());
        assert_eq!(placements["A"], 1);
        assert_eq!(placements["B"], 1);
        assert_eq!(placements["C"], 2);
    }

    #[test]
    fn team_values_broadcast_to_members() {
        let entrants = two_v_one();
        let scores = team_game_score(&entrants);
        assert_eq!(scores["A"], 100);
        assert_eq!(scores["B"], 100);
        assert_eq!(scores["C"], 0);

        let weighted = team_weighted_game_score(&entrants);
        assert_eq!(weighted["A"], weighted["B"]);
        assert_eq!(weighted["C"], 0);
    }

    #[test]
    fn team_dominance_counts_each_team_once() {
        let dom = team_dominance(&two_v_one());
        assert_eq!(dom["A"], 66.67);
        assert_eq!(dom["B"], 66.67);
        assert_eq!(dom["C"], 33.33);
    }

    #[test]
    fn tied_teams_match_two_entrant_individual_game() {
        let teams = vec![
            EntrantScore::on_team("A", 8, 1),
            EntrantScore::on_team("B", 8, 1),
            EntrantScore::on_team("C", 8, 2),
            EntrantScore::on_team("D", 8, 2),
        ];
        let solo = vec![EntrantScore::new("X", 8), EntrantScore::new("Y", 8)];

        let team_places = rank_team_aware(&teams);
        let solo_places = rank_individual(&solo);
        assert_eq!(team_places["A"], solo_places["X"]);
        assert_eq!(team_places["D"], solo_places["Y"]);

        assert_eq!(team_game_score(&teams)["C"], game_score(&solo)["Y"]);
        assert_eq!(team_dominance(&teams)["A"], dominance(&solo)["X"]);
    }

    #[test]
    fn game_score_counts_teams_not_members() {
        // Three teams, sizes 2/2/1. slots = 2 units, not 4 members.
        let entrants = vec![
            EntrantScore::on_team("A", 9, 1),
            EntrantScore::on_team("B", 9, 1),
            EntrantScore::on_team("C", 6, 2),
            EntrantScore::on_team("D", 6, 2),
            EntrantScore::on_team("E", 3, 3),
        ];
        let scores = team_game_score(&entrants);
        assert_eq!(scores["A"], 100);
        assert_eq!(scores["C"], 50);
        assert_eq!(scores["E"], 0);
    }

    #[test]
    fn non_team_games_delegate_to_individual_path() {
        let entrants = vec![
            EntrantScore::new("A", 10),
            EntrantScore::new("B", 10),
            EntrantScore::new("C", 5),
        ];
        assert_eq!(rank_team_aware(&entrants), rank_individual(&entrants));
        assert_eq!(team_game_score(&entrants), game_score(&entrants));
        assert_eq!(team_weighted_game_score(&entrants), weighted_game_score(&entrants));
        assert_eq!(team_dominance(&entrants), dominance(&entrants));
    }

    #[test]
    fn first_member_score_wins_on_mismatch() {
        let entrants = vec![
            EntrantScore::on_team("A", 10, 1),
            EntrantScore::on_team("B", 2, 1),
            EntrantScore::on_team("C", 5, 2),
        ];
        let units = team_units(&entrants);
        assert_eq!(units.len(), 2);
        assert_eq!(units[0].score, 10);
        assert_eq!(units[0].members, vec!["A".to_string(), "B".to_string()]);
        assert_eq!(rank_team_aware(&entrants)["B"], 1);
    }

    #[test]
    fn teamless_entrant_in_team_game_plays_for_default_team() {
        let entrants = vec![
            EntrantScore::on_team("A", 3, 2),
            EntrantScore::on_team("B", 3, 2),
            EntrantScore::new("C", 6),
            EntrantScore::on_team("D", 6, DEFAULT_TEAM),
        ];
        let units = team_units(&entrants);
        assert_eq!(units.len(), 2);
        assert_eq!(units[1].members, vec!["C".to_string(), "D".to_string()]);

        let placements = rank_team_aware(&entrants);
        assert_eq!(placements["C"], 1);
        assert_eq!(placements["D"], 1);
        assert_eq!(placements["A"], 2);
        assert_eq!(team_game_score(&entrants)["C"], 100);
        assert_eq!(team_dominance(&entrants)["C"], 66.67);
    }

    #[test]
    fn single_team_game() {
        let entrants = vec![
            EntrantScore::on_team("A", 3, 1),
            EntrantScore::on_team("B", 3, 1),
        ];
        assert_eq!(team_game_score(&entrants)["B"], 100);
        assert_eq!(team_weighted_game_score(&entrants)["B"], 100);
        assert_eq!(team_dominance(&entrants)["A"], 100.0);
    }

    #[test]
    fn empty_team_inputs() {
        assert!(rank_team_aware(&[]).is_empty());
        assert!(team_game_score(&[]).is_empty());
        assert!(team_dominance(&[]).is_empty());
    }
}
