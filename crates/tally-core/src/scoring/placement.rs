// Competition ranking ("1, 2, 2, 4") over units.

use super::{individual_units, Placements, Unit};
use crate::session::EntrantScore;

/// A run of units that share one placement.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacementGroup {
    /// Shared placement: the 1-based position of the group's first unit in
    /// descending score order.
    pub placement: u32,
    pub score: i64,
    /// Indices into the unit slice the groups were built from.
    pub units: Vec<usize>,
}

/// Group units by placement, best group first.
///
/// Units are sorted by score descending (stable, so equal scores keep their
/// input order). A unit joins the previous group iff its score equals that
/// group's score; otherwise it opens a new group at `index + 1`.
pub fn placement_groups(units: &[Unit]) -> Vec<PlacementGroup> {
    let mut order: Vec<usize> = (0..units.len()).collect();
    order.sort_by(|&a, &b| units[b].score.cmp(&units[a].score));

    let mut groups: Vec<PlacementGroup> = Vec::new();
    for (position, idx) in order.into_iter().enumerate() {
        let score = units[idx].score;
        match groups.last_mut() {
            Some(group) if group.score == score => group.units.push(idx),
            _ => groups.push(PlacementGroup {
                placement: position as u32 + 1,
                score,
                units: vec![idx],
            }),
        }
    }
    groups
}

/// Placement for every member of every unit.
pub fn rank_units(units: &[Unit]) -> Placements {
    let mut placement_of = vec![0u32; units.len()];
    for group in placement_groups(units) {
        for idx in group.units {
            placement_of[idx] = group.placement;
        }
    }
    super::broadcast(units, |idx| placement_of[idx])
}

/// Rank entrants individually, ignoring any team ids.
pub fn rank_individual(entrants: &[EntrantScore]) -> Placements {
    rank_units(&individual_units(entrants))
}
