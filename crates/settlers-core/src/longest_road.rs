//! Longest road: the longest trail of one player's roads over the board graph.
//!
//! A trail uses each road at most once and may revisit intersections, but it
//! cannot continue through an intersection holding another player's building.

use crate::board::{Board, PlayerId};
use crate::topology::{EdgeId, IntersectionId};
use std::collections::HashSet;

/// Minimum length to claim the longest-road bonus
pub const MIN_LONGEST_ROAD: u32 = 5;

/// Victory points the holder gets
pub const LONGEST_ROAD_POINTS: u32 = 2;

/// Length of `player`'s longest trail
pub fn longest_road(board: &Board, player: PlayerId) -> u32 {
    let roads: Vec<EdgeId> = board
        .roads()
        .filter(|r| r.owner == player)
        .map(|r| r.edge)
        .collect();

    let mut best = 0;
    let mut used = HashSet::new();
    for road in roads {
        let Some(edge) = board.topology().edge(road) else {
            continue;
        };
        for start in edge.endpoints() {
            let Some(far) = edge.other(start) else {
                continue;
            };
            used.insert(road);
            best = best.max(1 + extend(board, player, far, &mut used));
            used.remove(&road);
        }
    }
    best
}

/// Longest continuation of a trail that has just arrived at `at`
fn extend(board: &Board, player: PlayerId, at: IntersectionId, used: &mut HashSet<EdgeId>) -> u32 {
    // Can't pass through enemy building
    if board.building_owner(at).is_some_and(|owner| owner != player) {
        return 0;
    }

    let mut best = 0;
    for edge in board.topology().edges_at(at) {
        if used.contains(edge) || board.road_at(*edge).map(|r| r.owner) != Some(player) {
            continue;
        }
        let Some(next) = board.topology().edge(*edge).and_then(|e| e.other(at)) else {
            continue;
        };
        used.insert(*edge);
        best = best.max(1 + extend(board, player, next, used));
        used.remove(edge);
    }
    best
}

/// Decide who holds longest road given every player's current length.
///
/// A unique leader at or above [`MIN_LONGEST_ROAD`] takes it. On a tie the
/// incumbent keeps it if they are among the leaders, otherwise nobody holds it.
pub fn resolve_holder(lengths: &[(PlayerId, u32)], current: Option<PlayerId>) -> Option<PlayerId> {
    let best = lengths
        .iter()
        .map(|(_, len)| *len)
        .filter(|len| *len >= MIN_LONGEST_ROAD)
        .max()?;

    let leaders: Vec<PlayerId> = lengths
        .iter()
        .filter(|(_, len)| *len == best)
        .map(|(player, _)| *player)
        .collect();

    match leaders.as_slice() {
        [only] => Some(*only),
        _ => current.filter(|holder| leaders.contains(holder)),
    }
}
