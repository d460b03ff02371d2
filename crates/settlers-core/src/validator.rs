//! Placement rules as pure predicates over a [`Board`].
//!
//! Nothing here mutates the board, so the `*_spots` helpers can be called as
//! often as needed to list every legal option for a player.

use crate::board::{Board, Building, PlayerId};
use crate::topology::{EdgeId, IntersectionId};

/// True if no settlement or city sits one edge away from `at`
pub fn satisfies_distance_rule(board: &Board, at: IntersectionId) -> bool {
    board
        .topology()
        .neighbors(at)
        .iter()
        .all(|n| !board.is_intersection_occupied(*n))
}

/// True if `player` owns a building at `at` or a road ending there
pub fn is_connected_to_network(board: &Board, player: PlayerId, at: IntersectionId) -> bool {
    if board.building_owner(at) == Some(player) {
        return true;
    }
    board
        .topology()
        .edges_at(at)
        .iter()
        .any(|e| board.road_at(*e).is_some_and(|r| r.owner == player))
}

/// Can `player` put a settlement on `at`?
///
/// The intersection and all its neighbours must be empty. Outside setup the
/// intersection must also touch one of the player's roads.
pub fn valid_settlement(
    board: &Board,
    player: PlayerId,
    at: IntersectionId,
    is_setup: bool,
) -> bool {
    if !board.contains_intersection(at) || board.is_intersection_occupied(at) {
        return false;
    }
    if !satisfies_distance_rule(board, at) {
        return false;
    }
    is_setup || is_connected_to_network(board, player, at)
}

/// Can `player` build a road on `edge` during normal play?
pub fn valid_road(board: &Board, player: PlayerId, edge: EdgeId) -> bool {
    let Some(edge_ends) = board.topology().edge(edge) else {
        return false;
    };
    if board.is_edge_occupied(edge) {
        return false;
    }
    edge_ends
        .endpoints()
        .iter()
        .any(|end| is_connected_to_network(board, player, *end))
}

/// Can `player` place their setup road on `edge`, given the settlement they
/// just placed at `anchor`?
pub fn valid_setup_road(
    board: &Board,
    player: PlayerId,
    edge: EdgeId,
    anchor: IntersectionId,
) -> bool {
    let Some(edge_ends) = board.topology().edge(edge) else {
        return false;
    };
    !board.is_edge_occupied(edge)
        && edge_ends.touches(anchor)
        && board.building_owner(anchor) == Some(player)
}

/// Can `player` upgrade the building at `at` to a city?
pub fn valid_city(board: &Board, player: PlayerId, at: IntersectionId) -> bool {
    board.building_at(at) == Some(Building::Settlement(player))
}

// ==================== Enumeration ====================

pub fn settlement_spots(board: &Board, player: PlayerId, is_setup: bool) -> Vec<IntersectionId> {
    board
        .topology()
        .intersection_ids()
        .filter(|at| valid_settlement(board, player, *at, is_setup))
        .collect()
}

pub fn road_spots(board: &Board, player: PlayerId) -> Vec<EdgeId> {
    board
        .topology()
        .edge_ids()
        .filter(|e| valid_road(board, player, *e))
        .collect()
}

pub fn setup_road_spots(board: &Board, player: PlayerId, anchor: IntersectionId) -> Vec<EdgeId> {
    board
        .topology()
        .edges_at(anchor)
        .iter()
        .copied()
        .filter(|e| valid_setup_road(board, player, *e, anchor))
        .collect()
}

pub fn city_spots(board: &Board, player: PlayerId) -> Vec<IntersectionId> {
    let mut spots: Vec<IntersectionId> = board
        .settlements()
        .filter(|s| s.owner == player)
        .map(|s| s.location)
        .collect();
    spots.sort_unstable();
    spots
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{City, Road, Settlement};
    use crate::topology::HexId;
    use pretty_assertions::assert_eq;

    fn board() -> Board {
        Board::standard().unwrap()
    }

    /// An intersection two edges away from `at`
    fn two_steps_from(board: &Board, at: IntersectionId) -> IntersectionId {
        let topo = board.topology();
        let near = topo.neighbors(at);
        topo.neighbors(near[0])
            .iter()
            .copied()
            .find(|far| *far != at && !near.contains(far))
            .unwrap()
    }

    #[test]
    fn test_distance_rule() {
        let mut board = board();
        let at = board.topology().hex_corners(HexId(0))[0];
        board.place_settlement(Settlement::new(0, at)).unwrap();

        for neighbor in board.topology().neighbors(at).to_vec() {
            assert!(!valid_settlement(&board, 1, neighbor, true));
            assert!(!valid_settlement(&board, 0, neighbor, true));
        }
        let far = two_steps_from(&board, at);
        assert!(valid_settlement(&board, 1, far, true));
    }

    #[test]
    fn test_occupied_intersection_is_invalid() {
        let mut board = board();
        let at = board.topology().hex_corners(HexId(3))[2];
        board.place_settlement(Settlement::new(2, at)).unwrap();
        assert!(!valid_settlement(&board, 2, at, true));
    }

    #[test]
    fn test_normal_settlement_needs_own_road() {
        let mut board = board();
        let home = board.topology().hex_corners(HexId(0))[0];
        board.place_settlement(Settlement::new(0, home)).unwrap();
        let far = two_steps_from(&board, home);
        assert!(!valid_settlement(&board, 0, far, false));

        let mid = board.topology().neighbors(home)[0];
        let first = board.topology().edge_between(home, mid).unwrap();
        let second = board.topology().edge_between(mid, far).unwrap();
        board.place_road(Road::new(0, first)).unwrap();
        board.place_road(Road::new(0, second)).unwrap();

        assert!(valid_settlement(&board, 0, far, false));
        assert!(!valid_settlement(&board, 1, far, false));
    }

    #[test]
    fn test_road_must_connect() {
        let mut board = board();
        let home = board.topology().hex_corners(HexId(9))[0];
        board.place_settlement(Settlement::new(1, home)).unwrap();

        for edge in board.topology().edges_at(home).to_vec() {
            assert!(valid_road(&board, 1, edge));
            assert!(!valid_road(&board, 0, edge));
        }

        let spots = road_spots(&board, 1);
        assert_eq!(spots.len(), board.topology().edges_at(home).len());
    }

    #[test]
    fn test_road_extends_from_own_road() {
        let mut board = board();
        let home = board.topology().hex_corners(HexId(9))[0];
        let mid = board.topology().neighbors(home)[0];
        board.place_settlement(Settlement::new(1, home)).unwrap();
        let first = board.topology().edge_between(home, mid).unwrap();
        board.place_road(Road::new(1, first)).unwrap();

        let onward: Vec<EdgeId> = board
            .topology()
            .edges_at(mid)
            .iter()
            .copied()
            .filter(|e| *e != first)
            .collect();
        for edge in onward {
            assert!(valid_road(&board, 1, edge));
        }
        assert!(!valid_road(&board, 1, first));
    }

    #[test]
    fn test_setup_road_must_touch_anchor() {
        let mut board = board();
        let anchor = board.topology().hex_corners(HexId(12))[1];
        board.place_settlement(Settlement::new(0, anchor)).unwrap();

        let touching = setup_road_spots(&board, 0, anchor);
        assert_eq!(touching.len(), board.topology().edges_at(anchor).len());
        for edge in board.topology().edge_ids() {
            let touches = board.topology().edge(edge).unwrap().touches(anchor);
            assert_eq!(valid_setup_road(&board, 0, edge, anchor), touches);
        }
        assert!(!valid_setup_road(&board, 1, touching[0], anchor));
    }

    #[test]
    fn test_city_spots() {
        let mut board = board();
        let a = board.topology().hex_corners(HexId(5))[0];
        let b = board.topology().hex_corners(HexId(15))[3];
        board.place_settlement(Settlement::new(3, a)).unwrap();
        board.place_settlement(Settlement::new(3, b)).unwrap();
        assert!(valid_city(&board, 3, a));
        assert!(!valid_city(&board, 2, a));

        board.upgrade_to_city(City::new(3, a)).unwrap();
        assert!(!valid_city(&board, 3, a));
        assert_eq!(city_spots(&board, 3), vec![b]);
    }

    #[test]
    fn test_setup_spots_on_empty_board() {
        let board = board();
        assert_eq!(settlement_spots(&board, 0, true).len(), 54);
        assert!(settlement_spots(&board, 0, false).is_empty());
    }
}
