//! Robber rules: discards on a 7, relocation and choosing whom to rob.

use crate::board::{Board, PlayerId};
use crate::error::GameError;
use crate::resources::ResourceHand;
use crate::topology::HexId;

/// Hands above this size must be halved when a 7 is rolled
pub const DISCARD_THRESHOLD: u32 = 7;

/// True if a hand is over the discard threshold
pub fn must_discard(hand: &ResourceHand) -> bool {
    hand.total() > DISCARD_THRESHOLD
}

/// How many cards the holder of `hand` must give up (half, rounded down)
pub fn discard_count(hand: &ResourceHand) -> u32 {
    if must_discard(hand) {
        hand.total() / 2
    } else {
        0
    }
}

/// Check a proposed discard against the hand it comes out of
pub fn check_discard(hand: &ResourceHand, discard: &ResourceHand) -> Result<(), GameError> {
    let required = discard_count(hand);
    if discard.total() != required {
        return Err(GameError::InvalidDiscard {
            required,
            submitted: discard.total(),
        });
    }
    if let Some((resource, requested)) = discard.iter().find(|(r, n)| hand.get(*r) < *n) {
        return Err(GameError::InsufficientResources {
            resource,
            available: hand.get(resource),
            requested,
        });
    }
    Ok(())
}

/// Every hex except the one the robber is on
pub fn valid_destinations(board: &Board) -> Vec<HexId> {
    board
        .topology()
        .hex_ids()
        .filter(|hex| *hex != board.robber_hex())
        .collect()
}

/// Reject unknown hexes and the robber's current hex
pub fn check_destination(board: &Board, hex: HexId) -> Result<(), GameError> {
    if !board.contains_hex(hex) {
        return Err(GameError::UnknownHex(hex));
    }
    if hex == board.robber_hex() {
        return Err(GameError::RobberMustMove(hex));
    }
    Ok(())
}

/// Players `thief` may rob: anyone else with a building on the robber's hex
/// who holds at least one card
pub fn robbable_players<F>(board: &Board, thief: PlayerId, cards_held: F) -> Vec<PlayerId>
where
    F: Fn(PlayerId) -> u32,
{
    board
        .owners_on_hex(board.robber_hex())
        .into_iter()
        .filter(|owner| *owner != thief && cards_held(*owner) > 0)
        .collect()
}
