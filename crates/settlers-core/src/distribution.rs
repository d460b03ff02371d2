//! Resource production on a dice roll.
//!
//! Demand is totalled per resource kind before anything is paid. If the bank
//! cannot cover the whole demand for a kind, nobody receives that kind this
//! roll; other kinds still pay out.

use crate::board::{Board, PlayerId};
use crate::error::GameError;
use crate::resources::{Bank, Resource, ResourceHand};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Cards owed to one player for one resource kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payout {
    pub player: PlayerId,
    pub resource: Resource,
    pub amount: u32,
}

/// Outcome of distributing one roll
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DistributionReport {
    pub roll: u8,
    /// Payouts made, ordered by player then resource
    pub payouts: Vec<Payout>,
    /// Kinds that were produced but held back because the bank ran short
    pub withheld: Vec<Resource>,
}

impl DistributionReport {
    /// True if nobody received anything
    pub fn is_empty(&self) -> bool {
        self.payouts.is_empty()
    }

    /// Everything `player` received
    pub fn received_by(&self, player: PlayerId) -> ResourceHand {
        let mut hand = ResourceHand::new();
        for payout in self.payouts.iter().filter(|p| p.player == player) {
            hand.add(payout.resource, payout.amount);
        }
        hand
    }
}

/// Reject anything that is not a producing roll (2-12, excluding 7)
pub fn validate_roll(roll: u8) -> Result<(), GameError> {
    if !(2..=12).contains(&roll) || roll == 7 {
        return Err(GameError::InvalidRoll(roll));
    }
    Ok(())
}

/// Work out who gets what for `roll` without touching any state.
///
/// The result only contains payouts the bank can cover in full.
pub fn plan(board: &Board, bank: &Bank, roll: u8) -> DistributionReport {
    let mut owed: BTreeMap<(PlayerId, Resource), u32> = BTreeMap::new();

    for hex in board.topology().hex_ids() {
        if hex == board.robber_hex() {
            continue;
        }
        let Some(tile) = board.tile(hex) else {
            continue;
        };
        if tile.number_token != Some(roll) {
            continue;
        }
        let Some(resource) = tile.resource() else {
            continue;
        };

        for corner in board.topology().hex_corners(hex) {
            if let Some(building) = board.building_at(*corner) {
                *owed.entry((building.owner(), resource)).or_default() +=
                    building.resource_multiplier();
            }
        }
    }

    let mut demand = ResourceHand::new();
    for ((_, resource), amount) in &owed {
        demand.add(*resource, *amount);
    }
    let withheld: Vec<Resource> = demand
        .iter()
        .filter(|(resource, amount)| *amount > 0 && !bank.has_enough(*resource, *amount))
        .map(|(resource, _)| resource)
        .collect();

    let payouts = owed
        .into_iter()
        .filter(|((_, resource), _)| !withheld.contains(resource))
        .map(|((player, resource), amount)| Payout {
            player,
            resource,
            amount,
        })
        .collect();

    DistributionReport {
        roll,
        payouts,
        withheld,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{City, Settlement};
    use crate::topology::HexId;
    use pretty_assertions::assert_eq;

    // Standard layout: hex 1 is wood on 8, hex 12 is wheat on 8
    const WOOD_8: HexId = HexId(1);
    const WHEAT_8: HexId = HexId(12);

    fn corner(board: &Board, hex: HexId, c: usize) -> crate::topology::IntersectionId {
        board.topology().hex_corners(hex)[c]
    }

    #[test]
    fn test_validate_roll() {
        assert!(validate_roll(2).is_ok());
        assert!(validate_roll(12).is_ok());
        assert_eq!(validate_roll(7), Err(GameError::InvalidRoll(7)));
        assert_eq!(validate_roll(1), Err(GameError::InvalidRoll(1)));
        assert_eq!(validate_roll(13), Err(GameError::InvalidRoll(13)));
    }

    #[test]
    fn test_settlement_and_city_yield() {
        let mut board = Board::standard().unwrap();
        let a = corner(&board, WOOD_8, 0);
        let b = corner(&board, WOOD_8, 3);
        board.place_settlement(Settlement::new(0, a)).unwrap();
        board.place_settlement(Settlement::new(1, b)).unwrap();
        board.upgrade_to_city(City::new(1, b)).unwrap();

        let report = plan(&board, &Bank::standard(), 8);
        assert_eq!(report.received_by(0), ResourceHand::single(Resource::Wood, 1));
        assert_eq!(report.received_by(1), ResourceHand::single(Resource::Wood, 2));
        assert!(report.withheld.is_empty());
    }

    #[test]
    fn test_robbed_hex_produces_nothing() {
        let mut board = Board::standard().unwrap();
        let a = corner(&board, WOOD_8, 0);
        board.place_settlement(Settlement::new(0, a)).unwrap();
        board.move_robber_to(WOOD_8);

        let report = plan(&board, &Bank::standard(), 8);
        assert!(report.received_by(0).get(Resource::Wood) == 0);
    }

    #[test]
    fn test_unmatched_roll_is_empty() {
        let mut board = Board::standard().unwrap();
        let a = corner(&board, WOOD_8, 0);
        board.place_settlement(Settlement::new(0, a)).unwrap();

        let report = plan(&board, &Bank::standard(), 12);
        assert!(report.is_empty());
        assert!(report.withheld.is_empty());
    }

    #[test]
    fn test_shortage_withholds_only_that_kind() {
        let mut board = Board::standard().unwrap();
        let wheat_a = corner(&board, WHEAT_8, 0);
        let wheat_b = corner(&board, WHEAT_8, 3);
        let wood = corner(&board, WOOD_8, 0);
        board.place_settlement(Settlement::new(0, wheat_a)).unwrap();
        board.place_settlement(Settlement::new(1, wheat_b)).unwrap();
        board.place_settlement(Settlement::new(1, wood)).unwrap();

        // Two wheat owed, one in the bank
        let bank = Bank::with_pool(ResourceHand::from_counts([19, 19, 1, 19, 19]));
        let report = plan(&board, &bank, 8);

        assert_eq!(report.withheld, vec![Resource::Wheat]);
        assert_eq!(report.received_by(0), ResourceHand::new());
        assert_eq!(report.received_by(1), ResourceHand::single(Resource::Wood, 1));
    }
}
