//! Resource cards, hands and the bank.
//!
//! A [`ResourceHand`] is a fixed-size count per resource kind and backs both a
//! player's inventory and the [`Bank`]'s pool. Counts never go negative: every
//! removal goes through [`ResourceHand::remove`] or
//! [`ResourceHand::remove_hand`], which reject instead of underflowing.

use crate::error::GameError;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Resource kinds produced by land hexes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Resource {
    Wood,
    Brick,
    Wheat,
    Ore,
    Sheep,
}

impl Resource {
    /// All resource types
    pub const ALL: [Resource; 5] = [
        Resource::Wood,
        Resource::Brick,
        Resource::Wheat,
        Resource::Ore,
        Resource::Sheep,
    ];

    const fn index(self) -> usize {
        match self {
            Resource::Wood => 0,
            Resource::Brick => 1,
            Resource::Wheat => 2,
            Resource::Ore => 3,
            Resource::Sheep => 4,
        }
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Resource::Wood => "wood",
            Resource::Brick => "brick",
            Resource::Wheat => "wheat",
            Resource::Ore => "ore",
            Resource::Sheep => "sheep",
        };
        f.write_str(name)
    }
}

/// A hand of resources
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ResourceHand {
    counts: [u32; 5],
}

impl ResourceHand {
    /// Create an empty hand
    pub const fn new() -> Self {
        Self { counts: [0; 5] }
    }

    /// Counts in [`Resource::ALL`] order: wood, brick, wheat, ore, sheep
    pub const fn from_counts(counts: [u32; 5]) -> Self {
        Self { counts }
    }

    /// Build a hand from `(resource, amount)` pairs; repeated kinds add up
    pub fn from_pairs(pairs: &[(Resource, u32)]) -> Self {
        let mut hand = Self::new();
        for (resource, amount) in pairs {
            hand.add(*resource, *amount);
        }
        hand
    }

    /// Create a hand with a single resource
    pub fn single(resource: Resource, amount: u32) -> Self {
        let mut hand = Self::new();
        hand.add(resource, amount);
        hand
    }

    /// Total number of resource cards
    pub fn total(&self) -> u32 {
        self.counts.iter().sum()
    }

    /// Check if hand is empty
    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }

    /// Get count of a specific resource
    pub fn get(&self, resource: Resource) -> u32 {
        self.counts[resource.index()]
    }

    /// Add resources to hand
    pub fn add(&mut self, resource: Resource, amount: u32) {
        self.counts[resource.index()] += amount;
    }

    /// Add another hand to this one
    pub fn add_hand(&mut self, other: &ResourceHand) {
        for (mine, theirs) in self.counts.iter_mut().zip(other.counts) {
            *mine += theirs;
        }
    }

    /// Remove resources, rejecting the removal if it would go negative
    pub fn remove(&mut self, resource: Resource, amount: u32) -> Result<(), GameError> {
        let available = self.get(resource);
        if available < amount {
            return Err(GameError::InsufficientResources {
                resource,
                available,
                requested: amount,
            });
        }
        self.counts[resource.index()] -= amount;
        Ok(())
    }

    /// Remove a whole hand, all or nothing
    pub fn remove_hand(&mut self, cost: &ResourceHand) -> Result<(), GameError> {
        if let Some((resource, requested)) = cost.iter().find(|(r, n)| self.get(*r) < *n) {
            return Err(GameError::InsufficientResources {
                resource,
                available: self.get(resource),
                requested,
            });
        }
        for (mine, theirs) in self.counts.iter_mut().zip(cost.counts) {
            *mine -= theirs;
        }
        Ok(())
    }

    /// Check if can afford a cost
    pub fn can_afford(&self, cost: &ResourceHand) -> bool {
        self.counts
            .iter()
            .zip(cost.counts.iter())
            .all(|(have, need)| have >= need)
    }

    /// Every kind with its count, zero counts included
    pub fn iter(&self) -> impl Iterator<Item = (Resource, u32)> + '_ {
        Resource::ALL.into_iter().zip(self.counts.iter().copied())
    }

    /// Remove one card chosen uniformly among all cards held.
    ///
    /// Kinds are weighted by count: a hand of 3 wheat and 1 ore gives up wheat
    /// three times out of four.
    pub fn steal_random<R: Rng>(&mut self, rng: &mut R) -> Option<Resource> {
        let total = self.total();
        if total == 0 {
            return None;
        }

        let mut pick = rng.gen_range(0..total);
        for (resource, count) in Resource::ALL.into_iter().zip(self.counts) {
            if pick < count {
                self.counts[resource.index()] -= 1;
                return Some(resource);
            }
            pick -= count;
        }
        None
    }
}

impl fmt::Display for ResourceHand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .iter()
            .filter(|(_, n)| *n > 0)
            .map(|(r, n)| format!("{n} {r}"))
            .collect();
        if parts.is_empty() {
            f.write_str("nothing")
        } else {
            f.write_str(&parts.join(", "))
        }
    }
}

/// Building costs
pub mod costs {
    use super::ResourceHand;

    /// 1 wood, 1 brick
    pub const ROAD: ResourceHand = ResourceHand::from_counts([1, 1, 0, 0, 0]);

    /// 1 wood, 1 brick, 1 wheat, 1 sheep
    pub const SETTLEMENT: ResourceHand = ResourceHand::from_counts([1, 1, 1, 0, 1]);

    /// 3 ore, 2 wheat
    pub const CITY: ResourceHand = ResourceHand::from_counts([0, 0, 2, 3, 0]);

    /// 1 ore, 1 wheat, 1 sheep
    pub const DEVELOPMENT_CARD: ResourceHand = ResourceHand::from_counts([0, 0, 1, 1, 1]);
}

/// Cards of each kind the bank holds at the start of a game
pub const BANK_STARTING_COUNT: u32 = 19;

/// The shared supply of resource cards
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bank {
    pool: ResourceHand,
}

impl Bank {
    /// A full bank: 19 cards of every kind
    pub fn standard() -> Self {
        Self::with_pool(ResourceHand::from_counts([BANK_STARTING_COUNT; 5]))
    }

    pub fn with_pool(pool: ResourceHand) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &ResourceHand {
        &self.pool
    }

    pub fn available(&self, resource: Resource) -> u32 {
        self.pool.get(resource)
    }

    pub fn has_enough(&self, resource: Resource, amount: u32) -> bool {
        self.pool.get(resource) >= amount
    }

    pub fn total(&self) -> u32 {
        self.pool.total()
    }

    /// Return cards to the bank
    pub fn deposit(&mut self, resource: Resource, amount: u32) {
        self.pool.add(resource, amount);
    }

    pub fn deposit_hand(&mut self, hand: &ResourceHand) {
        self.pool.add_hand(hand);
    }

    /// Take cards out of the bank, rejecting if it cannot cover them
    pub fn withdraw(&mut self, resource: Resource, amount: u32) -> Result<(), GameError> {
        self.pool.remove(resource, amount)
    }

    pub fn withdraw_hand(&mut self, hand: &ResourceHand) -> Result<(), GameError> {
        self.pool.remove_hand(hand)
    }
}

impl Default for Bank {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_resource_hand_total() {
        let hand = ResourceHand::from_counts([1, 2, 3, 4, 5]);
        assert_eq!(hand.total(), 15);
    }

    #[test]
    fn test_resource_hand_can_afford() {
        let hand = ResourceHand::from_counts([2, 2, 2, 2, 2]);
        assert!(hand.can_afford(&costs::SETTLEMENT));
        assert!(!hand.can_afford(&costs::CITY));
    }

    #[test]
    fn test_remove_rejects_underflow() {
        let mut hand = ResourceHand::single(Resource::Ore, 1);
        let err = hand.remove(Resource::Ore, 2).unwrap_err();
        assert_eq!(
            err,
            GameError::InsufficientResources {
                resource: Resource::Ore,
                available: 1,
                requested: 2
            }
        );
        assert_eq!(hand.get(Resource::Ore), 1);
    }

    #[test]
    fn test_remove_hand_is_all_or_nothing() {
        let mut hand = ResourceHand::from_pairs(&[(Resource::Wood, 1), (Resource::Wheat, 5)]);
        let before = hand;
        assert!(hand.remove_hand(&costs::ROAD).is_err());
        assert_eq!(hand, before);

        hand.add(Resource::Brick, 1);
        hand.remove_hand(&costs::ROAD).unwrap();
        assert_eq!(hand, ResourceHand::single(Resource::Wheat, 5));
    }

    #[test]
    fn test_building_costs() {
        assert_eq!(costs::ROAD.total(), 2);
        assert_eq!(costs::SETTLEMENT.total(), 4);
        assert_eq!(costs::CITY.get(Resource::Ore), 3);
        assert_eq!(costs::CITY.get(Resource::Wheat), 2);
        assert_eq!(costs::DEVELOPMENT_CARD.total(), 3);
    }

    #[test]
    fn test_steal_random_single_card() {
        let mut hand = ResourceHand::single(Resource::Wheat, 1);
        let mut rng = StdRng::seed_from_u64(7);

        assert_eq!(hand.steal_random(&mut rng), Some(Resource::Wheat));
        assert!(hand.is_empty());
        assert_eq!(hand.steal_random(&mut rng), None);
    }

    #[test]
    fn test_steal_random_drains_mixed_hand() {
        let mut hand = ResourceHand::from_counts([2, 0, 1, 3, 1]);
        let mut rng = StdRng::seed_from_u64(3);

        let mut stolen = ResourceHand::new();
        while let Some(resource) = hand.steal_random(&mut rng) {
            stolen.add(resource, 1);
        }
        assert!(hand.is_empty());
        assert_eq!(stolen, ResourceHand::from_counts([2, 0, 1, 3, 1]));
    }

    #[test]
    fn test_steal_random_is_weighted_by_count() {
        let mut rng = StdRng::seed_from_u64(42);
        let mut wheat = 0;
        for _ in 0..4000 {
            let mut hand = ResourceHand::from_pairs(&[(Resource::Wheat, 3), (Resource::Ore, 1)]);
            if hand.steal_random(&mut rng) == Some(Resource::Wheat) {
                wheat += 1;
            }
            assert_eq!(hand.total(), 3);
        }
        // Expect ~3000; a kind-uniform pick would give ~2000
        assert!((2700..3300).contains(&wheat), "wheat stolen {wheat} times");
    }

    #[test]
    fn test_bank_starts_with_nineteen_each() {
        let bank = Bank::standard();
        for resource in Resource::ALL {
            assert_eq!(bank.available(resource), 19);
        }
        assert_eq!(bank.total(), 95);
    }

    #[test]
    fn test_bank_withdraw_and_deposit() {
        let mut bank = Bank::standard();
        bank.withdraw(Resource::Sheep, 19).unwrap();
        assert!(!bank.has_enough(Resource::Sheep, 1));
        assert!(bank.withdraw(Resource::Sheep, 1).is_err());

        bank.deposit_hand(&costs::SETTLEMENT);
        assert_eq!(bank.available(Resource::Sheep), 1);
        assert_eq!(bank.available(Resource::Wood), 20);
    }

    #[test]
    fn test_display() {
        let hand = ResourceHand::from_pairs(&[(Resource::Ore, 3), (Resource::Wheat, 2)]);
        assert_eq!(hand.to_string(), "2 wheat, 3 ore");
        assert_eq!(ResourceHand::new().to_string(), "nothing");
    }
}
