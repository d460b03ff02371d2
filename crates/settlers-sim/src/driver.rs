//! Self-play loop.
//!
//! Every seat is played by a [`RandomStrategy`] that only ever picks from the
//! engine's own lists of legal moves. Any rejection is therefore a bug in the
//! engine and aborts the run.

use anyhow::{bail, Context};
use rand::prelude::*;
use settlers_core::{costs, GameState, PlayerId, ResourceHand, RollOutcome};
use tracing::debug;

/// Picks uniformly among legal options
pub struct RandomStrategy {
    rng: StdRng,
}

impl RandomStrategy {
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    fn pick<T: Copy>(&mut self, options: &[T]) -> Option<T> {
        options.choose(&mut self.rng).copied()
    }

    /// Random cards adding up to `count`, drawn from `hand`
    fn pick_discard(&mut self, hand: &ResourceHand, count: u32) -> ResourceHand {
        let mut left = *hand;
        let mut discard = ResourceHand::new();
        for _ in 0..count {
            if let Some(resource) = left.steal_random(&mut self.rng) {
                discard.add(resource, 1);
            }
        }
        discard
    }
}

impl Default for RandomStrategy {
    fn default() -> Self {
        Self::new()
    }
}

/// How a simulated game ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Summary {
    /// Normal-phase turns played
    pub turns: u32,
    pub winner: Option<PlayerId>,
    /// Final victory points, by seat
    pub points: Vec<u32>,
}

/// Play `game` from the start until someone wins or `max_turns` have passed
pub fn play(
    game: &mut GameState,
    strategy: &mut RandomStrategy,
    max_turns: u32,
) -> anyhow::Result<Summary> {
    play_setup(game, strategy)?;

    while game.turn_number() <= max_turns && !game.check_victory() {
        play_turn(game, strategy)?;
        if game.check_victory() {
            break;
        }
        game.end_turn()?;
    }

    Ok(Summary {
        turns: game.turn_number(),
        winner: game.winning_player(),
        points: game
            .players
            .iter()
            .map(|p| p.victory_points())
            .collect(),
    })
}

fn play_setup(game: &mut GameState, strategy: &mut RandomStrategy) -> anyhow::Result<()> {
    while game.phase().is_setup() {
        let player = game.current_player();
        let Some(at) = strategy.pick(&game.valid_settlement_placements(player, true)) else {
            bail!("player {player} has nowhere to place a setup settlement");
        };
        game.place_setup_settlement(player, at)?;

        let Some(edge) = strategy.pick(&game.valid_road_placements(player, true)) else {
            bail!("player {player} has nowhere to place a setup road");
        };
        game.place_setup_road(player, edge)?;
    }
    Ok(())
}

fn play_turn(game: &mut GameState, strategy: &mut RandomStrategy) -> anyhow::Result<()> {
    let player = game.current_player();

    if let RollOutcome::RobberActivated { .. } = game.roll_and_distribute()? {
        resolve_robber(game, strategy, player)?;
    }

    let piece_left = game.players[player as usize].cities_remaining > 0;
    let resources = game.players[player as usize].resources;
    if piece_left && resources.can_afford(&costs::CITY) {
        if let Some(at) = strategy.pick(&game.valid_city_placements(player)) {
            game.build_city(player, at)
                .with_context(|| format!("player {player} city at {at}"))?;
        }
    }

    let piece_left = game.players[player as usize].settlements_remaining > 0;
    let resources = game.players[player as usize].resources;
    if piece_left && resources.can_afford(&costs::SETTLEMENT) {
        if let Some(at) = strategy.pick(&game.valid_settlement_placements(player, false)) {
            game.build_settlement(player, at)
                .with_context(|| format!("player {player} settlement at {at}"))?;
        }
    }

    let piece_left = game.players[player as usize].roads_remaining > 0;
    let resources = game.players[player as usize].resources;
    if piece_left && resources.can_afford(&costs::ROAD) {
        if let Some(edge) = strategy.pick(&game.valid_road_placements(player, false)) {
            game.build_road(player, edge)
                .with_context(|| format!("player {player} road on {edge}"))?;
        }
    }

    let resources = game.players[player as usize].resources;
    if resources.can_afford(&costs::DEVELOPMENT_CARD) && game.dev_cards_remaining() > 0 {
        let card = game.buy_development_card(player)?;
        debug!(player, ?card, "drew development card");
    }
    Ok(())
}

fn resolve_robber(
    game: &mut GameState,
    strategy: &mut RandomStrategy,
    player: PlayerId,
) -> anyhow::Result<()> {
    for seat in 0..game.player_count() as PlayerId {
        if game.must_discard(seat) {
            let hand = game.players[seat as usize].resources;
            let discard = strategy.pick_discard(&hand, game.discard_count(seat));
            game.discard_to_bank(seat, &discard)?;
        }
    }

    let Some(hex) = strategy.pick(&game.valid_robber_destinations()) else {
        bail!("robber has nowhere to go");
    };
    game.move_robber_to(hex)?;

    if let Some(victim) = strategy.pick(&game.robbable_players(player)) {
        game.steal_random_resource(player, victim)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use settlers_core::{GamePhase, Resource};

    #[test]
    fn test_seeded_game_runs_to_completion() {
        let mut game = GameState::with_seed(3, 5).unwrap();
        let mut strategy = RandomStrategy::with_seed(6);

        let summary = play(&mut game, &mut strategy, 300).unwrap();

        assert_eq!(game.phase(), GamePhase::Normal);
        assert_eq!(summary.points.len(), 3);
        assert!(summary.winner.is_some() || summary.turns > 300);
        for resource in Resource::ALL {
            let held: u32 = game.players.iter().map(|p| p.resources.get(resource)).sum();
            assert_eq!(held + game.bank.available(resource), 19);
        }
    }

    #[test]
    fn test_pick_discard_takes_exact_count() {
        let mut strategy = RandomStrategy::with_seed(1);
        let hand = ResourceHand::from_counts([4, 0, 3, 2, 1]);
        let discard = strategy.pick_discard(&hand, 5);
        assert_eq!(discard.total(), 5);
        assert!(hand.can_afford(&discard));
    }
}
