//! Core game state machine.
//!
//! `GameState` is the only type that mutates a game. Every operation checks
//! turn, phase and placement rules before committing anything, so a rejected
//! call leaves the board, the bank and every hand exactly as they were.

use crate::board::{Board, City, PlayerId, Road, Settlement};
use crate::config::GameConfig;
use crate::distribution::{self, DistributionReport};
use crate::error::GameError;
use crate::longest_road;
use crate::player::{DevelopmentCard, PieceKind, Player};
use crate::resources::{costs, Bank, Resource, ResourceHand};
use crate::robber;
use crate::topology::{EdgeId, HexId, IntersectionId};
use crate::turn::{GamePhase, SetupStep, TurnState};
use crate::validator;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Victory points needed to win
pub const VICTORY_POINTS_TO_WIN: u32 = 10;

/// Result of rolling both dice
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RollOutcome {
    /// Any roll but 7: production was handed out
    Distributed(DistributionReport),
    /// A 7: the caller runs discards, the robber move and theft
    RobberActivated { roll: u8 },
}

/// The complete game state
///
/// `board`, `players` and `bank` are public for inspection. Writing to them
/// directly bypasses every rule check.
#[derive(Debug, Clone)]
pub struct GameState {
    /// The game board
    pub board: Board,
    /// All players, indexed by `PlayerId`
    pub players: Vec<Player>,
    /// The resource supply
    pub bank: Bank,
    turn: TurnState,
    dev_card_deck: Vec<DevelopmentCard>,
    last_roll: Option<(u8, u8)>,
    rng: StdRng,
}

impl GameState {
    /// Create a game for `player_count` players on the standard board
    pub fn new(player_count: usize) -> Result<Self, GameError> {
        Self::from_config(&GameConfig::with_players(player_count))
    }

    /// Like [`GameState::new`] with deterministic randomness
    pub fn with_seed(player_count: usize, seed: u64) -> Result<Self, GameError> {
        Self::from_config(&GameConfig::with_players(player_count).seeded(seed))
    }

    pub fn from_config(config: &GameConfig) -> Result<Self, GameError> {
        config.validate()?;

        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let board = Board::with_layout(config.layout, &mut rng)?;
        let players: Vec<Player> = config
            .player_names
            .iter()
            .enumerate()
            .map(|(i, name)| Player::new(i as PlayerId, name.clone()))
            .collect();
        let dev_card_deck = DevelopmentCard::shuffled_deck(&mut rng);

        info!(
            players = players.len(),
            layout = ?config.layout,
            seed = ?config.seed,
            "new game"
        );

        Ok(Self {
            board,
            turn: TurnState::new(players.len() as u8),
            players,
            bank: Bank::standard(),
            dev_card_deck,
            last_roll: None,
            rng,
        })
    }

    // ==================== Queries ====================

    pub fn player_count(&self) -> usize {
        self.players.len()
    }

    /// Get a player by ID
    pub fn player(&self, id: PlayerId) -> Option<&Player> {
        self.players.get(id as usize)
    }

    pub fn phase(&self) -> GamePhase {
        self.turn.phase()
    }

    pub fn current_player(&self) -> PlayerId {
        self.turn.current_player()
    }

    pub fn turn_number(&self) -> u32 {
        self.turn.turn_number()
    }

    pub fn setup_step(&self) -> Option<SetupStep> {
        self.turn.setup_step()
    }

    /// Settlement a pending setup road must touch
    pub fn pending_anchor(&self) -> Option<IntersectionId> {
        self.turn.pending_anchor()
    }

    pub fn last_roll(&self) -> Option<(u8, u8)> {
        self.last_roll
    }

    pub fn dev_cards_remaining(&self) -> usize {
        self.dev_card_deck.len()
    }

    pub fn longest_road_holder(&self) -> Option<PlayerId> {
        self.players
            .iter()
            .find(|p| p.has_longest_road)
            .map(|p| p.id)
    }

    /// Total victory points for a player, 0 for unknown players
    pub fn total_victory_points(&self, id: PlayerId) -> u32 {
        self.player(id).map_or(0, |p| p.victory_points())
    }

    /// True once any player has reached the victory threshold
    pub fn check_victory(&self) -> bool {
        self.winning_player().is_some()
    }

    /// First player in seat order at or above the victory threshold
    pub fn winning_player(&self) -> Option<PlayerId> {
        self.players
            .iter()
            .find(|p| p.victory_points() >= VICTORY_POINTS_TO_WIN)
            .map(|p| p.id)
    }

    // ==================== Legal placements ====================

    pub fn valid_settlement_placements(
        &self,
        player: PlayerId,
        is_setup: bool,
    ) -> Vec<IntersectionId> {
        if self.player(player).is_none() {
            return Vec::new();
        }
        validator::settlement_spots(&self.board, player, is_setup)
    }

    /// During setup these are the edges touching the settlement just placed
    pub fn valid_road_placements(&self, player: PlayerId, is_setup: bool) -> Vec<EdgeId> {
        if self.player(player).is_none() {
            return Vec::new();
        }
        if !is_setup {
            return validator::road_spots(&self.board, player);
        }
        match self.turn.pending_anchor() {
            Some(anchor) => validator::setup_road_spots(&self.board, player, anchor),
            None => Vec::new(),
        }
    }

    pub fn valid_city_placements(&self, player: PlayerId) -> Vec<IntersectionId> {
        validator::city_spots(&self.board, player)
    }

    pub fn valid_robber_destinations(&self) -> Vec<HexId> {
        robber::valid_destinations(&self.board)
    }

    // ==================== Setup ====================

    pub fn place_setup_settlement(
        &mut self,
        player: PlayerId,
        at: IntersectionId,
    ) -> Result<Settlement, GameError> {
        self.require_player(player)?;
        self.turn.require_current(player)?;
        self.turn
            .require_setup_step("place_setup_settlement", SetupStep::PlaceSettlement)?;
        self.check_settlement_spot(player, at, true)?;
        self.require_player(player)?.require_piece(PieceKind::Settlement)?;

        let settlement = Settlement::new(player, at);
        self.board.place_settlement(settlement)?;
        self.player_mut(player)?.add_settlement(&settlement);
        info!(player, intersection = %at, "setup settlement placed");

        if self.turn.is_second_setup_round() {
            self.grant_starting_resources(player, at)?;
        }
        self.turn.settlement_placed(at);
        Ok(settlement)
    }

    pub fn place_setup_road(&mut self, player: PlayerId, edge: EdgeId) -> Result<Road, GameError> {
        self.require_player(player)?;
        self.turn.require_current(player)?;
        self.turn
            .require_setup_step("place_setup_road", SetupStep::PlaceRoad)?;
        let anchor = self
            .turn
            .pending_anchor()
            .ok_or(GameError::WrongSetupStep {
                expected: SetupStep::PlaceSettlement,
            })?;
        self.check_edge(edge)?;
        if !validator::valid_setup_road(&self.board, player, edge, anchor) {
            return Err(GameError::InvalidRoadPlacement(edge));
        }
        self.require_player(player)?.require_piece(PieceKind::Road)?;

        let road = Road::new(player, edge);
        self.board.place_road(road)?;
        self.player_mut(player)?.add_road(edge);
        info!(player, edge = %edge, "setup road placed");

        self.turn.road_placed();
        if self.turn.phase() == GamePhase::Normal {
            info!(first = self.turn.current_player(), "setup complete, normal play begins");
        }
        Ok(road)
    }

    /// One card per producing hex around the second setup settlement, for
    /// each card the bank still has
    fn grant_starting_resources(
        &mut self,
        player: PlayerId,
        at: IntersectionId,
    ) -> Result<(), GameError> {
        let produced: Vec<Resource> = self
            .board
            .topology()
            .hexes_at(at)
            .iter()
            .filter_map(|hex| self.board.tile(*hex).and_then(|t| t.resource()))
            .collect();

        let mut granted = ResourceHand::new();
        for resource in produced {
            if self.bank.has_enough(resource, 1) {
                self.bank.withdraw(resource, 1)?;
                granted.add(resource, 1);
            }
        }
        self.player_mut(player)?.resources.add_hand(&granted);
        debug!(player, %granted, "starting resources granted");
        Ok(())
    }

    // ==================== Building ====================

    /// Build a settlement during normal play (1 wood, 1 brick, 1 wheat, 1 sheep)
    pub fn build_settlement(
        &mut self,
        player: PlayerId,
        at: IntersectionId,
    ) -> Result<Settlement, GameError> {
        self.require_turn("build_settlement", player)?;
        self.require_player(player)?.require_piece(PieceKind::Settlement)?;

        let settlement = self.pay_then(player, &costs::SETTLEMENT, |game| {
            game.check_settlement_spot(player, at, false)?;
            let settlement = Settlement::new(player, at);
            game.board.place_settlement(settlement)?;
            game.player_mut(player)?.add_settlement(&settlement);
            Ok(settlement)
        })?;

        info!(player, intersection = %at, "settlement built");
        self.after_build();
        Ok(settlement)
    }

    /// Build a road during normal play (1 wood, 1 brick)
    pub fn build_road(&mut self, player: PlayerId, edge: EdgeId) -> Result<Road, GameError> {
        self.require_turn("build_road", player)?;
        self.require_player(player)?.require_piece(PieceKind::Road)?;

        let road = self.pay_then(player, &costs::ROAD, |game| {
            game.check_edge(edge)?;
            if !validator::valid_road(&game.board, player, edge) {
                return Err(GameError::InvalidRoadPlacement(edge));
            }
            let road = Road::new(player, edge);
            game.board.place_road(road)?;
            game.player_mut(player)?.add_road(edge);
            Ok(road)
        })?;

        info!(player, edge = %edge, "road built");
        self.after_build();
        Ok(road)
    }

    /// Upgrade one of the player's settlements (3 ore, 2 wheat)
    pub fn build_city(&mut self, player: PlayerId, at: IntersectionId) -> Result<City, GameError> {
        self.require_turn("build_city", player)?;
        self.require_player(player)?.require_piece(PieceKind::City)?;

        let city = self.pay_then(player, &costs::CITY, |game| {
            game.check_intersection(at)?;
            let owner = game
                .board
                .settlement_at(at)
                .map(|s| s.owner)
                .ok_or(GameError::NoSettlementToUpgrade(at))?;
            if owner != player {
                return Err(GameError::NotYourSettlement(at));
            }
            let city = City::new(player, at);
            game.board.upgrade_to_city(city)?;
            game.player_mut(player)?.add_city(&city);
            Ok(city)
        })?;

        info!(player, intersection = %at, "city built");
        self.after_build();
        Ok(city)
    }

    /// Buy the top development card (1 ore, 1 wheat, 1 sheep).
    ///
    /// Only victory-point cards do anything: each is worth 1 VP.
    pub fn buy_development_card(&mut self, player: PlayerId) -> Result<DevelopmentCard, GameError> {
        self.require_turn("buy_development_card", player)?;
        if self.dev_card_deck.is_empty() {
            return Err(GameError::EmptyDeck);
        }

        self.pay(player, &costs::DEVELOPMENT_CARD)?;
        let card = self.dev_card_deck.pop().ok_or(GameError::EmptyDeck)?;
        self.player_mut(player)?.add_dev_card(card);

        info!(player, remaining = self.dev_card_deck.len(), "development card bought");
        self.after_build();
        Ok(card)
    }

    /// Move `cost` from the player to the bank
    fn pay(&mut self, player: PlayerId, cost: &ResourceHand) -> Result<(), GameError> {
        self.player_mut(player)?
            .resources
            .remove_hand(cost)
            .map_err(|_| GameError::CannotAfford)?;
        self.bank.deposit_hand(cost);
        Ok(())
    }

    /// Pay `cost`, then run `place`; if placing fails the payment is refunded
    fn pay_then<T>(
        &mut self,
        player: PlayerId,
        cost: &ResourceHand,
        place: impl FnOnce(&mut Self) -> Result<T, GameError>,
    ) -> Result<T, GameError> {
        self.pay(player, cost)?;
        match place(self) {
            Ok(placed) => Ok(placed),
            Err(err) => {
                self.bank.withdraw_hand(cost)?;
                self.player_mut(player)?.resources.add_hand(cost);
                debug!(player, %cost, error = %err, "placement rejected, cost refunded");
                Err(err)
            }
        }
    }

    /// Re-evaluate longest road and report a winner once one exists
    fn after_build(&mut self) {
        let lengths: Vec<(PlayerId, u32)> = self
            .players
            .iter()
            .map(|p| (p.id, longest_road::longest_road(&self.board, p.id)))
            .collect();
        let current = self.longest_road_holder();
        let holder = longest_road::resolve_holder(&lengths, current);

        if holder != current {
            for player in &mut self.players {
                player.has_longest_road = Some(player.id) == holder;
            }
            info!(previous = ?current, holder = ?holder, "longest road changed hands");
        }

        if let Some(winner) = self.winning_player() {
            info!(
                winner,
                points = self.total_victory_points(winner),
                "victory threshold reached"
            );
        }
    }

    // ==================== Dice ====================

    /// Roll two dice. Normal phase only.
    pub fn roll_dice(&mut self) -> Result<(u8, u8), GameError> {
        self.turn.require_normal("roll_dice")?;
        let dice = (self.rng.gen_range(1..=6), self.rng.gen_range(1..=6));
        self.last_roll = Some(dice);
        info!(
            player = self.turn.current_player(),
            roll = dice.0 + dice.1,
            "dice rolled"
        );
        Ok(dice)
    }

    /// Roll both dice and hand out production unless a 7 came up
    pub fn roll_and_distribute(&mut self) -> Result<RollOutcome, GameError> {
        let (a, b) = self.roll_dice()?;
        let roll = a + b;
        if roll == 7 {
            return Ok(RollOutcome::RobberActivated { roll });
        }
        self.distribute_for_roll(roll).map(RollOutcome::Distributed)
    }

    /// Hand out production for `roll` (2-12, not 7).
    ///
    /// A resource kind the bank cannot cover in full goes to nobody.
    pub fn distribute_for_roll(&mut self, roll: u8) -> Result<DistributionReport, GameError> {
        distribution::validate_roll(roll)?;
        self.turn.require_normal("distribute_for_roll")?;

        let report = distribution::plan(&self.board, &self.bank, roll);
        for payout in &report.payouts {
            self.bank.withdraw(payout.resource, payout.amount)?;
            self.player_mut(payout.player)?
                .resources
                .add(payout.resource, payout.amount);
            debug!(
                player = payout.player,
                resource = %payout.resource,
                amount = payout.amount,
                "produced"
            );
        }
        for resource in &report.withheld {
            debug!(
                roll,
                %resource,
                available = self.bank.available(*resource),
                "bank short, resource withheld"
            );
        }
        if report.is_empty() {
            debug!(roll, "no distribution");
        }
        Ok(report)
    }

    // ==================== Robber ====================

    /// True if the player holds more than 7 cards
    pub fn must_discard(&self, player: PlayerId) -> bool {
        self.player(player)
            .is_some_and(|p| robber::must_discard(&p.resources))
    }

    pub fn discard_count(&self, player: PlayerId) -> u32 {
        self.player(player)
            .map_or(0, |p| robber::discard_count(&p.resources))
    }

    /// Return exactly half (rounded down) of an oversized hand to the bank
    pub fn discard_to_bank(
        &mut self,
        player: PlayerId,
        discard: &ResourceHand,
    ) -> Result<(), GameError> {
        self.turn.require_normal("discard_to_bank")?;
        let hand = &mut self.player_mut(player)?.resources;
        robber::check_discard(hand, discard)?;
        hand.remove_hand(discard)?;
        self.bank.deposit_hand(discard);
        info!(player, %discard, "discarded to bank");
        Ok(())
    }

    /// Move the robber to a different hex
    pub fn move_robber_to(&mut self, hex: HexId) -> Result<(), GameError> {
        self.turn.require_normal("move_robber_to")?;
        robber::check_destination(&self.board, hex)?;
        let from = self.board.robber_hex();
        self.board.move_robber_to(hex);
        info!(from = %from, to = %hex, "robber moved");
        Ok(())
    }

    /// Players `acting` may steal from at the robber's current hex
    pub fn robbable_players(&self, acting: PlayerId) -> Vec<PlayerId> {
        robber::robbable_players(&self.board, acting, |p| {
            self.player(p).map_or(0, |player| player.resources.total())
        })
    }

    /// Move one random card from `victim` to `thief`.
    ///
    /// Cards are picked uniformly, so kinds are weighted by count. Returns
    /// `None` if the victim has nothing to take.
    pub fn steal_random_resource(
        &mut self,
        thief: PlayerId,
        victim: PlayerId,
    ) -> Result<Option<Resource>, GameError> {
        self.require_turn("steal_random_resource", thief)?;
        self.require_player(victim)?;
        if thief == victim {
            return Err(GameError::SelfTarget);
        }
        if !self.board.owners_on_hex(self.board.robber_hex()).contains(&victim) {
            return Err(GameError::NotRobbable(victim));
        }

        let stolen = self.players[victim as usize]
            .resources
            .steal_random(&mut self.rng);
        if let Some(resource) = stolen {
            self.player_mut(thief)?.resources.add(resource, 1);
            info!(thief, victim, %resource, "resource stolen");
        }
        Ok(stolen)
    }

    // ==================== Trade & turns ====================

    /// Swap `offer` from the current player for `request` from `to`
    pub fn trade_with_player(
        &mut self,
        from: PlayerId,
        to: PlayerId,
        offer: &ResourceHand,
        request: &ResourceHand,
    ) -> Result<(), GameError> {
        self.require_turn("trade_with_player", from)?;
        self.require_player(to)?;
        if from == to {
            return Err(GameError::SelfTarget);
        }
        if offer.is_empty() || request.is_empty() {
            return Err(GameError::InvalidTrade);
        }

        let mut giver = self.players[from as usize].resources;
        let mut taker = self.players[to as usize].resources;
        giver.remove_hand(offer)?;
        taker.remove_hand(request)?;
        giver.add_hand(request);
        taker.add_hand(offer);
        self.players[from as usize].resources = giver;
        self.players[to as usize].resources = taker;

        info!(from, to, %offer, %request, "trade completed");
        Ok(())
    }

    /// Pass play to the next seat. Normal phase only.
    pub fn end_turn(&mut self) -> Result<(), GameError> {
        let previous = self.turn.current_player();
        let next = self.turn.end_turn()?;
        self.last_roll = None;
        info!(previous, next, turn = self.turn.turn_number(), "turn ended");
        Ok(())
    }

    // ==================== Snapshot ====================

    pub fn snapshot(&self) -> GameSnapshot {
        let mut settlements: Vec<Settlement> = self.board.settlements().copied().collect();
        let mut cities: Vec<City> = self.board.cities().copied().collect();
        let mut roads: Vec<Road> = self.board.roads().copied().collect();
        settlements.sort_by_key(|s| s.location);
        cities.sort_by_key(|c| c.location);
        roads.sort_by_key(|r| r.edge);

        GameSnapshot {
            phase: self.turn.phase(),
            current_player: self.turn.current_player(),
            turn_number: self.turn.turn_number(),
            last_roll: self.last_roll,
            robber: self.board.robber_hex(),
            bank: *self.bank.pool(),
            dev_cards_remaining: self.dev_card_deck.len(),
            players: self
                .players
                .iter()
                .map(|p| PlayerSnapshot {
                    id: p.id,
                    name: p.name.clone(),
                    resources: p.resources,
                    victory_points: p.victory_points(),
                    settlements: p.settlements.clone(),
                    cities: p.cities.clone(),
                    roads: p.roads.clone(),
                    dev_cards: p.dev_cards.len(),
                    has_longest_road: p.has_longest_road,
                })
                .collect(),
            settlements,
            cities,
            roads,
        }
    }

    // ==================== Helpers ====================

    fn require_player(&self, id: PlayerId) -> Result<&Player, GameError> {
        self.player(id).ok_or(GameError::UnknownPlayer(id))
    }

    fn player_mut(&mut self, id: PlayerId) -> Result<&mut Player, GameError> {
        self.players
            .get_mut(id as usize)
            .ok_or(GameError::UnknownPlayer(id))
    }

    /// Normal phase, known player, and it's their turn
    fn require_turn(&self, action: &'static str, player: PlayerId) -> Result<(), GameError> {
        self.turn.require_normal(action)?;
        self.require_player(player)?;
        self.turn.require_current(player)
    }

    fn check_intersection(&self, at: IntersectionId) -> Result<(), GameError> {
        if !self.board.contains_intersection(at) {
            return Err(GameError::UnknownIntersection(at));
        }
        Ok(())
    }

    fn check_edge(&self, edge: EdgeId) -> Result<(), GameError> {
        if !self.board.contains_edge(edge) {
            return Err(GameError::UnknownEdge(edge));
        }
        if self.board.is_edge_occupied(edge) {
            return Err(GameError::EdgeOccupied(edge));
        }
        Ok(())
    }

    fn check_settlement_spot(
        &self,
        player: PlayerId,
        at: IntersectionId,
        is_setup: bool,
    ) -> Result<(), GameError> {
        self.check_intersection(at)?;
        if self.board.is_intersection_occupied(at) {
            return Err(GameError::IntersectionOccupied(at));
        }
        if !validator::valid_settlement(&self.board, player, at, is_setup) {
            return Err(GameError::InvalidSettlementPlacement(at));
        }
        Ok(())
    }

    #[cfg(test)]
    pub(crate) fn force_normal(&mut self) {
        self.turn.force_normal();
    }
}

/// Serializable view of a whole game
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameSnapshot {
    pub phase: GamePhase,
    pub current_player: PlayerId,
    pub turn_number: u32,
    pub last_roll: Option<(u8, u8)>,
    pub robber: HexId,
    pub bank: ResourceHand,
    pub dev_cards_remaining: usize,
    pub players: Vec<PlayerSnapshot>,
    pub settlements: Vec<Settlement>,
    pub cities: Vec<City>,
    pub roads: Vec<Road>,
}

impl GameSnapshot {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

/// One player's public and private state
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerSnapshot {
    pub id: PlayerId,
    pub name: String,
    pub resources: ResourceHand,
    pub victory_points: u32,
    pub settlements: Vec<IntersectionId>,
    pub cities: Vec<IntersectionId>,
    pub roads: Vec<EdgeId>,
    pub dev_cards: usize,
    pub has_longest_road: bool,
}
