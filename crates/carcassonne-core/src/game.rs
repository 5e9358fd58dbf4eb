//! Game state and the turn state machine.
//!
//! One entry point drives everything: `apply_action` validates a player's
//! command against the current phase, mutates the state, and reports what
//! happened as a list of events. Illegal commands return an error and leave
//! the state untouched, so a caller holding a clone can always compare or
//! substitute snapshots. Construction panics on malformed configuration;
//! gameplay never does.

use std::collections::{BTreeMap, BTreeSet};

use im::HashMap as ImHashMap;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::actions::{GameAction, GameEvent};
use crate::features::FeatureTracker;
use crate::grid::{Board, Coordinate, Direction, MeepleKey, NodeKey, PlacedTile, Rotation};
use crate::meeple;
use crate::modules::{self, FarmerReturnPrompt, ModuleStates, RuleModule};
use crate::placement;
use crate::player::{MeeplePlacement, MeepleType, Player, PlayerId};
use crate::scoring::{self, ScoreEvent, ScoringProfile};
use crate::tile::{Commodity, FeatureKind, TileCatalog, TileDefinition, TileInstance};
use crate::tileset;

/// Extra points for the player whose meeple the fairy stands beside when
/// that feature pays out mid-game
const FAIRY_SCORING_BONUS: u32 = 3;

/// Top-level lifecycle of a game
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Turns are running
    Playing,
    /// Scores are final; ties all win
    Finished { winners: Vec<PlayerId> },
}

/// Step within the current turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TurnPhase {
    /// Waiting for the current player to draw
    DrawTile,
    /// A tile is in hand and must be placed
    PlaceTile,
    /// The dragon enters play and needs a lair cell
    DragonPlace,
    /// The dragon needs a facing; `move_after` queues a walk once confirmed
    DragonOrient { move_after: bool },
    /// The dragon is about to walk
    DragonMove,
    /// The placed tile may take a token
    PlaceMeeple,
    /// The fairy may be repositioned before scoring
    FairyMove,
    /// Completed features wait for payout; EndTurn closes the turn
    Score,
    /// Farmer-return prompts are pending
    ReturnFarmer,
}

/// Why an action was rejected. The state is unchanged whenever one of
/// these comes back.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum GameError {
    #[error("The game is over")]
    GameOver,
    #[error("Not your turn")]
    NotYourTurn,
    #[error("That action does not fit the current phase")]
    InvalidPhase,
    #[error("The tile cannot be placed there")]
    InvalidPlacement,
    #[error("No such segment on that tile")]
    UnknownSegment,
    #[error("That token cannot be placed there")]
    InvalidMeeple,
    #[error("The fairy must join one of your own meeples")]
    InvalidFairyTarget,
    #[error("The dragon must be placed on a lair tile")]
    InvalidDragonTarget,
    #[error("The dragon has no facing to confirm")]
    NoDragonFacing,
    #[error("That rule module is not active")]
    ModuleInactive,
}

/// Everything needed to start a game
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameConfig {
    /// Seat names, in turn order
    pub player_names: Vec<String>,
    /// Active rule modules
    #[serde(default)]
    pub modules: Vec<RuleModule>,
    /// Replacement for the stock base tile set
    #[serde(default)]
    pub base_tiles: Option<Vec<TileDefinition>>,
    /// Extra definitions appended to the catalog
    #[serde(default)]
    pub extra_tiles: Vec<TileDefinition>,
    /// Replacement scoring constants
    #[serde(default)]
    pub scoring: Option<ScoringProfile>,
}

impl GameConfig {
    /// A base-game configuration for the named seats
    pub fn new(player_names: Vec<String>) -> Self {
        Self {
            player_names,
            modules: Vec::new(),
            base_tiles: None,
            extra_tiles: Vec::new(),
            scoring: None,
        }
    }

    /// Enable rule modules
    pub fn with_modules(mut self, modules: Vec<RuleModule>) -> Self {
        self.modules = modules;
        self
    }

    /// Swap the stock base set for custom definitions
    pub fn with_base_tiles(mut self, tiles: Vec<TileDefinition>) -> Self {
        self.base_tiles = Some(tiles);
        self
    }

    /// Append extra definitions to the catalog
    pub fn with_extra_tiles(mut self, tiles: Vec<TileDefinition>) -> Self {
        self.extra_tiles = tiles;
        self
    }

    /// Override the scoring constants
    pub fn with_scoring(mut self, profile: ScoringProfile) -> Self {
        self.scoring = Some(profile);
        self
    }
}

/// Full record of a running game
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameState {
    /// Playing or finished
    pub phase: GamePhase,
    /// Step inside the current turn
    pub turn_phase: TurnPhase,
    /// Seats in turn order
    pub players: Vec<Player>,
    /// Whose turn it is
    pub current_player: PlayerId,
    /// Turn counter, starting at 1
    pub turn_number: u32,
    /// The grid
    pub board: Board,
    /// Feature forest over the grid
    pub tracker: FeatureTracker,
    /// Face-down pile
    draw_pile: Vec<TileInstance>,
    /// Tiles set aside because no cell could take them
    pub discards: Vec<TileInstance>,
    /// Tile in the current player's hand
    pub current_tile: Option<TileInstance>,
    /// Cell of the most recently placed tile
    pub last_placed: Option<Coordinate>,
    /// Most recent placement per seat
    pub last_placed_by: BTreeMap<PlayerId, Coordinate>,
    /// Feature roots completed this turn, awaiting payout
    pub completed_this_turn: Vec<NodeKey>,
    /// Roots already paid this turn
    pub scored_this_turn: BTreeSet<NodeKey>,
    /// Every root paid during play, skipped by the final sweep
    scored_features: BTreeSet<NodeKey>,
    /// Payouts from the current turn's scoring passes
    pub recent_scores: Vec<ScoreEvent>,
    /// Every token on the board, keyed by node and support flag
    pub meeples: ImHashMap<MeepleKey, MeeplePlacement>,
    /// Runtime state of the active rule modules
    pub module_states: ModuleStates,
    /// Catalog the pile was built from
    pub catalog: TileCatalog,
    /// Point constants in force
    pub scoring: ScoringProfile,
}

impl GameState {
    /// Start a game.
    ///
    /// Panics on malformed configuration: wrong player count, invalid tile
    /// data, or a catalog without a starting tile. Bad configuration is a
    /// programming error, not a gameplay condition.
    pub fn new(config: GameConfig) -> Self {
        let player_count = config.player_names.len();
        assert!((2..=6).contains(&player_count), "Must have 2-6 players");

        let mut definitions = match &config.base_tiles {
            Some(base) => base.clone(),
            None => tileset::base_game(),
        };
        for module in &config.modules {
            match module {
                RuleModule::InnsCathedrals => definitions.extend(tileset::inns_cathedrals()),
                RuleModule::TradersBuilders { .. } => {
                    definitions.extend(tileset::traders_builders())
                }
                RuleModule::DragonFairy => definitions.extend(tileset::dragon_fairy()),
            }
        }
        definitions.extend(config.extra_tiles.iter().cloned());

        let catalog = TileCatalog::build(definitions).expect("tile data must validate");
        let starting_id = catalog
            .starting_definition()
            .expect("one tile definition must be flagged starting")
            .id
            .clone();

        let mut draw_pile = catalog.expand_counts();
        let reserved = draw_pile
            .iter()
            .position(|tile| tile.definition_id == starting_id)
            .expect("the starting tile must be part of the pile");
        draw_pile.remove(reserved);
        let mut rng = rand::thread_rng();
        draw_pile.shuffle(&mut rng);

        let mut board = Board::new();
        let mut tracker = FeatureTracker::new();
        let starting_tile = PlacedTile::new(Coordinate::new(0, 0), starting_id, Rotation::R0);
        board.place(starting_tile.clone());
        tracker.add_tile(&board, &catalog, &starting_tile);

        let supply = modules::starting_supply(&config.modules);
        let players = config
            .player_names
            .iter()
            .enumerate()
            .map(|(index, name)| {
                let mut player = Player::new(index as PlayerId, name.clone());
                player.supply = supply;
                player
            })
            .collect();

        Self {
            phase: GamePhase::Playing,
            turn_phase: TurnPhase::DrawTile,
            players,
            current_player: 0,
            turn_number: 1,
            board,
            tracker,
            draw_pile,
            discards: Vec::new(),
            current_tile: None,
            last_placed: None,
            last_placed_by: BTreeMap::new(),
            completed_this_turn: Vec::new(),
            scored_this_turn: BTreeSet::new(),
            scored_features: BTreeSet::new(),
            recent_scores: Vec::new(),
            meeples: ImHashMap::new(),
            module_states: ModuleStates::from_modules(&config.modules),
            catalog,
            scoring: config.scoring.unwrap_or_default(),
        }
    }

    /// Number of seats
    pub fn player_count(&self) -> usize {
        self.players.len()
    }

    /// Get a player by id
    pub fn get_player(&self, id: PlayerId) -> Option<&Player> {
        self.players.get(id as usize)
    }

    fn get_player_mut(&mut self, id: PlayerId) -> Option<&mut Player> {
        self.players.get_mut(id as usize)
    }

    /// Tiles left in the face-down pile
    pub fn pile_size(&self) -> usize {
        self.draw_pile.len()
    }

    /// Whether scores are final
    pub fn is_finished(&self) -> bool {
        matches!(self.phase, GamePhase::Finished { .. })
    }

    /// Winners once the game is finished; empty while it runs
    pub fn winners(&self) -> Vec<PlayerId> {
        if let GamePhase::Finished { winners } = &self.phase {
            winners.clone()
        } else {
            Vec::new()
        }
    }

    // ==================== Queries ====================

    /// Cells that can take the tile in hand at its current rotation
    pub fn valid_placements(&self) -> Vec<Coordinate> {
        match &self.current_tile {
            Some(tile) => placement::valid_positions(&self.board, &self.catalog, tile),
            None => Vec::new(),
        }
    }

    /// Rotations under which the tile in hand fits a cell
    pub fn valid_rotations_at(&self, coord: Coordinate) -> Vec<Rotation> {
        match &self.current_tile {
            Some(tile) => placement::valid_rotations(&self.board, &self.catalog, tile, coord),
            None => Vec::new(),
        }
    }

    /// Segments on the just-placed tile a primary token may claim
    pub fn placeable_segments(&self) -> Vec<String> {
        match self.last_placed {
            Some(coord) => {
                meeple::placeable_segments(&self.tracker, &self.catalog, &self.board, coord)
            }
            None => Vec::new(),
        }
    }

    /// Nodes reachable through a magic portal on the just-placed tile
    pub fn portal_placements(&self) -> Vec<NodeKey> {
        if self.module_states.dragon_fairy.is_none() || !self.last_tile_has_portal() {
            return Vec::new();
        }
        meeple::portal_targets(&self.tracker)
    }

    /// Cells holding a dragon-lair tile
    pub fn lair_coordinates(&self) -> Vec<Coordinate> {
        let mut coords: Vec<Coordinate> = self
            .board
            .tiles()
            .filter(|tile| {
                self.catalog
                    .get(&tile.definition_id)
                    .map(|definition| definition.lair)
                    .unwrap_or(false)
            })
            .map(|tile| tile.coord)
            .collect();
        coords.sort();
        coords
    }

    /// Tokens standing on one tile, a view over the registry
    pub fn meeples_on_tile(&self, coord: Coordinate) -> Vec<MeeplePlacement> {
        let mut on_tile: Vec<MeeplePlacement> = self
            .meeples
            .values()
            .filter(|placement| placement.coord == coord)
            .cloned()
            .collect();
        on_tile.sort_by(|a, b| a.key().cmp(&b.key()));
        on_tile
    }

    /// Get all currently valid actions for a player
    pub fn valid_actions(&self, player: PlayerId) -> Vec<GameAction> {
        let mut actions = Vec::new();
        if matches!(self.phase, GamePhase::Finished { .. }) {
            return actions;
        }

        match self.turn_phase {
            TurnPhase::DrawTile => {
                if player != self.current_player {
                    return actions;
                }
                actions.push(GameAction::DrawTile);
                actions.push(GameAction::EndGame);
            }

            TurnPhase::PlaceTile => {
                if player != self.current_player {
                    return actions;
                }
                actions.push(GameAction::RotateTile);
                for coord in self.valid_placements() {
                    actions.push(GameAction::PlaceTile { coord });
                }
            }

            TurnPhase::PlaceMeeple => {
                if player != self.current_player {
                    return actions;
                }
                actions.push(GameAction::SkipMeeple);
                let coord = match self.last_placed {
                    Some(coord) => coord,
                    None => return actions,
                };
                let p = match self.get_player(player) {
                    Some(p) => p,
                    None => return actions,
                };
                for segment in
                    meeple::placeable_segments(&self.tracker, &self.catalog, &self.board, coord)
                {
                    let node = NodeKey::new(coord, segment.clone());
                    for kind in [MeepleType::Normal, MeepleType::Big] {
                        if meeple::can_place_meeple(&self.tracker, p, kind, &node) {
                            actions.push(GameAction::PlaceMeeple {
                                segment: segment.clone(),
                                kind,
                                support: None,
                            });
                        }
                    }
                }
                if let Some(tb) = self.module_states.traders_builders.as_ref() {
                    for kind in [MeepleType::Builder, MeepleType::Pig] {
                        for node in self.support_targets(p, kind, tb.support_anywhere, coord) {
                            actions.push(GameAction::PlaceSupport {
                                coord: node.coord,
                                segment: node.segment.clone(),
                                kind,
                            });
                        }
                    }
                }
                for node in self.portal_placements() {
                    for kind in [MeepleType::Normal, MeepleType::Big] {
                        if meeple::can_place_meeple(&self.tracker, p, kind, &node) {
                            actions.push(GameAction::PlaceMeepleViaPortal {
                                node: node.clone(),
                                kind,
                            });
                        }
                    }
                }
            }

            TurnPhase::FairyMove => {
                if player != self.current_player {
                    return actions;
                }
                actions.push(GameAction::SkipFairyMove);
                let mut nodes: Vec<NodeKey> = self
                    .meeples
                    .values()
                    .filter(|placement| placement.player == player)
                    .map(|placement| placement.node())
                    .collect();
                nodes.sort();
                nodes.dedup();
                for node in nodes {
                    actions.push(GameAction::MoveFairy { node });
                }
            }

            TurnPhase::DragonPlace => {
                if player != self.current_player {
                    return actions;
                }
                for coord in self.lair_coordinates() {
                    actions.push(GameAction::PlaceDragon { coord });
                }
            }

            TurnPhase::DragonOrient { .. } => {
                if player != self.current_player {
                    return actions;
                }
                actions.push(GameAction::CycleDragonFacing);
                let has_facing = self
                    .module_states
                    .dragon_fairy
                    .as_ref()
                    .and_then(|df| df.dragon_facing)
                    .is_some();
                if has_facing {
                    actions.push(GameAction::ConfirmDragonFacing);
                }
            }

            TurnPhase::DragonMove => {
                if player != self.current_player {
                    return actions;
                }
                actions.push(GameAction::MoveDragon);
            }

            TurnPhase::Score => {
                if player != self.current_player {
                    return actions;
                }
                actions.push(GameAction::EndTurn);
            }

            TurnPhase::ReturnFarmer => {
                // The prompt owner answers, not necessarily the current player
                let prompt = self
                    .module_states
                    .traders_builders
                    .as_ref()
                    .and_then(|tb| tb.pending_farmer_returns.first());
                if let Some(prompt) = prompt {
                    if prompt.player == player {
                        actions.push(GameAction::ResolveFarmerReturn {
                            return_farmer: true,
                        });
                        actions.push(GameAction::ResolveFarmerReturn {
                            return_farmer: false,
                        });
                    }
                }
            }
        }

        actions
    }

    /// Apply an action to the game state
    pub fn apply_action(
        &mut self,
        player: PlayerId,
        action: GameAction,
    ) -> Result<Vec<GameEvent>, GameError> {
        if matches!(self.phase, GamePhase::Finished { .. }) {
            return Err(GameError::GameOver);
        }

        let mut events = Vec::new();

        match action {
            // ==================== Tile Phase ====================
            GameAction::DrawTile => {
                if player != self.current_player {
                    return Err(GameError::NotYourTurn);
                }
                if self.turn_phase != TurnPhase::DrawTile {
                    return Err(GameError::InvalidPhase);
                }

                self.recent_scores.clear();
                loop {
                    let tile = match self.draw_pile.pop() {
                        Some(tile) => tile,
                        None => {
                            // An exhausted pile ends the game
                            events.extend(self.finish_game());
                            return Ok(events);
                        }
                    };
                    events.push(GameEvent::TileDrawn {
                        player,
                        tile: tile.clone(),
                    });
                    if placement::any_valid_placement_exists(&self.board, &self.catalog, &tile) {
                        self.current_tile = Some(tile);
                        self.turn_phase = TurnPhase::PlaceTile;
                        break;
                    }
                    events.push(GameEvent::TileDiscarded { tile: tile.clone() });
                    self.discards.push(tile);
                }
            }

            GameAction::RotateTile => {
                if player != self.current_player {
                    return Err(GameError::NotYourTurn);
                }
                if self.turn_phase != TurnPhase::PlaceTile {
                    return Err(GameError::InvalidPhase);
                }
                let rotated = match &self.current_tile {
                    Some(tile) => tile.rotated_clockwise(),
                    None => return Err(GameError::InvalidPhase),
                };
                events.push(GameEvent::TileRotated {
                    rotation: rotated.rotation,
                });
                self.current_tile = Some(rotated);
            }

            GameAction::PlaceTile { coord } => {
                if player != self.current_player {
                    return Err(GameError::NotYourTurn);
                }
                if self.turn_phase != TurnPhase::PlaceTile {
                    return Err(GameError::InvalidPhase);
                }
                let tile = match &self.current_tile {
                    Some(tile) => tile.clone(),
                    None => return Err(GameError::InvalidPhase),
                };
                if !placement::is_valid_placement(&self.board, &self.catalog, &tile, coord) {
                    return Err(GameError::InvalidPlacement);
                }
                let (volcano, lair) = match self.catalog.get(&tile.definition_id) {
                    Some(definition) => (definition.volcano, definition.lair),
                    None => return Err(GameError::InvalidPlacement),
                };

                let placed = PlacedTile::new(coord, tile.definition_id.clone(), tile.rotation);
                self.board.place(placed.clone());
                let completed = self.tracker.add_tile(&self.board, &self.catalog, &placed);
                self.current_tile = None;
                self.last_placed = Some(coord);
                self.last_placed_by.insert(player, coord);

                events.push(GameEvent::TilePlaced {
                    player,
                    coord,
                    definition_id: tile.definition_id.clone(),
                    rotation: tile.rotation,
                });
                if !completed.is_empty() {
                    self.completed_this_turn.extend(completed.iter().cloned());
                    events.push(GameEvent::FeaturesCompleted {
                        features: completed.clone(),
                    });
                    self.award_commodities(player, &completed, &mut events);
                }
                self.check_builder_bonus(player, coord, &mut events);

                let dragon_active = self.module_states.dragon_fairy.is_some();
                if volcano && dragon_active {
                    // The dragon teleports in and the token phase is skipped
                    if let Some(df) = self.module_states.dragon_fairy.as_mut() {
                        df.dragon_position = Some(coord);
                    }
                    events.push(GameEvent::DragonPlaced { coord });
                    self.turn_phase = TurnPhase::Score;
                } else if lair && dragon_active {
                    let (in_play, has_facing) = {
                        let df = self.module_states.dragon_fairy.as_ref().unwrap();
                        (df.dragon_position.is_some(), df.dragon_facing.is_some())
                    };
                    self.turn_phase = if !in_play {
                        TurnPhase::DragonPlace
                    } else if has_facing {
                        TurnPhase::DragonMove
                    } else {
                        TurnPhase::DragonOrient { move_after: true }
                    };
                } else {
                    self.turn_phase = TurnPhase::PlaceMeeple;
                }
            }

            // ==================== Token Phase ====================
            GameAction::PlaceMeeple {
                segment,
                kind,
                support,
            } => {
                if player != self.current_player {
                    return Err(GameError::NotYourTurn);
                }
                if self.turn_phase != TurnPhase::PlaceMeeple {
                    return Err(GameError::InvalidPhase);
                }
                let coord = match self.last_placed {
                    Some(coord) => coord,
                    None => return Err(GameError::InvalidPhase),
                };
                if kind.is_support() {
                    return Err(GameError::InvalidMeeple);
                }
                if !self.segment_exists(coord, &segment) {
                    return Err(GameError::UnknownSegment);
                }
                let node = NodeKey::new(coord, segment.clone());
                {
                    let p = match self.get_player(player) {
                        Some(p) => p,
                        None => return Err(GameError::NotYourTurn),
                    };
                    if !meeple::can_place_meeple(&self.tracker, p, kind, &node) {
                        return Err(GameError::InvalidMeeple);
                    }
                    if let Some(aux) = support {
                        if self.module_states.traders_builders.is_none() {
                            return Err(GameError::ModuleInactive);
                        }
                        if !aux.is_support() || p.supply.available(aux) == 0 {
                            return Err(GameError::InvalidMeeple);
                        }
                        let feature_kind = match self.tracker.feature(&node) {
                            Some(feature) => feature.kind,
                            None => return Err(GameError::InvalidMeeple),
                        };
                        if !meeple::support_classes(aux).contains(&feature_kind) {
                            return Err(GameError::InvalidMeeple);
                        }
                    }
                }
                self.commit_token(player, kind, &node, &mut events)?;
                if let Some(aux) = support {
                    self.commit_token(player, aux, &node, &mut events)?;
                }
                self.orient_dragon_toward(coord, &mut events);
                self.close_meeple_phase();
            }

            GameAction::PlaceSupport {
                coord,
                segment,
                kind,
            } => {
                if player != self.current_player {
                    return Err(GameError::NotYourTurn);
                }
                if self.turn_phase != TurnPhase::PlaceMeeple {
                    return Err(GameError::InvalidPhase);
                }
                let anywhere = match self.module_states.traders_builders.as_ref() {
                    Some(tb) => tb.support_anywhere,
                    None => return Err(GameError::ModuleInactive),
                };
                if !kind.is_support() {
                    return Err(GameError::InvalidMeeple);
                }
                if !anywhere && Some(coord) != self.last_placed {
                    return Err(GameError::InvalidMeeple);
                }
                if !self.segment_exists(coord, &segment) {
                    return Err(GameError::UnknownSegment);
                }
                let node = NodeKey::new(coord, segment.clone());
                let allowed = match self.get_player(player) {
                    Some(p) => meeple::can_place_support(&self.tracker, p, kind, &node),
                    None => false,
                };
                if !allowed {
                    return Err(GameError::InvalidMeeple);
                }
                self.commit_token(player, kind, &node, &mut events)?;
                self.orient_dragon_toward(coord, &mut events);
                self.close_meeple_phase();
            }

            GameAction::PlaceMeepleViaPortal { node, kind } => {
                if player != self.current_player {
                    return Err(GameError::NotYourTurn);
                }
                if self.turn_phase != TurnPhase::PlaceMeeple {
                    return Err(GameError::InvalidPhase);
                }
                if self.module_states.dragon_fairy.is_none() {
                    return Err(GameError::ModuleInactive);
                }
                if !self.last_tile_has_portal() || kind.is_support() {
                    return Err(GameError::InvalidMeeple);
                }
                let allowed = match self.get_player(player) {
                    Some(p) => meeple::can_place_meeple(&self.tracker, p, kind, &node),
                    None => false,
                };
                if !allowed || !meeple::portal_targets(&self.tracker).contains(&node) {
                    return Err(GameError::InvalidMeeple);
                }
                self.commit_token(player, kind, &node, &mut events)?;
                self.orient_dragon_toward(node.coord, &mut events);
                self.close_meeple_phase();
            }

            GameAction::SkipMeeple => {
                if player != self.current_player {
                    return Err(GameError::NotYourTurn);
                }
                if self.turn_phase != TurnPhase::PlaceMeeple {
                    return Err(GameError::InvalidPhase);
                }
                self.close_meeple_phase();
            }

            // ==================== Dragon & Fairy ====================
            GameAction::MoveFairy { node } => {
                if player != self.current_player {
                    return Err(GameError::NotYourTurn);
                }
                if self.turn_phase != TurnPhase::FairyMove {
                    return Err(GameError::InvalidPhase);
                }
                if self.module_states.dragon_fairy.is_none() {
                    return Err(GameError::ModuleInactive);
                }
                let own_primary = self
                    .meeples
                    .get(&MeepleKey::primary(node.clone()))
                    .map(|placement| placement.player == player)
                    .unwrap_or(false);
                let own_support = self
                    .meeples
                    .get(&MeepleKey::support(node.clone()))
                    .map(|placement| placement.player == player)
                    .unwrap_or(false);
                if !own_primary && !own_support {
                    return Err(GameError::InvalidFairyTarget);
                }
                if let Some(df) = self.module_states.dragon_fairy.as_mut() {
                    df.fairy_position = Some(node.clone());
                }
                events.push(GameEvent::FairyMoved { player, node });
                self.turn_phase = TurnPhase::Score;
            }

            GameAction::SkipFairyMove => {
                if player != self.current_player {
                    return Err(GameError::NotYourTurn);
                }
                if self.turn_phase != TurnPhase::FairyMove {
                    return Err(GameError::InvalidPhase);
                }
                self.turn_phase = TurnPhase::Score;
            }

            GameAction::PlaceDragon { coord } => {
                if player != self.current_player {
                    return Err(GameError::NotYourTurn);
                }
                if self.turn_phase != TurnPhase::DragonPlace {
                    return Err(GameError::InvalidPhase);
                }
                if !self.lair_coordinates().contains(&coord) {
                    return Err(GameError::InvalidDragonTarget);
                }
                if let Some(df) = self.module_states.dragon_fairy.as_mut() {
                    df.dragon_position = Some(coord);
                }
                events.push(GameEvent::DragonPlaced { coord });
                self.turn_phase = TurnPhase::DragonOrient { move_after: false };
            }

            GameAction::CycleDragonFacing => {
                if player != self.current_player {
                    return Err(GameError::NotYourTurn);
                }
                if !matches!(self.turn_phase, TurnPhase::DragonOrient { .. }) {
                    return Err(GameError::InvalidPhase);
                }
                let facing = match self
                    .module_states
                    .dragon_fairy
                    .as_ref()
                    .and_then(|df| df.dragon_facing)
                {
                    Some(facing) => facing.clockwise(),
                    None => Direction::North,
                };
                if let Some(df) = self.module_states.dragon_fairy.as_mut() {
                    df.dragon_facing = Some(facing);
                }
                events.push(GameEvent::DragonFacing { facing });
            }

            GameAction::ConfirmDragonFacing => {
                if player != self.current_player {
                    return Err(GameError::NotYourTurn);
                }
                let move_after = match self.turn_phase {
                    TurnPhase::DragonOrient { move_after } => move_after,
                    _ => return Err(GameError::InvalidPhase),
                };
                let has_facing = self
                    .module_states
                    .dragon_fairy
                    .as_ref()
                    .and_then(|df| df.dragon_facing)
                    .is_some();
                if !has_facing {
                    return Err(GameError::NoDragonFacing);
                }
                self.turn_phase = if move_after {
                    TurnPhase::DragonMove
                } else {
                    TurnPhase::PlaceMeeple
                };
            }

            GameAction::MoveDragon => {
                if player != self.current_player {
                    return Err(GameError::NotYourTurn);
                }
                if self.turn_phase != TurnPhase::DragonMove {
                    return Err(GameError::InvalidPhase);
                }
                let (from, facing, fairy_cell) = match self.module_states.dragon_fairy.as_ref() {
                    Some(df) => match (df.dragon_position, df.dragon_facing) {
                        (Some(position), Some(facing)) => (
                            position,
                            facing,
                            df.fairy_position.as_ref().map(|node| node.coord),
                        ),
                        _ => return Err(GameError::NoDragonFacing),
                    },
                    None => return Err(GameError::ModuleInactive),
                };

                let path = modules::dragon_path(&self.board, from, facing);
                let mut devoured = Vec::new();
                let mut captured = false;
                let mut position = from;
                for &cell in &path {
                    if fairy_cell == Some(cell) {
                        // Reaching the fairy captures the dragon instead
                        captured = true;
                        break;
                    }
                    position = cell;
                    devoured.extend(self.devour_meeples_at(cell));
                }
                if let Some(df) = self.module_states.dragon_fairy.as_mut() {
                    df.dragon_position = if captured { None } else { Some(position) };
                }
                events.push(GameEvent::DragonMoved {
                    path,
                    devoured,
                    captured,
                });
                self.turn_phase = TurnPhase::PlaceMeeple;
            }

            // ==================== Turn Management ====================
            GameAction::ResolveFarmerReturn { return_farmer } => {
                if self.turn_phase != TurnPhase::ReturnFarmer {
                    return Err(GameError::InvalidPhase);
                }
                let prompt = match self
                    .module_states
                    .traders_builders
                    .as_ref()
                    .and_then(|tb| tb.pending_farmer_returns.first().cloned())
                {
                    Some(prompt) => prompt,
                    None => return Err(GameError::InvalidPhase),
                };
                if player != prompt.player {
                    return Err(GameError::NotYourTurn);
                }
                if let Some(tb) = self.module_states.traders_builders.as_mut() {
                    tb.pending_farmer_returns.remove(0);
                }
                if return_farmer {
                    let removed = self
                        .tracker
                        .remove_meeples(&prompt.field, |m| m.player == prompt.player);
                    for placement in &removed {
                        self.return_placement(placement);
                    }
                    events.push(GameEvent::FarmerReturned {
                        player: prompt.player,
                        field: prompt.field.clone(),
                    });
                    if !removed.is_empty() {
                        events.push(GameEvent::MeeplesReturned { meeples: removed });
                    }
                }
                let drained = self
                    .module_states
                    .traders_builders
                    .as_ref()
                    .map(|tb| tb.pending_farmer_returns.is_empty())
                    .unwrap_or(true);
                if drained {
                    self.advance_turn(&mut events);
                }
            }

            GameAction::EndTurn => {
                if player != self.current_player {
                    return Err(GameError::NotYourTurn);
                }
                if self.turn_phase != TurnPhase::Score {
                    return Err(GameError::InvalidPhase);
                }
                events.extend(self.score_completed_features());
                self.field_payouts_and_prompts(&mut events);
                let prompts_pending = self
                    .module_states
                    .traders_builders
                    .as_ref()
                    .map(|tb| !tb.pending_farmer_returns.is_empty())
                    .unwrap_or(false);
                if prompts_pending {
                    self.turn_phase = TurnPhase::ReturnFarmer;
                } else {
                    self.advance_turn(&mut events);
                }
            }

            GameAction::EndGame => {
                if player != self.current_player {
                    return Err(GameError::NotYourTurn);
                }
                events.extend(self.finish_game());
            }
        }

        Ok(events)
    }

    // ==================== Scoring ====================

    /// Score one feature completed this turn, returning its tokens.
    ///
    /// No-op when the root is not pending. Exists alongside the bulk pass
    /// so a caller can pace payouts one by one.
    pub fn score_one_feature(&mut self, root: &NodeKey) -> Vec<GameEvent> {
        let mut events = Vec::new();
        if !self.completed_this_turn.contains(root) || self.scored_this_turn.contains(root) {
            return events;
        }
        self.scored_this_turn.insert(root.clone());
        self.scored_features.insert(root.clone());

        let scored = {
            let feature = match self.tracker.feature_by_root(root) {
                Some(feature) => feature,
                None => return events,
            };
            scoring::score_feature(&self.scoring, &self.tracker, feature, false)
        };
        if let Some(mut event) = scored {
            if let Some(owner) = self.fairy_companion(root) {
                *event.scores.entry(owner).or_insert(0) += FAIRY_SCORING_BONUS;
            }
            for (&player, &points) in &event.scores {
                if let Some(p) = self.get_player_mut(player) {
                    p.score += points;
                }
            }
            self.recent_scores.push(event.clone());
            events.push(GameEvent::FeatureScored { event });
        }

        // Tokens come home whether or not anyone held majority
        let returned = self.tracker.take_meeples(root);
        if !returned.is_empty() {
            for placement in &returned {
                self.return_placement(placement);
            }
            events.push(GameEvent::MeeplesReturned { meeples: returned });
        }
        events
    }

    /// Score every feature completed this turn that has not been paid yet
    pub fn score_completed_features(&mut self) -> Vec<GameEvent> {
        let pending: Vec<NodeKey> = self
            .completed_this_turn
            .iter()
            .filter(|root| !self.scored_this_turn.contains(*root))
            .cloned()
            .collect();
        let mut events = Vec::new();
        for root in pending {
            events.extend(self.score_one_feature(&root));
        }
        events
    }

    /// Pay pig fields adjacent to cities completed this turn and queue the
    /// farmer-return prompts. Paid cities are consumed from the field so
    /// the final sweep cannot count them again.
    fn field_payouts_and_prompts(&mut self, events: &mut Vec<GameEvent>) {
        if self.module_states.traders_builders.is_none() {
            return;
        }
        let completed_cities: BTreeSet<NodeKey> = self
            .completed_this_turn
            .iter()
            .filter(|root| {
                self.tracker
                    .feature_by_root(root)
                    .map(|feature| feature.kind == FeatureKind::City)
                    .unwrap_or(false)
            })
            .cloned()
            .collect();
        if completed_cities.is_empty() {
            return;
        }

        // Collect payouts first, the tracker borrow must drop before mutation
        let mut payouts: Vec<(NodeKey, Vec<NodeKey>, Vec<PlayerId>, Vec<Coordinate>)> = Vec::new();
        for feature in self.tracker.all_features() {
            if feature.kind != FeatureKind::Field {
                continue;
            }
            let mut owners: Vec<PlayerId> = feature
                .meeples
                .iter()
                .filter(|m| m.kind == MeepleType::Pig)
                .map(|m| m.player)
                .collect();
            owners.sort_unstable();
            owners.dedup();
            if owners.is_empty() {
                continue;
            }
            let cities: Vec<NodeKey> = scoring::completed_adjacent_cities(&self.tracker, feature)
                .into_iter()
                .filter(|root| completed_cities.contains(root))
                .collect();
            if cities.is_empty() {
                continue;
            }
            payouts.push((feature.id.clone(), cities, owners, feature.coordinates()));
        }

        for (field, cities, owners, tiles) in payouts {
            let value = self.scoring.field_value(cities.len() as u32, true);
            let mut scores = BTreeMap::new();
            for &owner in &owners {
                if let Some(p) = self.get_player_mut(owner) {
                    p.score += value;
                }
                scores.insert(owner, value);
            }
            let event = ScoreEvent {
                feature_id: field.clone(),
                kind: FeatureKind::Field,
                scores,
                tiles,
                end_game: false,
            };
            self.recent_scores.push(event.clone());
            events.push(GameEvent::FeatureScored { event });
            for city in &cities {
                self.tracker.consume_touching_city(&field, city);
            }
            if let Some(tb) = self.module_states.traders_builders.as_mut() {
                for &owner in &owners {
                    tb.pending_farmer_returns.push(FarmerReturnPrompt {
                        player: owner,
                        field: field.clone(),
                    });
                }
            }
        }
    }

    // ==================== Helper Methods ====================

    /// Hand commodity tokens from completed cities to the placing player
    fn award_commodities(
        &mut self,
        player: PlayerId,
        completed: &[NodeKey],
        events: &mut Vec<GameEvent>,
    ) {
        let mut cloth = 0;
        let mut wheat = 0;
        let mut wine = 0;
        for root in completed {
            let feature = match self.tracker.feature_by_root(root) {
                Some(feature) => feature,
                None => continue,
            };
            if feature.kind != FeatureKind::City {
                continue;
            }
            cloth += feature.metadata.count(Commodity::Cloth.key());
            wheat += feature.metadata.count(Commodity::Wheat.key());
            wine += feature.metadata.count(Commodity::Wine.key());
        }
        if cloth + wheat + wine == 0 {
            return;
        }
        if let Some(p) = self.get_player_mut(player) {
            p.commodities.add(Commodity::Cloth, cloth);
            p.commodities.add(Commodity::Wheat, wheat);
            p.commodities.add(Commodity::Wine, wine);
        }
        events.push(GameEvent::CommoditiesAwarded {
            player,
            cloth,
            wheat,
            wine,
        });
    }

    /// Grant the builder bonus when the placed tile extends a feature
    /// holding this player's primary and builder together. The builder
    /// returns to the supply on the grant; a bonus turn never chains.
    fn check_builder_bonus(
        &mut self,
        player: PlayerId,
        coord: Coordinate,
        events: &mut Vec<GameEvent>,
    ) {
        let eligible = match self.module_states.traders_builders.as_ref() {
            Some(tb) => !tb.pending_builder_bonus && !tb.is_builder_bonus_turn,
            None => false,
        };
        if !eligible {
            return;
        }
        let mut builder_node = None;
        if let Some(tile) = self.board.tile_at(coord) {
            if let Some(definition) = self.catalog.get(&tile.definition_id) {
                for segment in &definition.segments {
                    if segment.kind == FeatureKind::Cloister {
                        continue;
                    }
                    let node = NodeKey::new(coord, segment.id.clone());
                    let feature = match self.tracker.feature(&node) {
                        Some(feature) => feature,
                        None => continue,
                    };
                    let has_builder = feature
                        .meeples
                        .iter()
                        .any(|m| m.player == player && m.kind == MeepleType::Builder);
                    let has_primary = feature
                        .meeples
                        .iter()
                        .any(|m| m.player == player && !m.kind.is_support());
                    if has_builder && has_primary {
                        builder_node = Some(node);
                        break;
                    }
                }
            }
        }
        let node = match builder_node {
            Some(node) => node,
            None => return,
        };
        let removed = self
            .tracker
            .remove_meeples(&node, |m| m.player == player && m.kind == MeepleType::Builder);
        for placement in &removed {
            self.return_placement(placement);
        }
        if let Some(tb) = self.module_states.traders_builders.as_mut() {
            tb.pending_builder_bonus = true;
        }
        if !removed.is_empty() {
            events.push(GameEvent::MeeplesReturned { meeples: removed });
        }
        events.push(GameEvent::BuilderBonusEarned { player });
    }

    /// Commit a validated token to the board, the tracker and the registry
    fn commit_token(
        &mut self,
        player: PlayerId,
        kind: MeepleType,
        node: &NodeKey,
        events: &mut Vec<GameEvent>,
    ) -> Result<(), GameError> {
        let taken = match self.get_player_mut(player) {
            Some(p) => p.supply.take(kind),
            None => false,
        };
        if !taken {
            return Err(GameError::InvalidMeeple);
        }
        let placement = MeeplePlacement::new(player, kind, node.coord, node.segment.clone());
        self.tracker.add_meeple(node, placement.clone());
        self.meeples.insert(placement.key(), placement.clone());
        if let Some(p) = self.get_player_mut(player) {
            p.on_board.insert(placement.key());
        }
        events.push(GameEvent::MeeplePlaced {
            player,
            node: node.clone(),
            kind,
        });
        Ok(())
    }

    /// Take a token off the registry and give it back to its owner
    fn return_placement(&mut self, placement: &MeeplePlacement) {
        self.meeples.remove(&placement.key());
        if let Some(p) = self.get_player_mut(placement.player) {
            p.supply.add(placement.kind, 1);
            p.on_board.remove(&placement.key());
        }
    }

    /// Eat every token standing on a cell, returning what was eaten
    fn devour_meeples_at(&mut self, cell: Coordinate) -> Vec<MeeplePlacement> {
        let keys: Vec<MeepleKey> = self
            .meeples
            .keys()
            .filter(|key| key.node.coord == cell)
            .cloned()
            .collect();
        let mut eaten = Vec::new();
        for key in keys {
            let removed = self.tracker.remove_meeples(&key.node, |m| m.key() == key);
            for placement in removed {
                self.return_placement(&placement);
                eaten.push(placement);
            }
        }
        eaten
    }

    /// Turn the dragon toward a just-placed token
    fn orient_dragon_toward(&mut self, target: Coordinate, events: &mut Vec<GameEvent>) {
        let turned = match self.module_states.dragon_fairy.as_ref() {
            Some(df) => match df.dragon_position {
                Some(position) => modules::dragon_turn_toward(position, df.dragon_facing, target),
                None => None,
            },
            None => None,
        };
        if let Some(facing) = turned {
            if let Some(df) = self.module_states.dragon_fairy.as_mut() {
                df.dragon_facing = Some(facing);
            }
            events.push(GameEvent::DragonFacing { facing });
        }
    }

    /// Leave the token phase, opening the fairy window when the current
    /// player stands to gain nothing from a completion
    fn close_meeple_phase(&mut self) {
        self.turn_phase = if self.fairy_gate_open() {
            TurnPhase::FairyMove
        } else {
            TurnPhase::Score
        };
    }

    fn fairy_gate_open(&self) -> bool {
        if self.module_states.dragon_fairy.is_none() {
            return false;
        }
        self.completed_this_turn.iter().any(|root| {
            if self.scored_this_turn.contains(root) {
                return false;
            }
            let feature = match self.tracker.feature_by_root(root) {
                Some(feature) => feature,
                None => return false,
            };
            match scoring::score_feature(&self.scoring, &self.tracker, feature, false) {
                Some(event) => event.points_for(self.current_player) == 0,
                None => true,
            }
        })
    }

    /// Owner of the primary token at the fairy's node, when that node
    /// belongs to the feature being paid
    fn fairy_companion(&self, root: &NodeKey) -> Option<PlayerId> {
        let df = self.module_states.dragon_fairy.as_ref()?;
        let node = df.fairy_position.as_ref()?;
        if self.tracker.root_of(node)? != *root {
            return None;
        }
        self.meeples
            .get(&MeepleKey::primary(node.clone()))
            .map(|placement| placement.player)
    }

    fn segment_exists(&self, coord: Coordinate, segment: &str) -> bool {
        match self
            .board
            .tile_at(coord)
            .and_then(|tile| self.catalog.get(&tile.definition_id))
        {
            Some(definition) => definition.segment(segment).is_some(),
            None => false,
        }
    }

    fn last_tile_has_portal(&self) -> bool {
        match self
            .last_placed
            .and_then(|coord| self.board.tile_at(coord))
        {
            Some(tile) => self
                .catalog
                .get(&tile.definition_id)
                .map(|definition| definition.portal)
                .unwrap_or(false),
            None => false,
        }
    }

    /// Nodes where a support token could go for the action enumeration
    fn support_targets(
        &self,
        player: &Player,
        kind: MeepleType,
        anywhere: bool,
        last: Coordinate,
    ) -> Vec<NodeKey> {
        if player.supply.available(kind) == 0 {
            return Vec::new();
        }
        let mut targets = Vec::new();
        if anywhere {
            for feature in self.tracker.all_features() {
                let node = feature.id.clone();
                if meeple::can_place_support(&self.tracker, player, kind, &node) {
                    targets.push(node);
                }
            }
            targets.sort();
        } else if let Some(tile) = self.board.tile_at(last) {
            if let Some(definition) = self.catalog.get(&tile.definition_id) {
                for segment in &definition.segments {
                    let node = NodeKey::new(last, segment.id.clone());
                    if meeple::can_place_support(&self.tracker, player, kind, &node) {
                        targets.push(node);
                    }
                }
            }
        }
        targets
    }

    /// Close the turn: builder bonus replay or next seat, per-turn state
    /// reset, back to the draw phase
    fn advance_turn(&mut self, events: &mut Vec<GameEvent>) {
        let player = self.current_player;
        let mut bonus = false;
        if let Some(tb) = self.module_states.traders_builders.as_mut() {
            if tb.pending_builder_bonus {
                tb.pending_builder_bonus = false;
                tb.is_builder_bonus_turn = true;
                bonus = true;
            } else {
                tb.is_builder_bonus_turn = false;
            }
        }
        let next_player = if bonus {
            player
        } else {
            (player + 1) % self.players.len() as PlayerId
        };
        self.current_player = next_player;
        self.turn_number += 1;
        self.completed_this_turn.clear();
        self.scored_this_turn.clear();
        self.turn_phase = TurnPhase::DrawTile;
        events.push(GameEvent::TurnEnded {
            player,
            next_player,
            builder_bonus: bonus,
        });
    }

    /// Pay everything still outstanding and finish the game
    fn finish_game(&mut self) -> Vec<GameEvent> {
        let mut events = Vec::new();
        events.extend(self.score_completed_features());

        let sweep = scoring::end_game_sweep(&self.scoring, &self.tracker, &self.scored_features);
        for event in sweep {
            for (&player, &points) in &event.scores {
                if let Some(p) = self.get_player_mut(player) {
                    p.score += points;
                }
            }
            self.recent_scores.push(event.clone());
            events.push(GameEvent::FeatureScored { event });
        }

        let bonuses = scoring::commodity_bonuses(&self.scoring, &self.players);
        if !bonuses.is_empty() {
            for (&player, &points) in &bonuses {
                if let Some(p) = self.get_player_mut(player) {
                    p.score += points;
                }
            }
            events.push(GameEvent::CommodityBonuses { bonuses });
        }

        let top = self.players.iter().map(|p| p.score).max().unwrap_or(0);
        let winners: Vec<PlayerId> = self
            .players
            .iter()
            .filter(|p| p.score == top)
            .map(|p| p.id)
            .collect();
        self.phase = GamePhase::Finished {
            winners: winners.clone(),
        };
        events.push(GameEvent::GameFinished { winners });
        events
    }
}
