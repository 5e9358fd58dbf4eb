//! Game actions that players can take.
//!
//! This module defines all possible actions in the game and the events
//! that result from those actions.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::grid::{Coordinate, Direction, NodeKey, Rotation};
use crate::player::{MeeplePlacement, MeepleType, PlayerId};
use crate::scoring::ScoreEvent;
use crate::tile::TileInstance;

/// All possible actions a player can take
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameAction {
    // ==================== Tile Phase ====================
    /// Draw the next tile from the pile
    DrawTile,
    /// Rotate the drawn tile one quarter turn clockwise
    RotateTile,
    /// Commit the drawn tile to a cell
    PlaceTile { coord: Coordinate },

    // ==================== Token Phase ====================
    /// Put a primary token on the placed tile, optionally together with a
    /// support token on the same segment
    PlaceMeeple {
        segment: String,
        kind: MeepleType,
        support: Option<MeepleType>,
    },
    /// Put a support token (builder or pig) on a qualifying feature
    PlaceSupport {
        coord: Coordinate,
        segment: String,
        kind: MeepleType,
    },
    /// Put a primary token on any open feature through a magic portal
    PlaceMeepleViaPortal { node: NodeKey, kind: MeepleType },
    /// Decline token placement
    SkipMeeple,

    // ==================== Dragon & Fairy ====================
    /// Move the fairy to a node holding one of your meeples
    MoveFairy { node: NodeKey },
    /// Leave the fairy where she is
    SkipFairyMove,
    /// Put the dragon on a lair tile as it enters play
    PlaceDragon { coord: Coordinate },
    /// Cycle the dragon's facing clockwise
    CycleDragonFacing,
    /// Lock in the dragon's facing
    ConfirmDragonFacing,
    /// Walk the dragon along its facing
    MoveDragon,

    // ==================== Turn Management ====================
    /// Answer the oldest pending farmer-return prompt
    ResolveFarmerReturn { return_farmer: bool },
    /// Pay out this turn's completions and pass the turn on
    EndTurn,
    /// Stop play immediately and run the final scoring sweep
    EndGame,
}

/// Events that occur as a result of actions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    /// A tile left the pile
    TileDrawn { player: PlayerId, tile: TileInstance },

    /// A drawn tile had no legal cell and was set aside
    TileDiscarded { tile: TileInstance },

    /// The tile in hand was rotated
    TileRotated { rotation: Rotation },

    /// A tile was committed to the grid
    TilePlaced {
        player: PlayerId,
        coord: Coordinate,
        definition_id: String,
        rotation: Rotation,
    },

    /// Features closed by the placement
    FeaturesCompleted { features: Vec<NodeKey> },

    /// A token went onto the board
    MeeplePlaced {
        player: PlayerId,
        node: NodeKey,
        kind: MeepleType,
    },

    /// Tokens came back off the board
    MeeplesReturned { meeples: Vec<MeeplePlacement> },

    /// A feature paid out
    FeatureScored { event: ScoreEvent },

    /// A completed commodity city paid its tokens to the placing player
    CommoditiesAwarded {
        player: PlayerId,
        cloth: u32,
        wheat: u32,
        wine: u32,
    },

    /// The builder granted its owner a second turn
    BuilderBonusEarned { player: PlayerId },

    /// The fairy moved to a new node
    FairyMoved { player: PlayerId, node: NodeKey },

    /// The dragon entered play or teleported
    DragonPlaced { coord: Coordinate },

    /// The dragon's facing changed
    DragonFacing { facing: Direction },

    /// The dragon walked its path
    DragonMoved {
        path: Vec<Coordinate>,
        devoured: Vec<MeeplePlacement>,
        captured: bool,
    },

    /// A farmer (and pig) came home after a prompt
    FarmerReturned { player: PlayerId, field: NodeKey },

    /// The turn passed on
    TurnEnded {
        player: PlayerId,
        next_player: PlayerId,
        builder_bonus: bool,
    },

    /// End-game commodity majorities paid out
    CommodityBonuses { bonuses: BTreeMap<PlayerId, u32> },

    /// Scores are final
    GameFinished { winners: Vec<PlayerId> },
}
