//! Expansion modules: configuration and per-module runtime state.
//!
//! A game activates modules through `RuleModule` entries in its config.
//! Each active module contributes tiles to the draw pile, may extend the
//! starting meeple supply, and may carry runtime state of its own. The
//! dragon's path and turning rules live here as pure helpers; executing a
//! walk against the board is the engine's job.

use crate::grid::{Board, Coordinate, Direction, NodeKey};
use crate::player::{MeepleSupply, PlayerId};
use serde::{Deserialize, Serialize};

/// One expansion module in a game config
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RuleModule {
    /// Inns & Cathedrals: inn and cathedral tiles plus the big meeple
    InnsCathedrals,
    /// Traders & Builders: commodity cities, the builder and the pig
    TradersBuilders {
        /// When set, builder and pig placements may target any qualifying
        /// feature instead of one running through the tile just placed
        support_anywhere: bool,
    },
    /// Dragon & Fairy: volcano, lair and magic portal tiles, the dragon
    /// walk and the fairy
    DragonFairy,
}

impl RuleModule {
    /// Stable identifier for configs and logs
    pub const fn key(&self) -> &'static str {
        match self {
            RuleModule::InnsCathedrals => "inns-cathedrals",
            RuleModule::TradersBuilders { .. } => "traders-builders",
            RuleModule::DragonFairy => "dragon-fairy",
        }
    }
}

/// Starting meeple supply under the active modules
pub fn starting_supply(modules: &[RuleModule]) -> MeepleSupply {
    let mut supply = MeepleSupply::base();
    for module in modules {
        match module {
            RuleModule::InnsCathedrals => supply.big = 1,
            RuleModule::TradersBuilders { .. } => {
                supply.builder = 1;
                supply.pig = 1;
            }
            RuleModule::DragonFairy => {}
        }
    }
    supply
}

/// One pending decision to pull a farmer (and pig) off a just-paid field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FarmerReturnPrompt {
    /// Farmer's owner, who decides
    pub player: PlayerId,
    /// A node of the field that just paid out
    pub field: NodeKey,
}

/// Traders & Builders runtime state
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct TradersBuildersState {
    /// Copied from the module config
    pub support_anywhere: bool,
    /// The current player extended a feature holding their own builder;
    /// the extra turn is granted when this turn ends
    pub pending_builder_bonus: bool,
    /// The turn in progress is a builder's extra turn and cannot chain
    pub is_builder_bonus_turn: bool,
    /// Farmer-return decisions awaiting resolution, in payout order
    pub pending_farmer_returns: Vec<FarmerReturnPrompt>,
}

/// Dragon & Fairy runtime state
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct DragonFairyState {
    /// Dragon's tile while in play
    pub dragon_position: Option<Coordinate>,
    /// Direction the dragon faces; kept even while out of play
    pub dragon_facing: Option<Direction>,
    /// Tile and segment the fairy accompanies
    pub fairy_position: Option<NodeKey>,
}

/// Runtime state for every active module
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ModuleStates {
    /// Inns & Cathedrals is active (it has no runtime fields)
    pub inns_cathedrals: bool,
    /// Traders & Builders state while active
    pub traders_builders: Option<TradersBuildersState>,
    /// Dragon & Fairy state while active
    pub dragon_fairy: Option<DragonFairyState>,
}

impl ModuleStates {
    /// Initialize runtime state from the configured module list
    pub fn from_modules(modules: &[RuleModule]) -> Self {
        let mut states = Self::default();
        for module in modules {
            match module {
                RuleModule::InnsCathedrals => states.inns_cathedrals = true,
                RuleModule::TradersBuilders { support_anywhere } => {
                    states.traders_builders = Some(TradersBuildersState {
                        support_anywhere: *support_anywhere,
                        ..TradersBuildersState::default()
                    });
                }
                RuleModule::DragonFairy => {
                    states.dragon_fairy = Some(DragonFairyState::default());
                }
            }
        }
        states
    }
}

/// Cells a dragon walks through from `from` facing `facing`: straight-line
/// steps for as long as the next cell holds a tile. The walk may be cut
/// short by the caller when the fairy is reached.
pub fn dragon_path(board: &Board, from: Coordinate, facing: Direction) -> Vec<Coordinate> {
    let mut path = Vec::new();
    let mut current = from;
    loop {
        let next = current.neighbor(facing);
        if board.tile_at(next).is_none() {
            return path;
        }
        path.push(next);
        current = next;
    }
}

/// Direction the dragon turns toward a just-placed token. None when there
/// is no offset or the current facing already points straight at it.
/// Ties between axes prefer the horizontal one.
pub fn dragon_turn_toward(
    dragon: Coordinate,
    facing: Option<Direction>,
    target: Coordinate,
) -> Option<Direction> {
    let dx = target.x - dragon.x;
    let dy = target.y - dragon.y;
    if dx == 0 && dy == 0 {
        return None;
    }
    if let Some(facing) = facing {
        let (fx, fy) = facing.delta();
        let straight_vertical = dx == 0 && fx == 0 && dy.signum() == fy;
        let straight_horizontal = dy == 0 && fy == 0 && dx.signum() == fx;
        if straight_vertical || straight_horizontal {
            return None;
        }
    }
    let toward = if dx.abs() >= dy.abs() {
        if dx > 0 {
            Direction::East
        } else {
            Direction::West
        }
    } else if dy > 0 {
        Direction::South
    } else {
        Direction::North
    };
    Some(toward)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::{PlacedTile, Rotation};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_starting_supply_per_module() {
        assert_eq!(starting_supply(&[]), MeepleSupply::base());

        let supply = starting_supply(&[RuleModule::InnsCathedrals]);
        assert_eq!(supply.normal, 7);
        assert_eq!(supply.big, 1);

        let supply = starting_supply(&[
            RuleModule::InnsCathedrals,
            RuleModule::TradersBuilders {
                support_anywhere: true,
            },
            RuleModule::DragonFairy,
        ]);
        assert_eq!(supply.big, 1);
        assert_eq!(supply.builder, 1);
        assert_eq!(supply.pig, 1);
    }

    #[test]
    fn test_module_states_from_config() {
        let states = ModuleStates::from_modules(&[
            RuleModule::TradersBuilders {
                support_anywhere: true,
            },
            RuleModule::DragonFairy,
        ]);
        assert!(!states.inns_cathedrals);
        let tb = states.traders_builders.expect("traders state");
        assert!(tb.support_anywhere);
        assert!(!tb.pending_builder_bonus);
        assert!(tb.pending_farmer_returns.is_empty());
        let df = states.dragon_fairy.expect("dragon state");
        assert_eq!(df.dragon_position, None);
        assert_eq!(df.fairy_position, None);
    }

    #[test]
    fn test_dragon_path_follows_tiles() {
        let mut board = Board::new();
        for x in 0..4 {
            board.place(PlacedTile::new(Coordinate::new(x, 0), "t", Rotation::R0));
        }
        board.place(PlacedTile::new(Coordinate::new(0, 1), "t", Rotation::R0));

        let path = dragon_path(&board, Coordinate::new(0, 0), Direction::East);
        assert_eq!(
            path,
            vec![
                Coordinate::new(1, 0),
                Coordinate::new(2, 0),
                Coordinate::new(3, 0)
            ]
        );
        assert_eq!(
            dragon_path(&board, Coordinate::new(0, 0), Direction::South),
            vec![Coordinate::new(0, 1)]
        );
        assert!(
            dragon_path(&board, Coordinate::new(0, 0), Direction::North).is_empty(),
            "no tile north of the strip"
        );
    }

    #[test]
    fn test_dragon_turns_toward_dominant_axis() {
        let dragon = Coordinate::new(0, 0);
        assert_eq!(
            dragon_turn_toward(dragon, None, Coordinate::new(3, 1)),
            Some(Direction::East)
        );
        assert_eq!(
            dragon_turn_toward(dragon, None, Coordinate::new(-1, -4)),
            Some(Direction::North)
        );
        assert_eq!(
            dragon_turn_toward(dragon, None, Coordinate::new(2, 2)),
            Some(Direction::East),
            "ties prefer the horizontal axis"
        );
        assert_eq!(dragon_turn_toward(dragon, None, dragon), None);
    }

    #[test]
    fn test_dragon_keeps_straight_facing() {
        let dragon = Coordinate::new(0, 0);
        assert_eq!(
            dragon_turn_toward(dragon, Some(Direction::East), Coordinate::new(5, 0)),
            None,
            "already walking straight at the target"
        );
        assert_eq!(
            dragon_turn_toward(dragon, Some(Direction::West), Coordinate::new(5, 0)),
            Some(Direction::East)
        );
        assert_eq!(
            dragon_turn_toward(dragon, Some(Direction::North), Coordinate::new(0, 3)),
            Some(Direction::South)
        );
    }

    #[test]
    fn test_module_state_serialization() {
        let mut states = ModuleStates::from_modules(&[
            RuleModule::TradersBuilders {
                support_anywhere: false,
            },
            RuleModule::DragonFairy,
        ]);
        if let Some(df) = states.dragon_fairy.as_mut() {
            df.dragon_position = Some(Coordinate::new(2, -1));
            df.dragon_facing = Some(Direction::West);
        }
        let json = serde_json::to_string(&states).expect("states serialize");
        let restored: ModuleStates = serde_json::from_str(&json).expect("states deserialize");
        assert_eq!(restored, states);
    }
}
