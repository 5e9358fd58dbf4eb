//! Player state: identity, meeple supply, commodity tokens, score.
//!
//! This module contains:
//! - `MeepleType`: the token variants and their majority weights
//! - `MeeplePlacement`: one token standing on the board
//! - `MeepleSupply`: per-type available counts
//! - `CommodityHand`: cloth/wheat/wine counters (Traders & Builders)
//! - `Player`: the full per-player record

use crate::grid::{Coordinate, MeepleKey, NodeKey};
use crate::tile::Commodity;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Player identifier (0-5 for a 6-player game)
pub type PlayerId = u8;

/// Token variants a player may hold
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum MeepleType {
    /// Standard meeple, majority weight 1
    Normal,
    /// Big meeple (Inns & Cathedrals), majority weight 2
    Big,
    /// Builder (Traders & Builders), grants the double turn
    Builder,
    /// Pig (Traders & Builders), raises field value
    Pig,
}

impl MeepleType {
    /// All meeple types
    pub const ALL: [MeepleType; 4] = [
        MeepleType::Normal,
        MeepleType::Big,
        MeepleType::Builder,
        MeepleType::Pig,
    ];

    /// Weight toward majority resolution. Support tokens never count.
    pub const fn majority_weight(&self) -> u32 {
        match self {
            MeepleType::Normal => 1,
            MeepleType::Big => 2,
            MeepleType::Builder | MeepleType::Pig => 0,
        }
    }

    /// Whether this is a support token riding on a feature the same
    /// player already claimed with a primary token
    pub const fn is_support(&self) -> bool {
        matches!(self, MeepleType::Builder | MeepleType::Pig)
    }
}

/// One token standing on the board
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MeeplePlacement {
    /// Owning player
    pub player: PlayerId,
    /// Token variant
    pub kind: MeepleType,
    /// Tile the token stands on
    pub coord: Coordinate,
    /// Segment within that tile
    pub segment: String,
}

impl MeeplePlacement {
    /// Create a placement
    pub fn new(
        player: PlayerId,
        kind: MeepleType,
        coord: Coordinate,
        segment: impl Into<String>,
    ) -> Self {
        Self {
            player,
            kind,
            coord,
            segment: segment.into(),
        }
    }

    /// The feature node this token occupies
    pub fn node(&self) -> NodeKey {
        NodeKey::new(self.coord, self.segment.clone())
    }

    /// The token registry key for this placement
    pub fn key(&self) -> MeepleKey {
        if self.kind.is_support() {
            MeepleKey::support(self.node())
        } else {
            MeepleKey::primary(self.node())
        }
    }
}

/// Player colors in seating order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlayerColor {
    Red,
    Blue,
    Green,
    Yellow,
    Black,
    Pink,
}

impl PlayerColor {
    /// All colors in seating order
    pub const ALL: [PlayerColor; 6] = [
        PlayerColor::Red,
        PlayerColor::Blue,
        PlayerColor::Green,
        PlayerColor::Yellow,
        PlayerColor::Black,
        PlayerColor::Pink,
    ];

    /// Color assigned to a player by seat
    pub fn for_player(id: PlayerId) -> Self {
        Self::ALL[id as usize % Self::ALL.len()]
    }
}

/// Available meeples per type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct MeepleSupply {
    pub normal: u32,
    pub big: u32,
    pub builder: u32,
    pub pig: u32,
}

impl MeepleSupply {
    /// The base-game supply: seven normal meeples
    pub const fn base() -> Self {
        Self {
            normal: 7,
            big: 0,
            builder: 0,
            pig: 0,
        }
    }

    /// Available count of one type
    pub const fn available(&self, kind: MeepleType) -> u32 {
        match kind {
            MeepleType::Normal => self.normal,
            MeepleType::Big => self.big,
            MeepleType::Builder => self.builder,
            MeepleType::Pig => self.pig,
        }
    }

    /// Return tokens of one type to the supply
    pub fn add(&mut self, kind: MeepleType, count: u32) {
        match kind {
            MeepleType::Normal => self.normal += count,
            MeepleType::Big => self.big += count,
            MeepleType::Builder => self.builder += count,
            MeepleType::Pig => self.pig += count,
        }
    }

    /// Take one token of a type; false when none is available
    pub fn take(&mut self, kind: MeepleType) -> bool {
        match kind {
            MeepleType::Normal if self.normal > 0 => {
                self.normal -= 1;
                true
            }
            MeepleType::Big if self.big > 0 => {
                self.big -= 1;
                true
            }
            MeepleType::Builder if self.builder > 0 => {
                self.builder -= 1;
                true
            }
            MeepleType::Pig if self.pig > 0 => {
                self.pig -= 1;
                true
            }
            _ => false,
        }
    }

    /// Total tokens still in the supply
    pub const fn total(&self) -> u32 {
        self.normal + self.big + self.builder + self.pig
    }
}

/// Commodity tokens collected by completing trader cities
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct CommodityHand {
    pub cloth: u32,
    pub wheat: u32,
    pub wine: u32,
}

impl CommodityHand {
    /// Tokens held of one commodity
    pub const fn count(&self, commodity: Commodity) -> u32 {
        match commodity {
            Commodity::Cloth => self.cloth,
            Commodity::Wheat => self.wheat,
            Commodity::Wine => self.wine,
        }
    }

    /// Award tokens of one commodity
    pub fn add(&mut self, commodity: Commodity, count: u32) {
        match commodity {
            Commodity::Cloth => self.cloth += count,
            Commodity::Wheat => self.wheat += count,
            Commodity::Wine => self.wine += count,
        }
    }
}

/// One player's full record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    /// Seat index
    pub id: PlayerId,
    /// Display name
    pub name: String,
    /// Seat color
    pub color: PlayerColor,
    /// Current score
    pub score: u32,
    /// Meeples still in hand
    pub supply: MeepleSupply,
    /// Keys of this player's tokens currently on the board
    pub on_board: BTreeSet<MeepleKey>,
    /// Commodity tokens collected
    pub commodities: CommodityHand,
}

impl Player {
    /// Create a player with the base-game supply
    pub fn new(id: PlayerId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            color: PlayerColor::for_player(id),
            score: 0,
            supply: MeepleSupply::base(),
            on_board: BTreeSet::new(),
            commodities: CommodityHand::default(),
        }
    }

    /// Number of this player's tokens on the board
    pub fn meeples_on_board(&self) -> usize {
        self.on_board.len()
    }
}
