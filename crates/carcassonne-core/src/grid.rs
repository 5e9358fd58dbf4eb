//! Square-grid coordinate system and sparse board storage.
//!
//! This module provides the foundational types for tile placement:
//! - `Coordinate`: Identifies grid cells (x east, y south)
//! - `Direction`: The four orthogonal sides of a cell
//! - `EdgePosition`: The 12 edge sub-positions (4 sides x left/center/right)
//! - `Rotation`: Clockwise quarter-turn rotations of a tile
//! - `NodeKey` / `MeepleKey`: Packed map keys for feature nodes and tokens
//! - `Board`: Sparse tile storage with a running bounding box
//!
//! Edge sub-positions are named for an observer at the tile center facing
//! that side, so left/center/right run clockwise along each edge and the
//! four corners are shared: the NW corner is both `NorthLeft` and
//! `WestRight`, NE is `NorthRight` and `EastLeft`, SE is `EastRight` and
//! `SouthLeft`, SW is `SouthRight` and `WestLeft`.

use im::HashMap as ImHashMap;
use serde::de::Error as DeError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Grid coordinate. `x` increases going east, `y` increases going south,
/// so north of (0,0) is (0,-1).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default)]
pub struct Coordinate {
    /// Column (increases going east)
    pub x: i32,
    /// Row (increases going south)
    pub y: i32,
}

impl Coordinate {
    /// Create a new coordinate
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Canonical packed form used as a map key ("x,y")
    pub fn key(&self) -> String {
        format!("{},{}", self.x, self.y)
    }

    /// The neighboring coordinate in a given direction
    pub const fn neighbor(&self, direction: Direction) -> Coordinate {
        let (dx, dy) = direction.delta();
        Coordinate::new(self.x + dx, self.y + dy)
    }

    /// The four orthogonal neighbors, in `Direction::ALL` order
    pub fn orthogonal_neighbors(&self) -> [Coordinate; 4] {
        [
            self.neighbor(Direction::North),
            self.neighbor(Direction::East),
            self.neighbor(Direction::South),
            self.neighbor(Direction::West),
        ]
    }

    /// All eight surrounding coordinates (orthogonal + diagonal)
    pub fn surrounding(&self) -> [Coordinate; 8] {
        let mut cells = [Coordinate::default(); 8];
        let mut i = 0;
        for dy in -1..=1 {
            for dx in -1..=1 {
                if dx == 0 && dy == 0 {
                    continue;
                }
                cells[i] = Coordinate::new(self.x + dx, self.y + dy);
                i += 1;
            }
        }
        cells
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.x, self.y)
    }
}

impl FromStr for Coordinate {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (x, y) = s
            .split_once(',')
            .ok_or_else(|| format!("bad coordinate key: {s}"))?;
        let x = x.parse().map_err(|_| format!("bad coordinate key: {s}"))?;
        let y = y.parse().map_err(|_| format!("bad coordinate key: {s}"))?;
        Ok(Coordinate::new(x, y))
    }
}

/// One of the four orthogonal sides of a tile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Direction {
    North,
    East,
    South,
    West,
}

impl Direction {
    /// All directions in clockwise order starting from North
    pub const ALL: [Direction; 4] = [
        Direction::North,
        Direction::East,
        Direction::South,
        Direction::West,
    ];

    /// Grid delta for stepping one cell in this direction
    pub const fn delta(&self) -> (i32, i32) {
        match self {
            Direction::North => (0, -1),
            Direction::East => (1, 0),
            Direction::South => (0, 1),
            Direction::West => (-1, 0),
        }
    }

    /// The direction facing back at this one
    pub const fn opposite(&self) -> Direction {
        match self {
            Direction::North => Direction::South,
            Direction::East => Direction::West,
            Direction::South => Direction::North,
            Direction::West => Direction::East,
        }
    }

    /// One clockwise quarter turn
    pub const fn clockwise(&self) -> Direction {
        match self {
            Direction::North => Direction::East,
            Direction::East => Direction::South,
            Direction::South => Direction::West,
            Direction::West => Direction::North,
        }
    }

    /// The physical direction of this logical side after rotating the tile
    pub fn rotated(&self, rotation: Rotation) -> Direction {
        let mut dir = *self;
        for _ in 0..rotation.quarter_turns() {
            dir = dir.clockwise();
        }
        dir
    }

    /// The logical side that faces a physical direction on a rotated tile
    pub fn unrotated(&self, rotation: Rotation) -> Direction {
        self.rotated(rotation.inverse())
    }
}

/// Clockwise rotation applied to a tile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Rotation {
    #[default]
    R0,
    R90,
    R180,
    R270,
}

impl Rotation {
    /// All rotations in increasing order
    pub const ALL: [Rotation; 4] = [Rotation::R0, Rotation::R90, Rotation::R180, Rotation::R270];

    /// Number of clockwise quarter turns
    pub const fn quarter_turns(&self) -> u8 {
        match self {
            Rotation::R0 => 0,
            Rotation::R90 => 1,
            Rotation::R180 => 2,
            Rotation::R270 => 3,
        }
    }

    /// The rotation that undoes this one
    pub const fn inverse(&self) -> Rotation {
        match self {
            Rotation::R0 => Rotation::R0,
            Rotation::R90 => Rotation::R270,
            Rotation::R180 => Rotation::R180,
            Rotation::R270 => Rotation::R90,
        }
    }

    /// The next rotation clockwise (cycles back to R0)
    pub const fn next_clockwise(&self) -> Rotation {
        match self {
            Rotation::R0 => Rotation::R90,
            Rotation::R90 => Rotation::R180,
            Rotation::R180 => Rotation::R270,
            Rotation::R270 => Rotation::R0,
        }
    }

    /// Rotation angle in degrees
    pub const fn degrees(&self) -> u16 {
        self.quarter_turns() as u16 * 90
    }
}

/// Left/center/right slot within one side; slots run clockwise along the edge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EdgeSlot {
    Left,
    Center,
    Right,
}

/// One of the 12 edge sub-positions of a tile.
///
/// A clockwise quarter turn carries each side to the next side while
/// preserving the left/center/right label: `NorthLeft` rotates to
/// `EastLeft`, never `EastRight`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EdgePosition {
    NorthLeft,
    NorthCenter,
    NorthRight,
    EastLeft,
    EastCenter,
    EastRight,
    SouthLeft,
    SouthCenter,
    SouthRight,
    WestLeft,
    WestCenter,
    WestRight,
}

impl EdgePosition {
    /// All 12 sub-positions, clockwise from NorthLeft
    pub const ALL: [EdgePosition; 12] = [
        EdgePosition::NorthLeft,
        EdgePosition::NorthCenter,
        EdgePosition::NorthRight,
        EdgePosition::EastLeft,
        EdgePosition::EastCenter,
        EdgePosition::EastRight,
        EdgePosition::SouthLeft,
        EdgePosition::SouthCenter,
        EdgePosition::SouthRight,
        EdgePosition::WestLeft,
        EdgePosition::WestCenter,
        EdgePosition::WestRight,
    ];

    /// The side this sub-position sits on
    pub const fn side(&self) -> Direction {
        match self {
            EdgePosition::NorthLeft | EdgePosition::NorthCenter | EdgePosition::NorthRight => {
                Direction::North
            }
            EdgePosition::EastLeft | EdgePosition::EastCenter | EdgePosition::EastRight => {
                Direction::East
            }
            EdgePosition::SouthLeft | EdgePosition::SouthCenter | EdgePosition::SouthRight => {
                Direction::South
            }
            EdgePosition::WestLeft | EdgePosition::WestCenter | EdgePosition::WestRight => {
                Direction::West
            }
        }
    }

    /// The slot within the side
    pub const fn slot(&self) -> EdgeSlot {
        match self {
            EdgePosition::NorthLeft
            | EdgePosition::EastLeft
            | EdgePosition::SouthLeft
            | EdgePosition::WestLeft => EdgeSlot::Left,
            EdgePosition::NorthCenter
            | EdgePosition::EastCenter
            | EdgePosition::SouthCenter
            | EdgePosition::WestCenter => EdgeSlot::Center,
            EdgePosition::NorthRight
            | EdgePosition::EastRight
            | EdgePosition::SouthRight
            | EdgePosition::WestRight => EdgeSlot::Right,
        }
    }

    /// The three sub-positions on a given side, left to right
    pub const fn on_side(side: Direction) -> [EdgePosition; 3] {
        match side {
            Direction::North => [
                EdgePosition::NorthLeft,
                EdgePosition::NorthCenter,
                EdgePosition::NorthRight,
            ],
            Direction::East => [
                EdgePosition::EastLeft,
                EdgePosition::EastCenter,
                EdgePosition::EastRight,
            ],
            Direction::South => [
                EdgePosition::SouthLeft,
                EdgePosition::SouthCenter,
                EdgePosition::SouthRight,
            ],
            Direction::West => [
                EdgePosition::WestLeft,
                EdgePosition::WestCenter,
                EdgePosition::WestRight,
            ],
        }
    }

    /// One clockwise quarter turn. Side advances, slot label is preserved.
    pub const fn rotated_cw(&self) -> EdgePosition {
        match self {
            EdgePosition::NorthLeft => EdgePosition::EastLeft,
            EdgePosition::NorthCenter => EdgePosition::EastCenter,
            EdgePosition::NorthRight => EdgePosition::EastRight,
            EdgePosition::EastLeft => EdgePosition::SouthLeft,
            EdgePosition::EastCenter => EdgePosition::SouthCenter,
            EdgePosition::EastRight => EdgePosition::SouthRight,
            EdgePosition::SouthLeft => EdgePosition::WestLeft,
            EdgePosition::SouthCenter => EdgePosition::WestCenter,
            EdgePosition::SouthRight => EdgePosition::WestRight,
            EdgePosition::WestLeft => EdgePosition::NorthLeft,
            EdgePosition::WestCenter => EdgePosition::NorthCenter,
            EdgePosition::WestRight => EdgePosition::NorthRight,
        }
    }

    /// Where this logical sub-position physically sits after rotating the tile
    pub fn rotated(&self, rotation: Rotation) -> EdgePosition {
        let mut pos = *self;
        for _ in 0..rotation.quarter_turns() {
            pos = pos.rotated_cw();
        }
        pos
    }

    /// The logical sub-position occupying a physical one on a rotated tile
    pub fn unrotated(&self, rotation: Rotation) -> EdgePosition {
        self.rotated(rotation.inverse())
    }

    /// The sub-position that touches this one across a tile boundary.
    ///
    /// Positions are named from outside, so the mirror swaps handedness:
    /// a north-left sub-position meets the neighbor's south-right.
    pub const fn mirrored(&self) -> EdgePosition {
        match self {
            EdgePosition::NorthLeft => EdgePosition::SouthRight,
            EdgePosition::NorthCenter => EdgePosition::SouthCenter,
            EdgePosition::NorthRight => EdgePosition::SouthLeft,
            EdgePosition::EastLeft => EdgePosition::WestRight,
            EdgePosition::EastCenter => EdgePosition::WestCenter,
            EdgePosition::EastRight => EdgePosition::WestLeft,
            EdgePosition::SouthLeft => EdgePosition::NorthRight,
            EdgePosition::SouthCenter => EdgePosition::NorthCenter,
            EdgePosition::SouthRight => EdgePosition::NorthLeft,
            EdgePosition::WestLeft => EdgePosition::EastRight,
            EdgePosition::WestCenter => EdgePosition::EastCenter,
            EdgePosition::WestRight => EdgePosition::EastLeft,
        }
    }
}

/// Identity of one feature node: a segment on a placed tile.
///
/// Serializes as its packed form "x,y:segment" so node-keyed maps become
/// plain JSON objects.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeKey {
    /// Tile coordinate
    pub coord: Coordinate,
    /// Segment id within the tile definition
    pub segment: String,
}

impl NodeKey {
    /// Create a node key
    pub fn new(coord: Coordinate, segment: impl Into<String>) -> Self {
        Self {
            coord,
            segment: segment.into(),
        }
    }
}

impl fmt::Display for NodeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.coord, self.segment)
    }
}

impl FromStr for NodeKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (coord, segment) = s
            .split_once(':')
            .ok_or_else(|| format!("bad node key: {s}"))?;
        Ok(NodeKey::new(coord.parse::<Coordinate>()?, segment))
    }
}

impl Serialize for NodeKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for NodeKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(DeError::custom)
    }
}

/// Key of one token on the board: the node it sits on, plus a flag
/// separating a support token (builder/pig) from the primary token that
/// may share the same segment.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MeepleKey {
    /// Node the token occupies
    pub node: NodeKey,
    /// True for a support (builder/pig) token
    pub support: bool,
}

impl MeepleKey {
    /// Key for a primary token on a node
    pub fn primary(node: NodeKey) -> Self {
        Self {
            node,
            support: false,
        }
    }

    /// Key for a support token on a node
    pub fn support(node: NodeKey) -> Self {
        Self {
            node,
            support: true,
        }
    }
}

const SUPPORT_SUFFIX: &str = "+support";

impl fmt::Display for MeepleKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.support {
            write!(f, "{}{}", self.node, SUPPORT_SUFFIX)
        } else {
            write!(f, "{}", self.node)
        }
    }
}

impl FromStr for MeepleKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.strip_suffix(SUPPORT_SUFFIX) {
            Some(node) => Ok(MeepleKey::support(node.parse()?)),
            None => Ok(MeepleKey::primary(s.parse()?)),
        }
    }
}

impl Serialize for MeepleKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for MeepleKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(DeError::custom)
    }
}

/// Serde adapter turning coordinate-keyed maps into JSON objects with
/// "x,y" keys.
pub(crate) mod coord_key_map {
    use super::Coordinate;
    use im::HashMap as ImHashMap;
    use serde::de::Error as DeError;
    use serde::ser::SerializeMap;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<V, S>(map: &ImHashMap<Coordinate, V>, serializer: S) -> Result<S::Ok, S::Error>
    where
        V: Serialize + Clone,
        S: Serializer,
    {
        let mut entries: Vec<_> = map.iter().collect();
        entries.sort_by_key(|(coord, _)| **coord);
        let mut out = serializer.serialize_map(Some(entries.len()))?;
        for (coord, value) in entries {
            out.serialize_entry(&coord.key(), value)?;
        }
        out.end()
    }

    pub fn deserialize<'de, V, D>(deserializer: D) -> Result<ImHashMap<Coordinate, V>, D::Error>
    where
        V: Deserialize<'de> + Clone,
        D: Deserializer<'de>,
    {
        let raw: std::collections::BTreeMap<String, V> = Deserialize::deserialize(deserializer)?;
        let mut map = ImHashMap::new();
        for (key, value) in raw {
            let coord: Coordinate = key.parse().map_err(DeError::custom)?;
            map.insert(coord, value);
        }
        Ok(map)
    }
}

/// A tile committed to the grid
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlacedTile {
    /// Where it sits
    pub coord: Coordinate,
    /// Catalog definition id
    pub definition_id: String,
    /// Rotation it was placed with
    pub rotation: Rotation,
}

impl PlacedTile {
    /// Create a placed tile
    pub fn new(coord: Coordinate, definition_id: impl Into<String>, rotation: Rotation) -> Self {
        Self {
            coord,
            definition_id: definition_id.into(),
            rotation,
        }
    }
}

/// Sparse tile storage with a running bounding box.
///
/// Backed by a persistent map so cloning a board is O(1) and two held
/// snapshots never alias (see the engine's snapshot rules).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Board {
    #[serde(with = "coord_key_map")]
    tiles: ImHashMap<Coordinate, PlacedTile>,
    /// Smallest occupied x
    pub min_x: i32,
    /// Largest occupied x
    pub max_x: i32,
    /// Smallest occupied y
    pub min_y: i32,
    /// Largest occupied y
    pub max_y: i32,
}

impl Board {
    /// Create an empty board
    pub fn new() -> Self {
        Self {
            tiles: ImHashMap::new(),
            min_x: 0,
            max_x: 0,
            min_y: 0,
            max_y: 0,
        }
    }

    /// Number of placed tiles
    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    /// Whether no tile has been placed yet
    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    /// The tile at a coordinate, if any
    pub fn tile_at(&self, coord: Coordinate) -> Option<&PlacedTile> {
        self.tiles.get(&coord)
    }

    /// Whether a coordinate is occupied
    pub fn is_occupied(&self, coord: Coordinate) -> bool {
        self.tiles.contains_key(&coord)
    }

    /// Commit a tile to the grid, growing the bounding box
    pub fn place(&mut self, tile: PlacedTile) {
        let coord = tile.coord;
        self.min_x = self.min_x.min(coord.x);
        self.max_x = self.max_x.max(coord.x);
        self.min_y = self.min_y.min(coord.y);
        self.max_y = self.max_y.max(coord.y);
        self.tiles.insert(coord, tile);
    }

    /// Iterate all placed tiles (arbitrary order)
    pub fn tiles(&self) -> impl Iterator<Item = &PlacedTile> {
        self.tiles.values()
    }

    /// All occupied coordinates, sorted for deterministic iteration
    pub fn coordinates(&self) -> Vec<Coordinate> {
        let mut coords: Vec<Coordinate> = self.tiles.keys().copied().collect();
        coords.sort();
        coords
    }

    /// Whether a coordinate has at least one occupied orthogonal neighbor
    pub fn has_adjacent_tile(&self, coord: Coordinate) -> bool {
        coord
            .orthogonal_neighbors()
            .iter()
            .any(|n| self.is_occupied(*n))
    }

    /// Count of occupied cells among the 8 surrounding a coordinate
    pub fn surrounding_count(&self, coord: Coordinate) -> u32 {
        coord
            .surrounding()
            .iter()
            .filter(|c| self.is_occupied(**c))
            .count() as u32
    }

    /// All empty coordinates orthogonally adjacent to an occupied cell,
    /// sorted for deterministic iteration
    pub fn frontier(&self) -> Vec<Coordinate> {
        let mut cells: Vec<Coordinate> = self
            .tiles
            .keys()
            .flat_map(|c| c.orthogonal_neighbors())
            .filter(|c| !self.is_occupied(*c))
            .collect();
        cells.sort();
        cells.dedup();
        cells
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_direction_deltas() {
        assert_eq!(Direction::North.delta(), (0, -1));
        assert_eq!(Direction::East.delta(), (1, 0));
        assert_eq!(Direction::South.delta(), (0, 1));
        assert_eq!(Direction::West.delta(), (-1, 0));
    }

    #[test]
    fn test_direction_opposites() {
        for dir in Direction::ALL {
            assert_eq!(dir.opposite().opposite(), dir);
        }
        assert_eq!(Direction::North.opposite(), Direction::South);
        assert_eq!(Direction::East.opposite(), Direction::West);
    }

    #[test]
    fn test_direction_rotation() {
        assert_eq!(Direction::North.rotated(Rotation::R90), Direction::East);
        assert_eq!(Direction::North.rotated(Rotation::R180), Direction::South);
        assert_eq!(Direction::North.rotated(Rotation::R270), Direction::West);
        assert_eq!(Direction::West.rotated(Rotation::R90), Direction::North);
        for dir in Direction::ALL {
            assert_eq!(dir.rotated(Rotation::R0), dir);
            for rot in Rotation::ALL {
                assert_eq!(dir.rotated(rot).unrotated(rot), dir, "unrotate must invert");
            }
        }
    }

    #[test]
    fn test_edge_rotation_90_preserves_slot_label() {
        // The handedness trap: a quarter turn moves north to east but
        // keeps left as left.
        assert_eq!(
            EdgePosition::NorthLeft.rotated(Rotation::R90),
            EdgePosition::EastLeft
        );
        assert_eq!(
            EdgePosition::NorthCenter.rotated(Rotation::R90),
            EdgePosition::EastCenter
        );
        assert_eq!(
            EdgePosition::NorthRight.rotated(Rotation::R90),
            EdgePosition::EastRight
        );
        assert_eq!(
            EdgePosition::EastLeft.rotated(Rotation::R90),
            EdgePosition::SouthLeft
        );
        assert_eq!(
            EdgePosition::EastCenter.rotated(Rotation::R90),
            EdgePosition::SouthCenter
        );
        assert_eq!(
            EdgePosition::EastRight.rotated(Rotation::R90),
            EdgePosition::SouthRight
        );
        assert_eq!(
            EdgePosition::SouthLeft.rotated(Rotation::R90),
            EdgePosition::WestLeft
        );
        assert_eq!(
            EdgePosition::SouthCenter.rotated(Rotation::R90),
            EdgePosition::WestCenter
        );
        assert_eq!(
            EdgePosition::SouthRight.rotated(Rotation::R90),
            EdgePosition::WestRight
        );
        assert_eq!(
            EdgePosition::WestLeft.rotated(Rotation::R90),
            EdgePosition::NorthLeft
        );
        assert_eq!(
            EdgePosition::WestCenter.rotated(Rotation::R90),
            EdgePosition::NorthCenter
        );
        assert_eq!(
            EdgePosition::WestRight.rotated(Rotation::R90),
            EdgePosition::NorthRight
        );
    }

    #[test]
    fn test_edge_rotation_180() {
        assert_eq!(
            EdgePosition::NorthLeft.rotated(Rotation::R180),
            EdgePosition::SouthLeft
        );
        assert_eq!(
            EdgePosition::NorthCenter.rotated(Rotation::R180),
            EdgePosition::SouthCenter
        );
        assert_eq!(
            EdgePosition::EastRight.rotated(Rotation::R180),
            EdgePosition::WestRight
        );
        assert_eq!(
            EdgePosition::SouthCenter.rotated(Rotation::R180),
            EdgePosition::NorthCenter
        );
        assert_eq!(
            EdgePosition::WestLeft.rotated(Rotation::R180),
            EdgePosition::EastLeft
        );
    }

    #[test]
    fn test_edge_rotation_270() {
        assert_eq!(
            EdgePosition::NorthLeft.rotated(Rotation::R270),
            EdgePosition::WestLeft
        );
        assert_eq!(
            EdgePosition::NorthRight.rotated(Rotation::R270),
            EdgePosition::WestRight
        );
        assert_eq!(
            EdgePosition::EastCenter.rotated(Rotation::R270),
            EdgePosition::NorthCenter
        );
        assert_eq!(
            EdgePosition::SouthRight.rotated(Rotation::R270),
            EdgePosition::EastRight
        );
        assert_eq!(
            EdgePosition::WestCenter.rotated(Rotation::R270),
            EdgePosition::SouthCenter
        );
    }

    #[test]
    fn test_edge_rotation_identity_and_inverse() {
        for pos in EdgePosition::ALL {
            assert_eq!(pos.rotated(Rotation::R0), pos);
            assert_eq!(
                pos.rotated_cw().rotated_cw().rotated_cw().rotated_cw(),
                pos,
                "four quarter turns must be identity"
            );
            for rot in Rotation::ALL {
                assert_eq!(pos.rotated(rot).unrotated(rot), pos, "unrotate must invert");
            }
        }
    }

    #[test]
    fn test_edge_mirror_swaps_handedness() {
        assert_eq!(EdgePosition::NorthLeft.mirrored(), EdgePosition::SouthRight);
        assert_eq!(
            EdgePosition::NorthCenter.mirrored(),
            EdgePosition::SouthCenter
        );
        assert_eq!(EdgePosition::EastLeft.mirrored(), EdgePosition::WestRight);
        for pos in EdgePosition::ALL {
            assert_eq!(pos.mirrored().mirrored(), pos, "mirror is an involution");
            assert_eq!(pos.mirrored().side(), pos.side().opposite());
        }
    }

    #[test]
    fn test_edge_side_and_slot() {
        assert_eq!(EdgePosition::NorthLeft.side(), Direction::North);
        assert_eq!(EdgePosition::WestRight.side(), Direction::West);
        assert_eq!(EdgePosition::SouthCenter.slot(), EdgeSlot::Center);
        for side in Direction::ALL {
            let positions = EdgePosition::on_side(side);
            assert_eq!(positions.len(), 3);
            for pos in positions {
                assert_eq!(pos.side(), side);
            }
        }
    }

    #[test]
    fn test_coordinate_neighbors() {
        let origin = Coordinate::new(0, 0);
        assert_eq!(origin.neighbor(Direction::North), Coordinate::new(0, -1));
        assert_eq!(origin.neighbor(Direction::South), Coordinate::new(0, 1));
        assert_eq!(origin.surrounding().len(), 8);
    }

    #[test]
    fn test_coordinate_key_round_trip() {
        let coord = Coordinate::new(-3, 12);
        assert_eq!(coord.key(), "-3,12");
        assert_eq!("-3,12".parse::<Coordinate>().unwrap(), coord);
        assert!("nonsense".parse::<Coordinate>().is_err());
    }

    #[test]
    fn test_node_key_packed_form() {
        let key = NodeKey::new(Coordinate::new(2, -1), "city0");
        assert_eq!(key.to_string(), "2,-1:city0");
        assert_eq!("2,-1:city0".parse::<NodeKey>().unwrap(), key);
        let json = serde_json::to_string(&key).unwrap();
        assert_eq!(json, "\"2,-1:city0\"");
        assert_eq!(serde_json::from_str::<NodeKey>(&json).unwrap(), key);
    }

    #[test]
    fn test_meeple_key_packed_form() {
        let node = NodeKey::new(Coordinate::new(1, 0), "road1");
        let primary = MeepleKey::primary(node.clone());
        let support = MeepleKey::support(node);
        assert_eq!(primary.to_string(), "1,0:road1");
        assert_eq!(support.to_string(), "1,0:road1+support");
        assert_eq!(primary.to_string().parse::<MeepleKey>().unwrap(), primary);
        assert_eq!(support.to_string().parse::<MeepleKey>().unwrap(), support);
    }

    #[test]
    fn test_board_bounds_and_queries() {
        let mut board = Board::new();
        assert!(board.is_empty());
        board.place(PlacedTile::new(Coordinate::new(0, 0), "a", Rotation::R0));
        board.place(PlacedTile::new(Coordinate::new(2, -1), "b", Rotation::R90));
        assert_eq!(board.len(), 2);
        assert_eq!(board.max_x, 2);
        assert_eq!(board.min_y, -1);
        assert!(board.is_occupied(Coordinate::new(0, 0)));
        assert!(!board.is_occupied(Coordinate::new(1, 1)));
        assert!(board.has_adjacent_tile(Coordinate::new(1, 0)));
        assert!(!board.has_adjacent_tile(Coordinate::new(5, 5)));
        assert_eq!(
            board.tile_at(Coordinate::new(2, -1)).unwrap().rotation,
            Rotation::R90
        );
    }

    #[test]
    fn test_board_frontier() {
        let mut board = Board::new();
        board.place(PlacedTile::new(Coordinate::new(0, 0), "a", Rotation::R0));
        let frontier = board.frontier();
        assert_eq!(frontier.len(), 4);
        assert!(frontier.contains(&Coordinate::new(0, -1)));
        board.place(PlacedTile::new(Coordinate::new(1, 0), "b", Rotation::R0));
        let frontier = board.frontier();
        assert_eq!(frontier.len(), 6);
        assert!(!frontier.contains(&Coordinate::new(1, 0)));
    }

    #[test]
    fn test_surrounding_count() {
        let mut board = Board::new();
        let center = Coordinate::new(0, 0);
        assert_eq!(board.surrounding_count(center), 0);
        for cell in center.surrounding() {
            board.place(PlacedTile::new(cell, "x", Rotation::R0));
        }
        assert_eq!(board.surrounding_count(center), 8);
        // The center itself never counts toward its own surround.
        board.place(PlacedTile::new(center, "c", Rotation::R0));
        assert_eq!(board.surrounding_count(center), 8);
    }
}
