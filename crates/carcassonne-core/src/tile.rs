//! Tile definitions and the validated tile catalog.
//!
//! This module contains:
//! - Segment kinds (road, city, cloister, field) and commodity tags
//! - `TileDefinition`: one catalog entry with its 12 edge assignments
//! - `TileInstance`: a drawn tile with its current rotation
//! - `TileCatalog`: id-indexed definitions, validated at construction
//!
//! A definition describes a tile in its logical (unrotated) orientation.
//! All physical lookups go through `Rotation`: the physical edge position
//! is un-rotated back to the logical one before reading the edge map.

use crate::grid::{Direction, EdgePosition, Rotation};
use im::HashMap as ImHashMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

/// Class of a tile segment, and of the feature it belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum FeatureKind {
    Road,
    City,
    Cloister,
    Field,
}

impl FeatureKind {
    /// All feature kinds
    pub const ALL: [FeatureKind; 4] = [
        FeatureKind::Road,
        FeatureKind::City,
        FeatureKind::Cloister,
        FeatureKind::Field,
    ];

    /// Whether this kind can complete through open-edge accounting.
    /// Cloisters complete by surround count, fields never complete.
    pub const fn completes_by_edges(&self) -> bool {
        matches!(self, FeatureKind::Road | FeatureKind::City)
    }
}

/// Commodity marker carried by some city segments
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Commodity {
    Cloth,
    Wheat,
    Wine,
}

impl Commodity {
    /// All commodity types
    pub const ALL: [Commodity; 3] = [Commodity::Cloth, Commodity::Wheat, Commodity::Wine];

    /// Metadata key for this commodity's per-feature count
    pub const fn key(&self) -> &'static str {
        match self {
            Commodity::Cloth => "cloth",
            Commodity::Wheat => "wheat",
            Commodity::Wine => "wine",
        }
    }
}

/// One segment of a tile definition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Segment {
    /// Id unique within the definition (e.g. "city0")
    pub id: String,
    /// Segment class
    pub kind: FeatureKind,
    /// Pennant flag (city scoring bonus marker)
    pub pennant: bool,
    /// Commodity marker, if any
    pub commodity: Option<Commodity>,
    /// Inn flag (road scoring override)
    pub inn: bool,
    /// Cathedral flag (city scoring override)
    pub cathedral: bool,
}

impl Segment {
    /// Create a segment of the given kind
    pub fn new(id: impl Into<String>, kind: FeatureKind) -> Self {
        Self {
            id: id.into(),
            kind,
            pennant: false,
            commodity: None,
            inn: false,
            cathedral: false,
        }
    }

    /// Road segment
    pub fn road(id: impl Into<String>) -> Self {
        Self::new(id, FeatureKind::Road)
    }

    /// City segment
    pub fn city(id: impl Into<String>) -> Self {
        Self::new(id, FeatureKind::City)
    }

    /// Cloister segment
    pub fn cloister(id: impl Into<String>) -> Self {
        Self::new(id, FeatureKind::Cloister)
    }

    /// Field segment
    pub fn field(id: impl Into<String>) -> Self {
        Self::new(id, FeatureKind::Field)
    }

    /// Add a pennant
    pub fn with_pennant(mut self) -> Self {
        self.pennant = true;
        self
    }

    /// Add a commodity marker
    pub fn with_commodity(mut self, commodity: Commodity) -> Self {
        self.commodity = Some(commodity);
        self
    }

    /// Mark as carrying an inn
    pub fn with_inn(mut self) -> Self {
        self.inn = true;
        self
    }

    /// Mark as carrying a cathedral
    pub fn with_cathedral(mut self) -> Self {
        self.cathedral = true;
        self
    }
}

/// One catalog entry: a tile design plus how many copies exist.
///
/// Authored with the chainable `with_*` methods; `TileCatalog::build`
/// checks the result, so hand-authored sets fail loudly at construction
/// rather than mid-game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileDefinition {
    /// Catalog id (e.g. "base_d")
    pub id: String,
    /// Number of copies in the pile
    pub count: u32,
    /// Whether one copy seeds the grid at game start
    pub starting: bool,
    /// Segments on this tile
    pub segments: Vec<Segment>,
    /// Which segment occupies each of the 12 edge sub-positions
    pub edges: BTreeMap<EdgePosition, String>,
    /// Segment pairs that touch inside the tile (field/city bookkeeping)
    pub adjacencies: Vec<(String, String)>,
    /// Volcano flag: the dragon teleports here, no token phase
    pub volcano: bool,
    /// Dragon lair flag: triggers/hosts the dragon
    pub lair: bool,
    /// Magic portal flag: remote meeple placement
    pub portal: bool,
}

impl TileDefinition {
    /// Start a definition with the given id and copy count
    pub fn new(id: impl Into<String>, count: u32) -> Self {
        Self {
            id: id.into(),
            count,
            starting: false,
            segments: Vec::new(),
            edges: BTreeMap::new(),
            adjacencies: Vec::new(),
            volcano: false,
            lair: false,
            portal: false,
        }
    }

    /// Mark as the starting tile
    pub fn starting(mut self) -> Self {
        self.starting = true;
        self
    }

    /// Add a segment
    pub fn with_segment(mut self, segment: Segment) -> Self {
        self.segments.push(segment);
        self
    }

    /// Assign all three sub-positions of a side to one segment
    pub fn with_side(mut self, side: Direction, segment_id: &str) -> Self {
        for position in EdgePosition::on_side(side) {
            self.edges.insert(position, segment_id.to_string());
        }
        self
    }

    /// Assign a single edge sub-position (overrides a prior side fill)
    pub fn with_edge(mut self, position: EdgePosition, segment_id: &str) -> Self {
        self.edges.insert(position, segment_id.to_string());
        self
    }

    /// Record that two segments touch inside the tile
    pub fn with_adjacency(mut self, a: &str, b: &str) -> Self {
        self.adjacencies.push((a.to_string(), b.to_string()));
        self
    }

    /// Mark as a volcano tile
    pub fn with_volcano(mut self) -> Self {
        self.volcano = true;
        self
    }

    /// Mark as a dragon lair tile
    pub fn with_lair(mut self) -> Self {
        self.lair = true;
        self
    }

    /// Mark as a magic portal tile
    pub fn with_portal(mut self) -> Self {
        self.portal = true;
        self
    }

    /// Look up a segment by id
    pub fn segment(&self, id: &str) -> Option<&Segment> {
        self.segments.iter().find(|s| s.id == id)
    }

    /// The cloister segment, if this tile has one
    pub fn cloister_segment(&self) -> Option<&Segment> {
        self.segments.iter().find(|s| s.kind == FeatureKind::Cloister)
    }

    /// The segment at a physical edge sub-position, given the rotation
    /// the tile was placed with
    pub fn segment_at(&self, physical: EdgePosition, rotation: Rotation) -> Option<&Segment> {
        let logical = physical.unrotated(rotation);
        let segment_id = self.edges.get(&logical)?;
        self.segment(segment_id)
    }

    /// All physical edge sub-positions a segment occupies under a rotation
    pub fn physical_positions(&self, segment_id: &str, rotation: Rotation) -> Vec<EdgePosition> {
        self.edges
            .iter()
            .filter(|(_, id)| id.as_str() == segment_id)
            .map(|(position, _)| position.rotated(rotation))
            .collect()
    }

    /// Ids of city segments recorded as touching the given segment
    pub fn adjacent_city_segments(&self, segment_id: &str) -> Vec<&str> {
        self.adjacencies
            .iter()
            .filter_map(|(a, b)| {
                if a == segment_id {
                    Some(b.as_str())
                } else if b == segment_id {
                    Some(a.as_str())
                } else {
                    None
                }
            })
            .filter(|other| {
                self.segment(other)
                    .map(|s| s.kind == FeatureKind::City)
                    .unwrap_or(false)
            })
            .collect()
    }
}

/// A tile in hand or in the pile: a definition id plus current rotation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileInstance {
    /// Catalog definition id
    pub definition_id: String,
    /// Current rotation
    pub rotation: Rotation,
}

impl TileInstance {
    /// A fresh, unrotated instance of a definition
    pub fn new(definition_id: impl Into<String>) -> Self {
        Self {
            definition_id: definition_id.into(),
            rotation: Rotation::R0,
        }
    }

    /// The same instance rotated one quarter turn clockwise
    pub fn rotated_clockwise(&self) -> Self {
        Self {
            definition_id: self.definition_id.clone(),
            rotation: self.rotation.next_clockwise(),
        }
    }

    /// The same instance at a specific rotation
    pub fn with_rotation(&self, rotation: Rotation) -> Self {
        Self {
            definition_id: self.definition_id.clone(),
            rotation,
        }
    }
}

/// Catalog validation failure. Only reachable from a broken setup step,
/// never from in-game action.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    #[error("duplicate tile definition id '{0}'")]
    DuplicateDefinition(String),

    #[error("tile '{0}' declares no segments")]
    NoSegments(String),

    #[error("tile '{tile}' declares segment '{segment}' twice")]
    DuplicateSegment { tile: String, segment: String },

    #[error("tile '{tile}' leaves edge {position:?} unassigned")]
    MissingEdge { tile: String, position: EdgePosition },

    #[error("tile '{tile}' maps edge {position:?} to unknown segment '{segment}'")]
    UnknownEdgeSegment {
        tile: String,
        position: EdgePosition,
        segment: String,
    },

    #[error("tile '{tile}' adjacency references unknown segment '{segment}'")]
    UnknownAdjacencySegment { tile: String, segment: String },

    #[error("tile '{tile}' assigns a cloister segment to an edge")]
    CloisterOnEdge { tile: String },
}

/// Validated, id-indexed tile definitions.
///
/// Backed by a persistent map so the catalog travels inside the game
/// state at O(1) clone cost.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TileCatalog {
    definitions: ImHashMap<String, TileDefinition>,
}

impl TileCatalog {
    /// Validate a definition list and build the catalog
    pub fn build(definitions: Vec<TileDefinition>) -> Result<Self, CatalogError> {
        let mut map = ImHashMap::new();
        for def in definitions {
            Self::validate(&def)?;
            if map.contains_key(&def.id) {
                return Err(CatalogError::DuplicateDefinition(def.id));
            }
            map.insert(def.id.clone(), def);
        }
        Ok(Self { definitions: map })
    }

    fn validate(def: &TileDefinition) -> Result<(), CatalogError> {
        if def.segments.is_empty() {
            return Err(CatalogError::NoSegments(def.id.clone()));
        }
        for (i, segment) in def.segments.iter().enumerate() {
            if def.segments[..i].iter().any(|s| s.id == segment.id) {
                return Err(CatalogError::DuplicateSegment {
                    tile: def.id.clone(),
                    segment: segment.id.clone(),
                });
            }
        }
        for position in EdgePosition::ALL {
            match def.edges.get(&position) {
                None => {
                    return Err(CatalogError::MissingEdge {
                        tile: def.id.clone(),
                        position,
                    })
                }
                Some(segment_id) => match def.segment(segment_id) {
                    None => {
                        return Err(CatalogError::UnknownEdgeSegment {
                            tile: def.id.clone(),
                            position,
                            segment: segment_id.clone(),
                        })
                    }
                    Some(segment) if segment.kind == FeatureKind::Cloister => {
                        return Err(CatalogError::CloisterOnEdge {
                            tile: def.id.clone(),
                        })
                    }
                    Some(_) => {}
                },
            }
        }
        for (a, b) in &def.adjacencies {
            for segment_id in [a, b] {
                if def.segment(segment_id).is_none() {
                    return Err(CatalogError::UnknownAdjacencySegment {
                        tile: def.id.clone(),
                        segment: segment_id.clone(),
                    });
                }
            }
        }
        Ok(())
    }

    /// Look up a definition by id
    pub fn get(&self, id: &str) -> Option<&TileDefinition> {
        self.definitions.get(id)
    }

    /// Number of definitions
    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    /// Whether the catalog is empty
    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }

    /// All definitions, sorted by id for deterministic iteration
    pub fn definitions(&self) -> Vec<&TileDefinition> {
        let mut defs: Vec<&TileDefinition> = self.definitions.values().collect();
        defs.sort_by(|a, b| a.id.cmp(&b.id));
        defs
    }

    /// Total number of physical tiles across all definitions
    pub fn total_tile_count(&self) -> u32 {
        self.definitions.values().map(|d| d.count).sum()
    }

    /// The first definition flagged as starting, in sorted id order
    pub fn starting_definition(&self) -> Option<&TileDefinition> {
        self.definitions().into_iter().find(|d| d.starting)
    }

    /// Every physical tile as an unrotated instance, in sorted id order
    /// (unshuffled; the game constructor shuffles)
    pub fn expand_counts(&self) -> Vec<TileInstance> {
        let mut pile = Vec::with_capacity(self.total_tile_count() as usize);
        for def in self.definitions() {
            for _ in 0..def.count {
                pile.push(TileInstance::new(def.id.clone()));
            }
        }
        pile
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn city_cap_tile() -> TileDefinition {
        // City across the north edge, field everywhere else.
        TileDefinition::new("test_e", 5)
            .with_segment(Segment::city("city0"))
            .with_segment(Segment::field("field0"))
            .with_side(Direction::North, "city0")
            .with_side(Direction::East, "field0")
            .with_side(Direction::South, "field0")
            .with_side(Direction::West, "field0")
            .with_adjacency("field0", "city0")
    }

    #[test]
    fn test_builder_fills_sides() {
        let def = city_cap_tile();
        assert_eq!(def.edges.len(), 12);
        assert_eq!(def.edges[&EdgePosition::NorthCenter], "city0");
        assert_eq!(def.edges[&EdgePosition::SouthLeft], "field0");
    }

    #[test]
    fn test_segment_lookup_unrotated() {
        let def = city_cap_tile();
        let segment = def.segment_at(EdgePosition::NorthCenter, Rotation::R0).unwrap();
        assert_eq!(segment.kind, FeatureKind::City);
        let segment = def.segment_at(EdgePosition::EastCenter, Rotation::R0).unwrap();
        assert_eq!(segment.kind, FeatureKind::Field);
    }

    #[test]
    fn test_segment_lookup_respects_rotation() {
        let def = city_cap_tile();
        // Rotated 90 clockwise, the north city now faces east.
        let segment = def.segment_at(EdgePosition::EastCenter, Rotation::R90).unwrap();
        assert_eq!(segment.kind, FeatureKind::City);
        let segment = def.segment_at(EdgePosition::NorthCenter, Rotation::R90).unwrap();
        assert_eq!(segment.kind, FeatureKind::Field);
        // And 180 puts it on the south side.
        let segment = def.segment_at(EdgePosition::SouthCenter, Rotation::R180).unwrap();
        assert_eq!(segment.kind, FeatureKind::City);
    }

    #[test]
    fn test_physical_positions_rotate() {
        let def = city_cap_tile();
        let mut positions = def.physical_positions("city0", Rotation::R0);
        positions.sort();
        assert_eq!(
            positions,
            vec![
                EdgePosition::NorthLeft,
                EdgePosition::NorthCenter,
                EdgePosition::NorthRight
            ]
        );
        let mut positions = def.physical_positions("city0", Rotation::R90);
        positions.sort();
        assert_eq!(
            positions,
            vec![
                EdgePosition::EastLeft,
                EdgePosition::EastCenter,
                EdgePosition::EastRight
            ]
        );
        assert_eq!(def.physical_positions("field0", Rotation::R0).len(), 9);
    }

    #[test]
    fn test_adjacent_city_segments_filters_kind() {
        let def = TileDefinition::new("test_adj", 1)
            .with_segment(Segment::city("city0"))
            .with_segment(Segment::road("road0"))
            .with_segment(Segment::field("field0"))
            .with_side(Direction::North, "city0")
            .with_side(Direction::East, "field0")
            .with_side(Direction::West, "field0")
            .with_side(Direction::South, "field0")
            .with_edge(EdgePosition::SouthCenter, "road0")
            .with_adjacency("field0", "city0")
            .with_adjacency("field0", "road0");
        assert_eq!(def.adjacent_city_segments("field0"), vec!["city0"]);
        assert!(def.adjacent_city_segments("city0").is_empty());
    }

    #[test]
    fn test_catalog_accepts_valid_set() {
        let catalog = TileCatalog::build(vec![city_cap_tile()]).unwrap();
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.total_tile_count(), 5);
        assert!(catalog.get("test_e").is_some());
        assert!(catalog.get("missing").is_none());
        assert_eq!(catalog.expand_counts().len(), 5);
    }

    #[test]
    fn test_catalog_rejects_missing_edge() {
        let def = TileDefinition::new("bad", 1)
            .with_segment(Segment::field("field0"))
            .with_side(Direction::North, "field0")
            .with_side(Direction::East, "field0")
            .with_side(Direction::South, "field0");
        // West never assigned.
        let err = TileCatalog::build(vec![def]).unwrap_err();
        assert!(matches!(err, CatalogError::MissingEdge { .. }));
    }

    #[test]
    fn test_catalog_rejects_unknown_edge_segment() {
        let def = TileDefinition::new("bad", 1)
            .with_segment(Segment::field("field0"))
            .with_side(Direction::North, "field0")
            .with_side(Direction::East, "field0")
            .with_side(Direction::South, "field0")
            .with_side(Direction::West, "ghost");
        let err = TileCatalog::build(vec![def]).unwrap_err();
        assert_eq!(
            err,
            CatalogError::UnknownEdgeSegment {
                tile: "bad".to_string(),
                position: EdgePosition::WestLeft,
                segment: "ghost".to_string(),
            }
        );
    }

    #[test]
    fn test_catalog_rejects_duplicate_ids() {
        let err = TileCatalog::build(vec![city_cap_tile(), city_cap_tile()]).unwrap_err();
        assert_eq!(err, CatalogError::DuplicateDefinition("test_e".to_string()));

        let def = TileDefinition::new("dupes", 1)
            .with_segment(Segment::field("field0"))
            .with_segment(Segment::field("field0"))
            .with_side(Direction::North, "field0")
            .with_side(Direction::East, "field0")
            .with_side(Direction::South, "field0")
            .with_side(Direction::West, "field0");
        let err = TileCatalog::build(vec![def]).unwrap_err();
        assert!(matches!(err, CatalogError::DuplicateSegment { .. }));
    }

    #[test]
    fn test_catalog_rejects_cloister_on_edge() {
        let def = TileDefinition::new("bad", 1)
            .with_segment(Segment::cloister("cloister0"))
            .with_side(Direction::North, "cloister0")
            .with_side(Direction::East, "cloister0")
            .with_side(Direction::South, "cloister0")
            .with_side(Direction::West, "cloister0");
        let err = TileCatalog::build(vec![def]).unwrap_err();
        assert!(matches!(err, CatalogError::CloisterOnEdge { .. }));
    }

    #[test]
    fn test_catalog_rejects_bad_adjacency() {
        let def = city_cap_tile().with_adjacency("field0", "ghost");
        let err = TileCatalog::build(vec![def]).unwrap_err();
        assert!(matches!(err, CatalogError::UnknownAdjacencySegment { .. }));
    }

    #[test]
    fn test_instance_rotation() {
        let tile = TileInstance::new("test_e");
        assert_eq!(tile.rotation, Rotation::R0);
        let tile = tile.rotated_clockwise().rotated_clockwise();
        assert_eq!(tile.rotation, Rotation::R180);
        assert_eq!(
            tile.rotated_clockwise().rotated_clockwise().rotation,
            Rotation::R0
        );
    }
}
