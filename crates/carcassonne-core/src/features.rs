//! Incremental feature tracking across tile placements.
//!
//! Every road, city, cloister and field segment on a placed tile becomes a
//! node in a union-find forest. Placing a tile seeds singleton features for
//! its segments, then unions them with matching neighbor segments across
//! each shared edge. Each root carries the aggregate for its whole feature:
//! member nodes, tokens, tile and pennant counts, open edges, adjacent
//! cities and an open metadata bag.
//!
//! Completion is tracked by open-edge accounting: a fresh segment opens one
//! edge per physical edge sub-position it occupies, and every connection
//! (including one that closes a loop inside an existing feature) consumes
//! two. Roads and cities are complete at zero open edges. Cloisters complete
//! by surround count and never merge. Fields never complete.

use crate::grid::{Board, Coordinate, Direction, EdgePosition, NodeKey, PlacedTile};
use crate::player::MeeplePlacement;
use crate::tile::{FeatureKind, TileCatalog};
use im::HashMap as ImHashMap;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Metadata key set by an inn segment (Inns & Cathedrals)
pub const META_INN: &str = "inn";
/// Metadata key set by a cathedral segment (Inns & Cathedrals)
pub const META_CATHEDRAL: &str = "cathedral";

/// One value in a feature's metadata bag
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum MetaValue {
    /// Boolean marker, ORed across merges
    Flag(bool),
    /// Counter, summed across merges
    Count(u32),
    /// Free-form text, last write wins on merge
    Text(String),
}

/// Open key-value bag attached to a feature.
///
/// Expansions drop markers here (inn, cathedral, commodity counts) without
/// the tracker knowing what they mean. Merging two bags ORs flags, sums
/// counts and lets the incoming value win on any other combination.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct FeatureMetadata {
    entries: BTreeMap<String, MetaValue>,
}

impl FeatureMetadata {
    /// Empty bag
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the bag holds no entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// True when the key holds `Flag(true)`
    pub fn flag(&self, key: &str) -> bool {
        matches!(self.entries.get(key), Some(MetaValue::Flag(true)))
    }

    /// Counter value for the key, zero when absent
    pub fn count(&self, key: &str) -> u32 {
        match self.entries.get(key) {
            Some(MetaValue::Count(n)) => *n,
            _ => 0,
        }
    }

    /// Set a boolean marker
    pub fn set_flag(&mut self, key: &str) {
        self.entries.insert(key.to_string(), MetaValue::Flag(true));
    }

    /// Add to a counter, creating it at zero first
    pub fn add_count(&mut self, key: &str, amount: u32) {
        let current = self.count(key);
        self.entries
            .insert(key.to_string(), MetaValue::Count(current + amount));
    }

    /// Set a text entry
    pub fn set_text(&mut self, key: &str, value: impl Into<String>) {
        self.entries
            .insert(key.to_string(), MetaValue::Text(value.into()));
    }

    /// Fold another bag into this one
    pub fn merge_from(&mut self, other: &FeatureMetadata) {
        for (key, theirs) in &other.entries {
            let merged = match (self.entries.get(key), theirs) {
                (Some(MetaValue::Flag(a)), MetaValue::Flag(b)) => MetaValue::Flag(*a || *b),
                (Some(MetaValue::Count(a)), MetaValue::Count(b)) => MetaValue::Count(a + b),
                _ => theirs.clone(),
            };
            self.entries.insert(key.clone(), merged);
        }
    }
}

/// One connected feature, stored at its union-find root
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feature {
    /// Root node key, stable for the life of the root
    pub id: NodeKey,
    /// Feature class
    pub kind: FeatureKind,
    /// Every member node
    pub nodes: Vec<NodeKey>,
    /// Tokens standing on the feature
    pub meeples: Vec<MeeplePlacement>,
    /// Whether the feature is finished
    pub is_complete: bool,
    /// Distinct tiles the feature spans
    pub tile_count: u32,
    /// Pennants across member city segments
    pub pennant_count: u32,
    /// Unconnected edge sub-positions remaining
    pub open_edge_count: u32,
    /// City nodes recorded adjacent to this field at placement time.
    /// Entries may be stale non-roots after city merges; resolve through
    /// the tracker before counting.
    pub touching_city_ids: BTreeSet<NodeKey>,
    /// Expansion markers
    pub metadata: FeatureMetadata,
}

impl Feature {
    /// Distinct coordinates of member nodes, sorted
    pub fn coordinates(&self) -> Vec<Coordinate> {
        let set: BTreeSet<Coordinate> = self.nodes.iter().map(|n| n.coord).collect();
        set.into_iter().collect()
    }

    /// Whether any token stands on the feature
    pub fn has_meeples(&self) -> bool {
        !self.meeples.is_empty()
    }

    fn distinct_tile_count(&self) -> u32 {
        let set: BTreeSet<Coordinate> = self.nodes.iter().map(|n| n.coord).collect();
        set.len() as u32
    }

    fn recompute_completion(&mut self) {
        // Cloister completion is driven by surround counts elsewhere;
        // fields never complete.
        if self.kind.completes_by_edges() {
            self.is_complete = self.open_edge_count == 0;
        }
    }
}

/// Union-find forest over feature nodes with per-root aggregates.
///
/// All maps are persistent, so cloning a tracker is cheap and a clone is
/// fully isolated from later placements on the original.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct FeatureTracker {
    parent: ImHashMap<NodeKey, NodeKey>,
    rank: ImHashMap<NodeKey, u32>,
    features: ImHashMap<NodeKey, Feature>,
}

impl FeatureTracker {
    /// Empty tracker
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of nodes registered
    pub fn node_count(&self) -> usize {
        self.parent.len()
    }

    /// Number of live features
    pub fn feature_count(&self) -> usize {
        self.features.len()
    }

    /// Whether the node is registered
    pub fn contains(&self, key: &NodeKey) -> bool {
        self.parent.contains_key(key)
    }

    /// Whether the node is its own root
    pub fn is_root(&self, key: &NodeKey) -> bool {
        self.parent.get(key) == Some(key)
    }

    /// All registered node keys, sorted
    pub fn node_keys(&self) -> Vec<NodeKey> {
        let mut keys: Vec<NodeKey> = self.parent.keys().cloned().collect();
        keys.sort();
        keys
    }

    /// Resolve a node to its root without mutating the forest, so shared
    /// snapshots stay untouched by queries.
    pub fn root_of(&self, key: &NodeKey) -> Option<NodeKey> {
        if !self.parent.contains_key(key) {
            return None;
        }
        let mut current = key.clone();
        loop {
            let parent = self.parent.get(&current)?;
            if *parent == current {
                return Some(current);
            }
            current = parent.clone();
        }
    }

    /// The feature containing a node
    pub fn feature(&self, key: &NodeKey) -> Option<&Feature> {
        let root = self.root_of(key)?;
        self.features.get(&root)
    }

    /// The feature stored at a root key
    pub fn feature_by_root(&self, root: &NodeKey) -> Option<&Feature> {
        self.features.get(root)
    }

    /// Every live feature, sorted by root key
    pub fn all_features(&self) -> Vec<&Feature> {
        let mut features: Vec<&Feature> = self.features.values().collect();
        features.sort_by(|a, b| a.id.cmp(&b.id));
        features
    }

    /// Whether the feature containing the node already holds any token
    pub fn has_meeples(&self, key: &NodeKey) -> bool {
        self.feature(key).map(Feature::has_meeples).unwrap_or(false)
    }

    /// Register a token on the feature containing the node
    pub fn add_meeple(&mut self, node: &NodeKey, placement: MeeplePlacement) -> bool {
        let root = match self.root_of(node) {
            Some(root) => root,
            None => return false,
        };
        let mut feature = match self.features.get(&root) {
            Some(feature) => feature.clone(),
            None => return false,
        };
        feature.meeples.push(placement);
        self.features.insert(root, feature);
        true
    }

    /// Remove tokens matching a predicate from the feature containing the
    /// node, returning what was removed
    pub fn remove_meeples<F>(&mut self, node: &NodeKey, predicate: F) -> Vec<MeeplePlacement>
    where
        F: Fn(&MeeplePlacement) -> bool,
    {
        let root = match self.root_of(node) {
            Some(root) => root,
            None => return Vec::new(),
        };
        let mut feature = match self.features.get(&root) {
            Some(feature) => feature.clone(),
            None => return Vec::new(),
        };
        let mut removed = Vec::new();
        feature.meeples.retain(|placement| {
            if predicate(placement) {
                removed.push(placement.clone());
                false
            } else {
                true
            }
        });
        if !removed.is_empty() {
            self.features.insert(root, feature);
        }
        removed
    }

    /// Remove every token from the feature containing the node
    pub fn take_meeples(&mut self, node: &NodeKey) -> Vec<MeeplePlacement> {
        self.remove_meeples(node, |_| true)
    }

    /// Drop city references on a field once a city has been paid out, so a
    /// later sweep cannot count it again.
    pub fn consume_touching_city(&mut self, field_node: &NodeKey, city_root: &NodeKey) {
        let root = match self.root_of(field_node) {
            Some(root) => root,
            None => return,
        };
        let mut feature = match self.features.get(&root) {
            Some(feature) => feature.clone(),
            None => return,
        };
        let before = feature.touching_city_ids.len();
        let resolved_target = Some(city_root.clone());
        feature
            .touching_city_ids
            .retain(|id| self.root_of(id) != resolved_target);
        if feature.touching_city_ids.len() != before {
            self.features.insert(root, feature);
        }
    }

    /// Fold a newly placed tile into the forest.
    ///
    /// The board must already contain the tile. Returns the roots of
    /// features this placement completed, deduplicated and resolved after
    /// all unions have settled.
    pub fn add_tile(
        &mut self,
        board: &Board,
        catalog: &TileCatalog,
        placed: &PlacedTile,
    ) -> Vec<NodeKey> {
        let definition = match catalog.get(&placed.definition_id) {
            Some(definition) => definition,
            None => return Vec::new(),
        };
        let coord = placed.coord;
        let mut flipped: Vec<NodeKey> = Vec::new();

        // Seed a singleton feature per non-cloister segment.
        for segment in &definition.segments {
            if segment.kind == FeatureKind::Cloister {
                continue;
            }
            let node = NodeKey::new(coord, segment.id.clone());
            let open = definition.physical_positions(&segment.id, placed.rotation);
            let mut metadata = FeatureMetadata::new();
            if segment.inn {
                metadata.set_flag(META_INN);
            }
            if segment.cathedral {
                metadata.set_flag(META_CATHEDRAL);
            }
            if let Some(commodity) = segment.commodity {
                metadata.add_count(commodity.key(), 1);
            }
            let mut touching_city_ids = BTreeSet::new();
            if segment.kind == FeatureKind::Field {
                for city_id in definition.adjacent_city_segments(&segment.id) {
                    touching_city_ids.insert(NodeKey::new(coord, city_id));
                }
            }
            let feature = Feature {
                id: node.clone(),
                kind: segment.kind,
                nodes: vec![node.clone()],
                meeples: Vec::new(),
                is_complete: false,
                tile_count: 1,
                pennant_count: u32::from(segment.pennant),
                open_edge_count: open.len() as u32,
                touching_city_ids,
                metadata,
            };
            self.parent.insert(node.clone(), node.clone());
            self.rank.insert(node.clone(), 0);
            self.features.insert(node, feature);
        }

        // Union with matching neighbor segments across each shared edge.
        // Each of the three sub-positions per side connects independently.
        for direction in Direction::ALL {
            let neighbor_coord = coord.neighbor(direction);
            let neighbor = match board.tile_at(neighbor_coord) {
                Some(tile) => tile,
                None => continue,
            };
            let neighbor_def = match catalog.get(&neighbor.definition_id) {
                Some(definition) => definition,
                None => continue,
            };
            for position in EdgePosition::on_side(direction) {
                let mine = match definition.segment_at(position, placed.rotation) {
                    Some(segment) => segment,
                    None => continue,
                };
                let theirs =
                    match neighbor_def.segment_at(position.mirrored(), neighbor.rotation) {
                        Some(segment) => segment,
                        None => continue,
                    };
                // Only like classes merge, and cloisters never join edges.
                if mine.kind != theirs.kind || mine.kind == FeatureKind::Cloister {
                    continue;
                }
                let a = NodeKey::new(coord, mine.id.clone());
                let b = NodeKey::new(neighbor_coord, theirs.id.clone());
                if let Some(root) = self.union(&a, &b) {
                    flipped.push(root);
                }
            }
        }

        // Surround counts shift for every cloister within one tile.
        flipped.extend(self.refresh_cloisters_around(board, catalog, coord));

        // Report each completed feature once, at its final root.
        let mut seen = BTreeSet::new();
        let mut completed = Vec::new();
        for key in flipped {
            if let Some(root) = self.root_of(&key) {
                let is_complete = self
                    .features
                    .get(&root)
                    .map(|f| f.is_complete)
                    .unwrap_or(false);
                if is_complete && seen.insert(root.clone()) {
                    completed.push(root);
                }
            }
        }
        completed
    }

    /// Mutating find used only on the placement path
    fn find_compress(&mut self, key: &NodeKey) -> Option<NodeKey> {
        let root = self.root_of(key)?;
        let mut current = key.clone();
        while current != root {
            let next = self.parent.get(&current)?.clone();
            self.parent.insert(current, root.clone());
            current = next;
        }
        Some(root)
    }

    /// Connect two nodes, consuming one open edge from each side.
    /// Returns the root whose feature flipped to complete, if any.
    fn union(&mut self, a: &NodeKey, b: &NodeKey) -> Option<NodeKey> {
        let root_a = self.find_compress(a)?;
        let root_b = self.find_compress(b)?;

        if root_a == root_b {
            // The connection closes a loop inside one feature; both open
            // edges belong to it already.
            let mut feature = self.features.get(&root_a)?.clone();
            let was_complete = feature.is_complete;
            feature.open_edge_count = feature.open_edge_count.saturating_sub(2);
            feature.recompute_completion();
            let completed = !was_complete && feature.is_complete;
            self.features.insert(root_a.clone(), feature);
            return completed.then_some(root_a);
        }

        let rank_a = self.rank.get(&root_a).copied().unwrap_or(0);
        let rank_b = self.rank.get(&root_b).copied().unwrap_or(0);
        let (winner, loser) = if rank_a < rank_b {
            (root_b, root_a)
        } else {
            (root_a, root_b)
        };

        let winning = self.features.get(&winner)?.clone();
        let losing = self.features.remove(&loser)?;
        if rank_a == rank_b {
            self.rank.insert(winner.clone(), rank_a + 1);
        }
        self.parent.insert(loser, winner.clone());

        let was_complete = winning.is_complete || losing.is_complete;
        let mut merged = winning;
        merged.nodes.extend(losing.nodes);
        merged.meeples.extend(losing.meeples);
        merged.pennant_count += losing.pennant_count;
        merged.open_edge_count =
            (merged.open_edge_count + losing.open_edge_count).saturating_sub(2);
        merged
            .touching_city_ids
            .extend(losing.touching_city_ids.into_iter());
        merged.metadata.merge_from(&losing.metadata);
        merged.tile_count = merged.distinct_tile_count();
        merged.recompute_completion();
        let completed = !was_complete && merged.is_complete;
        self.features.insert(winner.clone(), merged);
        completed.then_some(winner)
    }

    /// Recompute surround-driven state for cloisters within one tile of a
    /// placement, creating their nodes on first touch.
    fn refresh_cloisters_around(
        &mut self,
        board: &Board,
        catalog: &TileCatalog,
        center: Coordinate,
    ) -> Vec<NodeKey> {
        let mut completed = Vec::new();
        let mut cells: Vec<Coordinate> = center.surrounding().to_vec();
        cells.push(center);
        for cell in cells {
            let placed = match board.tile_at(cell) {
                Some(tile) => tile,
                None => continue,
            };
            let definition = match catalog.get(&placed.definition_id) {
                Some(definition) => definition,
                None => continue,
            };
            let segment = match definition.cloister_segment() {
                Some(segment) => segment,
                None => continue,
            };
            let node = NodeKey::new(cell, segment.id.clone());
            if !self.parent.contains_key(&node) {
                self.parent.insert(node.clone(), node.clone());
                self.rank.insert(node.clone(), 0);
                self.features.insert(
                    node.clone(),
                    Feature {
                        id: node.clone(),
                        kind: FeatureKind::Cloister,
                        nodes: vec![node.clone()],
                        meeples: Vec::new(),
                        is_complete: false,
                        tile_count: 1,
                        pennant_count: 0,
                        open_edge_count: 8,
                        touching_city_ids: BTreeSet::new(),
                        metadata: FeatureMetadata::new(),
                    },
                );
            }
            let mut feature = match self.features.get(&node) {
                Some(feature) => feature.clone(),
                None => continue,
            };
            let surround = board.surrounding_count(cell);
            let was_complete = feature.is_complete;
            feature.tile_count = surround + 1;
            feature.open_edge_count = 8 - surround.min(8);
            feature.is_complete = surround >= 8;
            let flipped = !was_complete && feature.is_complete;
            self.features.insert(node.clone(), feature);
            if flipped {
                completed.push(node);
            }
        }
        completed
    }
}
