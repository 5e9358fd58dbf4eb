//! Meeple placement legality.
//!
//! Exclusivity is judged against the live feature, not the tile: once
//! segments merge into one feature, a single token anywhere on it blocks
//! every other member node. Support tokens (builder, pig) ride on features
//! the same player already claimed with a primary token.

use crate::features::FeatureTracker;
use crate::grid::{Board, Coordinate, NodeKey};
use crate::player::{MeepleType, Player};
use crate::tile::{FeatureKind, TileCatalog};

/// Whether a primary token may be placed on the feature containing `node`.
/// A feature that completed this placement is still a legal target; it
/// scores immediately afterwards.
pub fn can_place_meeple(
    tracker: &FeatureTracker,
    player: &Player,
    kind: MeepleType,
    node: &NodeKey,
) -> bool {
    if kind.is_support() {
        return false;
    }
    if player.supply.available(kind) == 0 {
        return false;
    }
    match tracker.feature(node) {
        Some(feature) => !feature.has_meeples(),
        None => false,
    }
}

/// Segment ids on the tile at `coord` whose features can still take a
/// primary token, sorted
pub fn placeable_segments(
    tracker: &FeatureTracker,
    catalog: &TileCatalog,
    board: &Board,
    coord: Coordinate,
) -> Vec<String> {
    let placed = match board.tile_at(coord) {
        Some(tile) => tile,
        None => return Vec::new(),
    };
    let definition = match catalog.get(&placed.definition_id) {
        Some(definition) => definition,
        None => return Vec::new(),
    };
    let mut segments: Vec<String> = definition
        .segments
        .iter()
        .filter(|segment| {
            let node = NodeKey::new(coord, segment.id.clone());
            tracker
                .feature(&node)
                .map(|feature| !feature.has_meeples())
                .unwrap_or(false)
        })
        .map(|segment| segment.id.clone())
        .collect();
    segments.sort();
    segments
}

/// Feature classes a support token may ride on
pub const fn support_classes(kind: MeepleType) -> &'static [FeatureKind] {
    match kind {
        MeepleType::Builder => &[FeatureKind::Road, FeatureKind::City],
        MeepleType::Pig => &[FeatureKind::Field],
        MeepleType::Normal | MeepleType::Big => &[],
    }
}

/// Whether a support token may join the feature containing `node`.
/// Requires a primary token of the same player already on the feature and
/// at most one support token of each kind per player per feature.
pub fn can_place_support(
    tracker: &FeatureTracker,
    player: &Player,
    kind: MeepleType,
    node: &NodeKey,
) -> bool {
    if !kind.is_support() {
        return false;
    }
    if player.supply.available(kind) == 0 {
        return false;
    }
    let feature = match tracker.feature(node) {
        Some(feature) => feature,
        None => return false,
    };
    if !support_classes(kind).contains(&feature.kind) {
        return false;
    }
    let has_own_primary = feature
        .meeples
        .iter()
        .any(|m| m.player == player.id && !m.kind.is_support());
    if !has_own_primary {
        return false;
    }
    let already_supported = feature
        .meeples
        .iter()
        .any(|m| m.player == player.id && m.kind == kind);
    !already_supported
}

/// Every node reachable through a magic portal: members of unoccupied,
/// incomplete features anywhere on the board, sorted
pub fn portal_targets(tracker: &FeatureTracker) -> Vec<NodeKey> {
    let mut targets = Vec::new();
    for feature in tracker.all_features() {
        if feature.is_complete || feature.has_meeples() {
            continue;
        }
        targets.extend(feature.nodes.iter().cloned());
    }
    targets.sort();
    targets
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::{Board, Direction, EdgePosition, PlacedTile, Rotation};
    use crate::player::MeeplePlacement;
    use crate::tile::{Segment, TileDefinition};
    use pretty_assertions::assert_eq;

    fn catalog() -> TileCatalog {
        let cap = TileDefinition::new("cap", 1)
            .with_segment(Segment::city("city0"))
            .with_segment(Segment::field("field0"))
            .with_side(Direction::North, "city0")
            .with_side(Direction::East, "field0")
            .with_side(Direction::South, "field0")
            .with_side(Direction::West, "field0");
        let straight = TileDefinition::new("straight", 1)
            .with_segment(Segment::road("road0"))
            .with_segment(Segment::field("field0"))
            .with_segment(Segment::field("field1"))
            .with_side(Direction::West, "field0")
            .with_side(Direction::East, "field1")
            .with_edge(EdgePosition::NorthLeft, "field0")
            .with_edge(EdgePosition::NorthCenter, "road0")
            .with_edge(EdgePosition::NorthRight, "field1")
            .with_edge(EdgePosition::SouthLeft, "field1")
            .with_edge(EdgePosition::SouthCenter, "road0")
            .with_edge(EdgePosition::SouthRight, "field0");
        TileCatalog::build(vec![cap, straight]).expect("test catalog should validate")
    }

    fn place(
        board: &mut Board,
        tracker: &mut FeatureTracker,
        catalog: &TileCatalog,
        id: &str,
        x: i32,
        y: i32,
        rotation: Rotation,
    ) {
        let placed = PlacedTile::new(Coordinate::new(x, y), id, rotation);
        board.place(placed.clone());
        tracker.add_tile(board, catalog, &placed);
    }

    #[test]
    fn test_primary_placement_needs_supply() {
        let catalog = catalog();
        let mut board = Board::new();
        let mut tracker = FeatureTracker::new();
        place(&mut board, &mut tracker, &catalog, "cap", 0, 0, Rotation::R0);

        let node = NodeKey::new(Coordinate::new(0, 0), "city0");
        let mut player = Player::new(0, "Ana");
        assert!(can_place_meeple(&tracker, &player, MeepleType::Normal, &node));
        assert!(
            !can_place_meeple(&tracker, &player, MeepleType::Big, &node),
            "no big meeple in the base supply"
        );
        assert!(
            !can_place_meeple(&tracker, &player, MeepleType::Builder, &node),
            "support tokens never go through primary placement"
        );
        player.supply.normal = 0;
        assert!(!can_place_meeple(&tracker, &player, MeepleType::Normal, &node));
    }

    #[test]
    fn test_occupied_feature_blocks_placement() {
        let catalog = catalog();
        let mut board = Board::new();
        let mut tracker = FeatureTracker::new();
        place(&mut board, &mut tracker, &catalog, "cap", 0, 0, Rotation::R0);

        let node = NodeKey::new(Coordinate::new(0, 0), "city0");
        tracker.add_meeple(
            &node,
            MeeplePlacement::new(1, MeepleType::Normal, Coordinate::new(0, 0), "city0"),
        );
        let player = Player::new(0, "Ana");
        assert!(!can_place_meeple(&tracker, &player, MeepleType::Normal, &node));
    }

    #[test]
    fn test_exclusivity_spans_merged_features() {
        let catalog = catalog();
        let mut board = Board::new();
        let mut tracker = FeatureTracker::new();
        place(
            &mut board,
            &mut tracker,
            &catalog,
            "straight",
            0,
            0,
            Rotation::R0,
        );
        tracker.add_meeple(
            &NodeKey::new(Coordinate::new(0, 0), "road0"),
            MeeplePlacement::new(1, MeepleType::Normal, Coordinate::new(0, 0), "road0"),
        );
        place(
            &mut board,
            &mut tracker,
            &catalog,
            "straight",
            0,
            1,
            Rotation::R0,
        );

        // The new tile's road segment now belongs to the claimed feature.
        let player = Player::new(0, "Ana");
        let far_node = NodeKey::new(Coordinate::new(0, 1), "road0");
        assert!(!can_place_meeple(
            &tracker,
            &player,
            MeepleType::Normal,
            &far_node
        ));
    }

    #[test]
    fn test_placeable_segments_skip_occupied() {
        let catalog = catalog();
        let mut board = Board::new();
        let mut tracker = FeatureTracker::new();
        place(
            &mut board,
            &mut tracker,
            &catalog,
            "straight",
            0,
            0,
            Rotation::R0,
        );
        tracker.add_meeple(
            &NodeKey::new(Coordinate::new(0, 0), "road0"),
            MeeplePlacement::new(0, MeepleType::Normal, Coordinate::new(0, 0), "road0"),
        );
        place(
            &mut board,
            &mut tracker,
            &catalog,
            "straight",
            0,
            1,
            Rotation::R0,
        );

        let segments = placeable_segments(&tracker, &catalog, &board, Coordinate::new(0, 1));
        assert_eq!(segments, vec!["field0".to_string(), "field1".to_string()]);
        assert!(
            placeable_segments(&tracker, &catalog, &board, Coordinate::new(5, 5)).is_empty(),
            "no tile, no targets"
        );
    }

    #[test]
    fn test_builder_requires_own_primary() {
        let catalog = catalog();
        let mut board = Board::new();
        let mut tracker = FeatureTracker::new();
        place(
            &mut board,
            &mut tracker,
            &catalog,
            "straight",
            0,
            0,
            Rotation::R0,
        );
        let road = NodeKey::new(Coordinate::new(0, 0), "road0");
        let field = NodeKey::new(Coordinate::new(0, 0), "field0");

        let mut player = Player::new(0, "Ana");
        player.supply.builder = 1;
        player.supply.pig = 1;
        assert!(
            !can_place_support(&tracker, &player, MeepleType::Builder, &road),
            "no primary token on the road yet"
        );

        tracker.add_meeple(
            &road,
            MeeplePlacement::new(0, MeepleType::Normal, Coordinate::new(0, 0), "road0"),
        );
        assert!(can_place_support(&tracker, &player, MeepleType::Builder, &road));
        assert!(
            !can_place_support(&tracker, &player, MeepleType::Pig, &road),
            "pigs only join fields"
        );
        assert!(
            !can_place_support(&tracker, &player, MeepleType::Builder, &field),
            "builders only join roads and cities"
        );

        // Another player's primary does not qualify.
        let mut rival = Player::new(1, "Ben");
        rival.supply.builder = 1;
        assert!(!can_place_support(&tracker, &rival, MeepleType::Builder, &road));

        // One builder per player per feature.
        tracker.add_meeple(
            &road,
            MeeplePlacement::new(0, MeepleType::Builder, Coordinate::new(0, 0), "road0"),
        );
        assert!(!can_place_support(&tracker, &player, MeepleType::Builder, &road));
    }

    #[test]
    fn test_pig_joins_own_field() {
        let catalog = catalog();
        let mut board = Board::new();
        let mut tracker = FeatureTracker::new();
        place(
            &mut board,
            &mut tracker,
            &catalog,
            "straight",
            0,
            0,
            Rotation::R0,
        );
        let field = NodeKey::new(Coordinate::new(0, 0), "field0");
        let mut player = Player::new(0, "Ana");
        player.supply.pig = 1;
        tracker.add_meeple(
            &field,
            MeeplePlacement::new(0, MeepleType::Normal, Coordinate::new(0, 0), "field0"),
        );
        assert!(can_place_support(&tracker, &player, MeepleType::Pig, &field));
        player.supply.pig = 0;
        assert!(!can_place_support(&tracker, &player, MeepleType::Pig, &field));
    }

    #[test]
    fn test_portal_targets_exclude_complete_and_occupied() {
        let catalog = catalog();
        let mut board = Board::new();
        let mut tracker = FeatureTracker::new();
        place(&mut board, &mut tracker, &catalog, "cap", 0, 0, Rotation::R0);
        place(
            &mut board,
            &mut tracker,
            &catalog,
            "cap",
            0,
            -1,
            Rotation::R180,
        );
        place(
            &mut board,
            &mut tracker,
            &catalog,
            "straight",
            0,
            1,
            Rotation::R90,
        );
        tracker.add_meeple(
            &NodeKey::new(Coordinate::new(0, 1), "road0"),
            MeeplePlacement::new(0, MeepleType::Normal, Coordinate::new(0, 1), "road0"),
        );

        let targets = portal_targets(&tracker);
        let closed_city = NodeKey::new(Coordinate::new(0, 0), "city0");
        let claimed_road = NodeKey::new(Coordinate::new(0, 1), "road0");
        assert!(!targets.contains(&closed_city), "completed city is closed");
        assert!(!targets.contains(&claimed_road), "claimed road is closed");
        assert!(
            targets.contains(&NodeKey::new(Coordinate::new(0, 0), "field0")),
            "open fields stay reachable"
        );
    }
}
