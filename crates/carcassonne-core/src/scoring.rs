//! Scoring: point values per feature class, majority resolution, and
//! score events.
//!
//! Values live in a `ScoringProfile`, plain data a game config can
//! override. Inn and cathedral markers on a feature shift its value,
//! including down to zero for incomplete features. Fields pay per adjacent
//! completed city, at a higher rate for a holder whose pig stands on the
//! field. Everyone tied at the maximum majority weight scores the full
//! value.

use crate::features::{Feature, FeatureTracker, META_CATHEDRAL, META_INN};
use crate::grid::{Coordinate, NodeKey};
use crate::player::{MeepleType, Player, PlayerId};
use crate::tile::{Commodity, FeatureKind};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Point values used by the engine, overridable per game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoringProfile {
    /// Per tile of a road, complete or not
    pub road_per_tile: u32,
    /// Per tile of a completed city
    pub city_per_tile: u32,
    /// Per pennant in a completed city
    pub city_per_pennant: u32,
    /// Per tile of an incomplete city at game end
    pub incomplete_city_per_tile: u32,
    /// Per pennant in an incomplete city at game end
    pub incomplete_city_per_pennant: u32,
    /// A completed cloister (the tile itself plus its eight neighbors)
    pub cloister_complete: u32,
    /// Per adjacent completed city for a field
    pub field_per_city: u32,
    /// Per adjacent completed city when the holder's pig is on the field
    pub field_per_city_with_pig: u32,
    /// Per tile of a completed road carrying an inn
    pub inn_road_per_tile: u32,
    /// Per tile of a completed city holding a cathedral
    pub cathedral_city_per_tile: u32,
    /// Per pennant in a completed city holding a cathedral
    pub cathedral_city_per_pennant: u32,
    /// End-game bonus per commodity type a player holds the most of
    pub trade_bonus: u32,
}

impl Default for ScoringProfile {
    fn default() -> Self {
        Self {
            road_per_tile: 1,
            city_per_tile: 2,
            city_per_pennant: 2,
            incomplete_city_per_tile: 1,
            incomplete_city_per_pennant: 1,
            cloister_complete: 9,
            field_per_city: 3,
            field_per_city_with_pig: 4,
            inn_road_per_tile: 2,
            cathedral_city_per_tile: 3,
            cathedral_city_per_pennant: 3,
            trade_bonus: 10,
        }
    }
}

impl ScoringProfile {
    /// Points a road is worth right now. An inn road pays double when
    /// complete and nothing otherwise.
    pub fn road_value(&self, feature: &Feature) -> u32 {
        let inn = feature.metadata.flag(META_INN);
        if feature.is_complete {
            let rate = if inn {
                self.inn_road_per_tile
            } else {
                self.road_per_tile
            };
            rate * feature.tile_count
        } else if inn {
            0
        } else {
            self.road_per_tile * feature.tile_count
        }
    }

    /// Points a city is worth right now. A cathedral raises the completed
    /// rate and zeroes the incomplete one.
    pub fn city_value(&self, feature: &Feature) -> u32 {
        let cathedral = feature.metadata.flag(META_CATHEDRAL);
        if feature.is_complete {
            let (per_tile, per_pennant) = if cathedral {
                (self.cathedral_city_per_tile, self.cathedral_city_per_pennant)
            } else {
                (self.city_per_tile, self.city_per_pennant)
            };
            per_tile * feature.tile_count + per_pennant * feature.pennant_count
        } else if cathedral {
            0
        } else {
            self.incomplete_city_per_tile * feature.tile_count
                + self.incomplete_city_per_pennant * feature.pennant_count
        }
    }

    /// Points a cloister is worth right now
    pub fn cloister_value(&self, feature: &Feature) -> u32 {
        if feature.is_complete {
            self.cloister_complete
        } else {
            feature.tile_count
        }
    }

    /// Points a field pays one holder, given the adjacent completed city
    /// count and whether that holder's pig stands on the field
    pub fn field_value(&self, completed_cities: u32, pig: bool) -> u32 {
        let rate = if pig {
            self.field_per_city_with_pig
        } else {
            self.field_per_city
        };
        rate * completed_cities
    }
}

/// One scoring payout
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreEvent {
    /// Root of the scored feature
    pub feature_id: NodeKey,
    /// Feature class
    pub kind: FeatureKind,
    /// Points per player; never empty, never all zero
    pub scores: BTreeMap<PlayerId, u32>,
    /// Tiles the feature spans, sorted
    pub tiles: Vec<Coordinate>,
    /// Whether the payout came from the end-of-game sweep
    pub end_game: bool,
}

impl ScoreEvent {
    /// Points this event pays one player
    pub fn points_for(&self, player: PlayerId) -> u32 {
        self.scores.get(&player).copied().unwrap_or(0)
    }
}

/// Players tied at the maximum majority weight on a feature. Empty when no
/// token carries weight.
pub fn majority_holders(feature: &Feature) -> Vec<PlayerId> {
    let mut weights: BTreeMap<PlayerId, u32> = BTreeMap::new();
    for placement in &feature.meeples {
        *weights.entry(placement.player).or_insert(0) += placement.kind.majority_weight();
    }
    let max = weights.values().copied().max().unwrap_or(0);
    if max == 0 {
        return Vec::new();
    }
    weights
        .into_iter()
        .filter(|(_, weight)| *weight == max)
        .map(|(player, _)| player)
        .collect()
}

/// Roots of completed cities recorded adjacent to a field, resolved
/// through the tracker so merged cities count once
pub fn completed_adjacent_cities(tracker: &FeatureTracker, field: &Feature) -> Vec<NodeKey> {
    let mut roots = BTreeSet::new();
    for id in &field.touching_city_ids {
        if let Some(root) = tracker.root_of(id) {
            if let Some(city) = tracker.feature_by_root(&root) {
                if city.kind == FeatureKind::City && city.is_complete {
                    roots.insert(root);
                }
            }
        }
    }
    roots.into_iter().collect()
}

/// Score one feature for its majority holders. None when nobody holds
/// majority or the payout would be zero.
pub fn score_feature(
    profile: &ScoringProfile,
    tracker: &FeatureTracker,
    feature: &Feature,
    end_game: bool,
) -> Option<ScoreEvent> {
    let holders = majority_holders(feature);
    if holders.is_empty() {
        return None;
    }
    let mut scores = BTreeMap::new();
    match feature.kind {
        FeatureKind::Road | FeatureKind::City | FeatureKind::Cloister => {
            let value = match feature.kind {
                FeatureKind::Road => profile.road_value(feature),
                FeatureKind::City => profile.city_value(feature),
                _ => profile.cloister_value(feature),
            };
            if value == 0 {
                return None;
            }
            for player in holders {
                scores.insert(player, value);
            }
        }
        FeatureKind::Field => {
            let cities = completed_adjacent_cities(tracker, feature).len() as u32;
            if cities == 0 {
                return None;
            }
            for player in holders {
                let pig = feature
                    .meeples
                    .iter()
                    .any(|m| m.player == player && m.kind == MeepleType::Pig);
                scores.insert(player, profile.field_value(cities, pig));
            }
        }
    }
    Some(ScoreEvent {
        feature_id: feature.id.clone(),
        kind: feature.kind,
        scores,
        tiles: feature.coordinates(),
        end_game,
    })
}

/// Score every claimed feature for the end-of-game sweep, skipping roots
/// already paid during play, in root order
pub fn end_game_sweep(
    profile: &ScoringProfile,
    tracker: &FeatureTracker,
    skip: &BTreeSet<NodeKey>,
) -> Vec<ScoreEvent> {
    let mut events = Vec::new();
    for feature in tracker.all_features() {
        if skip.contains(&feature.id) || !feature.has_meeples() {
            continue;
        }
        if let Some(event) = score_feature(profile, tracker, feature, true) {
            events.push(event);
        }
    }
    events
}

/// End-game commodity bonuses: for each commodity, every player tied at
/// the maximum held count earns the trade bonus
pub fn commodity_bonuses(profile: &ScoringProfile, players: &[Player]) -> BTreeMap<PlayerId, u32> {
    let mut bonuses = BTreeMap::new();
    for commodity in Commodity::ALL {
        let max = players
            .iter()
            .map(|p| p.commodities.count(commodity))
            .max()
            .unwrap_or(0);
        if max == 0 {
            continue;
        }
        for player in players {
            if player.commodities.count(commodity) == max {
                *bonuses.entry(player.id).or_insert(0) += profile.trade_bonus;
            }
        }
    }
    bonuses
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::FeatureMetadata;
    use crate::grid::{Board, Direction, PlacedTile, Rotation};
    use crate::player::MeeplePlacement;
    use crate::tile::{Segment, TileCatalog, TileDefinition};
    use pretty_assertions::assert_eq;

    fn bare_feature(kind: FeatureKind, tiles: u32, pennants: u32, complete: bool) -> Feature {
        Feature {
            id: NodeKey::new(Coordinate::new(0, 0), "seg0"),
            kind,
            nodes: Vec::new(),
            meeples: Vec::new(),
            is_complete: complete,
            tile_count: tiles,
            pennant_count: pennants,
            open_edge_count: 0,
            touching_city_ids: BTreeSet::new(),
            metadata: FeatureMetadata::new(),
        }
    }

    fn token(player: PlayerId, kind: MeepleType) -> MeeplePlacement {
        MeeplePlacement::new(player, kind, Coordinate::new(0, 0), "seg0")
    }

    #[test]
    fn test_city_values() {
        let profile = ScoringProfile::default();
        let complete = bare_feature(FeatureKind::City, 3, 1, true);
        assert_eq!(profile.city_value(&complete), 8, "(3 tiles + 1 pennant) * 2");
        let incomplete = bare_feature(FeatureKind::City, 3, 1, false);
        assert_eq!(profile.city_value(&incomplete), 4);
    }

    #[test]
    fn test_cathedral_city_values() {
        let profile = ScoringProfile::default();
        let mut complete = bare_feature(FeatureKind::City, 3, 0, true);
        complete.metadata.set_flag(META_CATHEDRAL);
        assert_eq!(profile.city_value(&complete), 9, "3 per tile with a cathedral");
        let mut incomplete = bare_feature(FeatureKind::City, 3, 0, false);
        incomplete.metadata.set_flag(META_CATHEDRAL);
        assert_eq!(
            profile.city_value(&incomplete),
            0,
            "an unfinished cathedral city pays nothing"
        );
    }

    #[test]
    fn test_road_values() {
        let profile = ScoringProfile::default();
        assert_eq!(
            profile.road_value(&bare_feature(FeatureKind::Road, 5, 0, true)),
            5
        );
        assert_eq!(
            profile.road_value(&bare_feature(FeatureKind::Road, 3, 0, false)),
            3
        );
        let mut inn = bare_feature(FeatureKind::Road, 4, 0, true);
        inn.metadata.set_flag(META_INN);
        assert_eq!(profile.road_value(&inn), 8, "inn doubles a finished road");
        let mut unfinished = bare_feature(FeatureKind::Road, 4, 0, false);
        unfinished.metadata.set_flag(META_INN);
        assert_eq!(profile.road_value(&unfinished), 0);
    }

    #[test]
    fn test_cloister_values() {
        let profile = ScoringProfile::default();
        assert_eq!(
            profile.cloister_value(&bare_feature(FeatureKind::Cloister, 9, 0, true)),
            9
        );
        assert_eq!(
            profile.cloister_value(&bare_feature(FeatureKind::Cloister, 5, 0, false)),
            5
        );
    }

    #[test]
    fn test_majority_weights_and_ties() {
        let mut feature = bare_feature(FeatureKind::City, 2, 0, true);
        feature.meeples.push(token(0, MeepleType::Normal));
        feature.meeples.push(token(1, MeepleType::Normal));
        assert_eq!(majority_holders(&feature), vec![0, 1], "ties pay everyone");

        feature.meeples.push(token(1, MeepleType::Normal));
        assert_eq!(majority_holders(&feature), vec![1]);

        let mut big = bare_feature(FeatureKind::City, 2, 0, true);
        big.meeples.push(token(0, MeepleType::Normal));
        big.meeples.push(token(1, MeepleType::Big));
        assert_eq!(majority_holders(&big), vec![1], "big meeple counts double");

        let mut support_only = bare_feature(FeatureKind::Road, 2, 0, true);
        support_only.meeples.push(token(0, MeepleType::Builder));
        assert!(
            majority_holders(&support_only).is_empty(),
            "support tokens carry no weight"
        );
    }

    #[test]
    fn test_score_feature_pays_all_tied_holders() {
        let profile = ScoringProfile::default();
        let tracker = FeatureTracker::new();
        let mut feature = bare_feature(FeatureKind::City, 3, 1, true);
        feature.meeples.push(token(0, MeepleType::Normal));
        feature.meeples.push(token(2, MeepleType::Normal));
        let event = score_feature(&profile, &tracker, &feature, false).expect("somebody scores");
        assert_eq!(event.points_for(0), 8);
        assert_eq!(event.points_for(2), 8);
        assert_eq!(event.scores.len(), 2);
        assert!(!event.end_game);
    }

    #[test]
    fn test_no_event_without_weight_or_value() {
        let profile = ScoringProfile::default();
        let tracker = FeatureTracker::new();
        let unclaimed = bare_feature(FeatureKind::City, 3, 0, true);
        assert!(score_feature(&profile, &tracker, &unclaimed, false).is_none());

        let mut zero_value = bare_feature(FeatureKind::Road, 4, 0, false);
        zero_value.metadata.set_flag(META_INN);
        zero_value.meeples.push(token(0, MeepleType::Normal));
        assert!(
            score_feature(&profile, &tracker, &zero_value, true).is_none(),
            "zero points never emits an event"
        );
    }

    fn field_catalog() -> TileCatalog {
        let cap = TileDefinition::new("cap", 1)
            .with_segment(Segment::city("city0"))
            .with_segment(Segment::field("field0"))
            .with_side(Direction::North, "city0")
            .with_side(Direction::East, "field0")
            .with_side(Direction::South, "field0")
            .with_side(Direction::West, "field0")
            .with_adjacency("field0", "city0");
        TileCatalog::build(vec![cap]).expect("test catalog should validate")
    }

    fn place(
        board: &mut Board,
        tracker: &mut FeatureTracker,
        catalog: &TileCatalog,
        x: i32,
        y: i32,
        rotation: Rotation,
    ) {
        let placed = PlacedTile::new(Coordinate::new(x, y), "cap", rotation);
        board.place(placed.clone());
        tracker.add_tile(board, catalog, &placed);
    }

    #[test]
    fn test_field_pays_per_completed_city() {
        let profile = ScoringProfile::default();
        let catalog = field_catalog();
        let mut board = Board::new();
        let mut tracker = FeatureTracker::new();
        place(&mut board, &mut tracker, &catalog, 0, 0, Rotation::R0);
        place(&mut board, &mut tracker, &catalog, 0, -1, Rotation::R180);

        let field_node = NodeKey::new(Coordinate::new(0, 0), "field0");
        tracker.add_meeple(
            &field_node,
            MeeplePlacement::new(0, MeepleType::Normal, Coordinate::new(0, 0), "field0"),
        );
        let field = tracker.feature(&field_node).expect("field").clone();
        assert_eq!(completed_adjacent_cities(&tracker, &field).len(), 1);
        let event = score_feature(&profile, &tracker, &field, true).expect("farmer scores");
        assert_eq!(event.points_for(0), 3);
    }

    #[test]
    fn test_pig_raises_rate_for_its_owner_only() {
        let profile = ScoringProfile::default();
        let catalog = field_catalog();
        let mut board = Board::new();
        let mut tracker = FeatureTracker::new();
        place(&mut board, &mut tracker, &catalog, 0, 0, Rotation::R0);
        place(&mut board, &mut tracker, &catalog, 0, -1, Rotation::R180);

        let field_node = NodeKey::new(Coordinate::new(0, 0), "field0");
        tracker.add_meeple(
            &field_node,
            MeeplePlacement::new(0, MeepleType::Normal, Coordinate::new(0, 0), "field0"),
        );
        tracker.add_meeple(
            &field_node,
            MeeplePlacement::new(0, MeepleType::Pig, Coordinate::new(0, 0), "field0"),
        );
        tracker.add_meeple(
            &field_node,
            MeeplePlacement::new(1, MeepleType::Normal, Coordinate::new(0, 0), "field0"),
        );
        let field = tracker.feature(&field_node).expect("field").clone();
        let event = score_feature(&profile, &tracker, &field, true).expect("farmers score");
        assert_eq!(event.points_for(0), 4, "pig owner earns the raised rate");
        assert_eq!(event.points_for(1), 3);
    }

    #[test]
    fn test_end_game_sweep_skips_paid_roots() {
        let profile = ScoringProfile::default();
        let catalog = field_catalog();
        let mut board = Board::new();
        let mut tracker = FeatureTracker::new();
        place(&mut board, &mut tracker, &catalog, 0, 0, Rotation::R0);
        place(&mut board, &mut tracker, &catalog, 0, -1, Rotation::R180);

        let city_node = NodeKey::new(Coordinate::new(0, 0), "city0");
        let field_node = NodeKey::new(Coordinate::new(0, 0), "field0");
        tracker.add_meeple(
            &city_node,
            MeeplePlacement::new(0, MeepleType::Normal, Coordinate::new(0, 0), "city0"),
        );
        tracker.add_meeple(
            &field_node,
            MeeplePlacement::new(1, MeepleType::Normal, Coordinate::new(0, 0), "field0"),
        );

        let everything = end_game_sweep(&profile, &tracker, &BTreeSet::new());
        assert_eq!(everything.len(), 2, "city and field both pay");

        let city_root = tracker.root_of(&city_node).expect("city root");
        let mut skip = BTreeSet::new();
        skip.insert(city_root);
        let remaining = end_game_sweep(&profile, &tracker, &skip);
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].kind, FeatureKind::Field);
        assert!(remaining[0].end_game);
    }

    #[test]
    fn test_commodity_bonuses_pay_all_tied_leaders() {
        let profile = ScoringProfile::default();
        let mut players = vec![
            Player::new(0, "Ana"),
            Player::new(1, "Ben"),
            Player::new(2, "Cara"),
        ];
        players[0].commodities.add(Commodity::Wine, 2);
        players[1].commodities.add(Commodity::Wine, 2);
        players[1].commodities.add(Commodity::Cloth, 1);
        let bonuses = commodity_bonuses(&profile, &players);
        assert_eq!(bonuses.get(&0), Some(&10), "tied wine leaders both earn");
        assert_eq!(bonuses.get(&1), Some(&20), "wine tie plus cloth lead");
        assert_eq!(bonuses.get(&2), None, "no wheat anywhere, no wheat bonus");
    }
}
