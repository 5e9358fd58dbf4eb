//! Tile placement legality.
//!
//! A coordinate is legal for the drawn tile iff it is unoccupied, touches
//! at least one existing tile (origin only on an empty grid), and every
//! occupied orthogonal neighbor agrees edge-for-edge: each of the three
//! sub-positions facing the neighbor must hold the same segment class as
//! the neighbor's mirrored sub-position facing back. Physical positions
//! are resolved by un-rotating into each definition's logical frame.

use crate::grid::{Board, Coordinate, Direction, EdgePosition, Rotation};
use crate::tile::{TileCatalog, TileInstance};

/// Whether the drawn tile may be committed at `coord` with its current
/// rotation
pub fn is_valid_placement(
    board: &Board,
    catalog: &TileCatalog,
    tile: &TileInstance,
    coord: Coordinate,
) -> bool {
    if board.is_occupied(coord) {
        return false;
    }
    if board.is_empty() {
        return coord == Coordinate::new(0, 0);
    }
    if !board.has_adjacent_tile(coord) {
        return false;
    }
    let definition = match catalog.get(&tile.definition_id) {
        Some(def) => def,
        None => return false,
    };
    for direction in Direction::ALL {
        let neighbor_coord = coord.neighbor(direction);
        let neighbor = match board.tile_at(neighbor_coord) {
            Some(placed) => placed,
            None => continue,
        };
        let neighbor_def = match catalog.get(&neighbor.definition_id) {
            Some(def) => def,
            None => return false,
        };
        for position in EdgePosition::on_side(direction) {
            let mine = definition.segment_at(position, tile.rotation);
            let theirs = neighbor_def.segment_at(position.mirrored(), neighbor.rotation);
            match (mine, theirs) {
                (Some(a), Some(b)) if a.kind == b.kind => {}
                _ => return false,
            }
        }
    }
    true
}

/// All coordinates where the tile fits with its current rotation
pub fn valid_positions(
    board: &Board,
    catalog: &TileCatalog,
    tile: &TileInstance,
) -> Vec<Coordinate> {
    if board.is_empty() {
        return vec![Coordinate::new(0, 0)];
    }
    board
        .frontier()
        .into_iter()
        .filter(|coord| is_valid_placement(board, catalog, tile, *coord))
        .collect()
}

/// All rotations under which the tile fits at `coord`
pub fn valid_rotations(
    board: &Board,
    catalog: &TileCatalog,
    tile: &TileInstance,
    coord: Coordinate,
) -> Vec<Rotation> {
    Rotation::ALL
        .into_iter()
        .filter(|rotation| {
            is_valid_placement(board, catalog, &tile.with_rotation(*rotation), coord)
        })
        .collect()
}

/// Whether the tile fits anywhere under any rotation. Drives the
/// draw-phase discard loop.
pub fn any_valid_placement_exists(
    board: &Board,
    catalog: &TileCatalog,
    tile: &TileInstance,
) -> bool {
    if board.is_empty() {
        return true;
    }
    board.frontier().into_iter().any(|coord| {
        Rotation::ALL
            .into_iter()
            .any(|rotation| is_valid_placement(board, catalog, &tile.with_rotation(rotation), coord))
    })
}

/// All coordinates where the tile fits under at least one rotation
pub fn all_potential_placements(
    board: &Board,
    catalog: &TileCatalog,
    tile: &TileInstance,
) -> Vec<Coordinate> {
    if board.is_empty() {
        return vec![Coordinate::new(0, 0)];
    }
    board
        .frontier()
        .into_iter()
        .filter(|coord| {
            Rotation::ALL
                .into_iter()
                .any(|rotation| {
                    is_valid_placement(board, catalog, &tile.with_rotation(rotation), *coord)
                })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::PlacedTile;
    use crate::tile::{Segment, TileDefinition};
    use pretty_assertions::assert_eq;

    fn city_cap() -> TileDefinition {
        TileDefinition::new("cap", 5)
            .with_segment(Segment::city("city0"))
            .with_segment(Segment::field("field0"))
            .with_side(Direction::North, "city0")
            .with_side(Direction::East, "field0")
            .with_side(Direction::South, "field0")
            .with_side(Direction::West, "field0")
    }

    fn straight_road() -> TileDefinition {
        TileDefinition::new("straight", 8)
            .with_segment(Segment::road("road0"))
            .with_segment(Segment::field("field0"))
            .with_segment(Segment::field("field1"))
            .with_side(Direction::North, "field0")
            .with_edge(EdgePosition::NorthCenter, "road0")
            .with_edge(EdgePosition::NorthRight, "field1")
            .with_side(Direction::East, "field1")
            .with_side(Direction::South, "field1")
            .with_edge(EdgePosition::SouthCenter, "road0")
            .with_edge(EdgePosition::SouthRight, "field0")
            .with_side(Direction::West, "field0")
    }

    fn test_catalog() -> TileCatalog {
        TileCatalog::build(vec![city_cap(), straight_road()]).unwrap()
    }

    #[test]
    fn test_empty_board_admits_only_origin() {
        let catalog = test_catalog();
        let board = Board::new();
        let tile = TileInstance::new("cap");
        assert!(is_valid_placement(
            &board,
            &catalog,
            &tile,
            Coordinate::new(0, 0)
        ));
        assert!(!is_valid_placement(
            &board,
            &catalog,
            &tile,
            Coordinate::new(1, 0)
        ));
        assert_eq!(
            valid_positions(&board, &catalog, &tile),
            vec![Coordinate::new(0, 0)]
        );
        assert!(any_valid_placement_exists(&board, &catalog, &tile));
    }

    #[test]
    fn test_occupied_and_detached_cells_rejected() {
        let catalog = test_catalog();
        let mut board = Board::new();
        board.place(PlacedTile::new(Coordinate::new(0, 0), "cap", Rotation::R0));
        let tile = TileInstance::new("cap");
        assert!(
            !is_valid_placement(&board, &catalog, &tile, Coordinate::new(0, 0)),
            "occupied cell must be rejected"
        );
        assert!(
            !is_valid_placement(&board, &catalog, &tile, Coordinate::new(5, 5)),
            "detached cell must be rejected"
        );
    }

    #[test]
    fn test_edges_must_match_both_ways() {
        let catalog = test_catalog();
        let mut board = Board::new();
        board.place(PlacedTile::new(Coordinate::new(0, 0), "cap", Rotation::R0));
        // North of the cap, an unrotated cap shows its field south edge
        // against the city below.
        let north = Coordinate::new(0, -1);
        let tile = TileInstance::new("cap");
        assert!(!is_valid_placement(&board, &catalog, &tile, north));
        // Rotated 180, its city faces south and the edges agree.
        assert!(is_valid_placement(
            &board,
            &catalog,
            &tile.with_rotation(Rotation::R180),
            north
        ));
        // East of the cap both tiles show field; any rotation keeping
        // the city away from the shared edge works.
        assert!(is_valid_placement(
            &board,
            &catalog,
            &tile,
            Coordinate::new(1, 0)
        ));
    }

    #[test]
    fn test_valid_rotations_at_coordinate() {
        let catalog = test_catalog();
        let mut board = Board::new();
        board.place(PlacedTile::new(Coordinate::new(0, 0), "cap", Rotation::R0));
        let tile = TileInstance::new("cap");
        assert_eq!(
            valid_rotations(&board, &catalog, &tile, Coordinate::new(0, -1)),
            vec![Rotation::R180]
        );
        // South of the cap, every orientation turning the city away from
        // the shared edge works; R0 points it straight at the field.
        assert_eq!(
            valid_rotations(&board, &catalog, &tile, Coordinate::new(0, 1)),
            vec![Rotation::R90, Rotation::R180, Rotation::R270]
        );
    }

    #[test]
    fn test_road_ends_connect() {
        let catalog = test_catalog();
        let mut board = Board::new();
        board.place(PlacedTile::new(
            Coordinate::new(0, 0),
            "straight",
            Rotation::R0,
        ));
        let tile = TileInstance::new("straight");
        let south = Coordinate::new(0, 1);
        // Road runs north-south; another straight continues it.
        assert!(is_valid_placement(&board, &catalog, &tile, south));
        assert!(is_valid_placement(
            &board,
            &catalog,
            &tile.with_rotation(Rotation::R180),
            south
        ));
        // Turned sideways its field edge meets the road end.
        assert!(!is_valid_placement(
            &board,
            &catalog,
            &tile.with_rotation(Rotation::R90),
            south
        ));
    }

    #[test]
    fn test_potential_placements_cover_all_rotations() {
        let catalog = test_catalog();
        let mut board = Board::new();
        board.place(PlacedTile::new(Coordinate::new(0, 0), "cap", Rotation::R0));
        let tile = TileInstance::new("cap");
        let potential = all_potential_placements(&board, &catalog, &tile);
        // Every frontier cell admits the cap under some rotation.
        assert_eq!(potential, board.frontier());
        let fixed = valid_positions(&board, &catalog, &tile);
        assert!(
            fixed.len() < potential.len(),
            "current rotation must be more restrictive than any-rotation"
        );
    }
}
